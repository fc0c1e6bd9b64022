//! End-to-end checks of the build-then-load pipeline on random data.

use std::io::Write;

use forest_data::synthetic::SyntheticData;
use forest_data::{
    generate_dataset, generate_dataset_from_file, load_data, load_data_from_file, AttributeKind,
    Data, Loader, LoaderConfig, LocalFileSystem, MemoryFileSystem, Parallelism,
};

const N_ATTRIBUTES: usize = 10;
const DATASIZE: usize = 100;

fn sample(seed: u64) -> SyntheticData {
    SyntheticData::generate(seed, N_ATTRIBUTES, DATASIZE, 0.1, "?")
}

// =============================================================================
// Checks against the generating values
// =============================================================================

/// Loaded instances agree with the source values, row by row.
fn check_loaded_data(src: &SyntheticData, loaded: &Data<'_>) {
    assert_eq!(
        loaded.len(),
        src.values.len() - src.missing.len(),
        "number of instances"
    );

    let mut lind = 0;
    for (index, vector) in src.values.iter().enumerate() {
        if src.missing.contains(&index) {
            continue;
        }
        let instance = loaded.get(lind).expect("instance");
        assert_eq!(instance.id(), lind);

        let mut aid = 0;
        for (attr, kind) in src.kinds.iter().enumerate() {
            match kind {
                AttributeKind::Ignored => {}
                AttributeKind::Numerical => {
                    assert_eq!(instance.get(aid), vector[attr]);
                    aid += 1;
                }
                AttributeKind::Categorical => {
                    check_categorical(src, loaded, attr, aid, vector[attr], instance.get(aid));
                    aid += 1;
                }
                AttributeKind::Label => check_label(src, loaded, attr, vector[attr]),
            }
        }
        lind += 1;
    }
}

/// Feature-indexed predicates and lookups agree with the declared kinds.
fn check_loaded_dataset(src: &SyntheticData, loaded: &Data<'_>) {
    let dataset = loaded.dataset();

    let mut iid = 0;
    for (index, vector) in src.values.iter().enumerate() {
        if src.missing.contains(&index) {
            continue;
        }
        let instance = loaded.get(iid).expect("instance");
        iid += 1;

        let mut aid = 0;
        for (attr, kind) in src.kinds.iter().enumerate() {
            if matches!(kind, AttributeKind::Ignored | AttributeKind::Label) {
                continue;
            }
            assert_eq!(*kind == AttributeKind::Numerical, dataset.is_numerical(aid));
            assert_eq!(dataset.feature_column(aid), attr);

            if *kind == AttributeKind::Categorical {
                let code = dataset.value_of(aid, &vector[attr].to_string()).unwrap();
                assert_eq!(f64::from(code), instance.get(aid));
            }
            aid += 1;
        }
    }
}

/// Every loaded row with source value `o_value` in `attr` carries `n_value`
/// in feature `aid`, and no other row does.
fn check_categorical(src: &SyntheticData, loaded: &Data<'_>, attr: usize, aid: usize, o_value: f64, n_value: f64) {
    let mut lind = 0;
    for (index, vector) in src.values.iter().enumerate() {
        if src.missing.contains(&index) {
            continue;
        }
        let other = loaded.get(lind).unwrap().get(aid);
        if vector[attr] == o_value {
            assert_eq!(other, n_value);
        } else {
            assert_ne!(other, n_value);
        }
        lind += 1;
    }
}

/// Same as [`check_categorical`] for the label, against `label_code`.
fn check_label(src: &SyntheticData, loaded: &Data<'_>, label_attr: usize, value: f64) {
    let code = loaded.dataset().label_code(&value.to_string()).unwrap();

    let mut lind = 0;
    for (index, vector) in src.values.iter().enumerate() {
        if src.missing.contains(&index) {
            continue;
        }
        let other = loaded.get(lind).unwrap().label();
        if vector[label_attr] == value {
            assert_eq!(other, code);
        } else {
            assert_ne!(other, code);
        }
        lind += 1;
    }
}

fn write_rows(rows: &[String]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file.flush().unwrap();
    file
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn load_data_with_descriptor() {
    for seed in 0..5 {
        let src = sample(seed);
        let dataset = generate_dataset(&src.descriptor(), &src.rows).unwrap();
        let loaded = load_data(&dataset, &src.rows).unwrap();

        check_loaded_data(&src, &loaded);
        check_loaded_dataset(&src, &loaded);
    }
}

#[test]
fn generate_dataset_is_idempotent() {
    let src = sample(1);
    let expected = generate_dataset(&src.descriptor(), &src.rows).unwrap();
    let dataset = generate_dataset(&src.descriptor(), &src.rows).unwrap();
    assert_eq!(expected, dataset);
}

#[test]
fn load_data_without_missing_values() {
    let src = SyntheticData::generate(9, N_ATTRIBUTES, DATASIZE, 0.0, "?");
    assert!(src.missing.is_empty());

    let dataset = generate_dataset(&src.descriptor(), &src.rows).unwrap();
    let loaded = load_data(&dataset, &src.rows).unwrap();

    assert_eq!(loaded.len(), DATASIZE);
    let ids: Vec<usize> = loaded.iter().map(|i| i.id()).collect();
    assert_eq!(ids, (0..DATASIZE).collect::<Vec<_>>());
}

#[test]
fn loads_data_from_file() {
    let src = sample(2);
    let dataset = generate_dataset(&src.descriptor(), &src.rows).unwrap();

    let file = write_rows(&src.rows);
    let loaded = load_data_from_file(&dataset, &LocalFileSystem, file.path()).unwrap();

    check_loaded_data(&src, &loaded);
}

#[test]
fn generates_dataset_from_file() {
    let src = sample(3);
    let expected = generate_dataset(&src.descriptor(), &src.rows).unwrap();

    let file = write_rows(&src.rows);
    let dataset = generate_dataset_from_file(&src.descriptor(), &LocalFileSystem, file.path()).unwrap();

    assert_eq!(expected, dataset);
}

#[test]
fn memory_filesystem_matches_in_memory_rows() {
    let src = sample(4);
    let mut fs = MemoryFileSystem::new();
    fs.insert("train/part-0", src.rows.join("\n"));
    let path = std::path::Path::new("train/part-0");

    let dataset = generate_dataset_from_file(&src.descriptor(), &fs, path).unwrap();
    assert_eq!(dataset, generate_dataset(&src.descriptor(), &src.rows).unwrap());

    let loaded = load_data_from_file(&dataset, &fs, path).unwrap();
    check_loaded_data(&src, &loaded);
}

#[test]
fn parallel_loader_matches_sequential() {
    let src = SyntheticData::generate(5, 12, 5000, 0.1, "?");
    let parallel = Loader::new(LoaderConfig::default().with_parallelism(Parallelism::Parallel));

    let expected = generate_dataset(&src.descriptor(), &src.rows).unwrap();
    let dataset = parallel.generate_dataset(&src.descriptor(), &src.rows).unwrap();
    assert_eq!(expected, dataset);

    let loaded = parallel.load_data(&dataset, &src.rows).unwrap();
    let sequential = load_data(&expected, &src.rows).unwrap();
    assert_eq!(loaded.len(), src.rows.len() - src.missing.len());
    assert_eq!(loaded.instances(), sequential.instances());
}

#[test]
fn dataset_survives_json_round_trip() {
    let src = sample(6);
    let dataset = generate_dataset(&src.descriptor(), &src.rows).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dataset.json");
    dataset.save(&path).unwrap();
    let restored = forest_data::Dataset::load(&path).unwrap();
    assert_eq!(restored, dataset);

    // Decoding against the restored copy gives the same instances.
    let a = load_data(&dataset, &src.rows).unwrap();
    let b = load_data(&restored, &src.rows).unwrap();
    assert_eq!(a.instances(), b.instances());
}

#[test]
fn red_blue_scenario() {
    let rows = ["1.0,red,yes", "2.0,blue,no", "?,red,yes"];
    let dataset = generate_dataset("N,C,L", &rows).unwrap();
    let loaded = load_data(&dataset, &rows).unwrap();

    let red = dataset.value_of(1, "red").unwrap();
    let blue = dataset.value_of(1, "blue").unwrap();
    assert_eq!((red, blue), (0, 1));

    assert_eq!(loaded.len(), 2);
    let i0 = loaded.get(0).unwrap();
    assert_eq!(i0.values(), &[1.0, f64::from(red)]);
    assert_eq!(i0.label(), dataset.label_code("yes").unwrap());
    let i1 = loaded.get(1).unwrap();
    assert_eq!(i1.values(), &[2.0, f64::from(blue)]);
    assert_eq!(i1.label(), dataset.label_code("no").unwrap());
}
