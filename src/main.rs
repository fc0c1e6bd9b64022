use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::info;

use forest_data::data::read_lines;
use forest_data::{Loader, LoaderConfig, LocalFileSystem};

const USAGE: &str = "usage: forest-data <descriptor> <data-file> [config.json]";

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let (Some(descriptor), Some(data_path)) = (args.next(), args.next()) else {
        bail!(USAGE);
    };
    let config = match args.next() {
        Some(path) => LoaderConfig::from_json_file(Path::new(&path))
            .with_context(|| format!("reading config {path}"))?,
        None => LoaderConfig::default(),
    };
    if args.next().is_some() {
        bail!(USAGE);
    }

    let data_path = PathBuf::from(data_path);
    let rows = read_lines(&LocalFileSystem, &data_path)
        .with_context(|| format!("reading {}", data_path.display()))?;

    let loader = Loader::new(config);
    let dataset = loader
        .generate_dataset(&descriptor, &rows)
        .context("building dataset")?;
    let data = loader.load_data(&dataset, &rows).context("loading rows")?;

    println!("{}", dataset.to_json()?);

    let n_rows = rows.iter().filter(|l| !l.trim().is_empty()).count();
    info!(
        "majority label: {:?}",
        data.majority_label().and_then(|c| dataset.label_name(c))
    );
    println!(
        "rows: {n_rows}, loaded: {}, skipped: {}",
        data.len(),
        n_rows - data.len()
    );

    Ok(())
}
