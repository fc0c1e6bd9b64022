use std::fs;

use anyhow::{Context, Result};
use log::info;

use forest_data::synthetic::SyntheticData;
use forest_data::Descriptor;

fn parse_arg<T: std::str::FromStr>(arg: Option<String>, default: T, name: &str) -> Result<T> {
    match arg {
        Some(text) => text
            .parse()
            .map_err(|_| anyhow::anyhow!("{name}: '{text}' is not a valid value")),
        None => Ok(default),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let n_rows: usize = parse_arg(args.next(), 1000, "rows")?;
    let n_attributes: usize = parse_arg(args.next(), 10, "attributes")?;
    let seed: u64 = parse_arg(args.next(), 42, "seed")?;

    if n_attributes == 0 {
        anyhow::bail!("attributes: need at least one column for the label");
    }

    let sample = SyntheticData::generate(seed, n_attributes, n_rows, 0.05, "?");

    // Sanity check: the written descriptor must parse back.
    let descriptor = sample.descriptor();
    Descriptor::parse(&descriptor).context("generated descriptor does not parse")?;

    fs::write("sample.descriptor", format!("{descriptor}\n")).context("writing sample.descriptor")?;
    fs::write("sample.data", sample.rows.join("\n") + "\n").context("writing sample.data")?;

    info!(
        "wrote {} rows ({} with missing values) for descriptor {}",
        sample.rows.len(),
        sample.missing.len(),
        descriptor
    );
    println!("Wrote sample.descriptor and sample.data");
    Ok(())
}
