use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use roundtrip_optimizer::json::types::JsonRoutingProblem;
use serde::Serialize;

pub fn read_problem(path: &Path) -> anyhow::Result<JsonRoutingProblem> {
    let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let problem = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Invalid problem file {}", path.display()))?;

    Ok(problem)
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;

    Ok(())
}
