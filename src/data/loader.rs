//! JSON loading of relation datasets

use crate::data::{EntityRecord, RelationDataset};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load a dataset from a JSON array of entity records
pub fn load_dataset(path: &str) -> Result<RelationDataset> {
    log::info!("Reading dataset file: {}", path);

    if !Path::new(path).exists() {
        return Err(anyhow::anyhow!("File not found: {}", path));
    }

    let file = File::open(path).with_context(|| format!("opening {}", path))?;
    let records: Vec<EntityRecord> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path))?;

    let dataset = build(records)?;
    log::info!(
        "Loaded {} entities with {} selections from {} choosers",
        dataset.entity_count(),
        dataset.relation_count(),
        dataset.chooser_count()
    );
    Ok(dataset)
}

/// Parse a dataset from an in-memory JSON string
pub fn parse_dataset(json: &str) -> Result<RelationDataset> {
    let records: Vec<EntityRecord> = serde_json::from_str(json)?;
    build(records)
}

fn build(records: Vec<EntityRecord>) -> Result<RelationDataset> {
    Ok(RelationDataset::from_records(records)?)
}
