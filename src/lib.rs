//! Core library for selection graph analysis: rarity weighting, weighted
//! graph construction, community detection, PMI rankings, bridges and
//! similarity groups

pub mod association;
pub mod cluster;
pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod pipeline;
pub mod similarity;
pub mod stats;
pub mod storage;

pub use config::AnalysisConfig;
pub use data::{Entity, EntityRecord, RelationDataset};
pub use error::{Error, Result};
pub use pipeline::{analyze, AnalysisReport};
