//! Inverse selection frequency (rarity of being selected)

use crate::data::RelationDataset;
use std::collections::BTreeMap;

/// Rarity of being selected: `log2(total_voters / incoming)`.
///
/// Entities that are never selected score 0, meaning "no information"
/// rather than "infinitely rare".
pub fn idf(total_voters: usize, incoming: usize) -> f64 {
    if incoming == 0 || total_voters == 0 {
        return 0.0;
    }
    (total_voters as f64 / incoming as f64).log2()
}

/// IDF for every entity in the dataset
pub fn compute_idf(dataset: &RelationDataset) -> BTreeMap<String, f64> {
    let total_voters = dataset.chooser_count();
    log::debug!("Computing IDF over {} voters", total_voters);

    dataset
        .entities()
        .map(|entity| {
            let score = idf(total_voters, dataset.incoming_count(&entity.id));
            (entity.id.clone(), score)
        })
        .collect()
}
