//! Dataset preprocessing ahead of analysis

use crate::data::RelationDataset;
use std::collections::{BTreeMap, BTreeSet};

/// Drop the selection lists of choosers with fewer than `min_selections`
/// entries. The entities themselves stay in the dataset so they can still
/// be selected by others.
pub fn filter_by_min_selections(
    dataset: &RelationDataset,
    min_selections: usize,
) -> RelationDataset {
    let selections: BTreeMap<String, Vec<String>> = dataset
        .selections
        .iter()
        .filter(|(_, list)| list.len() >= min_selections)
        .map(|(id, list)| (id.clone(), list.clone()))
        .collect();

    let dropped = dataset.selections.len() - selections.len();
    if dropped > 0 {
        log::info!(
            "Ignoring {} choosers with fewer than {} selections",
            dropped,
            min_selections
        );
    }

    RelationDataset::from_parts(dataset.entities.clone(), selections)
}

/// Extract the sub-dataset induced by `ids`: only those entities, and only
/// selections where both endpoints are kept
pub fn extract_subset(dataset: &RelationDataset, ids: &BTreeSet<String>) -> RelationDataset {
    let entities = dataset
        .entities
        .iter()
        .filter(|(id, _)| ids.contains(*id))
        .map(|(id, entity)| (id.clone(), entity.clone()))
        .collect();

    let selections = dataset
        .selections
        .iter()
        .filter(|(id, _)| ids.contains(*id))
        .filter_map(|(id, list)| {
            let kept: Vec<String> = list.iter().filter(|t| ids.contains(*t)).cloned().collect();
            (!kept.is_empty()).then(|| (id.clone(), kept))
        })
        .collect();

    RelationDataset::from_parts(entities, selections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::EntityRecord;

    fn dataset() -> RelationDataset {
        RelationDataset::from_records(vec![
            EntityRecord::new("a", "A", vec![], vec!["b", "c"]),
            EntityRecord::new("b", "B", vec![], vec!["a"]),
            EntityRecord::new("c", "C", vec![], vec!["a", "b"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_filter_by_min_selections() {
        let filtered = filter_by_min_selections(&dataset(), 2);
        assert_eq!(filtered.entity_count(), 3);
        assert_eq!(filtered.chooser_count(), 2);
        assert!(filtered.selections("b").is_empty());
        assert_eq!(filtered.incoming_count("a"), 1);
    }

    #[test]
    fn test_extract_subset() {
        let ids: BTreeSet<String> = ["a", "c"].iter().map(|s| s.to_string()).collect();
        let subset = extract_subset(&dataset(), &ids);
        assert_eq!(subset.entity_count(), 2);
        assert_eq!(subset.selections("a"), &["c".to_string()]);
        assert_eq!(subset.selections("c"), &["a".to_string()]);
        assert!(subset.entity("b").is_none());
    }
}
