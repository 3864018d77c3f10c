//! Per-entity selection statistics

use crate::data::RelationDataset;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Selection statistics for one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityStats {
    pub id: String,
    pub name: String,

    /// Times selected
    pub incoming: usize,

    /// Length of the entity's own selection list
    pub outgoing: usize,

    /// Selections that select this entity back
    pub mutual: usize,

    /// Rarity of being selected
    pub idf: f64,

    /// 1-based position by times selected; absent for never-selected entities
    pub popularity_rank: Option<usize>,
}

/// Statistics for every entity, most selected first and unranked last
pub fn entity_stats(dataset: &RelationDataset, idf: &BTreeMap<String, f64>) -> Vec<EntityStats> {
    let mut stats: Vec<EntityStats> = dataset
        .entities()
        .map(|entity| {
            let id = entity.id.as_str();
            let mutual = dataset
                .selections(id)
                .iter()
                .filter(|target| dataset.selects(target, id))
                .count();
            EntityStats {
                id: entity.id.clone(),
                name: entity.name.clone(),
                incoming: dataset.incoming_count(id),
                outgoing: dataset.outgoing_count(id),
                mutual,
                idf: idf.get(id).copied().unwrap_or(0.0),
                popularity_rank: None,
            }
        })
        .collect();

    stats.sort_by(|a, b| b.incoming.cmp(&a.incoming).then_with(|| a.id.cmp(&b.id)));
    for (i, entry) in stats.iter_mut().enumerate() {
        if entry.incoming > 0 {
            entry.popularity_rank = Some(i + 1);
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::EntityRecord;
    use crate::graph::idf::compute_idf;

    #[test]
    fn test_entity_stats() {
        let dataset = RelationDataset::from_records(vec![
            EntityRecord::new("a", "A", vec![], vec!["b", "c"]),
            EntityRecord::new("b", "B", vec![], vec!["a", "c"]),
            EntityRecord::new("c", "C", vec![], vec![]),
            EntityRecord::new("d", "D", vec![], vec!["c"]),
        ])
        .unwrap();
        let stats = entity_stats(&dataset, &compute_idf(&dataset));

        let order: Vec<&str> = stats.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b", "d"]);
        assert_eq!(stats[0].incoming, 3);
        assert_eq!(stats[0].idf, 0.0);
        assert_eq!(stats[0].popularity_rank, Some(1));
        assert_eq!(stats[1].mutual, 1);
        assert_eq!(stats[3].popularity_rank, None);
        assert_eq!(stats[3].outgoing, 1);
    }
}
