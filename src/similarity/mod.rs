//! Grouping of entities that share selections with a focal entity

use crate::config::SimilarityParams;
use crate::data::RelationDataset;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// Exponent of the power mean used as a "how rare is this set" signal
pub const RARITY_POWER: f64 = 3.0;

/// Entities sharing exactly the same selections with the focal entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityGroup {
    /// Shared selections, in the focal entity's list order
    pub common_selections: Vec<String>,

    /// Entities sharing exactly these selections, ids ascending
    pub members: Vec<String>,

    /// Arithmetic mean IDF of the shared selections
    pub mean_rarity: f64,

    /// Power mean (p = 3) IDF of the shared selections
    pub power_mean_rarity: f64,
}

/// Generalised mean `(sum x^p / n)^(1/p)`; 0 for an empty slice
pub fn power_mean(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().map(|v| v.powf(p)).mean();
    mean.powf(1.0 / p)
}

/// Group the entities whose selections overlap the focal entity's in at
/// least `min_common` places.
pub fn similar_entities(
    dataset: &RelationDataset,
    idf: &BTreeMap<String, f64>,
    focus: &str,
    params: &SimilarityParams,
) -> Result<Vec<SimilarityGroup>> {
    if params.min_common == 0 {
        return Err(Error::invalid("min_common", "must be at least 1"));
    }
    if dataset.entity(focus).is_none() {
        return Err(Error::UnknownEntity(focus.to_string()));
    }

    let focal = dataset.selections(focus);
    let mut signatures: BTreeMap<Vec<String>, Vec<String>> = BTreeMap::new();

    for (other, _) in dataset.choosers() {
        if other == focus {
            continue;
        }
        let common: Vec<String> = focal
            .iter()
            .filter(|target| dataset.selects(other, target))
            .cloned()
            .collect();
        if common.len() >= params.min_common {
            signatures.entry(common).or_default().push(other.to_string());
        }
    }

    let mut groups: Vec<SimilarityGroup> = signatures
        .into_iter()
        .map(|(common, members)| {
            let rarities: Vec<f64> = common
                .iter()
                .map(|id| idf.get(id).copied().unwrap_or(0.0))
                .collect();
            SimilarityGroup {
                mean_rarity: rarities.iter().mean(),
                power_mean_rarity: power_mean(&rarities, RARITY_POWER),
                common_selections: common,
                members,
            }
        })
        .filter(|g| params.min_power_mean.map_or(true, |min| g.power_mean_rarity >= min))
        .collect();

    groups.sort_by(|a, b| {
        b.common_selections
            .len()
            .cmp(&a.common_selections.len())
            .then_with(|| b.mean_rarity.total_cmp(&a.mean_rarity))
            .then_with(|| a.members.cmp(&b.members))
    });
    groups.truncate(params.top_n);

    log::debug!("Found {} similarity groups for {}", groups.len(), focus);
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::EntityRecord;
    use crate::graph::idf::compute_idf;

    fn dataset() -> RelationDataset {
        RelationDataset::from_records(vec![
            EntityRecord::new("me", "Me", vec![], vec!["x", "y", "z"]),
            EntityRecord::new("p", "P", vec![], vec!["x", "y"]),
            EntityRecord::new("q", "Q", vec![], vec!["y", "x", "w"]),
            EntityRecord::new("r", "R", vec![], vec!["x", "y", "z"]),
            EntityRecord::new("s", "S", vec![], vec!["x"]),
            EntityRecord::new("x", "X", vec![], vec![]),
            EntityRecord::new("y", "Y", vec![], vec![]),
            EntityRecord::new("z", "Z", vec![], vec![]),
            EntityRecord::new("w", "W", vec![], vec![]),
        ])
        .unwrap()
    }

    #[test]
    fn test_power_mean() {
        assert_eq!(power_mean(&[], 3.0), 0.0);
        assert!((power_mean(&[2.0, 2.0], 3.0) - 2.0).abs() < 1e-12);
        // Dominated by the largest value
        assert!(power_mean(&[0.0, 3.0], 3.0) > 2.0);
    }

    #[test]
    fn test_groups_by_signature() {
        let dataset = dataset();
        let idf = compute_idf(&dataset);
        let groups = similar_entities(&dataset, &idf, "me", &SimilarityParams::default()).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].common_selections, vec!["x", "y", "z"]);
        assert_eq!(groups[0].members, vec!["r"]);
        assert_eq!(groups[1].common_selections, vec!["x", "y"]);
        assert_eq!(groups[1].members, vec!["p", "q"]);

        // 5 voters; x selected 5 times, y 4 times
        let expected = (0.0 + (5.0f64 / 4.0).log2()) / 2.0;
        assert!((groups[1].mean_rarity - expected).abs() < 1e-12);
    }

    #[test]
    fn test_top_n_and_power_filter() {
        let dataset = dataset();
        let idf = compute_idf(&dataset);
        let params = SimilarityParams {
            top_n: 1,
            ..Default::default()
        };
        assert_eq!(similar_entities(&dataset, &idf, "me", &params).unwrap().len(), 1);

        let params = SimilarityParams {
            min_power_mean: Some(10.0),
            ..Default::default()
        };
        assert!(similar_entities(&dataset, &idf, "me", &params).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_focus() {
        let dataset = dataset();
        let idf = compute_idf(&dataset);
        let err =
            similar_entities(&dataset, &idf, "nobody", &SimilarityParams::default()).unwrap_err();
        assert_eq!(err, Error::UnknownEntity("nobody".to_string()));
    }
}
