//! Relation dataset: entities and their selection lists

pub mod loader;
pub mod preprocessing;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// An entity in the selection graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Stable identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Group tags (may be empty)
    pub groups: BTreeSet<String>,
}

/// One input record as supplied by the external loader
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub groups: Vec<String>,

    /// Ids of the entities listed on this entity's page, in page order
    #[serde(default)]
    pub selections: Vec<String>,
}

impl EntityRecord {
    pub fn new<S: Into<String>>(
        id: S,
        name: S,
        groups: Vec<&str>,
        selections: Vec<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            groups: groups.into_iter().map(String::from).collect(),
            selections: selections.into_iter().map(String::from).collect(),
        }
    }
}

/// Immutable snapshot of the directed selection relation.
///
/// Selection lists are normalised on construction: targets that are not
/// known entities, self-selections and repeated targets are dropped, so
/// every list only references entities present in the dataset.
#[derive(Debug, Clone, Default)]
pub struct RelationDataset {
    entities: BTreeMap<String, Entity>,
    selections: BTreeMap<String, Vec<String>>,
    selection_sets: BTreeMap<String, HashSet<String>>,
    incoming: BTreeMap<String, usize>,
}

impl RelationDataset {
    /// Build a dataset from loader records
    pub fn from_records(records: Vec<EntityRecord>) -> Result<Self> {
        let mut entities = BTreeMap::new();
        let mut raw_lists = Vec::with_capacity(records.len());

        for record in records {
            if entities.contains_key(&record.id) {
                return Err(Error::DuplicateEntity(record.id));
            }
            let entity = Entity {
                id: record.id.clone(),
                name: record.name,
                groups: record.groups.into_iter().collect(),
            };
            entities.insert(record.id.clone(), entity);
            raw_lists.push((record.id, record.selections));
        }

        let mut orphans = 0usize;
        let mut repeats = 0usize;
        let mut selections = BTreeMap::new();

        for (id, list) in raw_lists {
            let mut seen = HashSet::with_capacity(list.len());
            let mut resolved = Vec::with_capacity(list.len());
            for target in list {
                if target == id || !entities.contains_key(&target) {
                    orphans += 1;
                    continue;
                }
                if !seen.insert(target.clone()) {
                    repeats += 1;
                    continue;
                }
                resolved.push(target);
            }
            if !resolved.is_empty() {
                selections.insert(id, resolved);
            }
        }

        if orphans > 0 || repeats > 0 {
            log::debug!(
                "Dropped {} orphan/self selections and {} repeated selections",
                orphans,
                repeats
            );
        }

        Ok(Self::from_parts(entities, selections))
    }

    fn from_parts(
        entities: BTreeMap<String, Entity>,
        selections: BTreeMap<String, Vec<String>>,
    ) -> Self {
        let mut incoming: BTreeMap<String, usize> = BTreeMap::new();
        let mut selection_sets = BTreeMap::new();
        for (id, list) in &selections {
            for target in list {
                *incoming.entry(target.clone()).or_insert(0) += 1;
            }
            selection_sets.insert(id.clone(), list.iter().cloned().collect());
        }

        Self {
            entities,
            selections,
            selection_sets,
            incoming,
        }
    }

    /// Number of entities in the dataset
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Look up an entity by id
    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// All entities, ordered by id
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Selection list of an entity (empty when it selects nobody)
    pub fn selections(&self, id: &str) -> &[String] {
        self.selections.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Entities with at least one selection, ordered by id
    pub fn choosers(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.selections
            .iter()
            .map(|(id, list)| (id.as_str(), list.as_slice()))
    }

    /// Number of entities with at least one selection
    pub fn chooser_count(&self) -> usize {
        self.selections.len()
    }

    /// Total number of directed relations
    pub fn relation_count(&self) -> usize {
        self.selections.values().map(Vec::len).sum()
    }

    /// Whether `source` lists `target`
    pub fn selects(&self, source: &str, target: &str) -> bool {
        self.selection_sets
            .get(source)
            .map_or(false, |set| set.contains(target))
    }

    /// Number of times `id` appears as a selection target.
    ///
    /// Repeated targets within one list are dropped on construction, so this
    /// is also the number of distinct choosers selecting `id`.
    pub fn incoming_count(&self, id: &str) -> usize {
        self.incoming.get(id).copied().unwrap_or(0)
    }

    /// Number of selections made by `id`
    pub fn outgoing_count(&self, id: &str) -> usize {
        self.selections(id).len()
    }

    /// True when the two entities share no group tag
    pub fn groups_disjoint(&self, a: &str, b: &str) -> bool {
        match (self.entities.get(a), self.entities.get(b)) {
            (Some(a), Some(b)) => a.groups.is_disjoint(&b.groups),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalises_selection_lists() {
        let dataset = RelationDataset::from_records(vec![
            EntityRecord::new("a", "A", vec![], vec!["b", "ghost", "a", "b", "c"]),
            EntityRecord::new("b", "B", vec![], vec![]),
            EntityRecord::new("c", "C", vec![], vec!["a"]),
        ])
        .unwrap();

        assert_eq!(dataset.selections("a"), &["b".to_string(), "c".to_string()]);
        assert!(dataset.selections("b").is_empty());
        assert_eq!(dataset.chooser_count(), 2);
        assert_eq!(dataset.relation_count(), 3);
        assert_eq!(dataset.incoming_count("a"), 1);
        assert_eq!(dataset.incoming_count("ghost"), 0);
        assert!(dataset.selects("c", "a"));
        assert!(!dataset.selects("a", "ghost"));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = RelationDataset::from_records(vec![
            EntityRecord::new("a", "A", vec![], vec![]),
            EntityRecord::new("a", "Again", vec![], vec![]),
        ])
        .unwrap_err();
        assert_eq!(err, Error::DuplicateEntity("a".to_string()));
    }

    #[test]
    fn test_groups_disjoint() {
        let dataset = RelationDataset::from_records(vec![
            EntityRecord::new("a", "A", vec!["red", "blue"], vec![]),
            EntityRecord::new("b", "B", vec!["blue"], vec![]),
            EntityRecord::new("c", "C", vec!["green"], vec![]),
        ])
        .unwrap();
        assert!(!dataset.groups_disjoint("a", "b"));
        assert!(dataset.groups_disjoint("a", "c"));
    }
}
