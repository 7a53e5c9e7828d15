//! Destinations for extracted facts
//!
//! A store merges by identity: writing an entity or relationship that is
//! already present never creates a second copy, so recompiling unchanged
//! source leaves the store as it was.

use crate::{Entity, FactSet, Relationship};
use indexmap::{IndexMap, IndexSet};

/// A merge-by-identity graph store
pub trait FactStore {
    /// Inserts `entity`, or merges its attributes into the entity with the
    /// same id
    fn merge_entity(&mut self, entity: &Entity);

    /// Inserts `relationship` unless an identical one exists
    fn merge_relationship(&mut self, relationship: &Relationship);

    /// Merges every fact of `facts`, entities first
    fn merge(&mut self, facts: &FactSet) {
        for entity in &facts.entities {
            self.merge_entity(entity);
        }
        for relationship in &facts.relationships {
            self.merge_relationship(relationship);
        }
    }
}

/// Store kept in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    entities: IndexMap<String, Entity>,
    relationships: IndexSet<Relationship>,
}

impl InMemoryStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Entity by id
    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Number of stored entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of stored relationships
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Snapshot of the store's contents
    pub fn snapshot(&self) -> FactSet {
        FactSet {
            entities: self.entities.values().cloned().collect(),
            relationships: self.relationships.iter().cloned().collect(),
        }
    }
}

impl FactStore for InMemoryStore {
    fn merge_entity(&mut self, entity: &Entity) {
        match self.entities.get_mut(&entity.id) {
            Some(existing) => existing
                .attributes
                .extend(entity.attributes.iter().map(|(key, value)| (key.clone(), value.clone()))),
            None => {
                self.entities.insert(entity.id.clone(), entity.clone());
            }
        }
    }

    fn merge_relationship(&mut self, relationship: &Relationship) {
        if !self.relationships.contains(relationship) {
            self.relationships.insert(relationship.clone());
        }
    }
}
