//! Compiled tag queries.
//!
//! A query is a list of tags and component identifiers compiled into a
//! required mask. An entity (or a whole bucket) matches when its signature
//! is a superset of the mask, so matching a world costs one comparison per
//! distinct archetype rather than one per entity.
//!
//! ```ignore
//! let enemies = Query::new(world.registry(), &["actor", "enemy"])?;
//! for entity in world.query(&enemies) {
//!     println!("{}", entity.id());
//! }
//! ```
//!
//! One-shot lookups should use `World::query_entities`, which does not
//! register identifiers it has never seen.

use std::fmt;

use crate::{
    entity::Entity,
    error::Result,
    registry::{Archetype, Registry},
};

/// A compiled query.
#[derive(Clone, PartialEq, Eq)]
pub struct Query {
    tags: Vec<String>,
    mask: Archetype,
}

impl Query {
    /// Compile `tags` against `registry`, assigning bits to new identifiers.
    ///
    /// The registry must be the one the queried world uses.
    pub fn new<S: AsRef<str>>(registry: &Registry, tags: &[S]) -> Result<Self> {
        Ok(Self {
            tags: tags.iter().map(|t| t.as_ref().to_owned()).collect(),
            mask: registry.mask_for(tags)?,
        })
    }

    /// Compile a query that requires `baseline` plus `extra`.
    pub fn with_baseline<B, S>(registry: &Registry, baseline: &[B], extra: &[S]) -> Result<Self>
    where
        B: AsRef<str>,
        S: AsRef<str>,
    {
        let mut tags: Vec<&str> = baseline.iter().map(|t| t.as_ref()).collect();
        tags.extend(extra.iter().map(|t| t.as_ref()));
        Self::new(registry, &tags)
    }

    /// The matching-everything query.
    #[must_use]
    pub fn all() -> Self {
        Self {
            tags: Vec::new(),
            mask: Archetype::empty(),
        }
    }

    /// Required mask.
    #[must_use]
    pub const fn mask(&self) -> &Archetype {
        &self.mask
    }

    /// Tags this query was compiled from.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Check a signature against the query.
    #[must_use]
    pub fn matches_archetype(&self, archetype: &Archetype) -> bool {
        archetype.contains_all(&self.mask)
    }

    /// Check a single entity against the query.
    #[must_use]
    pub fn matches(&self, entity: &Entity) -> bool {
        self.matches_archetype(entity.archetype())
    }
}

impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("tags", &self.tags)
            .field("mask", &self.mask)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items;

    #[test]
    fn test_superset_matching() {
        let registry = Registry::new();
        let entity = Entity::make(&registry, items!["actor", "enemy", "boss"]).unwrap();

        assert!(Query::new(&registry, &["actor"]).unwrap().matches(&entity));
        assert!(Query::new(&registry, &["boss", "actor"]).unwrap().matches(&entity));
        assert!(!Query::new(&registry, &["actor", "player"]).unwrap().matches(&entity));
        assert!(Query::all().matches(&entity));
    }

    #[test]
    fn test_query_compiled_before_identifier_exists() {
        let registry = Registry::new();
        let query = Query::new(&registry, &["late"]).unwrap();

        let entity = Entity::make(&registry, items!["late", "other"]).unwrap();
        assert!(query.matches(&entity));
    }

    #[test]
    fn test_baseline() {
        let registry = Registry::new();
        let query = Query::with_baseline(&registry, &["node", "xform"], &["player"]).unwrap();

        assert_eq!(query.tags(), ["node", "xform", "player"]);
        assert_eq!(query.mask(), &registry.mask_for(&["player", "xform", "node"]).unwrap());
    }
}
