//! World - entities bucketed by archetype signature.
//!
//! The world keeps one bucket per distinct signature. Queries test each
//! bucket's signature once and then take the whole bucket, so their cost
//! grows with the number of archetypes, not the number of entities.
//!
//! Worlds built from clones of one [`Registry`] share bit assignments;
//! each world has its own buckets and its own [`EventBus`].

use hashbrown::HashMap;

use crate::{
    component::Item,
    config::WorldConfig,
    entity::{Entity, EntityId, EntityMut},
    error::{EcsError, Result},
    event::{EntityEvent, EventBus},
    query::Query,
    registry::{Archetype, Registry},
};

/// Entities sharing one exact signature, in insertion order.
struct Bucket {
    archetype: Archetype,
    entities: Vec<Entity>,
}

/// The entity store.
pub struct World {
    registry: Registry,
    config: WorldConfig,
    /// Buckets in creation order.
    buckets: Vec<Bucket>,
    /// Signature -> index into `buckets`.
    bucket_index: HashMap<Archetype, usize>,
    /// Live entity -> index into `buckets`.
    locations: HashMap<EntityId, usize>,
    events: EventBus,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Create a world with its own registry.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(WorldConfig::default())
    }

    /// Create a world with its own registry built from `config.registry`.
    #[must_use]
    pub fn from_config(config: WorldConfig) -> Self {
        let registry = Registry::with_config(config.registry.clone());
        Self::with_config(registry, config)
    }

    /// Create a world sharing `registry` with other worlds.
    #[must_use]
    pub fn with_registry(registry: Registry) -> Self {
        Self::with_config(registry, WorldConfig::default())
    }

    /// Create a world sharing `registry`, with explicit settings.
    ///
    /// `config.registry` is ignored; the handle's own settings apply.
    #[must_use]
    pub fn with_config(registry: Registry, config: WorldConfig) -> Self {
        Self {
            events: EventBus::new(registry.clone()),
            registry,
            config,
            buckets: Vec::new(),
            bucket_index: HashMap::new(),
            locations: HashMap::new(),
        }
    }

    /// The registry this world compiles signatures against.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    // ==================== Entity Operations ====================

    /// Build an entity from `items`, store it and emit `add`.
    ///
    /// Fails without touching the world if any item conflicts.
    pub fn add_entity<I>(&mut self, items: I) -> Result<EntityId>
    where
        I: IntoIterator<Item = Item>,
    {
        let entity = Entity::make(&self.registry, items)?;
        let id = entity.id();

        let bucket = self.bucket_for(entity.archetype());
        self.buckets[bucket].entities.push(entity);
        self.locations.insert(id, bucket);

        let entity = self.buckets[bucket]
            .entities
            .last()
            .ok_or(EcsError::EntityNotFound(id))?;
        tracing::debug!(entity = %id, archetype = %entity.archetype(), "entity added");
        self.events.emit(EntityEvent::Add, entity);

        Ok(id)
    }

    /// Attach a tag or component to a live entity.
    ///
    /// The entity moves to the bucket of its new signature (appended at the
    /// end). No event is emitted. On error the entity is unchanged.
    pub fn add_component(&mut self, id: EntityId, item: Item) -> Result<()> {
        let (bucket, row) = self.find(id).ok_or(EcsError::EntityNotFound(id))?;

        let current = &mut self.buckets[bucket];
        let entity = &mut current.entities[row];
        entity.add_comp(&self.registry, item)?;

        if *entity.archetype() == current.archetype {
            return Ok(());
        }

        let entity = self.buckets[bucket].entities.remove(row);
        let target = self.bucket_for(entity.archetype());
        tracing::debug!(entity = %id, archetype = %entity.archetype(), "entity moved");
        self.buckets[target].entities.push(entity);
        self.locations.insert(id, target);

        Ok(())
    }

    /// Remove an entity, emit `remove`, then run its disposers.
    ///
    /// Returns `Ok(false)` if the entity is not in this world. A disposer
    /// error is returned after the entity has already left the world.
    pub fn remove_entity(&mut self, id: EntityId) -> Result<bool> {
        let Some((bucket, row)) = self.find(id) else {
            return Ok(false);
        };

        let mut entity = self.buckets[bucket].entities.remove(row);
        self.locations.remove(&id);
        tracing::debug!(entity = %id, "entity removed");

        self.events.emit(EntityEvent::Remove, &entity);
        entity.dispose()?;

        Ok(true)
    }

    /// Remove every entity.
    ///
    /// The index is emptied first; then each entity emits `remove` and is
    /// disposed. Disposal continues past failures and the first error is
    /// returned.
    pub fn clear(&mut self) -> Result<()> {
        let buckets = std::mem::take(&mut self.buckets);
        self.bucket_index.clear();
        self.locations.clear();

        let mut first_error = None;
        let mut removed = 0usize;
        for bucket in buckets {
            for mut entity in bucket.entities {
                self.events.emit(EntityEvent::Remove, &entity);
                if let Err(err) = entity.dispose() {
                    first_error.get_or_insert(err);
                }
                removed += 1;
            }
        }
        tracing::debug!(removed, "world cleared");

        first_error.map_or(Ok(()), Err)
    }

    /// Get a live entity.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        let (bucket, row) = self.find(id)?;
        Some(&self.buckets[bucket].entities[row])
    }

    /// Get a mutable view of a live entity.
    #[must_use]
    pub fn entity_mut(&mut self, id: EntityId) -> Option<EntityMut<'_>> {
        let (bucket, row) = self.find(id)?;
        Some(EntityMut::new(&mut self.buckets[bucket].entities[row]))
    }

    /// Check if an entity is live in this world.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.locations.contains_key(&id)
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Number of distinct signatures seen since the last `clear`.
    #[must_use]
    pub fn archetype_count(&self) -> usize {
        self.buckets.len()
    }

    /// Iterate over every live entity, bucket by bucket.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.buckets.iter().flat_map(|b| b.entities.iter())
    }

    // ==================== Queries ====================

    /// Entities carrying every tag or component identifier in `tags`.
    ///
    /// Identifiers never seen before are not registered; they simply match
    /// nothing.
    #[must_use]
    pub fn query_entities<S: AsRef<str>>(&self, tags: &[S]) -> Vec<&Entity> {
        match self.registry.lookup_mask(tags) {
            Some(mask) => self.matching(mask).collect(),
            None => Vec::new(),
        }
    }

    /// Entities carrying every identifier in `baseline` and in `extra`.
    #[must_use]
    pub fn query_with_baseline<B, S>(&self, baseline: &[B], extra: &[S]) -> Vec<&Entity>
    where
        B: AsRef<str>,
        S: AsRef<str>,
    {
        let mut tags: Vec<&str> = baseline.iter().map(|t| t.as_ref()).collect();
        tags.extend(extra.iter().map(|t| t.as_ref()));
        self.query_entities(&tags)
    }

    /// Run a compiled query.
    pub fn query(&self, query: &Query) -> impl Iterator<Item = &Entity> {
        self.matching(query.mask().clone())
    }

    /// Compile a query against this world's registry.
    pub fn compile_query<S: AsRef<str>>(&self, tags: &[S]) -> Result<Query> {
        Query::new(&self.registry, tags)
    }

    fn matching(&self, mask: Archetype) -> impl Iterator<Item = &Entity> {
        self.buckets
            .iter()
            .filter(move |b| b.archetype.contains_all(&mask))
            .flat_map(|b| b.entities.iter())
    }

    // ==================== Events ====================

    /// Subscribe to lifecycle events for entities carrying `tags`.
    pub fn on<S, F>(&mut self, kind: EntityEvent, tags: &[S], handler: F) -> Result<()>
    where
        S: AsRef<str>,
        F: Fn(&Entity) + Send + Sync + 'static,
    {
        self.events.on(kind, tags, handler)
    }

    /// Emit an event for `entity` to this world's subscribers.
    pub fn emit(&self, kind: EntityEvent, entity: &Entity) -> usize {
        self.events.emit(kind, entity)
    }

    #[must_use]
    pub const fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    // ==================== Internals ====================

    fn bucket_for(&mut self, archetype: &Archetype) -> usize {
        if let Some(&idx) = self.bucket_index.get(archetype) {
            return idx;
        }

        let idx = self.buckets.len();
        self.buckets.push(Bucket {
            archetype: archetype.clone(),
            entities: Vec::with_capacity(self.config.bucket_capacity),
        });
        self.bucket_index.insert(archetype.clone(), idx);
        tracing::trace!(%archetype, bucket = idx, "created bucket");

        idx
    }

    /// Bucket and row of a live entity. The row is found by a linear scan.
    fn find(&self, id: EntityId) -> Option<(usize, usize)> {
        let &bucket = self.locations.get(&id)?;
        let row = self.buckets[bucket]
            .entities
            .iter()
            .position(|e| e.id() == id)?;
        Some((bucket, row))
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("entities", &self.len())
            .field("archetypes", &self.buckets.len())
            .field("subscriptions", &self.events.len())
            .finish()
    }
}
