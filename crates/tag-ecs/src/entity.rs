//! Entities - identity, signature and attached components.
//!
//! An entity owns its components in attachment order and keeps a merged
//! field surface: every field name any component claims resolves back to
//! that component. Names are unique across the entity; attaching a
//! component that claims a taken name fails with [`EcsError::Conflict`]
//! and leaves the entity untouched.

use std::{
    fmt,
    ops::Deref,
    sync::atomic::{AtomicU64, Ordering},
};

use rustc_hash::FxHashMap;

use crate::{
    component::{Component, ComponentKind, Item, Value, downcast_mut, downcast_ref},
    error::{EcsError, Result},
    registry::{Archetype, Registry},
};

/// Component fields that never propagate to the entity.
const RESERVED_FIELDS: &[&str] = &["id", "dispose"];

/// Names already taken by the entity itself.
const CORE_FIELDS: &[&str] = &["archetype", "comps", "comp", "add_comp", "is"];

/// Process-wide entity id counter. Ids are never reused.
static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(0);

/// Stable identity of an entity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    fn next() -> Self {
        Self(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw id value.
    #[must_use]
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An entity record.
pub struct Entity {
    id: EntityId,
    archetype: Archetype,
    /// Components in attachment order.
    components: Vec<Box<dyn Component>>,
    /// Component identifier -> position in `components`.
    index: FxHashMap<String, usize>,
    /// Merged field name -> position of the owning component.
    fields: FxHashMap<String, usize>,
}

impl Entity {
    /// Create an entity with no components.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: EntityId::next(),
            archetype: Archetype::empty(),
            components: Vec::new(),
            index: FxHashMap::default(),
            fields: FxHashMap::default(),
        }
    }

    /// Create an entity and attach `items` in order.
    pub fn make<I>(registry: &Registry, items: I) -> Result<Self>
    where
        I: IntoIterator<Item = Item>,
    {
        let mut entity = Self::new();
        for item in items {
            entity.add_comp(registry, item)?;
        }
        Ok(entity)
    }

    /// Attach a tag or component.
    ///
    /// Re-attaching an identifier replaces the stored instance in place.
    /// On error the entity is unchanged.
    pub fn add_comp(&mut self, registry: &Registry, item: Item) -> Result<()> {
        let component = item.into_component();
        let existing = self.index.get(component.id()).copied();

        let mut claimed: Vec<String> = Vec::with_capacity(component.fields().len());
        for &name in component.fields() {
            if RESERVED_FIELDS.contains(&name) || claimed.iter().any(|c| c == name) {
                continue;
            }
            let taken = CORE_FIELDS.contains(&name)
                || self
                    .fields
                    .get(name)
                    .is_some_and(|&owner| Some(owner) != existing);
            if taken {
                return Err(EcsError::Conflict {
                    field: name.to_owned(),
                    component: component.id().to_owned(),
                });
            }
            claimed.push(name.to_owned());
        }

        let bit = registry.bit_index(component.id())?;

        let pos = match existing {
            Some(pos) => {
                self.fields.retain(|_, owner| *owner != pos);
                self.components[pos] = component;
                pos
            }
            None => {
                let pos = self.components.len();
                self.index.insert(component.id().to_owned(), pos);
                self.components.push(component);
                self.archetype.insert(bit);
                pos
            }
        };

        for name in claimed {
            self.fields.insert(name, pos);
        }

        Ok(())
    }

    /// Get the entity's id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Get the entity's archetype signature.
    #[must_use]
    pub const fn archetype(&self) -> &Archetype {
        &self.archetype
    }

    /// Get a component by identifier.
    #[must_use]
    pub fn comp(&self, id: &str) -> Option<&dyn Component> {
        self.index.get(id).map(|&pos| &*self.components[pos])
    }

    /// Check if a component or tag is attached.
    #[must_use]
    pub fn has(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Tag test. `"*"` matches every entity.
    #[must_use]
    pub fn is(&self, tag: &str) -> bool {
        tag == "*" || self.has(tag)
    }

    /// Check that every tag is attached. An empty list matches.
    #[must_use]
    pub fn is_all<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        tags.iter().all(|t| self.has(t.as_ref()))
    }

    /// Components in attachment order.
    pub fn components(&self) -> impl Iterator<Item = &dyn Component> {
        self.components.iter().map(|c| &**c)
    }

    /// Identifiers of attached components, in attachment order.
    pub fn component_ids(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(|c| c.id())
    }

    /// Number of attached components and tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Typed access to a component.
    #[must_use]
    pub fn get<T: ComponentKind>(&self) -> Option<&T> {
        let &pos = self.index.get(T::ID)?;
        downcast_ref(&*self.components[pos])
    }

    /// Typed mutable access to a component.
    #[must_use]
    pub fn get_mut<T: ComponentKind>(&mut self) -> Option<&mut T> {
        let &pos = self.index.get(T::ID)?;
        downcast_mut(&mut *self.components[pos])
    }

    /// Read a merged field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<Value> {
        let &pos = self.fields.get(name)?;
        self.components[pos].field(name)
    }

    /// Write a merged field through to its component.
    pub fn set_field(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let &pos = self
            .fields
            .get(name)
            .ok_or_else(|| EcsError::UnknownField {
                field: name.to_owned(),
            })?;
        self.components[pos].set_field(name, value.into())
    }

    /// Identifier of the component that owns a merged field.
    #[must_use]
    pub fn field_owner(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|&pos| self.components[pos].id())
    }

    /// Names on the merged field surface (unordered).
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Run every component's disposer in attachment order.
    ///
    /// Stops at the first failure; disposers that already ran are not
    /// rolled back.
    pub fn dispose(&mut self) -> Result<()> {
        let id = self.id;
        for component in &mut self.components {
            if let Err(source) = component.dispose() {
                tracing::warn!(entity = %id, component = component.id(), error = %source, "disposer failed");
                return Err(EcsError::Disposer {
                    entity: id,
                    component: component.id().to_owned(),
                    source,
                });
            }
        }
        Ok(())
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("archetype", &self.archetype)
            .field("components", &self.component_ids().collect::<Vec<_>>())
            .finish()
    }
}

/// Mutable view of a live entity.
///
/// Allows field and typed component writes but not attachment, which would
/// change the signature behind the world's back.
pub struct EntityMut<'w> {
    entity: &'w mut Entity,
}

impl<'w> EntityMut<'w> {
    pub(crate) fn new(entity: &'w mut Entity) -> Self {
        Self { entity }
    }

    /// Write a merged field through to its component.
    pub fn set_field(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.entity.set_field(name, value)
    }

    /// Typed mutable access to a component.
    #[must_use]
    pub fn get_mut<T: ComponentKind>(&mut self) -> Option<&mut T> {
        self.entity.get_mut::<T>()
    }
}

impl Deref for EntityMut<'_> {
    type Target = Entity;

    fn deref(&self) -> &Entity {
        self.entity
    }
}
