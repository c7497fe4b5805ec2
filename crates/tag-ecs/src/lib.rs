#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]

//! Tag ECS - archetype-indexed entity store with tag queries
//!
//! Entities are bags of tags and components. Each distinct identifier gets
//! one bit in a shared [`Registry`]; an entity's signature is the union of
//! its bits, and the [`World`] buckets entities by exact signature so that
//! queries test whole buckets at once.
//!
//! # Key Concepts
//!
//! - **Tag**: A bare identifier such as `"actor"` or `"enemy"`
//! - **Component**: A value with an identifier and optional named fields
//! - **Archetype**: The bit-set signature of an entity's identifiers
//! - **Query**: A required mask; matches every superset signature
//! - **Event bus**: `add` / `remove` callbacks filtered by required tags
//!
//! ```ignore
//! use tag_ecs::prelude::*;
//!
//! #[derive(Component)]
//! #[component(id = "door")]
//! struct Door { locked: bool }
//!
//! let mut world = World::new();
//! world.on(EntityEvent::Add, &["door"], |e| println!("door {}", e.id()))?;
//!
//! let id = world.add_entity(items!["actor", Door { locked: true }])?;
//! assert_eq!(world.entity(id).unwrap().field("locked"), Some(Value::Bool(true)));
//! assert_eq!(world.query_entities(&["actor", "door"]).len(), 1);
//! ```

#[allow(unused_extern_crates)]
extern crate self as tag_ecs;

mod component;
mod config;
mod entity;
mod error;
mod event;
mod query;
mod registry;
mod world;

pub use component::{AsAny, Component, ComponentKind, FieldValue, Item, Tag, Value, ValueError};
pub use config::{RegistryConfig, WorldConfig};
pub use entity::{Entity, EntityId, EntityMut};
pub use error::{DisposeError, EcsError, Result};
pub use event::{EntityEvent, EventBus};
pub use query::Query;
pub use registry::{Archetype, Registry};
/// Derive [`Component`] and [`ComponentKind`] for a struct.
pub use tag_ecs_derive::Component;
pub use world::World;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Component, ComponentKind, DisposeError, EcsError, Entity, EntityEvent, EntityId, Item,
        Query, Registry, Value, World, items,
    };
}
