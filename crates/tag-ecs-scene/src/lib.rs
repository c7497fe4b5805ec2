//! Scene-graph adapter for tag-ecs.
//!
//! Binds host scene nodes to entities. A node entity carries `node` plus
//! `xform`, `mesh` and `physics_body` as the node's shape dictates, and the
//! two sides tear each other down exactly once:
//!
//! - removing the entity destroys the host node (the `node` disposer)
//! - destroying the host node removes the entity
//!   ([`SceneWorldExt::node_destroyed`])
//!
//! The guard is the [`NodeMetadata`] slot each host node carries, so a node
//! backs at most one entity.
//!
//! ```ignore
//! use tag_ecs_scene::prelude::*;
//!
//! let binding = world.add_node_entity(player_mesh, items!["player"])?;
//! for entity in world.query_meshes(&["player"]) {
//!     let mesh = entity.get::<MeshComp>().unwrap();
//! }
//! world.node_destroyed(&binding)?;
//! ```

mod components;
mod error;
mod node;
mod world_ext;

pub use components::{MeshComp, NodeComp, PhysicsBody, Xform};
pub use error::{Result, SceneError};
pub use node::{NodeBinding, NodeKind, NodeMetadata, SceneNode};
pub use world_ext::{Inspection, SceneWorldExt};

/// Prelude for convenient imports
pub mod prelude {
    pub use tag_ecs::prelude::*;

    pub use crate::{
        MeshComp, NodeBinding, NodeComp, NodeKind, NodeMetadata, PhysicsBody, SceneError,
        SceneNode, SceneWorldExt, Xform,
    };
}
