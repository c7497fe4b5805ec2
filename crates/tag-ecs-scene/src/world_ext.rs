//! World extension for scene nodes.

use std::sync::Arc;

use tag_ecs::{ComponentKind, Entity, EntityId, Item, World};

use crate::{
    components::{MeshComp, NodeComp, PhysicsBody, Xform},
    error::{Result, SceneError},
    node::{NodeBinding, SceneNode},
};

/// Debug view of a node entity, for inspector tooling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inspection {
    pub entity: EntityId,
    /// Archetype signature as a hex string.
    pub archetype: String,
    /// Attached identifiers in attachment order.
    pub components: Vec<String>,
}

/// Extension trait for scene-node entities.
pub trait SceneWorldExt {
    /// Add `node` as an entity carrying `items` plus the defaults for its
    /// kind: `xform` for transforms (and `physics_body` if one is attached),
    /// `mesh` for meshes, and always `node`.
    ///
    /// The returned binding is what the host hands back to
    /// [`node_destroyed`](Self::node_destroyed). A node backs at most one
    /// entity; adding a bound node fails with [`SceneError::AlreadyBound`].
    fn add_node_entity<I>(&mut self, node: Arc<dyn SceneNode>, items: I) -> Result<NodeBinding>
    where
        I: IntoIterator<Item = Item>;

    /// Host-side teardown hook: remove the bound entity if it is still bound.
    ///
    /// Returns `Ok(false)` when the entity side already tore down.
    fn node_destroyed(&mut self, binding: &NodeBinding) -> Result<bool>;

    /// Entities with `node` and every identifier in `extra`.
    fn query_nodes<S: AsRef<str>>(&self, extra: &[S]) -> Vec<&Entity>;

    /// Entities with `node`, `xform` and every identifier in `extra`.
    fn query_xforms<S: AsRef<str>>(&self, extra: &[S]) -> Vec<&Entity>;

    /// Entities with `node`, `xform`, `mesh` and every identifier in `extra`.
    fn query_meshes<S: AsRef<str>>(&self, extra: &[S]) -> Vec<&Entity>;

    /// Describe a live entity.
    fn inspect(&self, id: EntityId) -> Option<Inspection>;
}

impl SceneWorldExt for World {
    fn add_node_entity<I>(&mut self, node: Arc<dyn SceneNode>, items: I) -> Result<NodeBinding>
    where
        I: IntoIterator<Item = Item>,
    {
        if !node.metadata().reserve() {
            return Err(SceneError::AlreadyBound {
                node: node.name().to_owned(),
            });
        }

        let kind = node.kind();
        let binding = NodeBinding::new(node.clone());

        let mut all: Vec<Item> = items.into_iter().collect();
        if kind.has_transform() {
            all.push(Xform::new(node.clone()).into());
            if node.has_physics_body() {
                all.push(PhysicsBody::new(node.clone()).into());
            }
            if kind.is_mesh() {
                all.push(MeshComp::new(node.clone()).into());
            }
        }
        all.push(NodeComp::new(binding.clone()).into());

        let id = match self.add_entity(all) {
            Ok(id) => id,
            Err(err) => {
                node.metadata().release();
                return Err(err.into());
            }
        };
        node.metadata().bind(id);
        tracing::debug!(entity = %id, node = node.name(), ?kind, "bound node entity");

        Ok(binding)
    }

    fn node_destroyed(&mut self, binding: &NodeBinding) -> Result<bool> {
        let Some(id) = binding.take() else {
            return Ok(false);
        };
        tracing::debug!(entity = %id, node = binding.node().name(), "host node destroyed");
        self.remove_entity(id).map_err(SceneError::from)
    }

    fn query_nodes<S: AsRef<str>>(&self, extra: &[S]) -> Vec<&Entity> {
        self.query_with_baseline(&[NodeComp::ID], extra)
    }

    fn query_xforms<S: AsRef<str>>(&self, extra: &[S]) -> Vec<&Entity> {
        self.query_with_baseline(&[NodeComp::ID, Xform::ID], extra)
    }

    fn query_meshes<S: AsRef<str>>(&self, extra: &[S]) -> Vec<&Entity> {
        self.query_with_baseline(&[NodeComp::ID, Xform::ID, MeshComp::ID], extra)
    }

    fn inspect(&self, id: EntityId) -> Option<Inspection> {
        let entity = self.entity(id)?;
        Some(Inspection {
            entity: id,
            archetype: entity.archetype().to_string(),
            components: entity.component_ids().map(str::to_owned).collect(),
        })
    }
}
