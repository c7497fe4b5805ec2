//! Components attached to node entities.
//!
//! Each one claims a single opaque field named after what it wraps, so a
//! caller-supplied component using the same name conflicts instead of
//! silently shadowing it.

use std::{fmt, sync::Arc};

use tag_ecs::{Component, DisposeError};

use crate::node::{NodeBinding, SceneNode};

/// The host node itself. Disposing it destroys the node, once.
#[derive(Component)]
#[component(id = "node", dispose = NodeComp::release)]
pub struct NodeComp {
    #[component(opaque)]
    value: NodeBinding,
}

impl NodeComp {
    #[must_use]
    pub fn new(binding: NodeBinding) -> Self {
        Self { value: binding }
    }

    #[must_use]
    pub fn binding(&self) -> &NodeBinding {
        &self.value
    }

    #[must_use]
    pub fn node(&self) -> &Arc<dyn SceneNode> {
        self.value.node()
    }

    fn release(&mut self) -> Result<(), DisposeError> {
        if let Some(entity) = self.value.take() {
            tracing::debug!(%entity, node = self.value.node().name(), "destroying host node");
            self.value.node().destroy();
        }
        Ok(())
    }
}

/// Transform of a node.
#[derive(Component)]
#[component(id = "xform")]
pub struct Xform {
    #[component(opaque)]
    xform: Arc<dyn SceneNode>,
}

impl Xform {
    #[must_use]
    pub fn new(node: Arc<dyn SceneNode>) -> Self {
        Self { xform: node }
    }

    #[must_use]
    pub fn node(&self) -> &Arc<dyn SceneNode> {
        &self.xform
    }
}

/// Renderable mesh of a node.
#[derive(Component)]
#[component(id = "mesh")]
pub struct MeshComp {
    #[component(opaque)]
    mesh: Arc<dyn SceneNode>,
}

impl MeshComp {
    #[must_use]
    pub fn new(node: Arc<dyn SceneNode>) -> Self {
        Self { mesh: node }
    }

    #[must_use]
    pub fn node(&self) -> &Arc<dyn SceneNode> {
        &self.mesh
    }
}

/// Physics body attached to a transform node.
#[derive(Component)]
pub struct PhysicsBody {
    #[component(opaque)]
    physics_body: Arc<dyn SceneNode>,
}

impl PhysicsBody {
    #[must_use]
    pub fn new(node: Arc<dyn SceneNode>) -> Self {
        Self { physics_body: node }
    }

    #[must_use]
    pub fn node(&self) -> &Arc<dyn SceneNode> {
        &self.physics_body
    }
}

macro_rules! debug_by_node {
    ($($ty:ident),*) => {
        $(
            impl fmt::Debug for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.debug_tuple(stringify!($ty)).field(&self.node().name()).finish()
                }
            }
        )*
    };
}

debug_by_node!(NodeComp, Xform, MeshComp, PhysicsBody);
