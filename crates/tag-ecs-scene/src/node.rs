//! Host scene nodes and the binding that ties one to an entity.

use std::{fmt, sync::Arc};

use parking_lot::Mutex;
use tag_ecs::EntityId;

/// Shape of a host node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Plain node without a transform.
    Node,
    /// Node with a transform.
    Transform,
    /// Renderable mesh. Every mesh is also a transform.
    Mesh,
}

impl NodeKind {
    /// Check if nodes of this kind carry a transform.
    #[must_use]
    pub const fn has_transform(self) -> bool {
        matches!(self, Self::Transform | Self::Mesh)
    }

    #[must_use]
    pub const fn is_mesh(self) -> bool {
        matches!(self, Self::Mesh)
    }
}

/// A node owned by the host scene graph.
///
/// Implementations are handles: `destroy` takes `&self` and the host is
/// expected to make it safe to call from any thread.
pub trait SceneNode: Send + Sync {
    /// Display name, used in logs.
    fn name(&self) -> &str;

    fn kind(&self) -> NodeKind;

    /// Check if a physics body is attached. Only meaningful for transforms.
    fn has_physics_body(&self) -> bool {
        false
    }

    /// Per-node slot recording the bound entity.
    ///
    /// Each node must return the same slot on every call.
    fn metadata(&self) -> &NodeMetadata;

    /// Release the node on the host side.
    fn destroy(&self);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Slot {
    #[default]
    Unbound,
    /// An entity is being built for the node.
    Reserved,
    Bound(EntityId),
}

/// Entity slot carried by every host node.
///
/// Both teardown directions take the slot; only the side that finds it
/// occupied acts, so the node is destroyed once and the entity is removed
/// once no matter which side starts. A node holds at most one entity.
#[derive(Debug, Default)]
pub struct NodeMetadata {
    slot: Mutex<Slot>,
}

impl NodeMetadata {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The bound entity, if neither side has torn down yet.
    #[must_use]
    pub fn entity(&self) -> Option<EntityId> {
        match *self.slot.lock() {
            Slot::Bound(id) => Some(id),
            Slot::Unbound | Slot::Reserved => None,
        }
    }

    /// Claim an unbound slot. Fails if the node is bound or being bound.
    pub(crate) fn reserve(&self) -> bool {
        let mut slot = self.slot.lock();
        if *slot != Slot::Unbound {
            return false;
        }
        *slot = Slot::Reserved;
        true
    }

    /// Give back a reservation whose entity was never created.
    pub(crate) fn release(&self) {
        let mut slot = self.slot.lock();
        if *slot == Slot::Reserved {
            *slot = Slot::Unbound;
        }
    }

    pub(crate) fn bind(&self, id: EntityId) {
        *self.slot.lock() = Slot::Bound(id);
    }

    /// Empty the slot, returning the entity that was bound.
    pub(crate) fn take(&self) -> Option<EntityId> {
        let mut slot = self.slot.lock();
        match *slot {
            Slot::Bound(id) => {
                *slot = Slot::Unbound;
                Some(id)
            }
            Slot::Unbound | Slot::Reserved => None,
        }
    }
}

/// Handle linking a host node to its entity.
///
/// The slot lives on the node, so every binding of one node sees the same
/// entity.
#[derive(Clone)]
pub struct NodeBinding {
    node: Arc<dyn SceneNode>,
}

impl NodeBinding {
    #[must_use]
    pub fn new(node: Arc<dyn SceneNode>) -> Self {
        Self { node }
    }

    /// The host node.
    #[must_use]
    pub fn node(&self) -> &Arc<dyn SceneNode> {
        &self.node
    }

    /// The bound entity, if neither side has torn down yet.
    #[must_use]
    pub fn entity(&self) -> Option<EntityId> {
        self.node.metadata().entity()
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.entity().is_some()
    }

    pub(crate) fn take(&self) -> Option<EntityId> {
        self.node.metadata().take()
    }

    /// Check if two bindings refer to one node.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }
}

impl fmt::Debug for NodeBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeBinding")
            .field("node", &self.node.name())
            .field("kind", &self.node.kind())
            .field("entity", &self.entity())
            .finish()
    }
}
