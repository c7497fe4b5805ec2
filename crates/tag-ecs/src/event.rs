//! Entity lifecycle events with per-subscription tag filters.
//!
//! Each subscription compiles its required tags into a mask once, when it
//! is registered. Every emission re-tests that mask against the entity's
//! signature, so a subscription only sees entities carrying all of its
//! tags. Subscriptions run synchronously, in registration order.
//!
//! Handlers receive `&Entity` while the owning world is borrowed, so they
//! cannot add subscriptions or touch the world during an emission.

use std::fmt;

use crate::{
    entity::Entity,
    error::Result,
    registry::{Archetype, Registry},
};

/// Lifecycle event kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityEvent {
    /// Entity was added to a world.
    Add,
    /// Entity was removed from a world, before its disposers run.
    Remove,
}

impl fmt::Display for EntityEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "add",
            Self::Remove => "remove",
        })
    }
}

/// Type-erased event handler.
pub(crate) type Handler = Box<dyn Fn(&Entity) + Send + Sync>;

struct Subscription {
    kind: EntityEvent,
    mask: Archetype,
    handler: Handler,
}

/// Ordered list of filtered subscriptions.
///
/// Masks are compiled against one registry, so a bus is always built from
/// the registry of the world it serves.
pub struct EventBus {
    registry: Registry,
    subscriptions: Vec<Subscription>,
}

impl EventBus {
    /// Create a bus whose filters compile against `registry`.
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            subscriptions: Vec::new(),
        }
    }

    /// Subscribe to `kind` for entities carrying every tag in `tags`.
    ///
    /// An empty tag list matches every entity.
    pub fn on<S, F>(&mut self, kind: EntityEvent, tags: &[S], handler: F) -> Result<()>
    where
        S: AsRef<str>,
        F: Fn(&Entity) + Send + Sync + 'static,
    {
        let mask = self.registry.mask_for(tags)?;
        tracing::trace!(%kind, %mask, index = self.subscriptions.len(), "subscribed");
        self.subscriptions.push(Subscription {
            kind,
            mask,
            handler: Box::new(handler),
        });
        Ok(())
    }

    /// Invoke every matching subscription. Returns how many ran.
    pub fn emit(&self, kind: EntityEvent, entity: &Entity) -> usize {
        let mut invoked = 0;
        for sub in &self.subscriptions {
            if sub.kind == kind && entity.archetype().contains_all(&sub.mask) {
                (sub.handler)(entity);
                invoked += 1;
            }
        }
        tracing::trace!(%kind, entity = %entity.id(), invoked, "emitted");
        invoked
    }

    /// Number of subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriptions.len())
            .finish_non_exhaustive()
    }
}
