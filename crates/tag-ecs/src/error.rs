//! Error types for the entity store.

use std::fmt;

use thiserror::Error;

use crate::entity::EntityId;

/// Error raised by a component disposer.
///
/// Disposers usually wrap a host-side failure, so the source is boxed.
#[derive(Debug)]
pub struct DisposeError {
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl DisposeError {
    /// Create a disposer error with a message only.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create a disposer error wrapping an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The message this error was created with.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for DisposeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for DisposeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Entity store error type.
#[derive(Debug, Error)]
pub enum EcsError {
    /// A component field name is already present on the entity.
    #[error("duplicate component property `{field}` (from component `{component}`)")]
    Conflict {
        /// The colliding field name.
        field: String,
        /// Identifier of the component that was being attached.
        component: String,
    },

    /// More distinct identifiers than the registry allows.
    #[error("archetype registry exhausted: capacity of {capacity} identifiers reached")]
    RegistryExhausted {
        /// Configured identifier capacity.
        capacity: usize,
    },

    /// A component disposer failed while its entity was being disposed.
    #[error("disposer of component `{component}` on entity {entity} failed")]
    Disposer {
        /// Entity being disposed.
        entity: EntityId,
        /// Identifier of the failing component.
        component: String,
        /// The disposer's error.
        #[source]
        source: DisposeError,
    },

    /// No attached component exposes this field.
    #[error("unknown field `{field}`")]
    UnknownField {
        /// Requested field name.
        field: String,
    },

    /// The field exists but cannot be written.
    #[error("field `{field}` is read-only")]
    ReadOnlyField {
        /// Requested field name.
        field: String,
    },

    /// A write supplied a value of the wrong shape.
    #[error("field `{field}` expects {expected}, got {found}")]
    FieldType {
        /// Field being written.
        field: String,
        /// Expected value kind.
        expected: &'static str,
        /// Supplied value kind.
        found: &'static str,
    },

    /// The entity is not live in this world.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),
}

/// Result type for entity store operations.
pub type Result<T> = std::result::Result<T, EcsError>;
