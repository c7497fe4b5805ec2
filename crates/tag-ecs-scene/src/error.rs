//! Error types for the scene adapter.

use tag_ecs::EcsError;
use thiserror::Error;

/// Errors from binding and tearing down node entities.
#[derive(Debug, Error)]
pub enum SceneError {
    /// The entity store rejected the operation.
    #[error(transparent)]
    Ecs(#[from] EcsError),

    /// The node already backs a live entity.
    #[error("node `{node}` is already bound to an entity")]
    AlreadyBound { node: String },
}

/// Result alias for scene operations.
pub type Result<T> = std::result::Result<T, SceneError>;
