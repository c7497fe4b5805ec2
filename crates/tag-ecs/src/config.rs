//! Configuration for registries and worlds.
//!
//! Both structs deserialize with every field optional, so an application can
//! embed them in its own config file.

use serde::Deserialize;

/// Archetype registry configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Maximum number of distinct identifiers. `None` is unbounded.
    pub max_identifiers: Option<usize>,
}

impl RegistryConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of distinct identifiers.
    #[must_use]
    pub fn max_identifiers(mut self, max: usize) -> Self {
        self.max_identifiers = Some(max);
        self
    }
}

/// World configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Initial capacity of each new archetype bucket.
    pub bucket_capacity: usize,
    /// Settings for the registry a world creates for itself.
    ///
    /// Ignored when the world is handed an existing registry.
    pub registry: RegistryConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            bucket_capacity: 4,
            registry: RegistryConfig::default(),
        }
    }
}

impl WorldConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial capacity of new buckets.
    #[must_use]
    pub fn bucket_capacity(mut self, capacity: usize) -> Self {
        self.bucket_capacity = capacity;
        self
    }

    /// Set the registry configuration.
    #[must_use]
    pub fn registry(mut self, registry: RegistryConfig) -> Self {
        self.registry = registry;
        self
    }
}
