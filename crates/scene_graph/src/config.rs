//! Scene configuration.

use std::ops::Range;

use scene_component::{MAX_ENTITY_ID, MIN_ENTITY_ID};

/// Configuration for a scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneConfig {
    /// Human-readable scene name (e.g. `"Main"`).
    pub name: String,
    /// Range entity ids are allocated from. Defaults to `[1000, 10000)`.
    pub entity_ids: Range<u32>,
}

impl SceneConfig {
    /// Create a new scene config with the given name and the default id range.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entity_ids: MIN_ENTITY_ID..MAX_ENTITY_ID,
        }
    }

    /// Rename the scene.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Override the entity id range.
    #[must_use]
    pub fn with_entity_ids(mut self, ids: Range<u32>) -> Self {
        self.entity_ids = ids;
        self
    }

    /// Maximum number of entities this configuration can allocate.
    #[must_use]
    pub fn max_entities(&self) -> u32 {
        self.entity_ids.end.saturating_sub(self.entity_ids.start)
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
