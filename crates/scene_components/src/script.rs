//! Script components.
//!
//! A [`Script`] only names its source and class; the running instance lives
//! in an external scripting runtime and is referred to by an opaque handle.
//! Runtimes plug into cloning through
//! [`ComponentHost`](scene_graph::ComponentHost).

use scene_component::{Component, EntityId, SerializeAttr, impl_reflect};
use tracing::debug;

/// A script attached to an entity.
///
/// The runtime instance handle is neither persisted nor copied by scene cloning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    /// Script asset path.
    pub source: String,
    /// Class instantiated from the script.
    pub class_name: String,
    instance: Option<u64>,
}

impl_reflect!(Script as "Script" {
    source: String => SerializeAttr::new().key("script").required(),
    class_name: String => SerializeAttr::new().key("class"),
});

impl Component for Script {
    fn on_destroy(&mut self, owner: EntityId) {
        if let Some(handle) = self.instance.take() {
            debug!(entity = %owner, handle, "script instance released");
        }
    }
}

impl Script {
    #[must_use]
    pub fn new(source: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            class_name: class_name.into(),
            instance: None,
        }
    }

    /// Attach a runtime instance handle.
    pub fn bind(&mut self, handle: u64) {
        self.instance = Some(handle);
    }

    /// The runtime instance handle, if a runtime created this script.
    #[must_use]
    pub fn instance(&self) -> Option<u64> {
        self.instance
    }
}
