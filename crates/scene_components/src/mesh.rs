//! Mesh rendering.

use scene_component::{Component, EntityId, SerializeAttr, impl_reflect};
use scene_math::Vec4;
use tracing::trace;
use uuid::Uuid;

/// Draws a mesh asset at its entity's world transform.
///
/// `visible` mirrors whether the component is live and is what a renderer
/// would check each frame; it is driven by the lifecycle hooks and never
/// persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshRenderer {
    /// Mesh asset GUID.
    pub mesh: Uuid,
    /// Material asset override; `None` uses the entity's material.
    pub material: Option<Uuid>,
    /// Multiplied into the material's base color.
    pub tint: Vec4,
    pub cast_shadows: bool,
    visible: bool,
}

impl_reflect!(MeshRenderer as "MeshRenderer" {
    mesh: Uuid => SerializeAttr::new().required(),
    material: Option<Uuid> => SerializeAttr::new(),
    tint: Vec4 => SerializeAttr::new(),
    cast_shadows: bool => SerializeAttr::new().key("castShadows"),
});

impl Component for MeshRenderer {
    fn on_enable(&mut self, owner: EntityId) {
        trace!(entity = %owner, mesh = %self.mesh, "mesh shown");
        self.visible = true;
    }

    fn on_disable(&mut self, owner: EntityId) {
        trace!(entity = %owner, mesh = %self.mesh, "mesh hidden");
        self.visible = false;
    }
}

impl Default for MeshRenderer {
    fn default() -> Self {
        Self {
            mesh: Uuid::nil(),
            material: None,
            tint: Vec4::ONE,
            cast_shadows: true,
            visible: false,
        }
    }
}

impl MeshRenderer {
    #[must_use]
    pub fn new(mesh: Uuid) -> Self {
        Self {
            mesh,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_material(mut self, material: Uuid) -> Self {
        self.material = Some(material);
        self
    }

    /// Returns `true` while the component is attached, enabled, and its
    /// entity is active.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Material to draw with, falling back to the entity's.
    #[must_use]
    pub fn effective_material(&self, entity_material: Option<Uuid>) -> Option<Uuid> {
        self.material.or(entity_material)
    }
}
