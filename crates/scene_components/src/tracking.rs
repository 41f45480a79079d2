//! Components that track other graph nodes.
//!
//! Both hold reference handles, so they are bound in the resolve pass when
//! loaded and remapped when a scene is cloned.

use scene_component::{Component, ComponentRef, EntityId, EntityRef, SerializeAttr, impl_reflect};
use scene_graph::Scene;
use scene_math::{Quat, Vec3};

/// Keeps its entity at an offset from another entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Follow {
    pub target: Option<EntityRef>,
    /// World-space offset from the target.
    pub offset: Vec3,
    /// Fraction of the remaining distance covered per update, in `[0, 1]`.
    pub smoothing: f32,
}

impl_reflect!(Follow as "Follow" {
    target: Option<EntityRef> => SerializeAttr::new(),
    offset: Vec3 => SerializeAttr::new(),
    smoothing: f32 => SerializeAttr::new(),
});

impl Component for Follow {}

impl Default for Follow {
    fn default() -> Self {
        Self {
            target: None,
            offset: Vec3::ZERO,
            smoothing: 1.0,
        }
    }
}

impl Follow {
    #[must_use]
    pub fn new(target: EntityRef, offset: Vec3) -> Self {
        Self {
            target: Some(target),
            offset,
            ..Self::default()
        }
    }

    /// Where the follower should be, or `None` if the target is gone.
    #[must_use]
    pub fn goal(&self, scene: &Scene) -> Option<Vec3> {
        let target = self.target?;
        let (position, _, _) = scene.world_trs(target.id).ok()?;
        Some(position + self.offset)
    }

    /// Move `follower` one step towards its goal.
    ///
    /// Returns `false` when there is nothing to follow.
    pub fn step(scene: &mut Scene, follower: EntityId) -> bool {
        let Some(follow) = scene
            .entity(follower)
            .and_then(|e| e.component::<Follow>())
            .cloned()
        else {
            return false;
        };
        let (Some(goal), Ok(world)) = (follow.goal(scene), scene.world_transform(follower)) else {
            return false;
        };
        let t = follow.smoothing.clamp(0.0, 1.0);
        let mut next = world;
        next.position = world.position.lerp(goal, t);
        scene.set_world_transform(follower, next).is_ok()
    }
}

/// Orients its entity towards a component on another entity (a camera
/// aiming at a light, for example).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookAt {
    pub target: Option<ComponentRef>,
}

impl_reflect!(LookAt as "LookAt" {
    target: Option<ComponentRef> => SerializeAttr::new(),
});

impl Component for LookAt {}

impl LookAt {
    #[must_use]
    pub fn new(target: ComponentRef) -> Self {
        Self {
            target: Some(target),
        }
    }

    /// World rotation that points local `-Z` from `viewer` at the target.
    ///
    /// Returns `None` if the target entity or component is missing, or if
    /// the two positions coincide.
    #[must_use]
    pub fn aim(&self, scene: &Scene, viewer: EntityId) -> Option<Quat> {
        let target = self.target?;
        let owner = scene.entity(target.entity.id)?;
        if !owner.has_component_type(target.type_id) {
            return None;
        }
        let (from, _, _) = scene.world_trs(viewer).ok()?;
        let (to, _, _) = scene.world_trs(target.entity.id).ok()?;
        let direction = (to - from).try_normalize()?;
        Some(Quat::from_rotation_arc(Vec3::NEG_Z, direction))
    }
}
