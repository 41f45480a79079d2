//! Entity identifiers and allocation utilities.
//!
//! An [`EntityId`] is a dense `u32` drawn from a bounded range. Entity ids
//! share the render-pick id space with editor gizmos, so the ranges are kept
//! disjoint and an id can be classified without a scene lookup:
//!
//! ```text
//! [MIN_ENTITY_ID, MAX_ENTITY_ID)   entities
//! [GIZMO_ID_START, NO_PICK_ID)     gizmos and other non-entity pick targets
//! NO_PICK_ID                       "nothing under the cursor"
//! ```

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::IdError;

/// First id handed out to an entity.
pub const MIN_ENTITY_ID: u32 = 1000;

/// Exclusive upper bound of the entity id range.
pub const MAX_ENTITY_ID: u32 = 10_000;

/// Number of entities a scene can allocate over its lifetime.
pub const MAX_SUPPORTED_ENTITIES: u32 = MAX_ENTITY_ID - MIN_ENTITY_ID;

/// First id of the gizmo pick range.
pub const GIZMO_ID_START: u32 = 900_000;

/// Reserved pick value meaning "no target".
pub const NO_PICK_ID: u32 = u32::MAX;

/// A scene-scoped entity identifier.
///
/// Ids are only meaningful inside the scene that allocated them. They are
/// used for O(1) lookup and as the live binding of reference handles; the
/// entity's GUID is what survives save/load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Create an entity id from a raw `u32`.
    #[must_use]
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw `u32` identifier.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// What a raw pick id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickTarget {
    /// An id inside the entity range.
    Entity(EntityId),
    /// A gizmo handle id (offset from [`GIZMO_ID_START`]).
    Gizmo(u32),
    /// Background, sentinel, or an id outside every known range.
    None,
}

/// Classify a raw pick id using the default entity range.
#[must_use]
pub fn classify_pick_id(id: u32) -> PickTarget {
    if (MIN_ENTITY_ID..MAX_ENTITY_ID).contains(&id) {
        PickTarget::Entity(EntityId(id))
    } else if (GIZMO_ID_START..NO_PICK_ID).contains(&id) {
        PickTarget::Gizmo(id - GIZMO_ID_START)
    } else {
        PickTarget::None
    }
}

/// Allocates strictly increasing entity ids from a bounded range.
///
/// Ids are never recycled: a destroyed entity's id stays retired for the
/// lifetime of the allocator.
#[derive(Debug, Clone)]
pub struct EntityIdAllocator {
    range: Range<u32>,
    next_id: u32,
}

impl EntityIdAllocator {
    /// Creates an allocator over the default `[MIN_ENTITY_ID, MAX_ENTITY_ID)` range.
    #[must_use]
    pub fn new() -> Self {
        Self::with_range(MIN_ENTITY_ID..MAX_ENTITY_ID)
    }

    /// Creates an allocator over a custom range.
    #[must_use]
    pub fn with_range(range: Range<u32>) -> Self {
        Self {
            next_id: range.start,
            range,
        }
    }

    /// Allocates a fresh entity id.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::Exhausted`] once the range has been used up.
    pub fn allocate(&mut self) -> Result<EntityId, IdError> {
        if self.next_id >= self.range.end {
            return Err(IdError::Exhausted {
                min: self.range.start,
                max: self.range.end,
            });
        }
        let id = self.next_id;
        self.next_id += 1;
        Ok(EntityId(id))
    }

    /// Returns the number of ids allocated so far.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.next_id - self.range.start
    }

    /// Returns how many ids can still be allocated.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.range.end.saturating_sub(self.next_id)
    }

    /// Returns `true` if `id` lies inside this allocator's range.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.range.contains(&id.0)
    }

    /// The configured id range.
    #[must_use]
    pub fn range(&self) -> Range<u32> {
        self.range.clone()
    }
}

impl Default for EntityIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
