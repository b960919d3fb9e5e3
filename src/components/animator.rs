//! Parameter block shared with the external animation-state machine.
//!
//! Moves never talk to the animator directly; the presentation sync system
//! writes their state into [`AnimatorParameters`] through pre-resolved
//! [`ParamId`]s.

use std::hash::Hasher;

use bevy_ecs::prelude::Component;
use rustc_hash::{FxHashMap, FxHashSet, FxHasher};
use serde::{Deserialize, Serialize};

/// Pre-hashed handle for a named animator parameter.
///
/// Hash once at setup with [`ParamId::from_name`] and keep the id; the
/// per-frame path never touches strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParamId(pub u64);

impl ParamId {
    pub fn from_name(name: &str) -> Self {
        let mut hasher = FxHasher::default();
        hasher.write(name.as_bytes());
        Self(hasher.finish())
    }

    /// `None` for an empty or missing name, which disables the binding.
    pub fn optional(name: Option<&str>) -> Option<Self> {
        name.filter(|n| !n.is_empty()).map(Self::from_name)
    }
}

/// Boolean parameters and one-shot triggers read by the animation layer.
#[derive(Debug, Clone, Default, Component)]
pub struct AnimatorParameters {
    pub bools: FxHashMap<ParamId, bool>,
    pub triggers: FxHashSet<ParamId>,
}

impl AnimatorParameters {
    pub fn set_bool(&mut self, id: ParamId, value: bool) {
        self.bools.insert(id, value);
    }
    pub fn get_bool(&self, id: ParamId) -> bool {
        self.bools.get(&id).copied().unwrap_or(false)
    }
    /// Raise a trigger. Raising an already raised trigger is a no-op.
    pub fn set_trigger(&mut self, id: ParamId) {
        self.triggers.insert(id);
    }
    pub fn has_trigger(&self, id: ParamId) -> bool {
        self.triggers.contains(&id)
    }
    /// Consume a trigger, returning whether it was raised.
    pub fn consume_trigger(&mut self, id: ParamId) -> bool {
        self.triggers.remove(&id)
    }
}
