//! Per-frame action input resource.
//!
//! Captures the platformer actions moves care about and exposes them to
//! systems via the [`InputState`] resource. The host reads its devices and
//! calls [`InputState::set_held`] once per action per frame; edges
//! (`just_pressed` / `just_released`) are derived from the previous frame.
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Boolean action state with edge flags.
pub struct BoolState {
    /// Whether the action is currently held this frame.
    pub active: bool,
    /// Whether the action was just pressed this frame.
    pub just_pressed: bool,
    /// Whether the action was just released this frame.
    pub just_released: bool,
}

impl BoolState {
    fn update(&mut self, held: bool) {
        self.just_pressed = held && !self.active;
        self.just_released = !held && self.active;
        self.active = held;
    }
}

/// Actions a platformer actor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    Left,
    Right,
    Up,
    Down,
    Jump,
}

/// Resource capturing the per-frame action state relevant to moves.
#[derive(Resource, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct InputState {
    pub left: BoolState,
    pub right: BoolState,
    pub up: BoolState,
    pub down: BoolState,
    pub jump: BoolState,
}

impl InputState {
    pub fn state(&self, action: InputAction) -> &BoolState {
        match action {
            InputAction::Left => &self.left,
            InputAction::Right => &self.right,
            InputAction::Up => &self.up,
            InputAction::Down => &self.down,
            InputAction::Jump => &self.jump,
        }
    }

    fn state_mut(&mut self, action: InputAction) -> &mut BoolState {
        match action {
            InputAction::Left => &mut self.left,
            InputAction::Right => &mut self.right,
            InputAction::Up => &mut self.up,
            InputAction::Down => &mut self.down,
            InputAction::Jump => &mut self.jump,
        }
    }

    /// Record whether `action` is held this frame and derive its edges.
    pub fn set_held(&mut self, action: InputAction, held: bool) {
        self.state_mut(action).update(held);
    }

    pub fn held(&self, action: InputAction) -> bool {
        self.state(action).active
    }

    pub fn just_pressed(&self, action: InputAction) -> bool {
        self.state(action).just_pressed
    }

    pub fn just_released(&self, action: InputAction) -> bool {
        self.state(action).just_released
    }

    /// Signed horizontal axis: -1 left, 1 right, 0 for none or both.
    pub fn horizontal(&self) -> f32 {
        match (self.left.active, self.right.active) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}
