use crate::components::moves::{Move, MoveContext, MoveKind, MoveState};

/// Ground locomotion.
///
/// Becomes Available on landing and activates itself on the next poll; ends
/// as soon as the actor leaves the ground.
#[derive(Debug, Clone)]
pub struct GroundControl {
    /// Last horizontal direction the actor was steered in (-1, 0 or 1).
    pub facing: f32,
}

impl Default for GroundControl {
    fn default() -> Self {
        Self::new()
    }
}

impl GroundControl {
    pub fn new() -> Self {
        Self { facing: 1.0 }
    }
}

impl Move for GroundControl {
    fn kind(&self) -> MoveKind {
        MoveKind::GROUND_CONTROL
    }

    fn available(&self, ctx: &MoveContext) -> bool {
        ctx.physics.grounded
    }

    fn input_activate(&self, _ctx: &MoveContext) -> bool {
        true
    }

    fn input_deactivate(&self, ctx: &MoveContext) -> bool {
        !ctx.physics.grounded
    }

    fn on_active_enter(&mut self, _previous: MoveState, ctx: &MoveContext) {
        if ctx.physics.ground_velocity != 0.0 {
            self.facing = ctx.physics.ground_velocity.signum();
        }
    }

    fn on_active_update(&mut self, ctx: &MoveContext) {
        let axis = ctx.input.horizontal();
        if axis != 0.0 {
            self.facing = axis;
        }
    }
}
