use crate::components::moves::{Move, MoveContext, MoveGroup, MoveKind};
use crate::resources::input::InputAction;

/// Rolling stance.
///
/// Available on the ground above `min_speed`, entered by holding Down. The
/// roll carries through jumps and ramps and only ends once the actor is back
/// on the ground below `unroll_speed`.
#[derive(Debug, Clone)]
pub struct Roll {
    pub min_speed: f32,
    pub unroll_speed: f32,
}

impl Roll {
    pub fn new(min_speed: f32, unroll_speed: f32) -> Self {
        Self {
            min_speed,
            unroll_speed,
        }
    }
}

impl Move for Roll {
    fn kind(&self) -> MoveKind {
        MoveKind::ROLL
    }

    fn group(&self) -> Option<MoveGroup> {
        Some(MoveGroup::STANCE)
    }

    fn available(&self, ctx: &MoveContext) -> bool {
        ctx.physics.grounded && ctx.physics.ground_speed() >= self.min_speed
    }

    fn input_activate(&self, ctx: &MoveContext) -> bool {
        ctx.input.held(InputAction::Down)
    }

    fn input_deactivate(&self, ctx: &MoveContext) -> bool {
        ctx.physics.grounded && ctx.physics.ground_speed() < self.unroll_speed
    }
}
