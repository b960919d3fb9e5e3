use crate::components::moves::{Move, MoveContext, MoveGroup, MoveKind};
use crate::resources::input::InputAction;

/// Crouch. Only possible on the ground below `max_speed`, lasts while Down
/// is held.
#[derive(Debug, Clone)]
pub struct Duck {
    pub max_speed: f32,
}

impl Duck {
    pub fn new(max_speed: f32) -> Self {
        Self { max_speed }
    }
}

impl Move for Duck {
    fn kind(&self) -> MoveKind {
        MoveKind::DUCK
    }

    fn group(&self) -> Option<MoveGroup> {
        Some(MoveGroup::STANCE)
    }

    fn available(&self, ctx: &MoveContext) -> bool {
        ctx.physics.grounded && ctx.physics.ground_speed() < self.max_speed
    }

    fn input_activate(&self, ctx: &MoveContext) -> bool {
        ctx.input.held(InputAction::Down)
    }

    fn input_deactivate(&self, ctx: &MoveContext) -> bool {
        !ctx.input.held(InputAction::Down) || !ctx.physics.grounded
    }
}
