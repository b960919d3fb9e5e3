//! Spindash: charge speed while ducking, release by letting go of Down.
//!
//! The move depends on [`Duck`](super::duck::Duck) being registered on the
//! same actor. The duck handle is resolved once in `on_attach` (registration
//! fails with [`MoveError::MissingDependency`] otherwise) and kept up to date
//! through the add/remove notifications.

use log::debug;

use crate::components::moves::{
    Move, MoveContext, MoveError, MoveHandle, MoveKind, MoveState, MoveStates,
};
use crate::resources::input::InputAction;

#[derive(Debug, Clone)]
pub struct Spindash {
    /// Charge added per Jump press.
    pub charge_step: f32,
    pub max_charge: f32,
    /// Fraction of the charge kept per second while no press happens.
    pub charge_decay: f32,
    /// Accumulated charge of the current spindash.
    pub charge: f32,
    /// Charge at the moment of the last release, for the controller to read.
    pub released_charge: Option<f32>,
    duck: Option<MoveHandle>,
    // the press that activated the move must not count twice
    entered_this_frame: bool,
}

impl Spindash {
    pub fn new(charge_step: f32, max_charge: f32, charge_decay: f32) -> Self {
        Self {
            charge_step,
            max_charge,
            charge_decay,
            charge: 0.0,
            released_charge: None,
            duck: None,
            entered_this_frame: false,
        }
    }

    fn add_charge(&mut self) {
        self.charge = (self.charge + self.charge_step).min(self.max_charge);
    }
}

impl Move for Spindash {
    fn kind(&self) -> MoveKind {
        MoveKind::SPINDASH
    }

    fn on_attach(&mut self, moves: &MoveStates) -> Result<(), MoveError> {
        self.duck = Some(moves.handle_of(MoveKind::DUCK).ok_or(
            MoveError::MissingDependency {
                dependent: MoveKind::SPINDASH,
                required: MoveKind::DUCK,
            },
        )?);
        Ok(())
    }

    fn available(&self, ctx: &MoveContext) -> bool {
        self.duck.is_some_and(|duck| ctx.moves.is_handle_active(duck))
    }

    fn input_activate(&self, ctx: &MoveContext) -> bool {
        ctx.input.just_pressed(InputAction::Jump)
    }

    fn input_deactivate(&self, ctx: &MoveContext) -> bool {
        !ctx.input.held(InputAction::Down) || !ctx.physics.grounded
    }

    fn on_active_enter(&mut self, _previous: MoveState, _ctx: &MoveContext) {
        self.charge = 0.0;
        self.released_charge = None;
        self.add_charge();
        self.entered_this_frame = true;
    }

    fn on_active_update(&mut self, ctx: &MoveContext) {
        if std::mem::take(&mut self.entered_this_frame) {
            return;
        }
        if ctx.input.just_pressed(InputAction::Jump) {
            self.add_charge();
        } else {
            self.charge *= self.charge_decay.powf(ctx.delta);
        }
    }

    fn on_active_exit(&mut self, _ctx: &MoveContext) {
        debug!("Spindash released with charge {:.2}", self.charge);
        self.released_charge = Some(self.charge);
        self.charge = 0.0;
        self.entered_this_frame = false;
    }

    fn on_move_added(&mut self, kind: MoveKind, moves: &MoveStates) {
        if kind == MoveKind::DUCK {
            self.duck = moves.handle_of(kind);
        }
    }

    fn on_move_removed(&mut self, kind: MoveKind) {
        if kind == MoveKind::DUCK {
            self.duck = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::actorphysics::ActorPhysics;
    use crate::resources::input::InputState;
    use rustc_hash::FxHashMap;

    fn context<'a>(
        physics: &'a ActorPhysics,
        input: &'a InputState,
        index: &'a FxHashMap<MoveHandle, usize>,
    ) -> MoveContext<'a> {
        MoveContext {
            physics,
            input,
            delta: 1.0 / 60.0,
            moves: MoveStates::new(&[], index),
        }
    }

    #[test]
    fn activating_press_is_not_counted_twice() {
        let (physics, index) = (ActorPhysics::default(), FxHashMap::default());
        let mut input = InputState::default();
        input.set_held(InputAction::Jump, true);
        let ctx = context(&physics, &input, &index);

        let mut spindash = Spindash::new(2.0, 8.0, 0.25);
        spindash.on_active_enter(MoveState::Available, &ctx);
        spindash.on_active_update(&ctx);
        assert_eq!(spindash.charge, 2.0);
        spindash.on_active_update(&ctx);
        assert_eq!(spindash.charge, 4.0);
    }

    #[test]
    fn release_before_first_update_leaves_no_pending_skip() {
        let (physics, index) = (ActorPhysics::default(), FxHashMap::default());
        let mut input = InputState::default();
        input.set_held(InputAction::Jump, true);
        let ctx = context(&physics, &input, &index);

        let mut spindash = Spindash::new(2.0, 8.0, 0.25);
        spindash.on_active_enter(MoveState::Available, &ctx);
        spindash.on_active_exit(&ctx);
        assert_eq!(spindash.released_charge, Some(2.0));

        spindash.on_active_update(&ctx);
        assert_eq!(spindash.charge, 2.0);
    }
}
