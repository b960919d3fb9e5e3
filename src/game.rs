//! High-level setup of the motion simulation.
//!
//! - [`setup_world`] – a [`World`] with the motion resources and the move event observer
//! - [`spawn_actor`] – an actor carrying the reference moves, animator parameters
//!   and a linked [`SpriteRotation`]
//! - [`build_update_schedule`] / [`build_fixed_schedule`] – the variable-rate and
//!   fixed-rate passes with their ordering constraints
//! - [`FrameDriver`] – runs both passes for one host frame

use bevy_ecs::prelude::*;
use log::{info, warn};

use crate::components::actorphysics::ActorPhysics;
use crate::components::animator::AnimatorParameters;
use crate::components::movemanager::MoveManager;
use crate::components::moves::{MoveBindings, MoveError};
use crate::components::rotation::{Rotation, SpriteRotation};
use crate::events::moves::log_move_event_observer;
use crate::moves::{Duck, GroundControl, Roll, Spindash};
use crate::resources::gameconfig::{MotionConfig, MoveTuning};
use crate::resources::input::InputState;
use crate::resources::worldtime::WorldTime;
use crate::systems::moves::{
    move_disable_system, move_fixed_update_system, move_poll_system, move_presentation_sync,
};
use crate::systems::rotation::{link_sprite_rotation_system, rotation_system};
use crate::systems::time::update_world_time;

/// Animator parameter names driven by the reference moves.
pub mod params {
    pub const GROUNDED: &str = "Grounded";
    pub const ROLL: &str = "Roll";
    pub const ROLLING: &str = "Rolling";
    pub const DUCKING: &str = "Ducking";
    pub const CAN_DUCK: &str = "CanDuck";
    pub const SPINDASH: &str = "Spindash";
    pub const SPINDASHING: &str = "Spindashing";
}

/// Fixed steps run per frame at most. Leftover time is dropped.
pub const MAX_FIXED_STEPS: u32 = 8;

/// Create a world holding the motion resources.
pub fn setup_world(config: MotionConfig) -> World {
    let mut world = World::new();
    world.insert_resource(
        WorldTime::default()
            .with_time_scale(config.time_scale)
            .with_fixed_hz(config.fixed_hz),
    );
    world.insert_resource(InputState::default());
    world.insert_resource(config);
    world.add_observer(log_move_event_observer);
    // Ensure the observer is registered before we run any systems that may trigger events.
    world.flush();
    world
}

/// Build a manager holding the reference moves in registration order.
///
/// `Spindash` is registered after `Duck` since it resolves the duck move
/// when attached.
pub fn default_move_manager(tuning: &MoveTuning) -> Result<MoveManager, MoveError> {
    let mut manager = MoveManager::new();
    manager.add_with_bindings(
        GroundControl::new(),
        MoveBindings::from_names(None, Some(params::GROUNDED), None),
    )?;
    manager.add_with_bindings(
        Roll::new(tuning.roll_min_speed, tuning.unroll_speed),
        MoveBindings::from_names(Some(params::ROLL), Some(params::ROLLING), None),
    )?;
    manager.add_with_bindings(
        Duck::new(tuning.duck_max_speed),
        MoveBindings::from_names(None, Some(params::DUCKING), Some(params::CAN_DUCK)),
    )?;
    manager.add_with_bindings(
        Spindash::new(
            tuning.spindash_charge_step,
            tuning.spindash_max_charge,
            tuning.spindash_charge_decay,
        ),
        MoveBindings::from_names(Some(params::SPINDASH), Some(params::SPINDASHING), None),
    )?;
    Ok(manager)
}

/// Spawn an actor with the reference moves.
///
/// Tunables come from the [`MotionConfig`] resource, or the defaults when it
/// is missing.
pub fn spawn_actor(world: &mut World, physics: ActorPhysics) -> Result<Entity, MoveError> {
    let config = match world.get_resource::<MotionConfig>() {
        Some(config) => config.clone(),
        None => {
            warn!("No MotionConfig resource, spawning actor with defaults");
            MotionConfig::new()
        }
    };
    let manager = default_move_manager(&config.moves)?;
    let sprite_rotation = SpriteRotation::new(config.rotation).link(&manager.states());
    let entity = world
        .spawn((
            physics,
            manager,
            sprite_rotation,
            Rotation::default(),
            AnimatorParameters::default(),
        ))
        .id();
    info!("Spawned actor {:?}", entity);
    Ok(entity)
}

/// Variable-rate pass.
///
/// Anything reading Active flags runs after the poll so it sees the states
/// decided this frame.
pub fn build_update_schedule() -> Schedule {
    let mut update = Schedule::default();
    update.add_systems(move_disable_system);
    update.add_systems(move_poll_system.after(move_disable_system));
    update.add_systems(move_presentation_sync.after(move_poll_system));
    update.add_systems(link_sprite_rotation_system);
    update.add_systems(
        rotation_system
            .after(move_poll_system)
            .after(link_sprite_rotation_system),
    );
    update
}

/// Fixed-rate pass.
pub fn build_fixed_schedule() -> Schedule {
    let mut fixed = Schedule::default();
    fixed.add_systems(move_fixed_update_system);
    fixed
}

/// Runs the fixed and variable passes for one host frame.
pub struct FrameDriver {
    pub update: Schedule,
    pub fixed: Schedule,
    accumulator: f32,
}

impl FrameDriver {
    pub fn new(world: &mut World) -> Result<Self, String> {
        let mut update = build_update_schedule();
        let mut fixed = build_fixed_schedule();
        update
            .initialize(world)
            .map_err(|e| format!("Failed to initialize update schedule: {}", e))?;
        fixed
            .initialize(world)
            .map_err(|e| format!("Failed to initialize fixed schedule: {}", e))?;
        Ok(Self {
            update,
            fixed,
            accumulator: 0.0,
        })
    }

    /// Advance time by `dt` unscaled seconds. Returns the number of fixed
    /// steps that ran.
    pub fn frame(&mut self, world: &mut World, dt: f32) -> u32 {
        update_world_time(world, dt);
        let (delta, fixed_delta) = {
            let time = world.resource::<WorldTime>();
            (time.delta, time.fixed_delta)
        };

        self.accumulator += delta;
        let mut steps = 0;
        while self.accumulator >= fixed_delta && steps < MAX_FIXED_STEPS {
            self.fixed.run(world);
            self.accumulator -= fixed_delta;
            steps += 1;
        }
        if steps == MAX_FIXED_STEPS {
            self.accumulator = self.accumulator.min(fixed_delta);
        }

        self.update.run(world);
        world.clear_trackers(); // Clear changed components for next frame
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::moves::MoveKind;

    #[test]
    fn default_manager_registers_reference_moves_in_order() {
        let manager = default_move_manager(&MoveTuning::default()).unwrap();
        let kinds: Vec<_> = manager.entries().iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                MoveKind::GROUND_CONTROL,
                MoveKind::ROLL,
                MoveKind::DUCK,
                MoveKind::SPINDASH
            ]
        );
    }

    #[test]
    fn spawned_rotation_is_linked() {
        let mut world = setup_world(MotionConfig::new());
        let entity = spawn_actor(&mut world, ActorPhysics::default()).unwrap();
        let sprite_rotation = world.get::<SpriteRotation>(entity).unwrap();
        assert!(sprite_rotation.roll_handle().is_some());
        assert!(sprite_rotation.ground_control_handle().is_some());
    }

    #[test]
    fn fixed_steps_follow_accumulated_time() {
        let mut world = setup_world(MotionConfig::new());
        let mut driver = FrameDriver::new(&mut world).unwrap();
        assert_eq!(driver.frame(&mut world, 1.0 / 120.0), 0);
        assert_eq!(driver.frame(&mut world, 1.0 / 120.0 + 1e-4), 1);
        assert_eq!(driver.frame(&mut world, 1.0), MAX_FIXED_STEPS);
    }
}
