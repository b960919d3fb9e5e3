//! Move systems.
//!
//! - [`move_disable_system`] – ends Active moves when [`MovesDisabled`] is
//!   inserted and resumes the manager when it is removed
//! - [`move_poll_system`] – per-frame availability/input poll and
//!   `on_active_update`, then re-broadcasts notifications as [`MoveEvent`]s
//! - [`move_fixed_update_system`] – `on_active_fixed_update` on the fixed step
//! - [`move_presentation_sync`] – pushes triggers and keeps the animator
//!   booleans equal to each move's state
//!
//! # System Ordering
//!
//! `move_disable_system` → `move_poll_system` → `move_presentation_sync`.
//! Anything reading Active flags (the rotation system) must run after
//! `move_poll_system` so it sees this frame's states.

use bevy_ecs::prelude::*;

use crate::components::actorphysics::ActorPhysics;
use crate::components::animator::AnimatorParameters;
use crate::components::movemanager::{MoveManager, MovesDisabled};
use crate::components::moves::{MoveEnv, MoveState};
use crate::events::moves::MoveEvent;
use crate::resources::input::InputState;
use crate::resources::worldtime::WorldTime;

fn flush_notifications(entity: Entity, manager: &mut MoveManager, commands: &mut Commands) {
    for notification in manager.drain_notifications() {
        commands.trigger(MoveEvent::from_notification(entity, notification));
    }
}

/// Apply insertion and removal of [`MovesDisabled`].
pub fn move_disable_system(
    mut query: Query<(
        Entity,
        &mut MoveManager,
        &ActorPhysics,
        Option<Ref<MovesDisabled>>,
    )>,
    mut removed: RemovedComponents<MovesDisabled>,
    input: Res<InputState>,
    time: Res<WorldTime>,
    mut commands: Commands,
) {
    for (entity, mut manager, physics, marker) in query.iter_mut() {
        if marker.is_some_and(|m| m.is_added()) {
            manager.disable(MoveEnv::new(physics, &input, time.delta));
            flush_notifications(entity, &mut manager, &mut commands);
        }
    }
    for entity in removed.read() {
        if let Ok((_, mut manager, _, None)) = query.get_mut(entity) {
            manager.enable();
        }
    }
}

/// Poll every enabled manager and run its Active moves' update hooks.
pub fn move_poll_system(
    mut query: Query<(Entity, &mut MoveManager, &ActorPhysics)>,
    input: Res<InputState>,
    time: Res<WorldTime>,
    mut commands: Commands,
) {
    for (entity, mut manager, physics) in query.iter_mut() {
        let env = MoveEnv::new(physics, &input, time.delta);
        manager.poll(env);
        manager.update(env);
        flush_notifications(entity, &mut manager, &mut commands);
    }
}

/// Run the Active moves' fixed-step hooks.
pub fn move_fixed_update_system(
    mut query: Query<(Entity, &mut MoveManager, &ActorPhysics)>,
    input: Res<InputState>,
    time: Res<WorldTime>,
    mut commands: Commands,
) {
    for (entity, mut manager, physics) in query.iter_mut() {
        manager.fixed_update(MoveEnv::new(physics, &input, time.fixed_delta));
        flush_notifications(entity, &mut manager, &mut commands);
    }
}

/// Push move state to the animator parameters.
///
/// Actors without [`AnimatorParameters`] still get their trigger queue
/// cleared so it cannot grow.
pub fn move_presentation_sync(
    mut query: Query<(&mut MoveManager, Option<&mut AnimatorParameters>)>,
) {
    for (mut manager, animator) in query.iter_mut() {
        let triggers = manager.drain_triggers();
        let Some(mut animator) = animator else {
            continue;
        };
        for trigger in triggers {
            animator.set_trigger(trigger);
        }
        for entry in manager.entries() {
            let bindings = entry.bindings();
            if let Some(id) = bindings.active_bool {
                animator.set_bool(id, entry.state() == MoveState::Active);
            }
            if let Some(id) = bindings.available_bool {
                animator.set_bool(id, entry.state() == MoveState::Available);
            }
        }
    }
}
