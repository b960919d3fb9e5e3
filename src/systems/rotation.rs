//! Sprite rotation systems.
//!
//! - [`link_sprite_rotation_system`] – resolves the roll and ground-control
//!   handles of a freshly added [`SpriteRotation`]
//! - [`rotation_system`] – steps every controller and writes the visible
//!   [`Rotation`]
//!
//! # System Ordering
//!
//! Must run **after** [`move_poll_system`](crate::systems::moves::move_poll_system).

use bevy_ecs::prelude::*;

use crate::components::actorphysics::ActorPhysics;
use crate::components::movemanager::MoveManager;
use crate::components::rotation::{Rotation, SpriteRotation};
use crate::resources::worldtime::WorldTime;

/// Link controllers added since the last run to their actor's moves.
pub fn link_sprite_rotation_system(
    mut query: Query<(&mut SpriteRotation, &MoveManager), Added<SpriteRotation>>,
) {
    for (mut sprite_rotation, manager) in query.iter_mut() {
        if sprite_rotation.roll_handle().is_none()
            && sprite_rotation.ground_control_handle().is_none()
        {
            sprite_rotation.resolve_links(&manager.states());
        }
    }
}

/// Advance every rotation controller by one variable-rate frame.
pub fn rotation_system(
    mut query: Query<(
        &mut SpriteRotation,
        &ActorPhysics,
        Option<&MoveManager>,
        Option<&mut Rotation>,
    )>,
    time: Res<WorldTime>,
) {
    for (mut sprite_rotation, physics, manager, rotation) in query.iter_mut() {
        let states = manager.map(|m| m.states());
        let degrees = sprite_rotation.step(physics, states.as_ref(), time.delta);
        if let Some(mut rotation) = rotation {
            rotation.degrees = degrees;
        }
    }
}
