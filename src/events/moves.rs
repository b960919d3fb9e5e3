//! Move notification event.
//!
//! Every notification a [`MoveManager`](crate::components::movemanager::MoveManager)
//! emits (`Active`, `End`, `Available`, `Unavailable`, `Added`, `Removed`) is
//! re-broadcast by the move systems as a [`MoveEvent`], in emission order, so
//! that animation bindings, audio or other actors can react through
//! observers.
//!
//! # Usage
//!
//! ```ignore
//! fn on_move(trigger: On<MoveEvent>) {
//!     let event = trigger.event();
//!     if event.kind == MoveKind::ROLL && event.event == MoveEventKind::Active {
//!         // play the spin sound
//!     }
//! }
//!
//! world.add_observer(on_move);
//! ```

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::movemanager::{MoveEventKind, MoveNotification};
use crate::components::moves::MoveKind;

/// Event emitted for every move notification of an actor.
///
/// # Fields
///
/// - `entity` – the actor owning the move
/// - `kind` – the move the notification is about
/// - `event` – what happened
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct MoveEvent {
    pub entity: Entity,
    pub kind: MoveKind,
    pub event: MoveEventKind,
}

impl MoveEvent {
    pub fn from_notification(entity: Entity, notification: MoveNotification) -> Self {
        Self {
            entity,
            kind: notification.kind,
            event: notification.event,
        }
    }
}

/// Observer that logs every move event at debug level.
pub fn log_move_event_observer(trigger: On<MoveEvent>) {
    let event = trigger.event();
    debug!(
        "MoveEvent {:?}: '{}' {:?}",
        event.entity, event.kind, event.event
    );
}
