//! Per-actor move registry and transition authority.
//!
//! The [`MoveManager`] component owns every [`Move`] attached to one actor and
//! is the only place where move states change. Nothing else can move a move
//! between [`MoveState`]s.
//!
//! # Transition contract
//!
//! `change_state(next)` is a no-op returning `false` when `next` equals the
//! current state. Otherwise it stores the new state, calls
//! [`Move::on_state_changed`] and then exactly one of:
//!
//! | leaving / entering      | hook                        | notification  |
//! |-------------------------|-----------------------------|---------------|
//! | leaving Active          | [`Move::on_active_exit`]    | `End`         |
//! | entering Active         | [`Move::on_active_enter`]   | `Active`      |
//! | entering Available      | –                           | `Available`   |
//! | entering Unavailable    | –                           | `Unavailable` |
//!
//! # Per-frame poll
//!
//! [`MoveManager::poll`] walks the input-enabled moves in registration order
//! and takes at most one step per move. Moves with input disabled are left
//! untouched until they are re-enabled or driven by `perform`/`end`.
//!
//! - Unavailable → Available when [`Move::available`] holds
//! - Available → Unavailable when it no longer holds, otherwise
//!   Available → Active when [`Move::input_activate`] holds
//! - Active → Available/Unavailable when [`Move::input_deactivate`] holds
//!
//! # Notifications
//!
//! Every notification is delivered synchronously, in order, to the listeners
//! registered with [`MoveManager::subscribe`], then queued for the driving
//! system which re-broadcasts it as a
//! [`MoveEvent`](crate::events::moves::MoveEvent).

use std::fmt;

use bevy_ecs::prelude::Component;
use log::{debug, error};
use rustc_hash::FxHashMap;
use serde::Serialize;
use smallvec::SmallVec;

use crate::components::animator::ParamId;
use crate::components::moves::{
    Move, MoveBindings, MoveContext, MoveEntry, MoveEnv, MoveError, MoveHandle, MoveKind,
    MoveState, MoveStates,
};

/// What happened to a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MoveEventKind {
    Active,
    End,
    Available,
    Unavailable,
    Added,
    Removed,
}

/// One notification emitted by a [`MoveManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveNotification {
    pub kind: MoveKind,
    pub event: MoveEventKind,
}

/// Synchronous notification listener.
///
/// Listeners only see the notification, never the manager, so they cannot
/// change the listener list or trigger transitions while being dispatched.
pub type MoveListener = Box<dyn FnMut(&MoveNotification) + Send + Sync>;

/// Marker: while present, the actor's [`MoveManager`] is disabled.
///
/// Inserting it ends every Active move once; removing it resumes polling.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct MovesDisabled;

pub type NotificationQueue = SmallVec<[MoveNotification; 8]>;
pub type TriggerQueue = SmallVec<[ParamId; 4]>;

/// Ordered collection of the moves of one actor.
#[derive(Component)]
pub struct MoveManager {
    entries: Vec<MoveEntry>,
    behaviors: Vec<Box<dyn Move>>,
    index: FxHashMap<MoveHandle, usize>,
    next_handle: u32,
    enabled: bool,
    listeners: Vec<MoveListener>,
    outbox: NotificationQueue,
    pending_triggers: TriggerQueue,
}

impl Default for MoveManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveManager {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            behaviors: Vec::new(),
            index: FxHashMap::default(),
            next_handle: 0,
            enabled: true,
            listeners: Vec::new(),
            outbox: NotificationQueue::new(),
            pending_triggers: TriggerQueue::new(),
        }
    }

    /// Register a move with no animator bindings.
    pub fn add(&mut self, behavior: impl Move) -> Result<MoveHandle, MoveError> {
        self.add_boxed(Box::new(behavior), MoveBindings::default())
    }

    /// Register a move driving the given animator parameters.
    pub fn add_with_bindings(
        &mut self,
        behavior: impl Move,
        bindings: MoveBindings,
    ) -> Result<MoveHandle, MoveError> {
        self.add_boxed(Box::new(behavior), bindings)
    }

    /// Register a boxed move.
    ///
    /// The move starts Unavailable. [`Move::on_attach`] runs before the move
    /// is inserted; if it fails, nothing is registered. On success every
    /// other move and every listener is told about the addition before this
    /// returns.
    pub fn add_boxed(
        &mut self,
        mut behavior: Box<dyn Move>,
        bindings: MoveBindings,
    ) -> Result<MoveHandle, MoveError> {
        let kind = behavior.kind();
        if self.contains(kind) {
            error!("Move '{}' registered twice", kind);
            return Err(MoveError::DuplicateMove(kind));
        }
        behavior.on_attach(&self.states())?;

        let handle = MoveHandle(self.next_handle);
        self.next_handle += 1;
        self.entries.push(MoveEntry {
            handle,
            kind,
            group: behavior.group(),
            state: MoveState::Unavailable,
            input_activated: false,
            input_enabled: true,
            bindings,
        });
        self.behaviors.push(behavior);
        self.rebuild_index();

        let states = MoveStates::new(&self.entries, &self.index);
        for (entry, behavior) in self.entries.iter().zip(self.behaviors.iter_mut()) {
            if entry.kind != kind {
                behavior.on_move_added(kind, &states);
            }
        }
        debug!("Move '{}' added as {:?}", kind, handle);
        self.notify(MoveNotification {
            kind,
            event: MoveEventKind::Added,
        });
        Ok(handle)
    }

    /// Unregister a move, ending it first if it is Active.
    pub fn remove(&mut self, kind: MoveKind, env: MoveEnv) -> Result<Box<dyn Move>, MoveError> {
        let i = self.require(kind)?;
        self.end_at(i, env);

        self.entries.remove(i);
        let removed = self.behaviors.remove(i);
        self.rebuild_index();

        for behavior in self.behaviors.iter_mut() {
            behavior.on_move_removed(kind);
        }
        debug!("Move '{}' removed", kind);
        self.notify(MoveNotification {
            kind,
            event: MoveEventKind::Removed,
        });
        Ok(removed)
    }

    /// Register a synchronous notification listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&MoveNotification) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Request activation of `kind`.
    ///
    /// Without `force` this succeeds only when the move is Available, its
    /// [`Move::available`] predicate still holds and no other move of its
    /// exclusion group is Active. With `force` availability is ignored and a
    /// conflicting Active move is ended first. Returns whether the state
    /// changed.
    pub fn perform(&mut self, kind: MoveKind, force: bool, env: MoveEnv) -> Result<bool, MoveError> {
        let i = self.require(kind)?;
        Ok(self.perform_at(i, force, false, env))
    }

    /// Request deactivation of `kind`.
    ///
    /// An Active move goes to Available, then to Unavailable if
    /// [`Move::available`] no longer holds after its exit hook ran. Returns
    /// `false` when the move was not Active.
    pub fn end(&mut self, kind: MoveKind, env: MoveEnv) -> Result<bool, MoveError> {
        let i = self.require(kind)?;
        Ok(self.end_at(i, env))
    }

    /// Evaluate availability and input predicates of every move once.
    pub fn poll(&mut self, env: MoveEnv) {
        if !self.enabled {
            return;
        }
        for i in 0..self.entries.len() {
            if !self.entries[i].input_enabled {
                continue;
            }
            match self.entries[i].state {
                MoveState::Unavailable => {
                    if self.evaluate(i, env, |m, ctx| m.available(ctx)) {
                        self.change_state(i, MoveState::Available, false, env);
                    }
                }
                MoveState::Available => {
                    if !self.evaluate(i, env, |m, ctx| m.available(ctx)) {
                        self.change_state(i, MoveState::Unavailable, false, env);
                    } else if self.evaluate(i, env, |m, ctx| m.input_activate(ctx))
                        && !self.perform_at(i, false, true, env)
                    {
                        debug!(
                            "Move '{}' input activation rejected by exclusion group",
                            self.entries[i].kind
                        );
                    }
                }
                MoveState::Active => {
                    if self.evaluate(i, env, |m, ctx| m.input_deactivate(ctx)) {
                        self.end_at(i, env);
                    }
                }
            }
        }
    }

    /// Run [`Move::on_active_update`] on every Active move.
    pub fn update(&mut self, env: MoveEnv) {
        self.for_each_active(env, |m, ctx| m.on_active_update(ctx));
    }

    /// Run [`Move::on_active_fixed_update`] on every Active move.
    pub fn fixed_update(&mut self, env: MoveEnv) {
        self.for_each_active(env, |m, ctx| m.on_active_fixed_update(ctx));
    }

    /// Stop driving moves, ending every Active move once.
    pub fn disable(&mut self, env: MoveEnv) {
        if !self.enabled {
            return;
        }
        for i in 0..self.entries.len() {
            self.end_at(i, env);
        }
        self.enabled = false;
        debug!("MoveManager disabled");
    }

    /// Resume driving moves. States catch up on the next poll.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_input_enabled(&mut self, kind: MoveKind, enabled: bool) -> Result<(), MoveError> {
        let i = self.require(kind)?;
        self.entries[i].input_enabled = enabled;
        Ok(())
    }

    pub fn states(&self) -> MoveStates<'_> {
        MoveStates::new(&self.entries, &self.index)
    }

    pub fn entries(&self) -> &[MoveEntry] {
        &self.entries
    }

    pub fn contains(&self, kind: MoveKind) -> bool {
        self.entries.iter().any(|e| e.kind == kind)
    }

    pub fn state(&self, kind: MoveKind) -> Option<MoveState> {
        self.states().state(kind)
    }

    pub fn is_active(&self, kind: MoveKind) -> bool {
        self.states().is_active(kind)
    }

    pub fn handle_of(&self, kind: MoveKind) -> Option<MoveHandle> {
        self.states().handle_of(kind)
    }

    pub fn state_of(&self, handle: MoveHandle) -> Option<MoveState> {
        self.index.get(&handle).map(|&i| self.entries[i].state)
    }

    pub fn is_handle_active(&self, handle: MoveHandle) -> bool {
        self.state_of(handle) == Some(MoveState::Active)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Take the notifications emitted since the last call.
    pub fn drain_notifications(&mut self) -> NotificationQueue {
        std::mem::take(&mut self.outbox)
    }

    /// Take the animator triggers raised since the last call.
    pub fn drain_triggers(&mut self) -> TriggerQueue {
        std::mem::take(&mut self.pending_triggers)
    }

    fn require(&self, kind: MoveKind) -> Result<usize, MoveError> {
        self.entries
            .iter()
            .position(|e| e.kind == kind)
            .ok_or_else(|| {
                error!("Move '{}' is not registered on this actor", kind);
                MoveError::NotRegistered(kind)
            })
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (i, entry) in self.entries.iter().enumerate() {
            self.index.insert(entry.handle, i);
        }
    }

    fn evaluate(
        &self,
        i: usize,
        env: MoveEnv,
        predicate: impl FnOnce(&dyn Move, &MoveContext) -> bool,
    ) -> bool {
        let ctx = MoveContext {
            physics: env.physics,
            input: env.input,
            delta: env.delta,
            moves: MoveStates::new(&self.entries, &self.index),
        };
        predicate(self.behaviors[i].as_ref(), &ctx)
    }

    fn for_each_active(&mut self, env: MoveEnv, mut hook: impl FnMut(&mut dyn Move, &MoveContext)) {
        if !self.enabled {
            return;
        }
        let ctx = MoveContext {
            physics: env.physics,
            input: env.input,
            delta: env.delta,
            moves: MoveStates::new(&self.entries, &self.index),
        };
        for (entry, behavior) in self.entries.iter().zip(self.behaviors.iter_mut()) {
            if entry.state == MoveState::Active {
                hook(behavior.as_mut(), &ctx);
            }
        }
    }

    fn conflicting_active(&self, i: usize) -> Option<usize> {
        let group = self.entries[i].group?;
        self.entries
            .iter()
            .enumerate()
            .position(|(j, e)| j != i && e.group == Some(group) && e.state == MoveState::Active)
    }

    fn perform_at(&mut self, i: usize, force: bool, via_input: bool, env: MoveEnv) -> bool {
        if !self.enabled || self.entries[i].state == MoveState::Active {
            return false;
        }
        if force {
            if let Some(j) = self.conflicting_active(i) {
                debug!(
                    "Forced '{}' ends conflicting '{}'",
                    self.entries[i].kind, self.entries[j].kind
                );
                self.end_at(j, env);
            }
        } else {
            if self.entries[i].state != MoveState::Available
                || !self.evaluate(i, env, |m, ctx| m.available(ctx))
            {
                return false;
            }
            if self.conflicting_active(i).is_some() {
                return false;
            }
        }
        self.change_state(i, MoveState::Active, via_input, env)
    }

    fn end_at(&mut self, i: usize, env: MoveEnv) -> bool {
        if self.entries[i].state != MoveState::Active {
            return false;
        }
        self.change_state(i, MoveState::Available, false, env);
        if !self.evaluate(i, env, |m, ctx| m.available(ctx)) {
            self.change_state(i, MoveState::Unavailable, false, env);
        }
        true
    }

    fn change_state(&mut self, i: usize, next: MoveState, via_input: bool, env: MoveEnv) -> bool {
        let previous = self.entries[i].state;
        if previous == next {
            return false;
        }
        let entry = &mut self.entries[i];
        entry.state = next;
        entry.input_activated = next == MoveState::Active && via_input;
        let kind = entry.kind;
        let active_trigger = entry.bindings.active_trigger;
        debug!("Move '{}': {:?} -> {:?}", kind, previous, next);

        let ctx = MoveContext {
            physics: env.physics,
            input: env.input,
            delta: env.delta,
            moves: MoveStates::new(&self.entries, &self.index),
        };
        let behavior = &mut self.behaviors[i];
        behavior.on_state_changed(previous, &ctx);

        let event = if previous == MoveState::Active {
            behavior.on_active_exit(&ctx);
            MoveEventKind::End
        } else if next == MoveState::Active {
            behavior.on_active_enter(previous, &ctx);
            if let Some(trigger) = active_trigger {
                self.pending_triggers.push(trigger);
            }
            MoveEventKind::Active
        } else if next == MoveState::Available {
            MoveEventKind::Available
        } else {
            MoveEventKind::Unavailable
        };

        self.notify(MoveNotification { kind, event });
        true
    }

    fn notify(&mut self, notification: MoveNotification) {
        for listener in self.listeners.iter_mut() {
            listener(&notification);
        }
        self.outbox.push(notification);
    }
}

impl fmt::Debug for MoveManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoveManager")
            .field("entries", &self.entries)
            .field("enabled", &self.enabled)
            .field("listeners", &self.listeners.len())
            .field("outbox", &self.outbox)
            .finish()
    }
}
