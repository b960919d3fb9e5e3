//! Move capability contract.
//!
//! A *move* is one discrete player capability (rolling, ducking, a spindash)
//! with its own three-state lifecycle:
//!
//! ```text
//! Unavailable ──► Available ──► Active
//!      ▲              ▲  │         │
//!      └──────────────┴──┴─────────┘
//! ```
//!
//! # Architecture
//!
//! - **Behaviour lives in a [`Move`] trait object.** Every method has a default
//!   so a concrete move only implements the hooks it needs.
//! - **State lives in the manager.** The current [`MoveState`] of each move is
//!   stored in a [`MoveEntry`] owned by
//!   [`MoveManager`](crate::components::movemanager::MoveManager); a move
//!   never writes its own state.
//! - **Hooks see a read-only [`MoveContext`].** Predicates and callbacks get the
//!   actor's physics snapshot, input, the frame delta and a read-only view of
//!   sibling move states. They cannot call back into the manager, so a
//!   transition can never schedule another poll inside the same pass.
//!
//! # Related
//!
//! - [`crate::components::movemanager`] – transition authority and poll loop
//! - [`crate::events::moves::MoveEvent`] – ECS event fired on every notification
//! - [`crate::moves`] – reference move implementations

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::actorphysics::ActorPhysics;
use crate::components::animator::ParamId;
use crate::resources::input::InputState;

/// Lifecycle state of a move. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MoveState {
    #[default]
    Unavailable,
    Available,
    Active,
}

/// Capability tag identifying a move inside one actor's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MoveKind(pub &'static str);

impl MoveKind {
    pub const GROUND_CONTROL: MoveKind = MoveKind("ground_control");
    pub const ROLL: MoveKind = MoveKind("roll");
    pub const DUCK: MoveKind = MoveKind("duck");
    pub const SPINDASH: MoveKind = MoveKind("spindash");
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Exclusion group: at most one move per group may be Active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MoveGroup(pub &'static str);

impl MoveGroup {
    /// Ground stances that replace one another (rolling, ducking, charging).
    pub const STANCE: MoveGroup = MoveGroup("stance");
}

/// Stable handle to a registered move.
///
/// Handles are never reused by the manager that issued them, so a cached
/// handle to a removed move simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveHandle(pub u32);

/// Animator parameters driven by one move.
///
/// Each binding is optional; an unset binding is skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveBindings {
    /// Trigger raised once each time the move becomes Active.
    pub active_trigger: Option<ParamId>,
    /// Boolean kept equal to "state is Active" every frame.
    pub active_bool: Option<ParamId>,
    /// Boolean kept equal to "state is Available" every frame.
    pub available_bool: Option<ParamId>,
}

impl MoveBindings {
    /// Resolve parameter names to handles once, at setup.
    pub fn from_names(
        active_trigger: Option<&str>,
        active_bool: Option<&str>,
        available_bool: Option<&str>,
    ) -> Self {
        Self {
            active_trigger: ParamId::optional(active_trigger),
            active_bool: ParamId::optional(active_bool),
            available_bool: ParamId::optional(available_bool),
        }
    }
}

/// Setup and programming errors. Invalid requests are not errors, they
/// return `Ok(false)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("move '{0}' is not registered on this actor")]
    NotRegistered(MoveKind),

    #[error("move '{0}' is already registered on this actor")]
    DuplicateMove(MoveKind),

    #[error("move '{dependent}' requires move '{required}' on the same actor")]
    MissingDependency {
        dependent: MoveKind,
        required: MoveKind,
    },
}

/// Manager bookkeeping for one registered move.
#[derive(Debug, Clone)]
pub struct MoveEntry {
    pub(crate) handle: MoveHandle,
    pub(crate) kind: MoveKind,
    pub(crate) group: Option<MoveGroup>,
    pub(crate) state: MoveState,
    pub(crate) input_activated: bool,
    pub(crate) input_enabled: bool,
    pub(crate) bindings: MoveBindings,
}

impl MoveEntry {
    pub fn handle(&self) -> MoveHandle {
        self.handle
    }
    pub fn kind(&self) -> MoveKind {
        self.kind
    }
    pub fn group(&self) -> Option<MoveGroup> {
        self.group
    }
    pub fn state(&self) -> MoveState {
        self.state
    }
    /// Whether the current Active state was entered through player input.
    pub fn input_activated(&self) -> bool {
        self.input_activated
    }
    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }
    pub fn bindings(&self) -> &MoveBindings {
        &self.bindings
    }
}

/// Read-only view over the moves registered on one actor.
#[derive(Clone, Copy)]
pub struct MoveStates<'a> {
    entries: &'a [MoveEntry],
    index: &'a FxHashMap<MoveHandle, usize>,
}

impl<'a> MoveStates<'a> {
    pub(crate) fn new(entries: &'a [MoveEntry], index: &'a FxHashMap<MoveHandle, usize>) -> Self {
        Self { entries, index }
    }

    pub fn entry(&self, kind: MoveKind) -> Option<&'a MoveEntry> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    pub fn handle_of(&self, kind: MoveKind) -> Option<MoveHandle> {
        self.entry(kind).map(|e| e.handle)
    }

    pub fn state(&self, kind: MoveKind) -> Option<MoveState> {
        self.entry(kind).map(|e| e.state)
    }

    pub fn state_of(&self, handle: MoveHandle) -> Option<MoveState> {
        self.index.get(&handle).map(|&i| self.entries[i].state)
    }

    pub fn is_active(&self, kind: MoveKind) -> bool {
        self.state(kind) == Some(MoveState::Active)
    }

    pub fn is_handle_active(&self, handle: MoveHandle) -> bool {
        self.state_of(handle) == Some(MoveState::Active)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a MoveEntry> + 'a {
        self.entries.iter()
    }
}

/// Per-call inputs handed to the manager by the driving system.
#[derive(Clone, Copy)]
pub struct MoveEnv<'a> {
    pub physics: &'a ActorPhysics,
    pub input: &'a InputState,
    /// Seconds covered by this pass (variable or fixed step).
    pub delta: f32,
}

impl<'a> MoveEnv<'a> {
    pub fn new(physics: &'a ActorPhysics, input: &'a InputState, delta: f32) -> Self {
        Self {
            physics,
            input,
            delta,
        }
    }
}

/// Context passed to every [`Move`] predicate and hook.
pub struct MoveContext<'a> {
    pub physics: &'a ActorPhysics,
    pub input: &'a InputState,
    pub delta: f32,
    /// States of every move on this actor, including the one being called.
    pub moves: MoveStates<'a>,
}

/// Behaviour of a single move.
///
/// Predicates are polled by the manager every frame; hooks run on state
/// transitions and every tick while Active. Defaults: always available,
/// never input-activated, never input-deactivated, hooks do nothing.
pub trait Move: Send + Sync + 'static {
    /// Registry tag. Must be unique per actor.
    fn kind(&self) -> MoveKind;

    /// Exclusion group enforced by the manager.
    fn group(&self) -> Option<MoveGroup> {
        None
    }

    /// Resolve sibling dependencies once, right after registration.
    ///
    /// Returning an error aborts the registration.
    fn on_attach(&mut self, _moves: &MoveStates) -> Result<(), MoveError> {
        Ok(())
    }

    /// Whether domain conditions allow this move to be Available.
    fn available(&self, _ctx: &MoveContext) -> bool {
        true
    }

    /// Whether current input should activate this move.
    fn input_activate(&self, _ctx: &MoveContext) -> bool {
        false
    }

    /// Whether current input should end this move.
    fn input_deactivate(&self, _ctx: &MoveContext) -> bool {
        false
    }

    fn on_state_changed(&mut self, _previous: MoveState, _ctx: &MoveContext) {}

    fn on_active_enter(&mut self, _previous: MoveState, _ctx: &MoveContext) {}

    /// Every variable-rate frame while Active.
    fn on_active_update(&mut self, _ctx: &MoveContext) {}

    /// Every fixed-rate physics step while Active.
    fn on_active_fixed_update(&mut self, _ctx: &MoveContext) {}

    fn on_active_exit(&mut self, _ctx: &MoveContext) {}

    /// Another move was registered on the same actor.
    fn on_move_added(&mut self, _kind: MoveKind, _moves: &MoveStates) {}

    /// Another move was removed from the same actor.
    fn on_move_removed(&mut self, _kind: MoveKind) {}
}
