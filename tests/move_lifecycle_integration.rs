//! Move lifecycle integration tests.
//!
//! Drive a spawned actor through [`FrameDriver`] frames and observe the
//! [`MoveEvent`]s, animator parameters and move states the systems produce.

use std::sync::{Arc, Mutex};

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;

use hedgehog::components::actorphysics::ActorPhysics;
use hedgehog::components::animator::{AnimatorParameters, ParamId};
use hedgehog::components::movemanager::{MoveEventKind, MoveManager, MovesDisabled};
use hedgehog::components::moves::{MoveEnv, MoveError, MoveKind, MoveState};
use hedgehog::events::moves::MoveEvent;
use hedgehog::game::{self, FrameDriver, params};
use hedgehog::moves::Spindash;
use hedgehog::resources::gameconfig::MotionConfig;
use hedgehog::resources::input::{InputAction, InputState};

const DT: f32 = 1.0 / 60.0;

struct Harness {
    world: World,
    driver: FrameDriver,
    actor: Entity,
    events: Arc<Mutex<Vec<MoveEvent>>>,
}

impl Harness {
    fn new(physics: ActorPhysics) -> Self {
        let mut world = game::setup_world(MotionConfig::new());
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        world.add_observer(move |trigger: On<MoveEvent>| {
            sink.lock().unwrap().push(*trigger.event());
        });
        world.flush();
        let actor = game::spawn_actor(&mut world, physics).unwrap();
        let driver = FrameDriver::new(&mut world).unwrap();
        Self {
            world,
            driver,
            actor,
            events,
        }
    }

    fn frame(&mut self, down: bool, jump: bool) {
        {
            let mut input = self.world.resource_mut::<InputState>();
            input.set_held(InputAction::Down, down);
            input.set_held(InputAction::Jump, jump);
        }
        self.driver.frame(&mut self.world, DT);
    }

    fn state(&self, kind: MoveKind) -> Option<MoveState> {
        self.world.get::<MoveManager>(self.actor).unwrap().state(kind)
    }

    fn count(&self, kind: MoveKind, event: MoveEventKind) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.kind == kind && e.event == event)
            .count()
    }

    fn bool_param(&self, name: &str) -> bool {
        self.world
            .get::<AnimatorParameters>(self.actor)
            .unwrap()
            .get_bool(ParamId::from_name(name))
    }

    fn take_trigger(&mut self, name: &str) -> bool {
        self.world
            .get_mut::<AnimatorParameters>(self.actor)
            .unwrap()
            .consume_trigger(ParamId::from_name(name))
    }
}

#[test]
fn registration_is_broadcast_on_first_frame() {
    let mut h = Harness::new(ActorPhysics::default());
    h.frame(false, false);
    for kind in [
        MoveKind::GROUND_CONTROL,
        MoveKind::ROLL,
        MoveKind::DUCK,
        MoveKind::SPINDASH,
    ] {
        assert_eq!(h.count(kind, MoveEventKind::Added), 1, "{kind}");
    }
    let events = h.events.lock().unwrap();
    assert!(events.iter().all(|e| e.entity == h.actor));
}

#[test]
fn first_poll_makes_available_but_not_active() {
    let mut h = Harness::new(ActorPhysics::default());
    h.frame(false, false);
    assert_eq!(h.state(MoveKind::GROUND_CONTROL), Some(MoveState::Available));
    assert_eq!(h.state(MoveKind::DUCK), Some(MoveState::Available));
    assert_eq!(h.state(MoveKind::ROLL), Some(MoveState::Unavailable));
    assert_eq!(h.state(MoveKind::SPINDASH), Some(MoveState::Unavailable));
    assert_eq!(h.count(MoveKind::GROUND_CONTROL, MoveEventKind::Active), 0);
    assert!(h.bool_param(params::CAN_DUCK));

    h.frame(false, false);
    assert_eq!(h.state(MoveKind::GROUND_CONTROL), Some(MoveState::Active));
    assert!(h.bool_param(params::GROUNDED));
}

#[test]
fn active_is_announced_exactly_once() {
    let mut h = Harness::new(ActorPhysics::default());
    for _ in 0..10 {
        h.frame(false, false);
    }
    assert_eq!(h.count(MoveKind::GROUND_CONTROL, MoveEventKind::Active), 1);
    assert_eq!(h.count(MoveKind::GROUND_CONTROL, MoveEventKind::End), 0);
}

#[test]
fn duck_then_spindash_charge_and_release() {
    let mut h = Harness::new(ActorPhysics::default());
    h.frame(false, false);

    h.frame(true, false);
    assert_eq!(h.state(MoveKind::DUCK), Some(MoveState::Active));
    assert_eq!(h.state(MoveKind::SPINDASH), Some(MoveState::Available));
    assert!(h.bool_param(params::DUCKING));
    assert!(!h.bool_param(params::CAN_DUCK));

    h.frame(true, true);
    assert_eq!(h.state(MoveKind::SPINDASH), Some(MoveState::Active));
    assert!(h.bool_param(params::SPINDASHING));
    assert!(h.take_trigger(params::SPINDASH));
    assert!(!h.take_trigger(params::SPINDASH));

    h.frame(true, false);
    h.frame(true, true);
    assert_eq!(h.count(MoveKind::SPINDASH, MoveEventKind::Active), 1);
    assert!(!h.take_trigger(params::SPINDASH));

    h.frame(false, false);
    assert_eq!(h.state(MoveKind::DUCK), Some(MoveState::Available));
    assert_eq!(h.state(MoveKind::SPINDASH), Some(MoveState::Unavailable));
    assert_eq!(h.count(MoveKind::SPINDASH, MoveEventKind::End), 1);
    assert!(!h.bool_param(params::SPINDASHING));
    assert!(!h.bool_param(params::DUCKING));
}

#[test]
fn roll_at_speed_excludes_duck() {
    let mut h = Harness::new(ActorPhysics::grounded_on(0.0, 200.0));
    h.frame(false, false);
    assert_eq!(h.state(MoveKind::ROLL), Some(MoveState::Available));
    assert_eq!(h.state(MoveKind::DUCK), Some(MoveState::Unavailable));

    h.frame(true, false);
    assert_eq!(h.state(MoveKind::ROLL), Some(MoveState::Active));
    assert!(h.take_trigger(params::ROLL));
    assert!(h.bool_param(params::ROLLING));

    // Slowing down below the unroll speed ends the roll even with Down held.
    h.world
        .get_mut::<ActorPhysics>(h.actor)
        .unwrap()
        .ground_velocity = 10.0;
    h.frame(true, false);
    assert_ne!(h.state(MoveKind::ROLL), Some(MoveState::Active));
    assert_eq!(h.count(MoveKind::ROLL, MoveEventKind::End), 1);
    // Duck becomes available this poll but needs another frame to activate.
    assert_eq!(h.state(MoveKind::DUCK), Some(MoveState::Available));
    h.frame(true, false);
    assert_eq!(h.state(MoveKind::DUCK), Some(MoveState::Active));
}

#[test]
fn disabling_ends_active_moves_once() {
    let mut h = Harness::new(ActorPhysics::default());
    h.frame(false, false);
    h.frame(true, false);
    assert_eq!(h.state(MoveKind::DUCK), Some(MoveState::Active));

    h.world.entity_mut(h.actor).insert(MovesDisabled);
    for _ in 0..3 {
        h.frame(true, false);
    }
    assert_eq!(h.count(MoveKind::GROUND_CONTROL, MoveEventKind::End), 1);
    assert_eq!(h.count(MoveKind::DUCK, MoveEventKind::End), 1);
    assert_ne!(h.state(MoveKind::DUCK), Some(MoveState::Active));
    assert_ne!(h.state(MoveKind::GROUND_CONTROL), Some(MoveState::Active));
    assert!(!h.world.get::<MoveManager>(h.actor).unwrap().is_enabled());

    h.world.entity_mut(h.actor).remove::<MovesDisabled>();
    h.frame(false, false);
    assert!(h.world.get::<MoveManager>(h.actor).unwrap().is_enabled());
    assert_eq!(h.state(MoveKind::GROUND_CONTROL), Some(MoveState::Active));
}

#[test]
fn removing_duck_makes_spindash_unavailable() {
    let mut h = Harness::new(ActorPhysics::default());
    h.frame(false, false);
    h.frame(true, false);
    assert_eq!(h.state(MoveKind::SPINDASH), Some(MoveState::Available));

    let physics = *h.world.get::<ActorPhysics>(h.actor).unwrap();
    let input = *h.world.resource::<InputState>();
    {
        let mut manager = h.world.get_mut::<MoveManager>(h.actor).unwrap();
        manager
            .remove(MoveKind::DUCK, MoveEnv::new(&physics, &input, DT))
            .unwrap();
    }

    h.frame(true, false);
    assert_eq!(h.state(MoveKind::DUCK), None);
    assert_eq!(h.state(MoveKind::SPINDASH), Some(MoveState::Unavailable));
    assert_eq!(h.count(MoveKind::DUCK, MoveEventKind::End), 1);
    assert_eq!(h.count(MoveKind::DUCK, MoveEventKind::Removed), 1);
}

#[test]
fn spindash_without_duck_fails_to_attach() {
    let mut manager = MoveManager::new();
    let err = manager.add(Spindash::new(2.0, 8.0, 0.25)).unwrap_err();
    assert_eq!(
        err,
        MoveError::MissingDependency {
            dependent: MoveKind::SPINDASH,
            required: MoveKind::DUCK,
        }
    );
    assert!(manager.is_empty());
}
