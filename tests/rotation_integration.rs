//! Sprite rotation integration tests.
//!
//! Run the rotation systems over several frames and check the visible
//! [`Rotation`] written for grounded, airborne and flipped-gravity actors.

use bevy_ecs::prelude::*;
use glam::Vec2;

use hedgehog::angle;
use hedgehog::components::actorphysics::ActorPhysics;
use hedgehog::components::movemanager::MoveManager;
use hedgehog::components::rotation::{Rotation, RotationConfig, SpriteRotation};
use hedgehog::game::{self, FrameDriver};
use hedgehog::moves::{GroundControl, Roll};
use hedgehog::resources::gameconfig::MotionConfig;
use hedgehog::resources::input::{InputAction, InputState};
use hedgehog::resources::worldtime::WorldTime;
use hedgehog::systems::rotation::{link_sprite_rotation_system, rotation_system};
use hedgehog::systems::time::update_world_time;

const DT: f32 = 1.0 / 60.0;
const EPSILON: f32 = 1e-3;

fn approx_eq(a: f32, b: f32) -> bool {
    angle::delta(a, b).abs() < EPSILON
}

fn make_world() -> World {
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world
}

fn tick_rotation(world: &mut World) {
    update_world_time(world, DT);
    let mut schedule = Schedule::default();
    schedule.add_systems(link_sprite_rotation_system);
    schedule.add_systems(rotation_system.after(link_sprite_rotation_system));
    schedule.run(world);
}

fn spawn_bare(world: &mut World, physics: ActorPhysics) -> Entity {
    world
        .spawn((physics, SpriteRotation::default(), Rotation::default()))
        .id()
}

fn degrees(world: &World, entity: Entity) -> f32 {
    world.get::<Rotation>(entity).unwrap().degrees
}

#[test]
fn loop_traversal_steps_through_intervals() {
    let mut world = make_world();
    let actor = spawn_bare(&mut world, ActorPhysics::grounded_on(0.0, 300.0));

    let mut seen = Vec::new();
    for step in 0..=72 {
        world.get_mut::<ActorPhysics>(actor).unwrap().surface_angle = (step * 5) as f32 % 360.0;
        tick_rotation(&mut world);
        let rotation = degrees(&world, actor);
        assert!(
            (rotation / 45.0 - (rotation / 45.0).round()).abs() < EPSILON,
            "rotation {rotation} is not a multiple of the interval"
        );
        if seen.last() != Some(&rotation) {
            seen.push(rotation);
        }
    }
    assert_eq!(
        seen,
        vec![0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0, 0.0]
    );
}

#[test]
fn noisy_surface_near_boundary_does_not_flicker() {
    let mut world = make_world();
    let actor = spawn_bare(&mut world, ActorPhysics::grounded_on(60.0, 300.0));
    tick_rotation(&mut world);
    let settled = degrees(&world, actor);
    assert!(approx_eq(settled, 45.0));

    // 67.5 is half-way between the 45 and 90 steps.
    for i in 0..60 {
        let wobble = if i % 2 == 0 { 4.0 } else { -4.0 };
        world.get_mut::<ActorPhysics>(actor).unwrap().surface_angle = 67.5 + wobble;
        tick_rotation(&mut world);
        assert_eq!(degrees(&world, actor), settled, "flickered at frame {i}");
    }
}

#[test]
fn airborne_recovery_is_gradual() {
    let mut world = make_world();
    let actor = spawn_bare(&mut world, ActorPhysics::grounded_on(90.0, 300.0));
    tick_rotation(&mut world);
    assert!(approx_eq(degrees(&world, actor), 90.0));

    *world.get_mut::<ActorPhysics>(actor).unwrap() = ActorPhysics::airborne(Vec2::new(0.0, 200.0));
    tick_rotation(&mut world);
    let sprite_rotation = world.get::<SpriteRotation>(actor).unwrap();
    assert!(approx_eq(sprite_rotation.true_rotation, 84.0));
    assert!(approx_eq(degrees(&world, actor), 90.0));

    for _ in 0..30 {
        tick_rotation(&mut world);
    }
    assert!(approx_eq(world.get::<SpriteRotation>(actor).unwrap().true_rotation, 0.0));
    assert!(approx_eq(degrees(&world, actor), 0.0));
}

#[test]
fn flipped_gravity_keeps_actor_upright_relative_to_gravity() {
    let mut world = make_world();
    let physics = ActorPhysics::grounded_on(180.0, 300.0).with_gravity_direction(90.0);
    let actor = spawn_bare(&mut world, physics);
    tick_rotation(&mut world);
    assert!(approx_eq(degrees(&world, actor), 180.0));

    // A 10° bump on the ceiling is still flat relative to gravity.
    world.get_mut::<ActorPhysics>(actor).unwrap().surface_angle = 190.0;
    tick_rotation(&mut world);
    assert!(approx_eq(
        world.get::<SpriteRotation>(actor).unwrap().true_rotation,
        180.0
    ));
}

#[test]
fn added_controller_is_linked_to_existing_moves() {
    let mut world = make_world();
    let mut manager = MoveManager::new();
    manager.add(GroundControl::new()).unwrap();
    manager.add(Roll::new(60.0, 30.0)).unwrap();
    let actor = world
        .spawn((
            ActorPhysics::default(),
            manager,
            SpriteRotation::new(RotationConfig::default()),
        ))
        .id();
    tick_rotation(&mut world);
    let sprite_rotation = world.get::<SpriteRotation>(actor).unwrap();
    assert!(sprite_rotation.roll_handle().is_some());
    assert!(sprite_rotation.ground_control_handle().is_some());
}

#[test]
fn rotation_sees_roll_started_in_the_same_frame() {
    let mut world = game::setup_world(MotionConfig::new());
    let actor = game::spawn_actor(&mut world, ActorPhysics::grounded_on(60.0, 200.0)).unwrap();
    let mut driver = FrameDriver::new(&mut world).unwrap();

    driver.frame(&mut world, DT);
    assert!(approx_eq(degrees(&world, actor), 45.0));

    world
        .resource_mut::<InputState>()
        .set_held(InputAction::Down, true);
    driver.frame(&mut world, DT);
    let manager = world.get::<MoveManager>(actor).unwrap();
    assert!(manager.is_active(hedgehog::components::moves::MoveKind::ROLL));
    assert!(approx_eq(degrees(&world, actor), 0.0));
}
