//! Hedgehog motion simulator entry point.
//!
//! A headless driver for the move lifecycle and sprite rotation systems using:
//! - **bevy_ecs** for entity-component-system architecture
//! - **configparser** for the designer tunables in `config.ini`
//!
//! The executable spawns one actor, plays a scripted scenario (physics and
//! input per frame) and prints what the moves and the rotation controller did
//! each frame, so designers can check transitions and stepped rotation without
//! running the game.
//!
//! # Main Loop
//!
//! 1. Load `config.ini` (or the `--config` file), falling back to defaults
//! 2. Create the ECS world, resources and the actor
//! 3. For each frame: apply the scenario script, run the fixed and variable
//!    passes, print the frame trace
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --scenario slope --frames 240
//! cargo run --release -- --scenario spindash --json
//! ```

use bevy_ecs::prelude::*;
use clap::{Parser, ValueEnum};
use glam::Vec2;
use serde::Serialize;
use std::path::PathBuf;

use hedgehog::components::actorphysics::ActorPhysics;
use hedgehog::components::animator::{AnimatorParameters, ParamId};
use hedgehog::components::movemanager::MoveManager;
use hedgehog::components::moves::MoveState;
use hedgehog::components::rotation::{Rotation, SpriteRotation};
use hedgehog::game::{self, FrameDriver, params};
use hedgehog::resources::gameconfig::MotionConfig;
use hedgehog::resources::input::{InputAction, InputState};

/// Scripted situations to simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    /// Run around a loop with a slightly noisy surface angle.
    Slope,
    /// Roll on flat ground until friction unrolls the actor.
    Roll,
    /// Launch off a vertical wall and recover upright in the air.
    Air,
    /// Duck, charge a spindash with three presses, then release.
    Spindash,
}

impl Scenario {
    fn initial_physics(self) -> ActorPhysics {
        match self {
            Scenario::Slope => ActorPhysics::grounded_on(0.0, 240.0),
            Scenario::Roll => ActorPhysics::grounded_on(0.0, 200.0),
            Scenario::Air => ActorPhysics::grounded_on(90.0, 300.0),
            Scenario::Spindash => ActorPhysics::grounded_on(0.0, 0.0),
        }
    }

    /// Write this frame's physics snapshot and held actions.
    fn apply(self, frame: u32, dt: f32, physics: &mut ActorPhysics, input: &mut InputState) {
        let mut down = false;
        let mut jump = false;
        match self {
            Scenario::Slope => {
                let wobble = if frame % 2 == 0 { 3.0 } else { -3.0 };
                physics.surface_angle = (frame as f32 * 1.5 + wobble).rem_euclid(360.0);
            }
            Scenario::Roll => {
                down = (10..20).contains(&frame);
                physics.ground_velocity = (physics.ground_velocity - 90.0 * dt).max(0.0);
            }
            Scenario::Air => {
                if frame == 10 {
                    physics.grounded = false;
                    physics.velocity = Vec2::new(-60.0, 300.0);
                }
            }
            Scenario::Spindash => {
                down = (5..60).contains(&frame);
                jump = matches!(frame, 15 | 25 | 35);
            }
        }
        input.set_held(InputAction::Down, down);
        input.set_held(InputAction::Jump, jump);
        input.set_held(InputAction::Left, false);
        input.set_held(InputAction::Right, false);
        input.set_held(InputAction::Up, false);
    }
}

/// Hedgehog motion simulator
#[derive(Parser)]
#[command(version, about = "Headless simulator for platformer moves and sprite rotation")]
struct Cli {
    /// Configuration file (default: ./config.ini).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 120)]
    frames: u32,

    /// Host frame rate.
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    #[arg(long, value_enum, default_value_t = Scenario::Slope)]
    scenario: Scenario,

    /// Print one JSON object per frame instead of text.
    #[arg(long)]
    json: bool,

    /// Write the effective configuration to the config path and exit.
    #[arg(long)]
    write_config: bool,
}

/// What one frame did, as printed.
#[derive(Debug, Serialize)]
struct FrameTrace {
    frame: u32,
    fixed_steps: u32,
    grounded: bool,
    surface_angle: f32,
    ground_velocity: f32,
    true_rotation: f32,
    rotation: f32,
    active: Vec<&'static str>,
    available: Vec<&'static str>,
    triggers: Vec<&'static str>,
}

impl FrameTrace {
    fn capture(world: &mut World, entity: Entity, frame: u32, fixed_steps: u32) -> Option<Self> {
        let physics = *world.get::<ActorPhysics>(entity)?;
        let true_rotation = world.get::<SpriteRotation>(entity)?.true_rotation;
        let rotation = world.get::<Rotation>(entity)?.degrees;
        let manager = world.get::<MoveManager>(entity)?;
        let in_state = |state: MoveState| {
            manager
                .entries()
                .iter()
                .filter(|e| e.state() == state)
                .map(|e| e.kind().0)
                .collect::<Vec<_>>()
        };
        let active = in_state(MoveState::Active);
        let available = in_state(MoveState::Available);

        // Stand in for the animator: consume the triggers raised this frame.
        let mut animator = world.get_mut::<AnimatorParameters>(entity)?;
        let triggers = [params::ROLL, params::SPINDASH]
            .into_iter()
            .filter(|name| animator.consume_trigger(ParamId::from_name(name)))
            .collect();

        Some(Self {
            frame,
            fixed_steps,
            grounded: physics.grounded,
            surface_angle: physics.surface_angle,
            ground_velocity: physics.ground_velocity,
            true_rotation,
            rotation,
            active,
            available,
            triggers,
        })
    }

    fn print(&self, json: bool) {
        if json {
            match serde_json::to_string(self) {
                Ok(line) => println!("{}", line),
                Err(e) => log::error!("Failed to serialize frame {}: {}", self.frame, e),
            }
        } else {
            println!(
                "{:>4} | {:<8} | surface {:>6.1} | gv {:>6.1} | true {:>6.1} | rot {:>6.1} | active {:?}{}",
                self.frame,
                if self.grounded { "ground" } else { "air" },
                self.surface_angle,
                self.ground_velocity,
                self.true_rotation,
                self.rotation,
                self.active,
                if self.triggers.is_empty() {
                    String::new()
                } else {
                    format!(" | triggers {:?}", self.triggers)
                }
            );
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => MotionConfig::with_path(path),
        None => MotionConfig::new(),
    };

    // Early-exit: write the effective configuration and quit
    if cli.write_config {
        config.load_from_file().ok(); // keep existing values when present
        if let Err(e) = config.save_to_file() {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        println!("Config written to {}", config.config_path.display());
        return;
    }

    if let Err(e) = config.load_from_file() {
        if cli.config.is_some() {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        log::info!("No config file found, using defaults");
    }

    if cli.fps <= 0.0 {
        eprintln!("Error: --fps must be positive");
        std::process::exit(1);
    }
    let dt = 1.0 / cli.fps;

    // --------------- ECS world + actor ---------------
    let mut world = game::setup_world(config);
    let entity = match game::spawn_actor(&mut world, cli.scenario.initial_physics()) {
        Ok(entity) => entity,
        Err(e) => {
            eprintln!("Error spawning actor: {e}");
            std::process::exit(1);
        }
    };
    let mut driver = match FrameDriver::new(&mut world) {
        Ok(driver) => driver,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    log::info!(
        "Simulating {:?} for {} frames at {} fps",
        cli.scenario,
        cli.frames,
        cli.fps
    );

    // --------------- Main loop ---------------
    for frame in 0..cli.frames {
        {
            let mut input = *world.resource::<InputState>();
            if let Some(mut physics) = world.get_mut::<ActorPhysics>(entity) {
                cli.scenario.apply(frame, dt, &mut physics, &mut input);
            }
            world.insert_resource(input);
        }

        let fixed_steps = driver.frame(&mut world, dt);

        match FrameTrace::capture(&mut world, entity, frame, fixed_steps) {
            Some(trace) => trace.print(cli.json),
            None => {
                log::error!("Actor {:?} lost its motion components", entity);
                std::process::exit(1);
            }
        }
    }
}
