//! Motion configuration resource.
//!
//! Holds the designer tunables of the rotation controller and the reference
//! moves, loaded from an INI file. Defaults are safe to run with; keys missing
//! from the file keep their current values.
//!
//! # Configuration File Format
//!
//! ```ini
//! [rotation]
//! min_angle = 22.5
//! interval = 45
//! threshold = 0.1
//! air_recovery_rate = 360
//! rotate_during_stand = false
//! rotate_during_roll = false
//! rotate_in_air = true
//!
//! [moves]
//! roll_min_speed = 60
//! unroll_speed = 30
//! duck_max_speed = 60
//! spindash_charge_step = 2
//! spindash_max_charge = 8
//! spindash_charge_decay = 0.25
//!
//! [simulation]
//! fixed_hz = 60
//! time_scale = 1
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::components::rotation::RotationConfig;
use crate::resources::worldtime::DEFAULT_FIXED_HZ;

const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Tunables of the reference moves, in world units per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveTuning {
    pub roll_min_speed: f32,
    pub unroll_speed: f32,
    pub duck_max_speed: f32,
    pub spindash_charge_step: f32,
    pub spindash_max_charge: f32,
    pub spindash_charge_decay: f32,
}

impl Default for MoveTuning {
    fn default() -> Self {
        Self {
            roll_min_speed: 60.0,
            unroll_speed: 30.0,
            duck_max_speed: 60.0,
            spindash_charge_step: 2.0,
            spindash_max_charge: 8.0,
            spindash_charge_decay: 0.25,
        }
    }
}

/// Motion configuration resource.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    pub rotation: RotationConfig,
    pub moves: MoveTuning,
    /// Fixed physics steps per second.
    pub fixed_hz: f32,
    pub time_scale: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            rotation: RotationConfig::default(),
            moves: MoveTuning::default(),
            fixed_hz: DEFAULT_FIXED_HZ,
            time_scale: 1.0,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config);
        info!("Loaded motion config from {:?}", self.config_path);
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();
        let r = &self.rotation;
        config.set("rotation", "min_angle", Some(r.min_angle.to_string()));
        config.set("rotation", "interval", Some(r.interval.to_string()));
        config.set("rotation", "threshold", Some(r.threshold.to_string()));
        config.set("rotation", "air_recovery_rate", Some(r.air_recovery_rate.to_string()));
        config.set("rotation", "rotate_during_stand", Some(r.rotate_during_stand.to_string()));
        config.set("rotation", "rotate_during_roll", Some(r.rotate_during_roll.to_string()));
        config.set("rotation", "rotate_in_air", Some(r.rotate_in_air.to_string()));

        let m = &self.moves;
        config.set("moves", "roll_min_speed", Some(m.roll_min_speed.to_string()));
        config.set("moves", "unroll_speed", Some(m.unroll_speed.to_string()));
        config.set("moves", "duck_max_speed", Some(m.duck_max_speed.to_string()));
        config.set("moves", "spindash_charge_step", Some(m.spindash_charge_step.to_string()));
        config.set("moves", "spindash_max_charge", Some(m.spindash_max_charge.to_string()));
        config.set("moves", "spindash_charge_decay", Some(m.spindash_charge_decay.to_string()));

        config.set("simulation", "fixed_hz", Some(self.fixed_hz.to_string()));
        config.set("simulation", "time_scale", Some(self.time_scale.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        let float = |section: &str, key: &str| -> Option<f32> {
            config.getfloat(section, key).ok().flatten().map(|v| v as f32)
        };
        let boolean =
            |section: &str, key: &str| -> Option<bool> { config.getbool(section, key).ok().flatten() };

        // [rotation] section
        let r = &mut self.rotation;
        if let Some(v) = float("rotation", "min_angle") {
            r.min_angle = v;
        }
        if let Some(v) = float("rotation", "interval") {
            if v > 0.0 {
                r.interval = v;
            } else {
                warn!("Ignoring non-positive rotation interval {}", v);
            }
        }
        if let Some(v) = float("rotation", "threshold") {
            r.threshold = v;
        }
        if let Some(v) = float("rotation", "air_recovery_rate") {
            r.air_recovery_rate = v;
        }
        if let Some(v) = boolean("rotation", "rotate_during_stand") {
            r.rotate_during_stand = v;
        }
        if let Some(v) = boolean("rotation", "rotate_during_roll") {
            r.rotate_during_roll = v;
        }
        if let Some(v) = boolean("rotation", "rotate_in_air") {
            r.rotate_in_air = v;
        }

        // [moves] section
        let m = &mut self.moves;
        if let Some(v) = float("moves", "roll_min_speed") {
            m.roll_min_speed = v;
        }
        if let Some(v) = float("moves", "unroll_speed") {
            m.unroll_speed = v;
        }
        if let Some(v) = float("moves", "duck_max_speed") {
            m.duck_max_speed = v;
        }
        if let Some(v) = float("moves", "spindash_charge_step") {
            m.spindash_charge_step = v;
        }
        if let Some(v) = float("moves", "spindash_max_charge") {
            m.spindash_max_charge = v;
        }
        if let Some(v) = float("moves", "spindash_charge_decay") {
            m.spindash_charge_decay = v;
        }

        // [simulation] section
        if let Some(v) = float("simulation", "fixed_hz") {
            if v > 0.0 {
                self.fixed_hz = v;
            } else {
                warn!("Ignoring non-positive fixed_hz {}", v);
            }
        }
        if let Some(v) = float("simulation", "time_scale") {
            self.time_scale = v;
        }

        info!(
            "Motion config: interval={} threshold={} min_angle={} air_rate={} fixed_hz={}",
            self.rotation.interval,
            self.rotation.threshold,
            self.rotation.min_angle,
            self.rotation.air_recovery_rate,
            self.fixed_hz
        );
    }
}
