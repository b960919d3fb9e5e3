use bevy_ecs::prelude::Resource;

/// Default fixed physics rate.
pub const DEFAULT_FIXED_HZ: f32 = 60.0;

#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed: f32,
    /// Scaled seconds of the current variable-rate frame.
    pub delta: f32,
    pub time_scale: f32,
    /// Seconds per fixed physics step.
    pub fixed_delta: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            fixed_delta: 1.0 / DEFAULT_FIXED_HZ,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }

    pub fn with_fixed_hz(mut self, hz: f32) -> Self {
        if hz > 0.0 {
            self.fixed_delta = 1.0 / hz;
        }
        self
    }
}
