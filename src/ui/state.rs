use std::time::{Duration, Instant};

use crate::config::Args;
use crate::math::StereoCameraConfig;

pub const MAX_R_RANGE: std::ops::RangeInclusive<f64> = 0.3..=2.5;
pub const EYE_SEPARATION_RANGE: std::ops::RangeInclusive<f32> = 0.0..=2.0;
pub const CONVERGENCE_RANGE: std::ops::RangeInclusive<f32> = 1.0..=50.0;
pub const FOV_RANGE: std::ops::RangeInclusive<f32> = 0.05..=3.0;
pub const NEAR_RANGE: std::ops::RangeInclusive<f32> = 1.0..=19.0;
pub const STEP_RANGE: std::ops::RangeInclusive<f64> = 0.005..=0.1;

/// Runtime parameters edited through the side panel.
#[derive(Clone, Debug, PartialEq)]
pub struct UiState {
    pub max_r: f64,
    pub step: f64,

    pub eye_separation: f32,
    pub convergence: f32,
    pub fov: f32,
    pub near: f32,

    pub vsync_enabled: bool,
    pub show_stats: bool,

    pub surface_needs_rebuild: bool,
}

impl UiState {
    pub fn from_args(args: &Args) -> Self {
        Self {
            max_r: args.max_r,
            step: args.step,
            eye_separation: args.eye_separation,
            convergence: args.convergence,
            fov: args.fov,
            near: args.near,
            vsync_enabled: args.vsync,
            show_stats: true,
            surface_needs_rebuild: true,
        }
    }

    pub fn stereo_config(&self, aspect_ratio: f32) -> StereoCameraConfig {
        StereoCameraConfig::new(
            self.eye_separation,
            self.convergence,
            aspect_ratio,
            self.fov,
            self.near,
        )
    }
}

/// Values shown in the statistics block, refreshed once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    pub fps: f32,
    pub frame_ms: f32,
    pub triangles: usize,
    pub video_size: (u32, u32),
    pub video_live: bool,
}

/// Frames-per-second averaged over half-second windows.
#[derive(Debug)]
pub struct FpsCounter {
    window_start: Instant,
    frames: u32,
    fps: f32,
}

const FPS_WINDOW: Duration = Duration::from_millis(500);

impl FpsCounter {
    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
            fps: 0.0,
        }
    }

    pub fn tick(&mut self, now: Instant) -> f32 {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= FPS_WINDOW {
            self.fps = self.frames as f32 / elapsed.as_secs_f32();
            self.frames = 0;
            self.window_start = now;
        }
        self.fps
    }
}
