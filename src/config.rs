use std::f32::consts::PI;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::error::{Error, Result};
use crate::math::stereo::FAR_PLANE;
use crate::math::{DEFAULT_STEP, MAX_VERTICES, MIN_RADIUS, planned_vertices};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum VideoSourceKind {
    /// Animated test pattern produced on a capture thread.
    Synthetic,
    /// Static placeholder frame only.
    Placeholder,
}

/// Red/cyan anaglyph viewer for a parametric surface over a video background.
#[derive(Clone, Debug, Parser)]
#[command(name = "anaglyph-surface", version)]
pub struct Args {
    /// Upper radius bound of the surface.
    #[arg(long, default_value_t = 1.0)]
    pub max_r: f64,

    /// Grid step used for both r and theta.
    #[arg(long, default_value_t = DEFAULT_STEP)]
    pub step: f64,

    #[arg(long, default_value_t = 0.5)]
    pub eye_separation: f32,

    #[arg(long, default_value_t = 10.0)]
    pub convergence: f32,

    /// Field of view in radians.
    #[arg(long, default_value_t = 0.4)]
    pub fov: f32,

    #[arg(long, default_value_t = 10.0)]
    pub near: f32,

    #[arg(long, value_enum, default_value_t = VideoSourceKind::Synthetic)]
    pub video: VideoSourceKind,

    /// Still image shown as the background instead of a live source.
    #[arg(long)]
    pub video_image: Option<PathBuf>,

    /// Surface texture. A checkerboard is generated when omitted.
    #[arg(long)]
    pub texture: Option<PathBuf>,

    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    #[arg(long, default_value_t = 720)]
    pub height: u32,

    #[arg(long)]
    pub vsync: bool,
}

impl Args {
    pub fn validate(&self) -> Result<()> {
        if !(self.step > 0.0) || !self.step.is_finite() {
            return Err(Error::Config(format!("step must be positive, got {}", self.step)));
        }
        if !(self.max_r > MIN_RADIUS) || !self.max_r.is_finite() {
            return Err(Error::Config(format!(
                "max-r must be finite and exceed {MIN_RADIUS}, got {}",
                self.max_r
            )));
        }
        if planned_vertices(self.max_r, self.step).is_none() {
            return Err(Error::Config(format!(
                "max-r {} with step {} needs more than {MAX_VERTICES} vertices",
                self.max_r, self.step
            )));
        }
        if !(self.convergence > 0.0) {
            return Err(Error::Config(format!(
                "convergence must be positive, got {}",
                self.convergence
            )));
        }
        if !(self.fov > 0.0 && self.fov < PI) {
            return Err(Error::Config(format!(
                "fov must lie in (0, π) radians, got {}",
                self.fov
            )));
        }
        if !(self.near > 0.0 && self.near < FAR_PLANE) {
            return Err(Error::Config(format!(
                "near must lie in (0, {FAR_PLANE}), got {}",
                self.near
            )));
        }
        if self.eye_separation < 0.0 {
            return Err(Error::Config(format!(
                "eye-separation must not be negative, got {}",
                self.eye_separation
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(Error::Config("window size must be non-zero".into()));
        }
        Ok(())
    }
}
