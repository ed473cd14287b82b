use std::f64::consts::PI;
use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

use crate::orbit::PhysicalConstants;

const EMBEDDED: &str = include_str!("../config/comet.toml");

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub physics: PhysicalConstants,
    pub sampling: SamplingConfig,
    pub defaults: DefaultParameters,
    pub figure: FigureConfig,
    pub animation: AnimationConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct SamplingConfig {
    pub iterations: usize,
    pub frames: usize,
}

/// Values used when the user answers a prompt with `def`.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct DefaultParameters {
    pub distance: f64,
    pub speed: f64,
    pub angle_deg: f64,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct FigureConfig {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: u32,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct AnimationConfig {
    pub dpi: u32,
    pub frame_interval_ms: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    pub animation: PathBuf,
    pub full_orbit: PathBuf,
    pub zoomed_orbit: PathBuf,
}

impl AppConfig {
    /// Configuration compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_toml_str(EMBEDDED).context("embedded configuration is invalid")
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig =
            toml::from_str(content).context("failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.physics.solar_mass > 0.0 && self.physics.solar_mass.is_finite(),
            "solar_mass must be positive"
        );
        ensure!(
            self.physics.gravitational_constant > 0.0
                && self.physics.gravitational_constant.is_finite(),
            "gravitational_constant must be positive"
        );
        ensure!(
            self.sampling.iterations >= 2,
            "iterations must be at least two samples"
        );
        ensure!(self.sampling.frames >= 1, "frames must be at least one");
        ensure!(
            self.sampling.frames <= self.sampling.iterations,
            "frames ({}) cannot exceed iterations ({})",
            self.sampling.frames,
            self.sampling.iterations
        );
        ensure!(
            self.defaults.distance > 0.0 && self.defaults.distance.is_finite(),
            "default distance must be positive"
        );
        ensure!(
            self.defaults.speed >= 0.0 && self.defaults.speed.is_finite(),
            "default speed must be non-negative"
        );
        ensure!(
            (0.0..=180.0).contains(&self.defaults.angle_deg),
            "default angle must lie within [0, 180] degrees"
        );
        ensure!(
            self.figure.width_in > 0.0 && self.figure.height_in > 0.0,
            "figure size must be positive"
        );
        ensure!(self.figure.dpi > 0, "figure dpi must be positive");
        ensure!(self.animation.dpi > 0, "animation dpi must be positive");
        ensure!(
            self.animation.frame_interval_ms > 0,
            "frame_interval_ms must be positive"
        );
        Ok(())
    }
}

impl SamplingConfig {
    /// Number of samples between consecutive animation frames.
    pub fn frame_stride(&self) -> usize {
        self.iterations / self.frames
    }
}

impl DefaultParameters {
    pub fn angle_rad(&self) -> f64 {
        degrees_to_radians(self.angle_deg)
    }
}

impl FigureConfig {
    /// Canvas size in pixels when rendered at `dpi`.
    pub fn canvas_size(&self, dpi: u32) -> (u32, u32) {
        let width = (self.width_in * dpi as f64).round() as u32;
        let height = (self.height_in * dpi as f64).round() as u32;
        (width.max(1), height.max(1))
    }
}

pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees / 180.0 * PI
}
