//! Animated comet marker moving along the full-orbit view.
//!
//! Each frame is drawn from a [`FrameState`] value; advancing the animation
//! builds a new state instead of mutating the previous one, so exactly one
//! marker is ever on screen.

use std::path::Path;

use anyhow::{Result, anyhow};
use plotters::prelude::*;
use tracing::{debug, info};

use crate::config::{AnimationConfig, FigureConfig};
use crate::plotting::{OrbitScene, ViewStyle, draw_scene};
use crate::trajectory::Trajectory;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    /// Frame number, starting at zero.
    pub frame: usize,
    /// Trajectory sample shown in this frame.
    pub sample_index: usize,
    /// Mirrored marker position, `None` when the sample is not drawable.
    pub marker: Option<(f64, f64)>,
}

impl FrameState {
    pub fn at(
        frame: usize,
        sample_index: usize,
        trajectory: &Trajectory,
        scene: &OrbitScene,
    ) -> Self {
        let marker = trajectory
            .get(sample_index)
            .filter(|sample| sample.is_drawable())
            .map(|sample| scene.mirrored(&sample.position()));
        Self {
            frame,
            sample_index,
            marker,
        }
    }
}

/// Frame states in display order, one per animation frame.
pub fn frame_states(
    trajectory: &Trajectory,
    scene: &OrbitScene,
    frames: usize,
) -> Vec<FrameState> {
    trajectory
        .frame_indices(frames)
        .into_iter()
        .enumerate()
        .map(|(frame, index)| FrameState::at(frame, index, trajectory, scene))
        .collect()
}

/// Writes the GIF and returns the state of the last frame drawn.
pub fn render_animation(
    scene: &OrbitScene,
    trajectory: &Trajectory,
    frames: usize,
    figure: &FigureConfig,
    animation: &AnimationConfig,
    path: &Path,
) -> Result<Option<FrameState>> {
    let size = figure.canvas_size(animation.dpi);
    let backend = BitMapBackend::gif(path, size, animation.frame_interval_ms)
        .map_err(|e| anyhow!("failed to create animation {}: {e}", path.display()))?;
    let root = backend.into_drawing_area();

    let mut last: Option<FrameState> = None;
    for state in frame_states(trajectory, scene, frames) {
        draw_scene(&root, scene, &ViewStyle::FULL_ORBIT, animation.dpi, state.marker)?;
        root.present()
            .map_err(|e| anyhow!("failed to encode frame {}: {e}", state.frame))?;
        if state.marker.is_none() {
            debug!(frame = state.frame, sample = state.sample_index, "marker hidden");
        }
        last = Some(state);
    }

    info!(
        frames = last.map_or(0, |s| s.frame + 1),
        path = %path.display(),
        "wrote animation"
    );
    Ok(last)
}
