use anyhow::Context;
use thiserror::Error;
use tracing::{info, warn};

use crate::animation::render_animation;
use crate::config::AppConfig;
use crate::orbit::{DerivedOrbit, OrbitError, OrbitParameters};
use crate::output::{OutputArtifacts, ensure_directory};
use crate::plotting::{OrbitScene, ViewStyle, render_still_png};
use crate::trajectory::Trajectory;

/// Failure of the compute-and-render stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The parameters do not describe a computable orbit; nothing was written.
    #[error("invalid orbit parameters: {0}")]
    InvalidOrbit(#[from] OrbitError),

    /// Drawing or writing an artifact failed; earlier artifacts may exist.
    #[error("rendering failed: {0:#}")]
    Render(#[source] anyhow::Error),
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub orbit: DerivedOrbit,
    pub samples: usize,
    pub non_drawable_samples: usize,
    pub frames: usize,
}

/// Solves and samples the orbit without touching the filesystem.
pub fn compute(
    params: &OrbitParameters,
    config: &AppConfig,
) -> Result<(DerivedOrbit, Trajectory), OrbitError> {
    let orbit = DerivedOrbit::solve(params, config.physics)?;
    info!(
        angular_momentum = orbit.angular_momentum,
        eccentricity = orbit.eccentricity,
        "solved orbit"
    );
    let trajectory = Trajectory::sample(&orbit, config.sampling.iterations);
    Ok((orbit, trajectory))
}

/// Computes the orbit and writes the animation, the full-orbit still and the
/// zoomed still, in that order.
pub fn run(
    params: &OrbitParameters,
    config: &AppConfig,
    artifacts: &OutputArtifacts,
) -> Result<RunReport, PipelineError> {
    let (orbit, trajectory) = compute(params, config)?;

    let non_drawable = trajectory.non_drawable_count();
    if non_drawable > 0 {
        warn!(
            count = non_drawable,
            "samples are non-finite or on the far hyperbola branch and are not drawn"
        );
    }

    let scene = OrbitScene::new(params.r0(), &trajectory);
    let frames = render_artifacts(&scene, &trajectory, config, artifacts)
        .map_err(PipelineError::Render)?;

    Ok(RunReport {
        orbit,
        samples: trajectory.len(),
        non_drawable_samples: non_drawable,
        frames,
    })
}

fn render_artifacts(
    scene: &OrbitScene,
    trajectory: &Trajectory,
    config: &AppConfig,
    artifacts: &OutputArtifacts,
) -> anyhow::Result<usize> {
    ensure_directory(&artifacts.directory)?;

    let last = render_animation(
        scene,
        trajectory,
        config.sampling.frames,
        &config.figure,
        &config.animation,
        &artifacts.animation,
    )
    .context("animation")?;

    // The still keeps the final scene with the marker removed.
    render_still_png(scene, &ViewStyle::FULL_ORBIT, &config.figure, &artifacts.full_orbit)
        .context("full orbit plot")?;
    render_still_png(scene, &ViewStyle::ZOOMED, &config.figure, &artifacts.zoomed_orbit)
        .context("zoomed orbit plot")?;

    Ok(last.map_or(0, |state| state.frame + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::resolve_artifacts;
    use std::f64::consts::FRAC_PI_2;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("comet_orbit-{name}-{}", std::process::id()))
    }

    #[test]
    fn compute_samples_configured_iterations() {
        let config = AppConfig::embedded().unwrap();
        let params = OrbitParameters::new(1e12, 4000.0, FRAC_PI_2).unwrap();
        let (orbit, trajectory) = compute(&params, &config).unwrap();
        assert!(orbit.is_bound());
        assert_eq!(trajectory.len(), config.sampling.iterations);
    }

    #[test]
    fn negative_radicand_is_an_invalid_orbit() {
        let err: PipelineError = OrbitError::NegativeRadicand { radicand: -1.0 }.into();
        assert!(matches!(err, PipelineError::InvalidOrbit(_)));
        assert!(err.to_string().starts_with("invalid orbit parameters"));
    }

    #[test]
    fn render_failure_is_tagged() {
        let err = PipelineError::Render(anyhow::anyhow!("disk full").context("animation"));
        assert_eq!(err.to_string(), "rendering failed: animation: disk full");
    }

    #[test]
    fn invalid_orbit_writes_no_files() {
        let config = AppConfig::embedded().unwrap();
        let dir = scratch_dir("invalid");
        let artifacts = resolve_artifacts(&dir, &config.output);
        // GM = 0 with L = 0 turns the radicand into 0/0.
        let mut broken = config.clone();
        broken.physics.solar_mass = 0.0;
        let params = OrbitParameters::new(1e12, 0.0, FRAC_PI_2).unwrap();
        let err = run(&params, &broken, &artifacts).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidOrbit(OrbitError::NegativeRadicand { .. })));
        assert!(artifacts.existing().is_empty());
        assert!(!dir.exists());
    }
}
