//! Property-based tests for the orbit solver and trajectory sampling.

use std::f64::consts::{PI, TAU};

use proptest::prelude::*;

use crate::orbit::{DerivedOrbit, OrbitParameters, PhysicalConstants};
use crate::trajectory::{Trajectory, cartesian_to_polar};

const SAMPLES: usize = 10_000;

fn escape_speed(r0: f64) -> f64 {
    (2.0 * PhysicalConstants::SOLAR.mu() / r0).sqrt()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The radicand is `1 + (u - 2) u sin²α >= 1 - sin²α`, so domain-valid
    /// inputs never fail beyond round-off.
    #[test]
    fn prop_valid_parameters_solve(
        r0 in 1e9f64..1e13,
        speed_fraction in 0.0f64..3.0,
        alpha in 0.0f64..=PI,
    ) {
        let v0 = speed_fraction * escape_speed(r0);
        let params = OrbitParameters::new(r0, v0, alpha).unwrap();
        match DerivedOrbit::solve(&params, PhysicalConstants::SOLAR) {
            Ok(orbit) => prop_assert!(orbit.eccentricity >= 0.0),
            Err(err) => prop_assert!(false, "unexpected failure: {err}"),
        }
    }

    /// Sampling yields the configured count with θ increasing over [0, 2π].
    #[test]
    fn prop_samples_span_full_turn(
        r0 in 1e9f64..1e13,
        speed_fraction in 0.05f64..0.95,
        alpha in 0.1f64..(PI - 0.1),
    ) {
        let v0 = speed_fraction * escape_speed(r0);
        let params = OrbitParameters::new(r0, v0, alpha).unwrap();
        let orbit = DerivedOrbit::solve(&params, PhysicalConstants::SOLAR).unwrap();
        let trajectory = Trajectory::sample(&orbit, SAMPLES);
        let samples = trajectory.samples();

        prop_assert_eq!(samples.len(), SAMPLES);
        prop_assert_eq!(samples[0].theta, 0.0);
        prop_assert_eq!(samples[SAMPLES - 1].theta, TAU);
        prop_assert!(samples.windows(2).all(|w| w[1].theta > w[0].theta));
    }

    /// Cartesian samples convert back to their polar coordinates.
    #[test]
    fn prop_cartesian_round_trip(
        r0 in 1e9f64..1e13,
        speed_fraction in 0.05f64..0.95,
        alpha in 0.1f64..(PI - 0.1),
    ) {
        let v0 = speed_fraction * escape_speed(r0);
        let params = OrbitParameters::new(r0, v0, alpha).unwrap();
        let orbit = DerivedOrbit::solve(&params, PhysicalConstants::SOLAR).unwrap();
        prop_assert!(orbit.is_bound());
        let trajectory = Trajectory::sample(&orbit, SAMPLES);

        for sample in trajectory.samples().iter().step_by(97) {
            let (rho, theta) = cartesian_to_polar(&sample.position());
            prop_assert!((rho - sample.rho).abs() <= 1e-9 * sample.rho);
            let diff = (theta - sample.theta).rem_euclid(TAU);
            let wrapped = diff.min(TAU - diff);
            prop_assert!(wrapped < 1e-9, "θ {} came back as {}", sample.theta, theta);
        }
    }

    /// Mirroring through `min(x) + max(x)` keeps a bound orbit's x within its
    /// own extent.
    #[test]
    fn prop_mirrored_x_stays_in_extent(
        r0 in 1e9f64..1e13,
        speed_fraction in 0.05f64..0.95,
        alpha in 0.1f64..(PI - 0.1),
    ) {
        let v0 = speed_fraction * escape_speed(r0);
        let params = OrbitParameters::new(r0, v0, alpha).unwrap();
        let orbit = DerivedOrbit::solve(&params, PhysicalConstants::SOLAR).unwrap();
        let trajectory = Trajectory::sample(&orbit, SAMPLES);
        let axis = trajectory.mirror_axis();
        let min = trajectory.samples().iter().map(|s| s.x).fold(f64::INFINITY, f64::min);
        let max = trajectory.samples().iter().map(|s| s.x).fold(f64::NEG_INFINITY, f64::max);
        let tolerance = 1e-9 * (max - min).abs().max(1.0);

        for index in trajectory.frame_indices(100) {
            let mirrored = axis - trajectory.samples()[index].x;
            prop_assert!(mirrored >= min - tolerance && mirrored <= max + tolerance);
        }
    }
}
