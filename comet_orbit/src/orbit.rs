//! Closed-form two-body orbit of a comet around the Sun.
//!
//! The orbit equation in polar form is `r(θ) = L² / (GM (1 + e cos θ))`,
//! with the specific angular momentum `L = r0 v0 sin α` and the eccentricity
//! derived from the specific orbital energy.

use std::f64::consts::PI;

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrbitError {
    #[error("initial distance must be positive and finite, got {0}")]
    NonPositiveDistance(f64),

    #[error("initial speed must be non-negative and finite, got {0}")]
    NegativeSpeed(f64),

    #[error("angle between velocity and radius must lie within [0, π] radians, got {0}")]
    AngleOutOfRange(f64),

    #[error("eccentricity radicand {radicand:.6e} is negative or undefined")]
    NegativeRadicand { radicand: f64 },
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct PhysicalConstants {
    /// Mass of the Sun, kg.
    pub solar_mass: f64,
    /// Gravitational constant, m³·kg⁻¹·s⁻².
    pub gravitational_constant: f64,
}

impl PhysicalConstants {
    pub const SOLAR: PhysicalConstants = PhysicalConstants {
        solar_mass: 1.9e30,
        gravitational_constant: 6.67e-11,
    };

    /// Standard gravitational parameter `GM`.
    pub fn mu(&self) -> f64 {
        self.gravitational_constant * self.solar_mass
    }
}

/// Initial conditions of the comet, in SI units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitParameters {
    r0: f64,
    v0: f64,
    alpha: f64,
}

impl OrbitParameters {
    pub fn new(r0: f64, v0: f64, alpha: f64) -> Result<Self, OrbitError> {
        if !(r0.is_finite() && r0 > 0.0) {
            return Err(OrbitError::NonPositiveDistance(r0));
        }
        if !(v0.is_finite() && v0 >= 0.0) {
            return Err(OrbitError::NegativeSpeed(v0));
        }
        if !(0.0..=PI).contains(&alpha) {
            return Err(OrbitError::AngleOutOfRange(alpha));
        }
        Ok(Self { r0, v0, alpha })
    }

    /// Initial distance from the Sun, m.
    pub fn r0(&self) -> f64 {
        self.r0
    }

    /// Initial speed, m/s.
    pub fn v0(&self) -> f64 {
        self.v0
    }

    /// Angle between the velocity and radius vectors, rad.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedOrbit {
    pub angular_momentum: f64,
    pub eccentricity: f64,
    pub constants: PhysicalConstants,
}

impl DerivedOrbit {
    pub fn solve(
        params: &OrbitParameters,
        constants: PhysicalConstants,
    ) -> Result<Self, OrbitError> {
        let angular_momentum = params.r0 * params.v0 * params.alpha.sin();
        let radicand = eccentricity_radicand(params, angular_momentum, &constants);
        let eccentricity = eccentricity_from_radicand(radicand)?;
        Ok(Self {
            angular_momentum,
            eccentricity,
            constants,
        })
    }

    /// Radial distance at true anomaly `theta`.
    ///
    /// A zero denominator gives a non-finite value; negative values belong to
    /// the far branch of a hyperbola and are returned as is.
    pub fn radius_at(&self, theta: f64) -> f64 {
        let mu = self.constants.mu();
        self.angular_momentum * self.angular_momentum
            / (mu * (1.0 + self.eccentricity * theta.cos()))
    }

    pub fn is_bound(&self) -> bool {
        self.eccentricity < 1.0
    }

    /// Perihelion distance `L² / (GM (1 + e))`.
    pub fn perihelion(&self) -> f64 {
        self.radius_at(0.0)
    }
}

fn eccentricity_radicand(
    params: &OrbitParameters,
    angular_momentum: f64,
    constants: &PhysicalConstants,
) -> f64 {
    let mu = constants.mu();
    let energy_term = params.v0 * params.v0 - 2.0 * mu / params.r0;
    1.0 + energy_term * angular_momentum * angular_momentum / (mu * mu)
}

/// NaN radicands are rejected along with negative ones.
pub fn eccentricity_from_radicand(radicand: f64) -> Result<f64, OrbitError> {
    if radicand >= 0.0 {
        Ok(radicand.sqrt())
    } else {
        Err(OrbitError::NegativeRadicand { radicand })
    }
}
