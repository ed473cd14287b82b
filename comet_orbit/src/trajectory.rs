use std::f64::consts::TAU;

use nalgebra::Point2;

use crate::orbit::DerivedOrbit;

pub type Point = Point2<f64>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectorySample {
    pub theta: f64,
    pub rho: f64,
    pub x: f64,
    pub y: f64,
}

impl TrajectorySample {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Finite and on the physical branch of the orbit.
    pub fn is_drawable(&self) -> bool {
        self.rho.is_finite() && self.rho >= 0.0 && self.x.is_finite() && self.y.is_finite()
    }
}

/// Orbit sampled at evenly spaced true anomalies over `[0, 2π]`.
#[derive(Debug, Clone)]
pub struct Trajectory {
    samples: Vec<TrajectorySample>,
}

impl Trajectory {
    pub fn sample(orbit: &DerivedOrbit, iterations: usize) -> Self {
        let samples = linspace(0.0, TAU, iterations)
            .map(|theta| {
                let rho = orbit.radius_at(theta);
                let position = polar_to_cartesian(rho, theta);
                TrajectorySample {
                    theta,
                    rho,
                    x: position.x,
                    y: position.y,
                }
            })
            .collect();
        Self { samples }
    }

    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TrajectorySample> {
        self.samples.get(index)
    }

    pub fn drawable(&self) -> impl Iterator<Item = &TrajectorySample> + '_ {
        self.samples.iter().filter(|s| s.is_drawable())
    }

    pub fn non_drawable_count(&self) -> usize {
        self.samples.len() - self.drawable().count()
    }

    /// `min(x) + max(x)` over drawable samples; reflecting a point through it
    /// mirrors the orbit about the vertical line through its centre.
    pub fn mirror_axis(&self) -> f64 {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for sample in self.drawable() {
            min = min.min(sample.x);
            max = max.max(sample.x);
        }
        if min.is_finite() && max.is_finite() {
            min + max
        } else {
            0.0
        }
    }

    /// Sample indices shown by each animation frame: `i * (len / frames)`.
    pub fn frame_indices(&self, frames: usize) -> Vec<usize> {
        if frames == 0 || self.samples.is_empty() {
            return Vec::new();
        }
        let stride = (self.samples.len() / frames).max(1);
        (0..frames)
            .map(|i| i * stride)
            .filter(|&index| index < self.samples.len())
            .collect()
    }

    /// Runs of consecutive drawable samples; the orbit line is broken wherever
    /// a sample is non-finite or lies on the far hyperbola branch.
    pub fn drawable_segments(&self) -> Vec<Vec<(f64, f64)>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for sample in &self.samples {
            if sample.is_drawable() {
                current.push((sample.x, sample.y));
            } else if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }

    /// Smallest and largest drawable radius.
    pub fn radius_extent(&self) -> Option<(f64, f64)> {
        self.drawable().fold(None, |acc, s| match acc {
            None => Some((s.rho, s.rho)),
            Some((min, max)) => Some((min.min(s.rho), max.max(s.rho))),
        })
    }
}

/// `count` evenly spaced values from `start` to `end`, both included.
pub fn linspace(start: f64, end: f64, count: usize) -> impl Iterator<Item = f64> {
    let step = if count > 1 {
        (end - start) / (count - 1) as f64
    } else {
        0.0
    };
    (0..count).map(move |i| {
        if count > 1 && i == count - 1 {
            end
        } else {
            start + step * i as f64
        }
    })
}

pub fn polar_to_cartesian(rho: f64, theta: f64) -> Point {
    Point::new(rho * theta.cos(), rho * theta.sin())
}

/// Inverse of [`polar_to_cartesian`] with θ normalised to `[0, 2π)`.
pub fn cartesian_to_polar(point: &Point) -> (f64, f64) {
    let rho = point.coords.norm();
    let mut theta = point.y.atan2(point.x);
    if theta < 0.0 {
        theta += TAU;
    }
    if theta >= TAU {
        theta -= TAU;
    }
    (rho, theta)
}
