use std::f32::consts::TAU;

use glam::Vec3;
use log::warn;
use rand::rngs::ThreadRng;
use rand::Rng;
use serde::Deserialize;

use crate::error::CoreError;

/// Slack for float rounding when checking a generated position
const BOUNDS_EPSILON: f32 = 1e-4;

/// Annulus around the landmark, plus a height band, that objects spawn in
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlacementConstraint {
    pub min_radius: f32,
    pub max_radius: f32,
    pub min_height: f32,
    pub max_height: f32,
}

impl Default for PlacementConstraint {
    fn default() -> Self {
        Self {
            min_radius: 4.0,
            max_radius: 8.0,
            min_height: 1.5,
            max_height: 5.0,
        }
    }
}

impl PlacementConstraint {
    pub fn new(
        min_radius: f32,
        max_radius: f32,
        min_height: f32,
        max_height: f32,
    ) -> Result<Self, CoreError> {
        let constraint = Self {
            min_radius,
            max_radius,
            min_height,
            max_height,
        };
        constraint.validate()?;
        Ok(constraint)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.is_finite() {
            return Err(CoreError::InvalidConstraint("bounds must be finite".into()));
        }
        if self.min_radius < 0.0 {
            return Err(CoreError::InvalidConstraint(format!(
                "min_radius {} is negative",
                self.min_radius
            )));
        }
        if self.min_radius > self.max_radius {
            return Err(CoreError::InvalidConstraint(format!(
                "min_radius {} exceeds max_radius {}",
                self.min_radius, self.max_radius
            )));
        }
        if self.min_height > self.max_height {
            return Err(CoreError::InvalidConstraint(format!(
                "min_height {} exceeds max_height {}",
                self.min_height, self.max_height
            )));
        }
        Ok(())
    }

    fn is_finite(&self) -> bool {
        [self.min_radius, self.max_radius, self.min_height, self.max_height]
            .iter()
            .all(|v| v.is_finite())
    }

    /// Whether `position` lies in the annulus and height band
    pub fn contains(&self, position: Vec3) -> bool {
        let radial = Vec3::new(position.x, 0.0, position.z).length();
        radial >= self.min_radius - BOUNDS_EPSILON
            && radial <= self.max_radius + BOUNDS_EPSILON
            && position.y >= self.min_height - BOUNDS_EPSILON
            && position.y <= self.max_height + BOUNDS_EPSILON
    }
}

/// Scatters new objects around the landmark.
///
/// The radius is drawn uniformly (not area-uniform), so objects cluster
/// toward the inner ring. Positions are not reproducible across runs unless
/// a seeded rng is supplied, and overlapping objects are allowed.
#[derive(Debug, Clone)]
pub struct SpatialPlacer<R: Rng = ThreadRng> {
    rng: R,
}

impl SpatialPlacer<ThreadRng> {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for SpatialPlacer<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> SpatialPlacer<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Sample a position inside `constraint`.
    ///
    /// An invalid constraint is sanitized (bounds swapped, radius floored at
    /// zero) rather than rejected; callers validate at configuration time.
    /// Non-finite bounds cannot be sanitized and fall back to the default
    /// constraint.
    pub fn place(&mut self, constraint: &PlacementConstraint) -> Vec3 {
        let fallback;
        let constraint = if constraint.is_finite() {
            constraint
        } else {
            warn!(target: "objects", "Non-finite placement bounds {:?}, using defaults", constraint);
            fallback = PlacementConstraint::default();
            &fallback
        };
        let (min_r, max_r) = ordered(constraint.min_radius.max(0.0), constraint.max_radius.max(0.0));
        let (min_h, max_h) = ordered(constraint.min_height, constraint.max_height);

        let theta = self.rng.gen_range(0.0..TAU);
        let radius = self.rng.gen_range(min_r..=max_r);
        let height = self.rng.gen_range(min_h..=max_h);

        Vec3::new(radius * theta.cos(), height, radius * theta.sin())
    }

    /// Uniform sample in `[a, b]`, either order; non-finite bounds yield 0
    pub fn uniform(&mut self, a: f32, b: f32) -> f32 {
        let a = if a.is_finite() { a } else { 0.0 };
        let b = if b.is_finite() { b } else { 0.0 };
        let (lo, hi) = ordered(a, b);
        self.rng.gen_range(lo..=hi)
    }
}

fn ordered(a: f32, b: f32) -> (f32, f32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
