use glam::Vec3;
use rand::Rng;
use serde::Serialize;

use super::placement::SpatialPlacer;
use crate::config::{ForestConfig, SnowConfig};

/// Cone trees are 3 units tall at scale 1; their origin sits at mid-height
const TREE_HALF_HEIGHT: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TreeInstance {
    pub position: Vec3,
    pub scale: f32,
}

/// Distant ring of trees, scattered once at start-up and never picked
#[derive(Debug, Clone, Default)]
pub struct Forest {
    trees: Vec<TreeInstance>,
}

impl Forest {
    pub fn scatter<R: Rng>(config: &ForestConfig, placer: &mut SpatialPlacer<R>) -> Self {
        let ring = config.ring();
        let trees = (0..config.count)
            .map(|_| {
                let ground = placer.place(&ring);
                let scale = placer.uniform(config.min_scale, config.max_scale);
                TreeInstance {
                    position: Vec3::new(ground.x, scale * TREE_HALF_HEIGHT, ground.z),
                    scale,
                }
            })
            .collect();
        Self { trees }
    }

    pub fn trees(&self) -> &[TreeInstance] {
        &self.trees
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Snowflake {
    position: Vec3,
    /// Units per second
    speed: f32,
}

/// Snow falling over the grove regardless of what the player does.
///
/// Each flake falls at its own speed and restarts at the ceiling once it
/// drops below the ground.
#[derive(Debug, Clone)]
pub struct SnowField {
    flakes: Vec<Snowflake>,
    ceiling: f32,
}

impl SnowField {
    pub fn new<R: Rng>(config: &SnowConfig, placer: &mut SpatialPlacer<R>) -> Self {
        let ceiling = if config.ceiling.is_finite() {
            config.ceiling.max(0.0)
        } else {
            0.0
        };
        let extent = config.half_extent;
        let flakes = (0..config.count)
            .map(|_| Snowflake {
                position: Vec3::new(
                    placer.uniform(-extent, extent),
                    placer.uniform(0.0, ceiling),
                    placer.uniform(-extent, extent),
                ),
                speed: placer.uniform(config.min_speed, config.max_speed).max(0.0),
            })
            .collect();
        Self { flakes, ceiling }
    }

    pub fn len(&self) -> usize {
        self.flakes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flakes.is_empty()
    }

    pub fn tick(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        for flake in &mut self.flakes {
            flake.position.y -= flake.speed * dt;
            if flake.position.y < 0.0 {
                flake.position.y = self.ceiling;
            }
        }
    }

    pub fn positions(&self) -> Vec<Vec3> {
        self.flakes.iter().map(|flake| flake.position).collect()
    }
}
