// config.rs - Runtime tuning, loaded from JSON with per-field defaults
use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec3;
use serde::Deserialize;

use crate::core::{ObjectDescriptor, PlacementConstraint};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub navigation: NavigationConfig,
    pub placement: PlacementConstraint,
    pub picking: PickingConfig,
    pub animation: AnimationConfig,
    pub scene: SceneConfig,
    pub scenery: SceneryConfig,
}

impl Config {
    /// Read and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.placement
            .validate()
            .context("Invalid placement section")?;
        anyhow::ensure!(
            self.navigation.speed.is_finite() && self.navigation.speed >= 0.0,
            "navigation.speed must be a non-negative number"
        );
        anyhow::ensure!(
            self.picking.fov_y_degrees > 0.0 && self.picking.fov_y_degrees < 180.0,
            "picking.fov_y_degrees must be within (0, 180)"
        );
        self.scenery
            .forest
            .ring()
            .validate()
            .context("Invalid scenery.forest section")?;
        let snow = &self.scenery.snow;
        anyhow::ensure!(
            snow.ceiling.is_finite() && snow.ceiling > 0.0,
            "scenery.snow.ceiling must be a positive number"
        );
        anyhow::ensure!(
            snow.half_extent.is_finite() && snow.half_extent >= 0.0,
            "scenery.snow.half_extent must be a non-negative number"
        );
        Ok(())
    }
}

/// Read a JSON array of object descriptors, as delivered by an object source
pub fn load_descriptors(path: impl AsRef<Path>) -> Result<Vec<ObjectDescriptor>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read objects {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse objects {}", path.display()))
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// World units per second
    pub speed: f32,
    pub base_height: f32,
    pub bob_amplitude: f32,
    /// Radians per second of the walking bob
    pub bob_frequency: f32,
    /// Rate of the idle return to `base_height`, per second
    pub height_recovery: f32,
    /// Radians per pointer count
    pub look_sensitivity: f32,
    pub pitch_limit: f32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            speed: 5.0,
            base_height: 2.0,
            bob_amplitude: 0.08,
            bob_frequency: 12.0,
            height_recovery: 5.0,
            look_sensitivity: 0.002,
            pitch_limit: 1.5,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PickingConfig {
    pub fov_y_degrees: f32,
    /// Hits farther than this along the ray are ignored
    pub max_distance: f32,
}

impl Default for PickingConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            max_distance: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub beacon_bob_amplitude: f32,
    /// Radians per second of continuous beacon spin
    pub beacon_spin_rate: f32,
    pub hover_scale: f32,
    pub hover_tilt: f32,
    /// Exponential smoothing rate for hover emphasis, per second
    pub hover_smoothing: f32,
    pub guide_bounce_height: f32,
    pub guide_bounce_frequency: f32,
    pub guide_settle_smoothing: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            beacon_bob_amplitude: 0.2,
            beacon_spin_rate: 0.3,
            hover_scale: 1.2,
            hover_tilt: 0.2,
            hover_smoothing: 6.3,
            guide_bounce_height: 0.1,
            guide_bounce_frequency: 10.0,
            guide_settle_smoothing: 6.3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub spawn_position: Vec3,
    pub spawn_yaw: f32,
    pub spawn_pitch: f32,
    /// Resident guide; `None` leaves the scene without one
    pub guide: Option<GuideConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            spawn_position: Vec3::new(0.0, 2.0, 8.0),
            spawn_yaw: std::f32::consts::PI,
            spawn_pitch: 0.0,
            guide: Some(GuideConfig::default()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GuideConfig {
    pub id: String,
    pub position: Vec3,
    pub yaw: f32,
    pub color: String,
    pub label: String,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            id: "guide".to_string(),
            position: Vec3::new(2.5, 0.0, 4.0),
            yaw: -0.5,
            color: "#16a34a".to_string(),
            label: "Talk to Jingle".to_string(),
        }
    }
}

/// Backdrop around the grove: a ring of trees and falling snow
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct SceneryConfig {
    pub forest: ForestConfig,
    pub snow: SnowConfig,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    pub count: usize,
    pub min_radius: f32,
    pub max_radius: f32,
    pub min_scale: f32,
    pub max_scale: f32,
}

impl ForestConfig {
    /// Ground-level ring the trees stand in
    pub fn ring(&self) -> PlacementConstraint {
        PlacementConstraint {
            min_radius: self.min_radius,
            max_radius: self.max_radius,
            min_height: 0.0,
            max_height: 0.0,
        }
    }
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            count: 40,
            min_radius: 10.0,
            max_radius: 35.0,
            min_scale: 0.5,
            max_scale: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SnowConfig {
    pub count: usize,
    /// Flakes spawn within `±half_extent` on x and z
    pub half_extent: f32,
    /// Height flakes spawn below and respawn at after reaching the ground
    pub ceiling: f32,
    /// Fall speed range in units per second
    pub min_speed: f32,
    pub max_speed: f32,
}

impl Default for SnowConfig {
    fn default() -> Self {
        Self {
            count: 1000,
            half_extent: 20.0,
            ceiling: 20.0,
            min_speed: 1.2,
            max_speed: 4.2,
        }
    }
}
