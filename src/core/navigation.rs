use glam::{Vec2, Vec3};
use log::debug;

use super::frame::FrameTime;
use super::input::InputState;
use crate::camera::CameraPose;
use crate::config::NavigationConfig;
use crate::error::CoreError;
use crate::math::damp;

/// Below this the idle height snaps onto the base height
const HEIGHT_SNAP: f32 = 1e-4;
/// Horizontal heading shorter than this is treated as degenerate
const MIN_HEADING: f32 = 1e-4;

/// Walks the camera across the ground plane from held movement keys.
///
/// Only advanced while pointer capture is held. Owns the camera pose.
#[derive(Debug, Clone)]
pub struct NavigationController {
    pose: CameraPose,
    config: NavigationConfig,
    /// Last usable horizontal heading, reused when looking straight up/down
    last_forward: Vec3,
}

impl NavigationController {
    pub fn new(pose: CameraPose, config: NavigationConfig) -> Self {
        let last_forward = horizontal(pose.look_direction()).unwrap_or(Vec3::NEG_Z);
        Self {
            pose,
            config,
            last_forward,
        }
    }

    pub fn pose(&self) -> &CameraPose {
        &self.pose
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    /// Rotate the view from a pointer delta
    pub fn look(&mut self, delta: Vec2) {
        if delta == Vec2::ZERO {
            return;
        }
        self.pose
            .apply_look_delta(delta, self.config.look_sensitivity, self.config.pitch_limit);
    }

    /// Horizontal forward/right basis for `look_direction`
    pub fn basis(&mut self, look_direction: Vec3) -> (Vec3, Vec3) {
        let forward = match horizontal(look_direction) {
            Ok(forward) => {
                self.last_forward = forward;
                forward
            }
            Err(e) => {
                debug!(target: "navigation", "{}, reusing previous heading", e);
                self.last_forward
            }
        };
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        (forward, right)
    }

    /// Advance one frame. Moves at most `speed * dt`, diagonals included.
    pub fn advance(&mut self, time: FrameTime, input: &InputState, look_direction: Vec3) -> CameraPose {
        let dt = if time.delta.is_finite() { time.delta.max(0.0) } else { 0.0 };
        let (forward, right) = self.basis(look_direction);

        let direction = forward * input.forward_axis() + right * input.right_axis();
        if direction.length_squared() > 0.0 {
            let step = direction.normalize() * self.config.speed * dt;
            self.pose.position.x += step.x;
            self.pose.position.z += step.z;
        }

        self.pose.position.y = if input.is_moving() {
            self.bob_height(time.elapsed)
        } else {
            self.settle_height(self.pose.position.y, dt)
        };
        self.pose
    }

    /// Walking bob; stays within `base ± amplitude`
    fn bob_height(&self, elapsed: f32) -> f32 {
        let phase = (elapsed * self.config.bob_frequency).sin();
        let phase = if phase.is_finite() { phase } else { 0.0 };
        self.config.base_height + self.config.bob_amplitude * phase
    }

    /// Exponential return toward the base height, never overshooting
    fn settle_height(&self, current: f32, dt: f32) -> f32 {
        let base = self.config.base_height;
        if !current.is_finite() {
            return base;
        }
        let next = damp(current, base, self.config.height_recovery, dt);
        if (next - base).abs() < HEIGHT_SNAP {
            base
        } else {
            next
        }
    }
}

fn horizontal(direction: Vec3) -> Result<Vec3, CoreError> {
    let flat = Vec3::new(direction.x, 0.0, direction.z);
    let length = flat.length();
    if !length.is_finite() || length < MIN_HEADING {
        return Err(CoreError::DegenerateVector);
    }
    Ok(flat / length)
}
