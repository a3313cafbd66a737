use glam::{Vec2, Vec3};
use serde::Serialize;

use crate::math::Ray;

/// First-person camera pose. Yaw PI looks down -Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Resting eye height the walking bob oscillates around
    pub base_height: f32,
}

impl CameraPose {
    pub fn new(position: Vec3, yaw: f32, pitch: f32, base_height: f32) -> Self {
        Self {
            position,
            yaw,
            pitch,
            base_height,
        }
    }

    /// Unit view direction from yaw/pitch
    pub fn look_direction(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.cos() * self.pitch.cos(),
        )
        .normalize_or_zero()
    }

    /// Apply a raw pointer delta; pitch is clamped to `±pitch_limit`
    pub fn apply_look_delta(&mut self, delta: Vec2, sensitivity: f32, pitch_limit: f32) {
        if !delta.is_finite() {
            return;
        }
        self.yaw = (self.yaw - delta.x * sensitivity).rem_euclid(std::f32::consts::TAU);
        let limit = pitch_limit.abs();
        self.pitch = (self.pitch - delta.y * sensitivity).clamp(-limit, limit);
    }

    /// Picking ray through a point in normalized device coordinates
    pub fn ray_through(&self, ndc: Vec2, aspect: f32, fov_y: f32) -> Ray {
        let forward = self.look_direction();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();
        let half_height = (fov_y * 0.5).tan();
        let half_width = half_height * aspect.max(f32::EPSILON);

        let ndc = ndc.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
        let direction = forward + right * (ndc.x * half_width) + up * (ndc.y * half_height);
        Ray::new(self.position, direction)
    }
}
