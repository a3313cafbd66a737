use glam::Vec3;

use super::ray::{intersect_aabb, Ray};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

impl AABB {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn translated(&self, offset: Vec3) -> AABB {
        AABB {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Distance along `ray` to the box, if it is hit in front of the origin
    pub fn hit(&self, ray: &Ray) -> Option<f32> {
        if self.contains(ray.origin) {
            return Some(0.0);
        }
        let t = intersect_aabb(ray.origin, ray.direction, self.min, self.max);
        (t >= 0.0).then_some(t)
    }
}
