use glam::Vec3;

/// Half-line used for hover/selection picking
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Direction is normalized; a zero direction stays zero and hits nothing
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Slab test. Returns the entry distance, the exit distance when the origin
/// is inside the box, or `-1.0` on a miss.
pub fn intersect_aabb(ray_origin: Vec3, ray_dir: Vec3, box_min: Vec3, box_max: Vec3) -> f32 {
    const EPSILON: f32 = 1e-8;

    // Near-zero components clamp to a huge inverse instead of dividing by zero
    let inv_dir = Vec3::new(
        if ray_dir.x.abs() < EPSILON { 1.0 / EPSILON.copysign(ray_dir.x) } else { 1.0 / ray_dir.x },
        if ray_dir.y.abs() < EPSILON { 1.0 / EPSILON.copysign(ray_dir.y) } else { 1.0 / ray_dir.y },
        if ray_dir.z.abs() < EPSILON { 1.0 / EPSILON.copysign(ray_dir.z) } else { 1.0 / ray_dir.z },
    );

    let t_min = (box_min - ray_origin) * inv_dir;
    let t_max = (box_max - ray_origin) * inv_dir;

    let t1 = t_min.min(t_max);
    let t2 = t_min.max(t_max);

    let t_near = t1.x.max(t1.y).max(t1.z);
    let t_far = t2.x.min(t2.y).min(t2.z);

    if t_near > t_far || t_far < 0.0 {
        return -1.0;
    }

    if t_near < 0.0 {
        if t_far > 0.001 {
            t_far
        } else {
            -1.0
        }
    } else {
        t_near
    }
}

/// Nearest non-negative hit distance against a sphere, if any
pub fn intersect_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let a = ray.direction.dot(ray.direction);
    if a <= f32::EPSILON {
        return None;
    }
    let oc = ray.origin - center;
    let half_b = oc.dot(ray.direction);
    let c = oc.dot(oc) - radius * radius;

    let discriminant = half_b * half_b - a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let near = (-half_b - sqrt_d) / a;
    if near >= 0.0 {
        return Some(near);
    }
    // Origin inside the sphere counts as a hit at distance zero
    let far = (-half_b + sqrt_d) / a;
    if far >= 0.0 {
        Some(0.0)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersect_aabb_hit() {
        let t = intersect_aabb(
            Vec3::ZERO,
            Vec3::X,
            Vec3::new(5.0, -1.0, -1.0),
            Vec3::new(10.0, 1.0, 1.0),
        );
        assert!((t - 5.0).abs() < 0.01);
    }

    #[test]
    fn test_intersect_aabb_miss() {
        let t = intersect_aabb(
            Vec3::ZERO,
            Vec3::X,
            Vec3::new(5.0, 2.0, 2.0),
            Vec3::new(10.0, 3.0, 3.0),
        );
        assert!(t < 0.0);
    }

    #[test]
    fn test_intersect_sphere_in_front() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let t = intersect_sphere(&ray, Vec3::new(0.0, 0.0, -5.0), 1.0).unwrap();
        assert!((t - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_intersect_sphere_behind() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert!(intersect_sphere(&ray, Vec3::new(0.0, 0.0, 5.0), 1.0).is_none());
    }

    #[test]
    fn test_intersect_sphere_from_inside() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(intersect_sphere(&ray, Vec3::ZERO, 2.0), Some(0.0));
    }

    #[test]
    fn test_zero_direction_never_hits() {
        let ray = Ray::new(Vec3::ZERO, Vec3::ZERO);
        assert!(intersect_sphere(&ray, Vec3::ZERO, 2.0).is_none());
    }
}
