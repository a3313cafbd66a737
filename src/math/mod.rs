mod aabb;
mod color;
mod ray;
mod smoothing;

pub use aabb::AABB;
pub use color::{hsv_to_rgb, palette_color, Rgb};
pub use ray::{intersect_aabb, intersect_sphere, Ray};
pub use smoothing::{damp, lerp};
