use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::math::{intersect_sphere, Ray, Rgb, AABB};

/// Stable identifier supplied by the object source
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindTag {
    Beacon,
    Guide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// Receivable item floating around the landmark
    Beacon { read: bool },
    /// Conversational character
    Guide,
}

/// Per-entity animation state carried between ticks
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationPhase {
    /// Seconds this instance has been animated
    pub elapsed: f32,
    /// Hover emphasis in [0, 1], eased toward 1 while hovered
    pub emphasis: f32,
    /// Accumulated beacon spin, radians in [0, TAU)
    pub spin: f32,
    /// Current guide hop offset, never negative
    pub bounce: f32,
}

/// Object as the object source describes it
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ObjectDescriptor {
    pub id: ObjectId,
    pub kind: KindTag,
    #[serde(default)]
    pub position: Option<Vec3>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub label: Option<String>,
}

impl ObjectDescriptor {
    pub fn beacon(id: impl Into<String>) -> Self {
        Self {
            id: ObjectId::new(id),
            kind: KindTag::Beacon,
            position: None,
            color: None,
            read: false,
            label: None,
        }
    }

    pub fn guide(id: impl Into<String>, position: Vec3) -> Self {
        Self {
            id: ObjectId::new(id),
            kind: KindTag::Guide,
            position: Some(position),
            color: None,
            read: false,
            label: None,
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = Some(position);
        self
    }

    pub fn colored(mut self, hex: impl Into<String>) -> Self {
        self.color = Some(hex.into());
        self
    }

    pub fn read(mut self, read: bool) -> Self {
        self.read = read;
        self
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Beacon pick sphere radius; covers the envelope at any spin angle
pub const BEACON_PICK_RADIUS: f32 = 0.5;
/// Guide pick box half extents, measured from the feet
pub const GUIDE_HALF_EXTENTS: Vec3 = Vec3::new(0.5, 1.3, 0.5);

/// Hit volume in world space for the current frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionVolume {
    Sphere { center: Vec3, radius: f32 },
    Box(AABB),
}

impl CollisionVolume {
    pub fn hit(&self, ray: &Ray) -> Option<f32> {
        match self {
            CollisionVolume::Sphere { center, radius } => intersect_sphere(ray, *center, *radius),
            CollisionVolume::Box(aabb) => aabb.hit(ray),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Interactable {
    pub id: ObjectId,
    /// Distinguishes a re-added id from the instance it replaced
    pub instance: u64,
    pub kind: ObjectKind,
    /// Spawn position; immutable after creation
    pub position: Vec3,
    /// Rest yaw in radians
    pub yaw: f32,
    pub base_color: Rgb,
    pub label: Option<String>,
    pub hovered: bool,
    pub selected: bool,
    /// Resident objects survive object-source reconciliation
    pub resident: bool,
    pub phase: AnimationPhase,
    /// Vertical animation offset applied this frame, used by picking
    pub render_offset: Vec3,
}

impl Interactable {
    pub fn new(id: ObjectId, instance: u64, kind: ObjectKind, position: Vec3, base_color: Rgb) -> Self {
        Self {
            id,
            instance,
            kind,
            position,
            yaw: 0.0,
            base_color,
            label: None,
            hovered: false,
            selected: false,
            resident: false,
            phase: AnimationPhase::default(),
            render_offset: Vec3::ZERO,
        }
    }

    /// Unread beacons glow
    pub fn glowing(&self) -> bool {
        matches!(self.kind, ObjectKind::Beacon { read: false })
    }

    /// Where the object is drawn this frame
    pub fn animated_position(&self) -> Vec3 {
        self.position + self.render_offset
    }

    pub fn collision_volume(&self) -> CollisionVolume {
        let origin = self.animated_position();
        match self.kind {
            ObjectKind::Beacon { .. } => CollisionVolume::Sphere {
                center: origin,
                radius: BEACON_PICK_RADIUS,
            },
            ObjectKind::Guide => CollisionVolume::Box(AABB::from_center_half_extents(
                origin + Vec3::new(0.0, GUIDE_HALF_EXTENTS.y, 0.0),
                GUIDE_HALF_EXTENTS,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beacon_at(position: Vec3) -> Interactable {
        Interactable::new(
            ObjectId::new("b"),
            1,
            ObjectKind::Beacon { read: false },
            position,
            Rgb([1.0, 0.0, 0.0]),
        )
    }

    #[test]
    fn descriptor_parses_from_json() {
        let json = r##"{ "id": "a", "kind": "beacon", "color": "#ef4444", "label": "From: Ana" }"##;
        let descriptor: ObjectDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(descriptor.id, ObjectId::new("a"));
        assert_eq!(descriptor.kind, KindTag::Beacon);
        assert!(descriptor.position.is_none());
        assert!(!descriptor.read);
    }

    #[test]
    fn descriptor_with_position() {
        let json = r#"{ "id": "g", "kind": "guide", "position": [2.5, 0.0, 4.0] }"#;
        let descriptor: ObjectDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(descriptor.position, Some(Vec3::new(2.5, 0.0, 4.0)));
    }

    #[test]
    fn read_beacon_stops_glowing() {
        let mut beacon = beacon_at(Vec3::ZERO);
        assert!(beacon.glowing());
        beacon.kind = ObjectKind::Beacon { read: true };
        assert!(!beacon.glowing());
    }

    #[test]
    fn collision_follows_animation_offset() {
        let mut beacon = beacon_at(Vec3::new(0.0, 2.0, -5.0));
        beacon.render_offset = Vec3::new(0.0, 3.0, 0.0);
        let ray = Ray::new(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(beacon.collision_volume().hit(&ray).is_none());
        beacon.render_offset = Vec3::ZERO;
        assert!(beacon.collision_volume().hit(&ray).is_some());
    }

    #[test]
    fn guide_box_stands_on_its_feet() {
        let guide = Interactable::new(
            ObjectId::new("g"),
            1,
            ObjectKind::Guide,
            Vec3::ZERO,
            Rgb([0.0, 1.0, 0.0]),
        );
        match guide.collision_volume() {
            CollisionVolume::Box(aabb) => {
                assert_eq!(aabb.min.y, 0.0);
                assert!((aabb.max.y - 2.6).abs() < 1e-6);
            }
            other => panic!("unexpected volume {:?}", other),
        }
    }
}
