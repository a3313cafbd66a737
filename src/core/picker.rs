use log::debug;
use serde::Serialize;

use super::interactable::{Interactable, ObjectId};
use crate::math::Ray;

/// Distances closer than this count as a tie, broken by lower id
const TIE_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorStyle {
    #[default]
    Default,
    Pointer,
}

/// Hover/selection changes produced by one picking pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PickResult {
    pub entered: Vec<ObjectId>,
    pub exited: Vec<ObjectId>,
    pub selected: Option<ObjectId>,
}

impl PickResult {
    pub fn is_empty(&self) -> bool {
        self.entered.is_empty() && self.exited.is_empty() && self.selected.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct HoverTarget {
    id: ObjectId,
    instance: u64,
}

/// Resolves which object sits under the pointer ray.
///
/// Tracks hover by id and instance, so an object removed and re-added under
/// the same id never receives an exit event meant for its predecessor.
#[derive(Debug, Clone)]
pub struct InteractionPicker {
    hovered: Option<HoverTarget>,
    max_distance: f32,
}

impl InteractionPicker {
    pub fn new(max_distance: f32) -> Self {
        Self {
            hovered: None,
            max_distance,
        }
    }

    pub fn hovered(&self) -> Option<&ObjectId> {
        self.hovered.as_ref().map(|target| &target.id)
    }

    pub fn cursor_style(&self) -> CursorStyle {
        if self.hovered.is_some() {
            CursorStyle::Pointer
        } else {
            CursorStyle::Default
        }
    }

    /// Nearest object hit by `ray`, ties going to the lower id
    pub fn nearest<'a>(&self, ray: &Ray, objects: &'a [Interactable]) -> Option<(&'a Interactable, f32)> {
        let mut best: Option<(&Interactable, f32)> = None;
        for object in objects {
            let Some(distance) = object.collision_volume().hit(ray) else {
                continue;
            };
            if !distance.is_finite() || distance > self.max_distance {
                continue;
            }
            best = match best {
                None => Some((object, distance)),
                Some((current, current_distance)) => {
                    if (distance - current_distance).abs() <= TIE_EPSILON {
                        if object.id < current.id {
                            Some((object, distance))
                        } else {
                            Some((current, current_distance))
                        }
                    } else if distance < current_distance {
                        Some((object, distance))
                    } else {
                        Some((current, current_distance))
                    }
                }
            };
        }
        best
    }

    /// Resolve hover for this frame, then commit a click if one arrived.
    ///
    /// `ray` is `None` while no pointer can hover (a modal is open). Only
    /// the `hovered` flag on objects is touched.
    pub fn update(&mut self, ray: Option<&Ray>, objects: &mut [Interactable], clicked: bool) -> PickResult {
        let mut result = PickResult::default();
        self.drop_stale(objects);

        let next = match ray {
            Some(ray) => self.nearest(ray, objects).map(|(object, _)| HoverTarget {
                id: object.id.clone(),
                instance: object.instance,
            }),
            None => None,
        };

        if next != self.hovered {
            if let Some(previous) = self.hovered.take() {
                result.exited.push(previous.id);
            }
            if let Some(target) = &next {
                result.entered.push(target.id.clone());
            }
            self.hovered = next;
        }

        for object in objects.iter_mut() {
            object.hovered = self
                .hovered
                .as_ref()
                .is_some_and(|t| t.id == object.id && t.instance == object.instance);
        }

        if clicked {
            result.selected = self.select();
        }
        result
    }

    /// Commit the hovered object, if any; no-op otherwise
    pub fn select(&self) -> Option<ObjectId> {
        self.hovered.as_ref().map(|target| target.id.clone())
    }

    fn drop_stale(&mut self, objects: &[Interactable]) {
        let Some(target) = &self.hovered else {
            return;
        };
        let alive = objects
            .iter()
            .any(|o| o.id == target.id && o.instance == target.instance);
        if !alive {
            debug!(target: "picking", "Hovered `{}` #{} is gone, dropping", target.id, target.instance);
            self.hovered = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::interactable::ObjectKind;
    use crate::math::Rgb;
    use glam::Vec3;

    fn beacon(id: &str, instance: u64, z: f32) -> Interactable {
        Interactable::new(
            ObjectId::new(id),
            instance,
            ObjectKind::Beacon { read: false },
            Vec3::new(0.0, 0.0, z),
            Rgb([1.0, 1.0, 1.0]),
        )
    }

    fn forward_ray() -> Ray {
        Ray::new(Vec3::ZERO, Vec3::NEG_Z)
    }

    #[test]
    fn nearer_object_wins() {
        let mut objects = vec![beacon("far", 1, -5.5), beacon("near", 2, -3.5)];
        let mut picker = InteractionPicker::new(50.0);
        let result = picker.update(Some(&forward_ray()), &mut objects, false);
        assert_eq!(result.entered, vec![ObjectId::new("near")]);
        assert!(objects[1].hovered);
        assert!(!objects[0].hovered);
    }

    #[test]
    fn equal_distance_prefers_lower_id() {
        let mut objects = vec![beacon("b", 1, -4.0), beacon("a", 2, -4.0)];
        let mut picker = InteractionPicker::new(50.0);
        picker.update(Some(&forward_ray()), &mut objects, false);
        assert_eq!(picker.hovered(), Some(&ObjectId::new("a")));
    }

    #[test]
    fn leaving_emits_exit_once() {
        let mut objects = vec![beacon("a", 1, -4.0)];
        let mut picker = InteractionPicker::new(50.0);
        picker.update(Some(&forward_ray()), &mut objects, false);
        let away = Ray::new(Vec3::ZERO, Vec3::Z);
        let result = picker.update(Some(&away), &mut objects, false);
        assert_eq!(result.exited, vec![ObjectId::new("a")]);
        let again = picker.update(Some(&away), &mut objects, false);
        assert!(again.is_empty());
        assert!(!objects[0].hovered);
    }

    #[test]
    fn click_without_hover_selects_nothing() {
        let mut objects = vec![beacon("a", 1, 4.0)];
        let mut picker = InteractionPicker::new(50.0);
        let result = picker.update(Some(&forward_ray()), &mut objects, true);
        assert_eq!(result.selected, None);
    }

    #[test]
    fn click_selects_hovered_without_touching_flags() {
        let mut objects = vec![beacon("a", 1, -4.0)];
        let mut picker = InteractionPicker::new(50.0);
        let result = picker.update(Some(&forward_ray()), &mut objects, true);
        assert_eq!(result.selected, Some(ObjectId::new("a")));
        assert!(!objects[0].selected);
        assert!(objects[0].glowing());
    }

    #[test]
    fn beyond_max_distance_is_ignored() {
        let mut objects = vec![beacon("a", 1, -30.0)];
        let mut picker = InteractionPicker::new(10.0);
        let result = picker.update(Some(&forward_ray()), &mut objects, false);
        assert!(result.entered.is_empty());
    }

    #[test]
    fn removed_hover_is_dropped_silently() {
        let mut objects = vec![beacon("a", 1, -4.0)];
        let mut picker = InteractionPicker::new(50.0);
        picker.update(Some(&forward_ray()), &mut objects, false);

        let mut empty: Vec<Interactable> = Vec::new();
        let result = picker.update(Some(&forward_ray()), &mut empty, false);
        assert!(result.is_empty());
        assert_eq!(picker.cursor_style(), CursorStyle::Default);
    }
}
