use std::collections::HashSet;

use log::{debug, info, warn};
use rand::Rng;

use super::interactable::{Interactable, KindTag, ObjectDescriptor, ObjectId, ObjectKind};
use super::placement::{PlacementConstraint, SpatialPlacer};
use crate::error::CoreError;
use crate::math::{palette_color, Rgb};

/// Outcome of one reconciliation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    pub added: Vec<ObjectId>,
    pub updated: Vec<ObjectId>,
    pub removed: Vec<ObjectId>,
}

impl ReconcileReport {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}

/// Interactables in arrival order, keyed by id.
///
/// Membership changes only through the object source; the frame loop only
/// touches hover and animation fields.
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    objects: Vec<Interactable>,
    next_instance: u64,
    arrivals: usize,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: &ObjectId) -> Option<&Interactable> {
        self.objects.iter().find(|o| &o.id == id)
    }

    pub fn get_mut(&mut self, id: &ObjectId) -> Option<&mut Interactable> {
        self.objects.iter_mut().find(|o| &o.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interactable> {
        self.objects.iter()
    }

    pub fn as_slice(&self) -> &[Interactable] {
        &self.objects
    }

    pub fn as_mut_slice(&mut self) -> &mut [Interactable] {
        &mut self.objects
    }

    /// Insert or update one object. Returns true when a new instance was created.
    ///
    /// Updating keeps the spawn position; only colour, read flag and label follow
    /// the descriptor.
    pub fn upsert<R: Rng>(
        &mut self,
        descriptor: &ObjectDescriptor,
        placer: &mut SpatialPlacer<R>,
        constraint: &PlacementConstraint,
    ) -> bool {
        if let Some(existing) = self.objects.iter_mut().find(|o| o.id == descriptor.id) {
            apply_descriptor(existing, descriptor);
            return false;
        }

        let position = match descriptor.position {
            Some(position) if position.is_finite() => position,
            Some(position) => {
                warn!(target: "objects", "Non-finite position {:?} for `{}`, placing procedurally", position, descriptor.id);
                placer.place(constraint)
            }
            None => placer.place(constraint),
        };

        let color = resolve_color(descriptor.color.as_deref(), self.arrivals);
        let kind = match descriptor.kind {
            KindTag::Beacon => ObjectKind::Beacon {
                read: descriptor.read,
            },
            KindTag::Guide => ObjectKind::Guide,
        };

        self.next_instance += 1;
        self.arrivals += 1;
        let mut object = Interactable::new(
            descriptor.id.clone(),
            self.next_instance,
            kind,
            position,
            color,
        );
        object.label = descriptor.label.clone();
        debug!(target: "objects", "Created `{}` #{} at {:?}", object.id, object.instance, position);
        self.objects.push(object);
        true
    }

    /// Insert an object that reconciliation never removes
    pub fn insert_resident(&mut self, mut object: Interactable) {
        self.objects.retain(|o| o.id != object.id);
        self.next_instance += 1;
        object.instance = self.next_instance;
        object.resident = true;
        self.objects.push(object);
    }

    pub fn remove(&mut self, id: &ObjectId) -> Option<Interactable> {
        let index = self.objects.iter().position(|o| &o.id == id)?;
        Some(self.objects.remove(index))
    }

    /// Full sync against the source's current list.
    ///
    /// Unknown ids are created, known ids updated in place, and non-resident
    /// objects missing from the list removed. A repeated id in one list is a
    /// no-op after its first occurrence.
    pub fn reconcile<R: Rng>(
        &mut self,
        descriptors: &[ObjectDescriptor],
        placer: &mut SpatialPlacer<R>,
        constraint: &PlacementConstraint,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        let mut seen: HashSet<&ObjectId> = HashSet::with_capacity(descriptors.len());

        for descriptor in descriptors {
            if !seen.insert(&descriptor.id) {
                debug!(target: "objects", "Duplicate `{}` in object list ignored", descriptor.id);
                continue;
            }
            if self.upsert(descriptor, placer, constraint) {
                report.added.push(descriptor.id.clone());
            } else {
                report.updated.push(descriptor.id.clone());
            }
        }

        self.objects.retain(|o| {
            let keep = o.resident || seen.contains(&o.id);
            if !keep {
                report.removed.push(o.id.clone());
            }
            keep
        });

        if !report.added.is_empty() || !report.removed.is_empty() {
            info!(
                target: "objects",
                "Reconciled objects: +{} ~{} -{} (total {})",
                report.added.len(),
                report.updated.len(),
                report.removed.len(),
                self.objects.len()
            );
        }
        report
    }

    /// Flag a beacon as read; the modal collaborator calls this after viewing
    pub fn mark_read(&mut self, id: &ObjectId) -> Result<(), CoreError> {
        let object = self
            .get_mut(id)
            .ok_or_else(|| CoreError::StaleReference(id.clone()))?;
        if let ObjectKind::Beacon { read } = &mut object.kind {
            *read = true;
        }
        Ok(())
    }

    pub fn set_selected(&mut self, id: &ObjectId, selected: bool) -> Result<(), CoreError> {
        let object = self
            .get_mut(id)
            .ok_or_else(|| CoreError::StaleReference(id.clone()))?;
        object.selected = selected;
        Ok(())
    }

    /// Number of beacons still unread
    pub fn unread_count(&self) -> usize {
        self.objects.iter().filter(|o| o.glowing()).count()
    }
}

fn apply_descriptor(object: &mut Interactable, descriptor: &ObjectDescriptor) {
    if let Some(hex) = descriptor.color.as_deref() {
        match Rgb::from_hex(hex) {
            Ok(color) => object.base_color = color,
            Err(e) => warn!(target: "objects", "Keeping colour of `{}`: {}", object.id, e),
        }
    }
    if let ObjectKind::Beacon { read } = &mut object.kind {
        // Once read, a beacon stays read even if the source lags behind
        *read = *read || descriptor.read;
    }
    if descriptor.label.is_some() {
        object.label = descriptor.label.clone();
    }
}

fn resolve_color(hex: Option<&str>, arrival: usize) -> Rgb {
    match hex.map(Rgb::from_hex) {
        Some(Ok(color)) => color,
        Some(Err(e)) => {
            warn!(target: "objects", "{}, using palette colour", e);
            palette_color(arrival)
        }
        None => palette_color(arrival),
    }
}
