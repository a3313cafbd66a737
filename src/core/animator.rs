use std::f32::consts::TAU;

use glam::Vec3;
use serde::Serialize;

use super::interactable::{Interactable, ObjectKind};
use crate::config::AnimationConfig;
use crate::math::{damp, lerp};

// Guide idle motion. Head and arms run on their own low frequencies so
// nothing moves in lockstep with the breathing.
const BREATH_RATE: f32 = 2.0;
const BREATH_DEPTH_Y: f32 = 0.02;
const BREATH_DEPTH_XZ: f32 = 0.01;
const HEAD_YAW_RATE: f32 = 0.5;
const HEAD_YAW_RANGE: f32 = 0.2;
const HEAD_PITCH_RATE: f32 = 0.3;
const HEAD_PITCH_RANGE: f32 = 0.05;
const ARM_REST: f32 = 0.5;
const ARM_SWING_RATE: f32 = 3.0;
const ARM_SWING: f32 = 0.1;
const ARM_PHASE: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeadPose {
    pub yaw: f32,
    pub pitch: f32,
}

/// Arm roll in radians, left arm negative at rest
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArmPose {
    pub left: f32,
    pub right: f32,
}

/// What the renderer needs to draw one entity this frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnimationPose {
    pub translation: Vec3,
    pub yaw: f32,
    /// Roll toward the viewer while emphasised
    pub tilt: f32,
    pub scale: Vec3,
    pub head: Option<HeadPose>,
    pub arms: Option<ArmPose>,
}

/// Advances idle motion for beacons and the guide.
///
/// Everything is a function of elapsed time plus the small eased state kept
/// in `AnimationPhase`. Any float input is accepted; non-finite time counts
/// as zero.
#[derive(Debug, Clone, Default)]
pub struct IdleAnimator {
    config: AnimationConfig,
}

impl IdleAnimator {
    pub fn new(config: AnimationConfig) -> Self {
        Self { config }
    }

    pub fn tick(&self, dt: f32, elapsed: f32, entity: &mut Interactable) -> AnimationPose {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let t = if elapsed.is_finite() { elapsed } else { 0.0 };
        entity.phase.elapsed += dt;

        match entity.kind {
            ObjectKind::Beacon { .. } => self.beacon(dt, t, entity),
            ObjectKind::Guide => self.guide(dt, t, entity),
        }
    }

    fn beacon(&self, dt: f32, t: f32, entity: &mut Interactable) -> AnimationPose {
        let cfg = &self.config;
        let phase = &mut entity.phase;

        let target = if entity.hovered { 1.0 } else { 0.0 };
        phase.emphasis = damp(phase.emphasis, target, cfg.hover_smoothing, dt).clamp(0.0, 1.0);
        phase.spin = (phase.spin + cfg.beacon_spin_rate * dt).rem_euclid(TAU);

        // Offset the bob by x so neighbouring beacons drift out of step
        let offset = entity.position.x;
        let offset = if offset.is_finite() { offset } else { 0.0 };
        let bob = cfg.beacon_bob_amplitude * (t + offset).sin();
        entity.render_offset = Vec3::new(0.0, bob, 0.0);

        AnimationPose {
            translation: entity.position + entity.render_offset,
            yaw: entity.yaw + phase.spin,
            tilt: cfg.hover_tilt * phase.emphasis,
            scale: Vec3::splat(lerp(1.0, cfg.hover_scale, phase.emphasis)),
            head: None,
            arms: None,
        }
    }

    fn guide(&self, dt: f32, t: f32, entity: &mut Interactable) -> AnimationPose {
        let cfg = &self.config;
        let phase = &mut entity.phase;

        let breath = t * BREATH_RATE;
        let scale = Vec3::new(
            1.0 + breath.cos() * BREATH_DEPTH_XZ,
            1.0 + breath.sin() * BREATH_DEPTH_Y,
            1.0 + breath.cos() * BREATH_DEPTH_XZ,
        );

        let head = HeadPose {
            yaw: (t * HEAD_YAW_RATE).sin() * HEAD_YAW_RANGE,
            pitch: (t * HEAD_PITCH_RATE).cos() * HEAD_PITCH_RANGE,
        };
        let swing = t * ARM_SWING_RATE;
        let arms = ArmPose {
            left: -ARM_REST + swing.sin() * ARM_SWING,
            right: ARM_REST - (swing + ARM_PHASE).sin() * ARM_SWING,
        };

        phase.bounce = if entity.hovered {
            cfg.guide_bounce_height * (t * cfg.guide_bounce_frequency).sin().abs()
        } else {
            damp(phase.bounce, 0.0, cfg.guide_settle_smoothing, dt)
        }
        .max(0.0);
        entity.render_offset = Vec3::new(0.0, phase.bounce, 0.0);

        AnimationPose {
            translation: entity.position + entity.render_offset,
            yaw: entity.yaw,
            tilt: 0.0,
            scale,
            head: Some(head),
            arms: Some(arms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::interactable::ObjectId;
    use crate::math::Rgb;

    fn beacon() -> Interactable {
        Interactable::new(
            ObjectId::new("b"),
            1,
            ObjectKind::Beacon { read: false },
            Vec3::new(0.0, 3.0, -5.0),
            Rgb([1.0, 0.0, 0.0]),
        )
    }

    fn guide() -> Interactable {
        Interactable::new(ObjectId::new("g"), 2, ObjectKind::Guide, Vec3::ZERO, Rgb([0.0, 1.0, 0.0]))
    }

    #[test]
    fn beacon_bob_stays_within_amplitude() {
        let animator = IdleAnimator::default();
        let mut entity = beacon();
        for i in 0..500 {
            let pose = animator.tick(0.016, i as f32 * 0.016, &mut entity);
            assert!((pose.translation.y - 3.0).abs() <= 0.2 + 1e-5);
        }
    }

    #[test]
    fn hover_emphasis_rises_monotonically_then_falls() {
        let animator = IdleAnimator::default();
        let mut entity = beacon();
        entity.hovered = true;
        let mut last_scale = 1.0;
        for i in 0..200 {
            let pose = animator.tick(0.016, i as f32 * 0.016, &mut entity);
            assert!(pose.scale.x >= last_scale - 1e-6);
            assert!(pose.scale.x <= 1.2 + 1e-6);
            last_scale = pose.scale.x;
        }
        assert!((last_scale - 1.2).abs() < 1e-3);

        entity.hovered = false;
        for i in 0..200 {
            let pose = animator.tick(0.016, i as f32 * 0.016, &mut entity);
            assert!(pose.scale.x <= last_scale + 1e-6);
            assert!(pose.scale.x >= 1.0 - 1e-6);
            last_scale = pose.scale.x;
        }
    }

    #[test]
    fn spin_advances_and_wraps() {
        let animator = IdleAnimator::default();
        let mut entity = beacon();
        for _ in 0..10_000 {
            animator.tick(0.1, 0.0, &mut entity);
        }
        assert!((0.0..TAU).contains(&entity.phase.spin));
        assert!((entity.phase.elapsed - 1000.0).abs() < 0.5);
    }

    #[test]
    fn guide_bounce_never_negative() {
        let animator = IdleAnimator::default();
        let mut entity = guide();
        entity.hovered = true;
        for i in 0..300 {
            let pose = animator.tick(0.016, i as f32 * 0.016, &mut entity);
            assert!(pose.translation.y >= 0.0);
            assert!(pose.translation.y <= 0.1 + 1e-6);
        }
    }

    #[test]
    fn guide_head_and_arms_present() {
        let animator = IdleAnimator::default();
        let mut entity = guide();
        let pose = animator.tick(0.016, 1.0, &mut entity);
        let head = pose.head.unwrap();
        assert!(head.yaw.abs() <= HEAD_YAW_RANGE);
        assert!(head.pitch.abs() <= HEAD_PITCH_RANGE);
        assert!(pose.arms.unwrap().left < 0.0);
    }

    #[test]
    fn non_finite_inputs_are_total() {
        let animator = IdleAnimator::default();
        let mut entity = guide();
        let pose = animator.tick(f32::NAN, f32::INFINITY, &mut entity);
        assert!(pose.translation.is_finite());
        assert!(pose.scale.is_finite());
        let mut entity = beacon();
        let pose = animator.tick(-1.0, f32::NEG_INFINITY, &mut entity);
        assert!(pose.translation.is_finite());
    }

    #[test]
    fn guide_bounce_eases_back_after_hover() {
        let animator = IdleAnimator::default();
        let mut entity = guide();
        entity.hovered = true;
        let pose = animator.tick(0.016, 0.15, &mut entity);
        assert!(pose.translation.y > 0.05);

        entity.hovered = false;
        let mut last = entity.phase.bounce;
        for i in 0..300 {
            let pose = animator.tick(0.016, 0.15 + i as f32 * 0.016, &mut entity);
            assert!(pose.translation.y >= 0.0);
            assert!(pose.translation.y <= last + 1e-7);
            last = pose.translation.y;
        }
        assert!(last < 1e-3);
    }

    #[test]
    fn beacon_tilt_eases_in_and_out() {
        let animator = IdleAnimator::default();
        let mut entity = beacon();
        entity.hovered = true;
        let mut last = 0.0;
        for i in 0..200 {
            let pose = animator.tick(0.016, i as f32 * 0.016, &mut entity);
            assert!(pose.tilt >= last - 1e-7);
            assert!(pose.tilt <= 0.2 + 1e-6);
            last = pose.tilt;
        }
        assert!((last - 0.2).abs() < 1e-3);

        entity.hovered = false;
        for i in 0..200 {
            let pose = animator.tick(0.016, i as f32 * 0.016, &mut entity);
            assert!(pose.tilt <= last + 1e-7);
            assert!(pose.tilt >= 0.0);
            last = pose.tilt;
        }
        assert!(last < 1e-3);
    }
}
