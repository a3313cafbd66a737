/// Plain linear interpolation
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Frame-rate independent exponential approach of `current` toward `target`.
///
/// The blend factor is `1 - e^(-rate * dt)`, which stays in [0, 1), so the
/// result always lies between `current` and `target`: no overshoot and no
/// oscillation. Non-positive or non-finite `dt` leaves `current` unchanged.
pub fn damp(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    if !dt.is_finite() || dt <= 0.0 || rate.is_nan() || rate <= 0.0 {
        return current;
    }
    let t = 1.0 - (-rate * dt).exp();
    lerp(current, target, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(2.0, 4.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 4.0, 1.0), 4.0);
        assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
    }

    #[test]
    fn damp_never_overshoots() {
        let mut value = 0.0;
        for _ in 0..200 {
            let next = damp(value, 1.0, 8.0, 0.1);
            assert!(next >= value);
            assert!(next <= 1.0);
            value = next;
        }
        assert!((value - 1.0).abs() < 1e-3);
    }

    #[test]
    fn damp_ignores_bad_dt() {
        assert_eq!(damp(0.5, 1.0, 5.0, 0.0), 0.5);
        assert_eq!(damp(0.5, 1.0, 5.0, -1.0), 0.5);
        assert_eq!(damp(0.5, 1.0, 5.0, f32::NAN), 0.5);
        assert_eq!(damp(0.5, 1.0, 5.0, f32::INFINITY), 0.5);
    }

    #[test]
    fn damp_same_time_same_result() {
        // Two half steps land where one full step does
        let one = damp(0.0, 1.0, 4.0, 0.2);
        let two = damp(damp(0.0, 1.0, 4.0, 0.1), 1.0, 4.0, 0.1);
        assert!((one - two).abs() < 1e-5);
    }
}
