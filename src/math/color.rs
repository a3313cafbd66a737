use serde::Serialize;

use crate::error::CoreError;

/// Linear-ish RGB in [0, 1]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Rgb(pub [f32; 3]);

impl Rgb {
    /// Parse `#rrggbb` or `#rgb`; the leading `#` is optional
    pub fn from_hex(hex: &str) -> Result<Self, CoreError> {
        let digits = hex.trim().trim_start_matches('#');
        let invalid = || CoreError::InvalidColor(hex.to_string());

        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(invalid()),
        };

        let mut rgb = [0.0; 3];
        for (i, channel) in rgb.iter_mut().enumerate() {
            let byte = expanded
                .get(i * 2..i * 2 + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(invalid)?;
            *channel = byte as f32 / 255.0;
        }
        Ok(Rgb(rgb))
    }

    /// Darker tint used for the envelope flap
    pub fn scaled(self, factor: f32) -> Rgb {
        Rgb(self.0.map(|c| (c * factor).clamp(0.0, 1.0)))
    }
}

pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    let c = v * s;
    let h_prime = (h * 6.0) % 6.0;
    let x = c * (1.0 - ((h_prime % 2.0) - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h_prime as i32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    [r + m, g + m, b + m]
}

/// Palette for beacons that arrive without a colour, picked by arrival order
pub fn palette_color(index: usize) -> Rgb {
    const SLOTS: usize = 7;
    Rgb(hsv_to_rgb((index % SLOTS) as f32 / SLOTS as f32, 0.7, 0.95))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsv_to_rgb_red() {
        let rgb = hsv_to_rgb(0.0, 1.0, 1.0);
        assert!((rgb[0] - 1.0).abs() < 0.01);
        assert!(rgb[1].abs() < 0.01);
        assert!(rgb[2].abs() < 0.01);
    }

    #[test]
    fn test_hex_long_form() {
        let rgb = Rgb::from_hex("#ef4444").unwrap();
        assert!((rgb.0[0] - 239.0 / 255.0).abs() < 1e-6);
        assert!((rgb.0[1] - 68.0 / 255.0).abs() < 1e-6);
        assert!((rgb.0[2] - 68.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_hex_short_form_matches_long() {
        assert_eq!(Rgb::from_hex("#fff").unwrap(), Rgb::from_hex("ffffff").unwrap());
    }

    #[test]
    fn test_hex_rejects_garbage() {
        assert!(matches!(Rgb::from_hex("#12"), Err(CoreError::InvalidColor(_))));
        assert!(matches!(Rgb::from_hex("#zzzzzz"), Err(CoreError::InvalidColor(_))));
    }

    #[test]
    fn test_palette_stays_in_range() {
        for i in 0..20 {
            let rgb = palette_color(i);
            assert!(rgb.0.iter().all(|c| (0.0..=1.0).contains(c)));
        }
    }
}
