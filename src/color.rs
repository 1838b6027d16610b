use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Categorical palette
// ---------------------------------------------------------------------------

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// `n` visually distinct colours with evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| hsl_to_color32((i as f32 / n as f32) * 360.0, 0.75, 0.55))
        .collect()
}

// ---------------------------------------------------------------------------
// Continuous scale: numeric value → Color32
// ---------------------------------------------------------------------------

/// Maps a numeric range onto a blue → red hue ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    pub min: f64,
    pub max: f64,
}

impl ColorScale {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Position of `value` in the range, clamped to `[0, 1]`.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span.abs() < f64::EPSILON {
            return 0.5;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }

    /// Colour at position `t` in `[0, 1]`.
    pub fn color_at(&self, t: f64) -> Color32 {
        let hue = 240.0 * (1.0 - t as f32);
        hsl_to_color32(hue, 0.8, 0.5)
    }

    /// Bucket index of `value` when the scale is split into `buckets` bands.
    pub fn bucket(&self, value: f64, buckets: usize) -> usize {
        ((self.normalize(value) * buckets as f64) as usize).min(buckets.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(5);
        assert_eq!(p.len(), 5);
        assert_ne!(p[0], p[1]);
    }

    #[test]
    fn scale_clamps_and_buckets() {
        let s = ColorScale::new(0.0, 10.0);
        assert_eq!(s.normalize(-5.0), 0.0);
        assert_eq!(s.normalize(20.0), 1.0);
        assert_eq!(s.bucket(0.0, 8), 0);
        assert_eq!(s.bucket(10.0, 8), 7);
        assert_eq!(s.bucket(5.0, 8), 4);
        assert_ne!(s.color_at(0.0), s.color_at(1.0));
    }

    #[test]
    fn degenerate_scale_is_centered() {
        assert_eq!(ColorScale::new(3.0, 3.0).normalize(3.0), 0.5);
    }
}
