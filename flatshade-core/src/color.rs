//! RGB color with channels in 0..=255
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Flat shading: `base + intensity * light`, each channel clamped to 0..=255.
    pub fn shade(base: Self, light: Self, intensity: f64) -> Self {
        let channel = |b: f64, l: f64| (b + intensity * l).clamp(0.0, 255.0);
        Self::new(
            channel(base.r, light.r),
            channel(base.g, light.g),
            channel(base.b, light.b),
        )
    }

    /// Rounded 8-bit channels.
    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let c = |v: f64| v.round().clamp(0.0, 255.0) as u8;
        (c(self.r), c(self.g), c(self.b))
    }

    /// Perceived brightness in 0..=1.
    pub fn luminance(self) -> f64 {
        (0.299 * self.r + 0.587 * self.g + 0.114 * self.b) / 255.0
    }

    /// CSS `rgb(r, g, b)` notation.
    pub fn to_css(self) -> String {
        let (r, g, b) = self.to_rgb8();
        format!("rgb({r}, {g}, {b})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shade_clamps() {
        let base = Color::new(120.0, 150.0, 200.0);
        let light = Color::new(62.0, 42.0, 22.0);

        assert_eq!(Color::shade(base, light, 1.0), Color::new(182.0, 192.0, 222.0));
        assert_eq!(Color::shade(base, light, 0.0), base);
        assert_eq!(
            Color::shade(base, Color::new(200.0, 200.0, 200.0), 1.0),
            Color::new(255.0, 255.0, 255.0)
        );
        assert_eq!(
            Color::shade(base, Color::new(200.0, 200.0, 200.0), -1.0),
            Color::new(0.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_rgb8_and_css() {
        let c = Color::new(10.4, 10.6, 300.0);
        assert_eq!(c.to_rgb8(), (10, 11, 255));
        assert_eq!(Color::new(1.0, 2.0, 3.0).to_css(), "rgb(1, 2, 3)");
    }
}
