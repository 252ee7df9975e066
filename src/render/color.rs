//! Discrete color ramp shared by both report views.

use std::fmt;

/// 24-bit RGB color, displayed as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const BLACK: Rgb = Rgb(0, 0, 0);

/// Fixed color ramp ordered light to dark, with the bucket from which
/// white text is needed for contrast.
///
/// Built once at startup and passed explicitly to the renderers; the
/// default ramp has nine buckets and switches text color at the
/// fifth.
#[derive(Debug, Clone)]
pub struct Palette {
    pub colors: Vec<Rgb>,
    pub threshold: usize,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: vec![
                Rgb(234, 231, 255),
                Rgb(214, 207, 255),
                Rgb(192, 183, 255),
                Rgb(171, 158, 255),
                Rgb(161, 148, 250),
                Rgb(155, 142, 245),
                Rgb(140, 125, 237),
                Rgb(123, 108, 227),
                Rgb(113, 98, 221),
            ],
            threshold: 4,
        }
    }
}

impl Palette {
    /// Bucket of a normalized ratio in [0, 1].
    pub fn index_of(&self, ratio: f64) -> usize {
        (ratio * (self.colors.len() - 1) as f64).round() as usize
    }

    /// Background and foreground for a ratio. Callers treat a zero
    /// ratio as "no coloring" instead of asking for bucket 0.
    pub fn color_of(&self, ratio: f64) -> (Rgb, Rgb) {
        let index = self.index_of(ratio);
        let fg = if index < self.threshold { BLACK } else { WHITE };
        (self.colors[index], fg)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
