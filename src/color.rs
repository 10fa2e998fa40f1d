use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Categorical palette
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Continuous colour scales
// ---------------------------------------------------------------------------

/// A piecewise-linear colour scale over `[0, 1]`, interpolated in linear RGB.
#[derive(Debug, Clone, Copy)]
pub struct ColorScale {
    stops: &'static [[u8; 3]],
}

/// Light yellow → orange → dark red (ColorBrewer YlOrRd).
pub const YL_OR_RD: ColorScale = ColorScale {
    stops: &[
        [255, 255, 204],
        [255, 237, 160],
        [254, 217, 118],
        [254, 178, 76],
        [253, 141, 60],
        [252, 78, 42],
        [227, 26, 28],
        [189, 0, 38],
        [128, 0, 38],
    ],
};

/// Red → yellow → green diverging scale (ColorBrewer RdYlGn).
pub const RD_YL_GN: ColorScale = ColorScale {
    stops: &[
        [165, 0, 38],
        [215, 48, 39],
        [244, 109, 67],
        [253, 174, 97],
        [254, 224, 139],
        [255, 255, 191],
        [217, 239, 139],
        [166, 217, 106],
        [102, 189, 99],
        [26, 152, 80],
        [0, 104, 55],
    ],
};

impl ColorScale {
    /// Colour at position `t`, clamped to `[0, 1]`.
    pub fn sample(&self, t: f64) -> Color32 {
        let Some(last) = self.stops.len().checked_sub(1) else {
            return Color32::GRAY;
        };
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let pos = t * last as f64;
        let i = (pos.floor() as usize).min(last);
        let j = (i + 1).min(last);
        let frac = (pos - i as f64) as f32;

        let a = to_linear(self.stops[i]);
        let b = to_linear(self.stops[j]);
        let mixed: Srgb<u8> = Srgb::from_linear(a.mix(b, frac));
        Color32::from_rgb(mixed.red, mixed.green, mixed.blue)
    }

    /// Colour for `value` placed on the `[min, max]` range. A zero-width range
    /// maps to the middle of the scale.
    pub fn sample_range(&self, value: f64, min: f64, max: f64) -> Color32 {
        let span = max - min;
        if span.abs() < f64::EPSILON {
            return self.sample(0.5);
        }
        self.sample((value - min) / span)
    }
}

fn to_linear(rgb: [u8; 3]) -> LinSrgb {
    Srgb::new(rgb[0], rgb[1], rgb[2]).into_linear()
}

/// Black or white, whichever reads better on `bg`.
pub fn contrast_text(bg: Color32) -> Color32 {
    let luma = 0.299 * bg.r() as f32 + 0.587 * bg.g() as f32 + 0.114 * bg.b() as f32;
    if luma > 150.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}
