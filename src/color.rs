use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Rgb – renderer-neutral colour
// ---------------------------------------------------------------------------

/// 8-bit sRGB colour shared by the egui, plotters and plotly renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_color32(self) -> Color32 {
        Color32::from_rgb(self.r, self.g, self.b)
    }

    /// `#rrggbb`, as plotly expects.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn from_srgb(rgb: Srgb) -> Self {
        let rgb: Srgb<u8> = rgb.into_format();
        Self::new(rgb.red, rgb.green, rgb.blue)
    }
}

pub const ANNUAL: Rgb = Rgb::new(31, 119, 180);
pub const TREND: Rgb = Rgb::new(214, 39, 40);
pub const MOVING_AVERAGE: Rgb = Rgb::new(44, 160, 44);
pub const CHANGE: Rgb = Rgb::new(255, 127, 14);
pub const SPREAD: Rgb = Rgb::new(127, 127, 127);

// ---------------------------------------------------------------------------
// Categorical palette
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Rgb::from_srgb(rgb)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Diverging map: anomaly → blue / white / red
// ---------------------------------------------------------------------------

/// Blue-white-red map centred on zero, for anomaly heatmaps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DivergingMap {
    /// Absolute value that saturates to full blue / red.
    pub limit: f64,
}

impl DivergingMap {
    const COLD: (f32, f32, f32) = (0.02, 0.19, 0.38);
    const NEUTRAL: (f32, f32, f32) = (0.97, 0.97, 0.97);
    const WARM: (f32, f32, f32) = (0.40, 0.0, 0.12);

    /// Map symmetric around zero covering every value in `values`.
    pub fn symmetric(values: impl IntoIterator<Item = f64>) -> Self {
        let limit = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(0.0_f64, |acc, v| acc.max(v.abs()));
        Self {
            limit: if limit > 0.0 { limit } else { 1.0 },
        }
    }

    /// Colour for `value`; mixing happens in linear RGB.
    pub fn color_for(&self, value: f64) -> Rgb {
        let t = (value / self.limit).clamp(-1.0, 1.0) as f32;
        let neutral = linear(Self::NEUTRAL);
        let mixed = if t < 0.0 {
            neutral.mix(linear(Self::COLD), -t)
        } else {
            neutral.mix(linear(Self::WARM), t)
        };
        Rgb::from_srgb(Srgb::from_linear(mixed))
    }
}

fn linear((r, g, b): (f32, f32, f32)) -> LinSrgb {
    Srgb::new(r, g, b).into_linear()
}
