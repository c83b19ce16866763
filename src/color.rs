use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::state::NoticeKind;

// ---------------------------------------------------------------------------
// Color palette generator
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
// Notice colours
// ---------------------------------------------------------------------------

pub fn notice_color(kind: NoticeKind) -> Color32 {
    match kind {
        NoticeKind::Success => Color32::from_rgb(46, 160, 67),
        NoticeKind::Warning => Color32::from_rgb(210, 153, 34),
        NoticeKind::Error => Color32::RED,
    }
}
