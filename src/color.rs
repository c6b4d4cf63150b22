use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Experiment colours
// ---------------------------------------------------------------------------

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| hsl_to_color32((i as f32 / n as f32) * 360.0, 0.75, 0.55))
        .collect()
}

/// Colour of experiment `index` in a batch of `n`.
pub fn experiment_color(index: usize, n: usize) -> Color32 {
    generate_palette(n.max(1))
        .get(index)
        .copied()
        .unwrap_or(Color32::GRAY)
}

/// Semi-transparent fill for overlapping shapes such as Venn circles.
pub fn translucent(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

/// Fill / outline pair of a two-part stacked bar: the first part in the base
/// colour, the second in a lighter shade of the same hue.
pub fn stacked_pair(base: Color32) -> (Color32, Color32) {
    let srgb = Srgb::new(
        base.r() as f32 / 255.0,
        base.g() as f32 / 255.0,
        base.b() as f32 / 255.0,
    );
    let hsl: Hsl = srgb.into_color();
    let lighter = hsl_to_color32(
        hsl.hue.into_positive_degrees(),
        hsl.saturation,
        (hsl.lightness + 0.25).min(0.9),
    );
    (base, lighter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_size_and_distinctness() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(3);
        assert_eq!(p.len(), 3);
        assert_ne!(p[0], p[1]);
        assert_ne!(p[1], p[2]);
    }

    #[test]
    fn out_of_range_experiment_is_gray() {
        assert_eq!(experiment_color(5, 2), Color32::GRAY);
        assert_eq!(experiment_color(0, 2), generate_palette(2)[0]);
    }

    #[test]
    fn lighter_shade_is_brighter() {
        let (base, light) = stacked_pair(generate_palette(1)[0]);
        let sum = |c: Color32| c.r() as u32 + c.g() as u32 + c.b() as u32;
        assert!(sum(light) > sum(base));
    }
}
