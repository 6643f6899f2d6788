//! Effective color resolution and emphasis-color classification.
//!
//! Vocabulary terms are marked on slides by bold text in a blue or turquoise
//! color. A run's color may be given explicitly, through the theme palette,
//! inherited from the paragraph, or not at all, so resolution walks an ordered
//! list of layers and takes the first one that yields a concrete color.

use crate::types::{ColorSpec, ColorValue, Paragraph, TextRun, ThemePalette, ThemeSlot};

/// One place a run's effective color can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorLayer {
    RunRgb,
    RunTheme,
    ParagraphRgb,
    ParagraphTheme,
    DocumentDefault,
}

/// Layers in the order they are consulted.
pub const RESOLUTION_ORDER: [ColorLayer; 5] = [
    ColorLayer::RunRgb,
    ColorLayer::RunTheme,
    ColorLayer::ParagraphRgb,
    ColorLayer::ParagraphTheme,
    ColorLayer::DocumentDefault,
];

/// Resolves effective run colors against a deck's theme palette.
#[derive(Debug, Clone, Copy)]
pub struct ColorResolver<'a> {
    theme: &'a ThemePalette,
}

impl<'a> ColorResolver<'a> {
    pub fn new(theme: &'a ThemePalette) -> Self {
        Self { theme }
    }

    /// Resolve the effective color of `run` inside `paragraph`.
    ///
    /// Returns `None` when no layer produces a color.
    pub fn resolve(&self, run: &TextRun, paragraph: &Paragraph) -> Option<ColorValue> {
        self.resolve_with_layer(run, paragraph).map(|(color, _)| color)
    }

    /// Like [`ColorResolver::resolve`], also reporting which layer won.
    pub fn resolve_with_layer(
        &self,
        run: &TextRun,
        paragraph: &Paragraph,
    ) -> Option<(ColorValue, ColorLayer)> {
        RESOLUTION_ORDER.iter().find_map(|&layer| {
            self.resolve_layer(layer, run, paragraph)
                .map(|color| (color, layer))
        })
    }

    fn resolve_layer(
        &self,
        layer: ColorLayer,
        run: &TextRun,
        paragraph: &Paragraph,
    ) -> Option<ColorValue> {
        match layer {
            ColorLayer::RunRgb => explicit_rgb(run.color.as_ref()),
            ColorLayer::RunTheme => self.theme_color(run.color.as_ref()),
            ColorLayer::ParagraphRgb => explicit_rgb(paragraph.color.as_ref()),
            ColorLayer::ParagraphTheme => self.theme_color(paragraph.color.as_ref()),
            ColorLayer::DocumentDefault => self.theme.resolve(ThemeSlot::Dark1.index(), 0.0),
        }
    }

    fn theme_color(&self, spec: Option<&ColorSpec>) -> Option<ColorValue> {
        match spec? {
            ColorSpec::Theme { index, brightness } => self.theme.resolve(*index, *brightness),
            ColorSpec::Rgb(_) => None,
        }
    }
}

fn explicit_rgb(spec: Option<&ColorSpec>) -> Option<ColorValue> {
    match spec? {
        ColorSpec::Rgb(color) => Some(*color),
        ColorSpec::Theme { .. } => None,
    }
}

/// An inclusive box in RGB space.
#[derive(Debug, Clone, Copy)]
struct RgbBox {
    min: (u8, u8, u8),
    max: (u8, u8, u8),
}

impl RgbBox {
    const fn new(min: (u8, u8, u8), max: (u8, u8, u8)) -> Self {
        Self { min, max }
    }

    fn contains(&self, c: ColorValue) -> bool {
        (self.min.0..=self.max.0).contains(&c.red)
            && (self.min.1..=self.max.1).contains(&c.green)
            && (self.min.2..=self.max.2).contains(&c.blue)
    }
}

/// Blue and turquoise families.
const EMPHASIS_BOXES: [RgbBox; 6] = [
    // blue
    RgbBox::new((0, 0, 200), (255, 255, 255)),
    // turquoise
    RgbBox::new((0, 100, 150), (100, 255, 255)),
    // light blue
    RgbBox::new((0, 150, 200), (150, 255, 255)),
    // dodger blue
    RgbBox::new((30, 144, 255), (70, 180, 255)),
    // deep sky blue
    RgbBox::new((0, 191, 255), (50, 220, 255)),
    // turquoise (named)
    RgbBox::new((64, 224, 208), (100, 255, 230)),
];

/// A color is gray when every pairwise channel spread is below this.
const GRAY_SPREAD: i32 = 10;

/// Whether a resolved color belongs to the emphasis (blue/turquoise) family.
///
/// Near-white and gray are rejected before the bounding boxes are consulted:
/// the broad blue box would otherwise accept light grays such as
/// `(200, 205, 209)`.
pub fn is_emphasis_color(color: Option<ColorValue>) -> bool {
    let Some(c) = color else {
        return false;
    };
    let (r, g, b) = (i32::from(c.red), i32::from(c.green), i32::from(c.blue));

    if r > 200 && g > 200 && b > 200 {
        return false;
    }
    if (r - g).abs() < GRAY_SPREAD && (g - b).abs() < GRAY_SPREAD && (r - b).abs() < GRAY_SPREAD {
        return false;
    }
    if EMPHASIS_BOXES.iter().any(|range| range.contains(c)) {
        return true;
    }

    // strong blue dominance
    if b > r + 50 && b > g + 50 && b > 120 {
        return true;
    }
    // turquoise signature
    if g > 150 && b > 150 && r < 80 {
        return true;
    }
    // medium blue
    b > 180 && b > r + 30 && b > g + 30
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emphasis(r: u8, g: u8, b: u8) -> bool {
        is_emphasis_color(Some(ColorValue::new(r, g, b)))
    }

    #[test]
    fn test_unresolved_is_not_emphasis() {
        assert!(!is_emphasis_color(None));
    }

    #[test]
    fn test_common_blues_and_turquoise() {
        assert!(emphasis(0, 112, 192)); // Office "blue"
        assert!(emphasis(0, 176, 240)); // Office "light blue"
        assert!(emphasis(30, 144, 255)); // dodger blue
        assert!(emphasis(0, 191, 255)); // deep sky blue
        assert!(emphasis(64, 224, 208)); // turquoise
        assert!(emphasis(0, 0, 255));
    }

    #[test]
    fn test_non_blue_colors() {
        assert!(!emphasis(0, 0, 0));
        assert!(!emphasis(255, 0, 0));
        assert!(!emphasis(0, 128, 0));
        assert!(!emphasis(89, 89, 89));
        assert!(!emphasis(192, 80, 77));
    }

    #[test]
    fn test_near_white_never_emphasis() {
        for r in [201u8, 220, 255] {
            for g in [201u8, 230, 255] {
                for b in [201u8, 240, 255] {
                    assert!(!emphasis(r, g, b), "({r}, {g}, {b})");
                }
            }
        }
    }

    #[test]
    fn test_gray_never_emphasis() {
        for base in [0u8, 60, 120, 180, 200, 245] {
            for (dg, db) in [(0u8, 0u8), (5, 9), (9, 9), (9, 0)] {
                let (r, g, b) = (base, base.saturating_add(dg), base.saturating_add(db));
                assert!(!emphasis(r, g, b), "({r}, {g}, {b})");
            }
        }
    }

    #[test]
    fn test_gray_exclusion_precedes_bounding_boxes() {
        // Inside the broad blue box, but a light gray.
        assert!(EMPHASIS_BOXES[0].contains(ColorValue::new(200, 205, 209)));
        assert!(!emphasis(200, 205, 209));
        // Same box, clearly blue-tinted.
        assert!(emphasis(150, 170, 210));
    }

    #[test]
    fn test_spread_of_ten_is_not_gray() {
        // spread of exactly 10 leaves the color to the boxes
        assert!(emphasis(190, 200, 200));
        assert!(emphasis(200, 205, 210));
        assert!(!emphasis(190, 199, 199));
    }

    #[test]
    fn test_derived_heuristics() {
        // strong dominance, outside every box
        assert!(emphasis(40, 40, 130));
        // medium blue
        assert!(emphasis(120, 140, 190));
        // bluish but too weak
        assert!(!emphasis(100, 100, 140));
    }

    #[test]
    fn test_resolution_order() {
        let theme = ThemePalette::new()
            .with(ThemeSlot::Dark1, ColorValue::new(0, 0, 0))
            .with(ThemeSlot::Accent1, ColorValue::new(68, 114, 196));
        let resolver = ColorResolver::new(&theme);

        let run = TextRun::new("x").with_color(ColorSpec::rgb(1, 2, 3));
        let para = Paragraph::from_runs(vec![]).with_color(ColorSpec::theme(5));
        assert_eq!(
            resolver.resolve_with_layer(&run, &para),
            Some((ColorValue::new(1, 2, 3), ColorLayer::RunRgb))
        );

        let run = TextRun::new("x").with_color(ColorSpec::theme(5));
        assert_eq!(
            resolver.resolve_with_layer(&run, &para),
            Some((ColorValue::new(68, 114, 196), ColorLayer::RunTheme))
        );

        let run = TextRun::new("x");
        assert_eq!(
            resolver.resolve_with_layer(&run, &para),
            Some((ColorValue::new(68, 114, 196), ColorLayer::ParagraphTheme))
        );

        let para = Paragraph::from_runs(vec![]).with_color(ColorSpec::rgb(9, 9, 9));
        assert_eq!(
            resolver.resolve_with_layer(&run, &para),
            Some((ColorValue::new(9, 9, 9), ColorLayer::ParagraphRgb))
        );

        let para = Paragraph::from_runs(vec![]);
        assert_eq!(
            resolver.resolve_with_layer(&run, &para),
            Some((ColorValue::new(0, 0, 0), ColorLayer::DocumentDefault))
        );
    }

    #[test]
    fn test_unresolvable_theme_falls_through() {
        let theme = ThemePalette::new().with(ThemeSlot::Dark1, ColorValue::new(10, 10, 10));
        let resolver = ColorResolver::new(&theme);

        // index 13 (text 1) is outside the palette; accent 2 is not set
        let run = TextRun::new("x").with_color(ColorSpec::theme(13));
        let para = Paragraph::from_runs(vec![]).with_color(ColorSpec::theme(6));
        assert_eq!(
            resolver.resolve_with_layer(&run, &para),
            Some((ColorValue::new(10, 10, 10), ColorLayer::DocumentDefault))
        );

        let empty = ThemePalette::new();
        assert_eq!(ColorResolver::new(&empty).resolve(&run, &para), None);
    }

    #[test]
    fn test_theme_brightness_applied() {
        let theme = ThemePalette::new().with(ThemeSlot::Accent1, ColorValue::new(0, 100, 200));
        let resolver = ColorResolver::new(&theme);
        let run = TextRun::new("x").with_color(ColorSpec::Theme {
            index: 5,
            brightness: -0.5,
        });
        let para = Paragraph::from_runs(vec![]);
        assert_eq!(resolver.resolve(&run, &para), Some(ColorValue::new(0, 50, 100)));
    }
}
