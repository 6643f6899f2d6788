//! Domain types for parsed slide decks and extracted documentation content.

use serde::{Deserialize, Serialize};

/// A concrete RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorValue {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl ColorValue {
    /// Create a color from its three channels.
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parse a six-digit hex string such as `"0070C0"`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Apply a brightness offset in `[-1.0, 1.0]`.
    ///
    /// Positive values move each channel toward white by that fraction,
    /// negative values move it toward black.
    pub fn with_brightness(self, brightness: f64) -> Self {
        let brightness = brightness.clamp(-1.0, 1.0);
        if brightness == 0.0 {
            return self;
        }
        let adjust = |channel: u8| -> u8 {
            let c = f64::from(channel);
            let adjusted = if brightness > 0.0 {
                c + (255.0 - c) * brightness
            } else {
                c * (1.0 + brightness)
            };
            adjusted.round().clamp(0.0, 255.0) as u8
        };
        Self::new(adjust(self.red), adjust(self.green), adjust(self.blue))
    }
}

/// How a run or paragraph specifies its font color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColorSpec {
    /// Explicit RGB value.
    Rgb(ColorValue),
    /// Index into the theme palette (1-based) with a brightness offset.
    Theme { index: u8, brightness: f64 },
}

impl ColorSpec {
    /// Explicit RGB color specification.
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::Rgb(ColorValue::new(red, green, blue))
    }

    /// Theme color specification without brightness adjustment.
    pub const fn theme(index: u8) -> Self {
        Self::Theme {
            index,
            brightness: 0.0,
        }
    }
}

/// The twelve canonical color scheme slots of a presentation theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThemeSlot {
    Dark1,
    Light1,
    Dark2,
    Light2,
    Accent1,
    Accent2,
    Accent3,
    Accent4,
    Accent5,
    Accent6,
    Hyperlink,
    FollowedHyperlink,
}

impl ThemeSlot {
    /// All slots in index order (index 1 is `Dark1`).
    pub const ALL: [ThemeSlot; 12] = [
        Self::Dark1,
        Self::Light1,
        Self::Dark2,
        Self::Light2,
        Self::Accent1,
        Self::Accent2,
        Self::Accent3,
        Self::Accent4,
        Self::Accent5,
        Self::Accent6,
        Self::Hyperlink,
        Self::FollowedHyperlink,
    ];

    /// Map a 1-based theme color index to its slot.
    pub fn from_index(index: u8) -> Option<Self> {
        let idx = usize::from(index).checked_sub(1)?;
        Self::ALL.get(idx).copied()
    }

    /// Map a DrawingML color scheme element name (`dk1`, `accent3`, ...) to its slot.
    pub fn from_scheme_name(name: &str) -> Option<Self> {
        Some(match name {
            "dk1" => Self::Dark1,
            "lt1" => Self::Light1,
            "dk2" => Self::Dark2,
            "lt2" => Self::Light2,
            "accent1" => Self::Accent1,
            "accent2" => Self::Accent2,
            "accent3" => Self::Accent3,
            "accent4" => Self::Accent4,
            "accent5" => Self::Accent5,
            "accent6" => Self::Accent6,
            "hlink" => Self::Hyperlink,
            "folHlink" => Self::FollowedHyperlink,
            _ => return None,
        })
    }

    /// The 1-based theme color index of this slot.
    pub fn index(self) -> u8 {
        self as u8 + 1
    }

    fn position(self) -> usize {
        self as usize
    }
}

/// A deck's theme color palette.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemePalette {
    slots: [Option<ColorValue>; 12],
}

impl ThemePalette {
    /// An empty palette; every lookup fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the color of one slot.
    pub fn set(&mut self, slot: ThemeSlot, color: ColorValue) {
        self.slots[slot.position()] = Some(color);
    }

    /// Builder form of [`ThemePalette::set`].
    pub fn with(mut self, slot: ThemeSlot, color: ColorValue) -> Self {
        self.set(slot, color);
        self
    }

    /// Get the color stored in a slot.
    pub fn get(&self, slot: ThemeSlot) -> Option<ColorValue> {
        self.slots[slot.position()]
    }

    /// Resolve a 1-based theme index, applying a brightness offset.
    pub fn resolve(&self, index: u8, brightness: f64) -> Option<ColorValue> {
        let slot = ThemeSlot::from_index(index)?;
        self.get(slot).map(|color| color.with_brightness(brightness))
    }

    /// Whether no slot has been filled.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

/// The minimal unit of formatted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub color: Option<ColorSpec>,
}

impl TextRun {
    /// Create a plain run with no formatting.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            color: None,
        }
    }

    /// Mark the run as bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Set the run's color specification.
    pub fn with_color(mut self, color: ColorSpec) -> Self {
        self.color = Some(color);
        self
    }
}

/// A paragraph: ordered runs plus its flattened text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub runs: Vec<TextRun>,

    /// Full paragraph text, including line breaks and field text that is
    /// not part of any run.
    pub text: String,

    /// Paragraph-level default color.
    pub color: Option<ColorSpec>,
}

impl Paragraph {
    /// Build a paragraph whose text is the concatenation of its runs.
    pub fn from_runs(runs: Vec<TextRun>) -> Self {
        let text = runs.iter().map(|r| r.text.as_str()).collect();
        Self {
            runs,
            text,
            color: None,
        }
    }

    /// Build a paragraph from plain text as a single unformatted run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::from_runs(vec![TextRun::new(text)])
    }

    /// Set the paragraph-level color specification.
    pub fn with_color(mut self, color: ColorSpec) -> Self {
        self.color = Some(color);
        self
    }
}

/// The text body of a shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextFrame {
    pub paragraphs: Vec<Paragraph>,
}

impl TextFrame {
    pub fn new(paragraphs: Vec<Paragraph>) -> Self {
        Self { paragraphs }
    }

    /// Build a frame from newline-separated plain text, one paragraph per line.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.split('\n').map(Paragraph::plain).collect())
    }

    /// Flattened text: paragraph texts joined by newlines.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A region of a slide, with or without text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub name: Option<String>,
    pub text_frame: Option<TextFrame>,
}

impl Shape {
    /// A shape carrying the given text frame.
    pub fn with_text_frame(text_frame: TextFrame) -> Self {
        Self {
            name: None,
            text_frame: Some(text_frame),
        }
    }

    /// A shape with plain text, one paragraph per line.
    pub fn text(text: &str) -> Self {
        Self::with_text_frame(TextFrame::from_text(text))
    }

    /// A shape without a text frame (picture, chart, connector).
    pub fn without_text() -> Self {
        Self::default()
    }

    /// Flattened text of the shape's text frame, if it has one.
    pub fn full_text(&self) -> Option<String> {
        self.text_frame.as_ref().map(TextFrame::text)
    }
}

/// A single slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    /// 1-based slide number.
    pub number: usize,

    /// Shapes in document order.
    pub shapes: Vec<Shape>,
}

impl Slide {
    /// Create an empty slide with the given number.
    pub fn new(number: usize) -> Self {
        Self {
            number,
            shapes: Vec::new(),
        }
    }

    /// Add a shape to this slide.
    pub fn add_shape(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Builder form of [`Slide::add_shape`].
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.add_shape(shape);
        self
    }

    /// Flattened text of every shape that carries a text frame.
    pub fn shape_texts(&self) -> impl Iterator<Item = (&TextFrame, String)> + '_ {
        self.shapes
            .iter()
            .filter_map(|s| s.text_frame.as_ref())
            .map(|tf| (tf, tf.text()))
    }
}

/// One parsed slide presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    /// Original filename (without path).
    pub filename: String,

    /// Slides in presentation order.
    pub slides: Vec<Slide>,

    /// Theme colors of the first slide master.
    pub theme: ThemePalette,
}

impl Deck {
    /// Create an empty deck with the given filename.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            slides: Vec::new(),
            theme: ThemePalette::new(),
        }
    }

    /// Add a slide to the deck.
    pub fn add_slide(&mut self, slide: Slide) {
        self.slides.push(slide);
    }

    /// Replace the theme palette.
    pub fn with_theme(mut self, theme: ThemePalette) -> Self {
        self.theme = theme;
        self
    }
}

/// A vocabulary term and its definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub term: String,
    pub definition: String,
}

impl VocabularyItem {
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            definition: definition.into(),
        }
    }
}

/// Everything extracted from one deck.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckRecord {
    pub vocabulary: Vec<VocabularyItem>,
    pub goals: Vec<String>,
    pub assessments: Vec<String>,
    pub careers: Vec<String>,
    pub materials: Vec<String>,
}

impl DeckRecord {
    /// Whether nothing at all was found for the deck.
    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
            && self.goals.is_empty()
            && self.assessments.is_empty()
            && self.careers.is_empty()
            && self.materials.is_empty()
    }
}
