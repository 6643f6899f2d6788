//! PPTX file parser implementation.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use slidedoc_core::{
    ColorSpec, ColorValue, Deck, DeckSource, Error, Paragraph, Result, Shape, Slide, TextFrame,
    TextRun, ThemePalette, ThemeSlot,
};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use unicode_normalization::UnicodeNormalization;
use zip::ZipArchive;

const PRESENTATION_PART: &str = "ppt/presentation.xml";
const FALLBACK_THEME_PART: &str = "ppt/theme/theme1.xml";

/// ZIP local file header signature.
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Parser for PPTX (Office Open XML) files.
pub struct PptxParser;

impl PptxParser {
    /// Create a new PPTX parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a PPTX file from disk.
    pub fn parse_file(&self, path: &Path) -> Result<Deck> {
        let file = File::open(path)?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");
        self.parse(BufReader::new(file), filename)
    }

    /// Parse a PPTX file from a reader.
    pub fn parse<R: Read + Seek>(&self, mut reader: R, filename: &str) -> Result<Deck> {
        let mut magic = [0u8; 4];
        if reader.read_exact(&mut magic).is_err() || magic != ZIP_MAGIC {
            return Err(Error::UnsupportedFormat(format!(
                "{} is not a PPTX (ZIP) package",
                filename
            )));
        }
        reader.rewind()?;

        let mut archive =
            ZipArchive::new(reader).map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        if archive.by_name(PRESENTATION_PART).is_err() {
            return Err(Error::CorruptedFile(format!(
                "{}: missing {}",
                filename, PRESENTATION_PART
            )));
        }

        let rels = self
            .read_relationships(&mut archive, PRESENTATION_PART)
            .map_err(|e| Error::PptxParseError(format!("{}: not a presentation ({})", filename, e)))?;
        let slide_order = self.get_slide_order(&mut archive, &rels)?;
        let theme = self.load_theme(&mut archive, &rels);
        if theme.is_empty() {
            log::debug!("{}: no theme colors found", filename);
        }

        let mut deck = Deck::new(filename).with_theme(theme);
        for (idx, slide_path) in slide_order.iter().enumerate() {
            let slide = self.parse_slide(&mut archive, slide_path, idx + 1)?;
            deck.add_slide(slide);
        }

        log::debug!("{}: parsed {} slides", filename, deck.slides.len());
        Ok(deck)
    }

    /// Read the relationships of a package part.
    fn read_relationships<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        part: &str,
    ) -> Result<Vec<Relationship>> {
        let rels_path = rels_path_for(part);
        let rels_content = self.read_file_from_archive(archive, &rels_path)?;
        let base_dir = part_dir(part);

        let mut rels = Vec::new();
        let mut reader = Reader::from_str(&rels_content);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if local_name(e.name().as_ref()) == b"Relationship" =>
                {
                    let mut rel = Relationship::default();
                    for attr in e.attributes().flatten() {
                        let value = String::from_utf8_lossy(&attr.value).to_string();
                        match attr.key.as_ref() {
                            b"Type" => rel.rel_type = value,
                            b"Target" => rel.target = resolve_target(base_dir, &value),
                            b"Id" => rel.id = value,
                            _ => {}
                        }
                    }
                    rels.push(rel);
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error parsing relationships '{}': {}",
                        rels_path, e
                    )));
                }
                _ => {}
            }
        }

        Ok(rels)
    }

    /// Get the ordered list of slide paths.
    ///
    /// The slide id list in `presentation.xml` defines the order; decks
    /// without one fall back to the numbers in relationship ids/targets.
    fn get_slide_order<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        rels: &[Relationship],
    ) -> Result<Vec<String>> {
        let slide_rels: HashMap<&str, &str> = rels
            .iter()
            .filter(|r| r.is_slide())
            .map(|r| (r.id.as_str(), r.target.as_str()))
            .collect();

        let presentation = self.read_file_from_archive(archive, PRESENTATION_PART)?;
        let ordered: Vec<String> = slide_id_list(&presentation)?
            .iter()
            .filter_map(|id| slide_rels.get(id.as_str()).map(|t| t.to_string()))
            .collect();
        if !ordered.is_empty() {
            return Ok(ordered);
        }

        let mut slides: Vec<(String, Option<usize>)> = rels
            .iter()
            .filter(|r| r.is_slide())
            .map(|r| {
                let order_num = extract_slide_number(&r.id).or_else(|| extract_slide_number(&r.target));
                (r.target.clone(), order_num)
            })
            .collect();

        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });

        Ok(slides.into_iter().map(|(path, _)| path).collect())
    }

    /// Load the color scheme of the first slide master's theme.
    ///
    /// Any failure yields an empty palette; colors then resolve from explicit
    /// values only.
    fn load_theme<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        rels: &[Relationship],
    ) -> ThemePalette {
        let theme_path = rels
            .iter()
            .find(|r| r.rel_type.ends_with("/slideMaster"))
            .and_then(|master| self.read_relationships(archive, &master.target).ok())
            .and_then(|master_rels| {
                master_rels
                    .into_iter()
                    .find(|r| r.rel_type.ends_with("/theme"))
                    .map(|r| r.target)
            })
            .unwrap_or_else(|| FALLBACK_THEME_PART.to_string());

        match self
            .read_file_from_archive(archive, &theme_path)
            .and_then(|xml| parse_theme_colors(&xml))
        {
            Ok(palette) => palette,
            Err(e) => {
                log::warn!("Theme colors unavailable ({}): {}", theme_path, e);
                ThemePalette::new()
            }
        }
    }

    /// Parse a single slide from the archive.
    fn parse_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
        slide_number: usize,
    ) -> Result<Slide> {
        let content = self.read_file_from_archive(archive, slide_path)?;
        let mut slide = Slide::new(slide_number);
        for shape in extract_shapes_from_xml(&content) {
            slide.add_shape(shape);
        }
        Ok(slide)
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }
}

impl Default for PptxParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DeckSource for PptxParser {
    fn load_deck(&self, path: &Path) -> Result<Deck> {
        self.parse_file(path)
    }
}

/// A package relationship with its target resolved to a part path.
#[derive(Debug, Default, Clone)]
struct Relationship {
    id: String,
    rel_type: String,
    target: String,
}

impl Relationship {
    fn is_slide(&self) -> bool {
        self.rel_type.ends_with("/slide")
    }
}

/// `ppt/slides/slide1.xml` -> `ppt/slides/_rels/slide1.xml.rels`
fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, name)) => format!("{}/_rels/{}.rels", dir, name),
        None => format!("_rels/{}.rels", part),
    }
}

fn part_dir(part: &str) -> &str {
    part.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// Resolve a relationship target against the directory of its source part.
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// Relationship ids of `p:sldId` entries, in presentation order.
fn slide_id_list(xml: &str) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"sldId" =>
            {
                if let Some(id) = e
                    .attributes()
                    .flatten()
                    .find(|a| local_name(a.key.as_ref()) == b"id" && a.key.as_ref() != b"id")
                {
                    ids.push(String::from_utf8_lossy(&id.value).to_string());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing presentation: {}", e)));
            }
            _ => {}
        }
    }

    Ok(ids)
}

/// Read the twelve scheme colors of a theme part.
fn parse_theme_colors(xml: &str) -> Result<ThemePalette> {
    let mut palette = ThemePalette::new();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut in_color_scheme = false;
    let mut current_slot: Option<ThemeSlot> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"clrScheme" => in_color_scheme = true,
                    b"srgbClr" if current_slot.is_some() => {
                        if let (Some(slot), Some(color)) =
                            (current_slot, attr_value(e, b"val").and_then(|v| ColorValue::from_hex(&v)))
                        {
                            palette.set(slot, color);
                        }
                    }
                    b"sysClr" if current_slot.is_some() => {
                        if let (Some(slot), Some(color)) = (
                            current_slot,
                            attr_value(e, b"lastClr").and_then(|v| ColorValue::from_hex(&v)),
                        ) {
                            palette.set(slot, color);
                        }
                    }
                    other if in_color_scheme => {
                        if let Some(slot) = std::str::from_utf8(other)
                            .ok()
                            .and_then(ThemeSlot::from_scheme_name)
                        {
                            current_slot = Some(slot);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                let local = local_name(name.as_ref());
                if local == b"clrScheme" {
                    break;
                }
                if std::str::from_utf8(local)
                    .ok()
                    .and_then(ThemeSlot::from_scheme_name)
                    .is_some()
                {
                    current_slot = None;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing theme: {}", e)));
            }
            _ => {}
        }
    }

    Ok(palette)
}

/// Theme color index for a `schemeClr@val`.
///
/// Text/background aliases get indices beyond the twelve palette slots, so
/// they never resolve and color resolution falls through to the next layer.
fn scheme_color_index(val: &str) -> Option<u8> {
    if let Some(slot) = ThemeSlot::from_scheme_name(val) {
        return Some(slot.index());
    }
    match val {
        "tx1" => Some(13),
        "bg1" => Some(14),
        "tx2" => Some(15),
        "bg2" => Some(16),
        _ => None,
    }
}

/// Where a `solidFill` color currently being read belongs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FillTarget {
    Run,
    Paragraph,
}

/// A `schemeClr` whose luminance modifiers are still being read.
#[derive(Debug, Clone, Copy)]
struct PendingSchemeColor {
    target: FillTarget,
    index: u8,
    lum_mod: Option<f64>,
    lum_off: Option<f64>,
}

impl PendingSchemeColor {
    fn brightness(&self) -> f64 {
        match (self.lum_off, self.lum_mod) {
            (Some(off), _) => off,
            (None, Some(modulation)) => modulation - 1.0,
            (None, None) => 0.0,
        }
    }
}

#[derive(Debug, Default)]
struct ParagraphState {
    runs: Vec<TextRun>,
    text: String,
    color: Option<ColorSpec>,
    run: Option<TextRun>,
}

#[derive(Debug)]
struct ShapeState {
    /// Element depth at which the shape was opened.
    depth: usize,
    name: Option<String>,
    paragraphs: Option<Vec<Paragraph>>,
    paragraph: Option<ParagraphState>,
}

/// Streaming builder turning slide XML into shapes, paragraphs and runs.
#[derive(Debug, Default)]
struct SlideXmlBuilder {
    /// Local names of the currently open elements.
    stack: Vec<Vec<u8>>,
    shapes: Vec<Shape>,
    shape: Option<ShapeState>,
    scheme_color: Option<PendingSchemeColor>,
}

impl SlideXmlBuilder {
    fn parent_is(&self, name: &[u8]) -> bool {
        self.stack.last().is_some_and(|n| n.as_slice() == name)
    }

    /// Whether the open elements end with `path`.
    fn path_ends_with(&self, path: &[&[u8]]) -> bool {
        self.stack.len() >= path.len()
            && self.stack[self.stack.len() - path.len()..]
                .iter()
                .zip(path)
                .all(|(open, expected)| open.as_slice() == *expected)
    }

    /// The owner of a color element whose parent is `solidFill`.
    fn fill_target(&self) -> Option<FillTarget> {
        if self.path_ends_with(&[b"r", b"rPr", b"solidFill"]) {
            Some(FillTarget::Run)
        } else if self.path_ends_with(&[b"pPr", b"defRPr", b"solidFill"]) {
            Some(FillTarget::Paragraph)
        } else {
            None
        }
    }

    fn paragraph_mut(&mut self) -> Option<&mut ParagraphState> {
        self.shape.as_mut().and_then(|s| s.paragraph.as_mut())
    }

    fn set_color(&mut self, target: FillTarget, color: ColorSpec) {
        if let Some(paragraph) = self.paragraph_mut() {
            match target {
                FillTarget::Run => {
                    if let Some(run) = paragraph.run.as_mut() {
                        run.color = Some(color);
                    }
                }
                FillTarget::Paragraph => paragraph.color = Some(color),
            }
        }
    }

    fn open(&mut self, e: &BytesStart) {
        let name = e.name();
        match local_name(name.as_ref()) {
            b"sp" | b"pic" | b"graphicFrame" | b"cxnSp" if self.shape.is_none() => {
                self.shape = Some(ShapeState {
                    depth: self.stack.len(),
                    name: None,
                    paragraphs: None,
                    paragraph: None,
                });
            }
            b"cNvPr" => {
                if let Some(shape) = self.shape.as_mut().filter(|s| s.name.is_none()) {
                    shape.name = attr_value(e, b"name");
                }
            }
            b"txBody" if self.parent_is(b"sp") => {
                if let Some(shape) = self.shape.as_mut() {
                    shape.paragraphs = Some(Vec::new());
                }
            }
            b"p" if self.parent_is(b"txBody") => {
                if let Some(shape) = self.shape.as_mut().filter(|s| s.paragraphs.is_some()) {
                    shape.paragraph = Some(ParagraphState::default());
                }
            }
            b"r" if self.parent_is(b"p") => {
                if let Some(paragraph) = self.paragraph_mut() {
                    paragraph.run = Some(TextRun::new(String::new()));
                }
            }
            b"rPr" if self.parent_is(b"r") => {
                let bold = attr_value(e, b"b").is_some_and(|v| v == "1" || v == "true");
                if let Some(run) = self.paragraph_mut().and_then(|p| p.run.as_mut()) {
                    run.bold = bold;
                }
            }
            b"br" if self.parent_is(b"p") => {
                if let Some(paragraph) = self.paragraph_mut() {
                    paragraph.text.push('\n');
                }
            }
            b"srgbClr" => {
                if let Some(target) = self.fill_target() {
                    if let Some(color) = attr_value(e, b"val").and_then(|v| ColorValue::from_hex(&v)) {
                        self.set_color(target, ColorSpec::Rgb(color));
                    }
                }
            }
            b"schemeClr" => {
                if let Some(target) = self.fill_target() {
                    self.scheme_color = attr_value(e, b"val")
                        .and_then(|v| scheme_color_index(&v))
                        .map(|index| PendingSchemeColor {
                            target,
                            index,
                            lum_mod: None,
                            lum_off: None,
                        });
                }
            }
            b"lumMod" | b"lumOff" if self.parent_is(b"schemeClr") => {
                let value = attr_value(e, b"val")
                    .and_then(|v| v.parse::<f64>().ok())
                    .map(|v| v / 100_000.0);
                if let Some(pending) = self.scheme_color.as_mut() {
                    if local_name(name.as_ref()) == b"lumMod" {
                        pending.lum_mod = value;
                    } else {
                        pending.lum_off = value;
                    }
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, local: &[u8]) {
        match local {
            b"schemeClr" => {
                if let Some(pending) = self.scheme_color.take() {
                    self.set_color(
                        pending.target,
                        ColorSpec::Theme {
                            index: pending.index,
                            brightness: pending.brightness(),
                        },
                    );
                }
            }
            b"r" => {
                if let Some(paragraph) = self.paragraph_mut() {
                    if let Some(run) = paragraph.run.take() {
                        paragraph.text.push_str(&run.text);
                        paragraph.runs.push(run);
                    }
                }
            }
            b"p" if self.parent_is(b"txBody") => {
                if let Some(shape) = self.shape.as_mut() {
                    if let (Some(state), Some(paragraphs)) =
                        (shape.paragraph.take(), shape.paragraphs.as_mut())
                    {
                        paragraphs.push(Paragraph {
                            runs: state.runs,
                            text: state.text,
                            color: state.color,
                        });
                    }
                }
            }
            b"sp" | b"pic" | b"graphicFrame" | b"cxnSp" => {
                if self.shape.as_ref().is_some_and(|s| s.depth == self.stack.len()) {
                    if let Some(state) = self.shape.take() {
                        self.shapes.push(Shape {
                            name: state.name,
                            text_frame: state.paragraphs.map(TextFrame::new),
                        });
                    }
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if !self.parent_is(b"t") {
            return;
        }
        let text: String = text.nfc().collect();
        let in_run = self.path_ends_with(&[b"r", b"t"]);
        let in_field = self.path_ends_with(&[b"fld", b"t"]);
        if let Some(paragraph) = self.paragraph_mut() {
            if in_run {
                if let Some(run) = paragraph.run.as_mut() {
                    run.text.push_str(&text);
                }
            } else if in_field {
                paragraph.text.push_str(&text);
            }
        }
    }
}

/// Extract shapes with their text frames from slide XML.
///
/// Malformed XML ends the slide early; whatever was read so far is kept.
fn extract_shapes_from_xml(xml_content: &str) -> Vec<Shape> {
    let mut builder = SlideXmlBuilder::default();
    let mut reader = Reader::from_str(xml_content);
    // Whitespace inside runs is significant.
    reader.trim_text(false);

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                builder.open(e);
                builder.stack.push(local_name(e.name().as_ref()).to_vec());
            }
            Ok(Event::Empty(ref e)) => {
                builder.open(e);
                builder.close(local_name(e.name().as_ref()));
            }
            Ok(Event::End(ref e)) => {
                builder.stack.pop();
                builder.close(local_name(e.name().as_ref()));
            }
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().unwrap_or_default();
                builder.text(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                log::warn!("XML parsing error (keeping shapes read so far): {}", e);
                break;
            }
            _ => {}
        }
    }

    builder.shapes
}

fn attr_value(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).to_string())
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Extract a slide number from a string like "rId2" or "slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}
