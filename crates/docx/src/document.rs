//! Minimal WordprocessingML body model: styled paragraphs, runs and page
//! breaks, serialized to `word/document.xml`.

use quick_xml::escape::escape;
use slidedoc_core::{Error, Result};
use std::fmt::Write;

const WORDPROCESSING_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const RELATIONSHIPS_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Paragraph styles defined in `word/styles.xml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphStyle {
    Title,
    Heading1,
    Heading2,
}

impl ParagraphStyle {
    pub fn style_id(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Heading1 => "Heading1",
            Self::Heading2 => "Heading2",
        }
    }
}

/// A run of text with character formatting. `\n` becomes a line break.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocRun {
    pub text: String,
    pub italic: bool,
}

impl DocRun {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    fn to_xml(&self, xml: &mut String) -> Result<()> {
        xml.push_str("<w:r>");
        if self.italic {
            xml.push_str("<w:rPr><w:i/></w:rPr>");
        }
        for (idx, line) in self.text.split('\n').enumerate() {
            if idx > 0 {
                xml.push_str("<w:br/>");
            }
            if !line.is_empty() {
                write!(xml, "<w:t xml:space=\"preserve\">{}</w:t>", escape(line))
                    .map_err(|e| Error::ReportError(e.to_string()))?;
            }
        }
        xml.push_str("</w:r>");
        Ok(())
    }
}

/// A body paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocParagraph {
    pub style: Option<ParagraphStyle>,
    pub centered: bool,
    pub runs: Vec<DocRun>,
}

impl DocParagraph {
    /// An empty paragraph, used for vertical spacing.
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::from_run(DocRun::new(text))
    }

    pub fn from_run(run: DocRun) -> Self {
        Self {
            runs: vec![run],
            ..Default::default()
        }
    }

    pub fn heading(style: ParagraphStyle, text: impl Into<String>) -> Self {
        Self::text(text).with_style(style)
    }

    pub fn with_style(mut self, style: ParagraphStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn centered(mut self) -> Self {
        self.centered = true;
        self
    }

    /// Plain text of the paragraph.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    fn to_xml(&self, xml: &mut String) -> Result<()> {
        xml.push_str("<w:p>");
        if self.style.is_some() || self.centered {
            xml.push_str("<w:pPr>");
            if let Some(style) = self.style {
                write!(xml, "<w:pStyle w:val=\"{}\"/>", style.style_id())
                    .map_err(|e| Error::ReportError(e.to_string()))?;
            }
            if self.centered {
                xml.push_str("<w:jc w:val=\"center\"/>");
            }
            xml.push_str("</w:pPr>");
        }
        for run in &self.runs {
            run.to_xml(xml)?;
        }
        xml.push_str("</w:p>");
        Ok(())
    }
}

/// A top-level body element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(DocParagraph),
    PageBreak,
}

/// The document body in reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_paragraph(&mut self, paragraph: DocParagraph) {
        self.blocks.push(Block::Paragraph(paragraph));
    }

    pub fn add_blank(&mut self) {
        self.add_paragraph(DocParagraph::blank());
    }

    pub fn add_page_break(&mut self) {
        self.blocks.push(Block::PageBreak);
    }

    /// Paragraphs in order, skipping page breaks.
    pub fn paragraphs(&self) -> impl Iterator<Item = &DocParagraph> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Paragraph(p) => Some(p),
            Block::PageBreak => None,
        })
    }

    /// Serialize to the `word/document.xml` part.
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(4096);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        write!(
            xml,
            "<w:document xmlns:w=\"{}\" xmlns:r=\"{}\"><w:body>",
            WORDPROCESSING_NS, RELATIONSHIPS_NS
        )
        .map_err(|e| Error::ReportError(e.to_string()))?;

        for block in &self.blocks {
            match block {
                Block::Paragraph(p) => p.to_xml(&mut xml)?,
                Block::PageBreak => xml.push_str("<w:p><w:r><w:br w:type=\"page\"/></w:r></w:p>"),
            }
        }

        // US Letter, one-inch margins
        xml.push_str(
            "<w:sectPr><w:pgSz w:w=\"12240\" w:h=\"15840\"/>\
             <w:pgMar w:top=\"1440\" w:right=\"1440\" w:bottom=\"1440\" w:left=\"1440\" \
             w:header=\"720\" w:footer=\"720\" w:gutter=\"0\"/></w:sectPr>",
        );
        xml.push_str("</w:body></w:document>");
        Ok(xml)
    }
}
