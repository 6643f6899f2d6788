//! Report writer: lays out a [`ReportModel`] as a Word document and packages
//! it as a `.docx` archive.

use crate::document::{DocParagraph, DocRun, Document, ParagraphStyle};
use slidedoc_core::{Error, ReportModel, Result, SectionKind, SessionGroup};
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::ZipWriter;

/// Blank paragraphs under each manual entry heading by default.
pub const DEFAULT_MANUAL_ENTRY_LINES: usize = 8;

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:cs="Calibri"/><w:sz w:val="22"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="160" w:line="259" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style><w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:spacing w:after="240"/></w:pPr><w:rPr><w:sz w:val="52"/><w:color w:val="17365D"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="480" w:after="120"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:sz w:val="32"/><w:color w:val="2F5496"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="200" w:after="80"/><w:outlineLvl w:val="1"/></w:pPr><w:rPr><w:b/><w:sz w:val="26"/><w:color w:val="2F5496"/></w:rPr></w:style></w:styles>"#;

/// Numbered heading of each grouped report section.
fn section_heading(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::Goals => "2. Session Goals",
        SectionKind::Assessments => "3. Assessment Items",
        SectionKind::Careers => "4. Related Careers",
        SectionKind::Materials => "5. Session Materials",
    }
}

/// Writes the documentation updates report as a `.docx` package.
#[derive(Debug, Clone)]
pub struct DocxReportWriter {
    manual_entry_lines: usize,
}

impl DocxReportWriter {
    pub fn new() -> Self {
        Self {
            manual_entry_lines: DEFAULT_MANUAL_ENTRY_LINES,
        }
    }

    /// Set the number of blank paragraphs under "QA Tickets" and "Notes".
    pub fn with_manual_entry_lines(mut self, lines: usize) -> Self {
        self.manual_entry_lines = lines;
        self
    }

    /// Lay out the report body.
    pub fn build_document(&self, model: &ReportModel) -> Document {
        let mut doc = Document::new();
        let acronym = &model.acronym;

        doc.add_paragraph(
            DocParagraph::heading(
                ParagraphStyle::Title,
                format!("{} - Documentation Updates & Tickets", acronym),
            )
            .centered(),
        );
        doc.add_paragraph(
            DocParagraph::text(format!("Extracted from {} PowerPoint Sessions", acronym)).centered(),
        );
        doc.add_blank();

        let summary = &model.summary;
        let summary_text = format!(
            "Content Summary:\n\
             • Vocabulary Terms: {}\n\
             • Session Goals: {}\n\
             • Assessment Items: {}\n\
             • Careers: {}\n\
             • Session Materials: {}\n\
             • QA Tickets: (Manual entry section)\n\
             • Notes: (Manual entry section)",
            summary.vocabulary, summary.goals, summary.assessments, summary.careers, summary.materials
        );
        doc.add_paragraph(DocParagraph::text(summary_text).centered());
        doc.add_page_break();

        if !model.vocabulary.is_empty() {
            doc.add_paragraph(DocParagraph::heading(ParagraphStyle::Heading1, "1. Vocabulary Terms"));
            let total = model.vocabulary.len();
            for (idx, entry) in model.vocabulary.iter().enumerate() {
                let number = idx + 1;
                doc.add_paragraph(DocParagraph::heading(
                    ParagraphStyle::Heading2,
                    format!("{}. {}", number, entry.term),
                ));
                doc.add_paragraph(DocParagraph::text(entry.definition.as_str()));
                doc.add_paragraph(DocParagraph::from_run(
                    DocRun::new(format!("Source: {}", entry.source)).italic(),
                ));
                if number < total {
                    doc.add_blank();
                }
            }
        }

        for kind in SectionKind::ALL {
            let groups = model.section(kind);
            if groups.is_empty() {
                continue;
            }
            doc.add_page_break();
            doc.add_paragraph(DocParagraph::heading(ParagraphStyle::Heading1, section_heading(kind)));
            for group in groups {
                add_session_group(&mut doc, group);
            }
        }

        doc.add_page_break();
        for heading in ["QA Tickets", "Notes"] {
            doc.add_paragraph(DocParagraph::heading(ParagraphStyle::Heading1, heading));
            for _ in 0..self.manual_entry_lines {
                doc.add_blank();
            }
        }

        doc
    }

    /// Write the report package to any seekable writer.
    pub fn write<W: Write + Seek>(&self, model: &ReportModel, writer: W) -> Result<()> {
        let document_xml = self.build_document(model).to_xml()?;

        let mut zip = ZipWriter::new(writer);
        let options = FileOptions::default();
        let parts = [
            ("[Content_Types].xml", CONTENT_TYPES_XML),
            ("_rels/.rels", PACKAGE_RELS_XML),
            ("word/document.xml", document_xml.as_str()),
            ("word/styles.xml", STYLES_XML),
            ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML),
        ];
        for (name, content) in parts {
            zip.start_file(name, options)
                .map_err(|e| Error::ZipError(format!("Failed to start '{}': {}", name, e)))?;
            zip.write_all(content.as_bytes())?;
        }
        zip.finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))?;

        log::debug!(
            "Wrote report for {} ({} bytes of document XML)",
            model.acronym,
            document_xml.len()
        );
        Ok(())
    }

    /// Write the report package to a file, replacing it if present.
    pub fn write_to_path(&self, model: &ReportModel, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write(model, &mut writer)?;
        writer.flush()?;
        log::info!("Report written to {}", path.display());
        Ok(())
    }
}

impl Default for DocxReportWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn add_session_group(doc: &mut Document, group: &SessionGroup) {
    doc.add_paragraph(DocParagraph::heading(ParagraphStyle::Heading2, group.filename.as_str()));
    for (idx, item) in group.items.iter().enumerate() {
        doc.add_paragraph(DocParagraph::text(format!("{}. {}", idx + 1, item)));
    }
    doc.add_blank();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Block;
    use slidedoc_core::{CorpusResults, DeckRecord, VocabularyItem};
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn sample_model() -> ReportModel {
        let mut results = CorpusResults::default();
        results.push(
            "GEOL_S1.pptx",
            DeckRecord {
                vocabulary: vec![
                    VocabularyItem::new("Magma", "molten rock & gas"),
                    VocabularyItem::new("basalt", "dark volcanic rock"),
                ],
                goals: vec!["Identify rock types".to_string()],
                ..Default::default()
            },
        );
        results.push(
            "GEOL_S2.pptx",
            DeckRecord {
                careers: vec!["Geologist".to_string()],
                ..Default::default()
            },
        );
        ReportModel::build("GEOL", &results)
    }

    fn texts(doc: &Document) -> Vec<String> {
        doc.paragraphs().map(DocParagraph::plain_text).collect()
    }

    #[test]
    fn test_title_and_summary() {
        let doc = DocxReportWriter::new().build_document(&sample_model());
        let texts = texts(&doc);
        assert_eq!(texts[0], "GEOL - Documentation Updates & Tickets");
        assert_eq!(texts[1], "Extracted from GEOL PowerPoint Sessions");
        assert_eq!(texts[2], "");
        assert!(texts[3].starts_with("Content Summary:\n• Vocabulary Terms: 2\n• Session Goals: 1\n"));
        assert!(texts[3].ends_with("• Notes: (Manual entry section)"));
        assert!(matches!(doc.blocks[4], Block::PageBreak));
    }

    #[test]
    fn test_vocabulary_section_layout() {
        let doc = DocxReportWriter::new().build_document(&sample_model());
        let texts = texts(&doc);
        let start = texts.iter().position(|t| t == "1. Vocabulary Terms").unwrap();
        assert_eq!(
            texts[start + 1..start + 8],
            [
                "1. basalt",
                "dark volcanic rock",
                "Source: GEOL_S1.pptx",
                "",
                "2. Magma",
                "molten rock & gas",
                "Source: GEOL_S1.pptx",
            ]
        );
        // no spacer after the last term
        assert_eq!(texts[start + 8], "2. Session Goals");
    }

    #[test]
    fn test_only_non_empty_sections_rendered() {
        let doc = DocxReportWriter::new().build_document(&sample_model());
        let texts = texts(&doc);
        assert!(texts.contains(&"2. Session Goals".to_string()));
        assert!(texts.contains(&"4. Related Careers".to_string()));
        assert!(!texts.contains(&"3. Assessment Items".to_string()));
        assert!(!texts.contains(&"5. Session Materials".to_string()));

        let careers = texts.iter().position(|t| t == "4. Related Careers").unwrap();
        assert_eq!(texts[careers + 1], "GEOL_S2.pptx");
        assert_eq!(texts[careers + 2], "1. Geologist");
    }

    #[test]
    fn test_manual_entry_sections() {
        let doc = DocxReportWriter::new()
            .with_manual_entry_lines(2)
            .build_document(&sample_model());
        let texts = texts(&doc);
        let n = texts.len();
        assert_eq!(texts[n - 6..], ["QA Tickets", "", "", "Notes", "", ""]);

        let default_doc = DocxReportWriter::default().build_document(&sample_model());
        let default_texts: Vec<String> = default_doc.paragraphs().map(DocParagraph::plain_text).collect();
        let notes = default_texts.iter().position(|t| t == "Notes").unwrap();
        assert_eq!(default_texts.len() - notes - 1, DEFAULT_MANUAL_ENTRY_LINES);
    }

    #[test]
    fn test_empty_model_still_has_manual_sections() {
        let model = ReportModel::build("MATS", &CorpusResults::default());
        let doc = DocxReportWriter::new().build_document(&model);
        let texts = texts(&doc);
        assert!(texts[3].contains("• Vocabulary Terms: 0"));
        assert!(!texts.contains(&"1. Vocabulary Terms".to_string()));
        assert!(texts.contains(&"QA Tickets".to_string()));
    }

    #[test]
    fn test_write_package() {
        let mut buffer = Cursor::new(Vec::new());
        DocxReportWriter::new()
            .write(&sample_model(), &mut buffer)
            .unwrap();

        let mut archive = ZipArchive::new(Cursor::new(buffer.into_inner())).unwrap();
        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "word/styles.xml",
            "word/_rels/document.xml.rels",
        ] {
            assert!(archive.by_name(part).is_ok(), "missing {}", part);
        }

        let mut document = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut document)
            .unwrap();
        assert!(document.contains("GEOL - Documentation Updates &amp; Tickets"));
        assert!(document.contains("molten rock &amp; gas"));
        assert!(document.contains("<w:pStyle w:val=\"Heading2\"/>"));
    }
}
