//! Document loader: turns uploaded `.docx` bytes into ordered paragraph records.
//!
//! DOCX files are ZIP archives; the paragraph flow lives in `word/document.xml`.
//! docx-rs is writer-only, so this is a manual ZIP + streamed XML walk:
//! `w:p` elements become paragraphs, `w:pStyle`/`w:numPr` decide the style,
//! `w:t` runs carry the text. Table cells contain their own `w:p` elements and
//! are picked up in document order.
//!
//! Upload bytes are spooled to an anonymous temp file scoped to this call;
//! the file is released on every exit path when the handle drops.

use std::io::{Seek, SeekFrom, Write};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::errors::AppError;

/// Paragraph style as seen by the section extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphStyle {
    Heading1,
    Heading2,
    Body,
    Bullet,
}

/// One paragraph of the source document, in document order.
/// Immutable once produced.
#[derive(Debug, Clone)]
pub struct ParagraphRecord {
    pub text: String,
    pub style: ParagraphStyle,
    pub order: usize,
}

/// Reads a `.docx` byte stream and yields its paragraphs in order.
///
/// Errors with `UnsupportedFormat` if the bytes cannot be opened as a docx
/// container, and `EmptyDocument` if no non-blank paragraph exists.
pub fn load(bytes: &[u8]) -> Result<Vec<ParagraphRecord>, AppError> {
    let mut spool = tempfile::tempfile()
        .and_then(|mut f| {
            f.write_all(bytes)?;
            f.seek(SeekFrom::Start(0))?;
            Ok(f)
        })
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to spool upload: {e}")))?;

    // Cheap sanity check before handing the stream to the ZIP reader.
    if bytes.len() < 4 || &bytes[..2] != b"PK" {
        return Err(AppError::UnsupportedFormat(
            "file is not a .docx document".to_string(),
        ));
    }
    spool.seek(SeekFrom::Start(0)).ok();

    let mut archive = ZipArchive::new(spool).map_err(|e| {
        AppError::UnsupportedFormat(format!("file is not a readable .docx archive: {e}"))
    })?;

    let xml = {
        let mut entry = archive.by_name("word/document.xml").map_err(|_| {
            AppError::UnsupportedFormat(
                "archive has no word/document.xml, not a Word document".to_string(),
            )
        })?;
        let mut s = String::new();
        std::io::Read::read_to_string(&mut entry, &mut s).map_err(|e| {
            AppError::UnsupportedFormat(format!("word/document.xml is not valid UTF-8: {e}"))
        })?;
        s
    };

    let paragraphs = parse_document_xml(&xml)?;
    if paragraphs.is_empty() {
        return Err(AppError::EmptyDocument(
            "document contains no paragraphs".to_string(),
        ));
    }
    Ok(paragraphs)
}

/// Walks `word/document.xml` and builds paragraph records.
fn parse_document_xml(xml: &str) -> Result<Vec<ParagraphRecord>, AppError> {
    let mut reader = Reader::from_str(xml);

    let mut records: Vec<ParagraphRecord> = Vec::new();
    let mut text = String::new();
    let mut style_id: Option<String> = None;
    let mut has_numbering = false;
    let mut in_paragraph = false;
    let mut in_text_run = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| AppError::UnsupportedFormat(format!("malformed document.xml: {e}")))?;

        match event {
            Event::Start(ref e) => match e.name().as_ref() {
                b"w:p" => {
                    in_paragraph = true;
                    text.clear();
                    style_id = None;
                    has_numbering = false;
                }
                b"w:t" => in_text_run = in_paragraph,
                b"w:numPr" => has_numbering = in_paragraph,
                _ => {}
            },
            Event::Empty(ref e) => match e.name().as_ref() {
                b"w:pStyle" => {
                    if in_paragraph {
                        style_id = attr_val(e, b"w:val");
                    }
                }
                b"w:numPr" => has_numbering = in_paragraph,
                b"w:tab" => {
                    if in_paragraph {
                        text.push(' ');
                    }
                }
                b"w:br" => {
                    if in_paragraph {
                        text.push(' ');
                    }
                }
                _ => {}
            },
            Event::Text(t) => {
                if in_text_run {
                    let chunk = t.unescape().map_err(|e| {
                        AppError::UnsupportedFormat(format!("malformed document.xml: {e}"))
                    })?;
                    text.push_str(&chunk);
                }
            }
            Event::End(ref e) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => {
                    in_paragraph = false;
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        let style = resolve_style(style_id.as_deref(), has_numbering);
                        records.push(ParagraphRecord {
                            text: trimmed.to_string(),
                            style,
                            order: records.len(),
                        });
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(records)
}

/// Maps a `w:pStyle` id plus numbering presence to a paragraph style.
/// Word's built-in ids: "Heading1", "Heading2", "Title", "ListParagraph".
fn resolve_style(style_id: Option<&str>, has_numbering: bool) -> ParagraphStyle {
    match style_id {
        Some(id) if id.eq_ignore_ascii_case("Heading1") || id.eq_ignore_ascii_case("Title") => {
            ParagraphStyle::Heading1
        }
        Some(id) if id.eq_ignore_ascii_case("Heading2") || id.eq_ignore_ascii_case("Heading3") => {
            ParagraphStyle::Heading2
        }
        Some(id) if id.eq_ignore_ascii_case("ListParagraph") => ParagraphStyle::Bullet,
        _ if has_numbering => ParagraphStyle::Bullet,
        _ => ParagraphStyle::Body,
    }
}

/// Extracts an attribute value by key from an element.
fn attr_val(e: &quick_xml::events::BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(Result::ok)
        .find(|a| a.key.as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).to_string())
}
