//! Binary-to-text extraction for uploaded résumés. The parser proper never
//! touches bytes; it receives the raw text produced here.

use std::io::Read;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

static XML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("static regex"));

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Docx,
}

impl FileType {
    pub fn from_extension(filename: &str) -> Option<FileType> {
        match filename.rsplit('.').next()?.to_lowercase().as_str() {
            "pdf" => Some(FileType::Pdf),
            "docx" => Some(FileType::Docx),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Pdf => "pdf",
            FileType::Docx => "docx",
        }
    }
}

/// Extracts raw text from an uploaded document, failing with a descriptive
/// error when the file is unreadable.
pub fn extract_text(bytes: &[u8], file_type: FileType) -> Result<String> {
    match file_type {
        FileType::Pdf => extract_text_from_pdf(bytes),
        FileType::Docx => extract_text_from_docx(bytes),
    }
}

fn extract_text_from_pdf(bytes: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| anyhow::anyhow!("Failed to extract text from PDF: {e}"))
}

/// A DOCX file is a zip archive; the document body lives in
/// `word/document.xml`. Paragraph closes become newlines, remaining markup
/// is stripped, and the basic XML entities are decoded.
fn extract_text_from_docx(bytes: &[u8]) -> Result<String> {
    let cursor = std::io::Cursor::new(bytes);
    let mut archive = zip::ZipArchive::new(cursor).context("Failed to open DOCX archive")?;
    let mut document = archive
        .by_name("word/document.xml")
        .context("Not a DOCX file: word/document.xml missing")?;

    let mut xml = String::new();
    document
        .read_to_string(&mut xml)
        .context("Failed to read DOCX document body")?;

    let with_breaks = xml.replace("</w:p>", "\n");
    let stripped = XML_TAG.replace_all(&with_breaks, "");
    Ok(stripped
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'"))
}
