//! Uploaded resume file → plain text.

use std::io::{Cursor, Read};
use std::path::Path;

use anyhow::Context;
use bytes::Bytes;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    Docx,
    Text,
}

static DOCX_BREAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"</w:p>|<w:br\s*/>|<w:cr\s*/>").expect("docx break pattern")
});
static DOCX_TAB: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<w:tab\s*/>").expect("docx tab pattern"));
static XML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("xml tag pattern"));

impl ResumeFormat {
    /// Detects the format from the file extension, case-insensitively.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let extension = Path::new(file_name)
            .extension()?
            .to_str()?
            .to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(ResumeFormat::Pdf),
            "docx" => Some(ResumeFormat::Docx),
            "txt" => Some(ResumeFormat::Text),
            _ => None,
        }
    }
}

/// Extracts text from an uploaded resume. PDF parsing is CPU-bound; call this
/// from `spawn_blocking`.
pub fn extract_resume_text(file_name: &str, data: &Bytes) -> Result<String, AppError> {
    let format = ResumeFormat::from_file_name(file_name).ok_or_else(|| {
        AppError::Validation(format!(
            "Unsupported resume file '{file_name}'. Allowed: pdf, docx, txt"
        ))
    })?;

    match format {
        ResumeFormat::Text => Ok(String::from_utf8_lossy(data).into_owned()),
        ResumeFormat::Pdf => pdf_extract::extract_text_from_mem(data).map_err(|e| {
            warn!("PDF extraction failed for {file_name}: {e}");
            AppError::UnprocessableEntity(format!("Could not read text from '{file_name}'"))
        }),
        ResumeFormat::Docx => docx_to_text(data).map_err(|e| {
            warn!("DOCX extraction failed for {file_name}: {e:#}");
            AppError::UnprocessableEntity(format!("Could not read text from '{file_name}'"))
        }),
    }
}

/// Body text of a Word document, one line per paragraph.
fn docx_to_text(data: &[u8]) -> anyhow::Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data)).context("not a zip archive")?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .context("missing word/document.xml")?
        .read_to_string(&mut xml)
        .context("unreadable word/document.xml")?;

    let xml = DOCX_BREAK.replace_all(&xml, "\n");
    let xml = DOCX_TAB.replace_all(&xml, " ");
    let text = XML_TAG.replace_all(&xml, "");
    Ok(unescape_xml(&text))
}

fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
