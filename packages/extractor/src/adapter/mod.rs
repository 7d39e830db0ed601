//! Paragraph stream adapters.
//!
//! Every source document is reduced to an ordered list of [`Paragraph`]s
//! (style tag plus text) before any pass sees it. Supported inputs are DOCX
//! files, plain text (one paragraph per line) and YAML lists of
//! `{style, text}` records. Legacy `.doc` files must be converted first.

pub mod docx;
pub mod xml;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ExtractorError, Result};
use crate::text::normalize_text;
use crate::types::Paragraph;

/// Extensions tried by [`find_document`], in order.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["docx", "yaml", "yml", "txt"];

/// Load a document as a normalized paragraph stream.
///
/// # Errors
/// `MissingDocument` if the file does not exist, `UnsupportedFormat` for
/// unknown or legacy extensions, and read or parse errors otherwise.
pub fn load_paragraphs(path: &Path) -> Result<Vec<Paragraph>> {
    if !path.is_file() {
        return Err(ExtractorError::MissingDocument {
            folder: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            stem: path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
        });
    }

    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let paragraphs = match extension.as_str() {
        "docx" => docx::read_docx(path)?,
        "yaml" | "yml" => read_yaml(path)?,
        "txt" => read_text(path)?,
        _ => {
            return Err(ExtractorError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            })
        }
    };

    Ok(paragraphs
        .into_iter()
        .map(|p| Paragraph {
            style: p.style.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            text: normalize_text(&p.text),
        })
        .collect())
}

/// Wrap a read or parse failure with the document path.
pub(crate) fn unreadable(path: &Path, reason: impl ToString) -> ExtractorError {
    ExtractorError::UnreadableDocument {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn read_text(path: &Path) -> Result<Vec<Paragraph>> {
    let content = fs::read_to_string(path).map_err(|e| unreadable(path, e))?;
    Ok(content
        .trim_start_matches('\u{FEFF}')
        .lines()
        .map(Paragraph::plain)
        .collect())
}

fn read_yaml(path: &Path) -> Result<Vec<Paragraph>> {
    let content = fs::read_to_string(path).map_err(|e| unreadable(path, e))?;
    serde_yaml_ng::from_str(&content).map_err(|e| unreadable(path, e))
}

/// Locate the document named `stem` in `folder`.
///
/// Supported extensions are tried in order; a lone `.doc` is reported as
/// unsupported so the operator knows to convert it.
pub fn find_document(folder: &Path, stem: &str) -> Result<PathBuf> {
    if let Some(path) = SUPPORTED_EXTENSIONS
        .iter()
        .map(|ext| folder.join(format!("{stem}.{ext}")))
        .find(|path| path.is_file())
    {
        return Ok(path);
    }

    let legacy = folder.join(format!("{stem}.doc"));
    if legacy.is_file() {
        return Err(ExtractorError::UnsupportedFormat {
            path: legacy,
            extension: "doc".to_string(),
        });
    }

    Err(ExtractorError::MissingDocument {
        folder: folder.to_path_buf(),
        stem: stem.to_string(),
    })
}
