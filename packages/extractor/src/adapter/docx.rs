//! DOCX paragraph reader.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use roxmltree::Document;
use zip::result::ZipError;
use zip::ZipArchive;

use super::unreadable;
use super::xml::{find_by_path, find_child, is_w, paragraph_text, w_attribute};
use crate::error::{ExtractorError, Result};
use crate::types::Paragraph;

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";

/// Read the paragraphs of a DOCX file.
///
/// Each `w:p` of the main document part becomes one [`Paragraph`]; the
/// style tag is the style's display name from the styles part, falling back
/// to the raw style id.
///
/// # Errors
/// `UnreadableDocument` naming the path for container, XML and read
/// failures.
pub fn read_docx(path: &Path) -> Result<Vec<Paragraph>> {
    parse_docx(path).map_err(|e| match e {
        ExtractorError::UnreadableDocument { .. } => e,
        other => unreadable(path, other),
    })
}

fn parse_docx(path: &Path) -> Result<Vec<Paragraph>> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;

    let styles = match read_part(&mut archive, STYLES_PART)? {
        Some(xml) => style_names(&xml)?,
        None => HashMap::new(),
    };
    let document = read_part(&mut archive, DOCUMENT_PART)?
        .ok_or_else(|| unreadable(path, format!("missing {DOCUMENT_PART}")))?;

    let paragraphs = parse_document(&document, &styles)?;
    tracing::debug!(path = %path.display(), paragraphs = paragraphs.len(), styles = styles.len(), "Read DOCX");
    Ok(paragraphs)
}

/// Read a text part of the archive; `None` if the part is absent.
fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<String>> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(Some(contents.trim_start_matches('\u{FEFF}').to_string()))
}

/// Map style ids to display names.
fn style_names(xml: &str) -> Result<HashMap<String, String>> {
    let doc = Document::parse(xml)?;
    let names = doc
        .descendants()
        .filter(|node| is_w(*node, "style"))
        .filter_map(|style| {
            let id = w_attribute(style, "styleId")?;
            let name = find_child(style, "name").and_then(|n| w_attribute(n, "val"))?;
            Some((id.to_string(), name.to_string()))
        })
        .collect();
    Ok(names)
}

fn parse_document(xml: &str, styles: &HashMap<String, String>) -> Result<Vec<Paragraph>> {
    let doc = Document::parse(xml)?;
    let paragraphs = doc
        .descendants()
        .filter(|node| is_w(*node, "p"))
        .map(|p| {
            let style = find_by_path(p, "pPr/pStyle")
                .and_then(|s| w_attribute(s, "val"))
                .map(|id| styles.get(id).cloned().unwrap_or_else(|| id.to_string()));
            Paragraph {
                style,
                text: paragraph_text(p),
            }
        })
        .collect();
    Ok(paragraphs)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::adapter::xml::W_NS;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    /// Write a minimal DOCX with the given `(style id, text)` paragraphs.
    pub(crate) fn write_docx(path: &Path, styles: &[(&str, &str)], paragraphs: &[(Option<&str>, &str)]) {
        let styles_xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><w:styles xmlns:w="{W_NS}">{}</w:styles>"#,
            styles
                .iter()
                .map(|(id, name)| {
                    format!(r#"<w:style w:styleId="{id}"><w:name w:val="{name}"/></w:style>"#)
                })
                .collect::<String>()
        );
        let body: String = paragraphs
            .iter()
            .map(|(style, text)| {
                let ppr = style
                    .map(|id| format!(r#"<w:pPr><w:pStyle w:val="{id}"/></w:pPr>"#))
                    .unwrap_or_default();
                let runs = text
                    .split('\t')
                    .map(|part| format!("<w:t>{part}</w:t>"))
                    .collect::<Vec<_>>()
                    .join("<w:tab/>");
                format!("<w:p>{ppr}<w:r>{runs}</w:r></w:p>")
            })
            .collect();
        let document_xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="{W_NS}"><w:body>{body}</w:body></w:document>"#
        );

        let file = File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        zip.start_file(STYLES_PART, options).unwrap();
        zip.write_all(styles_xml.as_bytes()).unwrap();
        zip.start_file(DOCUMENT_PART, options).unwrap();
        zip.write_all(document_xml.as_bytes()).unwrap();
        zip.finish().unwrap();
    }

    #[test]
    fn test_read_docx_styles_and_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("经文.docx");
        write_docx(
            &path,
            &[("a1", "121文章篇题")],
            &[(Some("a1"), "第一篇 测试篇"), (None, "腓2:5\t你们"), (Some("zz"), "未登记")],
        );

        let paragraphs = read_docx(&path).unwrap();
        assert_eq!(
            paragraphs,
            vec![
                Paragraph::styled("121文章篇题", "第一篇 测试篇"),
                Paragraph::plain("腓2:5\t你们"),
                Paragraph::styled("zz", "未登记"),
            ]
        );
    }

    #[test]
    fn test_missing_document_part() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("空.docx");
        let mut zip = ZipWriter::new(File::create(&path).unwrap());
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        zip.start_file("other.txt", options).unwrap();
        zip.write_all(b"x").unwrap();
        zip.finish().unwrap();

        let err = read_docx(&path).unwrap_err();
        assert!(matches!(err, ExtractorError::UnreadableDocument { .. }));
    }

    #[test]
    fn test_not_a_zip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("坏.docx");
        std::fs::write(&path, "plain text").unwrap();

        let err = read_docx(&path).unwrap_err();
        assert!(matches!(err, ExtractorError::UnreadableDocument { path: ref p, .. } if *p == path));
        assert!(err.to_string().contains("坏.docx"));
    }

    #[test]
    fn test_malformed_xml_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("残.docx");
        let mut zip = ZipWriter::new(File::create(&path).unwrap());
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        zip.start_file(DOCUMENT_PART, options).unwrap();
        zip.write_all(b"<w:document><w:body>").unwrap();
        zip.finish().unwrap();

        let err = read_docx(&path).unwrap_err();
        assert!(matches!(err, ExtractorError::UnreadableDocument { path: ref p, .. } if *p == path));
    }
}
