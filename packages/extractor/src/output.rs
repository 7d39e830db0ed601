//! YAML and JSON output for extracted collections.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::error::Result;
use crate::types::TrainingCollection;

/// Serialization format of a saved collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    /// File extension for this format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
        }
    }
}

/// Indent YAML sequences under their parent key.
///
/// The serializer places sequence items (`- `) at the same indent as their
/// parent key; each open sequence adds two spaces:
///
/// ```yaml
/// # Before:          # After:
/// chapters:          chapters:
/// - number: 1          - number: 1
///   title: foo           title: foo
/// ```
///
/// Lines of a block scalar (`|-`, `>`) are content, not structure: they
/// move with the line that opened the block and are otherwise untouched.
fn indent_yaml_sequences(yaml: &str) -> String {
    let mut result: Vec<String> = Vec::new();
    // Indent levels where open sequences start
    let mut seq_indents: Vec<usize> = Vec::new();
    // Key indent and extra shift of the open block scalar
    let mut block: Option<(usize, usize)> = None;

    for line in yaml.lines() {
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();

        if let Some((block_indent, block_extra)) = block {
            if trimmed.is_empty() {
                result.push(line.to_string());
                continue;
            }
            if indent > block_indent {
                result.push(format!("{}{}", " ".repeat(block_extra), line));
                continue;
            }
            block = None;
        }

        if trimmed.is_empty() {
            result.push(line.to_string());
            continue;
        }

        let is_item = trimmed.starts_with("- ") || trimmed == "-";

        while let Some(&seq_indent) = seq_indents.last() {
            if indent < seq_indent || (indent == seq_indent && !is_item) {
                seq_indents.pop();
            } else {
                break;
            }
        }

        if is_item && seq_indents.last() != Some(&indent) {
            seq_indents.push(indent);
        }

        let extra = seq_indents.len() * 2;
        if extra > 0 {
            result.push(format!("{}{}", " ".repeat(indent + extra), trimmed));
        } else {
            result.push(line.to_string());
        }

        if let Some(block_indent) = block_scalar_indent(trimmed, indent) {
            block = Some((block_indent, extra));
        }
    }

    result.join("\n")
}

/// Indent of the key owning a block scalar opened on this line, if any.
///
/// Block content is indented deeper than the returned value.
fn block_scalar_indent(trimmed: &str, indent: usize) -> Option<usize> {
    let indicator = trimmed.rsplit(' ').next()?;
    if !indicator.starts_with(['|', '>']) || indicator.len() > 3 {
        return None;
    }

    let mut rest = trimmed;
    let mut dashes: usize = 0;
    while let Some(after) = rest.strip_prefix("- ") {
        rest = after.trim_start();
        dashes += 1;
    }
    if rest == indicator {
        // Bare sequence item: content is indented past the last dash
        return Some(indent + 2 * dashes.saturating_sub(1));
    }
    rest.contains(": ").then_some(indent + 2 * dashes)
}

/// Generate the YAML document for a collection.
pub fn generate_yaml(collection: &TrainingCollection) -> Result<String> {
    let yaml = serde_yaml_ng::to_string(collection)?;
    let yaml = indent_yaml_sequences(&yaml);

    let lines: Vec<&str> = yaml.lines().map(str::trim_end).collect();
    Ok(format!("---\n{}\n", lines.join("\n")))
}

/// Generate pretty-printed JSON for a collection.
pub fn generate_json(collection: &TrainingCollection) -> Result<String> {
    let mut json = serde_json::to_string_pretty(collection)?;
    json.push('\n');
    Ok(json)
}

/// Save a collection as `<output_base>/<batch>/collection.<ext>`.
///
/// Writes to a temp file, syncs it to disk, then renames it into place so
/// that a crash never leaves a half-written file behind.
///
/// # Returns
/// Path to the saved file
pub fn save_collection(
    collection: &TrainingCollection,
    output_base: &Path,
    batch: &str,
    format: OutputFormat,
) -> Result<PathBuf> {
    let output_dir = output_base.join(batch);
    fs::create_dir_all(&output_dir)?;

    let file_name = format!("collection.{}", format.extension());
    let output_file = output_dir.join(&file_name);
    let temp_file = output_dir.join(format!(".{file_name}.tmp"));

    let content = match format {
        OutputFormat::Yaml => generate_yaml(collection)?,
        OutputFormat::Json => generate_json(collection)?,
    };

    {
        let mut file = File::create(&temp_file)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if output_file.exists() {
        fs::remove_file(&output_file)?;
    }

    fs::rename(&temp_file, &output_file)?;
    tracing::debug!(path = %output_file.display(), bytes = content.len(), "Collection saved");

    Ok(output_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chapter, ContentNode, DaySchedule, Level};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn create_test_collection() -> TrainingCollection {
        let mut node = ContentNode::new(Level::One, "壹", "第一要点");
        node.citation = "腓2:5\tA\n腓2:6\tB".to_string();
        node.body.push("正文。".to_string());
        node.children.push(ContentNode::new(Level::Two, "一", "子要点"));

        let mut chapter = Chapter::new(1, "测试篇");
        chapter.outline_tree.push(node.clone());
        let mut day = DaySchedule::new("第一周 • 周一", 1, 1);
        day.outline.push(node);
        chapter.schedule.push(day);

        TrainingCollection {
            title: "二〇二五年夏季训练".to_string(),
            year: 2025,
            season: "夏季".to_string(),
            chapters: vec![chapter],
            ..TrainingCollection::default()
        }
    }

    #[test]
    fn test_indent_yaml_sequences() {
        let input = "chapters:\n- number: 1\n  tags:\n  - a\n  - b\n  title: x\nyear: 1";
        let expected = "chapters:\n  - number: 1\n    tags:\n      - a\n      - b\n    title: x\nyear: 1";
        assert_eq!(indent_yaml_sequences(input), expected);
    }

    #[test]
    fn test_indent_keeps_block_scalar_content() {
        let input = "chapters:\n- excerpt: |-\n    a\n\n    - b\n  title: x\nyear: 1";
        let expected =
            "chapters:\n  - excerpt: |-\n      a\n\n      - b\n    title: x\nyear: 1";
        assert_eq!(indent_yaml_sequences(input), expected);
    }

    #[test]
    fn test_multi_line_fields_read_back() {
        let mut collection = create_test_collection();
        collection.chapters[0].ministry_excerpt = "第一段\n\n- 列表样的第二段\n第三段".to_string();
        collection.chapters[0].hymn_reference = "EM 诗歌: s250\n- s432".to_string();
        collection.chapters[0].outline_tree[0].children[0].citation =
            "- 像列表的经文\n第二行".to_string();

        let yaml = generate_yaml(&collection).unwrap();
        let parsed: TrainingCollection = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(parsed, collection);
    }

    #[test]
    fn test_generate_yaml() {
        let collection = create_test_collection();
        let yaml = generate_yaml(&collection).unwrap();

        assert!(yaml.starts_with("---\n"));
        assert!(yaml.contains("title: 二〇二五年夏季训练"));
        assert!(yaml.contains("\n  - number: 1\n"));
        assert!(yaml.lines().all(|l| l == l.trim_end()));
    }

    #[test]
    fn test_generated_yaml_reads_back() {
        let collection = create_test_collection();
        let yaml = generate_yaml(&collection).unwrap();

        let parsed: TrainingCollection = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(parsed, collection);
    }

    #[test]
    fn test_save_collection() {
        let collection = create_test_collection();
        let temp_dir = tempdir().unwrap();

        let yaml_path =
            save_collection(&collection, temp_dir.path(), "2025-06-夏季", OutputFormat::Yaml).unwrap();
        assert_eq!(yaml_path, temp_dir.path().join("2025-06-夏季").join("collection.yaml"));
        assert!(fs::read_to_string(&yaml_path).unwrap().starts_with("---\n"));

        let json_path =
            save_collection(&collection, temp_dir.path(), "2025-06-夏季", OutputFormat::Json).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(json_path).unwrap()).unwrap();
        assert_eq!(value["chapters"][0]["title"], "测试篇");
        assert_eq!(value["chapters"][0]["schedule"][0]["day"], 1);

        let leftovers: Vec<_> = fs::read_dir(temp_dir.path().join("2025-06-夏季"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
