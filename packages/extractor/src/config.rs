//! Configuration constants, runtime settings and batch-folder naming.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::error::{ExtractorError, Result};

/// Number of leading non-empty paragraphs scanned for the training title.
pub const HEADER_SCAN_LIMIT: usize = 15;

/// Header paragraphs at least this long are never title candidates.
pub const HEADER_TITLE_MAX_CHARS: usize = 50;

/// Placeholder glyph used by templates to pad empty excerpt lines.
pub const FILLER_GLYPH: char = '_';

/// Share of filler glyphs above which an excerpt line is discarded.
pub const FILLER_RATIO: f64 = 0.8;

/// Excerpt lines shorter than this must contain an ideograph to survive.
pub const MINISTRY_MIN_CHARS: usize = 3;

/// Body-styled schedule paragraphs must be longer than this to count as excerpt.
pub const SCHEDULE_MINISTRY_MIN_CHARS: usize = 20;

/// Feeding verse paragraphs longer than this are split at prose markers.
pub const FEEDING_VERSE_MAX_CHARS: usize = 800;

/// Default training season when a batch folder does not name one.
pub const DEFAULT_SEASON: &str = "秋季";

/// Settings file looked up in the working directory when none is given.
pub const DEFAULT_SETTINGS_FILE: &str = "tehui.yaml";

/// Names of the documents inside one batch folder, without extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentNames {
    /// Outline document (chapter titles, headings, scripture).
    pub outline: String,
    /// Detail transcript document.
    pub detail: String,
    /// Daily schedule documents, processed in order.
    pub schedules: Vec<String>,
}

impl Default for DocumentNames {
    fn default() -> Self {
        Self {
            outline: "经文".to_string(),
            detail: "听抄".to_string(),
            schedules: vec!["晨兴".to_string(), "晨兴2".to_string()],
        }
    }
}

/// Fallback metadata for batches whose folder name is not descriptive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingDefaults {
    pub year: i32,
    pub season: String,
}

impl Default for TrainingDefaults {
    fn default() -> Self {
        Self {
            year: chrono::Local::now().year(),
            season: DEFAULT_SEASON.to_string(),
        }
    }
}

/// Runtime settings, optionally loaded from a YAML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base directory for generated collection files.
    pub output_dir: PathBuf,
    pub default_training: TrainingDefaults,
    pub documents: DocumentNames,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            default_training: TrainingDefaults::default(),
            documents: DocumentNames::default(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file. Missing keys take their defaults.
    ///
    /// # Arguments
    /// * `path` - Path to the settings file
    ///
    /// # Returns
    /// * `Ok(Settings)` on success
    /// * `Err(ExtractorError::InvalidSettings)` if the YAML is malformed
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_yaml_ng::from_str(&content).map_err(|source| ExtractorError::InvalidSettings {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path` if given, else from the default file if it exists,
    /// else fall back to built-in defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_SETTINGS_FILE);
                if default_path.is_file() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Year and season of one training batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchInfo {
    pub year: i32,
    pub season: String,
}

/// Derive year and season from a batch folder name.
///
/// Folder names follow `YYYY-MM-<season>`; the year is the first
/// dash-separated segment and the season the last one. Anything that does
/// not fit falls back to `defaults`.
///
/// # Examples
/// ```
/// use tehui_extractor::config::{parse_batch_name, TrainingDefaults};
///
/// let defaults = TrainingDefaults { year: 2020, season: "秋季".to_string() };
/// let info = parse_batch_name("2025-06-感恩节", &defaults);
/// assert_eq!(info.year, 2025);
/// assert_eq!(info.season, "感恩节");
/// ```
#[must_use]
pub fn parse_batch_name(name: &str, defaults: &TrainingDefaults) -> BatchInfo {
    let parts: Vec<&str> = name.split('-').map(str::trim).collect();

    let year = parts
        .first()
        .filter(|p| p.len() == 4 && p.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|p| p.parse().ok())
        .unwrap_or(defaults.year);

    let season = match parts.as_slice() {
        [_, .., last] if !last.is_empty() && !last.bytes().all(|b| b.is_ascii_digit()) => {
            (*last).to_string()
        }
        _ => defaults.season.clone(),
    };

    BatchInfo { year, season }
}
