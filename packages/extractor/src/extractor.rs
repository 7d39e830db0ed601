//! Extraction service that ties all passes together.

use std::fs;
use std::path::{Path, PathBuf};

use crate::adapter::{find_document, load_paragraphs};
use crate::citation::CitationCache;
use crate::classify::Classifier;
use crate::config::{parse_batch_name, DocumentNames, Settings};
use crate::error::{ExtractorError, Result};
use crate::schedule::ScheduleSegmenter;
use crate::sync::synchronize_scripture;
use crate::tree::{extract_heading, DetailPass, OutlinePass};
use crate::types::TrainingCollection;

/// Source documents of one lesson collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSources {
    pub outline: PathBuf,
    pub detail: PathBuf,
    /// Zero to two schedule documents, in processing order.
    pub schedules: Vec<PathBuf>,
}

impl CollectionSources {
    /// Find the documents of a collection folder.
    ///
    /// The outline and detail documents are required; schedule documents
    /// that are absent are skipped.
    pub fn discover(folder: &Path, names: &DocumentNames) -> Result<Self> {
        let outline = find_document(folder, &names.outline)?;
        let detail = find_document(folder, &names.detail)?;

        let mut schedules = Vec::new();
        for stem in &names.schedules {
            match find_document(folder, stem) {
                Ok(path) => schedules.push(path),
                Err(ExtractorError::MissingDocument { .. }) => {
                    tracing::debug!(folder = %folder.display(), stem = %stem, "No schedule document");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(Self {
            outline,
            detail,
            schedules,
        })
    }
}

/// Metadata that does not come from the documents themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionMeta {
    pub year: i32,
    pub season: String,
}

/// Extract one lesson collection.
///
/// Runs the outline, detail and schedule passes in that order, then copies
/// outline citations into the detail and day trees. All parser state lives
/// in this call.
///
/// # Errors
/// Any adapter failure, or `NoChapters` if the outline document yields no
/// chapter.
pub fn extract_collection(sources: &CollectionSources, meta: &CollectionMeta) -> Result<TrainingCollection> {
    let classifier = Classifier::default();
    let mut cache = CitationCache::new();

    let outline = load_paragraphs(&sources.outline)?;
    let heading = extract_heading(&outline, &sources.outline);
    let mut collection = TrainingCollection {
        title: heading.title,
        subtitle: heading.subtitle,
        year: meta.year,
        season: meta.season.clone(),
        ..TrainingCollection::default()
    };

    let chapters = OutlinePass::new(&classifier, &mut cache).run(&outline, &mut collection);
    if chapters == 0 {
        return Err(ExtractorError::NoChapters {
            path: sources.outline.clone(),
        });
    }

    let detail = load_paragraphs(&sources.detail)?;
    DetailPass::new(&classifier, &mut cache).run(&detail, &mut collection);

    for path in &sources.schedules {
        let paragraphs = load_paragraphs(path)?;
        let days = ScheduleSegmenter::new(&classifier).run(&paragraphs, &mut collection);
        tracing::info!(path = %path.display(), days, "Schedule document processed");
    }

    let filled: usize = collection.chapters.iter_mut().map(synchronize_scripture).sum();
    tracing::info!(
        chapters = collection.chapters.len(),
        citations_filled = filled,
        warnings = collection.warnings.len(),
        "Collection extracted"
    );

    Ok(collection)
}

/// Extract the collection stored in `folder`, naming it after the folder.
pub fn extract_folder(folder: &Path, settings: &Settings) -> Result<TrainingCollection> {
    let name = folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let info = parse_batch_name(&name, &settings.default_training);
    let sources = CollectionSources::discover(folder, &settings.documents)?;

    extract_collection(
        &sources,
        &CollectionMeta {
            year: info.year,
            season: info.season,
        },
    )
}

/// Result of one batch folder.
#[derive(Debug)]
pub struct BatchOutcome {
    pub name: String,
    pub folder: PathBuf,
    pub result: Result<TrainingCollection>,
}

/// Batch folders of a resource directory: non-hidden subdirectories, sorted.
pub fn batch_folders(resource_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut folders: Vec<PathBuf> = fs::read_dir(resource_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .filter(|path| {
            path.file_name()
                .is_some_and(|n| !n.to_string_lossy().starts_with('.'))
        })
        .collect();
    folders.sort();
    Ok(folders)
}

/// Extract every batch folder under `resource_dir`.
///
/// A failing batch is logged and reported in its outcome; the remaining
/// batches are still processed.
pub fn process_batches(resource_dir: &Path, settings: &Settings) -> Result<Vec<BatchOutcome>> {
    let outcomes = batch_folders(resource_dir)?
        .into_iter()
        .map(|folder| {
            let name = folder
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let result = extract_folder(&folder, settings);
            if let Err(e) = &result {
                tracing::error!(batch = %name, error = %e, "Batch failed");
            }
            BatchOutcome {
                name,
                folder,
                result,
            }
        })
        .collect();
    Ok(outcomes)
}
