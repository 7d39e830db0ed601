//! Tehui Extractor - Structural extraction of training lesson collections.
//!
//! This crate turns the documents of one training (an outline document, a
//! message transcript and up to two morning-revival schedules) into a
//! [`TrainingCollection`]: numbered chapters with outline and detail
//! heading trees, resolved scripture citations and a per-day schedule.
//!
//! # Example
//!
//! ```
//! use tehui_extractor::citation::CitationCache;
//! use tehui_extractor::classify::Classifier;
//! use tehui_extractor::tree::OutlinePass;
//! use tehui_extractor::types::{Paragraph, TrainingCollection};
//!
//! let lines = ["第一篇 测试篇", "壹\u{3000}第一要点", "这是正文。"];
//! let paragraphs: Vec<Paragraph> = lines.iter().map(|l| Paragraph::plain(*l)).collect();
//!
//! let classifier = Classifier::default();
//! let mut cache = CitationCache::new();
//! let mut collection = TrainingCollection::default();
//! OutlinePass::new(&classifier, &mut cache).run(&paragraphs, &mut collection);
//!
//! assert_eq!(collection.chapters[0].title, "测试篇");
//! assert_eq!(collection.chapters[0].outline_tree[0].body, vec!["这是正文。".to_string()]);
//! ```
//!
//! # Architecture
//!
//! - [`adapter`]: Documents to paragraph streams (DOCX, text, YAML)
//! - [`classify`]: Paragraph roles from style tags and text patterns
//! - [`citation`]: Verse cache and omitted-range resolution
//! - [`tree`]: Outline and detail passes
//! - [`schedule`]: Schedule segmenter, continuation merge, outline backfill
//! - [`sync`]: Copying outline citations into the other trees
//! - [`extractor`]: Running all passes for one collection or a batch
//! - [`output`]: YAML and JSON output
//! - [`config`], [`error`], [`numerals`], [`text`], [`types`]: Shared pieces
//! - [`cli`]: Command-line interface

pub mod adapter;
pub mod citation;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod numerals;
pub mod output;
pub mod schedule;
pub mod sync;
pub mod text;
pub mod tree;
pub mod types;

// Re-export main functions
pub use extractor::{extract_collection, extract_folder, process_batches, CollectionMeta, CollectionSources};

// Re-export commonly used items
pub use error::{ExtractorError, Result};
pub use types::{Chapter, ContentNode, DaySchedule, Paragraph, TrainingCollection};
