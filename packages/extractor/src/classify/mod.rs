//! Marker classifier for styled paragraphs.
//!
//! Each paragraph is assigned exactly one [`Role`]. A style-tag table is
//! consulted first (two authoring-template vocabularies are registered by
//! default); paragraphs with no known style fall through an ordered list of
//! text-pattern rules, the first match winning. Anything left is body text.

mod config;
mod core;
mod engine;
mod rules;
mod types;

pub use config::create_style_registry;
pub use core::StyleRegistry;
pub use engine::Classifier;
pub use rules::{looks_like_day_header, parse_heading, text_rules, TextRule};
pub use types::{Classification, Role, SectionKind, StyleClass};
