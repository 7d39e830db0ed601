//! Tree builders for the outline and detail documents.
//!
//! Both passes share the [`LevelCursor`]: a heading of level N becomes a
//! child of the active level N-1 heading, or a top-level node when there is
//! none, and clears every deeper level. Body text goes to the deepest
//! active heading, citations are expanded through the shared
//! [`CitationCache`](crate::citation::CitationCache).

mod cursor;
mod detail;
mod heading;
mod outline;

pub use cursor::{LevelCursor, Placement};
pub use detail::DetailPass;
pub use heading::{extract_heading, TrainingHeading, GENERIC_TITLE};
pub use outline::OutlinePass;
