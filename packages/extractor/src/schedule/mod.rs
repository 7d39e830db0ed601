//! Morning-revival schedule documents.
//!
//! A schedule document is read week by week: the week outline (per-day
//! outline lines), the week hymn, a proclamation block that is skipped, and
//! then one block per day with a feeding and a reading section. Each day
//! becomes a [`DaySchedule`](crate::types::DaySchedule) on the chapter the
//! week belongs to.

mod backfill;
mod feeding;
mod merge;
mod segmenter;

pub use backfill::{assign_outlines, backfill, parse_outline_lines, DayOutlines};
pub use feeding::split_feeding_verses;
pub use merge::{push_merged, should_merge};
pub use segmenter::ScheduleSegmenter;
