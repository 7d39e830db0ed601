//! Schedule segmenter: splits a morning-revival document into weeks and days.

use std::collections::{HashMap, HashSet};

use super::backfill::{assign_outlines, DayOutlines};
use super::feeding::split_feeding_verses;
use super::merge::push_merged;
use crate::classify::{looks_like_day_header, Classifier, Role, SectionKind};
use crate::config::SCHEDULE_MINISTRY_MIN_CHARS;
use crate::text::{char_len, is_valid_excerpt_line};
use crate::types::{DaySchedule, Paragraph, TrainingCollection};

/// Position of the segmenter in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Before the first week outline marker.
    SeekingStart,
    /// Inside a week outline, collecting per-day outline lines.
    OutlineCollection,
    Hymn,
    /// Proclamation content is skipped.
    Proclamation,
    /// A day was opened; waiting for its feeding or reading section.
    DayHeader,
    Feeding,
    Reading,
}

/// Everything buffered for the week being read.
#[derive(Debug, Default)]
struct WeekBuffer {
    week: u32,
    /// Index of the chapter this week belongs to.
    chapter: Option<usize>,
    outlines: DayOutlines,
    /// Days named by the most recent day marker.
    outline_days: Vec<u32>,
    outline_lines: Vec<String>,
    hymn: Vec<String>,
    ministry: Vec<String>,
    days: Vec<DaySchedule>,
}

impl WeekBuffer {
    fn new(week: u32, chapter: Option<usize>) -> Self {
        Self {
            week,
            chapter,
            ..Self::default()
        }
    }

    /// Store the pending outline lines under every day of the last marker.
    fn commit_outline(&mut self) {
        let lines = std::mem::take(&mut self.outline_lines);
        if lines.is_empty() {
            return;
        }
        if self.outline_days.is_empty() {
            tracing::debug!(week = self.week, lines = lines.len(), "Outline lines without day marker dropped");
            return;
        }
        for day in &self.outline_days {
            self.outlines.insert(*day, lines.clone());
        }
    }
}

/// Splits schedule documents into [`DaySchedule`]s and attaches them to
/// chapters.
///
/// Weeks map to chapters in order of first appearance, starting after the
/// chapters that already carry a schedule, so a second schedule document
/// continues where the first one stopped.
pub struct ScheduleSegmenter<'a> {
    classifier: &'a Classifier,
    state: State,
    week: Option<WeekBuffer>,
    current_day: Option<DaySchedule>,
    section: Vec<String>,
    seen: HashSet<(u32, u32)>,
    week_map: HashMap<u32, usize>,
    next_chapter: usize,
}

impl<'a> ScheduleSegmenter<'a> {
    pub fn new(classifier: &'a Classifier) -> Self {
        Self {
            classifier,
            state: State::SeekingStart,
            week: None,
            current_day: None,
            section: Vec::new(),
            seen: HashSet::new(),
            week_map: HashMap::new(),
            next_chapter: 0,
        }
    }

    /// Run the segmenter over one schedule document.
    ///
    /// # Returns
    /// Number of day schedules attached to chapters.
    pub fn run(mut self, paragraphs: &[Paragraph], collection: &mut TrainingCollection) -> usize {
        self.next_chapter = collection
            .chapters
            .iter()
            .rposition(|c| !c.schedule.is_empty())
            .map_or(0, |i| i + 1);
        let before: usize = collection.chapters.iter().map(|c| c.schedule.len()).sum();

        for paragraph in paragraphs {
            let text = paragraph.text.trim();
            let classification = self.classifier.classify(paragraph);
            self.step(classification.role, classification.from_style, text, collection);
        }
        self.flush_week(collection);

        let after: usize = collection.chapters.iter().map(|c| c.schedule.len()).sum();
        let added = after - before;
        tracing::info!(days = added, weeks = self.week_map.len(), "Schedule pass complete");
        added
    }

    fn step(&mut self, role: Role, from_style: bool, text: &str, collection: &mut TrainingCollection) {
        let styled_body = from_style && role == Role::Body;
        if self.state == State::SeekingStart
            && !matches!(role, Role::Section(SectionKind::WeekOutline { .. }))
        {
            return;
        }
        match role {
            Role::Unknown => {}
            Role::Section(SectionKind::PageRepeat) => {}
            Role::Section(SectionKind::WeekOutline { week }) => {
                if self.current_week() == Some(week) {
                    return;
                }
                self.flush_week(collection);
                self.begin_week(week, collection);
                self.transition(State::OutlineCollection);
            }
            Role::Section(SectionKind::WeekHymn { week }) => {
                self.ensure_week(week, collection);
                self.commit_outline();
                self.transition(State::Hymn);
            }
            Role::Section(SectionKind::Proclamation { week }) => {
                self.ensure_week(week, collection);
                self.commit_outline();
                self.transition(State::Proclamation);
            }
            Role::Section(SectionKind::DayHeader { week, day }) => {
                if !self.seen.insert((week, day)) {
                    tracing::debug!(week, day, "Repeated day header ignored");
                    return;
                }
                self.ensure_week(week, collection);
                self.commit_outline();
                self.close_day();
                self.current_day = Some(DaySchedule::new(text, week, day));
                self.transition(State::DayHeader);
            }
            Role::Section(SectionKind::DayMarker { days }) if self.state == State::OutlineCollection => {
                if let Some(buffer) = self.week.as_mut() {
                    buffer.commit_outline();
                    buffer.outline_days = days;
                }
            }
            Role::Section(SectionKind::HymnReference) if self.state == State::OutlineCollection => {
                if let Some(buffer) = self.week.as_mut() {
                    buffer.hymn.push(text.to_string());
                }
            }
            Role::Section(SectionKind::Feeding) => self.enter_section(State::Feeding),
            Role::Section(SectionKind::Reading) => self.enter_section(State::Reading),
            Role::Section(SectionKind::ReferenceReading) => self.enter_section(State::DayHeader),
            _ => self.content(text, styled_body),
        }
    }

    fn content(&mut self, text: &str, styled_body: bool) {
        match self.state {
            State::SeekingStart | State::Proclamation => {}
            State::Hymn => {
                if let Some(buffer) = self.week.as_mut() {
                    buffer.hymn.push(text.to_string());
                }
            }
            State::OutlineCollection | State::DayHeader => {
                let Some(buffer) = self.week.as_mut() else {
                    return;
                };
                if styled_body && char_len(text) > SCHEDULE_MINISTRY_MIN_CHARS {
                    buffer.ministry.push(text.to_string());
                } else if self.state == State::OutlineCollection {
                    buffer.outline_lines.push(text.to_string());
                }
            }
            State::Feeding | State::Reading => {
                if looks_like_day_header(text) {
                    tracing::debug!(line = %text, "Stray day header filtered");
                    return;
                }
                push_merged(&mut self.section, text);
            }
        }
    }

    fn transition(&mut self, next: State) {
        if self.state != next {
            tracing::debug!(from = ?self.state, to = ?next, "Schedule state");
            self.state = next;
        }
    }

    fn current_week(&self) -> Option<u32> {
        self.week.as_ref().map(|w| w.week)
    }

    fn begin_week(&mut self, week: u32, collection: &mut TrainingCollection) {
        let chapter = match self.week_map.get(&week).copied() {
            Some(index) => Some(index),
            None if self.next_chapter < collection.chapters.len() => {
                let index = self.next_chapter;
                self.next_chapter += 1;
                self.week_map.insert(week, index);
                Some(index)
            }
            None => {
                collection.warn(format!(
                    "schedule week {week} has no matching chapter ({} chapters)",
                    collection.chapters.len()
                ));
                None
            }
        };
        tracing::debug!(week, chapter = ?chapter, "Week started");
        self.week = Some(WeekBuffer::new(week, chapter));
    }

    /// Start a new week if a section names a week other than the current one.
    fn ensure_week(&mut self, week: u32, collection: &mut TrainingCollection) {
        if self.current_week() != Some(week) {
            self.flush_week(collection);
            self.begin_week(week, collection);
        }
    }

    fn commit_outline(&mut self) {
        if let Some(buffer) = self.week.as_mut() {
            buffer.commit_outline();
        }
    }

    /// Move the open section buffer into the current day.
    fn commit_section(&mut self) {
        let lines = std::mem::take(&mut self.section);
        if lines.is_empty() {
            return;
        }
        match (self.state, self.current_day.as_mut()) {
            (State::Feeding, Some(day)) => day.feeding_text.extend(lines),
            (State::Reading, Some(day)) => day.reading_text.extend(lines),
            _ => tracing::debug!(lines = lines.len(), "Section text without open day dropped"),
        }
    }

    fn enter_section(&mut self, next: State) {
        self.commit_section();
        self.transition(next);
    }

    fn close_day(&mut self) {
        self.commit_section();
        let Some(mut day) = self.current_day.take() else {
            return;
        };
        let (verses, prose) = split_feeding_verses(std::mem::take(&mut day.feeding_text));
        day.feeding_verses = verses;
        day.feeding_text = prose;
        match self.week.as_mut() {
            Some(buffer) => buffer.days.push(day),
            None => tracing::debug!(label = %day.label, "Day outside any week dropped"),
        }
    }

    /// Commit everything buffered for the current week to its chapter.
    fn flush_week(&mut self, collection: &mut TrainingCollection) {
        self.commit_outline();
        self.close_day();
        let Some(mut buffer) = self.week.take() else {
            return;
        };
        let Some(index) = buffer.chapter else {
            if !buffer.days.is_empty() {
                tracing::warn!(week = buffer.week, days = buffer.days.len(), "Days of unmapped week dropped");
            }
            return;
        };

        assign_outlines(&mut buffer.days, &buffer.outlines, self.classifier);

        let chapter = &mut collection.chapters[index];
        if !buffer.hymn.is_empty() {
            chapter.hymn_reference = buffer.hymn.join("\n");
        }
        let ministry: Vec<&str> = buffer
            .ministry
            .iter()
            .map(String::as_str)
            .filter(|line| is_valid_excerpt_line(line))
            .collect();
        if chapter.ministry_excerpt.is_empty() && !ministry.is_empty() {
            chapter.ministry_excerpt = ministry.join("\n\n");
        }
        tracing::debug!(
            week = buffer.week,
            chapter = chapter.number,
            days = buffer.days.len(),
            "Week flushed"
        );
        chapter.schedule.append(&mut buffer.days);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Chapter;
    use pretty_assertions::assert_eq;

    fn collection(chapters: u32) -> TrainingCollection {
        TrainingCollection {
            chapters: (1..=chapters).map(|n| Chapter::new(n, format!("篇{n}"))).collect(),
            ..TrainingCollection::default()
        }
    }

    fn run(collection: &mut TrainingCollection, lines: &[&str]) -> usize {
        let classifier = Classifier::default();
        let paragraphs: Vec<Paragraph> = lines.iter().map(|l| Paragraph::plain(*l)).collect();
        ScheduleSegmenter::new(&classifier).run(&paragraphs, collection)
    }

    #[test]
    fn test_single_week() {
        let mut collection = collection(1);
        let added = run(
            &mut collection,
            &[
                "封面",
                "第一周 • 纲目",
                "周一",
                "壹 第一要点",
                "第一周 • 诗歌",
                "我要赞美",
                "第一周 • 申言",
                "申言的内容不保留",
                "第一周 • 周一",
                "晨兴喂养",
                "弗三17　使基督借着信，安家在你们心里。",
                "基督安家在我们心里。",
                "信息选读",
                "今天的信息。",
            ],
        );

        assert_eq!(added, 1);
        let chapter = &collection.chapters[0];
        assert_eq!(chapter.hymn_reference, "我要赞美");
        let day = &chapter.schedule[0];
        assert_eq!(day.label, "第一周 • 周一");
        assert_eq!((day.week, day.day), (1, 1));
        assert_eq!(day.outline[0].title, "第一要点");
        assert_eq!(day.feeding_verses.len(), 1);
        assert_eq!(day.feeding_text, vec!["基督安家在我们心里。".to_string()]);
        assert_eq!(day.reading_text, vec!["今天的信息。".to_string()]);
    }

    #[test]
    fn test_repeated_day_header_is_ignored() {
        let mut collection = collection(1);
        run(
            &mut collection,
            &[
                "第一周 • 纲目",
                "第一周 • 周二",
                "信息选读",
                "第一段。",
                "第一周 • 周二",
                "第二段。",
            ],
        );

        let schedule = &collection.chapters[0].schedule;
        assert_eq!(schedule.len(), 1);
        assert_eq!(
            schedule[0].reading_text,
            vec!["第一段。".to_string(), "第二段。".to_string()]
        );
    }

    #[test]
    fn test_repeated_week_marker_keeps_buffers() {
        let mut collection = collection(1);
        run(
            &mut collection,
            &[
                "第一周 • 纲目",
                "周一",
                "壹 一的纲目",
                "第一周 • 纲目",
                "一 续上页",
                "第一周 • 周一",
            ],
        );

        let outline = &collection.chapters[0].schedule[0].outline;
        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].children[0].title, "续上页");
    }

    #[test]
    fn test_outline_backfill_for_leading_days() {
        let mut collection = collection(1);
        run(
            &mut collection,
            &[
                "第一周 • 纲目",
                "周三",
                "壹 周三纲目",
                "周五",
                "壹 周五纲目",
                "第一周 • 周一",
                "第一周 • 周二",
                "第一周 • 周三",
                "第一周 • 周四",
                "第一周 • 周五",
                "第一周 • 周六",
            ],
        );

        let titles: Vec<&str> = collection.chapters[0]
            .schedule
            .iter()
            .map(|d| d.outline[0].title.as_str())
            .collect();
        assert_eq!(
            titles,
            vec!["周三纲目", "周三纲目", "周三纲目", "周三纲目", "周五纲目", "周五纲目"]
        );
    }

    #[test]
    fn test_weeks_map_to_chapters_in_order() {
        let mut collection = collection(2);
        run(
            &mut collection,
            &[
                "第二十五周 • 纲目",
                "第二十五周 • 周一",
                "第二十六周 • 纲目",
                "第二十六周 • 周一",
                "第二十七周 • 纲目",
                "第二十七周 • 周一",
            ],
        );

        assert_eq!(collection.chapters[0].schedule[0].week, 25);
        assert_eq!(collection.chapters[1].schedule[0].week, 26);
        assert_eq!(collection.warnings.len(), 1);
    }

    #[test]
    fn test_second_document_continues_after_scheduled_chapters() {
        let mut collection = collection(2);
        run(&mut collection, &["第一周 • 纲目", "第一周 • 周一"]);
        run(&mut collection, &["第二周 • 纲目", "第二周 • 周一"]);

        assert_eq!(collection.chapters[0].schedule.len(), 1);
        assert_eq!(collection.chapters[1].schedule.len(), 1);
        assert_eq!(collection.chapters[1].schedule[0].week, 2);
    }

    #[test]
    fn test_styled_template() {
        let mut collection = collection(1);
        let classifier = Classifier::default();
        let ministry = "这是一段很长的职事信息，说明基督如何成为我们的生命和一切。";
        let paragraphs = vec![
            Paragraph::plain("第一周 • 纲目"),
            Paragraph::styled("周期", "周一、周二"),
            Paragraph::styled("１綱要大點壹", "壹 共同的纲目"),
            Paragraph::styled("信息正文18", ministry),
            Paragraph::styled("第一周右", "第一周"),
            Paragraph::plain("第一周 • 周二"),
            Paragraph::plain("信息选读"),
            Paragraph::plain("读到的信息。"),
            Paragraph::styled("参读光亮", "参读：生命的经历"),
            Paragraph::plain("不属于信息选读"),
        ];
        ScheduleSegmenter::new(&classifier).run(&paragraphs, &mut collection);

        let chapter = &collection.chapters[0];
        assert_eq!(chapter.ministry_excerpt, ministry);
        let day = &chapter.schedule[0];
        assert_eq!(day.day, 2);
        assert_eq!(day.outline[0].title, "共同的纲目");
        assert_eq!(day.reading_text, vec!["读到的信息。".to_string()]);
    }

    #[test]
    fn test_lines_before_first_week_outline_are_ignored() {
        let mut collection = collection(1);
        run(
            &mut collection,
            &[
                "目录",
                "第一周 • 周一 3",
                "第一周 • 诗歌 5",
                "第一周 • 纲目",
                "周一",
                "壹 纲目",
                "第一周 • 周一",
                "信息选读",
                "内容。",
            ],
        );

        let schedule = &collection.chapters[0].schedule;
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].label, "第一周 • 周一");
        assert_eq!(schedule[0].outline[0].title, "纲目");
        assert_eq!(schedule[0].reading_text, vec!["内容。".to_string()]);
        assert_eq!(collection.chapters[0].hymn_reference, "");
    }

    #[test]
    fn test_filler_ministry_is_filtered() {
        let mut collection = collection(1);
        let classifier = Classifier::default();
        let filler = "_".repeat(30);
        let paragraphs = vec![
            Paragraph::plain("第一周 • 纲目"),
            Paragraph::styled("信息正文18", filler.as_str()),
            Paragraph::plain("第一周 • 周一"),
        ];
        ScheduleSegmenter::new(&classifier).run(&paragraphs, &mut collection);

        assert_eq!(collection.chapters[0].ministry_excerpt, "");
        assert_eq!(collection.chapters[0].schedule.len(), 1);
    }

    #[test]
    fn test_hymn_inside_week_outline_goes_to_hymn() {
        let mut collection = collection(1);
        run(
            &mut collection,
            &["第一周 • 纲目", "周一", "壹 纲目", "EM 诗歌：s250", "第一周 • 周一"],
        );

        let chapter = &collection.chapters[0];
        assert_eq!(chapter.hymn_reference, "EM 诗歌：s250");
        assert!(chapter.schedule[0].outline[0].body.is_empty());
    }

    #[test]
    fn test_stray_day_header_in_feeding_is_filtered() {
        let mut collection = collection(1);
        run(
            &mut collection,
            &[
                "第一周 • 纲目",
                "第一周 • 周一",
                "晨兴喂养",
                "喂养正文。",
                "第一周 • 周一",
            ],
        );

        let day = &collection.chapters[0].schedule[0];
        assert_eq!(day.feeding_text, vec!["喂养正文。".to_string()]);
    }
}
