//! Default style tables for the two known authoring templates.

use super::core::StyleRegistry;
use super::types::StyleClass;
use crate::types::Level;

/// Create a registry holding both template vocabularies.
///
/// The first vocabulary uses numbered simplified-Chinese style names
/// (`131文章大点`), the second traditional-Chinese names (`職事信息大標`)
/// plus the styles of its schedule documents.
#[must_use]
pub fn create_style_registry() -> StyleRegistry {
    let mut registry = StyleRegistry::new();

    // Numbered template
    registry.register("121文章篇题", StyleClass::ChapterTitle);
    registry.register("131文章大点", StyleClass::Heading(Level::One));
    registry.register("132文章中点", StyleClass::Heading(Level::Two));
    registry.register("133文章小点", StyleClass::Heading(Level::Three));
    registry.register("134文章小a点", StyleClass::Heading(Level::Four));
    registry.register("8888文章正文", StyleClass::Body);

    // Traditional template
    registry.register("０ａ總題", StyleClass::ChapterTitle);
    registry.register("職事信息大標", StyleClass::Heading(Level::One));
    registry.register("職事信息中標", StyleClass::Heading(Level::Two));
    registry.register("职事小标题", StyleClass::Heading(Level::Three));
    registry.register_all(
        ["信息正文18", "信息正文17", "信息正文16", "信息正文3", "職事信息"],
        StyleClass::Body,
    );

    // Traditional template, schedule documents
    registry.register("１綱要大點壹", StyleClass::Heading(Level::One));
    registry.register("２綱要中點一", StyleClass::Heading(Level::Two));
    registry.register("３綱要小點１", StyleClass::Heading(Level::Three));
    registry.register("４綱要分點ａ", StyleClass::Heading(Level::Four));
    registry.register("周期", StyleClass::DayMarker);
    registry.register("参读光亮", StyleClass::ReferenceReading);
    registry.register("第一周右", StyleClass::PageRepeat);

    // Scripture
    registry.register_all(["verses", "０c 經節"], StyleClass::Citation);

    registry
}
