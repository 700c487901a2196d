//! Best-effort conversion of property values into flat strings.

use crate::domain::property::{PropertyValue, RichTextRun, Rollup};

const LIST_SEPARATOR: &str = ", ";

/// Concatenated plain text of a title or rich-text value, trimmed.
/// Every other kind yields an empty string.
pub fn plain_text(value: &PropertyValue) -> String {
    match value {
        PropertyValue::RichText { rich_text: runs } | PropertyValue::Title { title: runs } => {
            concat_runs(runs)
        }
        _ => String::new(),
    }
}

/// Reads a descriptive value regardless of its kind.
pub fn flexible_text(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Select { select } => select
            .as_ref()
            .map(|opt| opt.name.clone())
            .unwrap_or_default(),
        PropertyValue::MultiSelect { multi_select } => {
            join_non_empty(multi_select.iter().map(|opt| opt.name.as_str()))
        }
        PropertyValue::People { people } => join_non_empty(people.iter().filter_map(|p| p.label())),
        PropertyValue::Rollup { rollup } => rollup_text(rollup),
        PropertyValue::Title { .. } | PropertyValue::RichText { .. } | PropertyValue::Unsupported => {
            plain_text(value)
        }
    }
}

fn rollup_text(rollup: &Rollup) -> String {
    match rollup {
        Rollup::Array { array } => {
            let items: Vec<String> = array.iter().map(flexible_text).collect();
            join_non_empty(items.iter().map(String::as_str))
        }
        Rollup::Number { number } => number.as_ref().map(ToString::to_string).unwrap_or_default(),
        Rollup::Date { date } => date.as_ref().map(|d| d.start.clone()).unwrap_or_default(),
        Rollup::Unsupported => String::new(),
    }
}

fn concat_runs(runs: &[RichTextRun]) -> String {
    let joined: String = runs.iter().map(|run| run.plain_text.as_str()).collect();
    joined.trim().to_string()
}

// Blank entries are dropped so a missing label never leaves a dangling separator.
fn join_non_empty<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}
