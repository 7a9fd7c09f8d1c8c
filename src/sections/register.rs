use std::collections::HashMap;

use crate::fields::{format_date, join_or_na, or_na};
use crate::layout::LayoutCursor;
use crate::models::SubstanceRegisterRecord;
use crate::sink::DocumentSink;
use crate::table::{Cell, Row, Table};
use crate::theme::StyleTheme;

use super::{finish, has_text, titled_table};

pub const REGISTER_COLUMNS: [(&str, f32); 9] = [
    ("Substance", 38.0),
    ("Manufacturer", 32.0),
    ("Category", 30.0),
    ("Storage Location", 32.0),
    ("Safety Data Sheet", 34.0),
    ("Date Added", 24.0),
    ("Date Reviewed", 24.0),
    ("Next Review", 24.0),
    ("Auditor", 31.0),
];

const BREAKDOWN_WIDTHS: (f32, f32) = (80.0, 30.0);

pub fn register_row(record: &SubstanceRegisterRecord) -> Row {
    Row::new(vec![
        Cell::text(or_na(&record.substance_name)),
        Cell::text(or_na(&record.manufacturer)),
        Cell::text(join_or_na(&record.category)),
        Cell::text(or_na(&record.storage_location)),
        Cell::text(or_na(&record.safety_data_sheet_location)),
        Cell::text(format_date(&record.date_added)),
        Cell::text(format_date(&record.date_reviewed)),
        Cell::text(format_date(&record.next_review_date)),
        Cell::text(or_na(&record.auditor_name)),
    ])
}

/// One row per substance. The column headings print even when the register is empty.
pub fn substances_table(
    sink: &mut dyn DocumentSink,
    records: &[SubstanceRegisterRecord],
    theme: &StyleTheme,
    cursor: LayoutCursor,
) -> LayoutCursor {
    let weights: Vec<f32> = REGISTER_COLUMNS.iter().map(|(_, w)| *w).collect();
    let head = Row::new(REGISTER_COLUMNS.iter().map(|(name, _)| Cell::label(*name, theme)).collect());
    let mut table = titled_table(sink, "Substances", &weights, theme).with_head(head);
    for record in records {
        table.push(register_row(record));
    }
    finish(sink, &table, cursor)
}

/// Substances per category, most common first, ties by name.
pub fn category_counts(records: &[SubstanceRegisterRecord]) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in records {
        for category in record.category.iter().filter(|c| has_text(c)) {
            *counts.entry(category.trim().to_string()).or_default() += 1;
        }
    }
    let mut counts: Vec<(String, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

pub fn category_breakdown(
    sink: &mut dyn DocumentSink,
    records: &[SubstanceRegisterRecord],
    theme: &StyleTheme,
    cursor: LayoutCursor,
) -> LayoutCursor {
    let counts = category_counts(records);
    if counts.is_empty() {
        return cursor;
    }
    let mut table = Table::new(vec![BREAKDOWN_WIDTHS.0, BREAKDOWN_WIDTHS.1], theme)
        .with_head(Row::new(vec![Cell::heading("Category Breakdown", theme).spanning(2)]))
        .with_head(Row::new(vec![
            Cell::label("Category", theme),
            Cell::label("Count", theme).centered(),
        ]));
    for (category, count) in counts {
        table.push(Row::new(vec![Cell::text(category), Cell::text(count.to_string()).centered()]));
    }
    finish(sink, &table, cursor)
}

pub fn meta_lines(records: &[SubstanceRegisterRecord], generated_on: &str) -> Vec<String> {
    vec![
        format!("Total Substances: {}", records.len()),
        format!("Generated: {}", format_date(generated_on)),
    ]
}
