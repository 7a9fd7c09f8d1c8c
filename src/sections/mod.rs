//! Section builders. Each one renders a single block starting at the given
//! cursor and returns the cursor for the next block. A section with nothing
//! to show draws nothing and hands the cursor back unchanged.

pub mod assessment;
pub mod register;

use crate::fields::or_na;
use crate::layout::LayoutCursor;
use crate::sink::DocumentSink;
use crate::table::{Cell, Row, Table};
use crate::theme::StyleTheme;

const LABEL_WEIGHT: f32 = 55.0;
const VALUE_WEIGHT: f32 = 127.0;

pub(crate) fn has_text(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Table with a full-width title bar as its first head row.
pub(crate) fn titled_table(sink: &dyn DocumentSink, title: &str, weights: &[f32], theme: &StyleTheme) -> Table {
    let (page_width, _) = sink.page_size();
    let table = Table::proportional(page_width, weights, theme);
    let span = table.columns();
    table.with_head(Row::new(vec![Cell::heading(title, theme).spanning(span)]))
}

/// Two-column label/value table.
pub(crate) fn key_value_table(sink: &dyn DocumentSink, title: &str, theme: &StyleTheme) -> Table {
    titled_table(sink, title, &[LABEL_WEIGHT, VALUE_WEIGHT], theme)
}

pub(crate) fn key_value_row(label: &str, value: &str, theme: &StyleTheme) -> Row {
    Row::new(vec![Cell::label(label, theme), Cell::text(or_na(value))])
}

/// Label/value section over `rows`, skipped entirely when every value is blank.
pub(crate) fn key_value_section(
    sink: &mut dyn DocumentSink,
    title: &str,
    rows: &[(&str, String)],
    theme: &StyleTheme,
    cursor: LayoutCursor,
) -> LayoutCursor {
    if rows.iter().all(|(_, v)| !has_text(v)) {
        return cursor;
    }
    let mut table = key_value_table(sink, title, theme);
    for (label, value) in rows {
        table.push(key_value_row(label, value, theme));
    }
    finish(sink, &table, cursor)
}

pub(crate) fn finish(sink: &mut dyn DocumentSink, table: &Table, cursor: LayoutCursor) -> LayoutCursor {
    let final_y = sink.draw_table(table, cursor.y());
    LayoutCursor::below(final_y)
}

/// One `- item` line per entry.
pub(crate) fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .filter(|i| has_text(i))
        .map(|i| format!("- {}", i.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}
