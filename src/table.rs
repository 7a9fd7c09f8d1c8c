//! Bordered tables: label/value blocks, icon grids and the register listing.
//!
//! A row that would cross the bottom margin moves to a new page and the head
//! rows are drawn again above it. A row taller than a whole page is split
//! between wrapped lines instead.

use crate::embed::EmbeddedImage;
use crate::layout::{BOTTOM_MARGIN, SIDE_MARGIN, TOP_MARGIN};
use crate::sink::{Align, DocumentSink, Rect, TextStyle};
use crate::text::{line_height, wrap_text, PT_TO_MM};
use crate::theme::{Color, StyleTheme};

pub const CELL_PADDING: f32 = 2.0;
pub const ICON_SIZE: f32 = 16.0;
const MIN_ROW_HEIGHT: f32 = 7.0;

#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    Text(String),
    Image { image: EmbeddedImage, caption: String },
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub content: CellContent,
    pub span: usize,
    pub bold: bool,
    pub fill: Option<Color>,
    pub text_color: Color,
    pub align: Align,
}

impl Cell {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: CellContent::Text(text.into()),
            span: 1,
            bold: false,
            fill: None,
            text_color: Color::BLACK,
            align: Align::Left,
        }
    }

    pub fn empty() -> Self {
        Self { content: CellContent::Empty, ..Self::text("") }
    }

    pub fn image(image: EmbeddedImage, caption: impl Into<String>) -> Self {
        Self {
            content: CellContent::Image { image, caption: caption.into() },
            align: Align::Center,
            ..Self::text("")
        }
    }

    /// Bold label on the theme's cell fill.
    pub fn label(text: impl Into<String>, theme: &StyleTheme) -> Self {
        Self { bold: true, fill: Some(theme.cell_fill), ..Self::text(text) }
    }

    /// White bold text on the theme's header fill.
    pub fn heading(text: impl Into<String>, theme: &StyleTheme) -> Self {
        Self {
            bold: true,
            fill: Some(theme.header_fill),
            text_color: Color::WHITE,
            ..Self::text(text)
        }
    }

    pub fn spanning(mut self, span: usize) -> Self {
        self.span = span.max(1);
        self
    }

    pub fn filled(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn colored(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }

    pub fn bolded(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Rows repeated at the top of every page the table spans.
    pub head: Vec<Row>,
    pub body: Vec<Row>,
    /// Column widths in millimetres.
    pub widths: Vec<f32>,
    pub x: f32,
    pub theme: StyleTheme,
}

impl Table {
    pub fn new(widths: Vec<f32>, theme: &StyleTheme) -> Self {
        Self { head: Vec::new(), body: Vec::new(), widths, x: SIDE_MARGIN, theme: *theme }
    }

    /// Widths spread over the page body, proportional to `weights`.
    pub fn proportional(page_width: f32, weights: &[f32], theme: &StyleTheme) -> Self {
        let available = page_width - 2.0 * SIDE_MARGIN;
        let total: f32 = weights.iter().sum();
        let widths = weights.iter().map(|w| available * w / total).collect();
        Self::new(widths, theme)
    }

    pub fn with_head(mut self, head: Row) -> Self {
        self.head.push(head);
        self
    }

    pub fn push(&mut self, row: Row) {
        self.body.push(row);
    }

    pub fn columns(&self) -> usize {
        self.widths.len()
    }

    fn cell_geometry(&self, row: &Row) -> Vec<(f32, f32)> {
        let mut x = self.x;
        let mut col = 0;
        let mut out = Vec::with_capacity(row.cells.len());
        for cell in &row.cells {
            let end = (col + cell.span).min(self.widths.len());
            let w: f32 = self.widths[col.min(end)..end].iter().sum();
            out.push((x, w));
            x += w;
            col = end;
        }
        out
    }

    pub fn row_height(&self, row: &Row) -> f32 {
        let size = self.theme.font_size;
        self.cell_geometry(row)
            .iter()
            .zip(&row.cells)
            .map(|(&(_, w), cell)| cell_height(cell, w, size))
            .fold(MIN_ROW_HEIGHT, f32::max)
    }

    /// Splits `row` so the first part fits in `available` millimetres. Text
    /// cells keep as many wrapped lines as fit and hand the rest to the second
    /// part; other cells stay in the first part. `None` when not even one
    /// line fits or nothing is left over.
    pub fn split_row(&self, row: &Row, available: f32) -> Option<(Row, Row)> {
        let size = self.theme.font_size;
        let fitting = ((available - 2.0 * CELL_PADDING) / line_height(size)).floor();
        if fitting < 1.0 {
            return None;
        }
        let fitting = fitting as usize;

        let mut head = Vec::with_capacity(row.cells.len());
        let mut tail = Vec::with_capacity(row.cells.len());
        let mut overflow = false;
        for (&(_, w), cell) in self.cell_geometry(row).iter().zip(&row.cells) {
            match &cell.content {
                CellContent::Text(text) => {
                    let inner = (w - 2.0 * CELL_PADDING).max(1.0);
                    let mut lines = wrap_text(text, inner, size, cell.bold);
                    let rest = lines.split_off(fitting.min(lines.len()));
                    overflow |= !rest.is_empty();
                    head.push(Cell { content: CellContent::Text(lines.join("\n")), ..cell.clone() });
                    tail.push(Cell { content: CellContent::Text(rest.join("\n")), ..cell.clone() });
                }
                _ => {
                    head.push(cell.clone());
                    tail.push(Cell { content: CellContent::Empty, ..cell.clone() });
                }
            }
        }
        let head = Row::new(head);
        if !overflow || self.row_height(&head) > available {
            return None;
        }
        Some((head, Row::new(tail)))
    }
}

fn cell_height(cell: &Cell, width: f32, size: f32) -> f32 {
    let inner = (width - 2.0 * CELL_PADDING).max(1.0);
    match &cell.content {
        CellContent::Text(text) => {
            wrap_text(text, inner, size, cell.bold).len() as f32 * line_height(size) + 2.0 * CELL_PADDING
        }
        CellContent::Image { caption, .. } => {
            let caption_lines = wrap_text(caption, inner, size, cell.bold).len() as f32;
            ICON_SIZE + caption_lines * line_height(size) + 3.0 * CELL_PADDING
        }
        CellContent::Empty => MIN_ROW_HEIGHT,
    }
}

pub fn render<S: DocumentSink + ?Sized>(sink: &mut S, table: &Table, start_y: f32) -> f32 {
    let (_, page_height) = sink.page_size();
    let bottom = page_height - BOTTOM_MARGIN;
    let head_heights: Vec<f32> = table.head.iter().map(|h| table.row_height(h)).collect();
    let head_height: f32 = head_heights.iter().sum();
    let page_body = bottom - TOP_MARGIN - head_height;
    let mut y = start_y;

    if !table.head.is_empty() {
        // keep the head with the first body row, or its first line when it will split anyway
        let first = table.body.first().map(|r| table.row_height(r)).unwrap_or(0.0);
        let first = if first > page_body { MIN_ROW_HEIGHT } else { first };
        if y + head_height + first > bottom && y > TOP_MARGIN {
            sink.add_page();
            y = TOP_MARGIN;
        }
        y = draw_head(sink, table, &head_heights, y);
    }

    for row in &table.body {
        let mut pending = row.clone();
        loop {
            let height = table.row_height(&pending);
            let at_page_top = y <= TOP_MARGIN + head_height;
            if y + height <= bottom {
                draw_row(sink, table, &pending, y, height);
                y += height;
                break;
            }
            if height <= page_body && !at_page_top {
                sink.add_page();
                y = draw_head(sink, table, &head_heights, TOP_MARGIN);
                continue;
            }
            match table.split_row(&pending, bottom - y) {
                Some((first, rest)) => {
                    let first_height = table.row_height(&first);
                    draw_row(sink, table, &first, y, first_height);
                    sink.add_page();
                    y = draw_head(sink, table, &head_heights, TOP_MARGIN);
                    pending = rest;
                }
                None if !at_page_top => {
                    sink.add_page();
                    y = draw_head(sink, table, &head_heights, TOP_MARGIN);
                }
                None => {
                    // cannot be split any further
                    draw_row(sink, table, &pending, y, height);
                    y += height;
                    break;
                }
            }
        }
    }
    y
}

fn draw_head<S: DocumentSink + ?Sized>(sink: &mut S, table: &Table, heights: &[f32], mut y: f32) -> f32 {
    for (row, &height) in table.head.iter().zip(heights) {
        draw_row(sink, table, row, y, height);
        y += height;
    }
    y
}

fn draw_row<S: DocumentSink + ?Sized>(sink: &mut S, table: &Table, row: &Row, y: f32, height: f32) {
    let size = table.theme.font_size;
    let border = (table.theme.border_color, table.theme.border_width);
    for (&(x, w), cell) in table.cell_geometry(row).iter().zip(&row.cells) {
        sink.draw_rect(Rect { x, y, w, h: height }, cell.fill, Some(border));
        let inner = (w - 2.0 * CELL_PADDING).max(1.0);
        let style = TextStyle {
            size,
            bold: cell.bold,
            color: cell.text_color,
            align: cell.align,
        };
        let anchor_x = match cell.align {
            Align::Left => x + CELL_PADDING,
            Align::Center => x + w / 2.0,
            Align::Right => x + w - CELL_PADDING,
        };
        // baseline of the first line sits roughly one cap height below the padding
        let first_baseline = |top: f32| top + CELL_PADDING + size * PT_TO_MM * 0.8;
        match &cell.content {
            CellContent::Text(text) => {
                for (i, line) in wrap_text(text, inner, size, cell.bold).iter().enumerate() {
                    if line.is_empty() {
                        continue;
                    }
                    sink.draw_text(line, anchor_x, first_baseline(y) + i as f32 * line_height(size), style);
                }
            }
            CellContent::Image { image, caption } => {
                let (iw, ih) = image.fit_within(ICON_SIZE, ICON_SIZE);
                let icon = Rect {
                    x: x + (w - iw) / 2.0,
                    y: y + CELL_PADDING + (ICON_SIZE - ih) / 2.0,
                    w: iw,
                    h: ih,
                };
                sink.draw_image(image, icon);
                let caption_top = y + CELL_PADDING + ICON_SIZE;
                for (i, line) in wrap_text(caption, inner, size, cell.bold).iter().enumerate() {
                    sink.draw_text(line, anchor_x, first_baseline(caption_top) + i as f32 * line_height(size), style);
                }
            }
            CellContent::Empty => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::testing::{Op, RecordingSink};
    use std::sync::Arc;

    fn two_column(theme: &StyleTheme) -> Table {
        Table::new(vec![50.0, 130.0], theme)
    }

    #[test]
    fn returns_y_below_last_row() {
        let theme = StyleTheme::default();
        let mut table = two_column(&theme);
        table.push(Row::new(vec![Cell::label("Name", &theme), Cell::text("Cement")]));
        table.push(Row::new(vec![Cell::label("Supplier", &theme), Cell::text("Acme")]));
        let expected = 40.0 + table.row_height(&table.body[0]) + table.row_height(&table.body[1]);

        let mut sink = RecordingSink::portrait();
        let end = sink.draw_table(&table, 40.0);
        assert!((end - expected).abs() < 0.001);
        assert!(sink.contains_text("Cement"));
        assert_eq!(sink.page_count(), 1);
    }

    #[test]
    fn long_values_grow_the_row() {
        let theme = StyleTheme::default();
        let table = two_column(&theme);
        let short = Row::new(vec![Cell::text("a"), Cell::text("b")]);
        let long = Row::new(vec![Cell::text("a"), Cell::text("word ".repeat(80))]);
        assert!(table.row_height(&long) > 2.5 * table.row_height(&short));
    }

    #[test]
    fn spanning_cell_takes_full_width() {
        let theme = StyleTheme::default();
        let table = two_column(&theme);
        let row = Row::new(vec![Cell::heading("Substance Details", &theme).spanning(2)]);
        assert_eq!(table.cell_geometry(&row), vec![(SIDE_MARGIN, 180.0)]);
    }

    #[test]
    fn overflowing_rows_move_to_next_page_and_repeat_head() {
        let theme = StyleTheme::default();
        let mut table = two_column(&theme)
            .with_head(Row::new(vec![Cell::heading("Col A", &theme), Cell::heading("Col B", &theme)]));
        for i in 0..60 {
            table.push(Row::new(vec![Cell::text(format!("row {i}")), Cell::text("value")]));
        }
        let mut sink = RecordingSink::portrait();
        let end = sink.draw_table(&table, 200.0);
        assert!(sink.page_count() > 1);
        assert!(end <= 297.0 - BOTTOM_MARGIN);
        let heads_on_later_pages = sink
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Text { page, text, .. } if *page > 0 && text == "Col A"))
            .count();
        assert_eq!(heads_on_later_pages, sink.page_count() - 1);
    }

    #[test]
    fn row_taller_than_a_page_splits_between_lines() {
        let theme = StyleTheme::default();
        let value: Vec<String> = (0..120)
            .map(|i| format!("Step {i}: ensure local exhaust ventilation is running before decanting."))
            .collect();
        let mut table = two_column(&theme)
            .with_head(Row::new(vec![Cell::heading("Control Measures", &theme).spanning(2)]));
        table.push(Row::new(vec![Cell::label("Control Measures", &theme), Cell::text(value.join(" "))]));
        table.push(Row::new(vec![Cell::label("Storage", &theme), Cell::text("Keep dry")]));

        let mut sink = RecordingSink::portrait();
        let end = sink.draw_table(&table, 40.0);
        let limit = 297.0 - BOTTOM_MARGIN;

        assert!(sink.page_count() >= 2);
        assert!(end <= limit, "end_y={end}");
        for op in &sink.ops {
            match op {
                Op::Text { y, text, .. } => assert!(*y <= limit, "{text:?} drawn at y={y}"),
                Op::Rect { rect, .. } => assert!(rect.y + rect.h <= limit + 0.001, "{rect:?}"),
                _ => {}
            }
        }
        let texts = sink.texts();
        assert!(texts.iter().any(|t| t.contains("Step 0:")));
        assert!(texts.iter().any(|t| t.contains("Step 119:")));
        assert!(sink.contains_text("Keep dry"));
        // value lines are drawn exactly once
        let inner = table.widths[1] - 2.0 * CELL_PADDING;
        let expected = wrap_text(&value.join(" "), inner, theme.font_size, false).len();
        let drawn = texts
            .iter()
            .filter(|t| !["Control Measures", "Storage", "Keep dry"].contains(*t))
            .count();
        assert_eq!(drawn, expected);
    }

    #[test]
    fn split_keeps_other_cells_in_first_part() {
        let theme = StyleTheme::default();
        let table = two_column(&theme);
        let row = Row::new(vec![Cell::label("First Aid", &theme), Cell::text("Rinse eyes. ".repeat(200))]);
        let (first, rest) = table.split_row(&row, 50.0).unwrap();
        assert!(table.row_height(&first) <= 50.0);
        assert_eq!(first.cells[0].content, CellContent::Text("First Aid".into()));
        assert_eq!(rest.cells[0].content, CellContent::Text(String::new()));
        assert_eq!(rest.cells[0].fill, Some(theme.cell_fill));
        assert!(table.split_row(&row, 3.0).is_none());
        let short = Row::new(vec![Cell::text("a"), Cell::text("b")]);
        assert!(table.split_row(&short, 50.0).is_none());
    }

    #[test]
    fn image_cells_draw_icon_and_caption() {
        let theme = StyleTheme::default();
        let mut table = Table::new(vec![45.0; 4], &theme);
        let image = EmbeddedImage { width: 10, height: 10, pixels: Arc::from(vec![0u8; 300]) };
        table.push(Row::new(vec![
            Cell::image(image, "Hard Hat"),
            Cell::text("Safety Gloves").centered(),
            Cell::empty(),
            Cell::empty(),
        ]));
        let mut sink = RecordingSink::portrait();
        sink.draw_table(&table, 30.0);
        assert_eq!(sink.images(), 1);
        assert!(sink.contains_text("Hard Hat"));
        assert!(sink.contains_text("Safety Gloves"));
        let rects = sink.ops.iter().filter(|op| matches!(op, Op::Rect { .. })).count();
        assert_eq!(rects, 4);
    }
}
