//! The narrow drawing surface section builders render into.
//!
//! Coordinates are millimetres from the top-left corner of the current page.

use crate::embed::EmbeddedImage;
use crate::error::ReportError;
use crate::table::{self, Table};
use crate::theme::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
    pub color: Color,
    /// How `x` anchors the text: left edge, centre or right edge.
    pub align: Align,
}

impl TextStyle {
    pub fn regular(size: f32) -> Self {
        Self { size, bold: false, color: Color::BLACK, align: Align::Left }
    }

    pub fn bold(size: f32) -> Self {
        Self { bold: true, ..Self::regular(size) }
    }

    pub fn colored(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn aligned(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

pub trait DocumentSink {
    /// (width, height) of every page in this document.
    fn page_size(&self) -> (f32, f32);
    fn page_count(&self) -> usize;
    fn current_page(&self) -> usize;
    /// Appends a page and makes it current.
    fn add_page(&mut self);
    fn set_page(&mut self, index: usize);

    /// `y` is the text baseline.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle);
    fn draw_rect(&mut self, rect: Rect, fill: Option<Color>, stroke: Option<(Color, f32)>);
    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), color: Color, thickness: f32);
    fn draw_image(&mut self, image: &EmbeddedImage, rect: Rect);

    /// Draws `table` from `start_y`, flowing onto new pages as needed, and
    /// returns the y directly below its last row.
    fn draw_table(&mut self, table: &Table, start_y: f32) -> f32 {
        table::render(self, table, start_y)
    }

    fn finalize(self) -> Result<Vec<u8>, ReportError>
    where
        Self: Sized;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Op {
        Text { page: usize, text: String, x: f32, y: f32, bold: bool },
        Rect { page: usize, rect: Rect },
        Line { page: usize },
        Image { page: usize, rect: Rect },
    }

    /// Keeps every draw call so tests can inspect what a builder emitted.
    pub struct RecordingSink {
        pub size: (f32, f32),
        pub pages: usize,
        pub current: usize,
        pub ops: Vec<Op>,
    }

    impl RecordingSink {
        pub fn portrait() -> Self {
            Self { size: (210.0, 297.0), pages: 1, current: 0, ops: Vec::new() }
        }

        pub fn landscape() -> Self {
            Self { size: (297.0, 210.0), ..Self::portrait() }
        }

        pub fn texts(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Text { text, .. } => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }

        pub fn contains_text(&self, needle: &str) -> bool {
            self.texts().iter().any(|t| *t == needle)
        }

        pub fn images(&self) -> usize {
            self.ops.iter().filter(|op| matches!(op, Op::Image { .. })).count()
        }

        pub fn is_empty(&self) -> bool {
            self.ops.is_empty()
        }
    }

    impl DocumentSink for RecordingSink {
        fn page_size(&self) -> (f32, f32) {
            self.size
        }

        fn page_count(&self) -> usize {
            self.pages
        }

        fn current_page(&self) -> usize {
            self.current
        }

        fn add_page(&mut self) {
            self.pages += 1;
            self.current = self.pages - 1;
        }

        fn set_page(&mut self, index: usize) {
            self.current = index;
        }

        fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
            self.ops.push(Op::Text { page: self.current, text: text.to_string(), x, y, bold: style.bold });
        }

        fn draw_rect(&mut self, rect: Rect, _fill: Option<Color>, _stroke: Option<(Color, f32)>) {
            self.ops.push(Op::Rect { page: self.current, rect });
        }

        fn draw_line(&mut self, _from: (f32, f32), _to: (f32, f32), _color: Color, _thickness: f32) {
            self.ops.push(Op::Line { page: self.current });
        }

        fn draw_image(&mut self, _image: &EmbeddedImage, rect: Rect) {
            self.ops.push(Op::Image { page: self.current, rect });
        }

        fn finalize(self) -> Result<Vec<u8>, ReportError> {
            Ok(format!("{} pages, {} ops", self.pages, self.ops.len()).into_bytes())
        }
    }
}
