use printpdf::path::{PaintMode, WindingOrder};
use printpdf::*;
use std::io::BufWriter;

use crate::embed::EmbeddedImage;
use crate::error::ReportError;
use crate::sink::{Align, DocumentSink, Rect, TextStyle};
use crate::text::{text_width, PT_TO_MM};
use crate::theme::Color;

/// Images are placed at 72 dpi so one pixel is one point before scaling.
const IMAGE_DPI: f32 = 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// A4 in millimetres.
    pub fn page_size(self) -> (f32, f32) {
        match self {
            Orientation::Portrait => (210.0, 297.0),
            Orientation::Landscape => (297.0, 210.0),
        }
    }
}

/// [`DocumentSink`] backed by a printpdf document using the built-in Helvetica faces.
pub struct PdfSink {
    doc: PdfDocumentReference,
    pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
    current: usize,
    width: f32,
    height: f32,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl PdfSink {
    pub fn new(title: &str, orientation: Orientation) -> Result<Self, ReportError> {
        let (width, height) = orientation.page_size();
        let (doc, page, layer) = PdfDocument::new(title, Mm(width), Mm(height), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Render(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Render(e.to_string()))?;
        Ok(Self {
            doc,
            pages: vec![(page, layer)],
            current: 0,
            width,
            height,
            regular,
            bold,
        })
    }

    fn layer(&self) -> PdfLayerReference {
        let (page, layer) = self.pages[self.current];
        self.doc.get_page(page).get_layer(layer)
    }

    fn point(&self, x: f32, y: f32) -> (Point, bool) {
        (Point::new(Mm(x), Mm(self.height - y)), false)
    }
}

fn pdf_color(color: Color) -> printpdf::Color {
    printpdf::Color::Rgb(Rgb::new(
        color.r as f32 / 255.0,
        color.g as f32 / 255.0,
        color.b as f32 / 255.0,
        None,
    ))
}

/// Built-in fonts only cover WinAnsi, so map the usual typographic and
/// unit characters down to ASCII and replace anything else.
fn to_winansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2013}' | '\u{2014}' | '\u{2022}' => out.push('-'),
            '\u{00A0}' => out.push(' '),
            '\u{00B2}' => out.push('2'),
            '\u{00B3}' => out.push('3'),
            '\u{00B5}' | '\u{03BC}' => out.push('u'),
            '\u{00B0}' => out.push_str("deg"),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

impl DocumentSink for PdfSink {
    fn page_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn current_page(&self) -> usize {
        self.current
    }

    fn add_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(self.width), Mm(self.height), "Layer 1");
        self.pages.push((page, layer));
        self.current = self.pages.len() - 1;
    }

    fn set_page(&mut self, index: usize) {
        self.current = index.min(self.pages.len() - 1);
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        let text = to_winansi(text);
        let x = match style.align {
            Align::Left => x,
            Align::Center => x - text_width(&text, style.size, style.bold) / 2.0,
            Align::Right => x - text_width(&text, style.size, style.bold),
        };
        let layer = self.layer();
        let font = if style.bold { &self.bold } else { &self.regular };
        layer.set_fill_color(pdf_color(style.color));
        layer.use_text(text, style.size, Mm(x), Mm(self.height - y), font);
    }

    fn draw_rect(&mut self, rect: Rect, fill: Option<Color>, stroke: Option<(Color, f32)>) {
        let points = vec![
            self.point(rect.x, rect.y),
            self.point(rect.x + rect.w, rect.y),
            self.point(rect.x + rect.w, rect.y + rect.h),
            self.point(rect.x, rect.y + rect.h),
        ];
        let layer = self.layer();
        if let Some(color) = fill {
            layer.set_fill_color(pdf_color(color));
            layer.add_polygon(Polygon {
                rings: vec![points.clone()],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            });
        }
        if let Some((color, thickness)) = stroke {
            layer.set_outline_color(pdf_color(color));
            layer.set_outline_thickness(thickness / PT_TO_MM);
            layer.add_line(Line { points, is_closed: true });
        }
    }

    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), color: Color, thickness: f32) {
        let points = vec![self.point(from.0, from.1), self.point(to.0, to.1)];
        let layer = self.layer();
        layer.set_outline_color(pdf_color(color));
        layer.set_outline_thickness(thickness / PT_TO_MM);
        layer.add_line(Line { points, is_closed: false });
    }

    fn draw_image(&mut self, image: &EmbeddedImage, rect: Rect) {
        if image.width == 0 || image.height == 0 {
            return;
        }
        let natural_w = image.width as f32 * PT_TO_MM;
        let natural_h = image.height as f32 * PT_TO_MM;
        let xobject = Image::from(ImageXObject {
            width: Px(image.width as usize),
            height: Px(image.height as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: image.pixels.to_vec(),
            image_filter: None,
            clipping_bbox: None,
            smask: None,
        });
        xobject.add_to_layer(
            self.layer(),
            ImageTransform {
                translate_x: Some(Mm(rect.x)),
                translate_y: Some(Mm(self.height - rect.y - rect.h)),
                scale_x: Some(rect.w / natural_w),
                scale_y: Some(rect.h / natural_h),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );
    }

    fn finalize(self) -> Result<Vec<u8>, ReportError> {
        let mut buf: Vec<u8> = Vec::new();
        {
            let mut writer = BufWriter::new(&mut buf);
            self.doc
                .save(&mut writer)
                .map_err(|e| ReportError::Render(e.to_string()))?;
        }
        Ok(buf)
    }
}
