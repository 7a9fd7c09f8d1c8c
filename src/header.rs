//! Letterhead, title and footer blocks shared by both document kinds.

use crate::embed::EmbeddedImage;
use crate::layout::{LayoutCursor, SIDE_MARGIN};
use crate::models::CompanySettings;
use crate::sink::{Align, DocumentSink, Rect, TextStyle};
use crate::table::{Cell, Row, Table};
use crate::theme::{Color, StyleTheme};

const LOGO_TOP: f32 = 10.0;
const LOGO_MAX_W: f32 = 40.0;
const LOGO_MAX_H: f32 = 20.0;
const TITLE_SIZE: f32 = 16.0;
const FOOTER_SIZE: f32 = 8.0;

/// Company settings plus the decoded logo, when there is one.
#[derive(Debug, Clone)]
pub struct Letterhead {
    pub settings: CompanySettings,
    pub logo: Option<EmbeddedImage>,
}

/// Logo, title and the two-column company/meta block. Returns the cursor for
/// the first section.
pub fn draw_header(
    sink: &mut dyn DocumentSink,
    letterhead: &Letterhead,
    title: &str,
    meta: &[String],
    theme: &StyleTheme,
) -> LayoutCursor {
    let (page_width, _) = sink.page_size();
    let mut y = LOGO_TOP;

    if let Some(logo) = &letterhead.logo {
        let (w, h) = logo.fit_within(LOGO_MAX_W, LOGO_MAX_H);
        sink.draw_image(logo, Rect { x: SIDE_MARGIN, y, w, h });
        y += h;
    }

    let title_baseline = y + 10.0;
    sink.draw_text(
        title,
        page_width / 2.0,
        title_baseline,
        TextStyle::bold(TITLE_SIZE).colored(theme.theme_color).aligned(Align::Center),
    );

    let half = (page_width - 2.0 * SIDE_MARGIN) / 2.0;
    let mut table = Table::new(vec![half, half], theme);
    table.push(Row::new(vec![
        Cell::text(letterhead.settings.info_lines().join("\n")),
        Cell::text(meta.join("\n")),
    ]));
    let final_y = sink.draw_table(&table, title_baseline + 6.0);
    LayoutCursor::below(final_y)
}

/// Stamps `Page i of n` and the company line on every page.
pub fn stamp_footers(sink: &mut dyn DocumentSink, settings: &CompanySettings, theme: &StyleTheme) {
    let (width, height) = sink.page_size();
    let total = sink.page_count();
    let footer = settings.footer_line();
    for page in 0..total {
        sink.set_page(page);
        sink.draw_line(
            (SIDE_MARGIN, height - 15.0),
            (width - SIDE_MARGIN, height - 15.0),
            theme.border_color,
            theme.border_width,
        );
        sink.draw_text(
            &footer,
            width / 2.0,
            height - 10.0,
            TextStyle::regular(FOOTER_SIZE).colored(Color::GREY).aligned(Align::Center),
        );
        sink.draw_text(
            &format!("Page {} of {}", page + 1, total),
            width - SIDE_MARGIN,
            height - 10.0,
            TextStyle::regular(FOOTER_SIZE).colored(Color::GREY).aligned(Align::Right),
        );
    }
}
