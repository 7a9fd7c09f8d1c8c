/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GREY: Color = Color::rgb(110, 110, 110);
}

/// Colors and borders shared by every section of one document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleTheme {
    pub theme_color: Color,
    pub header_fill: Color,
    pub cell_fill: Color,
    pub border_color: Color,
    pub border_width: f32,
    pub font_size: f32,
}

impl StyleTheme {
    pub const DEFAULT: StyleTheme = StyleTheme {
        theme_color: Color::rgb(37, 99, 235),
        header_fill: Color::rgb(37, 99, 235),
        cell_fill: Color::rgb(239, 246, 255),
        border_color: Color::rgb(191, 201, 217),
        border_width: 0.2,
        font_size: 9.0,
    };

    /// Badge fill for a hazard level tag.
    pub fn hazard_level_color(&self, level: &str) -> Color {
        match level.trim().to_ascii_lowercase().as_str() {
            "low" => Color::rgb(22, 163, 74),
            "medium" => Color::rgb(217, 119, 6),
            "high" => Color::rgb(220, 38, 38),
            _ => self.theme_color,
        }
    }
}

impl Default for StyleTheme {
    fn default() -> Self {
        StyleTheme::DEFAULT
    }
}
