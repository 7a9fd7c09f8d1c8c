//! Helvetica text measurement and line wrapping.
//!
//! Widths are the standard Adobe metrics in 1/1000 em. Anything outside
//! printable ASCII is measured as an average glyph.

pub const PT_TO_MM: f32 = 0.352_777_78;
const LINE_SPACING: f32 = 1.15;
const DEFAULT_WIDTH: u16 = 556;

const LOWER: [u16; 26] = [
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a-m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n-z
];

const UPPER: [u16; 26] = [
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
];

const BOLD_LOWER: [u16; 26] = [
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // a-m
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // n-z
];

const BOLD_UPPER: [u16; 26] = [
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
];

fn char_width(c: char) -> u16 {
    match c {
        'a'..='z' => LOWER[(c as u8 - b'a') as usize],
        'A'..='Z' => UPPER[(c as u8 - b'A') as usize],
        '0'..='9' => 556,
        ' ' | '.' | ',' | ':' | ';' | '!' | '/' | '\\' | '[' | ']' => 278,
        '-' | '(' | ')' | '`' => 333,
        '\'' | '|' => 191,
        '"' => 355,
        '&' => 667,
        '%' => 889,
        '+' | '=' | '<' | '>' => 584,
        '@' => 1015,
        '*' => 389,
        _ => DEFAULT_WIDTH,
    }
}

fn bold_char_width(c: char) -> u16 {
    match c {
        'a'..='z' => BOLD_LOWER[(c as u8 - b'a') as usize],
        'A'..='Z' => BOLD_UPPER[(c as u8 - b'A') as usize],
        ':' | ';' | '!' | '[' | ']' => 333,
        '\'' => 238,
        '|' => 280,
        '"' => 474,
        '&' => 722,
        '@' => 975,
        _ => char_width(c),
    }
}

/// Width of `text` in millimetres at `size` points.
pub fn text_width(text: &str, size: f32, bold: bool) -> f32 {
    let width = if bold { bold_char_width } else { char_width };
    let units: u32 = text.chars().map(|c| width(c) as u32).sum();
    units as f32 / 1000.0 * size * PT_TO_MM
}

/// Distance between baselines in millimetres.
pub fn line_height(size: f32) -> f32 {
    size * PT_TO_MM * LINE_SPACING
}

/// Greedy word wrap. Explicit newlines are kept; words longer than the
/// available width are split by character.
pub fn wrap_text(text: &str, max_width: f32, size: f32, bold: bool) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if text_width(&candidate, size, bold) <= max_width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if text_width(word, size, bold) <= max_width {
                current = word.to_string();
            } else {
                for c in word.chars() {
                    current.push(c);
                    if text_width(&current, size, bold) > max_width && current.chars().count() > 1 {
                        let overflow = current.pop();
                        lines.push(std::mem::take(&mut current));
                        current.extend(overflow);
                    }
                }
            }
        }
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
