//! Text Measurement
//!
//! Approximate metrics for a text view's payload: every display column
//! advances by a fixed fraction of the font size, lines wrap greedily at
//! word boundaries.

use blueprint_view::Var;
use taffy::{AvailableSpace, Size};
use unicode_width::UnicodeWidthStr;

/// Advance of one display column, as a fraction of the font size
const ADVANCE_RATIO: f32 = 0.6;

/// Text metrics of a text-measuring layout node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    /// Line height as a multiple of the font size
    pub line_height: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            line_height: 1.2,
        }
    }
}

impl TextStyle {
    /// Apply `fontSize` / `lineHeight`. Returns `false` for other names.
    pub fn apply_property(&mut self, name: &str, value: &Var) -> bool {
        let defaults = TextStyle::default();
        let slot = match name {
            "fontSize" => &mut self.font_size,
            "lineHeight" => &mut self.line_height,
            _ => return false,
        };

        match value {
            Var::Number(n) if *n > 0.0 => {
                *slot = *n as f32;
                true
            }
            Var::Undefined | Var::Empty => {
                *slot = if name == "fontSize" {
                    defaults.font_size
                } else {
                    defaults.line_height
                };
                true
            }
            _ => false,
        }
    }

    fn advance(&self) -> f32 {
        self.font_size * ADVANCE_RATIO
    }

    fn line_px(&self) -> f32 {
        self.font_size * self.line_height
    }
}

/// Display width of a string in pixels
pub fn string_width(text: &str, style: &TextStyle) -> f32 {
    text.lines()
        .map(|line| line.width() as f32 * style.advance())
        .fold(0.0, f32::max)
}

/// Greedy word wrap at `max_width` pixels.
///
/// Words wider than a line are kept whole on their own line.
pub fn wrap_lines(text: &str, max_width: f32, style: &TextStyle) -> Vec<String> {
    let advance = style.advance();
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_cols = 0usize;

        for word in paragraph.split_whitespace() {
            let word_cols = word.width();
            let needed = if line.is_empty() { word_cols } else { line_cols + 1 + word_cols };

            if !line.is_empty() && needed as f32 * advance > max_width {
                lines.push(std::mem::take(&mut line));
                line_cols = 0;
            }

            if !line.is_empty() {
                line.push(' ');
                line_cols += 1;
            }
            line.push_str(word);
            line_cols += word_cols;
        }

        lines.push(line);
    }

    lines
}

/// Measure callback body for taffy
pub fn measure_text(
    text: &str,
    style: &TextStyle,
    known_dimensions: Size<Option<f32>>,
    available_space: Size<AvailableSpace>,
) -> Size<f32> {
    if text.is_empty() {
        return Size {
            width: known_dimensions.width.unwrap_or(0.0),
            height: known_dimensions.height.unwrap_or(0.0),
        };
    }

    let max_width = match (known_dimensions.width, available_space.width) {
        (Some(w), _) => w,
        (None, AvailableSpace::Definite(w)) => w,
        (None, AvailableSpace::MinContent) => 0.0,
        (None, AvailableSpace::MaxContent) => f32::INFINITY,
    };

    let lines = wrap_lines(text, max_width, style);
    let widest = lines
        .iter()
        .map(|line| string_width(line, style))
        .fold(0.0, f32::max);

    Size {
        width: known_dimensions.width.unwrap_or(widest),
        height: known_dimensions
            .height
            .unwrap_or(lines.len() as f32 * style.line_px()),
    }
}
