//! Text layout measurement
//!
//! Reproduces how a wrapping text surface (`white-space: pre-wrap` with
//! `overflow-wrap: break-word`) places characters, so that a caret offset can
//! be turned into a pixel position without a rendering engine.
//!
//! Rules:
//! - `\n` always starts a new line
//! - whitespace is preserved and may hang past the right edge
//! - a word that does not fit on a non-empty line moves to the next line
//! - a word wider than the whole line is broken between characters

use std::collections::HashMap;

use unicode_width::UnicodeWidthChar;

/// Placeholder measured when the caret sits at the very end of the text
pub const END_MARKER: char = '.';

/// Columns between tab stops
const TAB_SIZE: usize = 8;

/// Font metrics shared by the layouts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Advance of a single-width cell (monospace) or of a space (proportional)
    pub advance_width: f32,
    /// Distance between consecutive baselines
    pub line_height: f32,
}

/// Measurement abstraction for a text surface
pub trait TextLayout {
    /// Horizontal advance of `ch`
    fn advance(&self, ch: char) -> f32;

    /// Height of one visual line
    fn line_height(&self) -> f32;

    /// Distance between tab stops
    fn tab_width(&self) -> f32 {
        self.advance(' ') * TAB_SIZE as f32
    }
}

/// Monospace layout: every character occupies a whole number of cells
#[derive(Debug, Clone, Copy)]
pub struct MonospaceLayout {
    metrics: FontMetrics,
}

impl MonospaceLayout {
    pub fn new(metrics: FontMetrics) -> Self {
        Self { metrics }
    }
}

impl TextLayout for MonospaceLayout {
    fn advance(&self, ch: char) -> f32 {
        // Control characters have no width; wide CJK glyphs take two cells
        let cells = ch.width().unwrap_or(0);
        self.metrics.advance_width * cells as f32
    }

    fn line_height(&self) -> f32 {
        self.metrics.line_height
    }
}

/// Proportional layout driven by a per-character advance table
#[derive(Debug, Clone)]
pub struct ProportionalLayout {
    advances: HashMap<char, f32>,
    metrics: FontMetrics,
}

impl ProportionalLayout {
    /// Characters missing from `advances` use `metrics.advance_width`
    pub fn new(metrics: FontMetrics, advances: HashMap<char, f32>) -> Self {
        Self { advances, metrics }
    }
}

impl TextLayout for ProportionalLayout {
    fn advance(&self, ch: char) -> f32 {
        self.advances
            .get(&ch)
            .copied()
            .unwrap_or(self.metrics.advance_width)
    }

    fn line_height(&self) -> f32 {
        self.metrics.line_height
    }
}

/// Position of a character relative to the top-left of the text box
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

fn is_break_space(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}

/// Locate the top-left corner of the character at `offset` in `text`.
///
/// `wrap_width` is the content width of the box; `None` disables wrapping.
/// An offset equal to the text length measures [`END_MARKER`] appended to
/// the text, so the caret after a trailing word stays with that word.
pub fn locate(layout: &dyn TextLayout, text: &str, offset: usize, wrap_width: Option<f32>) -> Point {
    let mut chars: Vec<char> = text.chars().collect();
    assert!(
        offset <= chars.len(),
        "caret offset {} out of range (len {})",
        offset,
        chars.len()
    );
    if offset == chars.len() {
        chars.push(END_MARKER);
    }

    let max_width = wrap_width.unwrap_or(f32::INFINITY);
    let mut x = 0.0f32;
    let mut line = 0usize;
    let mut word_end = 0usize;
    let mut breaking_word = false;

    for (idx, &ch) in chars.iter().enumerate() {
        if ch == '\n' {
            if idx == offset {
                break;
            }
            line += 1;
            x = 0.0;
            continue;
        }

        if is_break_space(ch) {
            if idx == offset {
                break;
            }
            x = if ch == '\t' {
                let stop = layout.tab_width();
                if stop > 0.0 {
                    ((x / stop).floor() + 1.0) * stop
                } else {
                    x
                }
            } else {
                x + layout.advance(ch)
            };
            continue;
        }

        // First character of a word: decide where the whole word goes
        if idx >= word_end {
            word_end = chars[idx..]
                .iter()
                .position(|&c| c == '\n' || is_break_space(c))
                .map_or(chars.len(), |len| idx + len);
            let word_width: f32 = chars[idx..word_end].iter().map(|&c| layout.advance(c)).sum();
            if x > 0.0 && x + word_width > max_width {
                line += 1;
                x = 0.0;
            }
            breaking_word = word_width > max_width;
        }

        let advance = layout.advance(ch);
        if breaking_word && x > 0.0 && x + advance > max_width {
            line += 1;
            x = 0.0;
        }

        if idx == offset {
            break;
        }
        x += advance;
    }

    Point {
        x,
        y: line as f32 * layout.line_height(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mono() -> MonospaceLayout {
        MonospaceLayout::new(FontMetrics {
            advance_width: 8.0,
            line_height: 16.0,
        })
    }

    #[test]
    fn test_single_line() {
        let layout = mono();
        assert_eq!(locate(&layout, "hello", 0, None), Point { x: 0.0, y: 0.0 });
        assert_eq!(locate(&layout, "hello", 3, None), Point { x: 24.0, y: 0.0 });
        // End of text measures the marker right after the last glyph
        assert_eq!(locate(&layout, "hello", 5, None), Point { x: 40.0, y: 0.0 });
    }

    #[test]
    fn test_hard_newlines() {
        let layout = mono();
        let text = "ab\ncde\n";
        assert_eq!(locate(&layout, text, 2, None), Point { x: 16.0, y: 0.0 });
        assert_eq!(locate(&layout, text, 4, None), Point { x: 8.0, y: 16.0 });
        assert_eq!(locate(&layout, text, 7, None), Point { x: 0.0, y: 32.0 });
    }

    #[test]
    fn test_word_moves_to_next_line() {
        let layout = mono();
        // 10 cells wide: "hello " fits, "world" (5 cells) would end at 11
        let text = "hello world";
        let width = Some(80.0);
        assert_eq!(locate(&layout, text, 6, width), Point { x: 0.0, y: 16.0 });
        assert_eq!(locate(&layout, text, 8, width), Point { x: 16.0, y: 16.0 });
    }

    #[test]
    fn test_caret_at_end_stays_with_last_word() {
        let layout = mono();
        // "xx abcd" fills the line exactly; the marker joins "abcd" and wraps it
        let text = "xx abcd";
        let width = Some(56.0);
        assert_eq!(locate(&layout, text, 7, width), Point { x: 32.0, y: 16.0 });
    }

    #[test]
    fn test_trailing_spaces_hang() {
        let layout = mono();
        let text = format!("abc{}d", " ".repeat(6));
        // Spaces run past the 4-cell edge without wrapping; "d" then wraps
        let width = Some(32.0);
        assert_eq!(locate(&layout, &text, 5, width), Point { x: 40.0, y: 0.0 });
        assert_eq!(locate(&layout, &text, 9, width), Point { x: 0.0, y: 16.0 });
    }

    #[test]
    fn test_long_word_breaks_between_chars() {
        let layout = mono();
        let text = "abcdefghij";
        let width = Some(32.0);
        assert_eq!(locate(&layout, text, 3, width), Point { x: 24.0, y: 0.0 });
        assert_eq!(locate(&layout, text, 4, width), Point { x: 0.0, y: 16.0 });
        assert_eq!(locate(&layout, text, 9, width), Point { x: 8.0, y: 32.0 });
    }

    #[test]
    fn test_wide_chars_take_two_cells() {
        let layout = mono();
        assert_eq!(locate(&layout, "日本語", 2, None), Point { x: 32.0, y: 0.0 });
    }

    #[test]
    fn test_tab_stops() {
        let layout = mono();
        assert_eq!(locate(&layout, "ab\tc", 3, None), Point { x: 64.0, y: 0.0 });
    }

    #[test]
    fn test_proportional_advances() {
        let mut advances = HashMap::new();
        advances.insert('i', 3.0);
        advances.insert('m', 12.0);
        let layout = ProportionalLayout::new(
            FontMetrics {
                advance_width: 7.0,
                line_height: 20.0,
            },
            advances,
        );
        assert_eq!(locate(&layout, "mix", 2, None), Point { x: 15.0, y: 0.0 });
        assert_eq!(locate(&layout, "mix", 3, None), Point { x: 22.0, y: 0.0 });
        // "mim " is 34 wide, so "xm" no longer fits in 36
        assert_eq!(locate(&layout, "mim xm", 4, Some(36.0)), Point { x: 0.0, y: 20.0 });
    }
}
