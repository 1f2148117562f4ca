//! Display-width helpers for laying out labels and choices in cells.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Terminal cell width of `text`, saturating at `u16::MAX`.
pub fn display_width(text: &str) -> u16 {
    UnicodeWidthStr::width(text).min(u16::MAX as usize) as u16
}

/// Returns the longest prefix of `text` that fits within `max_width` cells.
pub fn truncate_to_width(text: &str, max_width: u16) -> &str {
    let mut used = 0usize;
    for (index, character) in text.char_indices() {
        let width = character.width().unwrap_or(0);
        if used + width > max_width as usize {
            return &text[..index];
        }
        used += width;
    }
    text
}
