//! Text and password editors.
//!
//! The editing primitives follow the palette's UTF-8 safe input buffer: the
//! cursor is a byte index that always sits on a character boundary. On top of
//! that the editor enforces the declared maximum length and, for multiline
//! fields, normalises line breaks whenever text is imposed programmatically.

use dynform_types::{FieldDescriptor, FieldPayload, FieldKind, FormSettings, Size};

use crate::{
    editor::EditorState,
    error::{FormError, ValidationReason},
    kinds::{declared_length, mismatch, required_failure, scaled},
    registry::FieldBehavior,
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextEditor {
    input: String,
    /// Cursor byte index into `input`.
    cursor: usize,
    max_chars: Option<usize>,
    multiline: bool,
    masked: bool,
}

impl TextEditor {
    pub fn new(max_chars: Option<usize>, multiline: bool, masked: bool) -> Self {
        Self {
            input: String::new(),
            cursor: 0,
            max_chars,
            multiline,
            masked,
        }
    }

    pub fn text(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    pub fn is_masked(&self) -> bool {
        self.masked
    }

    pub fn is_blank(&self) -> bool {
        self.input.trim().is_empty()
    }

    /// Text as it should be displayed (masked for passwords).
    pub fn display_text(&self) -> String {
        if self.masked {
            "*".repeat(self.input.chars().count())
        } else {
            self.input.clone()
        }
    }

    /// Replaces the whole buffer and moves the cursor to the end.
    ///
    /// Multiline input is split into lines and rejoined with `\n` exactly
    /// once, so CRLF input and trailing line breaks never accumulate blank
    /// lines across repeated refills.
    pub fn set_text(&mut self, text: &str) {
        let normalized = if self.multiline {
            text.lines().collect::<Vec<_>>().join("\n")
        } else {
            text.to_string()
        };
        self.input = match self.max_chars {
            Some(limit) => normalized.chars().take(limit).collect(),
            None => normalized,
        };
        self.cursor = self.input.len();
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        let mut cursor = cursor.min(self.input.len());
        while !self.input.is_char_boundary(cursor) {
            cursor -= 1;
        }
        self.cursor = cursor;
    }

    fn has_room(&self) -> bool {
        self.max_chars.is_none_or(|limit| self.input.chars().count() < limit)
    }

    /// Move cursor one Unicode scalar to the left.
    pub fn move_left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev_len = self.input[..self.cursor].chars().last().map(|c| c.len_utf8()).unwrap_or(1);
        self.cursor = self.cursor.saturating_sub(prev_len);
    }

    /// Move cursor one Unicode scalar to the right.
    pub fn move_right(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    /// Insert a char at the cursor. Returns false when the field is full or
    /// the character is a line break in a single-line field.
    pub fn insert_char(&mut self, c: char) -> bool {
        if (c == '\n' || c == '\r') && !self.multiline {
            return false;
        }
        if !self.has_room() {
            return false;
        }
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        true
    }

    /// Backspace the char immediately before the cursor.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let prev = self.input[..self.cursor].chars().last().map(|c| c.len_utf8()).unwrap_or(1);
        let start = self.cursor - prev;
        self.input.drain(start..self.cursor);
        self.cursor = start;
        true
    }
}

/// Behavior shared by text and password fields; `masked` selects password.
pub struct TextBehavior {
    pub(crate) masked: bool,
}

impl TextBehavior {
    fn line_count(descriptor: &FieldDescriptor, settings: &FormSettings) -> u16 {
        if descriptor.gui.multiline_count > 1 {
            descriptor.gui.multiline_count.min(settings.multiline_max_lines.max(1))
        } else {
            1
        }
    }
}

impl FieldBehavior for TextBehavior {
    fn kind(&self) -> FieldKind {
        if self.masked { FieldKind::Password } else { FieldKind::Text }
    }

    fn construct(&self, descriptor: &FieldDescriptor, settings: &FormSettings) -> EditorState {
        let multiline = !self.masked && Self::line_count(descriptor, settings) > 1;
        let mut editor = TextEditor::new(Some(declared_length(descriptor, settings)), multiline, self.masked);
        editor.set_text(descriptor.initial_value().as_text());
        EditorState::Text(editor)
    }

    fn extract(&self, editor: &EditorState, descriptor: &FieldDescriptor, validate: bool) -> Result<FieldPayload, FormError> {
        let EditorState::Text(text) = editor else {
            return Err(mismatch(descriptor, editor));
        };
        if validate && descriptor.gui.required && text.is_blank() {
            return Err(required_failure(descriptor, ValidationReason::Empty));
        }
        Ok(FieldPayload::Text(text.text().to_string()))
    }

    fn write(&self, editor: &mut EditorState, descriptor: &FieldDescriptor, payload: &FieldPayload) -> Result<(), FormError> {
        self.select(editor, descriptor, payload)
    }

    fn select(&self, editor: &mut EditorState, descriptor: &FieldDescriptor, payload: &FieldPayload) -> Result<(), FormError> {
        let EditorState::Text(text) = editor else {
            return Err(mismatch(descriptor, editor));
        };
        text.set_text(payload.as_text());
        Ok(())
    }

    fn measure(&self, descriptor: &FieldDescriptor, settings: &FormSettings) -> Size {
        let width = scaled(declared_length(descriptor, settings), settings.char_width);
        let height = settings.line_height.max(1).saturating_mul(Self::line_count(descriptor, settings));
        Size::new(width, height).clamp_width(settings.max_width)
    }
}
