//! Numeric spinner editor.

use dynform_types::{FieldDescriptor, FieldKind, FieldPayload, FormSettings, Size};
use tracing::warn;

use crate::{
    editor::EditorState,
    error::{FormError, ValidationReason},
    kinds::{mismatch, required_failure, scaled},
    registry::FieldBehavior,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumericEditor {
    value: i64,
    min: i64,
    max: i64,
}

impl NumericEditor {
    pub fn new(min: i64, max: i64) -> Self {
        Self { value: min.max(0).min(max), min, max }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn bounds(&self) -> (i64, i64) {
        (self.min, self.max)
    }

    pub fn set_value(&mut self, value: i64) {
        self.value = value.clamp(self.min, self.max);
    }

    /// Parses `text` into the editor; unparsable input becomes 0.
    pub fn set_text(&mut self, field: &str, text: &str) {
        let trimmed = text.trim();
        let parsed = if trimmed.is_empty() {
            0
        } else {
            trimmed.parse::<i64>().unwrap_or_else(|error| {
                warn!(field = %field, value = %trimmed, error = %error, "numeric value is not an integer; using 0");
                0
            })
        };
        self.set_value(parsed);
    }

    /// Appends a typed digit, ignoring it when the result would exceed the bounds.
    pub fn push_digit(&mut self, digit: u32) -> bool {
        let Some(next) = self
            .value
            .checked_mul(10)
            .and_then(|shifted| if self.value < 0 { shifted.checked_sub(digit as i64) } else { shifted.checked_add(digit as i64) })
        else {
            return false;
        };
        if next > self.max || next < self.min {
            return false;
        }
        self.value = next;
        true
    }

    /// Drops the last digit.
    pub fn pop_digit(&mut self) -> bool {
        if self.value == 0 {
            return false;
        }
        self.set_value(self.value / 10);
        true
    }

    pub fn step(&mut self, delta: i64) {
        self.set_value(self.value.saturating_add(delta));
    }
}

fn digit_count(descriptor: &FieldDescriptor, settings: &FormSettings) -> u32 {
    let cap = settings.numeric_max_digits.clamp(1, 18);
    descriptor
        .gui
        .max_length
        .filter(|length| *length > 0)
        .map(|length| length.min(cap as usize) as u32)
        .unwrap_or(cap)
}

/// Bounds derived from the declared digit count, narrowed by explicit
/// `minValue` / `maxValue` when those form a usable range.
fn bounds(descriptor: &FieldDescriptor, settings: &FormSettings) -> (i64, i64) {
    let upper = 10i64.pow(digit_count(descriptor, settings)) - 1;
    let mut min = 0;
    let mut max = upper;
    if let Some(declared) = descriptor.gui.max_value
        && declared >= 0
        && declared < upper
    {
        max = declared;
    }
    if let Some(declared) = descriptor.gui.min_value
        && declared >= -upper
        && declared <= max
    {
        min = declared;
    }
    (min, max)
}

pub struct NumericBehavior;

impl FieldBehavior for NumericBehavior {
    fn kind(&self) -> FieldKind {
        FieldKind::Numeric
    }

    fn construct(&self, descriptor: &FieldDescriptor, settings: &FormSettings) -> EditorState {
        let (min, max) = bounds(descriptor, settings);
        let mut editor = NumericEditor::new(min, max);
        editor.set_text(&descriptor.name, descriptor.initial_value().as_text());
        EditorState::Numeric(editor)
    }

    fn extract(&self, editor: &EditorState, descriptor: &FieldDescriptor, validate: bool) -> Result<FieldPayload, FormError> {
        let EditorState::Numeric(numeric) = editor else {
            return Err(mismatch(descriptor, editor));
        };
        if validate && descriptor.gui.required && numeric.value() == 0 {
            return Err(required_failure(descriptor, ValidationReason::Zero));
        }
        Ok(FieldPayload::Text(numeric.value().to_string()))
    }

    fn write(&self, editor: &mut EditorState, descriptor: &FieldDescriptor, payload: &FieldPayload) -> Result<(), FormError> {
        self.select(editor, descriptor, payload)
    }

    fn select(&self, editor: &mut EditorState, descriptor: &FieldDescriptor, payload: &FieldPayload) -> Result<(), FormError> {
        let EditorState::Numeric(numeric) = editor else {
            return Err(mismatch(descriptor, editor));
        };
        numeric.set_text(&descriptor.name, payload.as_text());
        Ok(())
    }

    fn measure(&self, descriptor: &FieldDescriptor, settings: &FormSettings) -> Size {
        let width = scaled(digit_count(descriptor, settings) as usize, settings.char_width).saturating_add(settings.spinner_width);
        Size::new(width, settings.line_height.max(1)).clamp_width(settings.max_width)
    }
}
