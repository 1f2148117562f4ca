//! Layout and constraint settings applied while rendering forms.

use serde::{Deserialize, Serialize};

/// Tunables read by the renderer and the per-kind `measure` operations.
///
/// All units are layout cells. Every field has a default so a partial
/// configuration file only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSettings {
    /// Upper bound for any editor and for the whole form.
    pub max_width: u16,
    /// Width of one character of declared field length.
    pub char_width: u16,
    /// Height of one text line.
    pub line_height: u16,
    /// Length assumed when a descriptor does not declare one.
    pub default_length: usize,
    /// Cap for the digit count of numeric fields.
    pub numeric_max_digits: u32,
    /// Cap for the visible line count of multiline text fields.
    pub multiline_max_lines: u16,
    /// Visible rows of a multi-choice list without a `rows` hint.
    pub multi_choice_rows: u16,
    /// Visible rows of an editable list.
    pub editable_list_rows: u16,
    pub checkbox_width: u16,
    /// Extra width reserved for spinner or drop-down affordances.
    pub spinner_width: u16,
    /// Gap between the label column and the editor column.
    pub label_gap: u16,
    pub max_label_width: u16,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            max_width: 100,
            char_width: 1,
            line_height: 1,
            default_length: 64,
            numeric_max_digits: 8,
            multiline_max_lines: 8,
            multi_choice_rows: 4,
            editable_list_rows: 5,
            checkbox_width: 3,
            spinner_width: 2,
            label_gap: 2,
            max_label_width: 32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_documents_keep_defaults() {
        let settings: FormSettings = serde_json::from_str(r#"{"max_width": 60}"#).expect("settings");
        assert_eq!(settings.max_width, 60);
        assert_eq!(settings.default_length, 64);
        assert_eq!(settings.numeric_max_digits, 8);
    }
}
