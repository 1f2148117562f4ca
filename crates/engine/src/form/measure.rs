use dynform_types::{FormSettings, Size};
use dynform_util::display_width;

/// Folds row sizes into the form's preferred size: a label column, a gap and
/// the widest editor, clamped to the configured maximum width, over the sum
/// of row heights.
#[derive(Debug, Clone)]
pub struct SizeAccumulator {
    max_width: u16,
    label_gap: u16,
    max_label_width: u16,
    line_height: u16,
    label_width: u16,
    editor_width: u16,
    height: u16,
}

impl SizeAccumulator {
    pub fn new(settings: &FormSettings) -> Self {
        Self {
            max_width: settings.max_width,
            label_gap: settings.label_gap,
            max_label_width: settings.max_label_width,
            line_height: settings.line_height.max(1),
            label_width: 0,
            editor_width: 0,
            height: 0,
        }
    }

    pub fn add_row(&mut self, label: &str, editor: Size) {
        self.label_width = self.label_width.max(display_width(label).min(self.max_label_width));
        self.editor_width = self.editor_width.max(editor.width);
        self.height = self.height.saturating_add(editor.height.max(self.line_height));
    }

    /// Width of the label column rows should be drawn with.
    pub fn label_width(&self) -> u16 {
        self.label_width
    }

    pub fn finish(&self) -> Size {
        let width = self.label_width.saturating_add(self.label_gap).saturating_add(self.editor_width);
        Size::new(width.min(self.max_width), self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_is_label_column_plus_widest_editor() {
        let settings = FormSettings::default();
        let mut accumulator = SizeAccumulator::new(&settings);
        accumulator.add_row("Host", Size::new(20, 1));
        accumulator.add_row("Comments", Size::new(30, 3));
        accumulator.add_row("Hidden height", Size::new(3, 0));
        assert_eq!(accumulator.finish(), Size::new(13 + settings.label_gap + 30, 5));
    }

    #[test]
    fn long_labels_are_capped() {
        let settings = FormSettings {
            max_label_width: 5,
            max_width: 200,
            ..FormSettings::default()
        };
        let mut accumulator = SizeAccumulator::new(&settings);
        accumulator.add_row("A very long descriptive label", Size::new(10, 1));
        assert_eq!(accumulator.label_width(), 5);
        assert_eq!(accumulator.finish().width, 5 + settings.label_gap + 10);
    }
}
