//! Form host state and key routing.
//!
//! `FormApp` owns the rendered [`FormContainer`] together with focus and
//! status line state. Keys are translated into editor edits; anything that
//! has to leave the UI loop (a fill callback, closing the form) comes back
//! as an [`Effect`] for the runtime to execute.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use dynform_engine::{
    CollectingSink, EditorState, FieldDescriptor, FieldValue, FillOutcome, FillRequest, FormContainer, SubmitOutcome, submit,
};
use tracing::{debug, warn};

/// How the form was closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormExit {
    Submitted(Vec<FieldValue>),
    Cancelled,
}

/// Work the runtime performs on behalf of the app.
#[derive(Debug)]
pub enum Effect {
    /// Resolve a fill callback off the UI loop.
    RequestFill(FillRequest),
    Exit(FormExit),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    Info(String),
    Error(String),
}

pub struct FormApp {
    title: String,
    descriptors: Vec<FieldDescriptor>,
    container: FormContainer,
    /// Index into the container's rows.
    focus: usize,
    /// Pending text for the focused editable list.
    list_draft: String,
    status: Option<StatusLine>,
}

impl FormApp {
    /// Wraps an already rendered container. `descriptors` must be the list
    /// the container was rendered from; submit extracts in that order.
    pub fn new(title: impl Into<String>, descriptors: Vec<FieldDescriptor>, container: FormContainer) -> Self {
        let mut app = Self {
            title: title.into(),
            descriptors,
            container,
            focus: 0,
            list_draft: String::new(),
            status: None,
        };
        app.focus = app.first_enabled_row().unwrap_or(0);
        app
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn container(&self) -> &FormContainer {
        &self.container
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focused_field(&self) -> Option<&str> {
        self.container.rows().get(self.focus).map(|row| row.field.as_str())
    }

    pub fn list_draft(&self) -> &str {
        &self.list_draft
    }

    pub fn status(&self) -> Option<&StatusLine> {
        self.status.as_ref()
    }

    pub fn pending_fills(&self) -> usize {
        self.container.broker().pending()
    }

    fn first_enabled_row(&self) -> Option<usize> {
        let rows = self.container.rows();
        rows.iter().position(|row| row.label.enabled)
    }

    fn move_focus(&mut self, forward: bool) {
        let count = self.container.rows().len();
        if count == 0 {
            return;
        }
        let mut next = self.focus;
        for _ in 0..count {
            next = if forward { (next + 1) % count } else { (next + count - 1) % count };
            if self.container.rows()[next].label.enabled {
                break;
            }
        }
        if next != self.focus {
            self.list_draft.clear();
        }
        self.focus = next;
    }

    fn focus_field(&mut self, field: &str) {
        if let Some(index) = self.container.rows().iter().position(|row| row.field == field) {
            self.focus = index;
        }
    }

    /// Routes one key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return vec![Effect::Exit(FormExit::Cancelled)],
            KeyCode::Char('s') if control => return self.submit(),
            KeyCode::Up | KeyCode::BackTab => {
                self.move_focus(false);
                return Vec::new();
            }
            KeyCode::Down | KeyCode::Tab => {
                self.move_focus(true);
                return Vec::new();
            }
            _ if control => return Vec::new(),
            _ => {}
        }

        let Some(field) = self.focused_field().map(str::to_string) else {
            return Vec::new();
        };
        let draft = &mut self.list_draft;
        match self.container.edit(&field, |state| apply_key(state, key.code, draft)) {
            Ok(Some(request)) => {
                self.status = Some(StatusLine::Info(format!("refreshing fields that depend on '{field}'...")));
                vec![Effect::RequestFill(request)]
            }
            Ok(None) => Vec::new(),
            Err(error) => {
                self.status = Some(StatusLine::Error(error.to_string()));
                Vec::new()
            }
        }
    }

    /// Applies a resolved fill callback. Cascading callbacks come back as
    /// further effects.
    pub fn apply_fill(&mut self, request: FillRequest, result: anyhow::Result<Vec<FieldValue>>) -> Vec<Effect> {
        match self.container.complete_fill(request, result) {
            Ok(FillOutcome::Applied { updated, cascade }) => {
                self.status = if cascade.is_empty() && updated.is_empty() {
                    None
                } else if updated.is_empty() {
                    self.status.take()
                } else {
                    Some(StatusLine::Info(format!("updated {}", updated.join(", "))))
                };
                cascade.into_iter().map(Effect::RequestFill).collect()
            }
            Ok(FillOutcome::Stale) => Vec::new(),
            Err(error) => {
                warn!(%error, "dependency fill failed");
                self.status = Some(StatusLine::Error(error.to_string()));
                Vec::new()
            }
        }
    }

    fn submit(&mut self) -> Vec<Effect> {
        if self.pending_fills() > 0 {
            self.status = Some(StatusLine::Info("waiting for dependent fields to refresh".into()));
            return Vec::new();
        }
        let mut sink = CollectingSink::default();
        match submit(&self.container, &self.descriptors, &mut sink) {
            Ok(SubmitOutcome::Accepted(values)) => vec![Effect::Exit(FormExit::Submitted(values))],
            Ok(SubmitOutcome::Rejected(error)) => {
                self.focus_field(&error.field);
                self.status = Some(StatusLine::Error(error.to_string()));
                Vec::new()
            }
            Err(error) => {
                self.status = Some(StatusLine::Error(format!("{error:#}")));
                Vec::new()
            }
        }
    }
}

fn apply_key(state: &mut EditorState, code: KeyCode, draft: &mut String) {
    match (state, code) {
        (EditorState::Text(editor), KeyCode::Char(c)) => {
            editor.insert_char(c);
        }
        (EditorState::Text(editor), KeyCode::Enter) if editor.is_multiline() => {
            editor.insert_char('\n');
        }
        (EditorState::Text(editor), KeyCode::Backspace) => {
            editor.backspace();
        }
        (EditorState::Text(editor), KeyCode::Left) => editor.move_left(),
        (EditorState::Text(editor), KeyCode::Right) => editor.move_right(),

        (EditorState::Numeric(editor), KeyCode::Char('+')) => editor.step(1),
        (EditorState::Numeric(editor), KeyCode::Char('-')) => editor.step(-1),
        (EditorState::Numeric(editor), KeyCode::Char(c)) => {
            if let Some(digit) = c.to_digit(10) {
                editor.push_digit(digit);
            }
        }
        (EditorState::Numeric(editor), KeyCode::Backspace) => {
            editor.pop_digit();
        }

        (EditorState::Choice(editor), KeyCode::Left) => editor.select_previous(),
        (EditorState::Choice(editor), KeyCode::Right | KeyCode::Char(' ')) => editor.select_next(),

        (EditorState::MultiChoice(editor), KeyCode::Left) => editor.move_cursor(-1),
        (EditorState::MultiChoice(editor), KeyCode::Right) => editor.move_cursor(1),
        (EditorState::MultiChoice(editor), KeyCode::Char(' ')) => {
            editor.toggle_at_cursor();
        }

        (EditorState::EditableList(editor), KeyCode::Enter) => {
            if editor.push_item(draft) {
                draft.clear();
            }
        }
        (EditorState::EditableList(editor), KeyCode::Delete) => {
            editor.remove_at_cursor();
        }
        (EditorState::EditableList(editor), KeyCode::Left) => editor.move_cursor(-1),
        (EditorState::EditableList(editor), KeyCode::Right) => editor.move_cursor(1),
        (EditorState::EditableList(_), KeyCode::Char(c)) => draft.push(c),
        (EditorState::EditableList(_), KeyCode::Backspace) => {
            draft.pop();
        }

        (EditorState::Checkbox(editor), KeyCode::Char(' ')) => editor.toggle(),

        (_, code) => debug!(?code, "key has no effect on the focused editor"),
    }
}
