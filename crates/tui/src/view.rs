//! Drawing of the form host.
//!
//! Layout, top to bottom: title, form body (tab headers, label column,
//! editor column), key hints, status line. The body scrolls so the focused
//! row stays visible.

use dynform_engine::{EditorInstance, EditorState, FormRow};
use dynform_util::{display_width, truncate_to_width};
use ratatui::{prelude::*, widgets::*};

use crate::{
    app::{FormApp, StatusLine},
    theme,
};

pub fn draw(frame: &mut Frame, app: &FormApp) {
    let chunks = Layout::vertical([Constraint::Length(1), Constraint::Min(1), Constraint::Length(1), Constraint::Length(1)]).split(frame.area());

    let title = Paragraph::new(Line::from(vec![
        Span::styled(app.title().to_string(), theme::title_style()),
        Span::styled(format!("  {} fields", app.container().row_count()), theme::text_muted()),
    ]));
    frame.render_widget(title, chunks[0]);

    draw_body(frame, chunks[1], app);
    draw_hints(frame, chunks[2]);
    draw_status(frame, chunks[3], app);
}

fn label_column_width(app: &FormApp) -> u16 {
    let settings = app.container().settings();
    app.container()
        .rows()
        .iter()
        .map(|row| display_width(&row.label.text).min(settings.max_label_width))
        .max()
        .unwrap_or(0)
}

/// One drawable line group: an optional tab header followed by a row.
struct BodyEntry<'a> {
    header: Option<&'a str>,
    row: &'a FormRow,
    height: u16,
}

fn body_entries(app: &FormApp) -> Vec<BodyEntry<'_>> {
    let mut current_tab: Option<&str> = None;
    app.container()
        .rows()
        .iter()
        .map(|row| {
            let tab = row.tab.as_deref();
            let header = if tab.is_some() && tab != current_tab { tab } else { None };
            current_tab = tab.or(current_tab);
            BodyEntry {
                header,
                row,
                height: row.size.height.max(1),
            }
        })
        .collect()
}

/// First entry to draw so that the focused entry fits in `available` lines.
fn scroll_offset(entries: &[BodyEntry<'_>], focus: usize, available: u16) -> usize {
    let mut used = 0u16;
    let mut first = focus.min(entries.len().saturating_sub(1));
    for index in (0..=first).rev() {
        let entry = &entries[index];
        let height = entry.height.saturating_add(u16::from(entry.header.is_some()));
        if used.checked_add(height).is_none_or(|total| total > available) && index != first {
            break;
        }
        used = used.saturating_add(height);
        first = index;
    }
    first
}

fn draw_body(frame: &mut Frame, area: Rect, app: &FormApp) {
    let block = Block::default().borders(Borders::TOP).border_style(theme::border_style(false));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let gap = app.container().settings().label_gap;
    let label_width = label_column_width(app);
    let editor_x = inner.x.saturating_add(label_width).saturating_add(gap);
    let editor_width = inner.width.saturating_sub(label_width + gap);

    let rows = body_entries(app);
    if rows.is_empty() {
        return;
    }
    let mut y = inner.y;
    let bottom = inner.y + inner.height;
    for (index, entry) in rows.iter().enumerate().skip(scroll_offset(&rows, app.focus(), inner.height)) {
        if let Some(header) = entry.header {
            if y >= bottom {
                break;
            }
            let line = Line::from(Span::styled(format!("[ {header} ]"), theme::list_highlight_style()));
            frame.render_widget(Paragraph::new(line), Rect::new(inner.x, y, inner.width, 1));
            y += 1;
        }
        if y >= bottom {
            break;
        }
        let height = entry.height.min(bottom - y);
        let focused = index == app.focus();
        let enabled = entry.row.label.enabled;

        let label_style = match (enabled, focused) {
            (false, _) => theme::disabled_style(),
            (true, true) => theme::list_highlight_style(),
            (true, false) => theme::text_style(),
        };
        let label = truncate_to_width(&entry.row.label.text, label_width);
        frame.render_widget(Paragraph::new(Span::styled(label.to_string(), label_style)), Rect::new(inner.x, y, label_width, 1));

        if let Some(editor) = app.container().editor(&entry.row.field) {
            let lines = editor_lines(editor, focused, app.list_draft(), height);
            let style = match (enabled, focused) {
                (false, _) => theme::disabled_style(),
                (true, true) => theme::highlight_style(),
                (true, false) => theme::text_style(),
            };
            let editor_area = Rect::new(editor_x, y, entry.row.size.width.min(editor_width), height);
            frame.render_widget(Paragraph::new(lines).style(style), editor_area);
        }
        y += height;
    }
}

/// Visible window of `len` items of which `cursor` must be shown.
fn window(len: usize, cursor: usize, height: usize) -> std::ops::Range<usize> {
    let height = height.max(1);
    let start = cursor.saturating_sub(height - 1).min(len.saturating_sub(height));
    start..len.min(start + height)
}

fn editor_lines<'a>(editor: &'a EditorInstance, focused: bool, draft: &str, height: u16) -> Vec<Line<'a>> {
    match editor.state() {
        EditorState::Text(text) => {
            let shown = text.display_text();
            let mut lines: Vec<Line> = shown.split('\n').map(|line| Line::from(line.to_string())).collect();
            if focused && let Some(last) = lines.last_mut() {
                last.push_span(Span::styled("▏", theme::key_style()));
            }
            lines
        }
        EditorState::Numeric(numeric) => vec![Line::from(vec![
            Span::raw(numeric.value().to_string()),
            Span::styled(" ±", theme::text_muted()),
        ])],
        EditorState::Choice(choice) => {
            let label = choice.selected().map(|selected| selected.label().to_string()).unwrap_or_else(|| "(none)".into());
            vec![Line::from(vec![
                Span::styled("◂ ", theme::text_muted()),
                Span::raw(label),
                Span::styled(" ▸", theme::text_muted()),
            ])]
        }
        EditorState::MultiChoice(multi) => {
            let range = window(multi.choices().len(), multi.cursor(), height as usize);
            multi.choices()[range.clone()]
                .iter()
                .zip(range)
                .map(|(choice, index)| {
                    let mark = if multi.is_selected(index) { "[x] " } else { "[ ] " };
                    let style = if focused && index == multi.cursor() { theme::list_highlight_style() } else { Style::default() };
                    Line::from(Span::styled(format!("{mark}{}", choice.label()), style))
                })
                .collect()
        }
        EditorState::EditableList(list) => {
            let visible = (height as usize).saturating_sub(1);
            let range = window(list.items().len(), list.cursor(), visible);
            let mut lines: Vec<Line> = if visible == 0 {
                Vec::new()
            } else {
                list.items()[range.clone()]
                    .iter()
                    .zip(range)
                    .map(|(item, index)| {
                        let style = if focused && index == list.cursor() { theme::list_highlight_style() } else { Style::default() };
                        Line::from(Span::styled(item.clone(), style))
                    })
                    .collect()
            };
            let pending = if focused { draft } else { "" };
            lines.push(Line::from(vec![Span::styled("+ ", theme::text_muted()), Span::raw(pending.to_string())]));
            lines
        }
        EditorState::Checkbox(checkbox) => vec![Line::from(if checkbox.is_checked() { "[x]" } else { "[ ]" })],
        EditorState::Hidden(_) => Vec::new(),
    }
}

fn draw_hints(frame: &mut Frame, area: Rect) {
    let hints = Paragraph::new(Line::from(vec![
        Span::styled("↑/↓", theme::key_style()),
        Span::styled(" move  ", theme::text_muted()),
        Span::styled("←/→", theme::key_style()),
        Span::styled(" choose  ", theme::text_muted()),
        Span::styled("Space", theme::key_style()),
        Span::styled(" toggle  ", theme::text_muted()),
        Span::styled("Ctrl-S", theme::key_style()),
        Span::styled(" submit  ", theme::text_muted()),
        Span::styled("Esc", theme::key_style()),
        Span::styled(" cancel", theme::text_muted()),
    ]));
    frame.render_widget(hints, area);
}

fn draw_status(frame: &mut Frame, area: Rect, app: &FormApp) {
    let line = match app.status() {
        Some(StatusLine::Error(message)) => Line::from(Span::styled(message.clone(), theme::error_style())),
        Some(StatusLine::Info(message)) => Line::from(Span::styled(message.clone(), theme::info_style())),
        None if app.pending_fills() > 0 => Line::from(Span::styled("refreshing dependent fields...", theme::text_muted())),
        None => match app.focused_field().and_then(|field| app.container().editor(field)) {
            Some(editor) if !editor.descriptor().gui.tooltip.is_empty() => {
                Line::from(Span::styled(editor.descriptor().gui.tooltip.clone(), theme::text_muted()))
            }
            _ => Line::default(),
        },
    };
    frame.render_widget(Paragraph::new(line), area);
}
