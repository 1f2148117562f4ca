//! Runtime: terminal lifecycle and the event loop of the form host.
//!
//! - A dedicated input thread blocks on `crossterm::event::read()` and
//!   forwards events over a channel.
//! - Fill callbacks never run on the loop: each request is resolved by a
//!   blocking task and its result delivered over a completion channel, so
//!   the form stays responsive while a lookup is in flight. Superseded
//!   requests still complete but the engine discards them as stale.
//! - The loop redraws only after something changed.

use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use dynform_engine::{FieldValue, FillRequest, SchemaProvider};
use ratatui::{Terminal, prelude::*};
use tokio::{signal, sync::mpsc};

use crate::{
    app::{Effect, FormApp, FormExit},
    view,
};

type FillCompletion = (FillRequest, anyhow::Result<Vec<FieldValue>>);

/// Spawn a thread that blocks on terminal input and forwards events.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);
    std::thread::spawn(move || {
        loop {
            match event::read() {
                Ok(event) => {
                    if sender.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    tracing::warn!("Failed to read event: {}", error);
                    break;
                }
            }
        }
    });
    receiver
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Posts a fill request to a blocking task.
fn dispatch_fill(provider: &Arc<dyn SchemaProvider>, request: FillRequest, completions: &mpsc::Sender<FillCompletion>) {
    let provider = Arc::clone(provider);
    let completions = completions.clone();
    tokio::task::spawn_blocking(move || {
        let result = provider.fill(&request.callback_name, &request.parameters);
        if completions.blocking_send((request, result)).is_err() {
            tracing::debug!("form closed before a fill callback completed");
        }
    });
}

/// Executes effects; returns the exit reason once one is produced.
fn process_effects(
    effects: Vec<Effect>,
    provider: &Arc<dyn SchemaProvider>,
    completions: &mpsc::Sender<FillCompletion>,
) -> Option<FormExit> {
    for effect in effects {
        match effect {
            Effect::RequestFill(request) => dispatch_fill(provider, request, completions),
            Effect::Exit(exit) => return Some(exit),
        }
    }
    None
}

/// Runs the form until it is submitted or cancelled.
pub async fn run_form(mut app: FormApp, provider: Arc<dyn SchemaProvider>) -> Result<FormExit> {
    let mut input_receiver = spawn_input_thread();
    let (completion_sender, mut completion_receiver) = mpsc::channel::<FillCompletion>(32);
    let mut terminal = setup_terminal()?;

    let exit = loop {
        terminal.draw(|frame| view::draw(frame, &app))?;

        let effects = tokio::select! {
            maybe_event = input_receiver.recv() => {
                match maybe_event {
                    Some(Event::Key(key_event)) if key_event.kind != KeyEventKind::Release => {
                        if key_event.code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL) {
                            break FormExit::Cancelled;
                        }
                        app.handle_key(key_event)
                    }
                    Some(_) => Vec::new(),
                    // Input channel closed; shut down cleanly.
                    None => break FormExit::Cancelled,
                }
            }
            Some((request, result)) = completion_receiver.recv() => app.apply_fill(request, result),
            _ = signal::ctrl_c() => break FormExit::Cancelled,
        };

        if let Some(exit) = process_effects(effects, &provider, &completion_sender) {
            break exit;
        }
    };

    cleanup_terminal(&mut terminal)?;
    Ok(exit)
}
