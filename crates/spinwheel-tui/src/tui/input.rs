// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// controller, or into local ViewState mutations (modes, selection,
// fullscreen).

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use spinwheel_core::protocol::UserCommand;

use super::ViewState;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// controller. Returns `None` when the key press was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // crossterm may emit Release/Repeat events on some platforms.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode
    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }
    if view_state.import_mode {
        return handle_import_mode(key_event, view_state);
    }
    if view_state.edit_mode {
        return handle_edit_mode(key_event, view_state);
    }
    if view_state.show_summary {
        return handle_summary(key_event, view_state);
    }

    match key_event.code {
        // Draw. The controller ignores this while a draw is running.
        KeyCode::Char(' ') | KeyCode::Enter => Some(UserCommand::Draw),

        // Winner count stepper
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right => {
            Some(UserCommand::IncrementCount)
        }
        KeyCode::Char('-') | KeyCode::Left => Some(UserCommand::DecrementCount),

        KeyCode::Char('m') => Some(UserCommand::ToggleMute),

        KeyCode::Char('f') => {
            view_state.fullscreen = !view_state.fullscreen;
            None
        }

        // Participant editing is locked while spinning
        KeyCode::Char('e') => {
            if !view_state.is_drawing() {
                view_state.edit_buffer = view_state.input_text.clone();
                view_state.edit_mode = true;
                view_state.fullscreen = false;
            }
            None
        }
        KeyCode::Char('o') => {
            if !view_state.is_drawing() {
                view_state.import_path.clear();
                view_state.import_mode = true;
            }
            None
        }
        KeyCode::Char('c') => {
            if view_state.is_drawing() {
                None
            } else {
                Some(UserCommand::ClearInput)
            }
        }

        // Winner selection
        KeyCode::Up | KeyCode::Char('k') => {
            select_previous(view_state);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            select_next(view_state);
            None
        }
        KeyCode::Char('x') | KeyCode::Delete => view_state
            .selected()
            .map(|w| UserCommand::RemoveWinner(w.id.clone())),

        KeyCode::Char('s') => {
            if !view_state.last_batch.is_empty() {
                view_state.show_summary = true;
            }
            None
        }

        KeyCode::Esc => {
            view_state.notice = None;
            view_state.selected_winner = None;
            None
        }

        // Quit: enter confirmation mode instead of quitting immediately
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

/// Quit confirmation: `y`/`q` confirm, `n`/Esc cancel, everything else is
/// blocked.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

/// Participant editor. Every change is sent so the pool tracks the text.
fn handle_edit_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.edit_mode = false;
            return None;
        }
        KeyCode::Enter => view_state.edit_buffer.push('\n'),
        KeyCode::Backspace => {
            view_state.edit_buffer.pop()?;
        }
        KeyCode::Char(c) => view_state.edit_buffer.push(c),
        _ => return None,
    }
    Some(UserCommand::SetInput(view_state.edit_buffer.clone()))
}

/// CSV path prompt.
fn handle_import_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.import_mode = false;
            view_state.import_path.clear();
            None
        }
        KeyCode::Enter => {
            view_state.import_mode = false;
            let path = view_state.import_path.trim().to_string();
            view_state.import_path.clear();
            if path.is_empty() {
                None
            } else {
                Some(UserCommand::ImportTable(PathBuf::from(path)))
            }
        }
        KeyCode::Backspace => {
            view_state.import_path.pop();
            None
        }
        KeyCode::Char(c) => {
            view_state.import_path.push(c);
            None
        }
        _ => None,
    }
}

/// Summary modal: reveal the next card, or close once all are shown.
fn handle_summary(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char(' ') | KeyCode::Enter => {
            if view_state.revealed < view_state.last_batch.len() {
                view_state.revealed += 1;
                Some(UserCommand::CardRevealed)
            } else {
                view_state.show_summary = false;
                None
            }
        }
        KeyCode::Char('a') => {
            view_state.revealed = view_state.last_batch.len();
            None
        }
        KeyCode::Esc | KeyCode::Char('s') | KeyCode::Char('q') => {
            view_state.show_summary = false;
            None
        }
        _ => None,
    }
}

fn select_previous(view_state: &mut ViewState) {
    if view_state.winners.is_empty() {
        return;
    }
    view_state.selected_winner = Some(match view_state.selected_winner {
        Some(i) => i.saturating_sub(1),
        None => view_state.winners.len() - 1,
    });
}

fn select_next(view_state: &mut ViewState) {
    if view_state.winners.is_empty() {
        return;
    }
    let last = view_state.winners.len() - 1;
    view_state.selected_winner = Some(match view_state.selected_winner {
        Some(i) => (i + 1).min(last),
        None => 0,
    });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
