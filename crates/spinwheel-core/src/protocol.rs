// Message types exchanged between the controller and the view.
//
// The view sends `UserCommand`s; the controller answers with `UiUpdate`s.
// Snapshots are immutable copies, the view never sees live engine state.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::DrawMode;
use crate::ledger::Winner;

/// Engine state machine phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Idle,
    Drawing,
}

/// Immutable copy of the drawing engine state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub phase: Phase,
    /// Value currently shown in the roller.
    pub display: String,
    /// Raw participant text as last accepted.
    pub input_text: String,
    /// Normalized pool derived from `input_text`.
    pub pool: Vec<String>,
    /// Full ledger in draw order.
    pub winners: Vec<Winner>,
    pub winner_count: usize,
}

/// Everything the view needs to redraw after a state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSnapshot {
    pub engine: EngineSnapshot,
    pub muted: bool,
    pub mode: DrawMode,
}

/// Best-effort audio notification categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    /// A new value was shown in the roller.
    Tick,
    /// A winner (or a batch of winners) was decided.
    Win,
    /// A winner card was revealed in the summary view.
    RevealPop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A one-line message for the status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Updates pushed from the controller to the view.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    /// Full state after a transition.
    StateSnapshot(Box<AppSnapshot>),
    /// A new display sample while spinning.
    SpinTick(String),
    /// One round of a sequential draw was decided.
    RoundWinner(Winner),
    /// A draw finished; carries the whole batch.
    DrawCompleted(Vec<Winner>),
    /// Fire the celebratory particle burst.
    Celebrate,
    Notice(Notice),
}

/// Commands sent from the view to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// Replace the raw participant text.
    SetInput(String),
    /// Empty the participant text (reset).
    ClearInput,
    /// Import a CSV file and replace the participant text with its rows.
    ImportTable(PathBuf),
    SetWinnerCount(usize),
    IncrementCount,
    DecrementCount,
    /// Start a draw with the current winner count.
    Draw,
    RemoveWinner(String),
    ToggleMute,
    /// The summary view revealed another winner card.
    CardRevealed,
    Quit,
}
