// Screen layout: panel arrangement and sizing.
//
// Divides the terminal area into fixed zones:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +-------------------------+------------------------+
// | Participants (35%)       | Roller (7 rows)        |
// |                          +------------------------+
// |                          | Winners (fill)         |
// +-------------------------+------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+
//
// In fullscreen the participant panel is hidden and the right column takes
// the whole width.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Height of the roller panel, borders included.
pub const ROLLER_HEIGHT: u16 = 7;

/// Resolved screen areas for each zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: phase, mode, winner count, mute, notices.
    pub status_bar: Rect,
    /// Left column: participant text. `None` in fullscreen.
    pub participants: Option<Rect>,
    /// The spinning display.
    pub roller: Rect,
    /// Ledger of drawn winners.
    pub winners: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the layout from the available terminal area.
pub fn build_layout(area: Rect, fullscreen: bool) -> AppLayout {
    // Vertical: status(1) | middle(fill) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(10),   // middle section
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let status_bar = vertical[0];
    let middle = vertical[1];
    let help_bar = vertical[2];

    let (participants, stage) = if fullscreen {
        (None, middle)
    } else {
        let horizontal = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(middle);
        (Some(horizontal[0]), horizontal[1])
    };

    let stage_sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(ROLLER_HEIGHT), Constraint::Min(3)])
        .split(stage);

    AppLayout {
        status_bar,
        participants,
        roller: stage_sections[0],
        winners: stage_sections[1],
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
