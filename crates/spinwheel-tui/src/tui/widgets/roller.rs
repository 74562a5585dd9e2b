// Roller widget: the live draw display.
//
// Shows the value currently under the pointer, large and centered, with a
// caption that follows the draw phase.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use spinwheel_core::engine::READY_DISPLAY;

use crate::tui::ViewState;

/// Render the roller into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let border = if state.is_drawing() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Magenta)
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(state.display.clone(), display_style(state))),
        Line::from(""),
        Line::from(Span::styled(
            caption(state),
            Style::default().fg(Color::Gray),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(" Spin Wheel "),
        );
    frame.render_widget(paragraph, area);
}

/// Style of the display value for the current phase.
pub fn display_style(state: &ViewState) -> Style {
    if state.is_drawing() {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else if state.display == READY_DISPLAY {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }
}

/// One-line caption under the display value.
pub fn caption(state: &ViewState) -> String {
    if state.is_drawing() {
        format!("Drawing {} of {}...", state.winner_count, state.pool.len())
    } else if state.pool.is_empty() {
        "Add participants to start".to_string()
    } else {
        format!(
            "Press Space to draw {} of {}",
            state.winner_count,
            state.pool.len()
        )
    }
}
