// Results summary overlay: the most recent draw, grouped by round.
//
// Cards start face down and are turned over one per key press; each reveal
// plays the pop cue through the controller.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use spinwheel_core::ledger::Winner;

use super::centered_rect;
use crate::tui::ViewState;

const FACE_DOWN: &str = "? ? ?";

/// Seventy percent of `area`, with a floor so the cards stay readable.
fn dialog_size(area: Rect) -> (u16, u16) {
    let scale = |len: u16, floor: u16| {
        let scaled = u32::from(len) * 7 / 10;
        u16::try_from(scaled).unwrap_or(u16::MAX).max(floor)
    };
    (scale(area.width, 30), scale(area.height, 8))
}

/// Render the summary modal centered on `area`.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let (width, height) = dialog_size(area);
    let dialog_area = centered_rect(width, height, area);
    frame.render_widget(Clear, dialog_area);

    let title = format!(
        " Results: {}/{} revealed ",
        state.revealed.min(state.last_batch.len()),
        state.last_batch.len()
    );

    let paragraph = Paragraph::new(summary_lines(&state.last_batch, state.revealed))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta))
                .title(title),
        )
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog_area);
}

/// Winners grouped by round, keeping first-seen round order.
pub fn group_by_round(batch: &[Winner]) -> Vec<(usize, Vec<&Winner>)> {
    let mut groups: Vec<(usize, Vec<&Winner>)> = Vec::new();
    for w in batch {
        match groups.iter_mut().find(|(round, _)| *round == w.round) {
            Some((_, members)) => members.push(w),
            None => groups.push((w.round, vec![w])),
        }
    }
    groups
}

/// Text of one card. The first `revealed` cards of the batch are face up.
pub fn card_text(position: usize, winner: &Winner, revealed: usize) -> String {
    if position < revealed {
        format!("{}. {}  ({})", position + 1, winner.headline(), winner.candidate)
    } else {
        format!("{}. {}", position + 1, FACE_DOWN)
    }
}

fn summary_lines(batch: &[Winner], revealed: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut position = 0;
    for (round, members) in group_by_round(batch) {
        lines.push(Line::from(Span::styled(
            format!("Round {}", round),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        for w in members {
            let style = if position < revealed {
                Style::default()
                    .fg(Color::LightGreen)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            lines.push(Line::from(Span::styled(
                format!("  {}", card_text(position, w, revealed)),
                style,
            )));
            position += 1;
        }
        lines.push(Line::from(""));
    }
    lines
}
