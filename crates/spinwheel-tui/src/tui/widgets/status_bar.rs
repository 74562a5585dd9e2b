// Status bar widget: phase, draw mode, winner count, mute, and the latest
// notice.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use spinwheel_core::config::DrawMode;
use spinwheel_core::protocol::{NoticeLevel, Phase};

use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [phase] [mode] [count] [pool] [mute] [notice]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let sep = || Span::styled(" | ", Style::default().fg(Color::Gray));
    let (label, color) = phase_indicator(state.phase);

    let mut spans = vec![
        Span::styled(
            format!(" ● {} ", label),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        sep(),
        Span::styled(mode_label(state.mode), Style::default().fg(Color::White)),
        sep(),
        Span::styled(
            format!("Winners to draw: {}", state.winner_count),
            Style::default().fg(Color::White),
        ),
        sep(),
        Span::styled(
            format!("Pool: {}", state.pool.len()),
            Style::default().fg(Color::White),
        ),
        sep(),
        mute_span(state.muted),
    ];

    if let Some(ref notice) = state.notice {
        let color = match notice.level {
            NoticeLevel::Info => Color::Green,
            NoticeLevel::Error => Color::Red,
        };
        spans.push(sep());
        spans.push(Span::styled(
            notice.message.clone(),
            Style::default().fg(color),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

pub fn phase_indicator(phase: Phase) -> (&'static str, Color) {
    match phase {
        Phase::Idle => ("Idle", Color::Green),
        Phase::Drawing => ("Drawing", Color::Yellow),
    }
}

pub fn mode_label(mode: DrawMode) -> &'static str {
    match mode {
        DrawMode::Sequential => "One at a time",
        DrawMode::Batch => "All at once",
    }
}

fn mute_span(muted: bool) -> Span<'static> {
    if muted {
        Span::styled("Muted", Style::default().fg(Color::Red))
    } else {
        Span::styled("Sound on", Style::default().fg(Color::Gray))
    }
}
