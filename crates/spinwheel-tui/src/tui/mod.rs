// Terminal view: layout, input handling, and widget rendering.
//
// The view owns a `ViewState` that mirrors the controller's snapshots plus
// purely local UI state (modes, selection, confetti). The controller pushes
// `UiUpdate` messages over an mpsc channel; the view applies them to
// `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;

use spinwheel_core::config::{DrawMode, EffectsConfig};
use spinwheel_core::engine::READY_DISPLAY;
use spinwheel_core::ledger::Winner;
use spinwheel_core::protocol::{AppSnapshot, Notice, Phase, UiUpdate, UserCommand};

use layout::{build_layout, AppLayout};
use widgets::confetti::Confetti;

/// Frame interval of the render loop.
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// View-local state that mirrors the controller state for rendering.
///
/// Updated incrementally via `UiUpdate` messages. The `render_frame`
/// function reads this struct to draw the screen.
pub struct ViewState {
    // --- mirrored from snapshots ---
    pub phase: Phase,
    pub display: String,
    pub input_text: String,
    pub pool: Vec<String>,
    pub winners: Vec<Winner>,
    pub winner_count: usize,
    pub muted: bool,
    pub mode: DrawMode,

    // --- local ---
    /// Participant text editor is capturing keys.
    pub edit_mode: bool,
    pub edit_buffer: String,
    /// CSV path prompt is capturing keys.
    pub import_mode: bool,
    pub import_path: String,
    /// Index into `winners` of the highlighted row.
    pub selected_winner: Option<usize>,
    pub fullscreen: bool,
    pub confirm_quit: bool,
    /// Result cards of the most recent draw.
    pub last_batch: Vec<Winner>,
    pub show_summary: bool,
    /// Number of cards in `last_batch` already turned over.
    pub revealed: usize,
    pub notice: Option<Notice>,
    pub confetti: Confetti,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::new(&EffectsConfig::default())
    }
}

impl ViewState {
    pub fn new(effects: &EffectsConfig) -> Self {
        ViewState {
            phase: Phase::Idle,
            display: READY_DISPLAY.to_string(),
            input_text: String::new(),
            pool: Vec::new(),
            winners: Vec::new(),
            winner_count: 1,
            muted: false,
            mode: DrawMode::default(),
            edit_mode: false,
            edit_buffer: String::new(),
            import_mode: false,
            import_path: String::new(),
            selected_winner: None,
            fullscreen: false,
            confirm_quit: false,
            last_batch: Vec::new(),
            show_summary: false,
            revealed: 0,
            notice: None,
            confetti: Confetti::new(effects.confetti_particles),
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.phase == Phase::Drawing
    }

    /// Apply a full state snapshot from the controller.
    ///
    /// Local fields (modes, confetti, the summary) are left unchanged. The
    /// edit buffer is not overwritten while the editor is open.
    pub fn apply_snapshot(&mut self, snapshot: AppSnapshot) {
        let engine = snapshot.engine;
        self.phase = engine.phase;
        self.display = engine.display;
        self.input_text = engine.input_text;
        self.pool = engine.pool;
        self.winners = engine.winners;
        self.winner_count = engine.winner_count;
        self.muted = snapshot.muted;
        self.mode = snapshot.mode;

        self.selected_winner = match self.selected_winner {
            _ if self.winners.is_empty() => None,
            Some(i) => Some(i.min(self.winners.len() - 1)),
            None => None,
        };
    }

    /// The winner under the selection cursor.
    pub fn selected(&self) -> Option<&Winner> {
        self.selected_winner.and_then(|i| self.winners.get(i))
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::StateSnapshot(snapshot) => {
            state.apply_snapshot(*snapshot);
        }
        UiUpdate::SpinTick(display) => {
            state.display = display;
        }
        UiUpdate::RoundWinner(winner) => {
            state.display = winner.candidate;
        }
        UiUpdate::DrawCompleted(winners) => {
            // Multi-winner draws open the summary; a single winner is
            // already on the roller.
            if winners.len() > 1 {
                state.show_summary = true;
                state.revealed = 0;
            }
            if !winners.is_empty() {
                state.last_batch = winners;
            }
        }
        UiUpdate::Celebrate => {
            state.confetti.burst();
        }
        UiUpdate::Notice(notice) => {
            state.notice = Some(notice);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area(), state.fullscreen);

    widgets::status_bar::render(frame, layout.status_bar, state);
    if let Some(area) = layout.participants {
        widgets::participants::render(frame, area, state);
    }
    widgets::roller::render(frame, layout.roller, state);
    widgets::winners::render(frame, layout.winners, state);
    render_help_bar(frame, &layout, state);

    if state.show_summary {
        widgets::summary::render(frame, frame.area(), state);
    }
    if state.import_mode {
        widgets::import_prompt::render(frame, frame.area(), &state.import_path);
    }
    if state.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area());
    }

    widgets::confetti::render(frame, frame.area(), &state.confetti);
}

/// Key hints for the current mode.
pub fn help_text(state: &ViewState) -> &'static str {
    if state.confirm_quit {
        " y:Quit | n:Cancel"
    } else if state.import_mode {
        " Enter:Import | Esc:Cancel"
    } else if state.edit_mode {
        " Type to edit participants | Esc:Done"
    } else if state.show_summary {
        " Space:Reveal next | Esc:Close"
    } else {
        " Space:Draw | +/-:Count | e:Edit | o:Import CSV | c:Clear | x:Remove | s:Summary | f:Fullscreen | m:Mute | q:Quit"
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        help_text(state),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the view event loop.
///
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    effects: EffectsConfig,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::new(&effects);
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(RENDER_INTERVAL);
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            // UI updates from the controller
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // Channel closed: controller is shutting down
                    None => break Ok(()),
                }
            }

            // Keyboard input
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break Ok(());
                            }
                        }
                    }
                    // Mouse, resize, focus: the next render picks up the size.
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break Err(anyhow::Error::from(e)),
                    None => break Ok(()),
                }
            }

            // Render tick
            _ = render_tick.tick() => {
                if view_state.confetti.is_active() {
                    view_state.confetti.step(RENDER_INTERVAL.as_secs_f32());
                }
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(e.into());
                }
            }
        }
    };

    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use spinwheel_core::protocol::EngineSnapshot;

    fn winner(candidate: &str, draw_number: u64, round: usize) -> Winner {
        Winner::new(candidate.to_string(), draw_number, round)
    }

    fn snapshot(pool: &[&str], winners: Vec<Winner>) -> AppSnapshot {
        AppSnapshot {
            engine: EngineSnapshot {
                phase: Phase::Idle,
                display: "READY".to_string(),
                input_text: pool.join("\n"),
                pool: pool.iter().map(|s| s.to_string()).collect(),
                winners,
                winner_count: 2,
            },
            muted: true,
            mode: DrawMode::Batch,
        }
    }

    #[test]
    fn view_state_default_is_sensible() {
        let state = ViewState::default();
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.display, READY_DISPLAY);
        assert!(state.pool.is_empty());
        assert!(state.winners.is_empty());
        assert_eq!(state.winner_count, 1);
        assert!(!state.edit_mode);
        assert!(!state.import_mode);
        assert!(!state.fullscreen);
        assert!(!state.confirm_quit);
        assert!(!state.show_summary);
        assert!(state.notice.is_none());
        assert!(!state.confetti.is_active());
    }

    #[test]
    fn apply_snapshot_updates_fields() {
        let mut state = ViewState::default();
        state.apply_snapshot(snapshot(&["a", "b"], vec![winner("c", 1, 1)]));
        assert_eq!(state.pool, vec!["a", "b"]);
        assert_eq!(state.input_text, "a\nb");
        assert_eq!(state.winners.len(), 1);
        assert_eq!(state.winner_count, 2);
        assert!(state.muted);
        assert_eq!(state.mode, DrawMode::Batch);
    }

    #[test]
    fn apply_snapshot_keeps_edit_buffer() {
        let mut state = ViewState::default();
        state.edit_mode = true;
        state.edit_buffer = "typing".to_string();
        state.apply_snapshot(snapshot(&["a"], vec![]));
        assert_eq!(state.edit_buffer, "typing");
    }

    #[test]
    fn apply_snapshot_clamps_selection() {
        let mut state = ViewState::default();
        state.selected_winner = Some(5);
        state.apply_snapshot(snapshot(&[], vec![winner("a", 1, 1), winner("b", 1, 1)]));
        assert_eq!(state.selected_winner, Some(1));

        state.apply_snapshot(snapshot(&[], vec![]));
        assert_eq!(state.selected_winner, None);
    }

    #[test]
    fn spin_tick_updates_display() {
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::SpinTick("B2-John-Initech".to_string()));
        assert_eq!(state.display, "B2-John-Initech");
    }

    #[test]
    fn round_winner_shows_candidate() {
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::RoundWinner(winner("A1-Jane-Acme", 1, 1)));
        assert_eq!(state.display, "A1-Jane-Acme");
    }

    #[test]
    fn multi_winner_completion_opens_summary() {
        let mut state = ViewState::default();
        state.revealed = 3;
        apply_ui_update(
            &mut state,
            UiUpdate::DrawCompleted(vec![winner("a", 2, 1), winner("b", 2, 2)]),
        );
        assert!(state.show_summary);
        assert_eq!(state.revealed, 0);
        assert_eq!(state.last_batch.len(), 2);
    }

    #[test]
    fn single_winner_completion_keeps_summary_closed() {
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::DrawCompleted(vec![winner("a", 1, 1)]));
        assert!(!state.show_summary);
        assert_eq!(state.last_batch.len(), 1);
    }

    #[test]
    fn celebrate_launches_confetti() {
        let mut state = ViewState::new(&EffectsConfig {
            confetti_particles: 25,
        });
        apply_ui_update(&mut state, UiUpdate::Celebrate);
        assert_eq!(state.confetti.len(), 25);
    }

    #[test]
    fn notice_is_stored() {
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::Notice(Notice::error("boom")));
        assert_eq!(state.notice, Some(Notice::error("boom")));
    }

    #[test]
    fn help_text_follows_mode() {
        let mut state = ViewState::default();
        assert!(help_text(&state).contains("Space:Draw"));
        state.show_summary = true;
        assert!(help_text(&state).contains("Reveal"));
        state.confirm_quit = true;
        assert!(help_text(&state).contains("y:Quit"));
    }

    #[test]
    fn render_frame_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(120, 40);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.apply_snapshot(snapshot(&["a", "b"], vec![winner("x-Jane-y", 1, 1)]));
        state.last_batch = state.winners.clone();
        state.show_summary = true;
        state.confirm_quit = true;
        state.confetti.burst();
        terminal
            .draw(|frame| render_frame(frame, &state))
            .unwrap();
    }

    #[test]
    fn render_frame_fullscreen_and_import() {
        let backend = ratatui::backend::TestBackend::new(80, 24);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.fullscreen = true;
        state.import_mode = true;
        state.import_path = "people.csv".to_string();
        terminal
            .draw(|frame| render_frame(frame, &state))
            .unwrap();
    }
}
