// Application state and orchestration logic.
//
// The central event loop that owns the drawing engine, applies user commands
// from the view, spawns draw tasks, and folds their events back into engine
// state. Every change is pushed to the view as a `UiUpdate`.

use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use spinwheel_core::config::{Config, DrawMode};
use spinwheel_core::draw::DrawError;
use spinwheel_core::engine::DrawEngine;
use spinwheel_core::ingest;
use spinwheel_core::protocol::{AppSnapshot, Cue, Notice, UiUpdate, UserCommand};

use crate::cues::CueSink;
use crate::sequencer::{self, SequencerEvent, Timing};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub engine: DrawEngine,
    pub muted: bool,
    cues: Arc<dyn CueSink>,
    /// Cloned into every spawned draw task.
    seq_tx: mpsc::Sender<SequencerEvent>,
    current_draw_task: Option<JoinHandle<()>>,
    /// Thins tick cues; not used for selection.
    cue_rng: SmallRng,
}

impl AppState {
    pub fn new(
        config: Config,
        cues: Arc<dyn CueSink>,
        seq_tx: mpsc::Sender<SequencerEvent>,
    ) -> Self {
        let engine = DrawEngine::new(config.draw.default_winner_count);
        let muted = config.audio.muted;
        AppState {
            config,
            engine,
            muted,
            cues,
            seq_tx,
            current_draw_task: None,
            cue_rng: SmallRng::from_os_rng(),
        }
    }

    pub fn build_snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            engine: self.engine.snapshot(),
            muted: self.muted,
            mode: self.config.draw.mode,
        }
    }

    /// Play a cue unless muted. Tick cues are thinned by the configured
    /// probability. Failures are logged and otherwise ignored.
    pub fn emit_cue(&mut self, cue: Cue) {
        if self.muted {
            return;
        }
        if cue == Cue::Tick {
            let p = self.config.audio.tick_probability;
            if p < 1.0 && !self.cue_rng.random_bool(p) {
                return;
            }
        }
        if let Err(e) = self.cues.play(cue) {
            debug!("Cue {:?} not played: {}", cue, e);
        }
    }

    /// Start a draw with the current pool and count.
    ///
    /// On success the engine is in Drawing and a task is streaming
    /// sequencer events. On failure nothing changed.
    pub fn start_draw(&mut self) -> Result<u64, DrawError> {
        let session = self.engine.begin_draw(self.config.draw.mode)?;
        let draw_number = session.draw_number();
        let timing = Timing::from(&self.config.draw);
        let tx = self.seq_tx.clone();

        self.current_draw_task = Some(tokio::spawn(sequencer::run_draw(session, timing, tx)));
        Ok(draw_number)
    }

    /// Abort the in-flight draw task, if any. Events it already queued are
    /// discarded by the draw number check.
    pub fn cancel_draw_task(&mut self) {
        if let Some(handle) = self.current_draw_task.take() {
            handle.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Listens on two channels using `tokio::select!`:
/// 1. User commands from the view
/// 2. Events from the running draw task
///
/// Pushes UI updates through `ui_tx` for the render loop.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut seq_rx: mpsc::Receiver<SequencerEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    let _ = ui_tx
        .send(UiUpdate::StateSnapshot(Box::new(state.build_snapshot())))
        .await;

    loop {
        tokio::select! {
            // --- User commands ---
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            // --- Draw task events ---
            // AppState holds a sender, so this channel never closes while
            // the loop runs.
            Some(event) = seq_rx.recv() => {
                handle_sequencer_event(&mut state, event, &ui_tx).await;
            }
        }
    }

    state.cancel_draw_task();
    info!("Application event loop exited");
    Ok(())
}

async fn send_snapshot(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let _ = ui_tx
        .send(UiUpdate::StateSnapshot(Box::new(state.build_snapshot())))
        .await;
}

async fn send_notice(ui_tx: &mpsc::Sender<UiUpdate>, notice: Notice) {
    let _ = ui_tx.send(UiUpdate::Notice(notice)).await;
}

/// Handle a user command from the view.
async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::SetInput(text) => {
            if let Err(e) = state.engine.set_input(text) {
                debug!("Input edit ignored: {}", e);
            }
        }
        UserCommand::ClearInput => match state.engine.clear_input() {
            Ok(()) => info!("Participant list cleared"),
            Err(e) => debug!("Reset ignored: {}", e),
        },
        UserCommand::ImportTable(path) => {
            if state.engine.is_drawing() {
                debug!("Import of {} ignored while drawing", path.display());
                send_notice(ui_tx, Notice::error(DrawError::Busy.to_string())).await;
                return;
            }
            match ingest::load_table_file(&path, &state.config.ingest) {
                Ok(candidates) => {
                    if let Err(e) = state.engine.replace_with_candidates(&candidates) {
                        debug!("Import ignored: {}", e);
                    } else {
                        send_notice(
                            ui_tx,
                            Notice::info(format!("Imported {} participants", candidates.len())),
                        )
                        .await;
                    }
                }
                Err(e) => {
                    warn!("CSV import from {} failed: {}", path.display(), e);
                    send_notice(ui_tx, Notice::error(format!("Failed to read CSV file: {e}")))
                        .await;
                }
            }
        }
        UserCommand::SetWinnerCount(n) => state.engine.set_winner_count(n),
        UserCommand::IncrementCount => state.engine.increment_count(),
        UserCommand::DecrementCount => state.engine.decrement_count(),
        UserCommand::Draw => match state.start_draw() {
            Ok(draw_number) => debug!("Draw {} task spawned", draw_number),
            Err(DrawError::Busy) => {
                debug!("Draw requested while drawing, ignored");
                return;
            }
            Err(e) => {
                info!("Draw rejected: {}", e);
                send_notice(ui_tx, Notice::error(e.to_string())).await;
            }
        },
        UserCommand::RemoveWinner(id) => match state.engine.remove_winner(&id) {
            Some(w) => info!("Removed winner {} ({})", w.candidate, w.id),
            None => debug!("No winner with id {}", id),
        },
        UserCommand::ToggleMute => {
            state.muted = !state.muted;
            info!("Audio {}", if state.muted { "muted" } else { "unmuted" });
        }
        UserCommand::CardRevealed => {
            state.emit_cue(Cue::RevealPop);
            return;
        }
        UserCommand::Quit => {
            // Handled in the main loop before reaching here.
            return;
        }
    }
    send_snapshot(state, ui_tx).await;
}

/// Handle an event from a draw task.
///
/// Events whose draw number does not match the in-flight draw come from a
/// cancelled task and are discarded.
async fn handle_sequencer_event(
    state: &mut AppState,
    event: SequencerEvent,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    let event_draw = match &event {
        SequencerEvent::Tick { draw_number, .. } => *draw_number,
        SequencerEvent::RoundWinner { draw_number, .. } => *draw_number,
        SequencerEvent::Finished(session) => session.draw_number(),
    };
    let current = state.engine.current_draw_number();
    if !state.engine.is_drawing() || event_draw != current {
        debug!(
            "Discarding stale sequencer event (event draw: {}, current draw: {})",
            event_draw, current
        );
        return;
    }

    match event {
        SequencerEvent::Tick { display, .. } => {
            state.engine.set_display(display.clone());
            state.emit_cue(Cue::Tick);
            let _ = ui_tx.send(UiUpdate::SpinTick(display)).await;
        }
        SequencerEvent::RoundWinner { winner, .. } => {
            info!("Round {} winner: {}", winner.round, winner.candidate);
            state.engine.set_display(winner.candidate.clone());
            state.emit_cue(Cue::Win);
            let _ = ui_tx.send(UiUpdate::RoundWinner(winner)).await;
            let _ = ui_tx.send(UiUpdate::Celebrate).await;
        }
        SequencerEvent::Finished(session) => {
            let batch = session.mode() == DrawMode::Batch;
            let winners = state.engine.finish_draw(session);
            state.current_draw_task = None;
            if batch && !winners.is_empty() {
                state.emit_cue(Cue::Win);
                let _ = ui_tx.send(UiUpdate::Celebrate).await;
            }
            let _ = ui_tx.send(UiUpdate::DrawCompleted(winners)).await;
            send_snapshot(state, ui_tx).await;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
