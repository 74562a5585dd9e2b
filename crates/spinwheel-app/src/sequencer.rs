// Timed draw sequencing.
//
// A draw runs as its own task. It owns the `DrawSession` and both random
// generators, animates by sampling display values on a fixed interval, makes
// the actual selections, and streams `SequencerEvent`s back to the
// controller. The controller commits the finished session.

use std::time::Duration;

use rand::rngs::{SmallRng, StdRng};
use rand::{CryptoRng, Rng, SeedableRng};
use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::debug;

use spinwheel_core::config::{DrawConfig, DrawMode};
use spinwheel_core::draw::DrawSession;
use spinwheel_core::ledger::Winner;

/// Events sent from a running draw to the controller.
#[derive(Debug)]
pub enum SequencerEvent {
    /// A new value to show in the roller.
    Tick { draw_number: u64, display: String },
    /// A sequential round has been decided.
    RoundWinner { draw_number: u64, winner: Winner },
    /// Every winner has been drawn; the session is ready to commit.
    Finished(DrawSession),
}

/// Durations that shape a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub animation: Duration,
    pub tick: Duration,
    pub round_pause: Duration,
}

impl From<&DrawConfig> for Timing {
    fn from(config: &DrawConfig) -> Self {
        Timing {
            animation: config.animation(),
            tick: config.tick(),
            round_pause: config.round_pause(),
        }
    }
}

// ---------------------------------------------------------------------------
// Spin
// ---------------------------------------------------------------------------

/// A fixed-length animation: resolves after `duration`, waking every
/// `interval` until then.
///
/// ```ignore
/// let mut spin = Spin::start(Duration::from_secs(3), Duration::from_millis(50));
/// while spin.tick().await {
///     // show a new sample
/// }
/// ```
pub struct Spin {
    deadline: Instant,
    ticker: Interval,
    finished: bool,
}

impl Spin {
    pub fn start(duration: Duration, interval: Duration) -> Self {
        let now = Instant::now();
        let mut ticker = tokio::time::interval_at(now + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Spin {
            deadline: now + duration,
            ticker,
            finished: false,
        }
    }

    /// Wait for the next sample point.
    ///
    /// Returns `true` when the caller should show a sample, `false` once the
    /// spin has resolved. The tick that reaches the deadline still returns
    /// `true`; the call after it returns `false`.
    pub async fn tick(&mut self) -> bool {
        if self.finished {
            return false;
        }
        self.ticker.tick().await;
        if Instant::now() >= self.deadline {
            self.finished = true;
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Draw task
// ---------------------------------------------------------------------------

/// Run a draw to completion with OS-seeded generators.
pub async fn run_draw(session: DrawSession, timing: Timing, tx: mpsc::Sender<SequencerEvent>) {
    let mut selection_rng = StdRng::from_os_rng();
    let mut display_rng = SmallRng::from_os_rng();
    run_draw_with(session, timing, &mut selection_rng, &mut display_rng, tx).await;
}

/// Run a draw with caller-provided generators.
///
/// Stops early, without committing, if the controller hangs up.
pub async fn run_draw_with<S, D>(
    mut session: DrawSession,
    timing: Timing,
    selection_rng: &mut S,
    display_rng: &mut D,
    tx: mpsc::Sender<SequencerEvent>,
) where
    S: Rng + CryptoRng,
    D: Rng,
{
    let draw_number = session.draw_number();

    match session.mode() {
        DrawMode::Sequential => {
            let pause = session.requested() > 1;
            while !session.is_complete() {
                if !animate(&session, timing, display_rng, &tx).await {
                    return;
                }
                let Some(winner) = session.draw_one(selection_rng).cloned() else {
                    break;
                };
                if tx
                    .send(SequencerEvent::RoundWinner {
                        draw_number,
                        winner,
                    })
                    .await
                    .is_err()
                {
                    return;
                }
                if pause {
                    tokio::time::sleep(timing.round_pause).await;
                }
            }
        }
        DrawMode::Batch => {
            if !animate(&session, timing, display_rng, &tx).await {
                return;
            }
            session.draw_remaining(selection_rng);
        }
    }

    debug!("Draw {} sequence complete", draw_number);
    let _ = tx.send(SequencerEvent::Finished(session)).await;
}

/// One spin over the session's display candidates. Returns `false` if the
/// receiver is gone.
async fn animate<D: Rng>(
    session: &DrawSession,
    timing: Timing,
    display_rng: &mut D,
    tx: &mpsc::Sender<SequencerEvent>,
) -> bool {
    let draw_number = session.draw_number();
    let mut spin = Spin::start(timing.animation, timing.tick);
    while spin.tick().await {
        let Some(display) = session.sample_display(display_rng) else {
            continue;
        };
        let event = SequencerEvent::Tick {
            draw_number,
            display: display.to_string(),
        };
        if tx.send(event).await.is_err() {
            return false;
        }
    }
    true
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
