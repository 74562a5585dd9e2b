// Drawing engine state: pool, ledger, and the Idle/Drawing state machine.
//
// One controller owns a `DrawEngine` and is the only writer. Every
// transition is a method call; observers get `EngineSnapshot` copies.

use tracing::{info, warn};

use crate::config::DrawMode;
use crate::draw::{DrawError, DrawSession};
use crate::ledger::{Ledger, Winner};
use crate::pool::{normalize, Pool};
use crate::protocol::{EngineSnapshot, Phase};

/// Roller text before the first draw.
pub const READY_DISPLAY: &str = "READY";

#[derive(Debug, Clone)]
pub struct DrawEngine {
    input_text: String,
    pool: Pool,
    ledger: Ledger,
    phase: Phase,
    display: String,
    winner_count: usize,
    /// Number of draws started; also the draw number of the in-flight one.
    draws_started: u64,
}

impl Default for DrawEngine {
    fn default() -> Self {
        DrawEngine::new(1)
    }
}

impl DrawEngine {
    pub fn new(winner_count: usize) -> Self {
        DrawEngine {
            input_text: String::new(),
            pool: Pool::default(),
            ledger: Ledger::new(),
            phase: Phase::Idle,
            display: READY_DISPLAY.to_string(),
            winner_count: winner_count.max(1),
            draws_started: 0,
        }
    }

    // --- accessors ---

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_drawing(&self) -> bool {
        self.phase == Phase::Drawing
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn winner_count(&self) -> usize {
        self.winner_count
    }

    /// Draw number of the in-flight draw, or of the last one when Idle.
    pub fn current_draw_number(&self) -> u64 {
        self.draws_started
    }

    // --- input ---

    /// Replace the raw participant text and rebuild the pool from it.
    ///
    /// Rejected while a draw is in flight.
    pub fn set_input(&mut self, text: impl Into<String>) -> Result<(), DrawError> {
        if self.is_drawing() {
            return Err(DrawError::Busy);
        }
        self.input_text = text.into();
        self.pool = normalize(&self.input_text);
        Ok(())
    }

    pub fn clear_input(&mut self) -> Result<(), DrawError> {
        self.set_input(String::new())
    }

    /// Replace the participant text with imported candidates, one per line.
    pub fn replace_with_candidates(&mut self, candidates: &[String]) -> Result<(), DrawError> {
        self.set_input(candidates.join("\n"))
    }

    // --- winner count stepper ---

    /// Set the winner count for the next draw. Values below 1 become 1;
    /// the upper bound is checked when the draw starts.
    pub fn set_winner_count(&mut self, count: usize) {
        self.winner_count = count.max(1);
    }

    pub fn increment_count(&mut self) {
        self.winner_count = self.winner_count.saturating_add(1);
    }

    pub fn decrement_count(&mut self) {
        self.winner_count = self.winner_count.saturating_sub(1).max(1);
    }

    // --- draw lifecycle ---

    /// Move from Idle to Drawing and hand out the session for the draw.
    ///
    /// Fails with [`DrawError::Busy`] while another draw is in flight, or
    /// with the precondition error for the current pool and count. A failed
    /// call changes nothing.
    pub fn begin_draw(&mut self, mode: DrawMode) -> Result<DrawSession, DrawError> {
        if self.is_drawing() {
            return Err(DrawError::Busy);
        }
        let session = DrawSession::new(
            &self.pool,
            self.winner_count,
            mode,
            self.draws_started + 1,
        )?;
        self.draws_started += 1;
        self.phase = Phase::Drawing;
        info!(
            "Draw {} started: {} of {} ({:?})",
            self.draws_started,
            self.winner_count,
            self.pool.len(),
            mode
        );
        Ok(session)
    }

    /// Update the roller value while spinning.
    pub fn set_display(&mut self, value: impl Into<String>) {
        self.display = value.into();
    }

    /// Commit a finished session: shrink the pool, append the batch to the
    /// ledger, rewrite the participant text, and return to Idle.
    ///
    /// Sessions that do not belong to the in-flight draw are discarded.
    pub fn finish_draw(&mut self, session: DrawSession) -> Vec<Winner> {
        if !self.is_drawing() || session.draw_number() != self.draws_started {
            warn!(
                "Discarding stale draw session {} (current draw {}, phase {:?})",
                session.draw_number(),
                self.draws_started,
                self.phase
            );
            return Vec::new();
        }

        let (winners, remaining) = session.into_parts();
        self.pool = remaining;
        self.input_text = self.pool.to_text();
        if let Some(last) = winners.last() {
            self.display = last.candidate.clone();
        }
        self.ledger.append(winners.iter().cloned());
        self.phase = Phase::Idle;

        info!(
            "Draw {} finished: {} winners, {} left in pool",
            self.draws_started,
            winners.len(),
            self.pool.len()
        );
        winners
    }

    /// Remove one winner from the ledger. The pool is not touched.
    pub fn remove_winner(&mut self, id: &str) -> Option<Winner> {
        self.ledger.remove(id)
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            phase: self.phase,
            display: self.display.clone(),
            input_text: self.input_text.clone(),
            pool: self.pool.entries().to_vec(),
            winners: self.ledger.winners().to_vec(),
            winner_count: self.winner_count,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn engine_with(text: &str, count: usize) -> DrawEngine {
        let mut engine = DrawEngine::new(count);
        engine.set_input(text).unwrap();
        engine
    }

    fn run_draw(engine: &mut DrawEngine, mode: DrawMode, seed: u64) -> Vec<Winner> {
        let mut session = engine.begin_draw(mode).unwrap();
        session.draw_remaining(&mut StdRng::seed_from_u64(seed));
        engine.finish_draw(session)
    }

    #[test]
    fn new_engine_is_idle_and_ready() {
        let engine = DrawEngine::default();
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.display(), READY_DISPLAY);
        assert!(engine.pool().is_empty());
        assert!(engine.ledger().is_empty());
        assert_eq!(engine.winner_count(), 1);
    }

    #[test]
    fn set_input_rebuilds_pool_wholesale() {
        let mut engine = engine_with("a\nb", 1);
        assert_eq!(engine.pool().len(), 2);
        engine.set_input(" c \n\n d \n e").unwrap();
        assert_eq!(engine.pool().entries(), &["c", "d", "e"]);
    }

    #[test]
    fn draw_updates_pool_ledger_and_text_together() {
        let mut engine = engine_with("a\nb\nc\nd\ne", 2);
        let winners = run_draw(&mut engine, DrawMode::Sequential, 1);

        assert_eq!(winners.len(), 2);
        assert_eq!(engine.pool().len(), 3);
        assert_eq!(engine.ledger().len(), 2);
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.input_text(), engine.pool().to_text());
        assert_eq!(engine.display(), winners[1].candidate);
        for w in &winners {
            assert!(!engine.pool().entries().contains(&w.candidate));
        }
    }

    #[test]
    fn insufficient_pool_changes_nothing() {
        let mut engine = engine_with("a\nb", 3);
        let before = engine.snapshot();
        let err = engine.begin_draw(DrawMode::Batch).unwrap_err();
        assert_eq!(
            err,
            DrawError::InsufficientPool {
                requested: 3,
                available: 2
            }
        );
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn empty_pool_rejected() {
        let mut engine = DrawEngine::new(1);
        assert_eq!(engine.begin_draw(DrawMode::Sequential).unwrap_err(), DrawError::EmptyPool);
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn reentrant_begin_is_busy() {
        let mut engine = engine_with("a\nb\nc", 1);
        let session = engine.begin_draw(DrawMode::Sequential).unwrap();
        assert_eq!(engine.begin_draw(DrawMode::Sequential).unwrap_err(), DrawError::Busy);
        assert_eq!(engine.phase(), Phase::Drawing);
        drop(session);
    }

    #[test]
    fn input_edits_rejected_while_drawing() {
        let mut engine = engine_with("a\nb\nc", 1);
        let mut session = engine.begin_draw(DrawMode::Sequential).unwrap();
        assert_eq!(engine.set_input("x"), Err(DrawError::Busy));
        assert_eq!(engine.clear_input(), Err(DrawError::Busy));
        assert_eq!(engine.pool().len(), 3);

        session.draw_remaining(&mut StdRng::seed_from_u64(2));
        engine.finish_draw(session);
        assert!(engine.set_input("x").is_ok());
    }

    #[test]
    fn stale_session_is_discarded() {
        let mut engine = engine_with("a\nb\nc", 1);
        let stale = DrawSession::new(engine.pool(), 1, DrawMode::Batch, 42).unwrap();
        assert!(engine.finish_draw(stale).is_empty());
        assert_eq!(engine.ledger().len(), 0);
        assert_eq!(engine.pool().len(), 3);
    }

    #[test]
    fn remove_winner_keeps_pool_size() {
        let mut engine = engine_with("a\nb\nc\nd", 2);
        let winners = run_draw(&mut engine, DrawMode::Batch, 9);
        let pool_len = engine.pool().len();

        let removed = engine.remove_winner(&winners[0].id).unwrap();
        assert_eq!(removed.id, winners[0].id);
        assert_eq!(engine.ledger().len(), 1);
        assert_eq!(engine.pool().len(), pool_len);
    }

    #[test]
    fn ledger_accumulates_across_draws() {
        let mut engine = engine_with("a\nb\nc\nd\ne\nf", 2);
        run_draw(&mut engine, DrawMode::Sequential, 1);
        run_draw(&mut engine, DrawMode::Batch, 2);
        assert_eq!(engine.ledger().len(), 4);
        assert_eq!(engine.pool().len(), 2);
        assert!(engine.ledger().last_batch().iter().all(|w| w.draw_number == 2));
    }

    #[test]
    fn winner_count_stepper_never_below_one() {
        let mut engine = DrawEngine::new(2);
        engine.decrement_count();
        engine.decrement_count();
        assert_eq!(engine.winner_count(), 1);
        engine.increment_count();
        assert_eq!(engine.winner_count(), 2);
        engine.set_winner_count(0);
        assert_eq!(engine.winner_count(), 1);
    }

    #[test]
    fn replace_with_candidates_round_trips() {
        let mut engine = DrawEngine::new(1);
        let rows = vec!["A1-Jane-Acme".to_string(), "B2-John-Initech".to_string()];
        engine.replace_with_candidates(&rows).unwrap();
        assert_eq!(engine.pool().entries(), rows.as_slice());
        assert_eq!(engine.input_text(), "A1-Jane-Acme\nB2-John-Initech");
    }
}
