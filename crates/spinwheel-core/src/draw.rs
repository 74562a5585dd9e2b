// Winner selection: uniform draws without replacement from the pool.
//
// Every selection step samples an index in [0, working_len) from a
// cryptographically strong generator. Display sampling during a spin is
// cosmetic and takes any generator.

use rand::{CryptoRng, Rng};
use tracing::debug;

use crate::config::DrawMode;
use crate::ledger::Winner;
use crate::pool::Pool;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DrawError {
    #[error("there are no names left to draw")]
    EmptyPool,

    #[error("winner count must be at least 1")]
    InvalidCount,

    #[error("only {available} names left, cannot draw {requested}")]
    InsufficientPool { requested: usize, available: usize },

    #[error("a draw is already in progress")]
    Busy,
}

/// Check the draw preconditions against a pool.
pub fn validate_request(pool: &Pool, count: usize) -> Result<(), DrawError> {
    if pool.is_empty() {
        return Err(DrawError::EmptyPool);
    }
    if count == 0 {
        return Err(DrawError::InvalidCount);
    }
    if count > pool.len() {
        return Err(DrawError::InsufficientPool {
            requested: count,
            available: pool.len(),
        });
    }
    Ok(())
}

/// Uniform index in `[0, len)` from a cryptographically strong source.
///
/// `len` must be non-zero.
pub fn pick_index<R: Rng + CryptoRng>(rng: &mut R, len: usize) -> usize {
    rng.random_range(0..len)
}

/// Draw `count` winners from `pool` in one go.
///
/// Returns the winners in draw order together with the remaining pool. The
/// input pool is never modified, so a rejected request leaves no trace.
pub fn draw<R: Rng + CryptoRng>(
    pool: &Pool,
    count: usize,
    rng: &mut R,
) -> Result<(Vec<Winner>, Pool), DrawError> {
    let mut session = DrawSession::new(pool, count, DrawMode::Batch, 1)?;
    session.draw_remaining(rng);
    Ok(session.into_parts())
}

// ---------------------------------------------------------------------------
// DrawSession
// ---------------------------------------------------------------------------

/// An in-flight draw.
///
/// Holds a working copy of the pool so that nothing is committed until the
/// whole draw completes. Created by [`crate::engine::DrawEngine::begin_draw`]
/// and handed back to [`crate::engine::DrawEngine::finish_draw`].
#[derive(Debug, Clone)]
pub struct DrawSession {
    mode: DrawMode,
    draw_number: u64,
    requested: usize,
    /// Pool as it was when the draw started.
    original: Vec<String>,
    working: Pool,
    winners: Vec<Winner>,
}

impl DrawSession {
    pub fn new(
        pool: &Pool,
        count: usize,
        mode: DrawMode,
        draw_number: u64,
    ) -> Result<Self, DrawError> {
        validate_request(pool, count)?;
        Ok(DrawSession {
            mode,
            draw_number,
            requested: count,
            original: pool.entries().to_vec(),
            working: pool.clone(),
            winners: Vec::with_capacity(count),
        })
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn draw_number(&self) -> u64 {
        self.draw_number
    }

    pub fn requested(&self) -> usize {
        self.requested
    }

    pub fn winners(&self) -> &[Winner] {
        &self.winners
    }

    pub fn remaining_rounds(&self) -> usize {
        self.requested - self.winners.len()
    }

    pub fn is_complete(&self) -> bool {
        self.winners.len() == self.requested
    }

    /// Candidates shown while spinning: the shrinking working pool in
    /// sequential mode, the pool as it was at the start in batch mode.
    pub fn display_candidates(&self) -> &[String] {
        match self.mode {
            DrawMode::Sequential => self.working.entries(),
            DrawMode::Batch => &self.original,
        }
    }

    /// Pick a random display value. Has no effect on the outcome.
    pub fn sample_display<R: Rng>(&self, rng: &mut R) -> Option<&str> {
        let candidates = self.display_candidates();
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[rng.random_range(0..candidates.len())].as_str())
    }

    /// Draw the next winner and remove it from the working pool.
    ///
    /// Returns `None` once the requested count has been reached.
    pub fn draw_one<R: Rng + CryptoRng>(&mut self, rng: &mut R) -> Option<&Winner> {
        if self.is_complete() || self.working.is_empty() {
            return None;
        }
        let index = pick_index(rng, self.working.len());
        let candidate = self.working.take(index)?;
        let round = match self.mode {
            DrawMode::Sequential => self.winners.len() + 1,
            DrawMode::Batch => 1,
        };
        debug!(
            "Draw {} round {}: picked index {} ({})",
            self.draw_number, round, index, candidate
        );
        self.winners
            .push(Winner::new(candidate, self.draw_number, round));
        self.winners.last()
    }

    /// Draw every outstanding winner in a tight loop.
    pub fn draw_remaining<R: Rng + CryptoRng>(&mut self, rng: &mut R) -> &[Winner] {
        while self.draw_one(rng).is_some() {}
        &self.winners
    }

    /// Split into (winners, remaining pool).
    pub fn into_parts(self) -> (Vec<Winner>, Pool) {
        (self.winners, self.working)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::normalize;
    use rand::rngs::{SmallRng, StdRng};
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    /// Multiset of candidate strings.
    fn counts<'a>(items: impl IntoIterator<Item = &'a str>) -> HashMap<&'a str, usize> {
        let mut map = HashMap::new();
        for item in items {
            *map.entry(item).or_insert(0) += 1;
        }
        map
    }

    #[test]
    fn draw_shrinks_pool_by_count() {
        let pool = normalize("a\nb\nc\nd\ne");
        for count in 1..=pool.len() {
            let (winners, rest) = draw(&pool, count, &mut rng(count as u64)).unwrap();
            assert_eq!(winners.len(), count);
            assert_eq!(rest.len(), pool.len() - count);
        }
    }

    #[test]
    fn winners_and_remaining_partition_the_pool() {
        let pool = normalize("a\nb\nc\nd\ne\nf");
        let (winners, rest) = draw(&pool, 3, &mut rng(3)).unwrap();
        for w in &winners {
            assert!(!rest.entries().contains(&w.candidate));
        }
        let mut all: Vec<&str> = winners.iter().map(|w| w.candidate.as_str()).collect();
        all.extend(rest.entries().iter().map(String::as_str));
        all.sort();
        assert_eq!(all, vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn duplicates_are_independent_slots() {
        let pool = normalize("Bob\nBob\nAlice");
        let (winners, rest) = draw(&pool, 2, &mut rng(11)).unwrap();
        let mut combined = counts(winners.iter().map(|w| w.candidate.as_str()));
        for entry in rest.entries() {
            *combined.entry(entry.as_str()).or_insert(0) += 1;
        }
        assert_eq!(combined, counts(["Bob", "Bob", "Alice"]));
        assert_eq!(rest.len(), 1);
    }

    #[test]
    fn full_pool_draw_empties_it() {
        let pool = normalize("x\ny");
        let (winners, rest) = draw(&pool, 2, &mut rng(1)).unwrap();
        assert_eq!(winners.len(), 2);
        assert!(rest.is_empty());
    }

    #[test]
    fn count_larger_than_pool_rejected() {
        let pool = normalize("x\ny");
        let err = draw(&pool, 3, &mut rng(1)).unwrap_err();
        assert_eq!(
            err,
            DrawError::InsufficientPool {
                requested: 3,
                available: 2
            }
        );
        assert_eq!(err.to_string(), "only 2 names left, cannot draw 3");
    }

    #[test]
    fn empty_pool_rejected_for_any_count() {
        let pool = Pool::default();
        for count in 0..3 {
            assert_eq!(draw(&pool, count, &mut rng(1)).unwrap_err(), DrawError::EmptyPool);
        }
    }

    #[test]
    fn zero_count_rejected() {
        let pool = normalize("x");
        assert_eq!(draw(&pool, 0, &mut rng(1)).unwrap_err(), DrawError::InvalidCount);
    }

    #[test]
    fn same_seed_same_outcome() {
        let pool = normalize("a\nb\nc\nd\ne\nf\ng");
        let (w1, r1) = draw(&pool, 4, &mut rng(99)).unwrap();
        let (w2, r2) = draw(&pool, 4, &mut rng(99)).unwrap();
        let names1: Vec<_> = w1.iter().map(|w| &w.candidate).collect();
        let names2: Vec<_> = w2.iter().map(|w| &w.candidate).collect();
        assert_eq!(names1, names2);
        assert_eq!(r1, r2);
    }

    #[test]
    fn selection_is_roughly_uniform() {
        let pool = normalize("a\nb\nc\nd");
        let mut rng = rng(2024);
        let mut hits: HashMap<String, usize> = HashMap::new();
        let trials = 8000;
        for _ in 0..trials {
            let (winners, _) = draw(&pool, 1, &mut rng).unwrap();
            *hits.entry(winners[0].candidate.clone()).or_insert(0) += 1;
        }
        // Expected 2000 each; allow a wide band.
        for name in ["a", "b", "c", "d"] {
            let n = hits.get(name).copied().unwrap_or(0);
            assert!((1700..=2300).contains(&n), "{name} drawn {n} times");
        }
    }

    #[test]
    fn sequential_session_numbers_rounds() {
        let pool = normalize("a\nb\nc");
        let mut session = DrawSession::new(&pool, 3, DrawMode::Sequential, 4).unwrap();
        let mut rng = rng(5);
        for expected_round in 1..=3 {
            assert_eq!(session.display_candidates().len(), 4 - expected_round);
            let winner = session.draw_one(&mut rng).unwrap();
            assert_eq!(winner.round, expected_round);
            assert_eq!(winner.draw_number, 4);
        }
        assert!(session.is_complete());
        assert!(session.draw_one(&mut rng).is_none());
    }

    #[test]
    fn batch_session_displays_original_pool() {
        let pool = normalize("a\nb\nc");
        let mut session = DrawSession::new(&pool, 2, DrawMode::Batch, 1).unwrap();
        session.draw_remaining(&mut rng(8));
        assert_eq!(session.display_candidates().len(), 3);
        assert!(session.winners().iter().all(|w| w.round == 1));
        assert_eq!(session.remaining_rounds(), 0);
    }

    #[test]
    fn sample_display_draws_from_display_candidates() {
        let pool = normalize("a\nb\nc");
        let session = DrawSession::new(&pool, 1, DrawMode::Sequential, 1).unwrap();
        let mut display_rng = SmallRng::seed_from_u64(3);
        for _ in 0..20 {
            let shown = session.sample_display(&mut display_rng).unwrap();
            assert!(pool.entries().iter().any(|e| e == shown));
        }
    }

    #[test]
    fn draw_leaves_input_pool_untouched() {
        let pool = normalize("a\nb\nc");
        let before = pool.clone();
        let _ = draw(&pool, 2, &mut rng(1)).unwrap();
        let _ = draw(&pool, 9, &mut rng(1));
        assert_eq!(pool, before);
    }
}
