// Result ledger: every winner drawn during the session, in draw order.

use chrono::{DateTime, Local};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Alphabet of winner identifiers (lowercase base 36).
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of a winner identifier.
pub const ID_LEN: usize = 9;

/// One drawn candidate. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    /// Local token used to address this entry for removal. Not a fairness
    /// or security value.
    pub id: String,
    /// The candidate string exactly as it appeared in the pool.
    pub candidate: String,
    pub drawn_at: DateTime<Local>,
    /// 1-based index of the draw invocation that produced this winner.
    pub draw_number: u64,
    /// 1-based round within that draw.
    pub round: usize,
}

impl Winner {
    pub fn new(candidate: String, draw_number: u64, round: usize) -> Self {
        Winner {
            id: generate_id(&mut rand::rng()),
            candidate,
            drawn_at: Local::now(),
            draw_number,
            round,
        }
    }

    /// The name part of an `id-name-org` candidate, or the whole candidate
    /// when it has no second segment.
    pub fn headline(&self) -> &str {
        self.candidate
            .split('-')
            .nth(1)
            .filter(|s| !s.is_empty())
            .unwrap_or(self.candidate.as_str())
    }
}

/// Generate a fresh winner identifier.
pub fn generate_id<R: Rng>(rng: &mut R) -> String {
    (0..ID_LEN)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// Append-only history of winners, with removal by identifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    winners: Vec<Winner>,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger::default()
    }

    /// Append a batch in draw order.
    pub fn append(&mut self, batch: impl IntoIterator<Item = Winner>) {
        self.winners.extend(batch);
    }

    /// Remove a single winner by identifier. The candidate is not returned
    /// to any pool. Unknown identifiers are a no-op.
    pub fn remove(&mut self, id: &str) -> Option<Winner> {
        let idx = self.winners.iter().position(|w| w.id == id)?;
        let removed = self.winners.remove(idx);
        debug!("Removed winner {} ({})", removed.id, removed.candidate);
        Some(removed)
    }

    pub fn len(&self) -> usize {
        self.winners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.winners.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Winner> {
        self.winners.iter()
    }

    pub fn winners(&self) -> &[Winner] {
        &self.winners
    }

    /// Winners of the most recent draw that still has entries in the ledger.
    pub fn last_batch(&self) -> &[Winner] {
        let Some(last) = self.winners.last() else {
            return &[];
        };
        let start = self
            .winners
            .iter()
            .rposition(|w| w.draw_number != last.draw_number)
            .map_or(0, |i| i + 1);
        &self.winners[start..]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
