// Candidate pool: the ordered list of entries still eligible to be drawn.

use serde::{Deserialize, Serialize};

/// The ordered set of undrawn candidates.
///
/// Order is preserved from the input but carries no meaning. Duplicates are
/// allowed and each copy is an independent slot that can be drawn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    entries: Vec<String>,
}

impl Pool {
    pub fn new(entries: Vec<String>) -> Self {
        Pool { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Remove and return the entry at `index`, shifting later entries down.
    ///
    /// Returns `None` when `index` is out of bounds.
    pub fn take(&mut self, index: usize) -> Option<String> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    /// Join the pool back into line-delimited text.
    ///
    /// For a pool produced by [`normalize`], `normalize(&pool.to_text())`
    /// yields the same pool.
    pub fn to_text(&self) -> String {
        self.entries.join("\n")
    }
}

/// Parse raw line-delimited text into a pool.
///
/// Splits on line boundaries, trims each line and drops the empty ones.
/// Order is preserved; no deduplication or content validation happens here.
pub fn normalize(raw: &str) -> Pool {
    let entries = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    Pool { entries }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_drops_blank_lines() {
        let pool = normalize("  Alice \n\n\tBob\n   \nCarol  ");
        assert_eq!(pool.entries(), &["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn normalize_handles_crlf() {
        let pool = normalize("A1-Jane-Acme\r\nB2-John-Initech\r\n");
        assert_eq!(pool.entries(), &["A1-Jane-Acme", "B2-John-Initech"]);
    }

    #[test]
    fn normalize_keeps_duplicates_in_order() {
        let pool = normalize("Bob\nAlice\nBob");
        assert_eq!(pool.entries(), &["Bob", "Alice", "Bob"]);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn normalize_empty_text_gives_empty_pool() {
        assert!(normalize("").is_empty());
        assert!(normalize("\n \n\t\n").is_empty());
    }

    #[test]
    fn normalize_is_idempotent_on_normalized_text() {
        let text = "Alice\nBob\nCarol";
        let first = normalize(text);
        assert_eq!(first.to_text(), text);
        let second = normalize(&first.to_text());
        assert_eq!(first, second);
    }

    #[test]
    fn take_removes_single_slot() {
        let mut pool = normalize("Bob\nAlice\nBob");
        assert_eq!(pool.take(2).as_deref(), Some("Bob"));
        assert_eq!(pool.entries(), &["Bob", "Alice"]);
        assert_eq!(pool.take(5), None);
        assert_eq!(pool.len(), 2);
    }
}
