//! Best runs of the session
//!
//! In-memory only; tracks the top 10 finished runs.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Out of lives
    Fell,
    /// Boss defeated
    Won,
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Height reached
    pub score: u32,
    pub level: u32,
    pub outcome: RunOutcome,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Add a finished run (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, score: u32, level: u32, outcome: RunOutcome) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            level,
            outcome,
        };

        // Sorted descending by score; ties keep the earlier run first
        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(pos + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Session best
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_descending() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(500, 3, RunOutcome::Fell), Some(1));
        assert_eq!(scores.add_score(900, 5, RunOutcome::Fell), Some(1));
        assert_eq!(scores.add_score(700, 4, RunOutcome::Fell), Some(2));
        assert_eq!(scores.add_score(700, 4, RunOutcome::Fell), Some(3));
        assert_eq!(scores.top_score(), Some(900));
    }

    #[test]
    fn test_zero_never_qualifies() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(0, 1, RunOutcome::Fell), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_table_is_capped() {
        let mut scores = HighScores::new();
        for score in 1..=MAX_HIGH_SCORES as u32 {
            scores.add_score(score * 100, 1, RunOutcome::Fell);
        }
        assert!(!scores.qualifies(100));
        assert_eq!(scores.add_score(50, 1, RunOutcome::Fell), None);
        assert_eq!(scores.add_score(20_000, 100, RunOutcome::Won), Some(1));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(200));
    }
}
