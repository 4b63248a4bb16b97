//! Personal best score
//!
//! A single best result persisted under a fixed key. Older saves hold a bare
//! integer; newer ones a small record. Both load.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, KeyValueStore};

/// Storage key
pub const STORAGE_KEY: &str = "cyberGuardianHighScore";

/// The stored best result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub score: u64,
    /// Difficulty phase (1-4) reached in that session
    #[serde(default)]
    pub phase_reached: u8,
    #[serde(default)]
    pub max_combo: f64,
}

impl HighScoreRecord {
    pub fn new(score: u64) -> Self {
        Self {
            score,
            phase_reached: 0,
            max_combo: 0.0,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredHighScore {
    Legacy(u64),
    Record(HighScoreRecord),
}

impl From<StoredHighScore> for HighScoreRecord {
    fn from(stored: StoredHighScore) -> Self {
        match stored {
            StoredHighScore::Legacy(score) => HighScoreRecord::new(score),
            StoredHighScore::Record(record) => record,
        }
    }
}

/// Best score tracker
#[derive(Debug, Clone, Default)]
pub struct HighScore {
    best: Option<HighScoreRecord>,
}

impl HighScore {
    /// Create with no stored best
    pub fn new() -> Self {
        Self { best: None }
    }

    /// Load from the store; unreadable data counts as no high score
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match persistence::load_json::<StoredHighScore>(store, STORAGE_KEY) {
            Ok(Some(stored)) => {
                let best = HighScoreRecord::from(stored);
                log::info!("Loaded high score {}", best.score);
                Self { best: Some(best) }
            }
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Ignoring stored high score: {}", e);
                Self::new()
            }
        }
    }

    /// Best score so far (0 when none)
    pub fn best_score(&self) -> u64 {
        self.best.map(|r| r.score).unwrap_or(0)
    }

    pub fn record(&self) -> Option<&HighScoreRecord> {
        self.best.as_ref()
    }

    /// Strictly greater than the stored best
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best_score()
    }

    /// Keep `record` if it beats the best and persist it.
    /// Returns whether it became the new best.
    pub fn submit(&mut self, store: &mut dyn KeyValueStore, record: HighScoreRecord) -> bool {
        if !self.qualifies(record.score) {
            return false;
        }
        self.best = Some(record);
        match persistence::save_json(store, STORAGE_KEY, &record) {
            Ok(()) => log::info!("New high score saved ({})", record.score),
            Err(e) => log::warn!("Failed to save high score: {}", e),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn record(score: u64) -> HighScoreRecord {
        HighScoreRecord {
            score,
            phase_reached: 3,
            max_combo: 2.5,
        }
    }

    #[test]
    fn test_empty_store() {
        let store = MemoryStore::new();
        let hs = HighScore::load(&store);
        assert_eq!(hs.best_score(), 0);
        assert!(hs.record().is_none());
        assert!(!hs.qualifies(0));
        assert!(hs.qualifies(1));
    }

    #[test]
    fn test_legacy_integer_loads() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "450").unwrap();
        let hs = HighScore::load(&store);
        assert_eq!(hs.best_score(), 450);
        assert_eq!(hs.record().unwrap().phase_reached, 0);
    }

    #[test]
    fn test_record_roundtrip_through_store() {
        let mut store = MemoryStore::new();
        let mut hs = HighScore::load(&store);
        assert!(hs.submit(&mut store, record(320)));

        let reloaded = HighScore::load(&store);
        assert_eq!(reloaded.record(), Some(&record(320)));
    }

    #[test]
    fn test_only_strictly_greater_is_written() {
        let mut store = MemoryStore::new();
        let mut hs = HighScore::new();
        assert!(hs.submit(&mut store, record(300)));
        assert!(!hs.submit(&mut store, record(300)));
        assert!(!hs.submit(&mut store, record(120)));
        assert_eq!(HighScore::load(&store).best_score(), 300);

        assert!(hs.submit(&mut store, record(301)));
        assert_eq!(HighScore::load(&store).best_score(), 301);
    }

    #[test]
    fn test_zero_score_never_saved() {
        let mut store = MemoryStore::new();
        let mut hs = HighScore::new();
        assert!(!hs.submit(&mut store, record(0)));
        assert_eq!(store.get(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_garbage_falls_back() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "\"lots\"").unwrap();
        assert_eq!(HighScore::load(&store).best_score(), 0);
    }
}
