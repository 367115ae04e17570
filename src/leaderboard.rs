//! Run leaderboard
//!
//! Persisted through the key-value store, tracks the top 10 runs by
//! level reached, then food collected.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StorageError};

/// Maximum number of entries to keep
pub const MAX_ENTRIES: usize = 10;
/// Maximum player name length (characters)
pub const MAX_NAME_LEN: usize = 15;
/// Name used when the player leaves theirs blank
pub const DEFAULT_NAME: &str = "PLAYER";

const FORMAT_VERSION: u8 = 1;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    /// Level reached
    pub level: u32,
    /// Food collected over the whole run
    pub food: u32,
}

impl LeaderboardEntry {
    /// Descending order by (level, food)
    fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .level
            .cmp(&self.level)
            .then_with(|| other.food.cmp(&self.food))
    }

    fn beats(&self, other: &Self) -> bool {
        (self.level, self.food) > (other.level, other.food)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    version: u8,
    entries: Vec<LeaderboardEntry>,
}

/// Bounded, sorted run leaderboard
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "warehouse_cat_leaderboard";

    pub fn new() -> Self {
        Self::default()
    }

    /// Build from arbitrary entries: names normalized, duplicates merged,
    /// sorted and truncated
    pub fn from_entries(entries: impl IntoIterator<Item = LeaderboardEntry>) -> Self {
        let mut board = Self::new();
        for entry in entries {
            board.upsert(entry);
        }
        board.normalize();
        board
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top(&self) -> Option<&LeaderboardEntry> {
        self.entries.first()
    }

    /// Record a finished run. The name keeps its best (level, food).
    /// Returns the 1-indexed rank of that name, or None if it fell off the board.
    pub fn record(&mut self, name: &str, level: u32, food: u32) -> Option<usize> {
        let entry = LeaderboardEntry {
            name: normalize_name(name),
            level,
            food,
        };
        let key = name_key(&entry.name);
        self.upsert(entry);
        self.normalize();
        self.entries
            .iter()
            .position(|e| name_key(&e.name) == key)
            .map(|i| i + 1)
    }

    fn upsert(&mut self, mut entry: LeaderboardEntry) {
        entry.name = normalize_name(&entry.name);
        let key = name_key(&entry.name);
        match self.entries.iter_mut().find(|e| name_key(&e.name) == key) {
            Some(existing) => {
                if entry.beats(existing) {
                    *existing = entry;
                }
            }
            None => self.entries.push(entry),
        }
    }

    fn normalize(&mut self) {
        self.entries.sort_by(LeaderboardEntry::rank_cmp);
        self.entries.truncate(MAX_ENTRIES);
    }

    /// Serialize into the versioned envelope
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&Envelope {
            version: FORMAT_VERSION,
            entries: self.entries.clone(),
        })
    }

    /// Parse the versioned envelope
    pub fn from_json(json: &str) -> Result<Option<Self>, serde_json::Error> {
        let envelope: Envelope = serde_json::from_str(json)?;
        if envelope.version != FORMAT_VERSION {
            log::warn!("Unsupported leaderboard version {}", envelope.version);
            return Ok(None);
        }
        Ok(Some(Self::from_entries(envelope.entries)))
    }

    /// Load from the store. Missing, unreadable or corrupt data is an empty board.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let json = match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => {
                log::info!("No leaderboard found, starting fresh");
                return Self::new();
            }
            Err(e) => {
                log::warn!("Leaderboard unavailable: {e}");
                return Self::new();
            }
        };

        match Self::from_json(&json) {
            Ok(Some(board)) => {
                log::info!("Loaded {} leaderboard entries", board.entries.len());
                board
            }
            Ok(None) => Self::new(),
            Err(e) => {
                log::warn!("Discarding corrupt leaderboard: {e}");
                Self::new()
            }
        }
    }

    /// Save to the store
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        let json = self.to_json()?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Leaderboard saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Trim and bound a display name
pub fn normalize_name(name: &str) -> String {
    let trimmed: String = name.trim().chars().take(MAX_NAME_LEN).collect();
    let trimmed = trimmed.trim_end().to_string();
    if trimmed.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        trimmed
    }
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn entry(name: &str, level: u32, food: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            name: name.to_string(),
            level,
            food,
        }
    }

    #[test]
    fn test_record_sorts_by_level_then_food() {
        let mut board = Leaderboard::new();
        board.record("ana", 2, 9);
        board.record("bo", 3, 1);
        board.record("cy", 2, 12);

        let names: Vec<_> = board.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["bo", "cy", "ana"]);
    }

    #[test]
    fn test_record_keeps_best_per_name() {
        let mut board = Leaderboard::new();
        assert_eq!(board.record("Ana", 3, 10), Some(1));
        assert_eq!(board.record(" ana ", 2, 40), Some(1));
        assert_eq!(board.entries().len(), 1);
        assert_eq!(board.entries()[0], entry("Ana", 3, 10));

        board.record("ANA", 3, 11);
        assert_eq!(board.entries().len(), 1);
        assert_eq!(board.entries()[0], entry("ANA", 3, 11));
    }

    #[test]
    fn test_truncates_to_max_entries() {
        let mut board = Leaderboard::new();
        for i in 0..15u32 {
            board.record(&format!("p{i}"), i, 0);
        }
        assert_eq!(board.entries().len(), MAX_ENTRIES);
        assert_eq!(board.top().map(|e| e.level), Some(14));
        // Below the cut
        assert_eq!(board.record("late", 0, 0), None);
    }

    #[test]
    fn test_name_is_bounded_and_defaulted() {
        assert_eq!(normalize_name("   "), DEFAULT_NAME);
        assert_eq!(normalize_name("abcdefghijklmnopqrstuvwxyz"), "abcdefghijklmno");
        assert_eq!(normalize_name("  gato  "), "gato");
    }

    #[test]
    fn test_store_roundtrip() {
        let mut store = MemoryStore::default();
        let mut board = Leaderboard::new();
        for (i, name) in ["a", "b", "c", "d"].iter().enumerate() {
            board.record(name, i as u32 + 1, 5 * i as u32);
        }
        board.save(&mut store).unwrap();

        let reloaded = Leaderboard::load(&store);
        assert_eq!(reloaded, board);
    }

    #[test]
    fn test_corrupt_payload_is_empty() {
        let mut store = MemoryStore::default();
        store.set(Leaderboard::STORAGE_KEY, "{\"version\":1,\"entries\":[{\"name\":").unwrap();
        assert!(Leaderboard::load(&store).is_empty());

        store.set(Leaderboard::STORAGE_KEY, r#"{"version":9,"entries":[]}"#).unwrap();
        assert!(Leaderboard::load(&store).is_empty());
    }

    #[test]
    fn test_load_bounds_and_sorts_foreign_data() {
        let entries: Vec<_> = (0..20).map(|i| entry(&format!("n{i}"), i % 4, i)).collect();
        let json = serde_json::to_string(&Envelope { version: 1, entries }).unwrap();
        let mut store = MemoryStore::default();
        store.set(Leaderboard::STORAGE_KEY, &json).unwrap();

        let board = Leaderboard::load(&store);
        assert_eq!(board.entries().len(), MAX_ENTRIES);
        assert!(
            board
                .entries()
                .windows(2)
                .all(|w| (w[0].level, w[0].food) >= (w[1].level, w[1].food))
        );
    }
}
