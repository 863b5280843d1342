//! Persistent player profile
//!
//! Two durable integers survive between sessions: the best score and the star
//! count. Loading and saving are best effort; a broken store never stops play.

pub mod store;

pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StorageError};

use serde::{Deserialize, Serialize};

/// Storage key for the best score
pub const HIGH_SCORE_KEY: &str = "high_score";
/// Storage key for the star count
pub const STARS_KEY: &str = "stars";

/// Profile loaded at startup and saved when a run ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistentState {
    pub high_score: u64,
    pub stars: u32,
}

impl PersistentState {
    /// Load from `store`, using 0 for anything missing or unreadable
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let state = Self {
            high_score: read_or_zero(store, HIGH_SCORE_KEY),
            stars: u32::try_from(read_or_zero(store, STARS_KEY)).unwrap_or(u32::MAX),
        };
        log::info!(
            "Loaded profile: high score {}, {} stars",
            state.high_score,
            state.stars
        );
        state
    }

    /// Merge a finished run: the best score only grows, stars are replaced
    pub fn record_run(&mut self, run_score: u64, run_stars: u32) {
        self.high_score = self.high_score.max(run_score);
        self.stars = run_stars;
    }

    /// Merge a finished run and write it out. Storage failures are logged.
    pub fn save<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
        run_score: u64,
        run_stars: u32,
    ) {
        self.record_run(run_score, run_stars);

        let high_score = i64::try_from(self.high_score).unwrap_or(i64::MAX);
        let result = store
            .set_int(HIGH_SCORE_KEY, high_score)
            .and_then(|()| store.set_int(STARS_KEY, i64::from(self.stars)));

        match result {
            Ok(()) => log::info!(
                "Profile saved: high score {}, {} stars",
                self.high_score,
                self.stars
            ),
            Err(e) => log::warn!("Could not save profile: {}", e),
        }
    }
}

fn read_or_zero<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> u64 {
    match store.get_int(key) {
        Ok(Some(value)) => u64::try_from(value).unwrap_or(0),
        Ok(None) => 0,
        Err(e) => {
            log::warn!("Could not read '{}', using 0: {}", key, e);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_defaults_to_zero() {
        let state = PersistentState::load(&MemoryStore::new());
        assert_eq!(state, PersistentState::default());

        let state = PersistentState::load(&MemoryStore::unavailable());
        assert_eq!(state, PersistentState::default());
    }

    #[test]
    fn test_load_reads_both_values() {
        let store = MemoryStore::new()
            .with_value(HIGH_SCORE_KEY, 1234)
            .with_value(STARS_KEY, 17);
        let state = PersistentState::load(&store);
        assert_eq!(state.high_score, 1234);
        assert_eq!(state.stars, 17);
    }

    #[test]
    fn test_save_keeps_best_and_replaces_stars() {
        let mut store = MemoryStore::new().with_value(HIGH_SCORE_KEY, 100);
        let mut state = PersistentState::load(&store);

        state.save(&mut store, 150, 3);
        assert_eq!(store.get_int(HIGH_SCORE_KEY).ok().flatten(), Some(150));
        assert_eq!(store.get_int(STARS_KEY).ok().flatten(), Some(3));

        state.save(&mut store, 50, 1);
        assert_eq!(state.high_score, 150);
        assert_eq!(state.stars, 1);
        assert_eq!(store.get_int(HIGH_SCORE_KEY).ok().flatten(), Some(150));
        assert_eq!(store.get_int(STARS_KEY).ok().flatten(), Some(1));
    }

    #[test]
    fn test_save_to_unavailable_store_still_updates_memory() {
        let mut store = MemoryStore::unavailable();
        let mut state = PersistentState::default();
        state.save(&mut store, 75, 2);
        assert_eq!(state.high_score, 75);
        assert_eq!(state.stars, 2);
    }

    #[test]
    fn test_negative_values_read_as_zero() {
        let store = MemoryStore::new().with_value(HIGH_SCORE_KEY, -5);
        assert_eq!(PersistentState::load(&store).high_score, 0);
    }
}
