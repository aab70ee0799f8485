use super::store::{KeyValueStore, StoreError};

pub const SOUND_ENABLED_KEY: &str = "soundEnabled";
pub const HIGH_SCORE_KEY: &str = "snakeHighScore";
pub const POPUP_MESSAGES_KEY: &str = "popupMessagesEnabled";

/// Typed view over the persisted preferences.
///
/// Values are read once when loaded and written through on every change.
pub struct Preferences {
    store: Box<dyn KeyValueStore + Send>,
    sound_enabled: bool,
    popup_messages_enabled: bool,
    high_score: u32,
}

impl Preferences {
    pub fn load(store: Box<dyn KeyValueStore + Send>) -> Self {
        let sound_enabled = parse_flag(&store.get_or(SOUND_ENABLED_KEY, "true"));
        let popup_messages_enabled = parse_flag(&store.get_or(POPUP_MESSAGES_KEY, "true"));
        let raw_score = store.get_or(HIGH_SCORE_KEY, "0");
        let high_score = raw_score.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(value = %raw_score, "stored high score is not a number, using 0");
            0
        });

        tracing::debug!(sound_enabled, popup_messages_enabled, high_score, "preferences loaded");
        Self {
            store,
            sound_enabled,
            popup_messages_enabled,
            high_score,
        }
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn popup_messages_enabled(&self) -> bool {
        self.popup_messages_enabled
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Flip the sound preference, returning the new value
    pub fn toggle_sound(&mut self) -> Result<bool, StoreError> {
        self.sound_enabled = !self.sound_enabled;
        self.store
            .set(SOUND_ENABLED_KEY, &self.sound_enabled.to_string())?;
        Ok(self.sound_enabled)
    }

    /// Flip the power-up banner preference, returning the new value
    pub fn toggle_popup_messages(&mut self) -> Result<bool, StoreError> {
        self.popup_messages_enabled = !self.popup_messages_enabled;
        self.store
            .set(POPUP_MESSAGES_KEY, &self.popup_messages_enabled.to_string())?;
        Ok(self.popup_messages_enabled)
    }

    /// Persist `score` if it beats the stored best
    pub fn record_high_score(&mut self, score: u32) -> Result<bool, StoreError> {
        if score <= self.high_score {
            return Ok(false);
        }
        self.high_score = score;
        self.store.set(HIGH_SCORE_KEY, &score.to_string())?;
        Ok(true)
    }
}

/// Anything other than an explicit "false" counts as enabled
fn parse_flag(value: &str) -> bool {
    value.trim() != "false"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::{JsonFileStore, MemoryStore};

    #[test]
    fn test_defaults_when_empty() {
        let prefs = Preferences::load(Box::new(MemoryStore::new()));
        assert!(prefs.sound_enabled());
        assert!(prefs.popup_messages_enabled());
        assert_eq!(prefs.high_score(), 0);
    }

    #[test]
    fn test_reads_existing_values() {
        let mut store = MemoryStore::new();
        store.set(SOUND_ENABLED_KEY, "false").unwrap();
        store.set(HIGH_SCORE_KEY, "340").unwrap();
        store.set(POPUP_MESSAGES_KEY, "yes").unwrap();

        let prefs = Preferences::load(Box::new(store));
        assert!(!prefs.sound_enabled());
        assert!(prefs.popup_messages_enabled());
        assert_eq!(prefs.high_score(), 340);
    }

    #[test]
    fn test_garbage_high_score_falls_back_to_zero() {
        let mut store = MemoryStore::new();
        store.set(HIGH_SCORE_KEY, "lots").unwrap();
        let prefs = Preferences::load(Box::new(store));
        assert_eq!(prefs.high_score(), 0);
    }

    #[test]
    fn test_record_high_score_only_increases() {
        let mut prefs = Preferences::load(Box::new(MemoryStore::new()));
        assert!(prefs.record_high_score(50).unwrap());
        assert!(!prefs.record_high_score(50).unwrap());
        assert!(!prefs.record_high_score(10).unwrap());
        assert_eq!(prefs.high_score(), 50);
    }

    #[test]
    fn test_changes_are_written_through() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");

        let mut prefs = Preferences::load(Box::new(JsonFileStore::open(&path)));
        assert!(!prefs.toggle_sound().unwrap());
        assert!(!prefs.toggle_popup_messages().unwrap());
        prefs.record_high_score(90).unwrap();

        let reloaded = Preferences::load(Box::new(JsonFileStore::open(&path)));
        assert!(!reloaded.sound_enabled());
        assert!(!reloaded.popup_messages_enabled());
        assert_eq!(reloaded.high_score(), 90);
    }
}
