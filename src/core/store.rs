//! The static message store and per-frame sentiment filtering.
//!
//! Messages are authored content with a hand-tagged sentiment in [-1, 1].
//! The store is loaded once and never written; filtering happens every
//! frame against the current window.

use crate::core::sentiment::SentimentWindow;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An authored chat message with a precomputed sentiment tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    /// Authored emotional polarity in [-1, 1].
    pub sentiment: f64,
}

/// Ordered, immutable collection of authored messages.
#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    messages: Vec<Message>,
}

/// Built-in authored set spanning the sentiment range.
const BUILTIN_MESSAGES: &[(&str, f64)] = &[
    ("Perfection. No notes.", 1.0),
    ("This is the best stream I've seen all week!", 0.9),
    ("You are absolutely glowing today!", 0.85),
    ("Love this so much!", 0.8),
    ("You make this look easy!", 0.75),
    ("Great energy today!", 0.7),
    ("Chat is popping off!", 0.65),
    ("Looking good!", 0.6),
    ("Someone clip that!", 0.55),
    ("This is pretty fun.", 0.5),
    ("Nice one.", 0.4),
    ("That was kind of cool.", 0.3),
    ("Not bad at all.", 0.2),
    ("Interesting.", 0.1),
    ("Just got here. What's going on?", 0.0),
    ("It's fine, I guess.", -0.1),
    ("Why is everyone so quiet?", -0.15),
    ("Not sure about this one.", -0.2),
    ("Kind of a slow day, huh.", -0.3),
    ("Meh.", -0.4),
    ("Can we move on already?", -0.45),
    ("This isn't doing it for me.", -0.5),
    ("I've seen better.", -0.6),
    ("Really not feeling this.", -0.7),
    ("This is a mess.", -0.8),
    ("Worst feed ever.", -0.9),
    ("Absolutely dreadful.", -1.0),
];

impl MessageStore {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// The built-in authored message set.
    pub fn builtin() -> Self {
        Self {
            messages: BUILTIN_MESSAGES
                .iter()
                .map(|&(text, sentiment)| Message {
                    text: text.to_string(),
                    sentiment,
                })
                .collect(),
        }
    }

    /// Load a store from a JSON file holding an array of messages.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| StoreError::Io(e.to_string()))?;
        let messages: Vec<Message> =
            serde_json::from_str(&content).map_err(|e| StoreError::Parse(e.to_string()))?;
        Ok(Self { messages })
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages whose sentiment falls inside the window, in store order.
    ///
    /// `None` means no face has been observed yet; the full range applies.
    /// An empty store yields an empty result rather than an error.
    pub fn filter(&self, window: Option<&SentimentWindow>) -> Vec<&Message> {
        match window {
            Some(w) => self
                .messages
                .iter()
                .filter(|m| w.contains(m.sentiment))
                .collect(),
            None => self.messages.iter().collect(),
        }
    }
}

/// Message store errors.
#[derive(Debug)]
pub enum StoreError {
    Io(String),
    Parse(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "IO error: {e}"),
            StoreError::Parse(e) => write!(f, "Parse error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(scores: &[f64]) -> MessageStore {
        MessageStore::new(
            scores
                .iter()
                .map(|&sentiment| Message {
                    text: format!("message {sentiment}"),
                    sentiment,
                })
                .collect(),
        )
    }

    #[test]
    fn test_builtin_store_is_well_formed() {
        let store = MessageStore::builtin();
        assert!(!store.is_empty());
        assert!(store.messages().iter().all(|m| (-1.0..=1.0).contains(&m.sentiment)));
        assert!(store.messages().iter().any(|m| m.sentiment > 0.5));
        assert!(store.messages().iter().any(|m| m.sentiment < -0.5));
    }

    #[test]
    fn test_filter_is_inclusive_on_both_bounds() {
        // Window [-0.05, 0.15] over these scores admits exactly 0.
        let store = store_with(&[-1.0, -0.5, 0.0, 0.5, 1.0]);
        let window = SentimentWindow::from_expression(-0.05);
        assert_eq!(window.min(), -0.05);
        assert_eq!(window.max(), 0.15);

        let filtered = store.filter(Some(&window));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].sentiment, 0.0);

        // Scores landing exactly on a bound are admitted.
        let store = store_with(&[-0.05, 0.15]);
        assert_eq!(store.filter(Some(&window)).len(), 2);
    }

    #[test]
    fn test_filter_preserves_store_order() {
        let store = store_with(&[0.1, -0.05, 0.0, 0.15]);
        let window = SentimentWindow::from_expression(-0.05);
        let filtered = store.filter(Some(&window));
        let scores: Vec<f64> = filtered.iter().map(|m| m.sentiment).collect();
        assert_eq!(scores, vec![0.1, -0.05, 0.0, 0.15]);
    }

    #[test]
    fn test_no_window_passes_everything() {
        let store = store_with(&[-1.0, 0.0, 1.0]);
        assert_eq!(store.filter(None).len(), 3);
    }

    #[test]
    fn test_empty_store_filters_to_empty() {
        let store = MessageStore::default();
        let window = SentimentWindow::from_expression(0.0);
        assert!(store.filter(Some(&window)).is_empty());
        assert!(store.filter(None).is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("moodfeed-store-test.json");
        std::fs::write(
            &path,
            r#"[{"text": "hello", "sentiment": 0.5}, {"text": "ugh", "sentiment": -0.5}]"#,
        )
        .expect("Failed to write store file");

        let store = MessageStore::load(&path).expect("Failed to load store");
        assert_eq!(store.len(), 2);
        assert_eq!(store.messages()[0].text, "hello");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = MessageStore::load(Path::new("/nonexistent/messages.json"));
        assert!(matches!(result, Err(StoreError::Io(_))));
    }
}
