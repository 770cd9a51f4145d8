//! Listener registry — which skill hears which words
//!
//! Insertion-ordered so dispatch order is deterministic; the order carries
//! no semantics but keeps tests and logs stable.

use super::WordListener;
use crate::error::SpeechError;
use indexmap::{IndexMap, IndexSet};
use std::sync::Arc;

/// Identity of a registered listener (the skill's name)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListenerId(String);

impl ListenerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ListenerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

struct Entry {
    words: IndexSet<String>,
    handler: Arc<dyn WordListener>,
}

/// Maps each subscribed skill to the set of words it cares about
#[derive(Default)]
pub struct ListenerRegistry {
    entries: IndexMap<ListenerId, Entry>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Register a listener, replacing any previous word set under the id
    pub fn add_listener(
        &mut self,
        id: ListenerId,
        words: Vec<String>,
        handler: Arc<dyn WordListener>,
    ) {
        let words: IndexSet<String> = words.into_iter().collect();
        tracing::debug!("Listener {} registered ({} words)", id, words.len());
        self.entries.insert(id, Entry { words, handler });
    }

    /// Remove a listener
    ///
    /// Removing an unregistered id indicates a lifecycle bug in the skill
    /// and fails; callers tearing down opportunistically must tolerate it.
    pub fn remove_listener(&mut self, id: &ListenerId) -> Result<(), SpeechError> {
        match self.entries.shift_remove(id) {
            Some(_) => {
                tracing::debug!("Listener {} removed", id);
                Ok(())
            }
            None => Err(SpeechError::UnknownListener(id.as_str().to_string())),
        }
    }

    /// Deduplicated union of every registered word set
    ///
    /// Order follows first registration of each word; empty when no
    /// listeners are registered.
    pub fn union_vocabulary(&self) -> Vec<String> {
        let mut union: IndexSet<&String> = IndexSet::new();
        for entry in self.entries.values() {
            union.extend(entry.words.iter());
        }
        union.into_iter().cloned().collect()
    }

    /// All listeners whose word set contains `word`, in registration order
    pub fn matching_listeners(&self, word: &str) -> Vec<(ListenerId, Arc<dyn WordListener>)> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.words.contains(word))
            .map(|(id, entry)| (id.clone(), entry.handler.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SkillError;

    struct NullListener;

    #[async_trait::async_trait]
    impl WordListener for NullListener {
        async fn word_recognized(
            &self,
            _word: &str,
            _all_candidates: &[String],
        ) -> Result<(), SkillError> {
            Ok(())
        }
    }

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    fn handler() -> Arc<dyn WordListener> {
        Arc::new(NullListener)
    }

    #[test]
    fn test_add_then_remove_leaves_registry_empty() {
        let mut registry = ListenerRegistry::new();
        registry.add_listener("leds".into(), words(&["rouge"]), handler());
        assert_eq!(registry.len(), 1);

        registry.remove_listener(&"leds".into()).unwrap();
        assert!(registry.is_empty());
        assert!(registry.union_vocabulary().is_empty());
    }

    #[test]
    fn test_remove_unknown_listener_fails() {
        let mut registry = ListenerRegistry::new();
        let result = registry.remove_listener(&"radio".into());
        assert!(matches!(result, Err(SpeechError::UnknownListener(id)) if id == "radio"));
    }

    #[test]
    fn test_reregistering_replaces_word_set() {
        let mut registry = ListenerRegistry::new();
        registry.add_listener("leds".into(), words(&["rouge", "vert"]), handler());
        registry.add_listener("leds".into(), words(&["bleu"]), handler());

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.union_vocabulary(), ["bleu"]);
        assert!(registry.matching_listeners("rouge").is_empty());
        assert_eq!(registry.matching_listeners("bleu").len(), 1);
    }

    #[test]
    fn test_union_vocabulary_deduplicates() {
        let mut registry = ListenerRegistry::new();
        registry.add_listener("leds".into(), words(&["rouge", "vert", "off"]), handler());
        registry.add_listener("radio".into(), words(&["radio", "off", "change"]), handler());

        assert_eq!(
            registry.union_vocabulary(),
            ["rouge", "vert", "off", "radio", "change"]
        );
    }

    #[test]
    fn test_matching_listeners_filters_and_keeps_order() {
        let mut registry = ListenerRegistry::new();
        registry.add_listener("leds".into(), words(&["rouge", "vert"]), handler());
        registry.add_listener("hue".into(), words(&["rouge", "bleu"]), handler());
        registry.add_listener("radio".into(), words(&["radio", "off"]), handler());

        let matches = registry.matching_listeners("rouge");
        let ids: Vec<&str> = matches.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, ["leds", "hue"]);

        assert!(registry.matching_listeners("inconnu").is_empty());
    }
}
