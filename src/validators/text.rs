//! Проверка названий через сервис орфографии с фильтрацией по вайтлисту.

use std::collections::HashSet;
use std::error::Error;

use crate::speller::Speller;
use crate::storage::WhitelistStore;

/// Run-scoped whitelist of accepted words, loaded once per plan build and
/// reused for every node. Reload is explicit; nothing is cached globally.
#[derive(Debug, Default)]
pub struct WhitelistCache {
    words: HashSet<String>,
}

impl WhitelistCache {
    pub fn empty() -> Self {
        WhitelistCache { words: HashSet::new() }
    }

    pub fn load(store: &dyn WhitelistStore) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(WhitelistCache { words: store.load_words()? })
    }

    /// Manual invalidation: re-reads the store.
    pub fn reload(&mut self, store: &dyn WhitelistStore) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.words = store.load_words()?;
        Ok(())
    }

    /// Case-insensitive membership.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }
}

/// Spell-checks a free-text name. Corrections for whitelisted words are
/// dropped; the rest become warnings. A failing speller call degrades to "no
/// warnings" for this text — the run is never aborted over a remote service.
pub fn validate_text(text: &str, speller: &dyn Speller, whitelist: &WhitelistCache) -> Vec<String> {
    let changes = match speller.spell(text) {
        Ok(changes) => changes,
        Err(e) => {
            eprintln!("⚠ Проверка орфографии недоступна для '{}': {}", text, e);
            return Vec::new();
        }
    };

    let mut warnings: Vec<String> = Vec::new();
    for change in changes {
        if whitelist.contains(&change.word) {
            continue;
        }
        match best_suggestion(&change.word, &change.suggestions) {
            Some(suggestion) => warnings.push(format!(
                "Возможно ошибка в слове '{}' возможно это подходящее слово: {}",
                change.word, suggestion
            )),
            None => warnings.push(format!("Возможно ошибка в слове '{}'", change.word)),
        }
    }
    warnings
}

// the service returns suggestions unordered; take the closest one
fn best_suggestion<'a>(word: &str, suggestions: &'a [String]) -> Option<&'a str> {
    suggestions
        .iter()
        .max_by(|a, b| {
            strsim::jaro_winkler(word, a)
                .partial_cmp(&strsim::jaro_winkler(word, b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|s| s.as_str())
}
