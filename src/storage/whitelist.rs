use std::collections::HashSet;
use std::error::Error;

use rusqlite::params;

use crate::storage::SqliteStore;

/// Injected whitelist capability: the accepted-words set, queryable in bulk
/// and appendable one word at a time.
pub trait WhitelistStore {
    /// All words, lowercased.
    fn load_words(&self) -> Result<HashSet<String>, Box<dyn Error + Send + Sync>>;

    /// Add-if-absent; returns true when the word was actually inserted.
    fn add_word(&self, word: &str) -> Result<bool, Box<dyn Error + Send + Sync>>;
}

impl WhitelistStore for SqliteStore {
    fn load_words(&self) -> Result<HashSet<String>, Box<dyn Error + Send + Sync>> {
        let conn = self.connection();
        let mut stmt = conn.prepare("SELECT word FROM whitelist_words")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut words = HashSet::new();
        for word in rows {
            words.insert(word?.to_lowercase());
        }
        Ok(words)
    }

    fn add_word(&self, word: &str) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            return Ok(false);
        }
        let inserted = self
            .connection()
            .execute("INSERT OR IGNORE INTO whitelist_words (word) VALUES (?1)", params![word])?;
        Ok(inserted > 0)
    }
}
