//! Клиент удалённого сервиса проверки орфографии (Яндекс.Спеллер API).

use std::error::Error;
use std::time::Duration;

use serde::Deserialize;

/// One correction reported by the spelling service.
#[derive(Debug, Clone)]
pub struct SpellChange {
    pub word: String,
    pub suggestions: Vec<String>,
}

/// Injected spelling capability. The production implementation talks HTTP;
/// tests substitute their own.
pub trait Speller {
    fn spell(&self, text: &str) -> Result<Vec<SpellChange>, Box<dyn Error + Send + Sync>>;
}

/// Speller that never flags anything. Used when the remote service is
/// disabled (RUP_SPELLER_DISABLE) or unavailable at startup.
pub struct NoopSpeller;

impl Speller for NoopSpeller {
    fn spell(&self, _text: &str) -> Result<Vec<SpellChange>, Box<dyn Error + Send + Sync>> {
        Ok(Vec::new())
    }
}

pub const DEFAULT_SPELLER_URL: &str =
    "https://speller.yandex.net/services/spellservice.json/checkText";

/// HTTP client for the checkText endpoint. Blocking: spell checks run inside
/// the synchronous pipeline (the server wraps the whole pipeline in
/// `spawn_blocking`).
pub struct YandexSpeller {
    client: reqwest::blocking::Client,
    url: String,
}

#[derive(Deserialize)]
struct SpellerItem {
    word: String,
    #[serde(default)]
    s: Vec<String>,
}

impl YandexSpeller {
    /// Reads the endpoint from RUP_SPELLER_URL when set. Request timeout is
    /// short: a slow speller must not stall plan assembly.
    pub fn new() -> Result<Self, Box<dyn Error + Send + Sync>> {
        let _ = dotenv::dotenv();
        let url = std::env::var("RUP_SPELLER_URL").unwrap_or_else(|_| DEFAULT_SPELLER_URL.to_string());
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;
        Ok(YandexSpeller { client, url })
    }
}

impl Speller for YandexSpeller {
    fn spell(&self, text: &str) -> Result<Vec<SpellChange>, Box<dyn Error + Send + Sync>> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("text", text), ("lang", "ru,en")])
            .send()?;
        if !response.status().is_success() {
            return Err(format!("speller returned status {}", response.status()).into());
        }
        let items: Vec<SpellerItem> = response.json()?;
        Ok(items
            .into_iter()
            .map(|item| SpellChange { word: item.word, suggestions: item.s })
            .collect())
    }
}
