use actix_web::{HttpResponse, Responder, web};
use serde_json::json;

use crate::storage::{SqliteStore, WhitelistStore};

/// GET /whitelist — все слова вайтлиста.
pub async fn whitelist_list_handler() -> impl Responder {
    let store = match SqliteStore::open() {
        Ok(s) => s,
        Err(e) => return HttpResponse::InternalServerError().json(json!({"error": format!("{}", e)})),
    };
    match store.load_words() {
        Ok(words) => {
            let mut sorted: Vec<String> = words.into_iter().collect();
            sorted.sort();
            HttpResponse::Ok().json(json!({"count": sorted.len(), "words": sorted}))
        }
        Err(e) => HttpResponse::InternalServerError().json(json!({"error": format!("{}", e)})),
    }
}

/// POST /whitelist
/// Body: {"word": "..."}. Add-if-absent; the word is lowercased.
pub async fn whitelist_add_handler(body: web::Json<serde_json::Value>) -> impl Responder {
    let word = match body.get("word").and_then(|v| v.as_str()) {
        Some(w) if !w.trim().is_empty() => w.trim().to_string(),
        _ => return HttpResponse::BadRequest().json(json!({"error": "'word' is required"})),
    };

    let store = match SqliteStore::open() {
        Ok(s) => s,
        Err(e) => return HttpResponse::InternalServerError().json(json!({"error": format!("{}", e)})),
    };
    match store.add_word(&word) {
        Ok(added) => HttpResponse::Ok().json(json!({"status": "ok", "word": word.to_lowercase(), "added": added})),
        Err(e) => HttpResponse::InternalServerError().json(json!({"error": format!("{}", e)})),
    }
}
