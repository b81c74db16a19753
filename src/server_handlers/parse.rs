use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use std::sync::{Arc, OnceLock};
use tokio::sync::Semaphore;

use crate::plan::run_pipeline;
use crate::storage::{PlanStore, SqliteStore};

/// POST /parse
/// Body: {"file": "gg.plx"}. Runs the full pipeline on the named datafile.
/// The pipeline is blocking (XML, SQLite, speller HTTP), so it goes through
/// `spawn_blocking` behind a core-count semaphore.
pub async fn parse_handler(body: web::Json<serde_json::Value>) -> impl Responder {
    let file = match body.get("file").and_then(|v| v.as_str()) {
        Some(f) if !f.trim().is_empty() => f.trim().to_string(),
        _ => return HttpResponse::BadRequest().json(json!({"error": "'file' is required"})),
    };

    static GLOBAL_SEM: OnceLock<Arc<Semaphore>> = OnceLock::new();
    let sem = GLOBAL_SEM
        .get_or_init(|| Arc::new(Semaphore::new(std::cmp::max(1, num_cpus::get()))))
        .clone();
    let permit = match sem.acquire_owned().await {
        Ok(p) => p,
        Err(_) => return HttpResponse::InternalServerError().json(json!({"error": "failed to acquire semaphore"})),
    };

    let blocking = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        run_pipeline(&file).map_err(|e| format!("{}", e))
    });

    match blocking.await {
        Ok(Ok(summary)) => HttpResponse::Ok().json(json!({"status": "ok", "summary": summary})),
        Ok(Err(e)) => HttpResponse::InternalServerError().json(json!({"status": "error", "error": e})),
        Err(e) => HttpResponse::InternalServerError().json(json!({"status": "error", "error": format!("join error: {}", e)})),
    }
}

/// GET /plan
/// Returns the stored plan(s) reassembled from the database.
pub async fn plan_handler() -> impl Responder {
    let loaded = tokio::task::spawn_blocking(|| -> Result<Vec<crate::models::Plan>, String> {
        let store = SqliteStore::open().map_err(|e| format!("{}", e))?;
        store.load_plans().map_err(|e| format!("{}", e))
    })
    .await;

    match loaded {
        Ok(Ok(plans)) => {
            if plans.is_empty() {
                return HttpResponse::NotFound().json(json!({"error": "no plan stored yet"}));
            }
            HttpResponse::Ok().json(plans)
        }
        Ok(Err(e)) => HttpResponse::InternalServerError().json(json!({"error": e})),
        Err(e) => HttpResponse::InternalServerError().json(json!({"error": format!("join error: {}", e)})),
    }
}
