use actix_multipart::Multipart;
use actix_web::{HttpResponse, Responder};
use futures_util::stream::StreamExt;
use serde_json::json;
use tokio::io::AsyncWriteExt;

use crate::plx::{get_datafiles_dir, list_datafiles};

/// GET /datafiles — имена доступных .plx файлов.
pub async fn datafiles_list_handler() -> impl Responder {
    match list_datafiles() {
        Ok(names) => HttpResponse::Ok().json(json!({"datafiles": names})),
        Err(e) => HttpResponse::InternalServerError().json(json!({"error": format!("failed to list datafiles: {}", e)})),
    }
}

/// POST /datafiles — multipart-загрузка новых .plx экспортов в каталог
/// данных. Файлы с другим расширением или подозрительным именем
/// пропускаются.
pub async fn datafiles_upload_handler(mut payload: Multipart) -> impl Responder {
    let base = get_datafiles_dir();
    if let Err(e) = std::fs::create_dir_all(&base) {
        return HttpResponse::InternalServerError().json(json!({"error": format!("failed to create datafiles dir: {}", e)}));
    }

    let mut saved: Vec<String> = Vec::new();
    let mut rejected: Vec<String> = Vec::new();

    while let Some(field_res) = payload.next().await {
        let mut field = match field_res {
            Ok(f) => f,
            Err(e) => {
                eprintln!("multipart field error: {}", e);
                continue;
            }
        };

        let filename = match field.content_disposition().get_filename() {
            Some(name) => name.to_string(),
            None => {
                rejected.push("<без имени>".to_string());
                continue;
            }
        };
        if filename.contains("..") || filename.contains('/') || !filename.to_lowercase().ends_with(".plx") {
            rejected.push(filename);
            continue;
        }

        let filepath = base.join(&filename);
        let mut file = match tokio::fs::File::create(&filepath).await {
            Ok(f) => f,
            Err(e) => {
                eprintln!("failed to create upload file {:?}: {}", filepath, e);
                rejected.push(filename);
                continue;
            }
        };

        let mut write_failed = false;
        while let Some(chunk) = field.next().await {
            let bytes = match chunk {
                Ok(b) => b,
                Err(e) => {
                    eprintln!("upload stream error: {}", e);
                    write_failed = true;
                    break;
                }
            };
            if let Err(e) = file.write_all(&bytes).await {
                eprintln!("failed to write upload chunk: {}", e);
                write_failed = true;
                break;
            }
        }

        if write_failed {
            rejected.push(filename);
        } else {
            saved.push(filename);
        }
    }

    HttpResponse::Ok().json(json!({"status": "ok", "saved": saved, "rejected": rejected}))
}
