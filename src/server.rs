use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use serde_json::json;

use crate::server_handlers::{
    datafiles_list_handler, datafiles_upload_handler, parse_handler, plan_handler,
    whitelist_add_handler, whitelist_list_handler,
};

pub async fn run_server(bind_addr: &str) -> std::io::Result<()> {
    HttpServer::new(|| {
        App::new()
            .wrap(Cors::permissive())
            .route("/parse", web::post().to(parse_handler))
            .route("/plan", web::get().to(plan_handler))
            .route("/whitelist", web::get().to(whitelist_list_handler))
            .route("/whitelist", web::post().to(whitelist_add_handler))
            .route("/datafiles", web::get().to(datafiles_list_handler))
            .route("/datafiles", web::post().to(datafiles_upload_handler))
            .route("/help", web::get().to(help_handler))
    })
    .bind(bind_addr)?
    .run()
    .await
}

async fn help_handler() -> impl Responder {
    let help = json!({
        "description": "API разбора и проверки учебных планов (.plx). POST /parse запускает конвейер на указанном файле; GET /plan возвращает сохранённый план из базы.",
        "post_parse_example": {"file": "gg.plx"},
        "post_whitelist_example": {"word": "опд"},
        "endpoints": [
            "POST /parse", "GET /plan",
            "GET /whitelist", "POST /whitelist",
            "GET /datafiles", "POST /datafiles (multipart)",
            "GET /help"
        ],
        "note": "Загрузка плана полностью замещает предыдущий: таблицы очищаются и наполняются заново."
    });
    HttpResponse::Ok().json(help)
}
