// --- Разбор и проверка учебных планов - главный файл ---

use rupcheck::run_server;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv::dotenv();
    let args: Vec<String> = std::env::args().collect();

    // одноразовый запуск: `rupcheck gg.plx`
    if let Some(file) = args.get(1) {
        let file = file.clone();
        let result = tokio::task::spawn_blocking(move || rupcheck::plan::run_pipeline(&file)).await;
        match result {
            Ok(Ok(summary)) => {
                println!("=== Итог разбора ===");
                println!(
                    "План {} | циклов: {}, подциклов: {}, дисциплин: {}, ячеек часов: {}",
                    summary.plan_id,
                    summary.cycles,
                    summary.child_cycles,
                    summary.disciplines,
                    summary.clock_cells
                );
                println!(
                    "Предупреждений: {} | потеряно циклов: {}, строк: {} | дубликатов ячеек: {}",
                    summary.warnings_total,
                    summary.orphaned_cycles,
                    summary.orphaned_strings,
                    summary.duplicate_cell_ids
                );
                return Ok(());
            }
            Ok(Err(e)) => {
                eprintln!("❌ Ошибка конвейера: {}", e);
                std::process::exit(1);
            }
            Err(e) => {
                eprintln!("❌ Ошибка выполнения: {}", e);
                std::process::exit(1);
            }
        }
    }

    println!("=== Сервис учебных планов (API) ===");
    let bind = std::env::var("RUP_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    println!("Запуск сервера на http://{}", bind);
    run_server(&bind).await
}
