// Библиотека крейта `rupcheck`: разбор .plx-экспорта учебного плана,
// сборка канонического дерева, валидация и выгрузка в базу/JSON.
pub mod models;
pub mod plan;
pub mod plx;
pub mod server;
pub mod server_handlers;
pub mod speller;
pub mod storage;
pub mod validators;

/// Запуск HTTP-сервера (реэкспорт для `main`)
pub use server::run_server;
