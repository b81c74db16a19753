//! Хранилище: SQLite-база с планами и вайтлистом слов.
//!
//! Семантика записи — bulk: перед загрузкой нового плана все таблицы плана
//! очищаются целиком, частичных обновлений нет. Подмодули:
//! - `plans`: трейт `PlanStore` + запись/чтение дерева плана
//! - `whitelist`: трейт `WhitelistStore` + слова вайтлиста

pub mod plans;
pub mod whitelist;

pub use plans::PlanStore;
pub use whitelist::WhitelistStore;

use std::error::Error;
use std::path::PathBuf;

use rusqlite::Connection;

/// Path to the SQLite database. Honors RUP_DB_PATH (.env supported).
pub fn db_path() -> PathBuf {
    let _ = dotenv::dotenv();
    match std::env::var("RUP_DB_PATH") {
        Ok(p) => PathBuf::from(p),
        Err(_) => PathBuf::from("data/rupcheck.db"),
    }
}

/// SQLite-backed store implementing both `PlanStore` and `WhitelistStore`.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (and initializes) the database at the configured path.
    pub fn open() -> Result<Self, Box<dyn Error + Send + Sync>> {
        let path = db_path();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let conn = Connection::open(path)?;
        let store = SqliteStore { conn };
        store.init_db()?;
        Ok(store)
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self, Box<dyn Error + Send + Sync>> {
        let conn = Connection::open_in_memory()?;
        let store = SqliteStore { conn };
        store.init_db()?;
        Ok(store)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn init_db(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS plans (
                id TEXT PRIMARY KEY,
                qualification TEXT,
                admission_year INTEGER,
                specialization_code TEXT,
                name TEXT,
                create_date TEXT,
                gos_type TEXT,
                warnings INTEGER NOT NULL DEFAULT 0,
                warning_description TEXT
            );

            CREATE TABLE IF NOT EXISTS cycles (
                id TEXT PRIMARY KEY,
                identificator TEXT,
                cycles TEXT,
                plan_id TEXT NOT NULL,
                warnings INTEGER NOT NULL DEFAULT 0,
                warning_description TEXT
            );

            CREATE TABLE IF NOT EXISTS child_cycles (
                id TEXT PRIMARY KEY,
                identificator TEXT,
                cycles TEXT,
                cycle_id TEXT NOT NULL,
                warnings INTEGER NOT NULL DEFAULT 0,
                warning_description TEXT
            );

            CREATE TABLE IF NOT EXISTS plan_strings (
                id TEXT PRIMARY KEY,
                discipline TEXT,
                code_of_discipline TEXT,
                child_cycle_id TEXT NOT NULL,
                warnings INTEGER NOT NULL DEFAULT 0,
                warning_description TEXT
            );

            CREATE TABLE IF NOT EXISTS child_plan_strings (
                id TEXT PRIMARY KEY,
                discipline TEXT,
                code_of_discipline TEXT,
                plan_string_id TEXT NOT NULL,
                warnings INTEGER NOT NULL DEFAULT 0,
                warning_description TEXT
            );

            CREATE TABLE IF NOT EXISTS clock_cells (
                id TEXT NOT NULL,
                type_of_work TEXT,
                type_of_hours TEXT,
                course INTEGER,
                term INTEGER,
                count_of_clocks INTEGER,
                plan_string_id TEXT,
                child_plan_string_id TEXT
            );

            CREATE TABLE IF NOT EXISTS whitelist_words (
                word TEXT PRIMARY KEY
            );",
        )?;
        Ok(())
    }
}
