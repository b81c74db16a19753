//! Модуль `plx`: чтение экспорта .plx (dsMMISDB XML) в плоские записи.
//!
//! Подмодули:
//! - `io`: помощники для тегов и атрибутов
//! - `records`: чтение файла + классификация записей по корзинам
//! - `lookup`: справочники код→название (виды работ, типы часов)

mod io;

pub mod records;

pub mod lookup;

pub use io::{attr_int, attr_str, local_tag};
pub use lookup::LookupTables;
pub use records::{RawRecord, RecordSet, classify, read_plx_records};

use std::error::Error;
use std::path::PathBuf;

/// Resolves the directory holding the .plx exports.
/// Order: RUP_DATAFILES_DIR env var, then `datafiles/` next to the process,
/// then the current directory.
pub fn get_datafiles_dir() -> PathBuf {
    let _ = dotenv::dotenv();
    if let Ok(path) = std::env::var("RUP_DATAFILES_DIR") {
        let p = PathBuf::from(path);
        if p.exists() {
            return p;
        }
    }
    let local = PathBuf::from("datafiles");
    if local.exists() {
        return local;
    }
    PathBuf::from(".")
}

/// Resolves a datafile name ("gg.plx") against the datafiles directory.
/// Absolute paths and paths that already exist are taken as-is.
pub fn resolve_plx_path(name: &str) -> Result<PathBuf, Box<dyn Error + Send + Sync>> {
    let direct = PathBuf::from(name);
    if direct.is_absolute() || direct.exists() {
        return Ok(direct);
    }
    let candidate = get_datafiles_dir().join(name);
    if candidate.exists() {
        return Ok(candidate);
    }
    Err(format!("datafile '{}' not found (searched {:?})", name, get_datafiles_dir()).into())
}

/// Lists the .plx files available in the datafiles directory.
pub fn list_datafiles() -> Result<Vec<String>, Box<dyn Error + Send + Sync>> {
    let dir = get_datafiles_dir();
    let mut names: Vec<String> = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.to_lowercase().ends_with(".plx") {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}
