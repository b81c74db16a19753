//! Модуль `plan`: сборка дерева, оркестрация валидации, экспорт/импорт JSON
//! и конвейер целиком (файл → дерево → база → plan.json).

/// Сборка дерева из классифицированных записей
pub mod assemble;

/// Оркестратор сборки и валидаторов
pub mod builder;

pub use assemble::{
    ALLOWED_WORK_TYPES, AssemblyReport, VOLUME_HOURS_TYPE, assemble as assemble_plan,
    hour_record_passes_filter,
};
pub use builder::{PlanOutcome, build_plan};

use std::error::Error;
use std::path::Path;

use serde::Serialize;

use crate::models::Plan;
use crate::plx::{read_plx_records, resolve_plx_path};
use crate::speller::{NoopSpeller, Speller, YandexSpeller};
use crate::storage::{PlanStore, SqliteStore};
use crate::validators::WhitelistCache;

/// Writes the assembled plan as pretty-printed JSON.
pub fn export_plan_json<P: AsRef<Path>>(plan: &Plan, path: P) -> Result<(), Box<dyn Error + Send + Sync>> {
    let text = serde_json::to_string_pretty(plan)?;
    std::fs::write(path, text)?;
    Ok(())
}

/// Reads a previously exported plan back.
pub fn load_plan_json<P: AsRef<Path>>(path: P) -> Result<Plan, Box<dyn Error + Send + Sync>> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Итог одного прогона конвейера (для CLI и ответа API).
#[derive(Debug, Serialize)]
pub struct PipelineSummary {
    pub plan_id: String,
    pub cycles: usize,
    pub child_cycles: usize,
    pub disciplines: usize,
    pub clock_cells: usize,
    pub warnings_total: usize,
    pub orphaned_cycles: usize,
    pub orphaned_strings: usize,
    pub duplicate_cell_ids: usize,
    pub export_path: String,
}

fn count_matrix_cells(matrix: &[crate::models::CourseSlot]) -> usize {
    matrix.iter().map(|c| c.terms.iter().map(|t| t.clock_cells.len()).sum::<usize>()).sum()
}

fn summarize(outcome: &PlanOutcome, export_path: &str) -> PipelineSummary {
    let plan = &outcome.plan;
    let mut child_cycles = 0;
    let mut disciplines = 0;
    let mut clock_cells = 0;
    let mut warnings_total = plan.warning_description.len();

    for cycle in &plan.stady_plan {
        warnings_total += cycle.warning_description.len();
        for child in &cycle.children {
            child_cycles += 1;
            warnings_total += child.warning_description.len();
            for string in &child.plans_of_string {
                disciplines += 1;
                warnings_total += string.warning_description.len();
                clock_cells += count_matrix_cells(&string.clock_cells);
                for child_string in &string.children_strings {
                    disciplines += 1;
                    warnings_total += child_string.warning_description.len();
                    clock_cells += count_matrix_cells(&child_string.clock_cells);
                }
            }
        }
    }

    PipelineSummary {
        plan_id: plan.id.clone(),
        cycles: plan.stady_plan.len(),
        child_cycles,
        disciplines,
        clock_cells,
        warnings_total,
        orphaned_cycles: outcome.report.orphaned_cycles,
        orphaned_strings: outcome.report.orphaned_strings,
        duplicate_cell_ids: outcome.report.duplicate_cell_ids.len(),
        export_path: export_path.to_string(),
    }
}

fn make_speller() -> Box<dyn Speller> {
    if std::env::var("RUP_SPELLER_DISABLE").is_ok() {
        return Box::new(NoopSpeller);
    }
    match YandexSpeller::new() {
        Ok(speller) => Box::new(speller),
        Err(e) => {
            eprintln!("⚠ Клиент спеллера не создан ({}), проверка орфографии выключена", e);
            Box::new(NoopSpeller)
        }
    }
}

/// Runs the whole pipeline on a named datafile: read records, build and
/// validate the plan, replace the stored one, export plan.json.
/// Blocking (file IO, SQLite, spell-check HTTP) — callers inside a runtime
/// wrap this in `spawn_blocking`.
pub fn run_pipeline(file_name: &str) -> Result<PipelineSummary, Box<dyn Error + Send + Sync>> {
    let path = resolve_plx_path(file_name)?;
    println!("Чтение экспорта: {:?}", path);
    let records = read_plx_records(&path)?;
    println!("✅ Прочитано записей: {}", records.len());

    let store = SqliteStore::open()?;
    let whitelist = WhitelistCache::load(&store)?;
    let speller = make_speller();

    let outcome = build_plan(records, speller.as_ref(), &whitelist);
    store.replace_plan(&outcome.plan)?;
    println!("✅ План '{}' загружен в базу", outcome.plan.id);

    let export_path = "plan.json";
    export_plan_json(&outcome.plan, export_path)?;
    println!("✅ Экспорт сохранён в {}", export_path);

    Ok(summarize(&outcome, export_path))
}
