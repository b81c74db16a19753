//! Сборка дерева плана из классифицированных записей экспорта.
//!
//! Легаси-коды (`Код`, `КодРодителя`, `КодБлока`, `КодОбъекта`) живут только
//! внутри одного прохода сборки как ключи соединения; наружу каждый узел
//! выходит со свежим UUID.

use std::collections::HashSet;

use uuid::Uuid;

use crate::models::{
    CellOwner, ChildCycle, ChildPlanString, ClockCell, CourseSlot, Cycle, Plan, PlanString,
    empty_matrix,
};
use crate::plx::records::{ATTR_PARENT, RawRecord, RecordSet};
use crate::plx::{LookupTables, attr_int};

const ATTR_CODE: &str = "Код";
const ATTR_IDENTIFICATOR: &str = "Идентификатор";
const ATTR_CYCLE: &str = "Цикл";
const ATTR_BLOCK: &str = "КодБлока";
const ATTR_DISCIPLINE: &str = "Дисциплина";
const ATTR_DISCIPLINE_CODE: &str = "ДисциплинаКод";
const ATTR_OBJECT: &str = "КодОбъекта";
const ATTR_WORK_TYPE: &str = "КодВидаРаботы";
const ATTR_HOUR_TYPE: &str = "КодТипаЧасов";
const ATTR_COURSE: &str = "Курс";
const ATTR_TERM: &str = "Семестр";
const ATTR_COUNT: &str = "Количество";

const ATTR_QUALIFICATION: &str = "Квалификация";
const ATTR_ADMISSION_YEAR: &str = "ГодНачалаПодготовки";
const ATTR_SPEC_CODE: &str = "Шифр";
const ATTR_NAME: &str = "Название";
const ATTR_DOC_DATE: &str = "ДатаДокумента";
const ATTR_GOS_TYPE: &str = "ТипГОСа";

/// Hour records count only when expressed in volume terms.
pub const VOLUME_HOURS_TYPE: &str = "Часы в объемных показателях";

/// Work types whose hour figures belong in the matrix; everything else in
/// the export (weeks, credit units, auxiliary markers) is noise.
pub const ALLOWED_WORK_TYPES: [&str; 6] = [
    "Всего часов",
    "Лекционные занятия",
    "Практические занятия",
    "Самостоятельная работа",
    "Консультации и промежуточная аттестация",
    "Курсовое проектирование",
];

/// Data-quality counters of one assembly pass. Orphans are dropped from the
/// tree but kept countable here so callers can surface them.
#[derive(Debug, Default)]
pub struct AssemblyReport {
    pub orphaned_cycles: usize,
    pub orphaned_strings: usize,
    pub duplicate_cell_ids: Vec<String>,
    pub skipped_hour_records: usize,
}

/// Resolves an hour record through the lookup tables and applies the hour
/// filter: count > 1, volume-basis hour type, allow-listed work type.
/// `None` means the record is noise.
fn resolve_hour_record(record: &RawRecord, lookups: &LookupTables) -> Option<(String, String, i64)> {
    let count = attr_int(&record.attrs, ATTR_COUNT)?;
    if count <= 1 {
        return None;
    }
    let hour_label = lookups.hour_type(&record.attr(ATTR_HOUR_TYPE)?)?;
    if hour_label != VOLUME_HOURS_TYPE {
        return None;
    }
    let work_label = lookups.work_type(&record.attr(ATTR_WORK_TYPE)?)?;
    if !ALLOWED_WORK_TYPES.contains(&work_label) {
        return None;
    }
    Some((work_label.to_string(), hour_label.to_string(), count))
}

/// The hour filter as a pure predicate (it is idempotent: re-applying it to
/// its own output rejects nothing).
pub fn hour_record_passes_filter(record: &RawRecord, lookups: &LookupTables) -> bool {
    resolve_hour_record(record, lookups).is_some()
}

fn plan_from_header(header: Option<&RawRecord>) -> Plan {
    let mut plan = Plan {
        id: Uuid::new_v4().to_string(),
        qualification: None,
        admission_year: None,
        specialization_code: None,
        name: None,
        create_date: None,
        gos_type: None,
        stady_plan: Vec::new(),
        warnings: false,
        warning_description: Vec::new(),
    };
    let header = match header {
        Some(h) => h,
        None => return plan,
    };

    plan.qualification = header.attr(ATTR_QUALIFICATION);
    plan.specialization_code = header.attr(ATTR_SPEC_CODE);
    plan.name = header.attr(ATTR_NAME);
    plan.gos_type = header.attr(ATTR_GOS_TYPE);

    if let Some(raw) = header.attr(ATTR_ADMISSION_YEAR) {
        match raw.parse::<i32>() {
            Ok(year) => plan.admission_year = Some(year),
            Err(_) => eprintln!("⚠ Год начала подготовки '{}' не распознан", raw),
        }
    }
    if let Some(raw) = header.attr(ATTR_DOC_DATE) {
        match chrono::NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S") {
            Ok(dt) => plan.create_date = Some(dt.date()),
            Err(e) => eprintln!("⚠ Ошибка преобразования даты '{}': {}", raw, e),
        }
    }
    plan
}

/// Assembles the canonical Plan tree:
/// 1. a Cycle per top-cycle record (legacy code kept for joins);
/// 2. child cycles joined under parents by `КодРодителя`;
/// 3. fresh UUIDs reassigned, legacy codes surviving only in locals;
/// 4. a PlanString per top-discipline record joined by `КодБлока`;
/// 5. ChildPlanStrings joined by `КодРодителя`;
/// 6. filtered hour records attached into matrix[course-1][term-1].
pub fn assemble(set: &RecordSet, lookups: &LookupTables) -> (Plan, AssemblyReport) {
    let mut report = AssemblyReport::default();
    let mut plan = plan_from_header(set.header.as_ref());

    // шаг 1: циклы с легаси-кодом в `id` до перевыдачи идентификаторов
    let mut plan_dict: Vec<Cycle> = Vec::new();
    for record in &set.top_cycles {
        plan_dict.push(Cycle {
            id: record.attr(ATTR_CODE).unwrap_or_default(),
            identificator: record.attr(ATTR_IDENTIFICATOR),
            cycles: record.attr(ATTR_CYCLE),
            children: Vec::new(),
            warnings: false,
            warning_description: Vec::new(),
        });
    }

    // шаг 2: дочерние циклы под родителей
    for record in &set.child_cycles {
        let parent_code = record.attr(ATTR_PARENT).unwrap_or_default();
        match plan_dict.iter_mut().find(|c| c.id == parent_code) {
            Some(parent) => parent.children.push(ChildCycle {
                id: record.attr(ATTR_CODE).unwrap_or_default(),
                identificator: record.attr(ATTR_IDENTIFICATOR),
                cycles: record.attr(ATTR_CYCLE),
                parent_id: parent_code,
                plans_of_string: Vec::new(),
                warnings: false,
                warning_description: Vec::new(),
            }),
            None => {
                eprintln!(
                    "⚠ Дочерний цикл '{}' ссылается на неизвестный родитель '{}' — запись отброшена",
                    record.attr(ATTR_CYCLE).unwrap_or_default(),
                    parent_code
                );
                report.orphaned_cycles += 1;
            }
        }
    }

    // шаги 3-6 одним проходом
    let mut matched_top = vec![false; set.top_strings.len()];
    let mut matched_child = vec![false; set.child_strings.len()];
    let mut seen_cell_ids: HashSet<String> = HashSet::new();

    for cycl in &mut plan_dict {
        cycl.id = Uuid::new_v4().to_string();
        for child in &mut cycl.children {
            let child_legacy = std::mem::replace(&mut child.id, Uuid::new_v4().to_string());
            child.parent_id = cycl.id.clone();

            for (i, string) in set.top_strings.iter().enumerate() {
                if string.attr(ATTR_BLOCK).as_deref() != Some(child_legacy.as_str()) {
                    continue;
                }
                matched_top[i] = true;
                let string_legacy = string.attr(ATTR_CODE).unwrap_or_default();
                let mut parent_string = PlanString {
                    id: Uuid::new_v4().to_string(),
                    discipline: string.attr(ATTR_DISCIPLINE),
                    code_of_discipline: string.attr(ATTR_DISCIPLINE_CODE),
                    code_of_cycle_block: child.id.clone(),
                    clock_cells: empty_matrix(),
                    children_strings: Vec::new(),
                    warnings: false,
                    warning_description: Vec::new(),
                };

                for (j, child_string) in set.child_strings.iter().enumerate() {
                    if child_string.attr(ATTR_PARENT).as_deref() != Some(string_legacy.as_str()) {
                        continue;
                    }
                    matched_child[j] = true;
                    let child_string_legacy = child_string.attr(ATTR_CODE).unwrap_or_default();
                    let mut child_string_object = ChildPlanString {
                        id: Uuid::new_v4().to_string(),
                        discipline: child_string.attr(ATTR_DISCIPLINE),
                        code_of_discipline: child_string.attr(ATTR_DISCIPLINE_CODE),
                        code_of_cycle_block: child.id.clone(),
                        parent_string_id: parent_string.id.clone(),
                        clock_cells: empty_matrix(),
                        warnings: false,
                        warning_description: Vec::new(),
                    };
                    attach_hours(
                        &mut child_string_object.clock_cells,
                        &child_string_legacy,
                        CellOwner::ChildPlanString(child_string_object.id.clone()),
                        &set.hours,
                        lookups,
                        &mut seen_cell_ids,
                        &mut report,
                    );
                    parent_string.children_strings.push(child_string_object);
                }

                attach_hours(
                    &mut parent_string.clock_cells,
                    &string_legacy,
                    CellOwner::PlanString(parent_string.id.clone()),
                    &set.hours,
                    lookups,
                    &mut seen_cell_ids,
                    &mut report,
                );
                child.plans_of_string.push(parent_string);
            }
        }
    }

    for (i, matched) in matched_top.iter().enumerate() {
        if !*matched {
            eprintln!(
                "⚠ Строка плана '{}' ссылается на неизвестный блок '{}' — запись отброшена",
                set.top_strings[i].attr(ATTR_DISCIPLINE).unwrap_or_default(),
                set.top_strings[i].attr(ATTR_BLOCK).unwrap_or_default()
            );
            report.orphaned_strings += 1;
        }
    }
    for (j, matched) in matched_child.iter().enumerate() {
        if !*matched {
            eprintln!(
                "⚠ Дочерняя строка '{}' ссылается на неизвестный родитель '{}' — запись отброшена",
                set.child_strings[j].attr(ATTR_DISCIPLINE).unwrap_or_default(),
                set.child_strings[j].attr(ATTR_PARENT).unwrap_or_default()
            );
            report.orphaned_strings += 1;
        }
    }

    plan.stady_plan = plan_dict;
    (plan, report)
}

fn attach_hours(
    matrix: &mut [CourseSlot],
    legacy_code: &str,
    owner: CellOwner,
    hours: &[RawRecord],
    lookups: &LookupTables,
    seen_cell_ids: &mut HashSet<String>,
    report: &mut AssemblyReport,
) {
    for record in hours {
        if record.attr(ATTR_OBJECT).as_deref() != Some(legacy_code) {
            continue;
        }
        let (work_label, hour_label, count) = match resolve_hour_record(record, lookups) {
            Some(resolved) => resolved,
            None => continue,
        };
        let course = attr_int(&record.attrs, ATTR_COURSE);
        let term = attr_int(&record.attrs, ATTR_TERM);
        let (course, term) = match (course, term) {
            (Some(c), Some(t)) if (1..=4).contains(&c) && (1..=2).contains(&t) => (c, t),
            _ => {
                eprintln!(
                    "⚠WARNING: Missing 'course' or 'term' in clock cell: объект '{}', курс {:?}, семестр {:?}",
                    legacy_code, course, term
                );
                report.skipped_hour_records += 1;
                continue;
            }
        };

        let id = record.attr(ATTR_CODE).unwrap_or_else(|| Uuid::new_v4().to_string());
        if !seen_cell_ids.insert(id.clone()) {
            eprintln!("⚠WARNING: Duplicate ClockCell ID detected: {}", id);
            report.duplicate_cell_ids.push(id.clone());
        }

        let cell = ClockCell::new(
            id,
            work_label,
            hour_label,
            course as u8,
            term as u8,
            count,
            owner.clone(),
        );
        matrix[course as usize - 1].terms[term as usize - 1].clock_cells.push(cell);
    }
}
