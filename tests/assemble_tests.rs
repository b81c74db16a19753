use std::collections::HashMap;

use rupcheck::models::{COURSES, TERMS};
use rupcheck::plan::{assemble_plan, hour_record_passes_filter};
use rupcheck::plx::records::{RawRecord, classify};
use rupcheck::plx::LookupTables;

fn rec(tag: &str, attrs: &[(&str, &str)]) -> RawRecord {
    RawRecord {
        tag: tag.to_string(),
        attrs: attrs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect::<HashMap<_, _>>(),
    }
}

fn reference_records() -> Vec<RawRecord> {
    vec![
        rec("СправочникВидыРабот", &[("Код", "1"), ("Название", "Всего часов")]),
        rec("СправочникВидыРабот", &[("Код", "2"), ("Название", "Лекционные занятия")]),
        rec("СправочникВидыРабот", &[("Код", "3"), ("Название", "Практические занятия")]),
        rec("СправочникВидыРабот", &[("Код", "99"), ("Название", "Недели")]),
        rec("СправочникТипаЧасов", &[("Код", "10"), ("Название", "Часы в объемных показателях")]),
        rec("СправочникТипаЧасов", &[("Код", "20"), ("Название", "Недели в числовых показателях")]),
    ]
}

fn hour(object: &str, code: &str, work: &str, hours_type: &str, course: &str, term: &str, count: &str) -> RawRecord {
    rec(
        "ПланыНовыеЧасы",
        &[
            ("Код", code),
            ("КодОбъекта", object),
            ("КодВидаРаботы", work),
            ("КодТипаЧасов", hours_type),
            ("Курс", course),
            ("Семестр", term),
            ("Количество", count),
        ],
    )
}

#[test]
fn test_tree_shape_children_joined_by_legacy_code() {
    let mut records = reference_records();
    records.extend(vec![
        rec("ООП", &[("Шифр", "09.02.07"), ("Название", "Информационные системы")]),
        rec("ПланыЦиклы", &[("Код", "1"), ("Цикл", "Обязательная часть")]),
        rec("ПланыЦиклы", &[("Код", "2"), ("Цикл", "Вариативная часть")]),
        rec("ПланыЦиклы", &[("Код", "11"), ("КодРодителя", "1"), ("Цикл", "Гуманитарный цикл")]),
        rec("ПланыЦиклы", &[("Код", "12"), ("КодРодителя", "1"), ("Цикл", "Математический цикл")]),
        rec("ПланыСтроки", &[("Код", "100"), ("КодБлока", "11"), ("Дисциплина", "Основы философии"), ("ДисциплинаКод", "ОГСЭ.01")]),
        rec("ПланыСтроки", &[("Код", "200"), ("КодРодителя", "100"), ("Дисциплина", "Учебная практика"), ("ДисциплинаКод", "УП.01.01")]),
    ]);
    let set = classify(records);
    let lookups = LookupTables::from_records(&set.work_types, &set.hour_types);
    let (plan, report) = assemble_plan(&set, &lookups);

    assert_eq!(plan.stady_plan.len(), 2);
    let first = &plan.stady_plan[0];
    let second = &plan.stady_plan[1];
    assert_eq!(first.children.len(), 2);
    // цикл без подходящих детей остаётся с пустым списком
    assert_eq!(second.children.len(), 0);

    // легаси-коды не переживают сборку: везде свежие UUID
    assert_ne!(first.id, "1");
    let child = &first.children[0];
    assert_ne!(child.id, "11");
    assert_eq!(child.parent_id, first.id);

    let string = &child.plans_of_string[0];
    assert_eq!(string.discipline.as_deref(), Some("Основы философии"));
    assert_eq!(string.code_of_cycle_block, child.id);
    assert_eq!(string.children_strings.len(), 1);
    assert_eq!(string.children_strings[0].parent_string_id, string.id);

    assert_eq!(report.orphaned_cycles, 0);
    assert_eq!(report.orphaned_strings, 0);
}

#[test]
fn test_orphans_are_dropped_but_counted() {
    let mut records = reference_records();
    records.extend(vec![
        rec("ПланыЦиклы", &[("Код", "1"), ("Цикл", "Обязательная часть")]),
        rec("ПланыЦиклы", &[("Код", "77"), ("КодРодителя", "999"), ("Цикл", "Потерянный цикл")]),
        rec("ПланыСтроки", &[("Код", "100"), ("КодБлока", "888"), ("Дисциплина", "Потерянная строка")]),
        rec("ПланыСтроки", &[("Код", "200"), ("КодРодителя", "555"), ("Дисциплина", "Потерянная дочерняя")]),
    ]);
    let set = classify(records);
    let lookups = LookupTables::from_records(&set.work_types, &set.hour_types);
    let (plan, report) = assemble_plan(&set, &lookups);

    assert_eq!(plan.stady_plan.len(), 1);
    assert_eq!(plan.stady_plan[0].children.len(), 0);
    assert_eq!(report.orphaned_cycles, 1);
    assert_eq!(report.orphaned_strings, 2);
}

#[test]
fn test_matrix_shape_is_fixed_regardless_of_hours() {
    let mut records = reference_records();
    records.extend(vec![
        rec("ПланыЦиклы", &[("Код", "1"), ("Цикл", "Обязательная часть")]),
        rec("ПланыЦиклы", &[("Код", "11"), ("КодРодителя", "1"), ("Цикл", "Гуманитарный цикл")]),
        // без единой записи часов
        rec("ПланыСтроки", &[("Код", "100"), ("КодБлока", "11"), ("Дисциплина", "Основы философии")]),
        // с часами в одном семестре
        rec("ПланыСтроки", &[("Код", "101"), ("КодБлока", "11"), ("Дисциплина", "История")]),
    ]);
    records.push(hour("101", "h1", "1", "10", "2", "1", "36"));
    let set = classify(records);
    let lookups = LookupTables::from_records(&set.work_types, &set.hour_types);
    let (plan, _report) = assemble_plan(&set, &lookups);

    for string in &plan.stady_plan[0].children[0].plans_of_string {
        assert_eq!(string.clock_cells.len(), COURSES);
        for course in &string.clock_cells {
            assert_eq!(course.terms.len(), TERMS);
        }
    }

    let with_hours = &plan.stady_plan[0].children[0].plans_of_string[1];
    assert_eq!(with_hours.clock_cells[1].terms[0].clock_cells.len(), 1);
    let cell = &with_hours.clock_cells[1].terms[0].clock_cells[0];
    assert_eq!(cell.type_of_work, "Всего часов");
    assert_eq!(cell.count_of_clocks, 36);
    assert_eq!(cell.plan_string_id.as_deref(), Some(with_hours.id.as_str()));
    assert!(cell.child_plan_string_id.is_none());
    assert!(cell.validate_owner().is_ok());
}

#[test]
fn test_hour_filter_rejects_noise() {
    let set = classify(reference_records());
    let lookups = LookupTables::from_records(&set.work_types, &set.hour_types);

    // проходит: объёмные часы, известный вид работы, количество > 1
    assert!(hour_record_passes_filter(&hour("1", "a", "1", "10", "1", "1", "36"), &lookups));
    // количество 1 и 0 — шум
    assert!(!hour_record_passes_filter(&hour("1", "b", "1", "10", "1", "1", "1"), &lookups));
    assert!(!hour_record_passes_filter(&hour("1", "c", "1", "10", "1", "1", "0"), &lookups));
    // недельный тип часов — шум
    assert!(!hour_record_passes_filter(&hour("1", "d", "1", "20", "1", "1", "36"), &lookups));
    // вид работы вне списка
    assert!(!hour_record_passes_filter(&hour("1", "e", "99", "10", "1", "1", "36"), &lookups));
    // неизвестный код вида работы
    assert!(!hour_record_passes_filter(&hour("1", "f", "500", "10", "1", "1", "36"), &lookups));
}

#[test]
fn test_hour_filter_is_idempotent() {
    let set = classify(reference_records());
    let lookups = LookupTables::from_records(&set.work_types, &set.hour_types);

    let candidates = vec![
        hour("1", "a", "1", "10", "1", "1", "36"),
        hour("1", "b", "2", "10", "1", "1", "18"),
        hour("1", "c", "1", "20", "1", "1", "36"),
        hour("1", "d", "99", "10", "1", "1", "5"),
        hour("1", "e", "3", "10", "2", "2", "18"),
    ];
    let kept: Vec<&RawRecord> =
        candidates.iter().filter(|r| hour_record_passes_filter(r, &lookups)).collect();
    assert_eq!(kept.len(), 3);
    // повторное применение фильтра к его же выходу ничего не отбрасывает
    assert!(kept.iter().all(|r| hour_record_passes_filter(r, &lookups)));
}

#[test]
fn test_duplicate_cell_ids_are_kept_and_reported() {
    let mut records = reference_records();
    records.extend(vec![
        rec("ПланыЦиклы", &[("Код", "1"), ("Цикл", "Обязательная часть")]),
        rec("ПланыЦиклы", &[("Код", "11"), ("КодРодителя", "1"), ("Цикл", "Гуманитарный цикл")]),
        rec("ПланыСтроки", &[("Код", "100"), ("КодБлока", "11"), ("Дисциплина", "История")]),
    ]);
    // один и тот же Код у двух записей часов
    records.push(hour("100", "dup", "1", "10", "1", "1", "36"));
    records.push(hour("100", "dup", "2", "10", "1", "1", "18"));
    let set = classify(records);
    let lookups = LookupTables::from_records(&set.work_types, &set.hour_types);
    let (plan, report) = assemble_plan(&set, &lookups);

    let string = &plan.stady_plan[0].children[0].plans_of_string[0];
    // обе ячейки на месте, дедупликации нет
    assert_eq!(string.clock_cells[0].terms[0].clock_cells.len(), 2);
    assert_eq!(report.duplicate_cell_ids, vec!["dup".to_string()]);
}

#[test]
fn test_hours_with_bad_course_or_term_are_skipped() {
    let mut records = reference_records();
    records.extend(vec![
        rec("ПланыЦиклы", &[("Код", "1"), ("Цикл", "Обязательная часть")]),
        rec("ПланыЦиклы", &[("Код", "11"), ("КодРодителя", "1"), ("Цикл", "Гуманитарный цикл")]),
        rec("ПланыСтроки", &[("Код", "100"), ("КодБлока", "11"), ("Дисциплина", "История")]),
    ]);
    records.push(hour("100", "x1", "1", "10", "5", "1", "36")); // курс вне 1..4
    records.push(hour("100", "x2", "1", "10", "1", "3", "36")); // семестр вне 1..2
    let set = classify(records);
    let lookups = LookupTables::from_records(&set.work_types, &set.hour_types);
    let (plan, report) = assemble_plan(&set, &lookups);

    let string = &plan.stady_plan[0].children[0].plans_of_string[0];
    let total: usize = string
        .clock_cells
        .iter()
        .map(|c| c.terms.iter().map(|t| t.clock_cells.len()).sum::<usize>())
        .sum();
    assert_eq!(total, 0);
    assert_eq!(report.skipped_hour_records, 2);
}
