use std::collections::HashMap;

use rupcheck::models::{CellOwner, ClockCell, empty_matrix};
use rupcheck::plan::build_plan;
use rupcheck::plx::records::RawRecord;
use rupcheck::speller::NoopSpeller;
use rupcheck::storage::{PlanStore, SqliteStore, WhitelistStore};
use rupcheck::validators::WhitelistCache;

fn rec(tag: &str, attrs: &[(&str, &str)]) -> RawRecord {
    RawRecord {
        tag: tag.to_string(),
        attrs: attrs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect::<HashMap<_, _>>(),
    }
}

fn fixture() -> Vec<RawRecord> {
    vec![
        rec("ООП", &[
            ("Шифр", "09.02.07"),
            ("Название", "Информационные системы и программирование"),
            ("ДатаДокумента", "2023-06-30T00:00:00"),
        ]),
        rec("СправочникВидыРабот", &[("Код", "1"), ("Название", "Всего часов")]),
        rec("СправочникВидыРабот", &[("Код", "2"), ("Название", "Лекционные занятия")]),
        rec("СправочникТипаЧасов", &[("Код", "10"), ("Название", "Часы в объемных показателях")]),
        rec("ПланыЦиклы", &[("Код", "1"), ("Цикл", "Обязательная часть")]),
        rec("ПланыЦиклы", &[("Код", "11"), ("КодРодителя", "1"), ("Цикл", "Гуманитарный цикл")]),
        rec("ПланыСтроки", &[("Код", "100"), ("КодБлока", "11"), ("Дисциплина", "Основы философии"), ("ДисциплинаКод", "ОГСЭ.01")]),
        rec("ПланыСтроки", &[("Код", "200"), ("КодРодителя", "100"), ("Дисциплина", "Учебная практика"), ("ДисциплинаКод", "УП.01.01")]),
        rec("ПланыНовыеЧасы", &[("Код", "h1"), ("КодОбъекта", "100"), ("КодВидаРаботы", "1"), ("КодТипаЧасов", "10"), ("Курс", "1"), ("Семестр", "1"), ("Количество", "48")]),
        rec("ПланыНовыеЧасы", &[("Код", "h2"), ("КодОбъекта", "200"), ("КодВидаРаботы", "2"), ("КодТипаЧасов", "10"), ("Курс", "2"), ("Семестр", "2"), ("Количество", "24")]),
    ]
}

#[test]
fn test_replace_then_load_roundtrip() {
    let store = SqliteStore::open_in_memory().unwrap();
    let outcome = build_plan(fixture(), &NoopSpeller, &WhitelistCache::empty());
    store.replace_plan(&outcome.plan).unwrap();

    let loaded = store.load_plans().unwrap();
    assert_eq!(loaded.len(), 1);
    let plan = &loaded[0];
    assert_eq!(plan.id, outcome.plan.id);
    assert_eq!(plan.name.as_deref(), Some("Информационные системы и программирование"));
    assert_eq!(plan.create_date, outcome.plan.create_date);

    assert_eq!(plan.stady_plan.len(), 1);
    let cycle = &plan.stady_plan[0];
    assert_eq!(cycle.cycles.as_deref(), Some("Обязательная часть"));
    let child = &cycle.children[0];
    assert_eq!(child.parent_id, cycle.id);

    let string = &child.plans_of_string[0];
    assert_eq!(string.discipline.as_deref(), Some("Основы философии"));
    assert_eq!(string.code_of_discipline.as_deref(), Some("ОГСЭ.01"));
    assert_eq!(string.clock_cells[0].terms[0].clock_cells.len(), 1);
    assert_eq!(string.clock_cells[0].terms[0].clock_cells[0].count_of_clocks, 48);

    let child_string = &string.children_strings[0];
    assert_eq!(child_string.parent_string_id, string.id);
    let cell = &child_string.clock_cells[1].terms[1].clock_cells[0];
    assert_eq!(cell.count_of_clocks, 24);
    assert_eq!(cell.child_plan_string_id.as_deref(), Some(child_string.id.as_str()));
    assert!(cell.plan_string_id.is_none());
}

#[test]
fn test_new_plan_supersedes_previous_one() {
    let store = SqliteStore::open_in_memory().unwrap();

    let first = build_plan(fixture(), &NoopSpeller, &WhitelistCache::empty());
    store.replace_plan(&first.plan).unwrap();

    let second = build_plan(fixture(), &NoopSpeller, &WhitelistCache::empty());
    store.replace_plan(&second.plan).unwrap();

    let loaded = store.load_plans().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, second.plan.id);
    assert_ne!(loaded[0].id, first.plan.id);
}

#[test]
fn test_cell_without_owner_is_rejected() {
    let store = SqliteStore::open_in_memory().unwrap();
    let mut outcome = build_plan(fixture(), &NoopSpeller, &WhitelistCache::empty());

    // вручную ломаем инвариант владельца
    let mut broken = outcome.plan.stady_plan[0].children[0].plans_of_string[0].clock_cells[0]
        .terms[0]
        .clock_cells[0]
        .clone();
    broken.plan_string_id = None;
    broken.child_plan_string_id = None;
    assert!(broken.validate_owner().is_err());

    outcome.plan.stady_plan[0].children[0].plans_of_string[0].clock_cells[0].terms[0]
        .clock_cells[0] = broken;
    assert!(store.replace_plan(&outcome.plan).is_err());
}

#[test]
fn test_cell_with_two_owners_fails_validation() {
    let cell = ClockCell {
        id: "x".to_string(),
        type_of_work: "Всего часов".to_string(),
        type_of_hours: "Часы в объемных показателях".to_string(),
        course: 1,
        term: 1,
        count_of_clocks: 36,
        plan_string_id: Some("a".to_string()),
        child_plan_string_id: Some("b".to_string()),
    };
    assert!(cell.validate_owner().is_err());

    let ok = ClockCell::new(
        "y".to_string(),
        "Всего часов".to_string(),
        "Часы в объемных показателях".to_string(),
        1,
        1,
        36,
        CellOwner::PlanString("a".to_string()),
    );
    assert!(ok.validate_owner().is_ok());
}

#[test]
fn test_whitelist_add_if_absent() {
    let store = SqliteStore::open_in_memory().unwrap();
    assert!(store.add_word("ОПД").unwrap());
    // повторная вставка (в любом регистре) ничего не добавляет
    assert!(!store.add_word("опд").unwrap());
    assert!(!store.add_word(" ОПД ").unwrap());
    assert!(!store.add_word("").unwrap());

    let words = store.load_words().unwrap();
    assert_eq!(words.len(), 1);
    assert!(words.contains("опд"));
}

#[test]
fn test_matrix_survives_roundtrip_even_when_empty() {
    let store = SqliteStore::open_in_memory().unwrap();
    let mut records = fixture();
    // строка без часов
    records.push(rec("ПланыСтроки", &[("Код", "101"), ("КодБлока", "11"), ("Дисциплина", "История"), ("ДисциплинаКод", "ОГСЭ.02")]));
    let outcome = build_plan(records, &NoopSpeller, &WhitelistCache::empty());
    store.replace_plan(&outcome.plan).unwrap();

    let loaded = store.load_plans().unwrap();
    let strings = &loaded[0].stady_plan[0].children[0].plans_of_string;
    assert_eq!(strings.len(), 2);
    let empty_string = &strings[1];
    assert_eq!(empty_string.clock_cells.len(), empty_matrix().len());
    for course in &empty_string.clock_cells {
        assert_eq!(course.terms.len(), 2);
        for term in &course.terms {
            assert!(term.clock_cells.is_empty());
        }
    }
}
