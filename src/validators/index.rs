//! Проверка индексов дисциплин ("ПМ.03", "МДК.01.02"): формат, допустимый
//! префикс и строгая последовательность нумерации внутри модуля.

use std::collections::HashMap;

/// Допустимые префиксы индексов дисциплин.
pub const VALID_PREFIXES: [&str; 9] =
    ["ОГСЭ", "ЕН", "ОПЦ", "ПЦ", "ПМ", "МДК", "УП", "ПП", "ПДП"];

/// Sequence accumulator for one assembly run. Single-component indices are
/// tracked per prefix, two-component indices per "PREFIX.<module>"; both maps
/// live in the same table because the key spaces cannot collide (prefix keys
/// contain no dot).
///
/// Numbers are compared as integers ("МДК.01" and "МДК.1" continue the same
/// sequence), but the textual width of the first-seen index is remembered so
/// expected values in messages echo the document's own padding convention.
#[derive(Debug, Default)]
pub struct SequenceState {
    entries: HashMap<String, SeqEntry>,
}

#[derive(Debug, Clone)]
struct SeqEntry {
    main: u32,
    secondary: Option<u32>,
    main_text: String,
    secondary_width: usize,
}

/// Разобранный индекс: префикс + одна или две числовые части.
struct ParsedIndex<'a> {
    prefix: &'a str,
    main: u32,
    main_text: &'a str,
    secondary: Option<u32>,
    secondary_text: Option<&'a str>,
}

fn parse_index(index: &str) -> Option<ParsedIndex<'_>> {
    let mut parts = index.split('.');
    let prefix = parts.next()?;
    if prefix.is_empty() || !prefix.chars().all(|c| c.is_alphabetic() && c.is_uppercase()) {
        return None;
    }
    let main_text = parts.next()?;
    let secondary_text = parts.next();
    if parts.next().is_some() {
        return None;
    }
    if !is_index_number(main_text) {
        return None;
    }
    if let Some(s) = secondary_text {
        if !is_index_number(s) {
            return None;
        }
    }
    Some(ParsedIndex {
        prefix,
        main: main_text.parse().ok()?,
        main_text,
        secondary: match secondary_text {
            Some(s) => Some(s.parse().ok()?),
            None => None,
        },
        secondary_text,
    })
}

// 1-2 цифры, ведущий ноль допустим
fn is_index_number(s: &str) -> bool {
    (1..=2).contains(&s.len()) && s.chars().all(|c| c.is_ascii_digit())
}

fn pad(n: u32, width: usize) -> String {
    format!("{:0width$}", n, width = width)
}

/// Validates one discipline index against the sequence seen so far.
///
/// Order-dependent: call in document traversal order. Returns at most one
/// message per call; on success the state is updated, on violation it is
/// left untouched so a later corrected index can still continue the
/// sequence.
pub fn validate_discipline_index(index: Option<&str>, state: &mut SequenceState) -> Option<String> {
    let index = match index.map(|s| s.trim()).filter(|s| !s.is_empty()) {
        Some(s) => s,
        None => return Some("Индекс дисциплины отсутствует.".to_string()),
    };

    let parsed = match parse_index(index) {
        Some(p) => p,
        None => {
            return Some(format!(
                "Неверный формат индекса '{}'. Ожидается формат 'Префикс.Число' или 'Префикс.Число.Число'.",
                index
            ));
        }
    };

    if !VALID_PREFIXES.contains(&parsed.prefix) {
        return Some(format!(
            "Недопустимый префикс '{}' в индексе '{}'. Допустимые префиксы: {}.",
            parsed.prefix,
            index,
            VALID_PREFIXES.join(", ")
        ));
    }

    match parsed.secondary {
        None => validate_single(index, &parsed, state),
        Some(sec) => validate_double(index, &parsed, sec, state),
    }
}

fn validate_single(index: &str, parsed: &ParsedIndex<'_>, state: &mut SequenceState) -> Option<String> {
    // после двусоставных индексов модуля односоставный недопустим
    let module_key = format!("{}.{}", parsed.prefix, parsed.main);
    if state.entries.contains_key(&module_key) {
        return Some(format!(
            "Неверная последовательность индекса '{}'. Индекс с одной цифрой не может идти после индекса с двумя.",
            index
        ));
    }

    // ширина нулей в ожидаемых значениях повторяет первый индекс ряда
    let stored_text = match state.entries.get(parsed.prefix) {
        None => {
            if parsed.main != 1 {
                return Some(format!(
                    "Неверная последовательность индекса '{}'. Ожидается '{}.{}'.",
                    index,
                    parsed.prefix,
                    pad(1, parsed.main_text.len())
                ));
            }
            parsed.main_text.to_string()
        }
        Some(prev) => {
            if parsed.main != prev.main + 1 {
                return Some(format!(
                    "Неверная последовательность индекса '{}'. Ожидается '{}.{}'.",
                    index,
                    parsed.prefix,
                    pad(prev.main + 1, prev.main_text.len())
                ));
            }
            prev.main_text.clone()
        }
    };

    state.entries.insert(
        parsed.prefix.to_string(),
        SeqEntry {
            main: parsed.main,
            secondary: None,
            main_text: stored_text,
            secondary_width: 1,
        },
    );
    None
}

fn validate_double(
    index: &str,
    parsed: &ParsedIndex<'_>,
    sec: u32,
    state: &mut SequenceState,
) -> Option<String> {
    let module_key = format!("{}.{}", parsed.prefix, parsed.main);
    let sec_text = parsed.secondary_text.unwrap_or("1");

    match state.entries.get(&module_key) {
        None => {
            // новая подпоследовательность модуля всегда начинается с 1
            if sec != 1 {
                return Some(format!(
                    "Неверная последовательность индекса '{}'. Ожидается '{}.{}.{}'.",
                    index,
                    parsed.prefix,
                    parsed.main_text,
                    pad(1, sec_text.len())
                ));
            }
            state.entries.insert(
                module_key,
                SeqEntry {
                    main: parsed.main,
                    secondary: Some(1),
                    main_text: parsed.main_text.to_string(),
                    secondary_width: sec_text.len(),
                },
            );
            None
        }
        Some(prev) => {
            let prev_sec = prev.secondary.unwrap_or(0);
            if sec != prev_sec + 1 {
                return Some(format!(
                    "Неверная последовательность индекса '{}'. Ожидается '{}.{}.{}'.",
                    index,
                    parsed.prefix,
                    prev.main_text,
                    pad(prev_sec + 1, prev.secondary_width)
                ));
            }
            let entry = SeqEntry {
                main: parsed.main,
                secondary: Some(sec),
                main_text: prev.main_text.clone(),
                secondary_width: prev.secondary_width,
            };
            state.entries.insert(module_key, entry);
            None
        }
    }
}
