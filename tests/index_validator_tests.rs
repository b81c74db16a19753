use rupcheck::validators::{SequenceState, validate_discipline_index};

fn check(state: &mut SequenceState, index: &str) -> Option<String> {
    validate_discipline_index(Some(index), state)
}

#[test]
fn test_missing_index() {
    let mut state = SequenceState::default();
    assert_eq!(
        validate_discipline_index(None, &mut state),
        Some("Индекс дисциплины отсутствует.".to_string())
    );
    assert_eq!(
        validate_discipline_index(Some("   "), &mut state),
        Some("Индекс дисциплины отсутствует.".to_string())
    );
}

#[test]
fn test_bad_format() {
    let mut state = SequenceState::default();
    for bad in ["Основы философии", "ПМ", "ПМ.", "ПМ.123", "ПМ.01.02.03", "пм.01"] {
        let msg = check(&mut state, bad).expect("ожидалась ошибка формата");
        assert!(msg.contains("Неверный формат индекса"), "{}", msg);
    }
}

#[test]
fn test_invalid_prefix() {
    let mut state = SequenceState::default();
    let msg = check(&mut state, "АБВ.01").unwrap();
    assert!(msg.contains("Недопустимый префикс 'АБВ'"), "{}", msg);
    assert!(msg.contains("ОГСЭ"), "{}", msg);
}

#[test]
fn test_single_component_sequence() {
    let mut state = SequenceState::default();
    assert_eq!(check(&mut state, "УП.1"), None);
    assert_eq!(check(&mut state, "УП.2"), None);
    let msg = check(&mut state, "УП.4").unwrap();
    assert!(msg.contains("Ожидается 'УП.3'"), "{}", msg);
    // состояние не сдвинулось: исправленный индекс продолжает ряд
    assert_eq!(check(&mut state, "УП.3"), None);
}

#[test]
fn test_single_component_must_start_at_one() {
    let mut state = SequenceState::default();
    let msg = check(&mut state, "ПМ.02").unwrap();
    assert!(msg.contains("Ожидается 'ПМ.01'"), "{}", msg);
}

#[test]
fn test_two_component_sequence_with_padding_echo() {
    let mut state = SequenceState::default();
    assert_eq!(check(&mut state, "УП.01.01"), None);
    assert_eq!(check(&mut state, "УП.01.02"), None);
    let msg = check(&mut state, "УП.01.04").unwrap();
    // ширина нулей повторяет первый увиденный индекс модуля
    assert!(msg.contains("Ожидается 'УП.01.03'"), "{}", msg);
}

#[test]
fn test_two_component_without_padding() {
    let mut state = SequenceState::default();
    assert_eq!(check(&mut state, "МДК.1.1"), None);
    let msg = check(&mut state, "МДК.1.3").unwrap();
    assert!(msg.contains("Ожидается 'МДК.1.2'"), "{}", msg);
}

#[test]
fn test_prefixes_are_independent() {
    let mut state = SequenceState::default();
    assert_eq!(check(&mut state, "ПП.1"), None);
    assert_eq!(check(&mut state, "УП.1"), None);
    assert_eq!(check(&mut state, "ПП.2"), None);
    assert_eq!(check(&mut state, "УП.2"), None);
}

#[test]
fn test_modules_are_independent() {
    let mut state = SequenceState::default();
    assert_eq!(check(&mut state, "МДК.01.01"), None);
    assert_eq!(check(&mut state, "МДК.01.02"), None);
    // новая подпоследовательность другого модуля начинается с 1
    assert_eq!(check(&mut state, "МДК.02.01"), None);
    let msg = check(&mut state, "МДК.02.03").unwrap();
    assert!(msg.contains("Ожидается 'МДК.02.02'"), "{}", msg);
}

#[test]
fn test_new_module_must_start_at_one() {
    let mut state = SequenceState::default();
    let msg = check(&mut state, "МДК.03.02").unwrap();
    assert!(msg.contains("Ожидается 'МДК.03.01'"), "{}", msg);
}

#[test]
fn test_single_after_double_is_mixing_error() {
    let mut state = SequenceState::default();
    assert_eq!(check(&mut state, "МДК.01.01"), None);
    let msg = check(&mut state, "МДК.1").unwrap();
    assert!(
        msg.contains("Индекс с одной цифрой не может идти после индекса с двумя"),
        "{}",
        msg
    );
}

#[test]
fn test_leading_zeros_compare_as_integers() {
    let mut state = SequenceState::default();
    // "ПМ.01" и "ПМ.2" продолжают один и тот же ряд
    assert_eq!(check(&mut state, "ПМ.01"), None);
    assert_eq!(check(&mut state, "ПМ.2"), None);
    assert_eq!(check(&mut state, "ПМ.03"), None);
}

#[test]
fn test_realistic_module_block() {
    let mut state = SequenceState::default();
    for index in [
        "ОГСЭ.01", "ОГСЭ.02", "ОГСЭ.03",
        "ЕН.01", "ЕН.02",
        "ПМ.01", "МДК.01.01", "МДК.01.02", "УП.01.01",
        "ПМ.02", "МДК.02.01",
    ] {
        assert_eq!(check(&mut state, index), None, "индекс {} должен проходить", index);
    }
}
