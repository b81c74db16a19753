//! Валидаторы плана: индексы дисциплин, суммы часов, орфография названий.

/// Последовательность индексов дисциплин
pub mod index;

/// Суммы часов по семестрам
pub mod hours;

/// Орфография названий + вайтлист
pub mod text;

pub use hours::validate_discipline_hours;
pub use index::{SequenceState, VALID_PREFIXES, validate_discipline_index};
pub use text::{WhitelistCache, validate_text};
