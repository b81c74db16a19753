//! Проверка часов: сумма детализированных ячеек за семестр должна совпадать
//! с итоговой ячейкой ("Всего часов").

use crate::models::CourseSlot;

/// Checks every populated (course, term) cell of a discipline-row matrix.
/// The largest count in a cell is taken as the declared aggregate; the sum
/// of the remaining counts must equal it. Returns one warning per violating
/// cell. Stateless across disciplines.
pub fn validate_discipline_hours(discipline: Option<&str>, matrix: &[CourseSlot]) -> Vec<String> {
    let name = discipline.unwrap_or("");
    let mut warnings: Vec<String> = Vec::new();

    for (course_index, course) in matrix.iter().enumerate() {
        for (term_index, term) in course.terms.iter().enumerate() {
            if term.clock_cells.is_empty() {
                continue;
            }
            let mut total_hours: i64 = 0;
            let mut max_hours: i64 = 0;
            for clock in &term.clock_cells {
                total_hours += clock.count_of_clocks;
                if clock.count_of_clocks > max_hours {
                    max_hours = clock.count_of_clocks;
                }
            }
            if total_hours - max_hours != max_hours {
                warnings.push(format!(
                    "Сумма часов по ячейкам ({}) не совпадает с итоговым количеством часов ({}) за семестр {} курса {} у дисциплины '{}'.",
                    total_hours - max_hours,
                    max_hours,
                    term_index + 1,
                    course_index + 1,
                    name
                ));
            }
        }
    }

    warnings
}
