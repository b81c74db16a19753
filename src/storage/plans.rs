use std::error::Error;

use rusqlite::{Connection, params};

use crate::models::{
    ChildCycle, ChildPlanString, ClockCell, CourseSlot, Cycle, Plan, PlanString, TERMS, empty_matrix,
};
use crate::storage::SqliteStore;

/// Injected storage capability for assembled plans: clear everything, insert
/// the new tree, read it back. No partial updates.
pub trait PlanStore {
    fn replace_plan(&self, plan: &Plan) -> Result<(), Box<dyn Error + Send + Sync>>;
    fn load_plans(&self) -> Result<Vec<Plan>, Box<dyn Error + Send + Sync>>;
}

fn warnings_to_json(warnings: &[String]) -> Result<String, Box<dyn Error + Send + Sync>> {
    Ok(serde_json::to_string(warnings)?)
}

fn warnings_from_json(raw: Option<String>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str(&s).ok()).unwrap_or_default()
}

fn insert_cells(
    conn: &Connection,
    matrix: &[CourseSlot],
) -> Result<(), Box<dyn Error + Send + Sync>> {
    for course in matrix {
        for term in &course.terms {
            for cell in &term.clock_cells {
                cell.validate_owner().map_err(|e| -> Box<dyn Error + Send + Sync> { e.into() })?;
                conn.execute(
                    "INSERT INTO clock_cells (
                        id, type_of_work, type_of_hours, course, term,
                        count_of_clocks, plan_string_id, child_plan_string_id
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        cell.id,
                        cell.type_of_work,
                        cell.type_of_hours,
                        cell.course,
                        cell.term,
                        cell.count_of_clocks,
                        cell.plan_string_id,
                        cell.child_plan_string_id,
                    ],
                )?;
            }
        }
    }
    Ok(())
}

impl PlanStore for SqliteStore {
    /// Bulk clear then bulk insert: a freshly assembled plan supersedes the
    /// stored one entirely.
    fn replace_plan(&self, plan: &Plan) -> Result<(), Box<dyn Error + Send + Sync>> {
        let conn = self.connection();
        let tx = conn.unchecked_transaction()?;

        tx.execute_batch(
            "DELETE FROM clock_cells;
             DELETE FROM child_plan_strings;
             DELETE FROM plan_strings;
             DELETE FROM child_cycles;
             DELETE FROM cycles;
             DELETE FROM plans;",
        )?;

        tx.execute(
            "INSERT INTO plans (
                id, qualification, admission_year, specialization_code,
                name, create_date, gos_type, warnings, warning_description
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                plan.id,
                plan.qualification,
                plan.admission_year,
                plan.specialization_code,
                plan.name,
                plan.create_date.map(|d| d.to_string()),
                plan.gos_type,
                plan.warnings,
                warnings_to_json(&plan.warning_description)?,
            ],
        )?;

        for cycle in &plan.stady_plan {
            tx.execute(
                "INSERT INTO cycles (id, identificator, cycles, plan_id, warnings, warning_description)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    cycle.id,
                    cycle.identificator,
                    cycle.cycles,
                    plan.id,
                    cycle.warnings,
                    warnings_to_json(&cycle.warning_description)?,
                ],
            )?;
            for child in &cycle.children {
                tx.execute(
                    "INSERT INTO child_cycles (id, identificator, cycles, cycle_id, warnings, warning_description)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        child.id,
                        child.identificator,
                        child.cycles,
                        cycle.id,
                        child.warnings,
                        warnings_to_json(&child.warning_description)?,
                    ],
                )?;
                for string in &child.plans_of_string {
                    tx.execute(
                        "INSERT INTO plan_strings (id, discipline, code_of_discipline, child_cycle_id, warnings, warning_description)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                        params![
                            string.id,
                            string.discipline,
                            string.code_of_discipline,
                            child.id,
                            string.warnings,
                            warnings_to_json(&string.warning_description)?,
                        ],
                    )?;
                    insert_cells(&tx, &string.clock_cells)?;
                    for child_string in &string.children_strings {
                        tx.execute(
                            "INSERT INTO child_plan_strings (id, discipline, code_of_discipline, plan_string_id, warnings, warning_description)
                             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                            params![
                                child_string.id,
                                child_string.discipline,
                                child_string.code_of_discipline,
                                string.id,
                                child_string.warnings,
                                warnings_to_json(&child_string.warning_description)?,
                            ],
                        )?;
                        insert_cells(&tx, &child_string.clock_cells)?;
                    }
                }
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// Reassembles stored rows back into Plan trees (insertion order
    /// preserved via rowid).
    fn load_plans(&self) -> Result<Vec<Plan>, Box<dyn Error + Send + Sync>> {
        let conn = self.connection();

        let mut plans: Vec<Plan> = {
            let mut stmt = conn.prepare(
                "SELECT id, qualification, admission_year, specialization_code,
                        name, create_date, gos_type, warnings, warning_description
                 FROM plans ORDER BY rowid",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(Plan {
                    id: row.get(0)?,
                    qualification: row.get(1)?,
                    admission_year: row.get(2)?,
                    specialization_code: row.get(3)?,
                    name: row.get(4)?,
                    create_date: row
                        .get::<_, Option<String>>(5)?
                        .and_then(|s| chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
                    gos_type: row.get(6)?,
                    stady_plan: Vec::new(),
                    warnings: row.get(7)?,
                    warning_description: warnings_from_json(row.get(8)?),
                })
            })?;
            let mut out = Vec::new();
            for plan in rows {
                out.push(plan?);
            }
            out
        };

        for plan in &mut plans {
            plan.stady_plan = load_cycles(conn, &plan.id)?;
        }
        Ok(plans)
    }
}

fn load_cycles(conn: &Connection, plan_id: &str) -> Result<Vec<Cycle>, Box<dyn Error + Send + Sync>> {
    let mut cycles: Vec<Cycle> = {
        let mut stmt = conn.prepare(
            "SELECT id, identificator, cycles, warnings, warning_description
             FROM cycles WHERE plan_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![plan_id], |row| {
            Ok(Cycle {
                id: row.get(0)?,
                identificator: row.get(1)?,
                cycles: row.get(2)?,
                children: Vec::new(),
                warnings: row.get(3)?,
                warning_description: warnings_from_json(row.get(4)?),
            })
        })?;
        let mut out = Vec::new();
        for cycle in rows {
            out.push(cycle?);
        }
        out
    };

    for cycle in &mut cycles {
        cycle.children = load_child_cycles(conn, &cycle.id)?;
    }
    Ok(cycles)
}

fn load_child_cycles(conn: &Connection, cycle_id: &str) -> Result<Vec<ChildCycle>, Box<dyn Error + Send + Sync>> {
    let mut children: Vec<ChildCycle> = {
        let mut stmt = conn.prepare(
            "SELECT id, identificator, cycles, warnings, warning_description
             FROM child_cycles WHERE cycle_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![cycle_id], |row| {
            Ok(ChildCycle {
                id: row.get(0)?,
                identificator: row.get(1)?,
                cycles: row.get(2)?,
                parent_id: cycle_id.to_string(),
                plans_of_string: Vec::new(),
                warnings: row.get(3)?,
                warning_description: warnings_from_json(row.get(4)?),
            })
        })?;
        let mut out = Vec::new();
        for child in rows {
            out.push(child?);
        }
        out
    };

    for child in &mut children {
        child.plans_of_string = load_plan_strings(conn, &child.id)?;
    }
    Ok(children)
}

fn load_plan_strings(conn: &Connection, child_cycle_id: &str) -> Result<Vec<PlanString>, Box<dyn Error + Send + Sync>> {
    let mut strings: Vec<PlanString> = {
        let mut stmt = conn.prepare(
            "SELECT id, discipline, code_of_discipline, warnings, warning_description
             FROM plan_strings WHERE child_cycle_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![child_cycle_id], |row| {
            Ok(PlanString {
                id: row.get(0)?,
                discipline: row.get(1)?,
                code_of_discipline: row.get(2)?,
                code_of_cycle_block: child_cycle_id.to_string(),
                clock_cells: empty_matrix(),
                children_strings: Vec::new(),
                warnings: row.get(3)?,
                warning_description: warnings_from_json(row.get(4)?),
            })
        })?;
        let mut out = Vec::new();
        for string in rows {
            out.push(string?);
        }
        out
    };

    for string in &mut strings {
        load_cells_into(conn, "plan_string_id", &string.id, &mut string.clock_cells)?;
        string.children_strings = load_child_strings(conn, child_cycle_id, &string.id)?;
    }
    Ok(strings)
}

fn load_child_strings(
    conn: &Connection,
    child_cycle_id: &str,
    plan_string_id: &str,
) -> Result<Vec<ChildPlanString>, Box<dyn Error + Send + Sync>> {
    let mut strings: Vec<ChildPlanString> = {
        let mut stmt = conn.prepare(
            "SELECT id, discipline, code_of_discipline, warnings, warning_description
             FROM child_plan_strings WHERE plan_string_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![plan_string_id], |row| {
            Ok(ChildPlanString {
                id: row.get(0)?,
                discipline: row.get(1)?,
                code_of_discipline: row.get(2)?,
                code_of_cycle_block: child_cycle_id.to_string(),
                parent_string_id: plan_string_id.to_string(),
                clock_cells: empty_matrix(),
                warnings: row.get(3)?,
                warning_description: warnings_from_json(row.get(4)?),
            })
        })?;
        let mut out = Vec::new();
        for string in rows {
            out.push(string?);
        }
        out
    };

    for string in &mut strings {
        load_cells_into(conn, "child_plan_string_id", &string.id, &mut string.clock_cells)?;
    }
    Ok(strings)
}

fn load_cells_into(
    conn: &Connection,
    owner_column: &str,
    owner_id: &str,
    matrix: &mut [CourseSlot],
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let sql = format!(
        "SELECT id, type_of_work, type_of_hours, course, term,
                count_of_clocks, plan_string_id, child_plan_string_id
         FROM clock_cells WHERE {} = ?1 ORDER BY rowid",
        owner_column
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![owner_id], |row| {
        Ok(ClockCell {
            id: row.get(0)?,
            type_of_work: row.get(1)?,
            type_of_hours: row.get(2)?,
            course: row.get(3)?,
            term: row.get(4)?,
            count_of_clocks: row.get(5)?,
            plan_string_id: row.get(6)?,
            child_plan_string_id: row.get(7)?,
        })
    })?;

    for cell in rows {
        let cell = cell?;
        let course = cell.course as usize;
        let term = cell.term as usize;
        if course < 1 || course > matrix.len() || term < 1 || term > TERMS {
            eprintln!("⚠ Ячейка часов '{}' вне матрицы (курс {}, семестр {})", cell.id, cell.course, cell.term);
            continue;
        }
        matrix[course - 1].terms[term - 1].clock_cells.push(cell);
    }
    Ok(())
}
