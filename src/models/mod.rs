// Estructura canónica del plan ensamblado.
//
// The flat .plx export references everything by legacy codes; after assembly
// every node here carries a fresh UUID and the legacy codes are gone. Field
// names follow the plan.json document shape consumed downstream (including
// the historical "stady_plan" spelling).

use serde::{Deserialize, Serialize};

/// Fixed shape of the hour matrix: 4 course years x 2 terms per course.
pub const COURSES: usize = 4;
pub const TERMS: usize = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub qualification: Option<String>,
    pub admission_year: Option<i32>,
    pub specialization_code: Option<String>,
    pub name: Option<String>,
    pub create_date: Option<chrono::NaiveDate>,
    pub gos_type: Option<String>,
    pub stady_plan: Vec<Cycle>,
    pub warnings: bool,
    pub warning_description: Vec<String>,
}

/// Top-level educational grouping ("Обязательная часть учебных циклов" etc.)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cycle {
    pub id: String,
    pub identificator: Option<String>,
    pub cycles: Option<String>,
    pub children: Vec<ChildCycle>,
    pub warnings: bool,
    pub warning_description: Vec<String>,
}

/// Second-level grouping under a Cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildCycle {
    pub id: String,
    pub identificator: Option<String>,
    pub cycles: Option<String>,
    pub parent_id: String,
    pub plans_of_string: Vec<PlanString>,
    pub warnings: bool,
    pub warning_description: Vec<String>,
}

/// Discipline/module row. Owns a fixed 4x2 hour matrix and any
/// sub-discipline rows nested under it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanString {
    pub id: String,
    pub discipline: Option<String>,
    pub code_of_discipline: Option<String>,
    pub code_of_cycle_block: String,
    pub clock_cells: Vec<CourseSlot>,
    pub children_strings: Vec<ChildPlanString>,
    pub warnings: bool,
    pub warning_description: Vec<String>,
}

/// Sub-discipline row: same shape as `PlanString` minus further nesting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildPlanString {
    pub id: String,
    pub discipline: Option<String>,
    pub code_of_discipline: Option<String>,
    pub code_of_cycle_block: String,
    pub parent_string_id: String,
    pub clock_cells: Vec<CourseSlot>,
    pub warnings: bool,
    pub warning_description: Vec<String>,
}

/// One course-year slot of the hour matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSlot {
    pub terms: Vec<TermSlot>,
}

/// One term slot inside a course-year slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermSlot {
    pub clock_cells: Vec<ClockCell>,
}

/// Builds the empty 4x2 matrix. The shape is fixed at assembly time no
/// matter how many hour records exist for the row (including zero).
pub fn empty_matrix() -> Vec<CourseSlot> {
    (0..COURSES)
        .map(|_| CourseSlot {
            terms: (0..TERMS).map(|_| TermSlot { clock_cells: Vec::new() }).collect(),
        })
        .collect()
}

/// Owner of a clock cell: exactly one discipline-row node, never zero, never two.
#[derive(Debug, Clone)]
pub enum CellOwner {
    PlanString(String),
    ChildPlanString(String),
}

/// One allocation of teaching hours to (course, term, work type) for a row.
/// `type_of_work` / `type_of_hours` hold the labels already resolved through
/// the reference dictionaries, not the raw codes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockCell {
    pub id: String,
    pub type_of_work: String,
    pub type_of_hours: String,
    pub course: u8,
    pub term: u8,
    pub count_of_clocks: i64,
    pub plan_string_id: Option<String>,
    pub child_plan_string_id: Option<String>,
}

impl ClockCell {
    pub fn new(
        id: String,
        type_of_work: String,
        type_of_hours: String,
        course: u8,
        term: u8,
        count_of_clocks: i64,
        owner: CellOwner,
    ) -> Self {
        let (plan_string_id, child_plan_string_id) = match owner {
            CellOwner::PlanString(id) => (Some(id), None),
            CellOwner::ChildPlanString(id) => (None, Some(id)),
        };
        ClockCell {
            id,
            type_of_work,
            type_of_hours,
            course,
            term,
            count_of_clocks,
            plan_string_id,
            child_plan_string_id,
        }
    }

    /// Checks the single-owner invariant on an arbitrary instance (cells can
    /// also arrive through JSON ingestion, where `new` was never called).
    pub fn validate_owner(&self) -> Result<(), String> {
        match (&self.plan_string_id, &self.child_plan_string_id) {
            (Some(_), None) | (None, Some(_)) => Ok(()),
            (Some(_), Some(_)) => Err(format!("clock cell '{}' has two owners", self.id)),
            (None, None) => Err(format!("clock cell '{}' has no owner", self.id)),
        }
    }
}

impl Plan {
    pub fn add_warnings(&mut self, msgs: Vec<String>) {
        if !msgs.is_empty() {
            self.warnings = true;
            self.warning_description.extend(msgs);
        }
    }
}

impl Cycle {
    pub fn add_warnings(&mut self, msgs: Vec<String>) {
        if !msgs.is_empty() {
            self.warnings = true;
            self.warning_description.extend(msgs);
        }
    }
}

impl ChildCycle {
    pub fn add_warnings(&mut self, msgs: Vec<String>) {
        if !msgs.is_empty() {
            self.warnings = true;
            self.warning_description.extend(msgs);
        }
    }
}

impl PlanString {
    pub fn add_warnings(&mut self, msgs: Vec<String>) {
        if !msgs.is_empty() {
            self.warnings = true;
            self.warning_description.extend(msgs);
        }
    }
}

impl ChildPlanString {
    pub fn add_warnings(&mut self, msgs: Vec<String>) {
        if !msgs.is_empty() {
            self.warnings = true;
            self.warning_description.extend(msgs);
        }
    }
}
