//! Оркестратор: классификация → сборка → валидация с навешиванием
//! предупреждений на узлы дерева.

use crate::models::Plan;
use crate::plan::assemble::{AssemblyReport, assemble};
use crate::plx::records::RawRecord;
use crate::plx::{LookupTables, classify};
use crate::speller::Speller;
use crate::validators::{
    SequenceState, WhitelistCache, validate_discipline_hours, validate_discipline_index,
    validate_text,
};

/// Finished plan plus the data-quality counters of the pass that built it.
#[derive(Debug)]
pub struct PlanOutcome {
    pub plan: Plan,
    pub report: AssemblyReport,
}

/// One full pass over a raw record snapshot.
///
/// Discipline rows are visited in document order — the index sequence
/// validator is stateful and relies on it. Hour totals run after assembly,
/// when every matrix is fully populated. Text validation touches every
/// node's label, including the plan name.
pub fn build_plan(
    records: Vec<RawRecord>,
    speller: &dyn Speller,
    whitelist: &WhitelistCache,
) -> PlanOutcome {
    let set = classify(records);
    let lookups = LookupTables::from_records(&set.work_types, &set.hour_types);
    let (mut plan, report) = assemble(&set, &lookups);

    let mut sequence = SequenceState::default();

    if let Some(name) = plan.name.clone() {
        let msgs = validate_text(&name, speller, whitelist);
        plan.add_warnings(msgs);
    }

    for cycle in &mut plan.stady_plan {
        if let Some(label) = cycle.cycles.clone() {
            cycle.add_warnings(validate_text(&label, speller, whitelist));
        }
        for child in &mut cycle.children {
            if let Some(label) = child.cycles.clone() {
                child.add_warnings(validate_text(&label, speller, whitelist));
            }
            for string in &mut child.plans_of_string {
                if let Some(name) = string.discipline.clone() {
                    string.add_warnings(validate_text(&name, speller, whitelist));
                }
                if let Some(msg) =
                    validate_discipline_index(string.code_of_discipline.as_deref(), &mut sequence)
                {
                    string.add_warnings(vec![msg]);
                }

                for child_string in &mut string.children_strings {
                    if let Some(name) = child_string.discipline.clone() {
                        child_string.add_warnings(validate_text(&name, speller, whitelist));
                    }
                    if let Some(msg) = validate_discipline_index(
                        child_string.code_of_discipline.as_deref(),
                        &mut sequence,
                    ) {
                        child_string.add_warnings(vec![msg]);
                    }
                    let hour_msgs = validate_discipline_hours(
                        child_string.discipline.as_deref(),
                        &child_string.clock_cells,
                    );
                    child_string.add_warnings(hour_msgs);
                }

                let hour_msgs =
                    validate_discipline_hours(string.discipline.as_deref(), &string.clock_cells);
                string.add_warnings(hour_msgs);
            }
        }
    }

    PlanOutcome { plan, report }
}
