use std::collections::HashMap;

use crate::plx::records::RawRecord;

const ATTR_CODE: &str = "Код";
const ATTR_NAME: &str = "Название";

/// The two code→label reference dictionaries of the export, built once per
/// run and consulted during assembly to resolve hour-record codes.
#[derive(Debug, Default, Clone)]
pub struct LookupTables {
    work_types: HashMap<String, String>,
    hour_types: HashMap<String, String>,
}

impl LookupTables {
    pub fn from_records(work_types: &[RawRecord], hour_types: &[RawRecord]) -> Self {
        LookupTables {
            work_types: build_table(work_types),
            hour_types: build_table(hour_types),
        }
    }

    pub fn work_type(&self, code: &str) -> Option<&str> {
        self.work_types.get(code).map(|s| s.as_str())
    }

    pub fn hour_type(&self, code: &str) -> Option<&str> {
        self.hour_types.get(code).map(|s| s.as_str())
    }
}

fn build_table(records: &[RawRecord]) -> HashMap<String, String> {
    let mut table = HashMap::new();
    for record in records {
        if let (Some(code), Some(name)) = (record.attr(ATTR_CODE), record.attr(ATTR_NAME)) {
            table.insert(code, name);
        }
    }
    table
}
