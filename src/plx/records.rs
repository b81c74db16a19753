use std::collections::HashMap;
use std::error::Error;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::plx::io::{attr_str, local_tag};

// Record tags as they appear in the dsMMISDB export (namespace stripped).
pub const TAG_CYCLES: &str = "ПланыЦиклы";
pub const TAG_STRINGS: &str = "ПланыСтроки";
pub const TAG_HOURS: &str = "ПланыНовыеЧасы";
pub const TAG_WORK_TYPES: &str = "СправочникВидыРабот";
pub const TAG_HOUR_TYPES: &str = "СправочникТипаЧасов";
pub const TAG_HEADER: &str = "ООП";

pub const ATTR_PARENT: &str = "КодРодителя";

/// One raw record of the flat export: a tag plus its attribute map.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub tag: String,
    pub attrs: HashMap<String, String>,
}

impl RawRecord {
    pub fn attr(&self, key: &str) -> Option<String> {
        attr_str(&self.attrs, key)
    }
}

/// Reads every element of a .plx document into a flat record sequence,
/// document order preserved. Nesting is irrelevant: the export is flat and
/// the classifier routes records by tag alone.
pub fn read_plx_records<P: AsRef<Path>>(path: P) -> Result<Vec<RawRecord>, Box<dyn Error + Send + Sync>> {
    let mut reader = Reader::from_file(path)?;
    reader.trim_text(true);

    let mut records: Vec<RawRecord> = Vec::new();
    let mut buf: Vec<u8> = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) => {
                let tag = local_tag(&String::from_utf8_lossy(e.name().as_ref()));
                let mut attrs = HashMap::new();
                for attr in e.attributes() {
                    let attr = attr?;
                    let key = local_tag(&String::from_utf8_lossy(attr.key.as_ref()));
                    let value = attr.unescape_value()?.to_string();
                    attrs.insert(key, value);
                }
                records.push(RawRecord { tag, attrs });
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(records)
}

/// Raw records split into typed buckets, ready for assembly.
#[derive(Debug, Default)]
pub struct RecordSet {
    pub top_cycles: Vec<RawRecord>,
    pub child_cycles: Vec<RawRecord>,
    pub top_strings: Vec<RawRecord>,
    pub child_strings: Vec<RawRecord>,
    pub hours: Vec<RawRecord>,
    pub work_types: Vec<RawRecord>,
    pub hour_types: Vec<RawRecord>,
    pub header: Option<RawRecord>,
}

/// Routes each record into its bucket. Cycle and string records go to the
/// child bucket when a non-empty `КодРодителя` is present, to the top bucket
/// otherwise. Unknown tags are ignored; records are never mutated.
pub fn classify(records: Vec<RawRecord>) -> RecordSet {
    let mut set = RecordSet::default();
    for record in records {
        let has_parent = record.attr(ATTR_PARENT).is_some();
        match record.tag.as_str() {
            TAG_CYCLES => {
                if has_parent {
                    set.child_cycles.push(record);
                } else {
                    set.top_cycles.push(record);
                }
            }
            TAG_STRINGS => {
                if has_parent {
                    set.child_strings.push(record);
                } else {
                    set.top_strings.push(record);
                }
            }
            TAG_HOURS => set.hours.push(record),
            TAG_WORK_TYPES => set.work_types.push(record),
            TAG_HOUR_TYPES => set.hour_types.push(record),
            TAG_HEADER => {
                // exactly one header is expected; the first one wins
                if set.header.is_none() {
                    set.header = Some(record);
                }
            }
            _ => {}
        }
    }
    set
}
