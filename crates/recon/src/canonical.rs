use std::fmt;

use crate::config::FieldMapping;
use crate::model::{CanonicalRecord, FieldValue, RawRecord};
use crate::normalize::{normalize_amount, normalize_date, normalize_type};

/// A record that cannot be canonicalized: a field the match key needs is
/// missing or null. This is a per-record fault, never a batch failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFault {
    pub field: String,
}

impl fmt::Display for RecordFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing required field '{}'", self.field)
    }
}

/// Convert one raw row into its canonical form through the side's field
/// mapping. The event-time and amount fields are required; the type and
/// description fields are optional.
pub fn canonicalize(
    record: &RawRecord,
    fields: &FieldMapping,
) -> Result<CanonicalRecord, RecordFault> {
    let date_raw = required(record, &fields.date)?;
    let amount_raw = required(record, &fields.amount)?;
    let type_raw = record.get(&fields.tx_type);

    let display_date = date_raw.to_string();
    let tx_type = normalize_type(type_raw);

    Ok(CanonicalRecord {
        date: normalize_date(&display_date),
        amount: normalize_amount(amount_raw),
        display_amount: amount_raw.clone(),
        display_type: display_type(type_raw, tx_type.as_deref()),
        display_description: optional_text(record, &fields.description),
        tx_type,
        display_date,
    })
}

/// Best-effort display columns for a record that failed canonicalization:
/// `(date, amount, type, description)` from whatever fields exist.
pub fn raw_display(
    record: &RawRecord,
    fields: &FieldMapping,
) -> (String, FieldValue, String, String) {
    let type_raw = record.get(&fields.tx_type);
    (
        optional_text(record, &fields.date),
        record
            .get(&fields.amount)
            .cloned()
            .unwrap_or(FieldValue::Null),
        display_type(type_raw, normalize_type(type_raw).as_deref()),
        optional_text(record, &fields.description),
    )
}

fn required<'a>(record: &'a RawRecord, field: &str) -> Result<&'a FieldValue, RecordFault> {
    match record.get(field) {
        Some(value) if !value.is_null() => Ok(value),
        _ => Err(RecordFault {
            field: field.to_string(),
        }),
    }
}

fn optional_text(record: &RawRecord, field: &str) -> String {
    record.get(field).map(FieldValue::to_string).unwrap_or_default()
}

/// Report form of the type label: the original as written, falling back to a
/// capitalized form of the normalized label, then to "Unknown".
fn display_type(original: Option<&FieldValue>, normalized: Option<&str>) -> String {
    if let Some(value) = original {
        let text = value.to_string();
        if !text.is_empty() {
            return text;
        }
    }
    match normalized {
        Some(label) if !label.is_empty() => capitalize(label),
        _ => "Unknown".to_string(),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
