//! Boundary decoding: extraction payloads and pre-extracted CSV exports into
//! raw records. Failures here are batch-level and name the failing side; an
//! empty record set is a valid zero-row input, not an error.

use crate::config::SideConfig;
use crate::error::{ReconError, Side};
use crate::model::{FieldValue, RawRecord};

/// Decode one side's extraction payload: a JSON array of flat objects,
/// possibly wrapped in Markdown code fences, with amounts that may carry bare
/// digit-grouping commas (which break JSON). Fences are stripped and grouping
/// commas removed before parsing.
pub fn parse_json_records(
    side: Side,
    payload: &str,
    config: &SideConfig,
) -> Result<Vec<RawRecord>, ReconError> {
    let cleaned = strip_grouping_commas(&strip_code_fences(payload));
    let value: serde_json::Value =
        serde_json::from_str(cleaned.trim()).map_err(|e| ReconError::Decode {
            side,
            detail: e.to_string(),
        })?;

    let items = value.as_array().ok_or_else(|| ReconError::Shape {
        side,
        detail: "payload is not an array of records".into(),
    })?;

    let mut records = Vec::with_capacity(items.len());
    for (position, item) in items.iter().enumerate() {
        let object = item.as_object().ok_or_else(|| ReconError::Shape {
            side,
            detail: format!("record {position} is not an object"),
        })?;
        let mut record = RawRecord::default();
        for (field, value) in object {
            record.set(field.clone(), field_value(value));
        }
        records.push(record);
    }
    Ok(apply_filter(records, config))
}

/// Read one side from a headered CSV export (all values as text; the
/// canonicalizer does the typing). The mapped date and amount headers must
/// exist.
pub fn load_csv_records(
    side: Side,
    data: &str,
    config: &SideConfig,
) -> Result<Vec<RawRecord>, ReconError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ReconError::Decode {
            side,
            detail: e.to_string(),
        })?
        .iter()
        .map(|h| h.to_string())
        .collect();

    for field in [&config.fields.date, &config.fields.amount] {
        if !headers.iter().any(|h| h == field) {
            return Err(ReconError::MissingField {
                side,
                field: field.clone(),
            });
        }
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.map_err(|e| ReconError::Decode {
            side,
            detail: e.to_string(),
        })?;
        let mut record = RawRecord::default();
        for (position, header) in headers.iter().enumerate() {
            if let Some(value) = row.get(position) {
                record.set(header.clone(), FieldValue::Text(value.to_string()));
            }
        }
        records.push(record);
    }
    Ok(apply_filter(records, config))
}

fn field_value(value: &serde_json::Value) -> FieldValue {
    match value {
        serde_json::Value::Null => FieldValue::Null,
        serde_json::Value::Bool(b) => FieldValue::Bool(*b),
        serde_json::Value::Number(n) => FieldValue::Number(n.as_f64().unwrap_or_default()),
        serde_json::Value::String(s) => FieldValue::Text(s.clone()),
        // Nested values are out of contract; stringify rather than fail the batch.
        other => FieldValue::Text(other.to_string()),
    }
}

fn strip_code_fences(payload: &str) -> String {
    payload.replace("```json", "").replace("```", "")
}

/// Remove every comma that sits directly between two ASCII digits, so bare
/// `1,000.50` amounts inside the payload become valid JSON numbers.
fn strip_grouping_commas(payload: &str) -> String {
    let bytes = payload.as_bytes();
    let mut out = String::with_capacity(payload.len());
    for (position, ch) in payload.char_indices() {
        if ch == ','
            && position > 0
            && bytes[position - 1].is_ascii_digit()
            && bytes.get(position + 1).is_some_and(u8::is_ascii_digit)
        {
            continue;
        }
        out.push(ch);
    }
    out
}

fn apply_filter(records: Vec<RawRecord>, config: &SideConfig) -> Vec<RawRecord> {
    let Some(filter) = &config.filter else {
        return records;
    };
    records
        .into_iter()
        .filter(|record| {
            record
                .get(&filter.field)
                .is_some_and(|value| filter.values.iter().any(|want| *want == value.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ReconConfig, RowFilter};

    fn primary_side() -> SideConfig {
        ReconConfig::default().primary
    }

    #[test]
    fn parses_fenced_payload_with_bare_commas() {
        let payload = r#"```json
[
  {"Event Time": "16/8/2025", "Amount": 1,000.50, "Transaction Type": "Deposit"},
  {"Event Time": "17/8/2025", "Amount": "2,500.00", "Transaction Type": "Transfer"}
]
```"#;
        let records = parse_json_records(Side::Primary, payload, &primary_side()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].get("Amount"),
            Some(&FieldValue::Number(1000.5))
        );
        // Commas inside quoted amounts are grouping commas too.
        assert_eq!(
            records[1].get("Amount"),
            Some(&FieldValue::Text("2500.00".into()))
        );
    }

    #[test]
    fn text_commas_survive_comma_repair() {
        let payload = r#"[{"Event Time": "16/8/2025", "Amount": 5, "Description/Remarks": "SALARY, AUGUST"}]"#;
        let records = parse_json_records(Side::Primary, payload, &primary_side()).unwrap();
        assert_eq!(
            records[0].get("Description/Remarks"),
            Some(&FieldValue::Text("SALARY, AUGUST".into()))
        );
    }

    #[test]
    fn null_and_bool_values_decode() {
        let payload = r#"[{"Transaction Type": null, "Reviewed": true, "Amount": 3}]"#;
        let records = parse_json_records(Side::Secondary, payload, &primary_side()).unwrap();
        assert_eq!(records[0].get("Transaction Type"), Some(&FieldValue::Null));
        assert_eq!(records[0].get("Reviewed"), Some(&FieldValue::Bool(true)));
    }

    #[test]
    fn empty_array_is_zero_rows_not_an_error() {
        let records = parse_json_records(Side::Primary, "[]", &primary_side()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn unparseable_payload_names_the_side() {
        let err = parse_json_records(Side::Secondary, "I could not read the image", &primary_side())
            .unwrap_err();
        match err {
            ReconError::Decode { side, .. } => assert_eq!(side, Side::Secondary),
            other => panic!("expected Decode, got {other:?}"),
        }
        assert!(err.to_string().contains("secondary ledger"));
    }

    #[test]
    fn non_array_payload_is_a_shape_error() {
        let err =
            parse_json_records(Side::Primary, r#"{"rows": []}"#, &primary_side()).unwrap_err();
        assert!(matches!(
            err,
            ReconError::Shape {
                side: Side::Primary,
                ..
            }
        ));
    }

    #[test]
    fn non_object_record_is_a_shape_error() {
        let err = parse_json_records(Side::Primary, "[1, 2]", &primary_side()).unwrap_err();
        assert!(err.to_string().contains("record 0"));
    }

    #[test]
    fn filter_keeps_only_listed_values() {
        let mut side = primary_side();
        side.filter = Some(RowFilter {
            field: "Transaction Type".into(),
            values: vec!["Deposit".into(), "Transfer".into()],
        });
        let payload = r#"[
  {"Event Time": "16/8/2025", "Amount": 1, "Transaction Type": "Deposit"},
  {"Event Time": "16/8/2025", "Amount": 2, "Transaction Type": "Withdrawal"},
  {"Event Time": "16/8/2025", "Amount": 3}
]"#;
        let records = parse_json_records(Side::Primary, payload, &side).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("Amount"), Some(&FieldValue::Number(1.0)));
    }

    #[test]
    fn csv_round_trip() {
        let data = "\
Event Time,Description/Remarks,Transaction Type,Amount
16/8/2025,ATM CASH DEPOSIT,Deposit,\"1,000.50\"
17/8/2025,COUNTER DEPOSIT,Deposit,99.00
";
        let records = load_csv_records(Side::Primary, data, &primary_side()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].get("Amount"),
            Some(&FieldValue::Text("1,000.50".into()))
        );
        assert_eq!(
            records[1].get("Description/Remarks"),
            Some(&FieldValue::Text("COUNTER DEPOSIT".into()))
        );
    }

    #[test]
    fn csv_missing_amount_header_fails_early() {
        let data = "Event Time,Description/Remarks\n16/8/2025,x\n";
        let err = load_csv_records(Side::Primary, data, &primary_side()).unwrap_err();
        match err {
            ReconError::MissingField { side, field } => {
                assert_eq!(side, Side::Primary);
                assert_eq!(field, "Amount");
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }
}
