//! Best-effort field normalizers. None of these can fail: a value that does
//! not normalize is carried through unchanged and simply never matches, which
//! surfaces downstream as `Not Tally`.

use chrono::NaiveDate;
use ordered_float::OrderedFloat;

use crate::model::{AmountValue, DateValue, FieldValue};

/// Canonicalize a date string.
///
/// Two shapes are recognized: slash-delimited day-first `D/M/YYYY` (or `D/M/YY`
/// with a two-digit year, always read as 20xx), and hyphen-delimited
/// `YYYY-MM-DD` with an optional time-of-day suffix after a space, which is
/// dropped. Anything else is kept raw.
pub fn normalize_date(raw: &str) -> DateValue {
    if raw.contains('/') {
        return slash_date(raw).unwrap_or_else(|| DateValue::Raw(raw.to_string()));
    }
    if raw.contains('-') {
        let day_part = match raw.split_once(' ') {
            Some((head, _)) => head,
            None => raw,
        };
        return match NaiveDate::parse_from_str(day_part, "%Y-%m-%d") {
            Ok(day) => DateValue::Day(day),
            Err(_) => DateValue::Raw(day_part.to_string()),
        };
    }
    DateValue::Raw(raw.to_string())
}

fn slash_date(raw: &str) -> Option<DateValue> {
    let parts: Vec<&str> = raw.split('/').collect();
    if parts.len() != 3 {
        return None;
    }
    let day: u32 = parts[0].parse().ok()?;
    let month: u32 = parts[1].parse().ok()?;
    let year: i32 = if parts[2].len() == 4 {
        parts[2].parse().ok()?
    } else {
        // Two-digit years are this century: "25" → 2025, "99" → 2099.
        2000 + parts[2].parse::<i32>().ok()?
    };
    NaiveDate::from_ymd_opt(year, month, day).map(DateValue::Day)
}

/// Canonicalize an amount: strip digit-grouping commas and surrounding
/// whitespace from strings, pass numbers through. A value that still does not
/// parse is kept raw.
pub fn normalize_amount(raw: &FieldValue) -> AmountValue {
    match raw {
        FieldValue::Number(n) => AmountValue::Number(OrderedFloat(*n)),
        FieldValue::Text(s) => {
            let cleaned = s.replace(',', "");
            match cleaned.trim().parse::<f64>() {
                Ok(n) => AmountValue::Number(OrderedFloat(n)),
                Err(_) => AmountValue::Raw(s.clone()),
            }
        }
        other => AmountValue::Raw(other.to_string()),
    }
}

/// Canonicalize a transaction-type label: trim and lower-case. Null or absent
/// stays `None`; a present-but-empty label stays `Some("")` so absence and
/// emptiness remain distinguishable.
pub fn normalize_type(raw: Option<&FieldValue>) -> Option<String> {
    match raw? {
        FieldValue::Null => None,
        other => Some(other.to_string().trim().to_lowercase()),
    }
}
