use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A loosely typed field value exactly as extraction produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// One extracted row: an unordered field-name → value mapping. No schema is
/// assumed here; the canonicalizer is the validation boundary.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl RawRecord {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: FieldValue) {
        self.fields.insert(field.into(), value);
    }
}

/// The two raw record sets of one reconciliation run.
#[derive(Debug, Clone, Default)]
pub struct ReconInput {
    pub primary: Vec<RawRecord>,
    pub secondary: Vec<RawRecord>,
}

// ---------------------------------------------------------------------------
// Canonical values
// ---------------------------------------------------------------------------

/// Canonical date: a calendar day when normalization succeeded, otherwise the
/// best-effort raw string. `Raw` compares by string equality, so two
/// identically malformed inputs still match each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DateValue {
    Day(NaiveDate),
    Raw(String),
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day(day) => write!(f, "{}", day.format("%Y-%m-%d")),
            Self::Raw(s) => write!(f, "{s}"),
        }
    }
}

/// Canonical amount. `OrderedFloat` supplies the `Eq + Hash` a match key
/// needs over floats.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AmountValue {
    Number(OrderedFloat<f64>),
    Raw(String),
}

impl fmt::Display for AmountValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Raw(s) => write!(f, "{s}"),
        }
    }
}

/// One record per raw row: the values matching runs on, plus the original
/// human-facing values preserved for the report. Display values never
/// participate in matching.
#[derive(Debug, Clone)]
pub struct CanonicalRecord {
    pub date: DateValue,
    pub amount: AmountValue,
    pub tx_type: Option<String>,
    pub display_date: String,
    pub display_amount: FieldValue,
    pub display_type: String,
    pub display_description: String,
}

impl CanonicalRecord {
    pub fn match_key(&self) -> MatchKey {
        MatchKey {
            date: self.date.clone(),
            amount: self.amount.clone(),
            tx_type: self.tx_type.clone(),
        }
    }
}

/// Equality key for matching. Absence of a transaction type only equals
/// absence, never a present label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchKey {
    pub date: DateValue,
    pub amount: AmountValue,
    pub tx_type: Option<String>,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Tally,
    #[serde(rename = "Not Tally")]
    NotTally,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tally => write!(f, "Tally"),
            Self::NotTally => write!(f, "Not Tally"),
        }
    }
}

/// One report row per primary record. Serializes with the report's column
/// names; `fault` appears only when the record had a structural defect.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRow {
    #[serde(rename = "Date_A")]
    pub date_a: String,
    #[serde(rename = "Description_A")]
    pub description_a: String,
    #[serde(rename = "Type_A")]
    pub type_a: String,
    #[serde(rename = "Amount_A")]
    pub amount_a: FieldValue,
    #[serde(rename = "Date_B")]
    pub date_b: String,
    #[serde(rename = "Description_B")]
    pub description_b: String,
    #[serde(rename = "Type_B")]
    pub type_b: String,
    #[serde(rename = "Amount_B")]
    pub amount_b: FieldValue,
    #[serde(rename = "Status")]
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault: Option<String>,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct TallySummary {
    pub total_rows: usize,
    pub tallied: usize,
    pub not_tallied: usize,
    pub primary_faults: usize,
    pub secondary_faults: usize,
    pub unmatched_secondary: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: TallySummary,
    pub rows: Vec<ComparisonRow>,
}
