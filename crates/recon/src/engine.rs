use chrono::Utc;

use crate::canonical::{canonicalize, raw_display, RecordFault};
use crate::config::ReconConfig;
use crate::index::MatchIndex;
use crate::model::{
    CanonicalRecord, ComparisonRow, FieldValue, RawRecord, ReconInput, ReconMeta, ReconResult,
    Status, TallySummary,
};

/// Reconcile the two record sets row by row.
///
/// Emits exactly one `ComparisonRow` per primary record, in primary input
/// order. A secondary record is consumed by at most one row; among secondary
/// records sharing a match key, the earliest still-available one (by original
/// extraction order) is consumed first.
pub fn reconcile(
    primary: &[RawRecord],
    secondary: &[RawRecord],
    config: &ReconConfig,
) -> Vec<ComparisonRow> {
    match_records(primary, secondary, config).rows
}

/// Full run: `reconcile` plus run metadata and summary counters.
pub fn run(config: &ReconConfig, input: &ReconInput) -> ReconResult {
    let outcome = match_records(&input.primary, &input.secondary, config);
    let summary = compute_summary(&outcome);
    ReconResult {
        meta: ReconMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: Utc::now().to_rfc3339(),
        },
        summary,
        rows: outcome.rows,
    }
}

struct MatchOutcome {
    rows: Vec<ComparisonRow>,
    secondary_faults: usize,
    unmatched_secondary: usize,
}

fn match_records(
    primary: &[RawRecord],
    secondary: &[RawRecord],
    config: &ReconConfig,
) -> MatchOutcome {
    // Index the secondary side first; the scan below only ever removes.
    let mut index = MatchIndex::new();
    let mut secondary_faults = 0;
    for record in secondary {
        match canonicalize(record, &config.secondary.fields) {
            Ok(canonical) => index.push(canonical),
            Err(_) => secondary_faults += 1,
        }
    }

    let mut rows = Vec::with_capacity(primary.len());
    for record in primary {
        rows.push(match canonicalize(record, &config.primary.fields) {
            Ok(canonical) => match index.take(&canonical.match_key()) {
                Some(counterpart) => tally_row(&canonical, &counterpart),
                None => no_match_row(&canonical, &config.sentinel),
            },
            Err(fault) => fault_row(record, config, &fault),
        });
    }

    MatchOutcome {
        rows,
        secondary_faults,
        unmatched_secondary: index.remaining(),
    }
}

fn tally_row(primary: &CanonicalRecord, counterpart: &CanonicalRecord) -> ComparisonRow {
    ComparisonRow {
        date_a: primary.display_date.clone(),
        description_a: primary.display_description.clone(),
        type_a: primary.display_type.clone(),
        amount_a: primary.display_amount.clone(),
        date_b: counterpart.display_date.clone(),
        description_b: counterpart.display_description.clone(),
        type_b: counterpart.display_type.clone(),
        amount_b: counterpart.display_amount.clone(),
        status: Status::Tally,
        fault: None,
    }
}

fn no_match_row(primary: &CanonicalRecord, sentinel: &str) -> ComparisonRow {
    ComparisonRow {
        date_a: primary.display_date.clone(),
        description_a: primary.display_description.clone(),
        type_a: primary.display_type.clone(),
        amount_a: primary.display_amount.clone(),
        date_b: sentinel.to_string(),
        description_b: sentinel.to_string(),
        type_b: sentinel.to_string(),
        amount_b: FieldValue::Text(sentinel.to_string()),
        status: Status::NotTally,
        fault: None,
    }
}

fn fault_row(record: &RawRecord, config: &ReconConfig, fault: &RecordFault) -> ComparisonRow {
    let (date_a, amount_a, type_a, description_a) = raw_display(record, &config.primary.fields);
    let sentinel = config.sentinel.as_str();
    ComparisonRow {
        date_a,
        description_a,
        type_a,
        amount_a,
        date_b: sentinel.to_string(),
        description_b: sentinel.to_string(),
        type_b: sentinel.to_string(),
        amount_b: FieldValue::Text(sentinel.to_string()),
        status: Status::NotTally,
        fault: Some(fault.to_string()),
    }
}

fn compute_summary(outcome: &MatchOutcome) -> TallySummary {
    let tallied = outcome
        .rows
        .iter()
        .filter(|row| row.status == Status::Tally)
        .count();
    let primary_faults = outcome
        .rows
        .iter()
        .filter(|row| row.fault.is_some())
        .count();
    TallySummary {
        total_rows: outcome.rows.len(),
        tallied,
        not_tallied: outcome.rows.len() - tallied,
        primary_faults,
        secondary_faults: outcome.secondary_faults,
        unmatched_secondary: outcome.unmatched_secondary,
    }
}
