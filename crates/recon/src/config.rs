use serde::Deserialize;

use crate::error::{ReconError, Side};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Reconciliation run configuration. `Default` reproduces the field names the
/// extraction collaborator emits, so a run needs no configuration at all.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReconConfig {
    pub name: String,
    pub primary: SideConfig,
    pub secondary: SideConfig,
    /// Marker text for B-side columns of an unmatched row.
    pub sentinel: String,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            name: "Statement reconciliation".into(),
            primary: SideConfig {
                fields: FieldMapping::primary(),
                filter: None,
            },
            secondary: SideConfig {
                fields: FieldMapping::secondary(),
                filter: None,
            },
            sentinel: "No match".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-side mapping + filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SideConfig {
    pub fields: FieldMapping,
    #[serde(default)]
    pub filter: Option<RowFilter>,
}

/// Which raw field feeds each canonical column.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldMapping {
    pub date: String,
    pub amount: String,
    pub tx_type: String,
    pub description: String,
}

impl FieldMapping {
    /// Bank-statement side of the original report.
    pub fn primary() -> Self {
        Self {
            date: "Event Time".into(),
            amount: "Amount".into(),
            tx_type: "Transaction Type".into(),
            description: "Description/Remarks".into(),
        }
    }

    /// Deposit-log side of the original report.
    pub fn secondary() -> Self {
        Self {
            date: "Event Time".into(),
            amount: "Amount".into(),
            tx_type: "Transaction Type".into(),
            description: "Remark".into(),
        }
    }
}

/// Keep only records whose `field` value is one of `values`, compared as
/// written (no normalization).
#[derive(Debug, Clone, Deserialize)]
pub struct RowFilter {
    pub field: String,
    pub values: Vec<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        for (side, config) in [
            (Side::Primary, &self.primary),
            (Side::Secondary, &self.secondary),
        ] {
            let f = &config.fields;
            for (label, name) in [
                ("date", &f.date),
                ("amount", &f.amount),
                ("tx_type", &f.tx_type),
                ("description", &f.description),
            ] {
                if name.trim().is_empty() {
                    return Err(ReconError::ConfigValidation(format!(
                        "{side} ledger: field mapping '{label}' is empty"
                    )));
                }
            }

            if let Some(filter) = &config.filter {
                if filter.field.trim().is_empty() {
                    return Err(ReconError::ConfigValidation(format!(
                        "{side} ledger: filter field is empty"
                    )));
                }
                if filter.values.is_empty() {
                    return Err(ReconError::ConfigValidation(format!(
                        "{side} ledger: filter matches no values"
                    )));
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
