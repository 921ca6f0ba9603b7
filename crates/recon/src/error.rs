use std::fmt;

/// Which of the two input ledgers an error belongs to. Batch-level failures
/// always name their side so the caller can tell the user which upload broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Primary,
    Secondary,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Secondary => write!(f, "secondary"),
        }
    }
}

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty field mapping, empty filter list).
    ConfigValidation(String),
    /// One side's payload could not be parsed at all.
    Decode { side: Side, detail: String },
    /// One side's payload parsed but is not a sequence of flat records.
    Shape { side: Side, detail: String },
    /// A mapped header is missing from one side's CSV.
    MissingField { side: Side, field: String },
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Decode { side, detail } => {
                write!(f, "{side} ledger: cannot decode input: {detail}")
            }
            Self::Shape { side, detail } => {
                write!(f, "{side} ledger: unexpected input shape: {detail}")
            }
            Self::MissingField { side, field } => {
                write!(f, "{side} ledger: missing field '{field}'")
            }
        }
    }
}

impl std::error::Error for ReconError {}
