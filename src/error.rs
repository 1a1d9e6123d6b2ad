//! Errors reported while reading, validating and generating AVP tables.

use crate::avp::{FlagColumn, Location};
use std::fmt;

/// Coarse classification of [`Error`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Csv,
    MalformedRow,
    InvalidAttributeField,
    FlagConsistencyViolation,
    UnknownDirective,
    DuplicateDefinition,
    ConflictingDefinition,
}

/// One failed rule on an attribute row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    InvalidName,
    /// Code cell is not a decimal integer.
    UnparsableCode(String),
    /// Code is numeric but above 4294967295.
    CodeOutOfRange(String),
    InvalidDataType(String),
    InvalidFlags(FlagColumn),
    RepeatedFlag { symbol: char, count: usize },
    /// `V` in Must but vendor is 0.
    VendorFlagWithoutVendor,
    /// Vendor set but `V` not in Must.
    VendorWithoutVendorFlag(u32),
    /// `M` in neither Must nor MustNot (strict mode only).
    MissingMandatoryFlag,
}

impl Violation {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Violation::VendorFlagWithoutVendor | Violation::VendorWithoutVendorFlag(_) => {
                ErrorKind::FlagConsistencyViolation
            }
            Violation::UnparsableCode(_) => ErrorKind::MalformedRow,
            _ => ErrorKind::InvalidAttributeField,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::InvalidName => write!(f, "invalid name"),
            Violation::UnparsableCode(code) | Violation::CodeOutOfRange(code) => {
                write!(f, "invalid code '{}'", code)
            }
            Violation::InvalidDataType(t) => write!(f, "invalid data type '{}'", t),
            Violation::InvalidFlags(column) => write!(f, "invalid {} flags", column),
            Violation::RepeatedFlag { symbol, count } => {
                write!(f, "flag '{}' appears {} times", symbol, count)
            }
            Violation::VendorFlagWithoutVendor => {
                write!(f, "'V' in Must flags but vendor is 0")
            }
            Violation::VendorWithoutVendorFlag(vendor) => {
                write!(f, "vendor {} set but 'V' not in Must flags", vendor)
            }
            Violation::MissingMandatoryFlag => write!(f, "'M' in neither Must nor MustNot flags"),
        }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("generator output: {source}")]
    Output { source: std::io::Error },
    #[error("{input}: CSV syntax: {message}")]
    Csv { input: String, message: String },
    #[error("{location}: {message}")]
    MalformedRow { location: Location, message: String },
    #[error("{location}: {avp}: {}", join_violations(.violations))]
    InvalidAvp {
        location: Location,
        /// Name and, when it parsed, code of the rejected row.
        avp: String,
        violations: Vec<Violation>,
    },
    #[error("{location}: unknown directive '@{name}'")]
    UnknownDirective { location: Location, name: String },
    #[error("{location}: {avp} duplicated, first defined at {previous}")]
    DuplicateDefinition {
        location: Location,
        avp: String,
        previous: Location,
    },
    #[error("{location}: {avp} conflicts with {existing} defined at {previous}")]
    ConflictingDefinition {
        location: Location,
        avp: String,
        existing: String,
        previous: Location,
    },
}

impl Error {
    /// Kind of the error. A rejected row is `MalformedRow` if any cell failed to parse,
    /// otherwise the kind of its first violation.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io { .. } | Error::Output { .. } => ErrorKind::Io,
            Error::Csv { .. } => ErrorKind::Csv,
            Error::MalformedRow { .. } => ErrorKind::MalformedRow,
            Error::InvalidAvp { violations, .. } => {
                if violations.iter().any(|v| v.kind() == ErrorKind::MalformedRow) {
                    return ErrorKind::MalformedRow;
                }
                violations
                    .first()
                    .map(Violation::kind)
                    .unwrap_or(ErrorKind::InvalidAttributeField)
            }
            Error::UnknownDirective { .. } => ErrorKind::UnknownDirective,
            Error::DuplicateDefinition { .. } => ErrorKind::DuplicateDefinition,
            Error::ConflictingDefinition { .. } => ErrorKind::ConflictingDefinition,
        }
    }

    pub fn location(&self) -> Option<&Location> {
        match self {
            Error::Io { .. } | Error::Output { .. } | Error::Csv { .. } => None,
            Error::MalformedRow { location, .. }
            | Error::InvalidAvp { location, .. }
            | Error::UnknownDirective { location, .. }
            | Error::DuplicateDefinition { location, .. }
            | Error::ConflictingDefinition { location, .. } => Some(location),
        }
    }

    /// Rule failures of a rejected attribute row (empty for other errors).
    pub fn violations(&self) -> &[Violation] {
        match self {
            Error::InvalidAvp { violations, .. } => violations.as_slice(),
            _ => &[],
        }
    }
}

/// Every error collected from one input.
#[derive(Debug, thiserror::Error)]
#[error("{input}: {} error(s)", .errors.len())]
pub struct InputErrors {
    pub input: String,
    pub errors: Vec<Error>,
}

/// Why a run ended without output.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Input(#[from] InputErrors),
    #[error("output: {0}")]
    Output(#[from] std::io::Error),
}
