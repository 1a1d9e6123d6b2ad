//! Attribute validation: builds an [`Avp`] from an attribute row or rejects it.
//!
//! ## Rules (in order)
//!
//! - **Name**: `[A-Za-z0-9][A-Za-z0-9.-]*`.
//! - **Code**: decimal integer (malformed row otherwise) in `0..=4294967295`.
//! - **Data type**: a base type or a derived type.
//! - **Flag characters**: each flag-string uses only `M`, `P`, `V`, space and comma.
//! - **Flag multiplicity**: `M` and `V` appear at most once across all four flag-strings.
//! - **Vendor consistency**: `V` in Must if and only if the vendor is non-zero.
//! - **Mandatory flag** (strict mode only): `M` in Must or MustNot.
//!
//! Every rule is checked; a row fails with a single error listing all violations.

use crate::avp::{Avp, DataType, FlagColumn, Flags, Location};
use crate::error::{Error, Violation};
use crate::row::{AttributeRow, Context};
use regex::Regex;
use std::num::IntErrorKind;
use std::sync::OnceLock;

const FLAG_CHARS: &[char] = &['M', 'P', 'V', ' ', ','];

fn name_re() -> &'static Regex {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    NAME_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9.\-]*$").expect("name pattern"))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateOptions {
    /// Reject rows with `M` in neither Must nor MustNot.
    pub require_mandatory_flag: bool,
}

/// Validate an attribute row in the given context.
pub fn validate(
    row: &AttributeRow<'_>,
    ctx: &Context,
    location: Location,
    options: &ValidateOptions,
) -> Result<Avp, Error> {
    let mut violations = Vec::new();

    if !name_re().is_match(row.name) {
        violations.push(Violation::InvalidName);
    }

    let code = match row.code.parse::<u32>() {
        Ok(code) => Some(code),
        Err(e) => {
            violations.push(match e.kind() {
                IntErrorKind::PosOverflow => Violation::CodeOutOfRange(row.code.to_string()),
                _ => Violation::UnparsableCode(row.code.to_string()),
            });
            None
        }
    };

    let data_type = row.data_type.parse::<DataType>().ok();
    if data_type.is_none() {
        violations.push(Violation::InvalidDataType(row.data_type.to_string()));
    }

    let flags = Flags {
        must: row.must.to_string(),
        may: row.may.to_string(),
        should_not: row.should_not.to_string(),
        must_not: row.must_not.to_string(),
    };
    for column in FlagColumn::ALL {
        if !flags.get(column).chars().all(|c| FLAG_CHARS.contains(&c)) {
            violations.push(Violation::InvalidFlags(column));
        }
    }
    for symbol in ['M', 'V'] {
        let count = flags.count(symbol);
        if count > 1 {
            violations.push(Violation::RepeatedFlag { symbol, count });
        }
    }

    let vendor_flag = flags.contains(FlagColumn::Must, 'V');
    if vendor_flag && ctx.vendor == 0 {
        violations.push(Violation::VendorFlagWithoutVendor);
    } else if !vendor_flag && ctx.vendor != 0 {
        violations.push(Violation::VendorWithoutVendorFlag(ctx.vendor));
    }

    if options.require_mandatory_flag
        && !flags.contains(FlagColumn::Must, 'M')
        && !flags.contains(FlagColumn::MustNot, 'M')
    {
        violations.push(Violation::MissingMandatoryFlag);
    }

    match (code, data_type) {
        (Some(code), Some(data_type)) if violations.is_empty() => Ok(Avp {
            name: row.name.to_string(),
            code,
            section: row.section.to_string(),
            data_type,
            flags,
            vendor: ctx.vendor,
            standard: ctx.standard.clone(),
            location,
        }),
        _ => Err(Error::InvalidAvp {
            location,
            avp: match code {
                Some(code) => format!("AVP {} ({})", row.name, code),
                None => format!("AVP {}", row.name),
            },
            violations,
        }),
    }
}
