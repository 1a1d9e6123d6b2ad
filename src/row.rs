//! Row classification: comment, directive or attribute definition.
//!
//! Column layout is fixed: name, code, section, data type, Must, May, ShouldNot, MustNot.
//! Missing trailing cells read as empty; cells past the eighth are an error.

use crate::avp::Location;
use crate::error::Error;
use crate::source::Row;

/// Number of columns in an AVP table.
pub const COLUMNS: usize = 8;

/// First-cell values of header rows.
pub const HEADER_LABELS: &[&str] = &["Attribute Name", "AVP Name"];

/// Ambient context set by directive rows, reset for each input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    pub standard: String,
    pub vendor: u32,
}

impl Context {
    pub fn apply(&mut self, directive: &Directive) {
        match directive {
            Directive::Standard(s) => self.standard = s.clone(),
            Directive::Vendor(v) => self.vendor = *v,
        }
    }
}

/// A recognized directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `@standard`: label carried by following attributes.
    Standard(String),
    /// `@vendor`: vendor number of following attributes.
    Vendor(u32),
}

impl Directive {
    pub fn name(&self) -> &'static str {
        match self {
            Directive::Standard(_) => "standard",
            Directive::Vendor(_) => "vendor",
        }
    }
}

/// Cells of an attribute row, not yet validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeRow<'a> {
    pub name: &'a str,
    pub code: &'a str,
    pub section: &'a str,
    pub data_type: &'a str,
    pub must: &'a str,
    pub may: &'a str,
    pub should_not: &'a str,
    pub must_not: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind<'a> {
    /// Empty first cell or header row.
    Skip,
    /// `#...`; payload is the text after the marker.
    Comment(&'a str),
    Directive { directive: Directive, value: &'a str },
    Attribute(AttributeRow<'a>),
}

/// Classify one row. `input` only names the source in errors.
pub fn classify<'a>(row: &'a Row, input: &str) -> Result<RowKind<'a>, Error> {
    if let Some(i) = row.malformed {
        return Err(Error::MalformedRow {
            location: Location::new(input, row.line),
            message: format!("unbalanced quotes in cell {}", i + 1),
        });
    }
    if row.cells.len() > COLUMNS {
        return Err(Error::MalformedRow {
            location: Location::new(input, row.line),
            message: format!("extra cells: {}", row.cells[COLUMNS..].join(",")),
        });
    }
    let cell = move |i: usize| row.cells.get(i).map(String::as_str).unwrap_or("");

    let first = cell(0);
    if first.is_empty() || HEADER_LABELS.contains(&first) {
        return Ok(RowKind::Skip);
    }
    if let Some(payload) = first.strip_prefix('#') {
        return Ok(RowKind::Comment(payload));
    }
    if let Some(name) = first.strip_prefix('@') {
        let value = cell(1);
        let directive = match name {
            "standard" => Directive::Standard(value.to_string()),
            "vendor" => Directive::Vendor(value.parse().map_err(|_| Error::MalformedRow {
                location: Location::new(input, row.line),
                message: format!("invalid vendor '{}'", value),
            })?),
            _ => {
                return Err(Error::UnknownDirective {
                    location: Location::new(input, row.line),
                    name: name.to_string(),
                })
            }
        };
        return Ok(RowKind::Directive { directive, value });
    }
    Ok(RowKind::Attribute(AttributeRow {
        name: first,
        code: cell(1),
        section: cell(2),
        data_type: cell(3),
        must: cell(4),
        may: cell(5),
        should_not: cell(6),
        must_not: cell(7),
    }))
}
