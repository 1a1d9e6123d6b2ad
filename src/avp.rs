//! Attribute record model: validated AVP definitions, data types, flags and provenance.

use std::fmt;
use std::str::FromStr;

/// Where a row came from: input identifier and 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub input: String,
    pub line: usize,
}

impl Location {
    pub fn new(input: impl Into<String>, line: usize) -> Self {
        Location {
            input: input.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.input, self.line)
    }
}

/// Wire-level base types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BaseType {
    OctetString,
    Integer32,
    Integer64,
    Unsigned32,
    Unsigned64,
    Float32,
    Float64,
    Grouped,
}

impl BaseType {
    pub const ALL: [BaseType; 8] = [
        BaseType::OctetString,
        BaseType::Integer32,
        BaseType::Integer64,
        BaseType::Unsigned32,
        BaseType::Unsigned64,
        BaseType::Float32,
        BaseType::Float64,
        BaseType::Grouped,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BaseType::OctetString => "OctetString",
            BaseType::Integer32 => "Integer32",
            BaseType::Integer64 => "Integer64",
            BaseType::Unsigned32 => "Unsigned32",
            BaseType::Unsigned64 => "Unsigned64",
            BaseType::Float32 => "Float32",
            BaseType::Float64 => "Float64",
            BaseType::Grouped => "Grouped",
        }
    }
}

/// Types defined on top of a base type (encoding of the base type, extra semantics).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DerivedType {
    Address,
    DiameterIdentity,
    DiameterURI,
    Enumerated,
    IPFilterRule,
    QoSFilterRule,
    Time,
    UTF8String,
}

impl DerivedType {
    pub const ALL: [DerivedType; 8] = [
        DerivedType::Address,
        DerivedType::DiameterIdentity,
        DerivedType::DiameterURI,
        DerivedType::Enumerated,
        DerivedType::IPFilterRule,
        DerivedType::QoSFilterRule,
        DerivedType::Time,
        DerivedType::UTF8String,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DerivedType::Address => "Address",
            DerivedType::DiameterIdentity => "DiameterIdentity",
            DerivedType::DiameterURI => "DiameterURI",
            DerivedType::Enumerated => "Enumerated",
            DerivedType::IPFilterRule => "IPFilterRule",
            DerivedType::QoSFilterRule => "QoSFilterRule",
            DerivedType::Time => "Time",
            DerivedType::UTF8String => "UTF8String",
        }
    }

    /// The base type this derived type is encoded as.
    pub fn base(self) -> BaseType {
        match self {
            DerivedType::Enumerated => BaseType::Integer32,
            _ => BaseType::OctetString,
        }
    }
}

/// Data type column: a base type or a derived type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Base(BaseType),
    Derived(DerivedType),
}

impl DataType {
    pub fn name(self) -> &'static str {
        match self {
            DataType::Base(b) => b.name(),
            DataType::Derived(d) => d.name(),
        }
    }

    /// Resolve through the derived-type table.
    pub fn base(self) -> BaseType {
        match self {
            DataType::Base(b) => b,
            DataType::Derived(d) => d.base(),
        }
    }
}

impl FromStr for DataType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(b) = BaseType::ALL.iter().find(|b| b.name() == s) {
            return Ok(DataType::Base(*b));
        }
        DerivedType::ALL
            .iter()
            .find(|d| d.name() == s)
            .map(|d| DataType::Derived(*d))
            .ok_or(())
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The four flag columns of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagColumn {
    Must,
    May,
    ShouldNot,
    MustNot,
}

impl FlagColumn {
    pub const ALL: [FlagColumn; 4] = [
        FlagColumn::Must,
        FlagColumn::May,
        FlagColumn::ShouldNot,
        FlagColumn::MustNot,
    ];
}

impl fmt::Display for FlagColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FlagColumn::Must => "Must",
            FlagColumn::May => "May",
            FlagColumn::ShouldNot => "ShouldNot",
            FlagColumn::MustNot => "MustNot",
        })
    }
}

/// Flag-strings as written in the table, e.g. `"M,V"` or `"P"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Flags {
    pub must: String,
    pub may: String,
    pub should_not: String,
    pub must_not: String,
}

impl Flags {
    pub fn get(&self, column: FlagColumn) -> &str {
        match column {
            FlagColumn::Must => &self.must,
            FlagColumn::May => &self.may,
            FlagColumn::ShouldNot => &self.should_not,
            FlagColumn::MustNot => &self.must_not,
        }
    }

    pub fn contains(&self, column: FlagColumn, symbol: char) -> bool {
        self.get(column).contains(symbol)
    }

    /// Occurrences of `symbol` across all four flag-strings.
    pub fn count(&self, symbol: char) -> usize {
        FlagColumn::ALL
            .iter()
            .map(|c| self.get(*c).matches(symbol).count())
            .sum()
    }
}

/// A validated AVP definition. Built only by the validator.
#[derive(Debug, Clone)]
pub struct Avp {
    pub name: String,
    pub code: u32,
    pub section: String,
    pub data_type: DataType,
    pub flags: Flags,
    pub vendor: u32,
    pub standard: String,
    pub location: Location,
}

impl Avp {
    /// Short description used in diagnostics, e.g. `AVP Session-Id (263)` or `AVP X (10415/1)`.
    pub fn describe(&self) -> String {
        if self.vendor == 0 {
            format!("AVP {} ({})", self.name, self.code)
        } else {
            format!("AVP {} ({}/{})", self.name, self.vendor, self.code)
        }
    }
}

// Section, standard and location are informational only.
impl PartialEq for Avp {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.vendor == other.vendor
            && self.code == other.code
            && self.data_type == other.data_type
            && self.flags == other.flags
    }
}

impl Eq for Avp {}

/// Display name of a vendor, used in generated type names. Vendor 0 is empty.
pub fn vendor_name(vendor: u32) -> String {
    match vendor {
        0 => String::new(),
        5535 => "3GPP2".to_string(),
        10415 => "3GPP".to_string(),
        13019 => "ETSI".to_string(),
        other => other.to_string(),
    }
}
