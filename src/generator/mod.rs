//! Output generators fed by the pipeline.
//!
//! A run calls `on_input` once per input before its rows, `on_attribute` per accepted AVP,
//! `on_comment` per comment row, `on_directive` per directive row, then `finish` exactly once.

mod c;
mod json;
mod trace;

pub use c::CGenerator;
pub use json::JsonGenerator;
pub use trace::Trace;

use crate::avp::Avp;
use std::io::{self, Write};

pub trait Generator {
    fn on_input(&mut self, _input: &str) -> io::Result<()> {
        Ok(())
    }

    fn on_attribute(&mut self, _avp: &Avp) -> io::Result<()> {
        Ok(())
    }

    /// `comment` is the first cell without its leading `#`.
    fn on_comment(&mut self, _comment: &str, _input: &str, _line: usize) -> io::Result<()> {
        Ok(())
    }

    fn on_directive(&mut self, _name: &str, _value: &str) -> io::Result<()> {
        Ok(())
    }

    /// Write the final output. Consumes the generator.
    fn finish(self: Box<Self>, out: &mut dyn Write) -> io::Result<()>;
}

/// Validation only: every event is ignored and nothing is written.
#[derive(Debug, Default)]
pub struct ValidateOnly;

impl Generator for ValidateOnly {
    fn finish(self: Box<Self>, _out: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Base of generated identifiers, e.g. `add_<name>()`.
    pub name: String,
    /// Value of `PROTO_VER` in C output.
    pub proto_version: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            name: "avps".to_string(),
            proto_version: "unspecified".to_string(),
        }
    }
}

/// The available generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum GeneratorKind {
    /// Print every event to stderr.
    Trace,
    /// Validate and detect conflicts only.
    Validate,
    /// freeDiameter dictionary registration code.
    C,
    /// JSON document of all AVPs.
    Json,
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 4] = [
        GeneratorKind::Trace,
        GeneratorKind::Validate,
        GeneratorKind::C,
        GeneratorKind::Json,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GeneratorKind::Trace => "trace",
            GeneratorKind::Validate => "validate",
            GeneratorKind::C => "c",
            GeneratorKind::Json => "json",
        }
    }

    pub fn create(self, options: &GeneratorOptions) -> Box<dyn Generator> {
        match self {
            GeneratorKind::Trace => Box::new(Trace::new(io::stderr())),
            GeneratorKind::Validate => Box::new(ValidateOnly),
            GeneratorKind::C => Box::new(CGenerator::new(options.clone())),
            GeneratorKind::Json => Box::new(JsonGenerator::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_only_writes_nothing() {
        let mut g = GeneratorKind::Validate.create(&GeneratorOptions::default());
        g.on_input("a.csv").unwrap();
        g.on_comment("=", "a.csv", 1).unwrap();
        g.on_directive("vendor", "10415").unwrap();
        let mut out = Vec::new();
        g.finish(&mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn kind_names_unique() {
        let mut names: Vec<_> = GeneratorKind::ALL.iter().map(|k| k.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), GeneratorKind::ALL.len());
    }
}
