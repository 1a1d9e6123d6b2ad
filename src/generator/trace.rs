//! Trace generator: one line per event on a diagnostic stream, no accumulation.

use super::Generator;
use crate::avp::Avp;
use std::io::{self, Write};

pub struct Trace<W: Write> {
    out: W,
}

impl<W: Write> Trace<W> {
    pub fn new(out: W) -> Self {
        Trace { out }
    }
}

impl<W: Write> Generator for Trace<W> {
    fn on_input(&mut self, input: &str) -> io::Result<()> {
        writeln!(self.out, "input {}", input)
    }

    fn on_attribute(&mut self, avp: &Avp) -> io::Result<()> {
        writeln!(
            self.out,
            "avp {} {} type={} must='{}' may='{}' shouldnot='{}' mustnot='{}' section='{}' standard='{}'",
            avp.location,
            avp.describe(),
            avp.data_type,
            avp.flags.must,
            avp.flags.may,
            avp.flags.should_not,
            avp.flags.must_not,
            avp.section,
            avp.standard
        )
    }

    fn on_comment(&mut self, comment: &str, input: &str, line: usize) -> io::Result<()> {
        writeln!(self.out, "comment {}:{} '{}'", input, line, comment)
    }

    fn on_directive(&mut self, name: &str, value: &str) -> io::Result<()> {
        writeln!(self.out, "directive @{} '{}'", name, value)
    }

    fn finish(mut self: Box<Self>, _out: &mut dyn Write) -> io::Result<()> {
        writeln!(self.out, "finish")?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avp::{DataType, DerivedType, Flags, Location};

    #[test]
    fn events_are_traced_in_order() {
        let mut diag = Vec::new();
        let mut artifact = Vec::new();
        {
            let mut t = Box::new(Trace::new(&mut diag));
            t.on_input("base.csv").unwrap();
            t.on_directive("vendor", "0").unwrap();
            t.on_comment(" Base", "base.csv", 2).unwrap();
            t.on_attribute(&Avp {
                name: "Session-Id".to_string(),
                code: 263,
                section: "8.8".to_string(),
                data_type: DataType::Derived(DerivedType::UTF8String),
                flags: Flags {
                    must: "M".to_string(),
                    may: "P".to_string(),
                    should_not: String::new(),
                    must_not: "V".to_string(),
                },
                vendor: 0,
                standard: "RFC 6733".to_string(),
                location: Location::new("base.csv", 3),
            })
            .unwrap();
            t.finish(&mut artifact).unwrap();
        }
        let text = String::from_utf8(diag).unwrap();
        assert_eq!(
            text,
            "input base.csv\n\
             directive @vendor '0'\n\
             comment base.csv:2 ' Base'\n\
             avp base.csv:3 AVP Session-Id (263) type=UTF8String must='M' may='P' shouldnot='' mustnot='V' section='8.8' standard='RFC 6733'\n\
             finish\n"
        );
        assert!(artifact.is_empty());
    }
}
