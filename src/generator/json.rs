//! JSON generator: `{"AVPs": [...]}` with one object per AVP in input order.

use super::Generator;
use crate::avp::{Avp, FlagColumn, Flags};
use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct JsonFlags {
    pub must: String,
    pub must_not: String,
}

/// One AVP as written; field order is the key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct JsonAvp {
    pub code: u32,
    pub flags: JsonFlags,
    pub name: String,
    pub r#type: String,
    pub vendor: u32,
}

#[derive(Serialize)]
struct Document<'a> {
    #[serde(rename = "AVPs")]
    avps: &'a [JsonAvp],
}

/// `V` then `M`, each if present in the flag-string.
fn flag_letters(flags: &Flags, column: FlagColumn) -> String {
    ['V', 'M']
        .iter()
        .filter(|s| flags.contains(column, **s))
        .collect()
}

impl From<&Avp> for JsonAvp {
    fn from(avp: &Avp) -> Self {
        JsonAvp {
            code: avp.code,
            flags: JsonFlags {
                must: flag_letters(&avp.flags, FlagColumn::Must),
                must_not: flag_letters(&avp.flags, FlagColumn::MustNot),
            },
            name: avp.name.clone(),
            r#type: avp.data_type.name().to_string(),
            vendor: avp.vendor,
        }
    }
}

#[derive(Debug, Default)]
pub struct JsonGenerator {
    avps: Vec<JsonAvp>,
}

impl JsonGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Generator for JsonGenerator {
    fn on_attribute(&mut self, avp: &Avp) -> io::Result<()> {
        self.avps.push(JsonAvp::from(avp));
        Ok(())
    }

    fn finish(self: Box<Self>, out: &mut dyn Write) -> io::Result<()> {
        let doc = Document { avps: &self.avps };
        serde_json::to_writer_pretty(&mut *out, &doc)?;
        writeln!(out)?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avp::{BaseType, DataType, DerivedType, Location};

    fn avp(name: &str, data_type: DataType, vendor: u32, must: &str, must_not: &str) -> Avp {
        Avp {
            name: name.to_string(),
            code: 263,
            section: String::new(),
            data_type,
            flags: Flags {
                must: must.to_string(),
                may: "P".to_string(),
                should_not: String::new(),
                must_not: must_not.to_string(),
            },
            vendor,
            standard: String::new(),
            location: Location::new("j.csv", 1),
        }
    }

    #[test]
    fn document_shape_and_key_order() {
        let mut g = Box::new(JsonGenerator::new());
        g.on_attribute(&avp("Session-Id", DataType::Derived(DerivedType::UTF8String), 0, "M", "V"))
            .unwrap();
        g.on_comment("", "j.csv", 2).unwrap();
        let mut out = Vec::new();
        g.finish(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let expected = r#"{
  "AVPs": [
    {
      "Code": 263,
      "Flags": {
        "Must": "M",
        "MustNot": "V"
      },
      "Name": "Session-Id",
      "Type": "UTF8String",
      "Vendor": 0
    }
  ]
}
"#;
        assert_eq!(text, expected);
    }

    #[test]
    fn v_before_m() {
        let j = JsonAvp::from(&avp("X", DataType::Base(BaseType::Grouped), 10415, "M, V", ""));
        assert_eq!(j.flags.must, "VM");
        assert_eq!(j.flags.must_not, "");
        assert_eq!(j.vendor, 10415);
    }
}
