//! C generator: freeDiameter dictionary registration code.
//!
//! Lines are accumulated per output unit (one implicit unit, named after the
//! generator options) together with the derived types its AVPs refer to. `finish`
//! writes the preamble, one `add_<unit>()` function per unit, and nothing else.

use super::{Generator, GeneratorOptions};
use crate::avp::{vendor_name, Avp, BaseType, DataType, DerivedType, FlagColumn};
use std::collections::BTreeSet;
use std::io::{self, Write};

/// Inner width of boxed comments.
pub const COMMENT_WIDTH: usize = 64;

#[derive(Debug, Default)]
struct Unit {
    name: String,
    lines: Vec<String>,
    derived: BTreeSet<&'static str>,
}

#[derive(Debug)]
pub struct CGenerator {
    options: GeneratorOptions,
    inputs: Vec<String>,
    units: Vec<Unit>,
}

impl CGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        CGenerator {
            options,
            inputs: Vec::new(),
            units: Vec::new(),
        }
    }

    fn unit(&mut self) -> &mut Unit {
        if self.units.is_empty() {
            self.units.push(Unit {
                name: self.options.name.clone(),
                ..Unit::default()
            });
        }
        let last = self.units.len() - 1;
        &mut self.units[last]
    }

    fn add(&mut self, line: impl Into<String>) {
        self.unit().lines.push(line.into());
    }

    fn write_preamble(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "/*")?;
        writeln!(out, " * Generated by avpgen (c generator) from:")?;
        for input in &self.inputs {
            writeln!(out, " *\t{}", sanitize_comment(input))?;
        }
        writeln!(out, " */")?;
        writeln!(out)?;
        writeln!(out, "#include <freeDiameter/extension.h>")?;
        writeln!(out)?;
        writeln!(out, "#define PROTO_VER \"{}\"", escape_c(&self.options.proto_version))?;
        writeln!(out)?;
        writeln!(out, "/* Create a dictionary object, return on error */")?;
        writeln!(out, "#define CHECK_dict_new( _type, _data, _parent, _ref ) \\")?;
        writeln!(
            out,
            "\tCHECK_FCT( fd_dict_new( fd_g_config->cnf_dict, (_type), (_data), (_parent), (_ref)) );"
        )?;
        writeln!(out)?;
        writeln!(out, "/* Look up a dictionary object, return on error */")?;
        writeln!(
            out,
            "#define CHECK_dict_search( _type, _criteria, _what, _result ) \\"
        )?;
        writeln!(
            out,
            "\tCHECK_FCT( fd_dict_search( fd_g_config->cnf_dict, (_type), (_criteria), (_what), (_result), ENOENT) );"
        )?;
        Ok(())
    }
}

fn avp_type(base: BaseType) -> &'static str {
    match base {
        BaseType::OctetString => "AVP_TYPE_OCTETSTRING",
        BaseType::Integer32 => "AVP_TYPE_INTEGER32",
        BaseType::Integer64 => "AVP_TYPE_INTEGER64",
        BaseType::Unsigned32 => "AVP_TYPE_UNSIGNED32",
        BaseType::Unsigned64 => "AVP_TYPE_UNSIGNED64",
        BaseType::Float32 => "AVP_TYPE_FLOAT32",
        BaseType::Float64 => "AVP_TYPE_FLOAT64",
        BaseType::Grouped => "AVP_TYPE_GROUPED",
    }
}

fn flag_mask(vendor: bool, mandatory: bool) -> String {
    match (vendor, mandatory) {
        (true, true) => "AVP_FLAG_VENDOR | AVP_FLAG_MANDATORY".to_string(),
        (true, false) => "AVP_FLAG_VENDOR".to_string(),
        (false, true) => "AVP_FLAG_MANDATORY".to_string(),
        (false, false) => "0".to_string(),
    }
}

/// Keep free text from closing a C comment.
fn sanitize_comment(s: &str) -> String {
    s.replace("*/", "* /")
}

fn escape_c(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

impl Generator for CGenerator {
    fn on_input(&mut self, input: &str) -> io::Result<()> {
        self.inputs.push(input.to_string());
        Ok(())
    }

    fn on_attribute(&mut self, avp: &Avp) -> io::Result<()> {
        let flags = &avp.flags;
        let fixed = flag_mask(
            flags.contains(FlagColumn::Must, 'V') || flags.contains(FlagColumn::MustNot, 'V'),
            flags.contains(FlagColumn::Must, 'M') || flags.contains(FlagColumn::MustNot, 'M'),
        );
        let values = flag_mask(
            flags.contains(FlagColumn::Must, 'V'),
            flags.contains(FlagColumn::Must, 'M'),
        );

        let mut comment = format!("{}, {}, code {}", avp.name, avp.data_type, avp.code);
        if !avp.section.is_empty() {
            comment.push_str(&format!(", section {}", avp.section));
        }
        self.add(format!("\t/* {} */", sanitize_comment(&comment)));
        self.add("\t{");

        let parent = match avp.data_type {
            DataType::Derived(DerivedType::Enumerated) => {
                // Vendor-qualified AVP name inside the parentheses, as in freeDiameter dictionaries.
                let qualified = if avp.vendor == 0 {
                    avp.name.clone()
                } else {
                    format!("{}/{}", vendor_name(avp.vendor), avp.name)
                };
                self.add("\t\tstruct dict_object\t\t*type;");
                self.add(format!(
                    "\t\tstruct dict_type_data\t tdata = {{ {}, \"Enumerated({})\", NULL, NULL, NULL }};",
                    avp_type(BaseType::Integer32),
                    escape_c(&qualified)
                ));
                self.add("\t\tCHECK_dict_new(DICT_TYPE, &tdata, NULL, &type);");
                "type".to_string()
            }
            DataType::Derived(derived) => {
                self.unit().derived.insert(derived.name());
                format!("{}_type", derived.name())
            }
            DataType::Base(_) => "NULL".to_string(),
        };

        self.add("\t\tstruct dict_avp_data data = {");
        self.add(format!("\t\t\t{},\t/* Code */", avp.code));
        self.add(format!("\t\t\t{},\t/* Vendor */", avp.vendor));
        self.add(format!("\t\t\t\"{}\",\t/* Name */", avp.name));
        self.add(format!("\t\t\t{},\t/* Fixed flags */", fixed));
        self.add(format!("\t\t\t{},\t/* Fixed flag values */", values));
        self.add(format!("\t\t\t{}\t/* base type of data */", avp_type(avp.data_type.base())));
        self.add("\t\t};");
        self.add(format!("\t\tCHECK_dict_new(DICT_AVP, &data, {}, NULL);", parent));
        self.add("\t};");
        self.add("");
        Ok(())
    }

    fn on_comment(&mut self, comment: &str, _input: &str, _line: usize) -> io::Result<()> {
        if comment.is_empty() {
            self.add("");
        } else if comment == "=" {
            self.add(format!("\t/*{}*/", "=".repeat(COMMENT_WIDTH)));
        } else if let Some(text) = comment.strip_prefix(' ') {
            self.add(format!(
                "\t/* {:<width$} */",
                sanitize_comment(text),
                width = COMMENT_WIDTH - 2
            ));
        }
        Ok(())
    }

    fn finish(mut self: Box<Self>, out: &mut dyn Write) -> io::Result<()> {
        self.unit();
        self.write_preamble(out)?;
        for unit in &self.units {
            writeln!(out)?;
            writeln!(out, "int add_{}(void)", unit.name)?;
            writeln!(out, "{{")?;
            if !unit.derived.is_empty() {
                writeln!(out, "\t/* Derived AVP types */")?;
                for derived in &unit.derived {
                    writeln!(out, "\tstruct dict_object * {}_type = NULL;", derived)?;
                    writeln!(
                        out,
                        "\tCHECK_dict_search(DICT_TYPE, TYPE_BY_NAME, \"{}\", &{}_type);",
                        derived, derived
                    )?;
                }
                writeln!(out)?;
            }
            for line in &unit.lines {
                writeln!(out, "{}", line)?;
            }
            writeln!(out, "\treturn 0;")?;
            writeln!(out, "}}")?;
        }
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avp::{Flags, Location};

    fn avp(name: &str, data_type: DataType, vendor: u32, must: &str, must_not: &str) -> Avp {
        Avp {
            name: name.to_string(),
            code: 7,
            section: "5.3".to_string(),
            data_type,
            flags: Flags {
                must: must.to_string(),
                must_not: must_not.to_string(),
                ..Flags::default()
            },
            vendor,
            standard: String::new(),
            location: Location::new("c.csv", 1),
        }
    }

    fn render(g: CGenerator) -> String {
        let mut out = Vec::new();
        Box::new(g).finish(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn flag_masks_and_base_type() {
        let mut g = CGenerator::new(GeneratorOptions::default());
        g.on_input("c.csv").unwrap();
        g.on_attribute(&avp("Foo", DataType::Base(BaseType::Unsigned32), 0, "M", "V"))
            .unwrap();
        let text = render(g);
        assert!(text.contains("\t/* Foo, Unsigned32, code 7, section 5.3 */\n"));
        assert!(text.contains("\t\t\tAVP_FLAG_VENDOR | AVP_FLAG_MANDATORY,\t/* Fixed flags */\n"));
        assert!(text.contains("\t\t\tAVP_FLAG_MANDATORY,\t/* Fixed flag values */\n"));
        assert!(text.contains("\t\t\tAVP_TYPE_UNSIGNED32\t/* base type of data */\n"));
        assert!(text.contains("CHECK_dict_new(DICT_AVP, &data, NULL, NULL);"));
        assert!(text.contains(" *\tc.csv\n"));
        assert!(text.contains("int add_avps(void)\n{\n"));
        assert!(!text.contains("Derived AVP types"));
    }

    #[test]
    fn enumerated_gets_vendor_qualified_type() {
        let mut g = CGenerator::new(GeneratorOptions::default());
        g.on_attribute(&avp(
            "RAT-Type",
            DataType::Derived(DerivedType::Enumerated),
            10415,
            "M,V",
            "",
        ))
        .unwrap();
        let text = render(g);
        let tdata = text.find("\"Enumerated(3GPP/RAT-Type)\"").expect("type declaration");
        let data = text.find("struct dict_avp_data").expect("avp declaration");
        assert!(tdata < data);
        assert!(text.contains("CHECK_dict_new(DICT_AVP, &data, type, NULL);"));
        assert!(text.contains("\t\t\tAVP_TYPE_INTEGER32\t/* base type of data */\n"));
        assert!(!text.contains("Enumerated_type"));
    }

    #[test]
    fn derived_lookups_sorted_and_distinct() {
        let mut g = CGenerator::new(GeneratorOptions::default());
        g.on_attribute(&avp("T", DataType::Derived(DerivedType::UTF8String), 0, "M", ""))
            .unwrap();
        g.on_attribute(&avp("U", DataType::Derived(DerivedType::Address), 0, "M", ""))
            .unwrap();
        g.on_attribute(&avp("V", DataType::Derived(DerivedType::UTF8String), 0, "M", ""))
            .unwrap();
        let text = render(g);
        let address = text.find("\"Address\", &Address_type").expect("Address lookup");
        let utf8 = text.find("\"UTF8String\", &UTF8String_type").expect("UTF8String lookup");
        assert!(address < utf8);
        assert_eq!(text.matches("TYPE_BY_NAME, \"UTF8String\"").count(), 1);
        let body = text.find("/* T, UTF8String").expect("body");
        assert!(utf8 < body);
        assert!(text.contains("CHECK_dict_new(DICT_AVP, &data, UTF8String_type, NULL);"));
    }

    #[test]
    fn comments() {
        let mut g = CGenerator::new(GeneratorOptions::default());
        g.on_comment("=", "c.csv", 1).unwrap();
        g.on_comment(" Base protocol", "c.csv", 2).unwrap();
        g.on_comment("", "c.csv", 3).unwrap();
        g.on_comment("private note", "c.csv", 4).unwrap();
        let unit = &g.units[0];
        assert_eq!(unit.lines.len(), 3);
        assert_eq!(unit.lines[0], format!("\t/*{}*/", "=".repeat(COMMENT_WIDTH)));
        assert_eq!(unit.lines[1].len(), unit.lines[0].len());
        assert!(unit.lines[1].starts_with("\t/* Base protocol "));
        assert!(unit.lines[1].ends_with(" */"));
        assert_eq!(unit.lines[2], "");
    }

    #[test]
    fn directives_ignored() {
        let mut g = CGenerator::new(GeneratorOptions::default());
        g.on_directive("vendor", "10415").unwrap();
        assert!(g.units.is_empty());
        let text = render(g);
        assert!(text.contains("int add_avps(void)\n{\n\treturn 0;\n}\n"));
    }
}
