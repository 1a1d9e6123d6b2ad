//! Pipeline driver: classify, validate and register each row, feed the generator.
//!
//! Row errors of one input are collected and reported together. A run with any
//! failing input never reaches [`Generator::finish`].

use crate::avp::Location;
use crate::error::{Error, InputErrors, RunError};
use crate::generator::Generator;
use crate::registry::Registry;
use crate::row::{classify, Context, RowKind};
use crate::source::{Input, Row};
use crate::validate::{validate, ValidateOptions};
use std::io::Write;
use tracing::{debug, info};

pub struct Pipeline {
    generator: Box<dyn Generator>,
    registry: Registry,
    options: ValidateOptions,
}

impl Pipeline {
    pub fn new(generator: Box<dyn Generator>, options: ValidateOptions) -> Self {
        Pipeline {
            generator,
            registry: Registry::new(),
            options,
        }
    }

    /// Process one input's rows in order. Returns every row error of the input.
    pub fn process(&mut self, input: &str, rows: &[Row]) -> Result<(), InputErrors> {
        debug!("processing {} ({} rows)", input, rows.len());
        let mut errors = Vec::new();
        if let Err(e) = self.generator.on_input(input) {
            errors.push(Error::Output { source: e });
        }
        let mut ctx = Context::default();
        for row in rows {
            if let Err(e) = self.process_row(input, row, &mut ctx) {
                errors.push(e);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            debug!("{}: {} error(s)", input, errors.len());
            Err(InputErrors {
                input: input.to_string(),
                errors,
            })
        }
    }

    fn process_row(&mut self, input: &str, row: &Row, ctx: &mut Context) -> Result<(), Error> {
        match classify(row, input)? {
            RowKind::Skip => Ok(()),
            RowKind::Comment(comment) => self
                .generator
                .on_comment(comment, input, row.line)
                .map_err(|source| Error::Output { source }),
            RowKind::Directive { directive, value } => {
                debug!("{}:{}: @{} {}", input, row.line, directive.name(), value);
                ctx.apply(&directive);
                self.generator
                    .on_directive(directive.name(), value)
                    .map_err(|source| Error::Output { source })
            }
            RowKind::Attribute(attr) => {
                let avp = validate(&attr, ctx, Location::new(input, row.line), &self.options)?;
                self.registry.claim(&avp)?;
                self.generator
                    .on_attribute(&avp)
                    .map_err(|source| Error::Output { source })
            }
        }
    }

    /// Number of AVPs accepted so far.
    pub fn accepted(&self) -> usize {
        self.registry.len()
    }

    /// Write the generator's output. Call only after every input succeeded.
    pub fn finish(self, out: &mut dyn Write) -> std::io::Result<()> {
        info!("{} AVP(s) accepted", self.registry.len());
        self.generator.finish(out)
    }
}

/// Process all inputs in order; stop at the first failing input, otherwise finish.
pub fn run(
    inputs: &[Input],
    generator: Box<dyn Generator>,
    options: ValidateOptions,
    out: &mut dyn Write,
) -> Result<(), RunError> {
    let mut pipeline = Pipeline::new(generator, options);
    for input in inputs {
        pipeline.process(&input.name, &input.rows)?;
    }
    pipeline.finish(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::generator::ValidateOnly;
    use std::cell::RefCell;
    use std::io;
    use std::rc::Rc;

    /// Records events for ordering checks.
    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl Generator for Recorder {
        fn on_input(&mut self, input: &str) -> io::Result<()> {
            self.0.borrow_mut().push(format!("input {}", input));
            Ok(())
        }
        fn on_attribute(&mut self, avp: &crate::avp::Avp) -> io::Result<()> {
            self.0.borrow_mut().push(format!("avp {} {}", avp.name, avp.standard));
            Ok(())
        }
        fn on_comment(&mut self, comment: &str, input: &str, line: usize) -> io::Result<()> {
            self.0.borrow_mut().push(format!("comment {}:{} {}", input, line, comment));
            Ok(())
        }
        fn on_directive(&mut self, name: &str, value: &str) -> io::Result<()> {
            self.0.borrow_mut().push(format!("directive {} {}", name, value));
            Ok(())
        }
        fn finish(self: Box<Self>, _out: &mut dyn Write) -> io::Result<()> {
            self.0.borrow_mut().push("finish".to_string());
            Ok(())
        }
    }

    /// Fails every attribute write.
    struct BrokenSink;

    impl Generator for BrokenSink {
        fn on_input(&mut self, _input: &str) -> io::Result<()> {
            Ok(())
        }
        fn on_attribute(&mut self, _avp: &crate::avp::Avp) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
        }
        fn on_comment(&mut self, _comment: &str, _input: &str, _line: usize) -> io::Result<()> {
            Ok(())
        }
        fn on_directive(&mut self, _name: &str, _value: &str) -> io::Result<()> {
            Ok(())
        }
        fn finish(self: Box<Self>, _out: &mut dyn Write) -> io::Result<()> {
            Ok(())
        }
    }

    fn input(name: &str, rows: Vec<Row>) -> Input {
        Input {
            name: name.to_string(),
            rows,
        }
    }

    #[test]
    fn events_in_row_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let inputs = vec![input(
            "a.csv",
            vec![
                Row::new(1, ["Attribute Name", "Code"]),
                Row::new(2, ["@standard", "RFC 6733"]),
                Row::new(3, ["#="]),
                Row::new(4, ["Session-Id", "263", "8.8", "UTF8String", "M", "P", "", "V"]),
            ],
        )];
        let mut out = Vec::new();
        run(&inputs, Box::new(Recorder(log.clone())), ValidateOptions::default(), &mut out)
            .expect("run");
        assert_eq!(
            *log.borrow(),
            vec![
                "input a.csv",
                "directive standard RFC 6733",
                "comment a.csv:3 =",
                "avp Session-Id RFC 6733",
                "finish",
            ]
        );
    }

    #[test]
    fn all_row_errors_of_an_input_collected_and_finish_skipped() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let inputs = vec![
            input(
                "bad.csv",
                vec![
                    Row::new(1, ["bad name", "1", "", "OctetString", "M"]),
                    Row::new(2, ["@colour", "red"]),
                    Row::new(3, ["Good", "2", "", "OctetString", "M"]),
                    Row::new(4, ["Big", "4294967296", "", "OctetString", "M"]),
                ],
            ),
            input("never.csv", vec![Row::new(1, ["Other", "3", "", "OctetString", "M"])]),
        ];
        let mut out = Vec::new();
        let err = run(&inputs, Box::new(Recorder(log.clone())), ValidateOptions::default(), &mut out)
            .unwrap_err();
        let RunError::Input(errs) = err else {
            panic!("expected input errors");
        };
        assert_eq!(errs.input, "bad.csv");
        let kinds: Vec<_> = errs.errors.iter().map(Error::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ErrorKind::InvalidAttributeField,
                ErrorKind::UnknownDirective,
                ErrorKind::InvalidAttributeField,
            ]
        );
        let log = log.borrow();
        assert!(log.contains(&"avp Good ".to_string()));
        assert!(!log.iter().any(|e| e == "finish" || e == "input never.csv"));
    }

    #[test]
    fn vendor_context_resets_per_input() {
        let mut p = Pipeline::new(Box::new(ValidateOnly), ValidateOptions::default());
        p.process(
            "3gpp.csv",
            &[
                Row::new(1, ["@vendor", "10415"]),
                Row::new(2, ["RAT-Type", "1032", "", "Enumerated", "M,V"]),
            ],
        )
        .expect("vendor input");
        let err = p
            .process("base.csv", &[Row::new(1, ["Loose", "1", "", "OctetString", "M,V"])])
            .unwrap_err();
        assert_eq!(err.errors[0].kind(), ErrorKind::FlagConsistencyViolation);
        assert_eq!(p.accepted(), 1);
    }

    #[test]
    fn conflict_across_inputs_names_both_locations() {
        let mut p = Pipeline::new(Box::new(ValidateOnly), ValidateOptions::default());
        p.process("one.csv", &[Row::new(4, ["A", "1", "", "OctetString", "M"])])
            .expect("first");
        let err = p
            .process("two.csv", &[Row::new(9, ["B", "1", "", "OctetString", "M"])])
            .unwrap_err();
        let e = &err.errors[0];
        assert_eq!(e.kind(), ErrorKind::ConflictingDefinition);
        let msg = e.to_string();
        assert!(msg.contains("two.csv:9"), "{}", msg);
        assert!(msg.contains("one.csv:4"), "{}", msg);
    }

    #[test]
    fn generator_write_failure_is_output_error() {
        let mut p = Pipeline::new(Box::new(BrokenSink), ValidateOptions::default());
        let err = p
            .process("table.csv", &[Row::new(2, ["A", "1", "", "OctetString", "M"])])
            .unwrap_err();
        let e = &err.errors[0];
        assert_eq!(e.kind(), ErrorKind::Io);
        assert!(matches!(e, Error::Output { .. }));
        assert_eq!(e.to_string(), "generator output: sink closed");
        assert!(!e.to_string().contains("table.csv"));
        assert_eq!(err.input, "table.csv");
    }
}
