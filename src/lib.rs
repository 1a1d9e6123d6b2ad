//! # avpgen — AVP table validation and code generation
//!
//! Reads RADIUS/Diameter AVP definitions from CSV tables, validates them, detects
//! duplicate or conflicting definitions across all inputs, and hands accepted
//! definitions to a generator (trace, validate-only, freeDiameter C code, JSON).
//!
//! ## Table layout
//!
//! Eight columns: `name, code, section, data type, Must, May, ShouldNot, MustNot`.
//!
//! - First cell `#...`: comment (`#` blank line, `#=` separator, `# text` boxed text).
//! - First cell `@standard` / `@vendor`: directive, value in the second cell.
//! - Empty first cell or a header label: skipped.
//! - Anything else: an AVP definition.
//!
//! ## Example table
//!
//! ```text
//! Attribute Name,Code,Section,Data Type,Must,May,Should Not,Must Not
//! @standard,RFC 6733
//! #=
//! # Base protocol
//! #=
//! Session-Id,263,8.8,UTF8String,M,P,,V
//! @vendor,10415
//! RAT-Type,1032,7.3.31,Enumerated,"M,V",P,,
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use avpgen::{read_file, run, GeneratorKind, GeneratorOptions, ValidateOptions};
//! use std::path::Path;
//!
//! let input = read_file(Path::new("base.csv"))?;
//! let generator = GeneratorKind::Json.create(&GeneratorOptions::default());
//! run(&[input], generator, ValidateOptions::default(), &mut std::io::stdout())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod avp;
pub mod error;
pub mod generator;
pub mod pipeline;
pub mod registry;
pub mod row;
pub mod source;
pub mod validate;

pub use avp::{Avp, BaseType, DataType, DerivedType, FlagColumn, Flags, Location};
pub use error::{Error, ErrorKind, InputErrors, RunError, Violation};
pub use generator::{Generator, GeneratorKind, GeneratorOptions};
pub use pipeline::{run, Pipeline};
pub use registry::Registry;
pub use row::{classify, Context, Directive, RowKind};
pub use source::{parse_rows, read_file, Input, Row};
pub use validate::{validate, ValidateOptions};
