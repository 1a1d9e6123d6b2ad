//! Validate AVP tables and generate output.
//!
//! Usage:
//!   avpgen [OPTIONS] FILE.csv ...
//!
//! Files are processed in order. Every row error of the first failing file is printed
//! to stderr and the exit status is 1; no output is written in that case.

use anyhow::Context as _;
use avpgen::{read_file, run, GeneratorKind, GeneratorOptions, RunError, ValidateOptions};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "avpgen")]
#[command(about = "Validate RADIUS/Diameter AVP tables and generate code or JSON")]
#[command(version)]
struct Args {
    /// CSV tables to process, in order
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Generator to run
    #[arg(short, long, value_enum, default_value = "validate")]
    generator: GeneratorKind,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Name used in generated identifiers (C: add_<NAME>)
    #[arg(short, long, default_value = "avps")]
    name: String,

    /// Protocol version written as PROTO_VER (C)
    #[arg(long, default_value = "unspecified")]
    proto_version: String,

    /// Require 'M' in Must or MustNot for every AVP
    #[arg(long)]
    strict: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if args.verbose {
        EnvFilter::new("avpgen=debug")
    } else {
        EnvFilter::new("avpgen=warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
    debug!("generator {}", args.generator.name());

    let mut inputs = Vec::with_capacity(args.files.len());
    for path in &args.files {
        inputs.push(read_file(path)?);
    }

    let options = GeneratorOptions {
        name: args.name.clone(),
        proto_version: args.proto_version.clone(),
    };
    let validate_options = ValidateOptions {
        require_mandatory_flag: args.strict,
    };
    let generator = args.generator.create(&options);

    // Buffer so a failed run leaves no partial output file.
    let mut buf = Vec::new();
    match run(&inputs, generator, validate_options, &mut buf) {
        Ok(()) => {}
        Err(RunError::Input(errs)) => {
            for e in &errs.errors {
                eprintln!("{}", e);
            }
            eprintln!("{}", errs);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    }

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("{}: create failed", path.display()))?;
            let mut w = BufWriter::new(file);
            w.write_all(&buf)?;
            w.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(&buf)?;
            lock.flush()?;
        }
    }
    Ok(())
}
