//! Row fuzz target: feed arbitrary bytes through the CSV reader and the validate-only pipeline.
//! Neither may panic; errors are expected.
//! Build with: cargo fuzz run rows_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    let rows = match avpgen::parse_rows("fuzz", s) {
        Ok(rows) => rows,
        Err(_) => return,
    };
    let input = avpgen::Input {
        name: "fuzz".to_string(),
        rows,
    };
    let generator = avpgen::GeneratorKind::C.create(&avpgen::GeneratorOptions::default());
    let _ = avpgen::run(&[input], generator, avpgen::ValidateOptions::default(), &mut Vec::<u8>::new());
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run rows_fuzz");
}
