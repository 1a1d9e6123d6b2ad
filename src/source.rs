//! Read CSV AVP tables into rows using PEST.

use crate::error::Error;
use pest::Parser;
use pest_derive::Parser as PestParser;
use std::path::Path;

#[derive(PestParser)]
#[grammar = "grammar.pest"]
struct CsvParser;

/// One CSV record: the line it starts on and its trimmed cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub line: usize,
    pub cells: Vec<String>,
    /// Index of the first cell with unbalanced quotes, kept raw in `cells`.
    pub malformed: Option<usize>,
}

impl Row {
    pub fn new<S: Into<String>>(line: usize, cells: impl IntoIterator<Item = S>) -> Self {
        Row {
            line,
            cells: cells.into_iter().map(Into::into).collect(),
            malformed: None,
        }
    }
}

/// A named input unit and its rows.
#[derive(Debug, Clone)]
pub struct Input {
    pub name: String,
    pub rows: Vec<Row>,
}

/// Parse CSV text. Records whose cells are all empty are dropped.
pub fn parse_rows(input: &str, source: &str) -> Result<Vec<Row>, Error> {
    let pairs = CsvParser::parse(Rule::file, source).map_err(|e| Error::Csv {
        input: input.to_string(),
        message: e.to_string(),
    })?;
    let file = pairs.into_iter().next().ok_or_else(|| Error::Csv {
        input: input.to_string(),
        message: "empty parse".to_string(),
    })?;

    let mut rows = Vec::new();
    for record in file.into_inner() {
        if record.as_rule() != Rule::record {
            continue;
        }
        let (line, _) = record.as_span().start_pos().line_col();
        let mut malformed = None;
        let mut cells = Vec::new();
        for (i, cell) in record.into_inner().enumerate() {
            if cell.as_rule() == Rule::malformed && malformed.is_none() {
                malformed = Some(i);
            }
            cells.push(build_cell(cell));
        }
        if cells.iter().all(|c| c.is_empty()) {
            continue;
        }
        rows.push(Row {
            line,
            cells,
            malformed,
        });
    }
    Ok(rows)
}

fn build_cell(pair: pest::iterators::Pair<Rule>) -> String {
    match pair.as_rule() {
        Rule::quoted => pair
            .into_inner()
            .next()
            .map(|text| text.as_str().replace("\"\"", "\""))
            .unwrap_or_default()
            .trim()
            .to_string(),
        _ => pair.as_str().trim().to_string(),
    }
}

/// Read and parse one CSV file. The input is named after the path.
pub fn read_file(path: &Path) -> Result<Input, Error> {
    let name = path.display().to_string();
    let source = std::fs::read_to_string(path).map_err(|e| Error::Io {
        path: name.clone(),
        source: e,
    })?;
    let rows = parse_rows(&name, &source)?;
    Ok(Input { name, rows })
}
