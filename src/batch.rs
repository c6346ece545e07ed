//! Batch orchestration and record I/O.
//!
//! A study run derives hundreds to thousands of grammar records per
//! generation. Records are independent — no shared mutable state — so the
//! batch fans out across records with `rayon` while each derivation stays
//! strictly sequential inside. Input order is preserved in the output.
//!
//! One malformed record never aborts a batch: JSON errors are caught per
//! line at read time, validation errors per record at derive time, and both
//! are collected as [`RecordFailure`]s while the rest keep going.
//!
//! Wire formats: grammar records arrive as JSON Lines (one record per line,
//! historical column names, see `grammar.rs`); constructions leave as a
//! three-column CSV table (`language,number,construction`).

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use rayon::prelude::*;

use crate::api::{Derivation, Options, derive_with};
use crate::grammar::{Domain, Grammar, GrammarError};

/// One output record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructionRow {
    pub language: String,
    pub number: i64,
    pub construction: String,
}

/// A grammar record that could not be processed, attributed to its source
/// line where known (0 when the record was built programmatically).
#[derive(Debug)]
pub struct RecordFailure {
    pub line: usize,
    pub language: Option<String>,
    pub error: GrammarError,
}

/// Outcome of one batch run.
#[derive(Debug)]
pub struct BatchReport {
    /// Successful derivations, in input order.
    pub derivations: Vec<Derivation>,
    pub failures: Vec<RecordFailure>,
}

impl BatchReport {
    /// Flatten every derivation into output rows, in input order.
    pub fn rows(&self) -> Vec<ConstructionRow> {
        self.derivations
            .iter()
            .flat_map(|derivation| {
                derivation.constructions().map(move |(number, construction)| ConstructionRow {
                    language: derivation.language.clone(),
                    number,
                    construction,
                })
            })
            .collect()
    }
}

/// Parse JSONL grammar records from `reader`.
///
/// Blank lines are skipped; a line that fails to parse becomes a
/// [`RecordFailure`] and reading continues. Line numbers are 1-based.
pub fn read_grammars<R: BufRead>(reader: R) -> io::Result<(Vec<(usize, Grammar)>, Vec<RecordFailure>)> {
    let mut records = Vec::new();
    let mut failures = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let number = index + 1;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Grammar>(&line) {
            Ok(grammar) => records.push((number, grammar)),
            Err(error) => {
                tracing::error!(line = number, %error, "skipping unparseable grammar record");
                failures.push(RecordFailure { line: number, language: None, error: error.into() });
            }
        }
    }
    Ok((records, failures))
}

/// Read one JSONL grammar file.
pub fn load_grammars(path: &Path) -> io::Result<(Vec<(usize, Grammar)>, Vec<RecordFailure>)> {
    read_grammars(BufReader::new(File::open(path)?))
}

/// Derive every record, fanning out across records.
///
/// Validation failures surface as [`RecordFailure`]s on the report; the
/// remaining records are unaffected.
pub fn run_batch(records: Vec<(usize, Grammar)>, domain: &Domain, options: &Options) -> BatchReport {
    let results: Vec<Result<Derivation, RecordFailure>> = records
        .into_par_iter()
        .map(|(line, grammar)| {
            derive_with(&grammar, domain, options).map_err(|error| {
                tracing::error!(language = grammar.language.as_str(), line, %error, "skipping invalid grammar record");
                RecordFailure { line, language: Some(grammar.language.clone()), error }
            })
        })
        .collect();

    let mut report = BatchReport { derivations: Vec::new(), failures: Vec::new() };
    for result in results {
        match result {
            Ok(derivation) => report.derivations.push(derivation),
            Err(failure) => report.failures.push(failure),
        }
    }
    report
}

/// Write the output table as CSV with a `language,number,construction`
/// header.
pub fn write_constructions_csv<W: Write>(mut writer: W, rows: &[ConstructionRow]) -> io::Result<()> {
    writeln!(writer, "language,number,construction")?;
    for row in rows {
        writeln!(writer, "{},{},{}", csv_field(&row.language), row.number, csv_field(&row.construction))?;
    }
    Ok(())
}

/// Constructions never contain commas, but language names are free text.
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}
