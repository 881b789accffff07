//! Report rendering.
//!
//! A [`Report`] is a list of column names plus string rows. It renders as
//! CSV (minimal quoting) or as an aligned table, to stdout or to a file.

pub mod csv;
pub mod table;

use clap::ValueEnum;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Rendering failures.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] ::csv::Error),
}

/// Output layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    Table,
}

/// Where a rendered report goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl From<Option<PathBuf>> for Destination {
    fn from(path: Option<PathBuf>) -> Self {
        match path {
            Some(p) => Destination::File(p),
            None => Destination::Stdout,
        }
    }
}

/// Named columns and their rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    /// Column whose values get status colouring in terminal tables.
    status_column: Option<usize>,
}

impl Report {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            status_column: None,
        }
    }

    /// Mark the column holding a yes/no style verdict.
    pub fn with_status_column(mut self, index: usize) -> Self {
        self.status_column = Some(index);
        self
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn status_column(&self) -> Option<usize> {
        self.status_column
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Render a report in the requested format to the destination.
pub fn render(
    report: &Report,
    format: OutputFormat,
    destination: &Destination,
) -> Result<(), ReportError> {
    let terminal = matches!(destination, Destination::Stdout);
    let output = match format {
        OutputFormat::Csv => csv::to_csv(report)?,
        OutputFormat::Table => {
            let mut text = table::to_table(report, terminal);
            text.push('\n');
            text
        }
    };

    match destination {
        Destination::Stdout => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            stdout.flush()?;
        }
        Destination::File(path) => {
            let mut file = File::create(path)?;
            file.write_all(output.as_bytes())?;
            tracing::info!(path = %path.display(), rows = report.len(), "Report written");
        }
    }
    Ok(())
}

/// Format an optional value as a cell, blank when absent.
pub fn cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
