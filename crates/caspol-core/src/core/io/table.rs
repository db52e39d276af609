use crate::core::models::dataset::{RawRow, RawTable, RowShapeError};
use crate::core::models::row::RowShape;
use std::io::{self, BufRead};
use thiserror::Error;

pub const COMMENT_MARKER: char = '#';

#[derive(Debug, Error)]
pub enum TableError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: TableParseErrorKind,
    },
    #[error("Line {line} has {found} fields, expected a {expected} row")]
    Shape {
        line: usize,
        expected: RowShape,
        found: usize,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableParseErrorKind {
    #[error("Invalid float in column {column} (value: '{value}')")]
    InvalidFloat { column: usize, value: String },
    #[error("Line contains no fields")]
    EmptyLine,
}

impl From<RowShapeError> for TableError {
    fn from(e: RowShapeError) -> Self {
        Self::Shape {
            line: e.line,
            expected: e.mismatch.expected,
            found: e.mismatch.found,
        }
    }
}

/// Reads a whitespace-separated numeric table.
///
/// Lines starting with `#` are dropped without looking at the rest of the line. Every other
/// line must consist solely of float literals; a blank line is a parse error.
pub fn parse_table(reader: &mut impl BufRead) -> Result<RawTable, TableError> {
    let mut table = RawTable::default();

    for (line_num, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let line_num = line_num + 1;

        if line.starts_with(COMMENT_MARKER) {
            continue;
        }

        let fields = parse_fields(&line).map_err(|kind| TableError::Parse {
            line: line_num,
            kind,
        })?;
        table.rows.push(RawRow {
            line: line_num,
            fields,
        });
    }

    Ok(table)
}

fn parse_fields(line: &str) -> Result<Vec<f64>, TableParseErrorKind> {
    let fields = line
        .split_whitespace()
        .enumerate()
        .map(|(idx, token)| {
            token
                .parse::<f64>()
                .map_err(|_| TableParseErrorKind::InvalidFloat {
                    column: idx + 1,
                    value: token.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if fields.is_empty() {
        return Err(TableParseErrorKind::EmptyLine);
    }
    Ok(fields)
}
