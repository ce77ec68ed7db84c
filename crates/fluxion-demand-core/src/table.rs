// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Flat-file tables with named columns.
//!
//! Every input of the pipeline is a small CSV file read once at start-up.
//! `Table` keeps the raw string cells and hands out typed views per column,
//! so each consumer decides how strict it wants to be about malformed cells.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{DataError, Result};

/// Timestamp layouts accepted by [`parse_timestamp`]
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

/// Parse a timestamp cell, returning `None` when no known layout matches.
///
/// Bare dates resolve to midnight. RFC 3339 values keep their wall-clock time.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Parse a calendar date cell (`YYYY-MM-DD` or any timestamp layout).
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    parse_timestamp(value).map(|dt| dt.date())
}

/// In-memory CSV table
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    headers: StringRecord,
    rows: Vec<StringRecord>,
}

impl Table {
    /// Read a table from disk. `name` is used in error messages only.
    pub fn from_path(name: &str, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_reader(name, file)?;
        tracing::debug!(
            table = name,
            path = %path.display(),
            rows = table.len(),
            "Loaded table"
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(name: &str, reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut headers = rdr.headers()?.clone();
        // Spreadsheet exports sometimes prefix the first header with a BOM
        if let Some(first) = headers.get(0) {
            if let Some(stripped) = first.strip_prefix('\u{feff}') {
                let mut cleaned = StringRecord::new();
                cleaned.push_field(stripped);
                for field in headers.iter().skip(1) {
                    cleaned.push_field(field);
                }
                headers = cleaned;
            }
        }

        let rows = rdr.records().collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            name: name.to_owned(),
            headers,
            rows,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    /// Index of a required column
    pub fn column(&self, column: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| DataError::MissingColumn {
                table: self.name.clone(),
                column: column.to_owned(),
            })
    }

    /// Raw cell text; rows shorter than the header read as empty.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or_default()
    }

    /// Numeric cell. Empty cells are missing values, anything else must parse.
    pub fn number(&self, row: usize, column: usize) -> Result<Option<f64>> {
        let raw = self.cell(row, column);
        if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
            return Ok(None);
        }
        raw.parse::<f64>()
            .map(Some)
            .map_err(|_| DataError::InvalidValue {
                table: self.name.clone(),
                column: self.headers.get(column).unwrap_or_default().to_owned(),
                row: row + 1,
                value: raw.to_owned(),
            })
    }

    pub fn timestamp(&self, row: usize, column: usize) -> Option<NaiveDateTime> {
        parse_timestamp(self.cell(row, column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn table(csv: &str) -> Table {
        Table::from_reader("test", csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_parse_timestamp_layouts() {
        let dt = parse_timestamp("2021-06-21 05:01:06").unwrap();
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (5, 1, 6));

        let dt = parse_timestamp("2021-06-21T13:30").unwrap();
        assert_eq!((dt.hour(), dt.minute()), (13, 30));

        let dt = parse_timestamp("2021-06-21 05:01:06.600").unwrap();
        assert_eq!(dt.second(), 6);

        let dt = parse_timestamp("2024-03-01T10:00:00+01:00").unwrap();
        assert_eq!(dt.hour(), 10);

        let dt = parse_timestamp("21/12/2021 08:15").unwrap();
        assert_eq!((dt.month(), dt.day()), (12, 21));

        let dt = parse_timestamp("2024-01-15").unwrap();
        assert_eq!((dt.hour(), dt.minute()), (0, 0));
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("not a time").is_none());
        assert!(parse_timestamp("2021-13-45 10:00").is_none());
    }

    #[test]
    fn test_missing_column_is_reported_by_name() {
        let t = table("Time,Value\n2024-01-01,1\n");
        let err = t.column("Energy Demand (kWh)").unwrap_err();
        match err {
            DataError::MissingColumn { table, column } => {
                assert_eq!(table, "test");
                assert_eq!(column, "Energy Demand (kWh)");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_number_rejects_text() {
        let t = table("A\n1.0\nabc\n");
        let a = t.column("A").unwrap();
        assert_eq!(t.number(0, a).unwrap(), Some(1.0));
        assert!(matches!(t.number(1, a), Err(DataError::InvalidValue { row: 2, .. })));
    }

    #[test]
    fn test_bom_is_stripped_from_first_header() {
        let t = table("\u{feff}Time,A\n2024-01-01,1\n");
        assert!(t.has_column("Time"));
    }

    #[test]
    fn test_short_rows_read_as_empty() {
        let t = table("A,B\n1\n");
        let b = t.column("B").unwrap();
        assert_eq!(t.cell(0, b), "");
        assert_eq!(t.number(0, b).unwrap(), None);
    }

    #[test]
    fn test_from_path_reports_missing_file() {
        let err = Table::from_path("nope", "/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }
}
