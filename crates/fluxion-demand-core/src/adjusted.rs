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

use chrono::NaiveDate;
use serde::Serialize;

use crate::energy::ENERGY_DEMAND_COLUMN;
use crate::error::{DataError, Result};
use crate::radiation::TIME_COLUMN;
use crate::table::{Table, parse_date};

pub const ADJUSTED_DEMAND_COLUMN: &str = "Adjusted Energy Demand (kWh)";
pub const DATE_COLUMN: &str = "Date";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdjustedDay {
    pub date: NaiveDate,
    pub energy_demand_kwh: Option<f64>,
    pub adjusted_demand_kwh: Option<f64>,
}

/// Daily demand before and after the adaptive building concept
#[derive(Debug, Clone)]
pub struct AdjustedSeries {
    days: Vec<AdjustedDay>,
}

impl AdjustedSeries {
    /// Read the adjusted table.
    ///
    /// The date comes from `Date` when present, otherwise from `Time`.
    /// Unlike the occupancy series, a malformed date here is an error.
    pub fn from_table(table: &Table) -> Result<Self> {
        let date_col = match table.column(DATE_COLUMN) {
            Ok(col) => col,
            Err(_) => table.column(TIME_COLUMN).map_err(|_| DataError::MissingColumn {
                table: table.name().to_owned(),
                column: format!("{DATE_COLUMN}' or '{TIME_COLUMN}"),
            })?,
        };
        let demand_col = table.column(ENERGY_DEMAND_COLUMN)?;
        let adjusted_col = table.column(ADJUSTED_DEMAND_COLUMN)?;

        let days = (0..table.len())
            .map(|row| {
                let raw = table.cell(row, date_col);
                let date = parse_date(raw).ok_or_else(|| DataError::InvalidTimestamp {
                    table: table.name().to_owned(),
                    row: row + 1,
                    value: raw.to_owned(),
                })?;
                Ok(AdjustedDay {
                    date,
                    energy_demand_kwh: table.number(row, demand_col)?,
                    adjusted_demand_kwh: table.number(row, adjusted_col)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { days })
    }

    pub fn days(&self) -> &[AdjustedDay] {
        &self.days
    }

    /// Unadjusted demand total (kWh)
    pub fn baseline_total(&self) -> f64 {
        self.days.iter().filter_map(|d| d.energy_demand_kwh).sum()
    }

    pub fn adjusted_total(&self) -> f64 {
        self.days.iter().filter_map(|d| d.adjusted_demand_kwh).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(csv: &str) -> Result<AdjustedSeries> {
        let table = Table::from_reader("adjusted", csv.as_bytes())?;
        AdjustedSeries::from_table(&table)
    }

    #[test]
    fn test_totals_from_date_column() {
        let s = series(
            "Date,Energy Demand (kWh),Adjusted Energy Demand (kWh)\n\
             2024-01-01,100,80\n\
             2024-01-02,50,\n",
        )
        .unwrap();
        assert_eq!(s.days().len(), 2);
        assert_eq!(s.baseline_total(), 150.0);
        assert_eq!(s.adjusted_total(), 80.0);
    }

    #[test]
    fn test_date_derived_from_time() {
        let s = series(
            "Time,Energy Demand (kWh),Adjusted Energy Demand (kWh)\n\
             2024-03-05 13:45:00,1,1\n",
        )
        .unwrap();
        assert_eq!(
            s.days()[0].date,
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
    }

    #[test]
    fn test_malformed_time_is_an_error() {
        let err = series(
            "Time,Energy Demand (kWh),Adjusted Energy Demand (kWh)\n\
             yesterday,1,1\n",
        )
        .unwrap_err();
        assert!(matches!(err, DataError::InvalidTimestamp { row: 1, .. }));
    }

    #[test]
    fn test_neither_date_nor_time_fails() {
        let err = series("Energy Demand (kWh),Adjusted Energy Demand (kWh)\n1,1\n").unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { .. }));
    }

    #[test]
    fn test_adjusted_column_required() {
        let err = series("Date,Energy Demand (kWh)\n2024-01-01,1\n").unwrap_err();
        match err {
            DataError::MissingColumn { column, .. } => assert_eq!(column, ADJUSTED_DEMAND_COLUMN),
            other => panic!("unexpected error: {other}"),
        }
    }
}
