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

//! Occupancy time series, building state classification and the
//! period/state/hour aggregations derived from them.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::energy::ENERGY_DEMAND_COLUMN;
use crate::error::Result;
use crate::radiation::TIME_COLUMN;
use crate::table::Table;

pub const OCCUPANCY_COLUMN: &str = "Occupancy Level (%)";

/// Building footprint implied by occupancy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum BuildingState {
    Contracted,
    Expanded,
}

impl BuildingState {
    /// Strictly above the threshold is expanded; missing occupancy is contracted
    pub fn classify(occupancy_pct: Option<f64>, threshold: f64) -> Self {
        match occupancy_pct {
            Some(pct) if pct > threshold => Self::Expanded,
            _ => Self::Contracted,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Expanded => "Expanded (135 m²)",
            Self::Contracted => "Contracted (65 m²)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DayType {
    Weekday,
    Weekend,
}

impl DayType {
    pub fn of(timestamp: NaiveDateTime) -> Self {
        match timestamp.weekday() {
            Weekday::Sat | Weekday::Sun => Self::Weekend,
            _ => Self::Weekday,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Weekday => "Weekday",
            Self::Weekend => "Weekend",
        }
    }
}

/// Grouping period of the state aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// ISO week number
    Week,
    /// Calendar month, 1..=12
    Month,
}

impl Period {
    fn key(self, timestamp: NaiveDateTime) -> u32 {
        match self {
            Self::Week => timestamp.iso_week().week(),
            Self::Month => timestamp.month(),
        }
    }
}

/// Column an hourly heatmap is built from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    #[default]
    EnergyDemand,
    OccupancyLevel,
}

impl Metric {
    pub fn label(self) -> &'static str {
        match self {
            Self::EnergyDemand => ENERGY_DEMAND_COLUMN,
            Self::OccupancyLevel => OCCUPANCY_COLUMN,
        }
    }

    fn value(self, record: &OccupancyRecord) -> Option<f64> {
        match self {
            Self::EnergyDemand => record.energy_demand_kwh,
            Self::OccupancyLevel => record.occupancy_pct,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyRecord {
    pub timestamp: NaiveDateTime,
    pub energy_demand_kwh: Option<f64>,
    pub occupancy_pct: Option<f64>,
    pub state: BuildingState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodStateEnergy {
    pub period: u32,
    pub state: BuildingState,
    pub energy_kwh: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub month: u32,
    pub mean_occupancy_pct: Option<f64>,
    pub mean_energy_kwh: Option<f64>,
}

/// Mean metric per day type (rows) and hour of day (columns)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    pub metric: Metric,
    pub hours: Vec<u32>,
    pub day_types: Vec<DayType>,
    /// `values[day_type][hour]`, `None` where no sample fell in the cell
    pub values: Vec<Vec<Option<f64>>>,
}

/// Classified occupancy series
#[derive(Debug, Clone)]
pub struct OccupancySeries {
    records: Vec<OccupancyRecord>,
}

impl OccupancySeries {
    /// Read and classify an occupancy table.
    ///
    /// Rows with an unparseable `Time` are dropped.
    pub fn from_table(table: &Table, threshold: f64) -> Result<Self> {
        let time_col = table.column(TIME_COLUMN)?;
        let energy_col = table.column(ENERGY_DEMAND_COLUMN)?;
        let occupancy_col = table.column(OCCUPANCY_COLUMN)?;

        let mut records = Vec::with_capacity(table.len());
        for row in 0..table.len() {
            let Some(timestamp) = table.timestamp(row, time_col) else {
                continue;
            };
            let occupancy_pct = table.number(row, occupancy_col)?;
            records.push(OccupancyRecord {
                timestamp,
                energy_demand_kwh: table.number(row, energy_col)?,
                occupancy_pct,
                state: BuildingState::classify(occupancy_pct, threshold),
            });
        }

        let dropped = table.len() - records.len();
        if dropped > 0 {
            tracing::debug!(table = table.name(), dropped, "Dropped rows with invalid time");
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[OccupancyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Energy per (period, state), ordered by period then state
    pub fn energy_by_period_and_state(&self, period: Period) -> Vec<PeriodStateEnergy> {
        let mut buckets: BTreeMap<(u32, BuildingState), f64> = BTreeMap::new();
        for record in &self.records {
            *buckets
                .entry((period.key(record.timestamp), record.state))
                .or_insert(0.0) += record.energy_demand_kwh.unwrap_or(0.0);
        }
        buckets
            .into_iter()
            .map(|((period, state), energy_kwh)| PeriodStateEnergy {
                period,
                state,
                energy_kwh,
            })
            .collect()
    }

    /// Total energy per state, states without samples omitted
    pub fn energy_by_state(&self) -> Vec<(BuildingState, f64)> {
        let mut totals: BTreeMap<BuildingState, f64> = BTreeMap::new();
        for record in &self.records {
            *totals.entry(record.state).or_insert(0.0) += record.energy_demand_kwh.unwrap_or(0.0);
        }
        totals.into_iter().collect()
    }

    pub fn monthly_summary(&self) -> Vec<MonthlySummary> {
        let mut months: BTreeMap<u32, (MeanAccumulator, MeanAccumulator)> = BTreeMap::new();
        for record in &self.records {
            let (occupancy, energy) = months.entry(record.timestamp.month()).or_default();
            occupancy.push(record.occupancy_pct);
            energy.push(record.energy_demand_kwh);
        }
        months
            .into_iter()
            .map(|(month, (occupancy, energy))| MonthlySummary {
                month,
                mean_occupancy_pct: occupancy.mean(),
                mean_energy_kwh: energy.mean(),
            })
            .collect()
    }

    pub fn heatmap(&self, metric: Metric) -> Heatmap {
        let mut cells: BTreeMap<(DayType, u32), MeanAccumulator> = BTreeMap::new();
        for record in &self.records {
            cells
                .entry((DayType::of(record.timestamp), record.timestamp.hour()))
                .or_default()
                .push(metric.value(record));
        }

        let mut hours: Vec<u32> = cells.keys().map(|(_, hour)| *hour).collect();
        hours.sort_unstable();
        hours.dedup();
        let mut day_types: Vec<DayType> = cells.keys().map(|(day, _)| *day).collect();
        day_types.dedup();

        let values = day_types
            .iter()
            .map(|day| {
                hours
                    .iter()
                    .map(|hour| cells.get(&(*day, *hour)).and_then(MeanAccumulator::mean))
                    .collect()
            })
            .collect();

        Heatmap {
            metric,
            hours,
            day_types,
            values,
        }
    }
}

/// Mean that skips missing samples
#[derive(Debug, Default, Clone, Copy)]
struct MeanAccumulator {
    sum: f64,
    count: u32,
}

impl MeanAccumulator {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / f64::from(self.count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Time,Energy Demand (kWh),Occupancy Level (%)
2024-01-01 08:00:00,10,80
2024-01-01 09:00:00,20,40
2024-01-06 08:00:00,5,50
2024-01-08 08:00:00,7,51
bad time,1000,99
2024-02-01 08:00:00,3,
";

    fn series() -> OccupancySeries {
        let table = Table::from_reader("occupancy", CSV.as_bytes()).unwrap();
        OccupancySeries::from_table(&table, 50.0).unwrap()
    }

    #[test]
    fn test_classification_threshold_is_strict() {
        assert_eq!(BuildingState::classify(Some(50.0), 50.0), BuildingState::Contracted);
        assert_eq!(BuildingState::classify(Some(50.1), 50.0), BuildingState::Expanded);
        assert_eq!(BuildingState::classify(None, 50.0), BuildingState::Contracted);
        assert_eq!(BuildingState::Expanded.label(), "Expanded (135 m²)");
    }

    #[test]
    fn test_invalid_time_rows_are_dropped() {
        let s = series();
        assert_eq!(s.len(), 5);
        assert!(s.records().iter().all(|r| r.energy_demand_kwh != Some(1000.0)));
    }

    #[test]
    fn test_missing_occupancy_column_fails() {
        let table =
            Table::from_reader("occupancy", "Time,Energy Demand (kWh)\n2024-01-01,1\n".as_bytes())
                .unwrap();
        assert!(OccupancySeries::from_table(&table, 50.0).is_err());
    }

    #[test]
    fn test_weekly_energy_by_state() {
        let weekly = series().energy_by_period_and_state(Period::Week);
        let row = |period, state, energy_kwh| PeriodStateEnergy {
            period,
            state,
            energy_kwh,
        };
        // 2024-01-01 and 2024-01-06 are ISO week 1, 2024-01-08 week 2, 2024-02-01 week 5
        assert_eq!(
            weekly,
            vec![
                row(1, BuildingState::Contracted, 25.0),
                row(1, BuildingState::Expanded, 10.0),
                row(2, BuildingState::Expanded, 7.0),
                row(5, BuildingState::Contracted, 3.0),
            ]
        );
    }

    #[test]
    fn test_monthly_energy_by_state() {
        let monthly = series().energy_by_period_and_state(Period::Month);
        assert_eq!(monthly.len(), 3);
        assert_eq!(monthly[0].period, 1);
        assert_eq!(monthly[0].state, BuildingState::Contracted);
        assert_eq!(monthly[0].energy_kwh, 25.0);
        assert_eq!(monthly[2].period, 2);
    }

    #[test]
    fn test_energy_by_state() {
        assert_eq!(
            series().energy_by_state(),
            vec![(BuildingState::Contracted, 28.0), (BuildingState::Expanded, 17.0)]
        );
    }

    #[test]
    fn test_monthly_summary_skips_missing_values() {
        let summary = series().monthly_summary();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].month, 1);
        assert_eq!(summary[0].mean_energy_kwh, Some(10.5));
        assert_eq!(summary[0].mean_occupancy_pct, Some(55.25));
        assert_eq!(summary[1].mean_occupancy_pct, None);
        assert_eq!(summary[1].mean_energy_kwh, Some(3.0));
    }

    #[test]
    fn test_heatmap_by_day_type_and_hour() {
        let heatmap = series().heatmap(Metric::EnergyDemand);
        assert_eq!(heatmap.hours, vec![8, 9]);
        assert_eq!(heatmap.day_types, vec![DayType::Weekday, DayType::Weekend]);
        // weekday 08:00 -> 10, 7, 3
        assert_eq!(heatmap.values[0][0], Some(20.0 / 3.0));
        assert_eq!(heatmap.values[0][1], Some(20.0));
        assert_eq!(heatmap.values[1], vec![Some(5.0), None]);

        let occupancy = series().heatmap(Metric::OccupancyLevel);
        assert_eq!(occupancy.values[0][0], Some(65.5));
    }
}
