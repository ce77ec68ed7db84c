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

//! Annual solar radiation estimate from four representative days.
//!
//! Each season is represented by one sampled day. The day's readings are
//! reduced to a mean daily radiation, scaled by the length of its month and
//! then weighted by the number of months the season stands for:
//!
//! ```text
//! annual = 2 * feb + 3 * jun + 3 * sep + 2 * dec
//! ```

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;

use crate::error::{DataError, Result};
use crate::settings::{Normalization, RadiationSettings};
use crate::table::Table;

pub const TIME_COLUMN: &str = "Time";
pub const RADIATION_COLUMN: &str = "Radiation (kWh/m²)";
pub const POINT_INDEX_COLUMN: &str = "Point Index";
/// Upper bound on a repaired grid, one sample per second over a day
pub const MAX_POINT_INDEX: u32 = 86_400;

/// Months attributed to each representative day, in [`RepresentativeDay::ALL`] order
pub const SEASON_WEIGHTS: [f64; 4] = [2.0, 3.0, 3.0, 2.0];

/// Sampled day standing in for a whole season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepresentativeDay {
    /// 21 February, covers January and February
    February,
    /// 21 June, covers May to July
    June,
    /// 21 September, covers August to October
    September,
    /// 21 December, covers November and December
    December,
}

impl RepresentativeDay {
    pub const ALL: [Self; 4] = [Self::February, Self::June, Self::September, Self::December];

    /// Days in the month the sample was taken from
    pub fn days_in_month(self) -> u32 {
        match self {
            Self::February => 28,
            Self::June | Self::September => 30,
            Self::December => 31,
        }
    }

    pub fn months_represented(self) -> f64 {
        SEASON_WEIGHTS[self.position()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::February => "February",
            Self::June => "June",
            Self::September => "September",
            Self::December => "December",
        }
    }

    fn position(self) -> usize {
        match self {
            Self::February => 0,
            Self::June => 1,
            Self::September => 2,
            Self::December => 3,
        }
    }
}

/// One radiation sample of a representative day
#[derive(Debug, Clone, PartialEq)]
pub struct RadiationReading {
    pub point_index: Option<u32>,
    pub timestamp: NaiveDateTime,
    pub radiation_kwh_m2: f64,
}

/// Extract readings from a radiation table.
///
/// Rows whose timestamp does not parse are dropped, as are rows with an
/// empty radiation cell. Missing `Time`/radiation columns, non-numeric or
/// negative radiation values are errors.
pub fn read_radiation(table: &Table) -> Result<Vec<RadiationReading>> {
    let time_col = table.column(TIME_COLUMN)?;
    let radiation_col = table.column(RADIATION_COLUMN)?;
    let index_col = table.column(POINT_INDEX_COLUMN).ok();

    let mut readings = Vec::with_capacity(table.len());
    let mut dropped = 0_usize;

    for row in 0..table.len() {
        let Some(timestamp) = table.timestamp(row, time_col) else {
            dropped += 1;
            continue;
        };
        let Some(radiation) = table.number(row, radiation_col)? else {
            dropped += 1;
            continue;
        };
        if !radiation.is_finite() || radiation < 0.0 {
            return Err(DataError::InvalidValue {
                table: table.name().to_owned(),
                column: RADIATION_COLUMN.to_owned(),
                row: row + 1,
                value: table.cell(row, radiation_col).to_owned(),
            });
        }
        let point_index = match index_col {
            Some(col) => parse_point_index(table, row, col)?,
            None => None,
        };

        readings.push(RadiationReading {
            point_index,
            timestamp,
            radiation_kwh_m2: radiation,
        });
    }

    if dropped > 0 {
        tracing::debug!(table = table.name(), dropped, "Dropped unusable radiation rows");
    }

    Ok(readings)
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is checked to be a whole number in 1..=MAX_POINT_INDEX"
)]
fn parse_point_index(table: &Table, row: usize, col: usize) -> Result<Option<u32>> {
    let Some(value) = table.number(row, col)? else {
        return Ok(None);
    };
    if value < 1.0 || value.fract() != 0.0 || value > f64::from(MAX_POINT_INDEX) {
        return Err(DataError::InvalidValue {
            table: table.name().to_owned(),
            column: POINT_INDEX_COLUMN.to_owned(),
            row: row + 1,
            value: table.cell(row, col).to_owned(),
        });
    }
    Ok(Some(value as u32))
}

/// Mean daily radiation of a representative day (kWh/m²).
///
/// Readings are grouped by calendar date and each date's reduction is
/// averaged, so a single-date table reduces to one value.
pub fn daily_estimate(readings: &[RadiationReading], settings: &RadiationSettings) -> f64 {
    match settings.normalization {
        Normalization::FixedDivisor => fixed_divisor_estimate(readings, settings.samples_per_day),
        Normalization::Interpolated => {
            interpolated_estimate(readings, settings.repair_step_minutes)
        }
    }
}

/// Sum per date divided by the expected sample count, not the observed one
fn fixed_divisor_estimate(readings: &[RadiationReading], samples_per_day: f64) -> f64 {
    let mut per_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for reading in readings {
        *per_date.entry(reading.timestamp.date()).or_insert(0.0) += reading.radiation_kwh_m2;
    }
    mean(per_date.values().map(|sum| sum / samples_per_day))
}

/// Repair the series first, then average over the repaired sample count
fn interpolated_estimate(readings: &[RadiationReading], step_minutes: f64) -> f64 {
    let indexed = readings.iter().all(|r| r.point_index.is_some());
    let samples: Vec<(NaiveDate, f64)> = if indexed {
        repair_series(readings, step_minutes)
            .into_iter()
            .filter_map(|p| p.radiation_kwh_m2.map(|v| (p.timestamp.date(), v)))
            .collect()
    } else {
        tracing::warn!("Readings lack point indices, averaging observed samples only");
        readings
            .iter()
            .map(|r| (r.timestamp.date(), r.radiation_kwh_m2))
            .collect()
    };

    let mut per_date: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for (date, value) in samples {
        let entry = per_date.entry(date).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }
    mean(per_date.values().map(|(sum, count)| sum / count_as_f64(*count)))
}

/// Scale a daily estimate to the month it was sampled in
pub fn monthly_estimate(daily_kwh_m2: f64, days_in_month: u32) -> f64 {
    daily_kwh_m2 * f64::from(days_in_month)
}

/// Weighted annual sum of the four monthly estimates.
///
/// Order is February, June, September, December; weights are 2, 3, 3, 2.
pub fn annual_radiation(monthly_kwh_m2: [f64; 4]) -> f64 {
    monthly_kwh_m2
        .iter()
        .zip(SEASON_WEIGHTS)
        .map(|(estimate, weight)| estimate * weight)
        .sum()
}

/// Reduction of one representative day
#[derive(Debug, Clone, Serialize)]
pub struct SeasonEstimate {
    pub day: RepresentativeDay,
    pub daily_kwh_m2: f64,
    pub monthly_kwh_m2: f64,
    /// Mean radiation per hour of day, ascending by hour
    pub hourly_profile: Vec<(u32, f64)>,
}

/// The four season reductions and their annual total
#[derive(Debug, Clone, Serialize)]
pub struct SeasonalRadiation {
    pub seasons: Vec<SeasonEstimate>,
    pub annual_kwh_m2: f64,
}

impl SeasonalRadiation {
    /// Reduce the readings of every representative day.
    ///
    /// `readings` must yield the days in [`RepresentativeDay::ALL`] order.
    pub fn from_readings(
        readings: [(RepresentativeDay, Vec<RadiationReading>); 4],
        settings: &RadiationSettings,
    ) -> Self {
        let seasons: Vec<SeasonEstimate> = readings
            .into_iter()
            .map(|(day, day_readings)| {
                if day_readings.is_empty() {
                    tracing::warn!(day = day.label(), "Representative day has no usable readings");
                }
                let daily = daily_estimate(&day_readings, settings);
                SeasonEstimate {
                    day,
                    daily_kwh_m2: daily,
                    monthly_kwh_m2: monthly_estimate(daily, day.days_in_month()),
                    hourly_profile: hourly_profile(&day_readings),
                }
            })
            .collect();

        let mut monthly = [0.0; 4];
        for season in &seasons {
            monthly[season.day.position()] = season.monthly_kwh_m2;
        }

        Self {
            annual_kwh_m2: annual_radiation(monthly),
            seasons,
        }
    }

    pub fn season(&self, day: RepresentativeDay) -> Option<&SeasonEstimate> {
        self.seasons.iter().find(|s| s.day == day)
    }
}

/// Mean radiation per hour of day
pub fn hourly_profile(readings: &[RadiationReading]) -> Vec<(u32, f64)> {
    let mut buckets: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for reading in readings {
        let entry = buckets.entry(reading.timestamp.hour()).or_insert((0.0, 0));
        entry.0 += reading.radiation_kwh_m2;
        entry.1 += 1;
    }
    buckets
        .into_iter()
        .map(|(hour, (sum, count))| (hour, sum / count_as_f64(count)))
        .collect()
}

/// A point of a repaired radiation series
#[derive(Debug, Clone, PartialEq)]
pub struct RepairedPoint {
    pub point_index: u32,
    pub timestamp: NaiveDateTime,
    /// `None` only for a gap before the first known sample
    pub radiation_kwh_m2: Option<f64>,
}

/// Rebuild a complete, evenly spaced series from indexed readings.
///
/// Indices `1..=max` are stamped `start + (i - 1) * step`, where `start` is
/// the earliest reading. Gaps between known samples are linearly
/// interpolated, a trailing gap carries the last value, a leading gap stays
/// empty. Readings without a point index, or with one above
/// [`MAX_POINT_INDEX`], are ignored.
#[expect(
    clippy::cast_possible_truncation,
    reason = "millisecond offsets of a single day fit in i64"
)]
pub fn repair_series(readings: &[RadiationReading], step_minutes: f64) -> Vec<RepairedPoint> {
    let known: BTreeMap<u32, f64> = readings
        .iter()
        .filter_map(|r| r.point_index.map(|idx| (idx, r.radiation_kwh_m2)))
        .filter(|(idx, _)| *idx <= MAX_POINT_INDEX)
        .collect();

    let (Some(&max_index), Some(start)) = (
        known.keys().next_back(),
        readings
            .iter()
            .filter(|r| r.point_index.is_some_and(|idx| idx <= MAX_POINT_INDEX))
            .map(|r| r.timestamp)
            .min(),
    ) else {
        return Vec::new();
    };

    let step_ms = step_minutes * 60_000.0;

    (1..=max_index)
        .map(|idx| {
            let offset = (f64::from(idx - 1) * step_ms).round() as i64;
            RepairedPoint {
                point_index: idx,
                timestamp: start + Duration::milliseconds(offset),
                radiation_kwh_m2: interpolate_at(&known, idx),
            }
        })
        .collect()
}

fn interpolate_at(known: &BTreeMap<u32, f64>, idx: u32) -> Option<f64> {
    if let Some(value) = known.get(&idx) {
        return Some(*value);
    }
    let (&lo_idx, &lo_val) = known.range(..idx).next_back()?;
    match known.range(idx..).next() {
        Some((&hi_idx, &hi_val)) => {
            let t = f64::from(idx - lo_idx) / f64::from(hi_idx - lo_idx);
            Some(lo_val + (hi_val - lo_val) * t)
        }
        None => Some(lo_val),
    }
}

/// Write a repaired series as `Point Index,Time,Radiation (kWh/m²)` CSV
pub fn write_repaired_series<W: Write>(points: &[RepairedPoint], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([POINT_INDEX_COLUMN, TIME_COLUMN, RADIATION_COLUMN])?;
    for point in points {
        wtr.write_record([
            point.point_index.to_string(),
            point.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            point
                .radiation_kwh_m2
                .map(|v| v.to_string())
                .unwrap_or_default(),
        ])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0_usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count_as_f64(count)
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "sample counts never exceed mantissa precision"
)]
fn count_as_f64(count: usize) -> f64 {
    count as f64
}
