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

//! Everything the dashboard and the report show, computed once.
//!
//! [`ComputedAggregates`] is built at start-up and never mutated; callers
//! share it behind an `Arc`.

use std::path::Path;

use crate::adjusted::AdjustedSeries;
use crate::energy::{self, CostBreakdown, EnergyBalance};
use crate::error::Result;
use crate::occupancy::{
    BuildingState, Heatmap, Metric, MonthlySummary, OccupancySeries, Period, PeriodStateEnergy,
};
use crate::radiation::{RepresentativeDay, SeasonalRadiation, read_radiation};
use crate::settings::{DatasetPaths, EnergyParameters, RadiationSettings};
use crate::table::Table;

#[derive(Debug, Clone)]
pub struct ComputedAggregates {
    pub parameters: EnergyParameters,
    pub radiation: SeasonalRadiation,
    pub balance: EnergyBalance,
    pub costs: CostBreakdown,
    pub occupancy: OccupancySeries,
    pub adjusted: AdjustedSeries,
    pub weekly_by_state: Vec<PeriodStateEnergy>,
    pub monthly_by_state: Vec<PeriodStateEnergy>,
    pub monthly_summary: Vec<MonthlySummary>,
    pub energy_by_state: Vec<(BuildingState, f64)>,
    energy_heatmap: Heatmap,
    occupancy_heatmap: Heatmap,
}

/// Input tables of one run
#[derive(Debug)]
pub struct InputTables {
    pub occupancy: Table,
    pub adjusted: Table,
    /// In [`RepresentativeDay::ALL`] order
    pub radiation: [Table; 4],
}

impl InputTables {
    pub fn load(paths: &DatasetPaths) -> Result<Self> {
        let load = |name: &str, path: &Path| Table::from_path(name, path);
        Ok(Self {
            occupancy: load("occupancy", &paths.occupancy)?,
            adjusted: load("adjusted", &paths.adjusted)?,
            radiation: [
                load("radiation_february", &paths.radiation.february)?,
                load("radiation_june", &paths.radiation.june)?,
                load("radiation_september", &paths.radiation.september)?,
                load("radiation_december", &paths.radiation.december)?,
            ],
        })
    }
}

impl ComputedAggregates {
    /// Load every dataset and compute all aggregates
    pub fn build(
        paths: &DatasetPaths,
        parameters: &EnergyParameters,
        radiation: &RadiationSettings,
    ) -> Result<Self> {
        let tables = InputTables::load(paths)?;
        Self::from_tables(&tables, parameters, radiation)
    }

    pub fn from_tables(
        tables: &InputTables,
        parameters: &EnergyParameters,
        radiation_settings: &RadiationSettings,
    ) -> Result<Self> {
        let [feb, jun, sep, dec] = &tables.radiation;
        let [d0, d1, d2, d3] = RepresentativeDay::ALL;
        let radiation = SeasonalRadiation::from_readings(
            [
                (d0, read_radiation(feb)?),
                (d1, read_radiation(jun)?),
                (d2, read_radiation(sep)?),
                (d3, read_radiation(dec)?),
            ],
            radiation_settings,
        );

        let occupancy =
            OccupancySeries::from_table(&tables.occupancy, parameters.occupancy_threshold)?;

        let building_total = energy::building_total(&occupancy);
        let balance = EnergyBalance::compute(building_total, radiation.annual_kwh_m2, parameters);

        let adjusted = AdjustedSeries::from_table(&tables.adjusted)?;
        let costs = CostBreakdown::compute(
            adjusted.baseline_total(),
            adjusted.adjusted_total(),
            &balance,
            parameters.unit_cost,
        );

        tracing::info!(
            annual_radiation = radiation.annual_kwh_m2,
            combined_total = balance.combined_total,
            solar_covered = balance.solar_covered,
            occupancy_records = occupancy.len(),
            "Computed energy aggregates"
        );

        Ok(Self {
            parameters: parameters.clone(),
            weekly_by_state: occupancy.energy_by_period_and_state(Period::Week),
            monthly_by_state: occupancy.energy_by_period_and_state(Period::Month),
            monthly_summary: occupancy.monthly_summary(),
            energy_by_state: occupancy.energy_by_state(),
            energy_heatmap: occupancy.heatmap(Metric::EnergyDemand),
            occupancy_heatmap: occupancy.heatmap(Metric::OccupancyLevel),
            radiation,
            balance,
            costs,
            occupancy,
            adjusted,
        })
    }

    pub fn heatmap(&self, metric: Metric) -> &Heatmap {
        match metric {
            Metric::EnergyDemand => &self.energy_heatmap,
            Metric::OccupancyLevel => &self.occupancy_heatmap,
        }
    }

    pub fn by_state(&self, period: Period) -> &[PeriodStateEnergy] {
        match period {
            Period::Week => &self.weekly_by_state,
            Period::Month => &self.monthly_by_state,
        }
    }
}
