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

pub mod adjusted;
pub mod aggregates;
pub mod energy;
pub mod error;
pub mod occupancy;
pub mod radiation;
pub mod settings;
pub mod table;

pub use adjusted::{AdjustedDay, AdjustedSeries};
pub use aggregates::{ComputedAggregates, InputTables};
pub use energy::{CostBreakdown, EnergyBalance, EnergyCosts};
pub use error::{DataError, Result};
pub use occupancy::{
    BuildingState, DayType, Heatmap, Metric, MonthlySummary, OccupancyRecord, OccupancySeries,
    Period, PeriodStateEnergy,
};
pub use radiation::{
    RadiationReading, RepairedPoint, RepresentativeDay, SeasonEstimate, SeasonalRadiation,
    annual_radiation, daily_estimate, monthly_estimate, read_radiation, repair_series,
    write_repaired_series,
};
pub use settings::{
    DatasetPaths, EnergyParameters, Normalization, RadiationPaths, RadiationSettings,
};
pub use table::Table;
