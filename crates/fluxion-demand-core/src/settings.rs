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

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Physical and economic parameters of the energy balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyParameters {
    /// Energy drawn per movement cycle (kWh)
    #[serde(default = "default_motor_energy_per_cycle")]
    pub motor_energy_per_cycle: f64,

    /// Movement cycles per year
    #[serde(default = "default_num_cycles")]
    pub num_cycles: f64,

    /// Installed panel area (m²)
    #[serde(default = "default_panel_area")]
    pub panel_area: f64,

    /// Panel conversion efficiency, 0..=1
    #[serde(default = "default_panel_efficiency")]
    pub panel_efficiency: f64,

    /// Share of generation left after tilt losses, 0..=1
    #[serde(default = "default_tilt_reduction_factor")]
    pub tilt_reduction_factor: f64,

    /// Electricity price (currency/kWh)
    #[serde(default = "default_unit_cost")]
    pub unit_cost: f64,

    /// Occupancy (%) above which the building counts as expanded
    #[serde(default = "default_occupancy_threshold")]
    pub occupancy_threshold: f64,
}

fn default_motor_energy_per_cycle() -> f64 {
    160.0
}

fn default_num_cycles() -> f64 {
    40.0
}

fn default_panel_area() -> f64 {
    64.0
}

fn default_panel_efficiency() -> f64 {
    0.2
}

fn default_tilt_reduction_factor() -> f64 {
    0.6
}

fn default_unit_cost() -> f64 {
    0.20
}

fn default_occupancy_threshold() -> f64 {
    50.0
}

impl Default for EnergyParameters {
    fn default() -> Self {
        Self {
            motor_energy_per_cycle: default_motor_energy_per_cycle(),
            num_cycles: default_num_cycles(),
            panel_area: default_panel_area(),
            panel_efficiency: default_panel_efficiency(),
            tilt_reduction_factor: default_tilt_reduction_factor(),
            unit_cost: default_unit_cost(),
            occupancy_threshold: default_occupancy_threshold(),
        }
    }
}

/// How a representative day's readings are reduced to a daily mean
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Divide each date's sum by the expected sample count
    #[default]
    FixedDivisor,
    /// Repair the series, then average over the repaired sample count
    Interpolated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadiationSettings {
    /// Expected samples per representative day
    #[serde(default = "default_samples_per_day")]
    pub samples_per_day: f64,

    #[serde(default)]
    pub normalization: Normalization,

    /// Spacing of the sampling grid used by series repair (minutes)
    #[serde(default = "default_repair_step")]
    pub repair_step_minutes: f64,
}

fn default_samples_per_day() -> f64 {
    764.0
}

fn default_repair_step() -> f64 {
    1.1
}

impl Default for RadiationSettings {
    fn default() -> Self {
        Self {
            samples_per_day: default_samples_per_day(),
            normalization: Normalization::default(),
            repair_step_minutes: default_repair_step(),
        }
    }
}

/// Resolved locations of every input table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    pub occupancy: PathBuf,
    pub adjusted: PathBuf,
    pub radiation: RadiationPaths,
}

/// One radiation series per representative day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadiationPaths {
    pub february: PathBuf,
    pub june: PathBuf,
    pub september: PathBuf,
    pub december: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_defaults() {
        let p = EnergyParameters::default();
        assert_eq!(p.motor_energy_per_cycle, 160.0);
        assert_eq!(p.num_cycles, 40.0);
        assert_eq!(p.panel_area, 64.0);
        assert_eq!(p.occupancy_threshold, 50.0);
    }

    #[test]
    fn test_radiation_defaults() {
        let s = RadiationSettings::default();
        assert_eq!(s.samples_per_day, 764.0);
        assert_eq!(s.normalization, Normalization::FixedDivisor);
        assert_eq!(s.repair_step_minutes, 1.1);
    }
}
