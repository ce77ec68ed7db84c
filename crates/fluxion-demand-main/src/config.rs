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

use anyhow::{Context, Result, bail};
use fluxion_demand_core::{DatasetPaths, EnergyParameters, RadiationPaths, RadiationSettings};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const ENV_BIND_ADDRESS: &str = "FLUXION_DEMAND_BIND_ADDRESS";
pub const ENV_PORT: &str = "FLUXION_DEMAND_PORT";
pub const ENV_DATA_DIR: &str = "FLUXION_DEMAND_DATA_DIR";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub datasets: DatasetSettings,
    #[serde(default)]
    pub energy: EnergyParameters,
    #[serde(default)]
    pub radiation: RadiationSettings,
    /// Base for relative dataset paths
    #[serde(skip)]
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetSettings {
    #[serde(default = "default_occupancy")]
    pub occupancy: PathBuf,
    #[serde(default = "default_adjusted")]
    pub adjusted: PathBuf,
    #[serde(default)]
    pub radiation: RadiationDatasetSettings,
}

/// One radiation file per representative day
#[derive(Debug, Clone, Deserialize)]
pub struct RadiationDatasetSettings {
    #[serde(default = "default_february")]
    pub february: PathBuf,
    #[serde(default = "default_june")]
    pub june: PathBuf,
    #[serde(default = "default_september")]
    pub september: PathBuf,
    #[serde(default = "default_december")]
    pub december: PathBuf,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_owned()
}

fn default_port() -> u16 {
    8051
}

fn default_occupancy() -> PathBuf {
    PathBuf::from("occupancy_energy_demand.csv")
}

fn default_adjusted() -> PathBuf {
    PathBuf::from("Adjusted_Daily_Energy_Demand.csv")
}

fn default_february() -> PathBuf {
    PathBuf::from("incident_radiation_21_02_fixed.csv")
}

fn default_june() -> PathBuf {
    PathBuf::from("incident_radiation_21_06_fixed.csv")
}

fn default_september() -> PathBuf {
    PathBuf::from("incident_radiation_21_09_fixed.csv")
}

fn default_december() -> PathBuf {
    PathBuf::from("incident_radiation_21_12_fixed.csv")
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            occupancy: default_occupancy(),
            adjusted: default_adjusted(),
            radiation: RadiationDatasetSettings::default(),
        }
    }
}

impl Default for RadiationDatasetSettings {
    fn default() -> Self {
        Self {
            february: default_february(),
            june: default_june(),
            september: default_september(),
            december: default_december(),
        }
    }
}

impl AppConfig {
    /// Load, apply environment overrides and validate.
    ///
    /// Relative dataset paths resolve against the config file's directory
    /// unless `FLUXION_DEMAND_DATA_DIR` is set.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config = Self::from_toml(&content)?;
        config.data_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| "Failed to parse config TOML")
    }

    /// Apply overrides from `lookup`, normally the process environment
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(address) = lookup(ENV_BIND_ADDRESS) {
            self.server.bind_address = address;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("{ENV_PORT} is not a valid port: {port}"))?;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let energy = &self.energy;
        let radiation = &self.radiation;

        if self.server.port == 0 {
            bail!("server.port must be non-zero");
        }
        for (key, value) in [
            ("energy.motor_energy_per_cycle", energy.motor_energy_per_cycle),
            ("energy.num_cycles", energy.num_cycles),
            ("energy.panel_area", energy.panel_area),
            ("energy.panel_efficiency", energy.panel_efficiency),
            ("energy.tilt_reduction_factor", energy.tilt_reduction_factor),
            ("energy.unit_cost", energy.unit_cost),
            ("energy.occupancy_threshold", energy.occupancy_threshold),
            ("radiation.samples_per_day", radiation.samples_per_day),
            ("radiation.repair_step_minutes", radiation.repair_step_minutes),
        ] {
            if !value.is_finite() {
                bail!("{key} must be a finite number, got {value}");
            }
        }
        if radiation.samples_per_day <= 0.0 {
            bail!("radiation.samples_per_day must be greater than 0");
        }
        if radiation.repair_step_minutes <= 0.0 {
            bail!("radiation.repair_step_minutes must be greater than 0");
        }
        if !(energy.panel_efficiency > 0.0 && energy.panel_efficiency <= 1.0) {
            bail!("energy.panel_efficiency must be in (0, 1]");
        }
        if !(0.0..=1.0).contains(&energy.tilt_reduction_factor) {
            bail!("energy.tilt_reduction_factor must be in [0, 1]");
        }
        if energy.panel_area < 0.0 {
            bail!("energy.panel_area must not be negative");
        }
        if energy.unit_cost < 0.0 {
            bail!("energy.unit_cost must not be negative");
        }
        if !(0.0..=100.0).contains(&energy.occupancy_threshold) {
            bail!("energy.occupancy_threshold must be in [0, 100]");
        }
        Ok(())
    }

    /// Dataset locations resolved against [`AppConfig::data_dir`]
    pub fn dataset_paths(&self) -> DatasetPaths {
        let resolve = |path: &Path| self.data_dir.join(path);
        let radiation = &self.datasets.radiation;
        DatasetPaths {
            occupancy: resolve(&self.datasets.occupancy),
            adjusted: resolve(&self.datasets.adjusted),
            radiation: RadiationPaths {
                february: resolve(&radiation.february),
                june: resolve(&radiation.june),
                september: resolve(&radiation.september),
                december: resolve(&radiation.december),
            },
        }
    }
}
