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

//! FluxION Demand - entry point.
//!
//! Loads the configuration, computes every aggregate once and then either
//! serves the dashboard, prints a report or repairs a radiation series.

mod cli;
mod config;
mod formatters;

use anyhow::{Context, Result};
use clap::Parser;
use fluxion_demand_core::{
    ComputedAggregates, DataError, RadiationSettings, Table, read_radiation, repair_series,
    write_repaired_series,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use cli::{Cli, Commands, RepairArgs, ServeArgs};
use config::AppConfig;
use formatters::TableFormatter;

#[tokio::main]
async fn main() -> Result<()> {
    // Respects RUST_LOG, defaults to info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            let config = AppConfig::from_file(&cli.config)?;
            serve(config, args).await
        }
        Commands::Report => {
            let config = AppConfig::from_file(&cli.config)?;
            let aggregates = compute(&config)?;
            println!("{}", TableFormatter::format_report(&aggregates));
            Ok(())
        }
        Commands::Repair(args) => repair(&cli.config, &args),
    }
}

fn compute(config: &AppConfig) -> Result<ComputedAggregates> {
    let paths = config.dataset_paths();
    info!(
        occupancy = %paths.occupancy.display(),
        adjusted = %paths.adjusted.display(),
        normalization = ?config.radiation.normalization,
        "Loading datasets"
    );
    ComputedAggregates::build(&paths, &config.energy, &config.radiation)
        .context("Failed to compute energy aggregates")
}

async fn serve(config: AppConfig, args: ServeArgs) -> Result<()> {
    let aggregates = Arc::new(compute(&config)?);

    let bind_address = args.bind.unwrap_or(config.server.bind_address);
    let port = args.port.unwrap_or(config.server.port);

    info!(
        combined_kwh = aggregates.balance.combined_total,
        solar_covered_kwh = aggregates.balance.solar_covered,
        savings = aggregates.costs.total_savings,
        "Aggregates ready"
    );

    fluxion_demand_web::start_web_server(aggregates, &bind_address, port)
        .await
        .with_context(|| format!("Dashboard server failed on {bind_address}:{port}"))
}

fn repair(config_path: &Path, args: &RepairArgs) -> Result<()> {
    let step_minutes = match args.step_minutes {
        Some(step) => step,
        None => repair_step_from_config(config_path),
    };
    if step_minutes <= 0.0 {
        anyhow::bail!("--step-minutes must be greater than 0");
    }

    let table = Table::from_path("radiation", &args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;
    let readings = read_radiation(&table)?;
    let repaired = repair_series(&readings, step_minutes);
    if repaired.is_empty() {
        return Err(DataError::EmptyTable {
            table: args.input.display().to_string(),
        })
        .context("Radiation series has no rows with a Point Index");
    }

    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    write_repaired_series(&repaired, BufWriter::new(file))?;

    let filled = repaired
        .iter()
        .filter(|p| p.radiation_kwh_m2.is_some())
        .count()
        .saturating_sub(readings.iter().filter(|r| r.point_index.is_some()).count());
    info!(
        output = %args.output.display(),
        points = repaired.len(),
        filled,
        step_minutes,
        "Repaired radiation series"
    );
    Ok(())
}

/// Step from the config file when it is readable, built-in default otherwise
fn repair_step_from_config(config_path: &Path) -> f64 {
    if config_path.exists() {
        match AppConfig::from_file(config_path) {
            Ok(config) => return config.radiation.repair_step_minutes,
            Err(e) => warn!(error = %e, "Ignoring unreadable config, using default repair step"),
        }
    }
    RadiationSettings::default().repair_step_minutes
}
