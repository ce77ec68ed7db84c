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

//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "fluxion-demand")]
#[command(author, version, about = "FluxION Demand - building energy demand and solar offset")]
#[command(
    long_about = "Estimates the annual energy demand of an adaptive building, the share covered\n\
    by on-site solar panels and the resulting cost savings.\n\
    \nAnnual radiation is extrapolated from four representative days (February, June,\n\
    September, December) weighted 2/3/3/2 months.\n\
    \nExamples:\n  \
    fluxion-demand serve                          # Dashboard on http://0.0.0.0:8051/\n  \
    fluxion-demand --config site.toml report      # Print key metrics\n  \
    fluxion-demand repair -i raw.csv -o fixed.csv # Fill gaps in a radiation series"
)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short, global = true, default_value = "fluxion-demand.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compute all aggregates and serve the interactive dashboard
    Serve(ServeArgs),

    /// Print the energy balance and cost breakdown as tables
    Report,

    /// Rebuild an evenly spaced radiation series and interpolate missing points
    #[command(
        long_about = "Rebuild a radiation series on its full Point Index grid.\n\
        \nEach index i is stamped start + (i - 1) * step, where start is the earliest\n\
        timestamp in the input. Missing radiation values are linearly interpolated,\n\
        a trailing gap repeats the last value and a leading gap stays empty.\n\
        \nExamples:\n  \
        fluxion-demand repair -i radiation_21_06.csv -o radiation_21_06_fixed.csv\n  \
        fluxion-demand repair -i raw.csv -o fixed.csv --step-minutes 1.0"
    )]
    Repair(RepairArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the configured listen port
    #[arg(long)]
    pub port: Option<u16>,

    /// Override the configured bind address
    #[arg(long)]
    pub bind: Option<String>,
}

#[derive(Debug, Args)]
pub struct RepairArgs {
    /// Radiation CSV with Point Index, Time and Radiation (kWh/m²) columns
    #[arg(long, short)]
    pub input: PathBuf,

    /// Destination of the repaired series
    #[arg(long, short)]
    pub output: PathBuf,

    /// Sampling step in minutes (defaults to radiation.repair_step_minutes)
    #[arg(long)]
    pub step_minutes: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_with_overrides() {
        let cli = Cli::parse_from(["fluxion-demand", "serve", "--port", "9000"]);
        assert_eq!(cli.config, PathBuf::from("fluxion-demand.toml"));
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, Some(9000));
                assert_eq!(args.bind, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_repair() {
        let cli = Cli::parse_from([
            "fluxion-demand",
            "--config",
            "site.toml",
            "repair",
            "-i",
            "raw.csv",
            "-o",
            "fixed.csv",
        ]);
        assert_eq!(cli.config, PathBuf::from("site.toml"));
        let Commands::Repair(args) = cli.command else {
            panic!("expected repair");
        };
        assert_eq!(args.input, PathBuf::from("raw.csv"));
        assert_eq!(args.step_minutes, None);
    }
}
