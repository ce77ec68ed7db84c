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

//! Terminal output for the `report` command.

use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, presets::UTF8_FULL};
use fluxion_demand_core::ComputedAggregates;
use std::fmt::Write;

/// Formatter for pretty terminal tables
#[derive(Debug)]
pub struct TableFormatter;

fn header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(label).add_attribute(Attribute::Bold))
        .collect()
}

fn number(value: f64) -> Cell {
    Cell::new(format!("{value:.2}")).set_alignment(CellAlignment::Right)
}

impl TableFormatter {
    /// Annual radiation per representative day
    pub fn format_radiation(aggregates: &ComputedAggregates) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(header(&[
            "Representative Day",
            "Daily\n(kWh/m²)",
            "Days",
            "Monthly\n(kWh/m²)",
            "Months\nRepresented",
        ]));

        for season in &aggregates.radiation.seasons {
            table.add_row(vec![
                Cell::new(season.day.label()),
                number(season.daily_kwh_m2),
                Cell::new(season.day.days_in_month()).set_alignment(CellAlignment::Right),
                number(season.monthly_kwh_m2),
                Cell::new(season.day.months_represented()).set_alignment(CellAlignment::Right),
            ]);
        }

        table.add_row(vec![
            Cell::new("Annual").add_attribute(Attribute::Bold),
            Cell::new(""),
            Cell::new(""),
            number(aggregates.radiation.annual_kwh_m2).add_attribute(Attribute::Bold),
            Cell::new(""),
        ]);

        table.to_string()
    }

    /// Energy balance quantities with their cost
    pub fn format_balance(aggregates: &ComputedAggregates) -> String {
        let balance = &aggregates.balance;
        let costs = &balance.costs;

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(header(&["Quantity", "Energy\n(kWh)", "Cost\n($)"]));

        for (label, energy, cost) in [
            ("Building demand", balance.building_total, costs.building_total),
            ("Motor demand", balance.motor_total, costs.motor_total),
            ("Combined demand", balance.combined_total, costs.combined_total),
            ("Solar generation", balance.solar_generation, costs.solar_generation),
            ("Solar covered", balance.solar_covered, costs.solar_covered),
            ("Remaining demand", balance.remaining_demand, costs.remaining_demand),
        ] {
            table.add_row(vec![Cell::new(label), number(energy), number(cost)]);
        }

        table.to_string()
    }

    /// Baseline versus adapted cost, mirroring the waterfall chart
    pub fn format_costs(aggregates: &ComputedAggregates) -> String {
        let costs = &aggregates.costs;

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(header(&["Cost Item", "Amount\n($)"]));

        table.add_row(vec![Cell::new("Without concept"), number(costs.baseline_cost)]);
        table.add_row(vec![Cell::new("Initial cost (incl. motor)"), number(costs.initial_cost)]);
        table.add_row(vec![Cell::new("Adaptation savings"), number(-costs.adaptation_savings)]);
        table.add_row(vec![Cell::new("Solar savings"), number(-costs.solar_savings)]);
        table.add_row(vec![
            Cell::new("With concept").add_attribute(Attribute::Bold),
            number(costs.final_cost).add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("Total savings")
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
            number(costs.total_savings).fg(Color::Green),
        ]);

        table.to_string()
    }

    pub fn format_report(aggregates: &ComputedAggregates) -> String {
        let mut output = String::new();

        output.push_str("=== Solar Radiation ===\n");
        output.push_str(&Self::format_radiation(aggregates));
        output.push_str("\n\n=== Energy Balance ===\n");
        output.push_str(&Self::format_balance(aggregates));
        output.push_str("\n\n=== Costs ===\n");
        output.push_str(&Self::format_costs(aggregates));
        output.push('\n');

        let _ = writeln!(
            output,
            "Solar share: {:.1}% | Unit cost: ${:.2}/kWh | Occupancy threshold: {:.0}%",
            aggregates.balance.solar_share() * 100.0,
            aggregates.parameters.unit_cost,
            aggregates.parameters.occupancy_threshold,
        );

        output
    }
}
