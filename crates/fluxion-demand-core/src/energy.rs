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

//! Energy balance of building load, motor load and solar offset

use serde::Serialize;

use crate::occupancy::OccupancySeries;
use crate::settings::EnergyParameters;

pub const ENERGY_DEMAND_COLUMN: &str = "Energy Demand (kWh)";

/// Building energy demand over every load sample with a valid timestamp
pub fn building_total(occupancy: &OccupancySeries) -> f64 {
    occupancy
        .records()
        .iter()
        .filter_map(|record| record.energy_demand_kwh)
        .sum()
}

/// Energy quantities (kWh) and their cost at the configured unit price
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyBalance {
    pub building_total: f64,
    pub motor_total: f64,
    pub combined_total: f64,
    pub solar_generation: f64,
    pub solar_covered: f64,
    pub remaining_demand: f64,
    pub costs: EnergyCosts,
}

/// Currency equivalents of the [`EnergyBalance`] quantities
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyCosts {
    pub unit_cost: f64,
    pub building_total: f64,
    pub motor_total: f64,
    pub combined_total: f64,
    pub solar_generation: f64,
    pub solar_covered: f64,
    pub remaining_demand: f64,
}

impl EnergyBalance {
    pub fn compute(building_total: f64, annual_radiation: f64, params: &EnergyParameters) -> Self {
        let motor_total = params.motor_energy_per_cycle * params.num_cycles;
        let combined_total = building_total + motor_total;
        let solar_generation = params.panel_area * annual_radiation * params.panel_efficiency;
        let solar_covered = solar_generation * params.tilt_reduction_factor;
        let remaining_demand = combined_total - solar_covered;

        let c = params.unit_cost;
        Self {
            building_total,
            motor_total,
            combined_total,
            solar_generation,
            solar_covered,
            remaining_demand,
            costs: EnergyCosts {
                unit_cost: c,
                building_total: building_total * c,
                motor_total: motor_total * c,
                combined_total: combined_total * c,
                solar_generation: solar_generation * c,
                solar_covered: solar_covered * c,
                remaining_demand: remaining_demand * c,
            },
        }
    }

    /// Share of combined demand met by solar, 0 when there is no demand
    pub fn solar_share(&self) -> f64 {
        if self.combined_total > 0.0 {
            self.solar_covered / self.combined_total
        } else {
            0.0
        }
    }
}

/// Baseline versus adapted building operation, in currency.
///
/// The baseline ("without concept") pays for the unadjusted demand only.
/// The adapted case adds motor energy, then subtracts what the adjusted
/// demand and the solar offset save.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub baseline_demand: f64,
    pub adjusted_demand: f64,
    pub adaptation_difference: f64,
    pub baseline_cost: f64,
    pub initial_cost: f64,
    pub motor_cost: f64,
    pub adaptation_savings: f64,
    pub solar_savings: f64,
    pub final_cost: f64,
    pub total_savings: f64,
}

impl CostBreakdown {
    pub fn compute(
        baseline_demand: f64,
        adjusted_demand: f64,
        balance: &EnergyBalance,
        unit_cost: f64,
    ) -> Self {
        let adaptation_difference = baseline_demand - adjusted_demand;
        let initial_cost = (baseline_demand + balance.motor_total) * unit_cost;
        let adaptation_savings = adaptation_difference * unit_cost;
        let solar_savings = balance.solar_covered * unit_cost;

        Self {
            baseline_demand,
            adjusted_demand,
            adaptation_difference,
            baseline_cost: baseline_demand * unit_cost,
            initial_cost,
            motor_cost: balance.motor_total * unit_cost,
            adaptation_savings,
            solar_savings,
            final_cost: initial_cost - adaptation_savings - solar_savings,
            total_savings: adaptation_savings + solar_savings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> EnergyParameters {
        EnergyParameters::default()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_motor_and_combined_totals() {
        let balance = EnergyBalance::compute(1000.0, 0.0, &params());
        assert!(close(balance.motor_total, 6400.0));
        assert!(close(balance.combined_total, 7400.0));
    }

    #[test]
    fn test_solar_generation_and_coverage() {
        let balance = EnergyBalance::compute(1000.0, 13.5, &params());
        assert!(close(balance.solar_generation, 172.8));
        assert!(close(balance.solar_covered, 103.68));
        assert!(close(balance.remaining_demand, 7400.0 - 103.68));
        assert!(balance.solar_covered <= balance.solar_generation);
    }

    #[test]
    fn test_motor_total_is_linear() {
        let base = EnergyBalance::compute(0.0, 0.0, &params()).motor_total;

        let mut doubled_energy = params();
        doubled_energy.motor_energy_per_cycle *= 2.0;
        let mut doubled_cycles = params();
        doubled_cycles.num_cycles *= 2.0;

        assert!(close(
            EnergyBalance::compute(0.0, 0.0, &doubled_energy).motor_total,
            2.0 * base
        ));
        assert!(close(
            EnergyBalance::compute(0.0, 0.0, &doubled_cycles).motor_total,
            2.0 * base
        ));
    }

    #[test]
    fn test_costs_scale_with_unit_cost() {
        let balance = EnergyBalance::compute(1000.0, 13.5, &params());
        assert!(close(balance.costs.combined_total, 7400.0 * 0.2));
        assert!(close(balance.costs.solar_covered, 103.68 * 0.2));
        assert!(close(balance.costs.motor_total, 1280.0));
    }

    fn occupancy(csv: &str) -> OccupancySeries {
        let table = crate::table::Table::from_reader("occupancy", csv.as_bytes()).unwrap();
        OccupancySeries::from_table(&table, 50.0).unwrap()
    }

    #[test]
    fn test_building_total_is_order_independent() {
        let rows = [
            "2024-01-01 08:00:00,1.25,10",
            "2024-01-01 09:00:00,2.5,60",
            "2024-01-01 10:00:00,3,90",
        ];
        let csv = |rows: &[&str]| {
            format!("Time,Energy Demand (kWh),Occupancy Level (%)\n{}\n", rows.join("\n"))
        };
        let a = occupancy(&csv(&rows));
        let b = occupancy(&csv(&[rows[2], rows[0], rows[1]]));
        assert!(close(building_total(&a), 6.75));
        assert!(close(building_total(&a), building_total(&b)));
    }

    #[test]
    fn test_building_total_skips_rows_with_invalid_time() {
        let series = occupancy(
            "Time,Energy Demand (kWh),Occupancy Level (%)\n\
             2024-01-01 08:00:00,10,80\n\
             not-a-time,1000,20\n\
             2024-01-01 09:00:00,,20\n",
        );
        assert!(close(building_total(&series), 10.0));
    }

    #[test]
    fn test_solar_share() {
        let balance = EnergyBalance::compute(1000.0, 13.5, &params());
        assert!(close(balance.solar_share(), 103.68 / 7400.0));

        let mut idle = params();
        idle.num_cycles = 0.0;
        assert_eq!(EnergyBalance::compute(0.0, 13.5, &idle).solar_share(), 0.0);
    }

    #[test]
    fn test_cost_breakdown() {
        let balance = EnergyBalance::compute(1000.0, 13.5, &params());
        let costs = CostBreakdown::compute(900.0, 700.0, &balance, 0.2);

        assert!(close(costs.adaptation_difference, 200.0));
        assert!(close(costs.baseline_cost, 180.0));
        assert!(close(costs.initial_cost, (900.0 + 6400.0) * 0.2));
        assert!(close(costs.adaptation_savings, 40.0));
        assert!(close(costs.solar_savings, 103.68 * 0.2));
        assert!(close(
            costs.final_cost,
            costs.initial_cost - costs.adaptation_savings - costs.solar_savings
        ));
        assert!(close(
            costs.total_savings,
            costs.adaptation_savings + costs.solar_savings
        ));
        assert!(close(costs.motor_cost, 1280.0));
    }
}
