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

//! Dashboard shell: selector state and the chart each selector drives.
//!
//! Every selector is bound to exactly one chart. Changing a selector
//! re-renders that chart only; all other figures depend on nothing but the
//! immutable aggregates and therefore never change.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use askama::Template;
use fluxion_demand_core::{ComputedAggregates, Metric, Period};
use serde::{Deserialize, Serialize};

use crate::charts;
use crate::figure::Figure;

/// Grouping of the state stacked bar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregationLevel {
    #[default]
    Weekly,
    Monthly,
}

impl AggregationLevel {
    pub const ALL: [Self; 2] = [Self::Weekly, Self::Monthly];

    pub fn period(self) -> Period {
        match self {
            Self::Weekly => Period::Week,
            Self::Monthly => Period::Month,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartId {
    EnergyBreakdown,
    SolarVsRemaining,
    SolarShare,
    CostComparison,
    MotorEnergy,
    AdjustedComparison,
    DemandOverTime,
    OccupancyVsEnergy,
    EnergyByState,
    StateStackedBar,
    MetricHeatmap,
    MonthlySummary,
    SeasonalRadiation,
    CostWaterfall,
}

impl ChartId {
    pub const ALL: [Self; 14] = [
        Self::AdjustedComparison,
        Self::DemandOverTime,
        Self::CostComparison,
        Self::SolarShare,
        Self::MotorEnergy,
        Self::EnergyBreakdown,
        Self::SolarVsRemaining,
        Self::StateStackedBar,
        Self::MetricHeatmap,
        Self::OccupancyVsEnergy,
        Self::MonthlySummary,
        Self::EnergyByState,
        Self::SeasonalRadiation,
        Self::CostWaterfall,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::EnergyBreakdown => "energy-breakdown",
            Self::SolarVsRemaining => "solar-vs-remaining",
            Self::SolarShare => "solar-share",
            Self::CostComparison => "cost-comparison",
            Self::MotorEnergy => "motor-energy",
            Self::AdjustedComparison => "adjusted-comparison",
            Self::DemandOverTime => "demand-over-time",
            Self::OccupancyVsEnergy => "occupancy-vs-energy",
            Self::EnergyByState => "energy-by-state",
            Self::StateStackedBar => "state-stacked-bar",
            Self::MetricHeatmap => "metric-heatmap",
            Self::MonthlySummary => "monthly-summary",
            Self::SeasonalRadiation => "seasonal-radiation",
            Self::CostWaterfall => "cost-waterfall",
        }
    }

    /// Section heading on the page
    pub fn heading(self) -> &'static str {
        match self {
            Self::EnergyBreakdown => "Energy Demand Breakdown",
            Self::SolarVsRemaining => "Updated Energy Contribution: Solar vs. Remaining Demand",
            Self::SolarShare => "Solar Contribution",
            Self::CostComparison => "Cost Savings",
            Self::MotorEnergy => "Motor Energy Cost",
            Self::AdjustedComparison => "Energy Demand vs Adjusted Energy Demand",
            Self::DemandOverTime => "Total Energy Demand",
            Self::OccupancyVsEnergy => "Occupancy and Energy Demand",
            Self::EnergyByState => "Energy by Building State",
            Self::StateStackedBar => "Energy Consumption by State",
            Self::MetricHeatmap => "Hourly Patterns",
            Self::MonthlySummary => "Monthly Averages",
            Self::SeasonalRadiation => "Seasonal Solar Radiation",
            Self::CostWaterfall => "Cost Savings Breakdown",
        }
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownChart(pub String);

impl fmt::Display for UnknownChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown chart '{}'", self.0)
    }
}

impl std::error::Error for UnknownChart {}

impl FromStr for ChartId {
    type Err = UnknownChart;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownChart(s.to_owned()))
    }
}

/// Current value of every selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardState {
    #[serde(default)]
    pub aggregation: AggregationLevel,
    #[serde(default)]
    pub metric: Metric,
}

/// A single selector change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Aggregation(AggregationLevel),
    Metric(Metric),
}

impl Selection {
    /// The chart bound to this selector
    pub fn chart(self) -> ChartId {
        match self {
            Self::Aggregation(_) => ChartId::StateStackedBar,
            Self::Metric(_) => ChartId::MetricHeatmap,
        }
    }
}

/// Render one chart for the given selector state
pub fn render(aggregates: &ComputedAggregates, state: DashboardState, chart: ChartId) -> Figure {
    match chart {
        ChartId::EnergyBreakdown => charts::energy_breakdown(&aggregates.balance),
        ChartId::SolarVsRemaining => charts::solar_vs_remaining(&aggregates.balance),
        ChartId::SolarShare => charts::solar_share(&aggregates.balance),
        ChartId::CostComparison => charts::cost_comparison(&aggregates.costs),
        ChartId::MotorEnergy => charts::motor_energy(&aggregates.balance),
        ChartId::AdjustedComparison => charts::adjusted_comparison(&aggregates.adjusted),
        ChartId::DemandOverTime => charts::demand_over_time(&aggregates.adjusted),
        ChartId::OccupancyVsEnergy => charts::occupancy_vs_energy(&aggregates.occupancy),
        ChartId::EnergyByState => charts::energy_by_state(&aggregates.energy_by_state),
        ChartId::StateStackedBar => charts::state_stacked_bar(
            aggregates.by_state(state.aggregation.period()),
            state.aggregation.label(),
        ),
        ChartId::MetricHeatmap => charts::metric_heatmap(aggregates.heatmap(state.metric)),
        ChartId::MonthlySummary => charts::monthly_summary(&aggregates.monthly_summary),
        ChartId::SeasonalRadiation => charts::seasonal_radiation_profile(&aggregates.radiation),
        ChartId::CostWaterfall => charts::cost_waterfall(&aggregates.costs),
    }
}

/// Selector state bound to a shared set of aggregates
#[derive(Debug, Clone)]
pub struct DashboardShell {
    aggregates: Arc<ComputedAggregates>,
    state: DashboardState,
}

impl DashboardShell {
    pub fn new(aggregates: Arc<ComputedAggregates>) -> Self {
        Self::with_state(aggregates, DashboardState::default())
    }

    pub fn with_state(aggregates: Arc<ComputedAggregates>, state: DashboardState) -> Self {
        Self { aggregates, state }
    }

    pub fn state(&self) -> DashboardState {
        self.state
    }

    pub fn render(&self, chart: ChartId) -> Figure {
        render(&self.aggregates, self.state, chart)
    }

    /// Apply a selector change and re-render the one chart bound to it
    pub fn select(&mut self, selection: Selection) -> (ChartId, Figure) {
        match selection {
            Selection::Aggregation(level) => self.state.aggregation = level,
            Selection::Metric(metric) => self.state.metric = metric,
        }
        let chart = selection.chart();
        (chart, self.render(chart))
    }

    pub fn render_all(&self) -> Vec<(ChartId, Figure)> {
        ChartId::ALL
            .into_iter()
            .map(|chart| (chart, self.render(chart)))
            .collect()
    }

    /// Page model for the askama template
    pub fn page(&self) -> serde_json::Result<DashboardTemplate> {
        let balance = &self.aggregates.balance;
        let costs = &self.aggregates.costs;

        let charts = self
            .render_all()
            .into_iter()
            .map(|(id, figure)| {
                Ok(ChartView {
                    id: id.as_str(),
                    heading: id.heading(),
                    aggregation_selector: id == ChartId::StateStackedBar,
                    metric_selector: id == ChartId::MetricHeatmap,
                    figure_json: figure.to_json()?,
                })
            })
            .collect::<serde_json::Result<Vec<_>>>()?;

        Ok(DashboardTemplate {
            metrics: vec![
                MetricCard::new("Total Energy Demand", format!("{:.2} kWh", costs.baseline_demand)),
                MetricCard::new("Cost Savings", format!("${:.2}", costs.total_savings)),
                MetricCard::new(
                    "Solar Contribution",
                    format!(
                        "{:.2} kWh (${:.2})",
                        balance.solar_covered, balance.costs.solar_covered
                    ),
                ),
                MetricCard::new("Motor Energy Cost", format!("${:.2}", costs.motor_cost)),
                MetricCard::new(
                    "Annual Radiation",
                    format!("{:.2} kWh/m²", self.aggregates.radiation.annual_kwh_m2),
                ),
            ],
            charts,
            aggregation_options: AggregationLevel::ALL
                .into_iter()
                .map(|level| SelectorOption {
                    value: level.label(),
                    label: level.label(),
                    checked: level == self.state.aggregation,
                })
                .collect(),
            metric_options: [Metric::EnergyDemand, Metric::OccupancyLevel]
                .into_iter()
                .map(|metric| SelectorOption {
                    value: metric_value(metric),
                    label: metric.label(),
                    checked: metric == self.state.metric,
                })
                .collect(),
        })
    }
}

/// Query-string value of a metric
fn metric_value(metric: Metric) -> &'static str {
    match metric {
        Metric::EnergyDemand => "EnergyDemand",
        Metric::OccupancyLevel => "OccupancyLevel",
    }
}

#[derive(Debug, Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub metrics: Vec<MetricCard>,
    pub charts: Vec<ChartView>,
    pub aggregation_options: Vec<SelectorOption>,
    pub metric_options: Vec<SelectorOption>,
}

#[derive(Debug)]
pub struct MetricCard {
    pub title: &'static str,
    pub value: String,
}

impl MetricCard {
    fn new(title: &'static str, value: String) -> Self {
        Self { title, value }
    }
}

#[derive(Debug)]
pub struct ChartView {
    pub id: &'static str,
    pub heading: &'static str,
    /// Rendered with the aggregation radio buttons
    pub aggregation_selector: bool,
    /// Rendered with the metric radio buttons
    pub metric_selector: bool,
    pub figure_json: String,
}

#[derive(Debug)]
pub struct SelectorOption {
    pub value: &'static str,
    pub label: &'static str,
    pub checked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_id_round_trips_through_str() {
        for id in ChartId::ALL {
            assert_eq!(id.as_str().parse::<ChartId>(), Ok(id));
        }
        assert_eq!(
            "pie".parse::<ChartId>(),
            Err(UnknownChart("pie".to_owned()))
        );
    }

    #[test]
    fn test_selection_binds_one_chart() {
        assert_eq!(
            Selection::Aggregation(AggregationLevel::Monthly).chart(),
            ChartId::StateStackedBar
        );
        assert_eq!(
            Selection::Metric(Metric::OccupancyLevel).chart(),
            ChartId::MetricHeatmap
        );
    }

    #[test]
    fn test_default_state() {
        let state = DashboardState::default();
        assert_eq!(state.aggregation, AggregationLevel::Weekly);
        assert_eq!(state.metric, Metric::EnergyDemand);
    }

    #[test]
    fn test_state_deserialises_partial_query() {
        let state: DashboardState = serde_json::from_str(r#"{"aggregation":"Monthly"}"#).unwrap();
        assert_eq!(state.aggregation, AggregationLevel::Monthly);
        assert_eq!(state.metric, Metric::EnergyDemand);
    }
}
