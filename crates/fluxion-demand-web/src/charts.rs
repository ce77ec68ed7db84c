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

//! Chart builders. Each one maps computed aggregates to a [`Figure`].

use fluxion_demand_core::{
    AdjustedSeries, BuildingState, CostBreakdown, EnergyBalance, Heatmap, MonthlySummary,
    OccupancySeries, PeriodStateEnergy, SeasonalRadiation,
};

use crate::figure::{
    Axis, BarTrace, ColorBar, Connector, CORAL, Datum, Figure, HeatmapTrace, Layout, Legend, Line,
    Marker, MarkerWrapper, PieTrace, ScatterTrace, TEAL, Title, Trace, WaterfallTrace,
};

const ENERGY_AXIS: &str = "Energy Demand (kWh)";
const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn donut(labels: [&str; 2], values: [f64; 2], hole: f64, colors: [&str; 2]) -> Trace {
    Trace::Pie(PieTrace {
        labels: labels.iter().map(|l| (*l).to_owned()).collect(),
        values: values.to_vec(),
        hole,
        marker: Marker::colors(&colors),
    })
}

/// Building versus motor share of annual demand
pub fn energy_breakdown(balance: &EnergyBalance) -> Figure {
    Figure::new(Layout {
        legend: Some(Legend::below()),
        ..Layout::titled("Annual Energy Demand Breakdown")
    })
    .trace(donut(
        ["Building Energy Demand", "Motor Energy Demand"],
        [balance.building_total, balance.motor_total],
        0.4,
        [TEAL, CORAL],
    ))
}

pub fn solar_vs_remaining(balance: &EnergyBalance) -> Figure {
    Figure::new(Layout {
        legend: Some(Legend::below()),
        ..Layout::titled("Updated Energy Contribution: Solar vs. Remaining Demand")
    })
    .trace(donut(
        ["Remaining Energy Demand", "Solar Energy Contribution"],
        [balance.remaining_demand, balance.solar_covered],
        0.4,
        [CORAL, TEAL],
    ))
}

/// Compact donut for the solar metric card
pub fn solar_share(balance: &EnergyBalance) -> Figure {
    Figure::new(Layout::default().without_legend()).trace(donut(
        ["Solar", "Remaining"],
        [balance.solar_covered, balance.remaining_demand],
        0.6,
        [TEAL, CORAL],
    ))
}

pub fn cost_comparison(costs: &CostBreakdown) -> Figure {
    let bar = |name: &str, value: f64, color: &str| {
        Trace::Bar(BarTrace {
            name: name.to_owned(),
            x: vec![name.into()],
            y: vec![Some(value)],
            marker: Marker::color(color),
        })
    };
    Figure::new(Layout::default().axes("", "Cost ($)"))
        .trace(bar("Without Concept", costs.baseline_cost, CORAL))
        .trace(bar("With Concept", costs.final_cost, TEAL))
}

pub fn motor_energy(balance: &EnergyBalance) -> Figure {
    Figure::new(Layout::default().without_legend().axes("", "Energy (kWh)")).trace(Trace::Bar(
        BarTrace {
            name: "Motor Energy".to_owned(),
            x: vec!["Motor Energy".into()],
            y: vec![Some(balance.motor_total)],
            marker: Marker::color(TEAL),
        },
    ))
}

/// Daily demand before and after adaptation
pub fn adjusted_comparison(adjusted: &AdjustedSeries) -> Figure {
    let dates: Vec<Datum> = adjusted
        .days()
        .iter()
        .map(|d| d.date.format(DATE_FORMAT).to_string().into())
        .collect();
    let line = |name: &str, y: Vec<Option<f64>>, color: &str| {
        Trace::Scatter(ScatterTrace {
            name: name.to_owned(),
            x: dates.clone(),
            y,
            mode: "lines+markers",
            line: Some(Line {
                color: color.to_owned(),
                width: None,
            }),
        })
    };

    let layout =
        Layout::titled("Energy Demand vs Adjusted Energy Demand").axes("Date", "Energy (kWh)");
    Figure::new(layout)
        .trace(line(
            "Energy Demand",
            adjusted.days().iter().map(|d| d.energy_demand_kwh).collect(),
            TEAL,
        ))
        .trace(line(
            "Adjusted Energy Demand",
            adjusted.days().iter().map(|d| d.adjusted_demand_kwh).collect(),
            CORAL,
        ))
}

pub fn demand_over_time(adjusted: &AdjustedSeries) -> Figure {
    Figure::new(
        Layout::titled("Energy Demand Over Time")
            .axes("Date", ENERGY_AXIS)
            .shaded()
            .without_legend(),
    )
    .trace(Trace::Scatter(ScatterTrace {
        name: "Energy Demand".to_owned(),
        x: adjusted
            .days()
            .iter()
            .map(|d| d.date.format(DATE_FORMAT).to_string().into())
            .collect(),
        y: adjusted.days().iter().map(|d| d.energy_demand_kwh).collect(),
        mode: "lines",
        line: Some(Line {
            color: TEAL.to_owned(),
            width: Some(2.0),
        }),
    }))
}

pub fn occupancy_vs_energy(occupancy: &OccupancySeries) -> Figure {
    let times: Vec<Datum> = occupancy
        .records()
        .iter()
        .map(|r| r.timestamp.format(TIME_FORMAT).to_string().into())
        .collect();

    let layout =
        Layout::titled("Occupancy and Energy Demand Over Time").axes("Time", "Percentage/Energy");
    Figure::new(layout)
        .trace(Trace::Scatter(ScatterTrace {
            name: "Occupancy Level (%)".to_owned(),
            x: times.clone(),
            y: occupancy.records().iter().map(|r| r.occupancy_pct).collect(),
            mode: "lines",
            line: Some(Line {
                color: TEAL.to_owned(),
                width: None,
            }),
        }))
        .trace(Trace::Scatter(ScatterTrace {
            name: ENERGY_AXIS.to_owned(),
            x: times,
            y: occupancy.records().iter().map(|r| r.energy_demand_kwh).collect(),
            mode: "lines",
            line: Some(Line {
                color: CORAL.to_owned(),
                width: None,
            }),
        }))
}

pub fn energy_by_state(totals: &[(BuildingState, f64)]) -> Figure {
    Figure::new(Layout::titled("Energy Consumption: Expanded vs Contracted States")).trace(
        Trace::Pie(PieTrace {
            labels: totals.iter().map(|(s, _)| s.label().to_owned()).collect(),
            values: totals.iter().map(|(_, v)| *v).collect(),
            hole: 0.0,
            marker: Marker::colors(&[TEAL, CORAL]),
        }),
    )
}

fn state_color(state: BuildingState) -> &'static str {
    match state {
        BuildingState::Contracted => TEAL,
        BuildingState::Expanded => CORAL,
    }
}

/// Energy per period, one stacked series per building state.
///
/// `period_label` names the x axis, e.g. `Weekly` or `Monthly`.
pub fn state_stacked_bar(rows: &[PeriodStateEnergy], period_label: &str) -> Figure {
    let mut states: Vec<BuildingState> = rows.iter().map(|r| r.state).collect();
    states.sort_unstable();
    states.dedup();

    let mut layout = Layout {
        barmode: Some("stack"),
        legend: Some(Legend {
            title: Some(Title::new("Building State")),
            ..Legend::below()
        }),
        ..Layout::titled(format!("Energy Consumption by State ({period_label} Aggregation)"))
    }
    .axes(period_label, ENERGY_AXIS)
    .shaded();
    if let Some(xaxis) = layout.xaxis.as_mut() {
        xaxis.tickangle = Some(45);
    }

    states.into_iter().fold(Figure::new(layout), |figure, state| {
        let series: Vec<&PeriodStateEnergy> = rows.iter().filter(|r| r.state == state).collect();
        figure.trace(Trace::Bar(BarTrace {
            name: state.label().to_owned(),
            x: series.iter().map(|r| r.period.into()).collect(),
            y: series.iter().map(|r| Some(r.energy_kwh)).collect(),
            marker: Marker::color(state_color(state)),
        }))
    })
}

pub fn metric_heatmap(heatmap: &Heatmap) -> Figure {
    let metric = heatmap.metric.label();
    Figure::new(
        Layout::titled(format!("Heatmap of {metric}"))
            .axes("Time of Day (Hour)", "Day Type")
            .shaded()
            .without_legend(),
    )
    .trace(Trace::Heatmap(HeatmapTrace {
        x: heatmap.hours.clone(),
        y: heatmap
            .day_types
            .iter()
            .map(|d| d.label().to_owned())
            .collect(),
        z: heatmap.values.clone(),
        colorscale: "Viridis",
        colorbar: ColorBar {
            title: Title::new(metric),
        },
    }))
}

pub fn monthly_summary(summary: &[MonthlySummary]) -> Figure {
    let months: Vec<Datum> = summary.iter().map(|m| m.month.into()).collect();
    Figure::new(Layout {
        barmode: Some("group"),
        ..Layout::titled("Average Occupancy and Energy Demand by Month")
            .axes("Month", "Percentage/Energy")
    })
    .trace(Trace::Bar(BarTrace {
        name: "Occupancy Level (%)".to_owned(),
        x: months.clone(),
        y: summary.iter().map(|m| m.mean_occupancy_pct).collect(),
        marker: Marker::color(TEAL),
    }))
    .trace(Trace::Bar(BarTrace {
        name: ENERGY_AXIS.to_owned(),
        x: months,
        y: summary.iter().map(|m| m.mean_energy_kwh).collect(),
        marker: Marker::color(CORAL),
    }))
}

/// Mean radiation per hour of day, one line per representative day
pub fn seasonal_radiation_profile(radiation: &SeasonalRadiation) -> Figure {
    radiation.seasons.iter().fold(
        Figure::new(
            Layout::titled("Solar Energy Contribution Across All Months")
                .axes("Time of Day (Hour)", "Solar Energy Contribution (kWh/m²)")
                .shaded(),
        ),
        |figure, season| {
            figure.trace(Trace::Scatter(ScatterTrace {
                name: season.day.label().to_owned(),
                x: season.hourly_profile.iter().map(|(h, _)| (*h).into()).collect(),
                y: season.hourly_profile.iter().map(|(_, v)| Some(*v)).collect(),
                mode: "lines",
                line: None,
            }))
        },
    )
}

/// Initial cost, the two savings steps and the resulting final cost
pub fn cost_waterfall(costs: &CostBreakdown) -> Figure {
    let layout = Layout {
        yaxis: Some(Axis {
            title: Title::new("Cost ($)"),
            tickangle: None,
        }),
        ..Layout::titled("Cost Savings Breakdown (Waterfall Chart)")
            .shaded()
            .without_legend()
    };

    Figure::new(layout).trace(Trace::Waterfall(WaterfallTrace {
        name: "Cost Breakdown".to_owned(),
        orientation: "v",
        measure: vec!["absolute", "relative", "relative", "total"],
        x: ["Initial Cost", "Adaptation Savings", "Solar Savings", "Final Cost"]
            .iter()
            .map(|s| (*s).to_owned())
            .collect(),
        y: vec![
            costs.initial_cost,
            -costs.adaptation_savings,
            -costs.solar_savings,
            costs.final_cost,
        ],
        text: vec![
            format!("${:.2}", costs.initial_cost),
            format!("-${:.2}", costs.adaptation_savings),
            format!("-${:.2}", costs.solar_savings),
            format!("${:.2}", costs.final_cost),
        ],
        textposition: "outside",
        connector: Connector {
            line: Line {
                color: "rgb(63, 63, 63)".to_owned(),
                width: None,
            },
        },
        increasing: MarkerWrapper {
            marker: Marker::color(TEAL),
        },
        decreasing: MarkerWrapper {
            marker: Marker::color(CORAL),
        },
        totals: MarkerWrapper {
            marker: Marker::color(TEAL),
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluxion_demand_core::{EnergyParameters, Table};

    fn balance() -> EnergyBalance {
        EnergyBalance::compute(1000.0, 13.5, &EnergyParameters::default())
    }

    #[test]
    fn test_energy_breakdown_donut() {
        let fig = energy_breakdown(&balance());
        let Trace::Pie(pie) = &fig.data[0] else {
            panic!("expected pie trace");
        };
        assert_eq!(pie.values, vec![1000.0, 6400.0]);
        assert_eq!(pie.hole, 0.4);
        assert_eq!(
            fig.layout.title.as_ref().map(|t| t.text.as_str()),
            Some("Annual Energy Demand Breakdown")
        );
    }

    #[test]
    fn test_solar_card_hides_legend() {
        let fig = solar_share(&balance());
        assert!(!fig.layout.showlegend);
        let Trace::Pie(pie) = &fig.data[0] else {
            panic!("expected pie trace");
        };
        assert_eq!(pie.labels, vec!["Solar", "Remaining"]);
    }

    #[test]
    fn test_stacked_bar_has_one_series_per_state() {
        let row = |period, state, energy_kwh| PeriodStateEnergy {
            period,
            state,
            energy_kwh,
        };
        let rows = vec![
            row(1, BuildingState::Contracted, 2.0),
            row(1, BuildingState::Expanded, 3.0),
            row(2, BuildingState::Contracted, 4.0),
        ];
        let fig = state_stacked_bar(&rows, "Monthly");
        assert_eq!(fig.data.len(), 2);
        assert_eq!(fig.layout.barmode, Some("stack"));
        assert_eq!(
            fig.layout.xaxis.as_ref().map(|a| a.title.text.as_str()),
            Some("Monthly")
        );
        let Trace::Bar(contracted) = &fig.data[0] else {
            panic!("expected bar trace");
        };
        assert_eq!(contracted.name, "Contracted (65 m²)");
        assert_eq!(contracted.y, vec![Some(2.0), Some(4.0)]);
    }

    #[test]
    fn test_waterfall_steps() {
        let costs = CostBreakdown::compute(900.0, 700.0, &balance(), 0.2);
        let fig = cost_waterfall(&costs);
        let Trace::Waterfall(w) = &fig.data[0] else {
            panic!("expected waterfall trace");
        };
        assert_eq!(w.measure, vec!["absolute", "relative", "relative", "total"]);
        assert!(w.y[1] < 0.0 && w.y[2] < 0.0);
        assert_eq!(w.text[1], "-$40.00");
    }

    #[test]
    fn test_heatmap_title_names_metric() {
        let table = Table::from_reader(
            "occupancy",
            "Time,Energy Demand (kWh),Occupancy Level (%)\n2024-01-01 08:00:00,1,60\n".as_bytes(),
        )
        .unwrap();
        let series = OccupancySeries::from_table(&table, 50.0).unwrap();
        let fig = metric_heatmap(&series.heatmap(fluxion_demand_core::Metric::OccupancyLevel));
        assert_eq!(
            fig.layout.title.as_ref().map(|t| t.text.as_str()),
            Some("Heatmap of Occupancy Level (%)")
        );
        let Trace::Heatmap(h) = &fig.data[0] else {
            panic!("expected heatmap trace");
        };
        assert_eq!(h.z, vec![vec![Some(60.0)]]);
    }
}
