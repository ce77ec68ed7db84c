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

use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use fluxion_demand_core::{
    ComputedAggregates, EnergyParameters, InputTables, Metric, RadiationSettings, Table,
};
use fluxion_demand_web::{
    AggregationLevel, ChartId, DashboardShell, DashboardState, Selection, build_router,
};
use tower::ServiceExt;

const OCCUPANCY: &str = "\
Time,Energy Demand (kWh),Occupancy Level (%)
2024-01-01 08:00:00,10,80
2024-01-01 09:00:00,20,40
2024-01-06 08:00:00,5,50
2024-02-05 08:00:00,7,51
2024-02-10 14:00:00,3,10
";

const ADJUSTED: &str = "\
Date,Energy Demand (kWh),Adjusted Energy Demand (kWh)
2024-01-01,100,80
2024-01-02,120,90
";

fn radiation(value: f64) -> Table {
    let csv = format!(
        "Point Index,Time,Radiation (kWh/m²)\n\
         1,2021-06-21 11:00:00,{value}\n\
         2,2021-06-21 12:06:00,{value}\n"
    );
    Table::from_reader("radiation", csv.as_bytes()).unwrap()
}

fn aggregates() -> Arc<ComputedAggregates> {
    let tables = InputTables {
        occupancy: Table::from_reader("occupancy", OCCUPANCY.as_bytes()).unwrap(),
        adjusted: Table::from_reader("adjusted", ADJUSTED.as_bytes()).unwrap(),
        radiation: [radiation(382.0), radiation(764.0), radiation(573.0), radiation(191.0)],
    };
    Arc::new(
        ComputedAggregates::from_tables(
            &tables,
            &EnergyParameters::default(),
            &RadiationSettings::default(),
        )
        .unwrap(),
    )
}

async fn get(uri: &str) -> (StatusCode, String) {
    let response = build_router(aggregates())
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_index_embeds_every_chart() {
    let (status, body) = get("/").await;
    assert_eq!(status, StatusCode::OK);
    for chart in ChartId::ALL {
        assert!(
            body.contains(&format!("id=\"figure-{chart}\"")),
            "missing figure for {chart}"
        );
    }
    assert!(body.contains("Key Metrics"));
    assert!(body.contains("name=\"aggregation\" value=\"Weekly\" checked"));
}

#[tokio::test]
async fn test_chart_endpoint_returns_figure_json() {
    let (status, body) = get("/api/charts/energy-breakdown").await;
    assert_eq!(status, StatusCode::OK);
    let figure: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(figure["data"][0]["type"], "pie");
    assert_eq!(figure["data"][0]["values"][0], 45.0);
    assert_eq!(figure["data"][0]["values"][1], 6400.0);
}

#[tokio::test]
async fn test_unknown_chart_is_not_found() {
    let (status, body) = get("/api/charts/pie-in-the-sky").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("unknown chart"));
}

#[tokio::test]
async fn test_bad_selector_value_is_rejected() {
    let (status, _) = get("/api/charts/state-stacked-bar?aggregation=Daily").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_aggregation_changes_only_the_stacked_bar() {
    for chart in ChartId::ALL {
        let (_, weekly) = get(&format!("/api/charts/{chart}?aggregation=Weekly")).await;
        let (_, monthly) = get(&format!("/api/charts/{chart}?aggregation=Monthly")).await;
        if chart == ChartId::StateStackedBar {
            assert_ne!(weekly, monthly);
            assert!(monthly.contains("Monthly Aggregation"));
        } else {
            assert_eq!(weekly, monthly, "{chart} changed with aggregation");
        }
    }
}

#[tokio::test]
async fn test_metric_selects_heatmap_source() {
    let (_, body) = get("/api/charts/metric-heatmap?metric=OccupancyLevel").await;
    assert!(body.contains("Heatmap of Occupancy Level (%)"));
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let (status, body) = get("/api/metrics").await;
    assert_eq!(status, StatusCode::OK);
    let metrics: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(metrics["balance"]["motor_total"], 6400.0);
    assert_eq!(metrics["seasons"].as_array().map(Vec::len), Some(4));
    let annual = metrics["annual_radiation_kwh_m2"].as_f64().unwrap();
    // daily {1.0, 2.0, 1.5, 0.5} over months of 28/30/30/31 days
    assert!((annual - (2.0 * 28.0 + 3.0 * 60.0 + 3.0 * 45.0 + 2.0 * 15.5)).abs() < 1e-9);
}

#[test]
fn test_shell_select_rerenders_one_chart() {
    let mut shell = DashboardShell::new(aggregates());
    let before: Vec<String> = shell
        .render_all()
        .into_iter()
        .map(|(_, f)| f.to_json().unwrap())
        .collect();

    let (chart, figure) = shell.select(Selection::Aggregation(AggregationLevel::Monthly));
    assert_eq!(chart, ChartId::StateStackedBar);
    assert_eq!(shell.state().aggregation, AggregationLevel::Monthly);
    assert_eq!(shell.render(ChartId::StateStackedBar), figure);

    let after: Vec<String> = shell
        .render_all()
        .into_iter()
        .map(|(_, f)| f.to_json().unwrap())
        .collect();
    let changed: Vec<ChartId> = ChartId::ALL
        .into_iter()
        .zip(before.iter().zip(&after))
        .filter(|(_, (b, a))| b != a)
        .map(|(id, _)| id)
        .collect();
    assert_eq!(changed, vec![ChartId::StateStackedBar]);

    let (chart, _) = shell.select(Selection::Metric(Metric::OccupancyLevel));
    assert_eq!(chart, ChartId::MetricHeatmap);
    assert_eq!(
        shell.state(),
        DashboardState {
            aggregation: AggregationLevel::Monthly,
            metric: Metric::OccupancyLevel,
        }
    );
}
