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

//! Declarative figure model.
//!
//! Serialises to the `{ data, layout }` shape plotly.js consumes, so the page
//! only has to hand the JSON to `Plotly.react`.

use serde::Serialize;

pub const TEAL: &str = "#4ecdc4";
pub const CORAL: &str = "#ff6b6b";
pub const FONT_COLOR: &str = "#2c3e50";
pub const PLOT_BACKGROUND: &str = "rgba(240,240,240,0.95)";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    pub fn new(layout: Layout) -> Self {
        Self {
            data: Vec::new(),
            layout,
        }
    }

    #[must_use]
    pub fn trace(mut self, trace: Trace) -> Self {
        self.data.push(trace);
        self
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Category or numeric axis value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Datum {
    Number(f64),
    Text(String),
}

impl From<f64> for Datum {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for Datum {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for Datum {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Datum {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Pie(PieTrace),
    Bar(BarTrace),
    Scatter(ScatterTrace),
    Heatmap(HeatmapTrace),
    Waterfall(WaterfallTrace),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieTrace {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub hole: f64,
    pub marker: Marker,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTrace {
    pub name: String,
    pub x: Vec<Datum>,
    pub y: Vec<Option<f64>>,
    pub marker: Marker,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterTrace {
    pub name: String,
    pub x: Vec<Datum>,
    pub y: Vec<Option<f64>>,
    pub mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapTrace {
    pub x: Vec<u32>,
    pub y: Vec<String>,
    pub z: Vec<Vec<Option<f64>>>,
    pub colorscale: &'static str,
    pub colorbar: ColorBar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterfallTrace {
    pub name: String,
    pub orientation: &'static str,
    pub measure: Vec<&'static str>,
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub text: Vec<String>,
    pub textposition: &'static str,
    pub connector: Connector,
    pub increasing: MarkerWrapper,
    pub decreasing: MarkerWrapper,
    pub totals: MarkerWrapper,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Marker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
}

impl Marker {
    pub fn color(color: &str) -> Self {
        Self {
            color: Some(color.to_owned()),
            colors: None,
        }
    }

    pub fn colors(colors: &[&str]) -> Self {
        Self {
            color: None,
            colors: Some(colors.iter().map(|c| (*c).to_owned()).collect()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerWrapper {
    pub marker: Marker,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connector {
    pub line: Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBar {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub color: String,
    pub size: u32,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            color: FONT_COLOR.to_owned(),
            size: 14,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            x: None,
            font: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickangle: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub orientation: &'static str,
    pub x: f64,
    pub y: f64,
    pub xanchor: &'static str,
    pub yanchor: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
}

impl Legend {
    /// Horizontal legend centred below the plot
    pub fn below() -> Self {
        Self {
            orientation: "h",
            x: 0.5,
            y: -0.2,
            xanchor: "center",
            yanchor: "bottom",
            title: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Margin {
    pub t: u32,
    pub b: u32,
    pub l: u32,
    pub r: u32,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            t: 30,
            b: 20,
            l: 20,
            r: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<&'static str>,
    pub showlegend: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_bgcolor: Option<&'static str>,
    pub hovermode: &'static str,
    pub font: Font,
    pub margin: Margin,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            title: None,
            xaxis: None,
            yaxis: None,
            barmode: None,
            showlegend: true,
            legend: None,
            plot_bgcolor: None,
            hovermode: "closest",
            font: Font::default(),
            margin: Margin::default(),
        }
    }
}

impl Layout {
    pub fn titled(text: impl Into<String>) -> Self {
        Self {
            title: Some(Title {
                text: text.into(),
                x: Some(0.5),
                font: Some(Font {
                    color: FONT_COLOR.to_owned(),
                    size: 16,
                }),
            }),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn axes(mut self, x: &str, y: &str) -> Self {
        self.xaxis = Some(Axis {
            title: Title::new(x),
            tickangle: None,
        });
        self.yaxis = Some(Axis {
            title: Title::new(y),
            tickangle: None,
        });
        self
    }

    #[must_use]
    pub fn shaded(mut self) -> Self {
        self.plot_bgcolor = Some(PLOT_BACKGROUND);
        self
    }

    #[must_use]
    pub fn without_legend(mut self) -> Self {
        self.showlegend = false;
        self.legend = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trace_is_tagged_with_plotly_type() {
        let trace = Trace::Pie(PieTrace {
            labels: vec!["A".to_owned()],
            values: vec![1.0],
            hole: 0.4,
            marker: Marker::colors(&[TEAL]),
        });
        let value = serde_json::to_value(&trace).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "pie",
                "labels": ["A"],
                "values": [1.0],
                "hole": 0.4,
                "marker": { "colors": ["#4ecdc4"] }
            })
        );
    }

    #[test]
    fn test_datum_serialises_untagged() {
        let x: Vec<Datum> = vec![3_u32.into(), "Week".into()];
        assert_eq!(serde_json::to_value(&x).unwrap(), json!([3.0, "Week"]));
    }

    #[test]
    fn test_layout_omits_unset_fields() {
        let value = serde_json::to_value(Layout::default().without_legend()).unwrap();
        assert!(value.get("title").is_none());
        assert_eq!(value["showlegend"], json!(false));
        assert_eq!(value["font"]["color"], json!(FONT_COLOR));
    }
}
