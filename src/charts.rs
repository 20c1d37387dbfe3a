use serde::Serialize;

use crate::models::{CorrelationMatrix, DepressionLevel, GroupCount};

const LIGHT_GREEN: &str = "lightgreen";
const RED: &str = "red";
const HISTOGRAM_BINS: u32 = 20;

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mark {
    Histogram,
    Bar,
    Box,
    Scatter,
    Heatmap,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarMode {
    Group,
}

/// Axis tick relabeling, e.g. showing 0/1 depression levels as words.
#[derive(Debug, Clone, Serialize)]
pub struct TickOverride {
    pub values: Vec<i64>,
    pub labels: Vec<&'static str>,
}

impl TickOverride {
    pub fn depression_levels() -> Self {
        TickOverride {
            values: DepressionLevel::ALL.iter().map(|l| l.as_i64()).collect(),
            labels: DepressionLevel::ALL.iter().map(|l| l.label()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Axis {
    pub field: &'static str,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticks: Option<TickOverride>,
}

impl Axis {
    pub fn new(field: &'static str, label: impl Into<String>) -> Self {
        Axis {
            field,
            label: label.into(),
            ticks: None,
        }
    }

    pub fn with_ticks(mut self, ticks: TickOverride) -> Self {
        self.ticks = Some(ticks);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ColorMapEntry {
    pub value: i64,
    pub color: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColorEncoding {
    pub field: &'static str,
    pub label: &'static str,
    pub map: Vec<ColorMapEntry>,
}

/// The fixed two-color depression encoding. Built from the closed enum, so
/// the map always covers exactly the values a record can carry.
pub fn depression_colors() -> ColorEncoding {
    ColorEncoding {
        field: "Depression",
        label: "Depression Level",
        map: DepressionLevel::ALL
            .iter()
            .map(|level| ColorMapEntry {
                value: level.as_i64(),
                color: match level {
                    DepressionLevel::NotDepressed => LIGHT_GREEN,
                    DepressionLevel::Depressed => RED,
                },
                label: level.label(),
            })
            .collect(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PointValue {
    Number(f64),
    Category(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct DataPoint {
    pub x: PointValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<DepressionLevel>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ChartData {
    Points(Vec<DataPoint>),
    Counts(Vec<GroupCount>),
    Matrix(CorrelationMatrix),
}

/// One chart, fully described: mark, encodings, styling, and inline data.
/// Stateless and rebuilt on every render pass.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub mark: Mark,
    /// Absent only for the heatmap, whose axes are the matrix columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorEncoding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bins: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bar_mode: Option<BarMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_scale: Option<&'static str>,
    pub data: ChartData,
}

/// Single-color histogram over one numeric column.
pub fn histogram(title: impl Into<String>, x: Axis, values: Vec<f64>) -> ChartSpec {
    ChartSpec {
        title: title.into(),
        mark: Mark::Histogram,
        x: Some(x),
        y: None,
        color: None,
        bins: Some(HISTOGRAM_BINS),
        bar_mode: None,
        marker: Some(Marker {
            color: LIGHT_GREEN,
            opacity: None,
        }),
        color_scale: None,
        data: ChartData::Points(
            values
                .into_iter()
                .map(|value| DataPoint {
                    x: PointValue::Number(value),
                    y: None,
                    group: None,
                })
                .collect(),
        ),
    }
}

/// Histogram split by depression level, one colored series per level.
pub fn histogram_by_depression(
    title: impl Into<String>,
    x: Axis,
    points: Vec<DataPoint>,
) -> ChartSpec {
    ChartSpec {
        title: title.into(),
        mark: Mark::Histogram,
        x: Some(x),
        y: None,
        color: Some(depression_colors()),
        bins: Some(HISTOGRAM_BINS),
        bar_mode: None,
        marker: None,
        color_scale: None,
        data: ChartData::Points(points),
    }
}

/// Plain value-count bar chart.
pub fn bar(title: impl Into<String>, x: Axis, counts: Vec<GroupCount>) -> ChartSpec {
    ChartSpec {
        title: title.into(),
        mark: Mark::Bar,
        x: Some(x),
        y: Some(Axis::new("Count", "Count")),
        color: None,
        bins: None,
        bar_mode: None,
        marker: Some(Marker {
            color: LIGHT_GREEN,
            opacity: None,
        }),
        color_scale: None,
        data: ChartData::Counts(counts),
    }
}

/// Bar chart of (category, depression) counts, bars grouped per category.
pub fn grouped_bar(
    title: impl Into<String>,
    x: Axis,
    y_label: impl Into<String>,
    counts: Vec<GroupCount>,
) -> ChartSpec {
    ChartSpec {
        title: title.into(),
        mark: Mark::Bar,
        x: Some(x),
        y: Some(Axis::new("Count", y_label)),
        color: Some(depression_colors()),
        bins: None,
        bar_mode: Some(BarMode::Group),
        marker: None,
        color_scale: None,
        data: ChartData::Counts(counts),
    }
}

pub fn box_plot(title: impl Into<String>, x: Axis, y: Axis, points: Vec<DataPoint>) -> ChartSpec {
    ChartSpec {
        title: title.into(),
        mark: Mark::Box,
        x: Some(x),
        y: Some(y),
        color: Some(depression_colors()),
        bins: None,
        bar_mode: None,
        marker: None,
        color_scale: None,
        data: ChartData::Points(points),
    }
}

pub fn scatter(title: impl Into<String>, x: Axis, y: Axis, points: Vec<DataPoint>) -> ChartSpec {
    ChartSpec {
        title: title.into(),
        mark: Mark::Scatter,
        x: Some(x),
        y: Some(y),
        color: None,
        bins: None,
        bar_mode: None,
        marker: Some(Marker {
            color: RED,
            opacity: Some(0.6),
        }),
        color_scale: None,
        data: ChartData::Points(points),
    }
}

pub fn heatmap(title: impl Into<String>, matrix: CorrelationMatrix) -> ChartSpec {
    ChartSpec {
        title: title.into(),
        mark: Mark::Heatmap,
        x: None,
        y: None,
        color: None,
        bins: None,
        bar_mode: None,
        marker: None,
        color_scale: Some("Viridis"),
        data: ChartData::Matrix(matrix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depression_color_map_covers_both_levels_exactly() {
        let encoding = depression_colors();
        assert_eq!(encoding.map.len(), DepressionLevel::ALL.len());

        let not_depressed = &encoding.map[0];
        assert_eq!(not_depressed.value, 0);
        assert_eq!(not_depressed.color, "lightgreen");
        assert_eq!(not_depressed.label, "Not Depressed");

        let depressed = &encoding.map[1];
        assert_eq!(depressed.value, 1);
        assert_eq!(depressed.color, "red");
        assert_eq!(depressed.label, "Depressed");
    }

    #[test]
    fn depression_ticks_match_the_color_domain() {
        let ticks = TickOverride::depression_levels();
        assert_eq!(ticks.values, vec![0, 1]);
        assert_eq!(ticks.labels, vec!["Not Depressed", "Depressed"]);
    }

    #[test]
    fn histogram_spec_is_well_formed() {
        let spec = histogram(
            "Distribution of CGPA",
            Axis::new("CGPA", "CGPA"),
            vec![7.0, 8.5],
        );

        assert!(matches!(spec.mark, Mark::Histogram));
        assert_eq!(spec.bins, Some(20));
        assert_eq!(spec.x.as_ref().map(|axis| axis.field), Some("CGPA"));
        match &spec.data {
            ChartData::Points(points) => assert_eq!(points.len(), 2),
            _ => panic!("expected point data"),
        }
    }

    #[test]
    fn heatmap_axes_come_from_the_matrix_columns() {
        let matrix = CorrelationMatrix {
            columns: vec!["Age", "CGPA"],
            values: vec![vec![1.0, 0.5], vec![0.5, 1.0]],
            annotations: vec![
                vec!["1.00".to_string(), "0.50".to_string()],
                vec!["0.50".to_string(), "1.00".to_string()],
            ],
        };
        let spec = heatmap("Correlation Heatmap", matrix);

        assert!(spec.x.is_none());
        assert!(spec.y.is_none());
        let json = serde_json::to_value(&spec).unwrap();
        assert!(json.get("x").is_none());
        assert_eq!(json["data"]["columns"], serde_json::json!(["Age", "CGPA"]));
    }

    #[test]
    fn empty_histogram_serializes_without_error() {
        let spec = histogram("Distribution of Age", Axis::new("Age", "Age"), Vec::new());
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["data"], serde_json::json!([]));
    }

    #[test]
    fn depression_level_serializes_as_raw_value() {
        let point = DataPoint {
            x: PointValue::Category("Male".to_string()),
            y: None,
            group: Some(DepressionLevel::Depressed),
        };
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["x"], "Male");
        assert_eq!(json["group"], 1);
    }
}
