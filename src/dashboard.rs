use serde::Serialize;

use crate::charts::{self, Axis, ChartSpec, DataPoint, PointValue, TickOverride};
use crate::models::{CategoricalColumn, NumericColumn, SurveyTable};
use crate::stats;

/// Default slider position: two above the column minimum, clamped into range.
const DEFAULT_OFFSET: f64 = 2.0;

/// A threshold slider as the dashboard host should materialize it.
/// Rebuilt from the table's observed range on every pass.
#[derive(Debug, Clone, Serialize)]
pub struct SliderSpec {
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl SliderSpec {
    pub fn new(label: &'static str, min: f64, max: f64, default: f64) -> Self {
        SliderSpec {
            label,
            min,
            max,
            default: default.clamp(min, max),
        }
    }

    pub fn for_column(table: &SurveyTable, column: NumericColumn, label: &'static str) -> Self {
        let (min, max) = table.numeric_range(column).unwrap_or((0.0, 0.0));
        SliderSpec::new(label, min, max, min + DEFAULT_OFFSET)
    }

    /// Current slider position: the user's value clamped into range, or the
    /// default when the user has not touched it.
    pub fn resolve(&self, user_value: Option<f64>) -> f64 {
        match user_value {
            Some(value) => value.clamp(self.min, self.max),
            None => self.default,
        }
    }
}

/// User-adjusted threshold positions for the four sliders. `None` means the
/// slider sits at its default.
#[derive(Debug, Clone, Copy, Default)]
pub struct SliderValues {
    pub min_cgpa: Option<f64>,
    pub min_age: Option<f64>,
    pub min_work_study_hours: Option<f64>,
    pub min_academic_pressure: Option<f64>,
}

/// One element of the rendered dashboard, in display order.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DashboardItem {
    Text { body: String },
    Slider { spec: SliderSpec, value: f64 },
    Chart { spec: ChartSpec },
}

fn text(body: impl Into<String>) -> DashboardItem {
    DashboardItem::Text { body: body.into() }
}

fn chart(spec: ChartSpec) -> DashboardItem {
    DashboardItem::Chart { spec }
}

fn categorical_points(table: &SurveyTable, column: CategoricalColumn) -> Vec<DataPoint> {
    table
        .records()
        .iter()
        .map(|record| DataPoint {
            x: PointValue::Category(stats::category_of(record, column)),
            y: None,
            group: Some(record.depression),
        })
        .collect()
}

fn numeric_points(table: &SurveyTable, column: NumericColumn) -> Vec<DataPoint> {
    table
        .records()
        .iter()
        .filter_map(|record| {
            column.value(record).map(|value| DataPoint {
                x: PointValue::Number(value),
                y: None,
                group: Some(record.depression),
            })
        })
        .collect()
}

/// One full render pass: a pure function of the table and the slider
/// positions. Emits the thirteen numbered sections in fixed order; any
/// slider change re-runs the whole pass.
pub fn render_pass(table: &SurveyTable, inputs: &SliderValues) -> Vec<DashboardItem> {
    let mut items = vec![
        text("# Depression Analysis Dashboard"),
        text("Explore insights about depression through interactive visualizations."),
    ];

    // 1. CGPA distribution, threshold-filtered.
    items.push(text("1. Distribution of CGPA"));
    let slider = SliderSpec::for_column(table, NumericColumn::Cgpa, "Minimum CGPA");
    let threshold = slider.resolve(inputs.min_cgpa);
    let filtered = stats::filter_above(table, NumericColumn::Cgpa, threshold);
    items.push(DashboardItem::Slider {
        spec: slider,
        value: threshold,
    });
    items.push(chart(charts::histogram(
        "Distribution of CGPA",
        Axis::new("CGPA", "CGPA"),
        filtered.numeric_values(NumericColumn::Cgpa),
    )));

    // 2. Age distribution, threshold-filtered.
    items.push(text("2. Distribution of Age"));
    let slider = SliderSpec::for_column(table, NumericColumn::Age, "Minimum Age");
    let threshold = slider.resolve(inputs.min_age);
    let filtered = stats::filter_above(table, NumericColumn::Age, threshold);
    items.push(DashboardItem::Slider {
        spec: slider,
        value: threshold,
    });
    items.push(chart(charts::histogram(
        "Distribution of Age",
        Axis::new("Age", "Age"),
        filtered.numeric_values(NumericColumn::Age),
    )));

    // 3. Work/study hours distribution, threshold-filtered.
    items.push(text("3. Distribution of Work/Study Hours"));
    let slider = SliderSpec::for_column(
        table,
        NumericColumn::WorkStudyHours,
        "Minimum Work/Study Hours",
    );
    let threshold = slider.resolve(inputs.min_work_study_hours);
    let filtered = stats::filter_above(table, NumericColumn::WorkStudyHours, threshold);
    items.push(DashboardItem::Slider {
        spec: slider,
        value: threshold,
    });
    items.push(chart(charts::histogram(
        "Distribution of Work/Study Hours",
        Axis::new("Work_Study_Hours", "Work/Study Hours"),
        filtered.numeric_values(NumericColumn::WorkStudyHours),
    )));

    // 4. Sleep duration, colored by depression level.
    items.push(text("4. Distribution of Sleep Duration"));
    items.push(chart(charts::histogram_by_depression(
        "Distribution of Sleep Duration",
        Axis::new("Sleep_Duration", "Sleep Duration (hours)"),
        categorical_points(table, CategoricalColumn::SleepDuration),
    )));

    // 5. Gender split by depression level.
    items.push(text("5. Gender Distribution by Depression Level"));
    items.push(chart(charts::grouped_bar(
        "Gender Distribution with Depression (Grouped)",
        Axis::new("Gender", "Gender"),
        "Number of Individuals",
        stats::count_by_depression(table, CategoricalColumn::Gender),
    )));

    // 6. Degree value counts.
    items.push(text("6. Distribution of Academic Degrees"));
    items.push(chart(charts::bar(
        "Degree Distribution",
        Axis::new("Degree", "Degree"),
        stats::count_by(table, CategoricalColumn::Degree),
    )));

    // 7. Correlation heatmap over the numeric columns.
    items.push(text("7. Correlation Heatmap of Numeric Variables"));
    items.push(chart(charts::heatmap(
        "Correlation Heatmap",
        stats::correlation_matrix(table),
    )));

    // 8. Academic pressure box plot, threshold-filtered.
    items.push(text("8. Academic Pressure vs Depression Level"));
    let slider = SliderSpec::for_column(
        table,
        NumericColumn::AcademicPressure,
        "Minimum Academic Pressure",
    );
    let threshold = slider.resolve(inputs.min_academic_pressure);
    let filtered = stats::filter_above(table, NumericColumn::AcademicPressure, threshold);
    items.push(DashboardItem::Slider {
        spec: slider,
        value: threshold,
    });
    let pressure_points: Vec<DataPoint> = filtered
        .records()
        .iter()
        .filter_map(|record| {
            record.academic_pressure.map(|pressure| DataPoint {
                x: PointValue::Number(record.depression.as_f64()),
                y: Some(pressure),
                group: Some(record.depression),
            })
        })
        .collect();
    items.push(chart(charts::box_plot(
        "Academic Pressure Distribution by Depression Level",
        Axis::new("Depression", "Depression Level").with_ticks(TickOverride::depression_levels()),
        Axis::new("Academic Pressure", "Academic Pressure"),
        pressure_points,
    )));

    // 9. Dietary habits split by depression level.
    items.push(text("9. Dietary Habits vs Depression Level"));
    items.push(chart(charts::grouped_bar(
        "Dietary Habits vs Depression",
        Axis::new("Dietary Habits", "Dietary Habits"),
        "Count",
        stats::count_by_depression(table, CategoricalColumn::DietaryHabits),
    )));

    // 10. Financial stress, colored by depression level.
    items.push(text("10. Financial Stress vs Depression Level"));
    items.push(chart(charts::histogram_by_depression(
        "Distribution of Financial Stress",
        Axis::new("Financial Stress", "Financial Stress"),
        numeric_points(table, NumericColumn::FinancialStress),
    )));

    // 11. Family history split by depression level.
    items.push(text("11. Family History of Mental Illness vs Depression Level"));
    items.push(chart(charts::grouped_bar(
        "Family History of Mental Illness vs Depression",
        Axis::new("Family History of Mental Illness", "Family History"),
        "Count",
        stats::count_by_depression(table, CategoricalColumn::FamilyHistory),
    )));

    // 12. Suicidal thoughts split by depression level.
    items.push(text("12. Suicidal Thoughts vs Depression Level"));
    items.push(chart(charts::grouped_bar(
        "Suicidal Thoughts vs Depression",
        Axis::new("Suicidal_Thoughts", "Suicidal Thoughts"),
        "Count",
        stats::count_by_depression(table, CategoricalColumn::SuicidalThoughts),
    )));

    // 13. CGPA vs depression scatter.
    items.push(text("13. CGPA vs Depression Level"));
    let scatter_points: Vec<DataPoint> = table
        .records()
        .iter()
        .filter_map(|record| {
            record.cgpa.map(|cgpa| DataPoint {
                x: PointValue::Number(cgpa),
                y: Some(record.depression.as_f64()),
                group: None,
            })
        })
        .collect();
    items.push(chart(charts::scatter(
        "CGPA vs Depression",
        Axis::new("CGPA", "CGPA"),
        Axis::new("Depression", "Depression Level (0 or 1)")
            .with_ticks(TickOverride::depression_levels()),
        scatter_points,
    )));

    items
}

/// Writes one render pass to the dashboard surface as a JSON document.
pub fn write_items<W: std::io::Write>(items: &[DashboardItem], writer: W) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(writer, items)?;
    Ok(())
}
