use anyhow::bail;
use serde::{Serialize, Serializer};

/// Bucket name used when a categorical field is blank in the source data.
pub const MISSING_CATEGORY: &str = "(missing)";

/// Binary survey outcome. Anything other than 0/1 in the source data is
/// rejected at load time rather than coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DepressionLevel {
    NotDepressed,
    Depressed,
}

impl DepressionLevel {
    pub const ALL: [DepressionLevel; 2] =
        [DepressionLevel::NotDepressed, DepressionLevel::Depressed];

    pub fn from_raw(value: i64) -> anyhow::Result<Self> {
        match value {
            0 => Ok(DepressionLevel::NotDepressed),
            1 => Ok(DepressionLevel::Depressed),
            other => bail!("unsupported Depression value {other}: expected 0 or 1"),
        }
    }

    pub fn as_i64(self) -> i64 {
        match self {
            DepressionLevel::NotDepressed => 0,
            DepressionLevel::Depressed => 1,
        }
    }

    pub fn as_f64(self) -> f64 {
        self.as_i64() as f64
    }

    pub fn label(self) -> &'static str {
        match self {
            DepressionLevel::NotDepressed => "Not Depressed",
            DepressionLevel::Depressed => "Depressed",
        }
    }
}

// Serialized as the raw 0/1 level so the surface can apply the color map.
impl Serialize for DepressionLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_i64())
    }
}

#[derive(Debug, Clone)]
pub struct SurveyRecord {
    pub gender: Option<String>,
    pub age: Option<f64>,
    pub academic_pressure: Option<f64>,
    pub cgpa: Option<f64>,
    pub sleep_duration: Option<String>,
    pub dietary_habits: Option<String>,
    pub degree: Option<String>,
    pub suicidal_thoughts: Option<String>,
    pub work_study_hours: Option<f64>,
    pub financial_stress: Option<f64>,
    pub family_history: Option<String>,
    pub depression: DepressionLevel,
}

/// Closed set of numeric columns. Chart and filter code refers to columns
/// through this enum, so a bad column reference cannot reach runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericColumn {
    Age,
    AcademicPressure,
    Cgpa,
    WorkStudyHours,
    FinancialStress,
    Depression,
}

impl NumericColumn {
    /// Order matches the column order of the source table, which fixes the
    /// axis order of the correlation heatmap.
    pub const ALL: [NumericColumn; 6] = [
        NumericColumn::Age,
        NumericColumn::AcademicPressure,
        NumericColumn::Cgpa,
        NumericColumn::WorkStudyHours,
        NumericColumn::FinancialStress,
        NumericColumn::Depression,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NumericColumn::Age => "Age",
            NumericColumn::AcademicPressure => "Academic Pressure",
            NumericColumn::Cgpa => "CGPA",
            NumericColumn::WorkStudyHours => "Work_Study_Hours",
            NumericColumn::FinancialStress => "Financial Stress",
            NumericColumn::Depression => "Depression",
        }
    }

    pub fn value(self, record: &SurveyRecord) -> Option<f64> {
        match self {
            NumericColumn::Age => record.age,
            NumericColumn::AcademicPressure => record.academic_pressure,
            NumericColumn::Cgpa => record.cgpa,
            NumericColumn::WorkStudyHours => record.work_study_hours,
            NumericColumn::FinancialStress => record.financial_stress,
            NumericColumn::Depression => Some(record.depression.as_f64()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoricalColumn {
    Gender,
    SleepDuration,
    Degree,
    DietaryHabits,
    FamilyHistory,
    SuicidalThoughts,
}

impl CategoricalColumn {
    pub fn name(self) -> &'static str {
        match self {
            CategoricalColumn::Gender => "Gender",
            CategoricalColumn::SleepDuration => "Sleep_Duration",
            CategoricalColumn::Degree => "Degree",
            CategoricalColumn::DietaryHabits => "Dietary Habits",
            CategoricalColumn::FamilyHistory => "Family History of Mental Illness",
            CategoricalColumn::SuicidalThoughts => "Suicidal_Thoughts",
        }
    }

    pub fn value(self, record: &SurveyRecord) -> Option<&str> {
        let value = match self {
            CategoricalColumn::Gender => &record.gender,
            CategoricalColumn::SleepDuration => &record.sleep_duration,
            CategoricalColumn::Degree => &record.degree,
            CategoricalColumn::DietaryHabits => &record.dietary_habits,
            CategoricalColumn::FamilyHistory => &record.family_history,
            CategoricalColumn::SuicidalThoughts => &record.suicidal_thoughts,
        };
        value.as_deref()
    }
}

/// The record table. Read-only after load; every rendering step borrows it.
#[derive(Debug, Clone, Default)]
pub struct SurveyTable {
    records: Vec<SurveyRecord>,
}

impl SurveyTable {
    pub fn new(records: Vec<SurveyRecord>) -> Self {
        SurveyTable { records }
    }

    pub fn records(&self) -> &[SurveyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Present values of one numeric column, in row order.
    pub fn numeric_values(&self, column: NumericColumn) -> Vec<f64> {
        self.records
            .iter()
            .filter_map(|record| column.value(record))
            .collect()
    }

    /// Observed (min, max) of a numeric column, None when no value is present.
    pub fn numeric_range(&self, column: NumericColumn) -> Option<(f64, f64)> {
        self.numeric_values(column)
            .into_iter()
            .fold(None, |range, value| match range {
                None => Some((value, value)),
                Some((min, max)) => Some((min.min(value), max.max(value))),
            })
    }
}

/// One bar of a count chart, optionally split by depression level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depression: Option<DepressionLevel>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<&'static str>,
    pub values: Vec<Vec<f64>>,
    /// Cell values rounded to two decimals, for on-chart annotation text.
    pub annotations: Vec<Vec<String>>,
}
