use std::path::Path;

use anyhow::{bail, Context};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tracing::{info, warn};

use crate::models::{DepressionLevel, SurveyRecord, SurveyTable};

/// Raw row as it appears in the source, before depression validation.
/// The three renamed headers already carry their internal names here
/// because `normalize_header` runs before deserialization.
#[derive(serde::Deserialize)]
struct RawRow {
    #[serde(rename = "Gender")]
    gender: Option<String>,
    #[serde(rename = "Age")]
    age: Option<f64>,
    #[serde(rename = "Academic Pressure")]
    academic_pressure: Option<f64>,
    #[serde(rename = "CGPA")]
    cgpa: Option<f64>,
    #[serde(rename = "Sleep_Duration")]
    sleep_duration: Option<String>,
    #[serde(rename = "Dietary Habits")]
    dietary_habits: Option<String>,
    #[serde(rename = "Degree")]
    degree: Option<String>,
    #[serde(rename = "Suicidal_Thoughts")]
    suicidal_thoughts: Option<String>,
    #[serde(rename = "Work_Study_Hours")]
    work_study_hours: Option<f64>,
    #[serde(rename = "Financial Stress")]
    financial_stress: Option<f64>,
    #[serde(rename = "Family History of Mental Illness")]
    family_history: Option<String>,
    #[serde(rename = "Depression")]
    depression: Option<i64>,
}

/// Every column the dashboard reads. Checked once at load; a header missing
/// from the source halts the run instead of rendering empty charts.
const REQUIRED_COLUMNS: [&str; 12] = [
    "Gender",
    "Age",
    "Academic Pressure",
    "CGPA",
    "Sleep_Duration",
    "Dietary Habits",
    "Degree",
    "Suicidal_Thoughts",
    "Work_Study_Hours",
    "Financial Stress",
    "Family History of Mental Illness",
    "Depression",
];

fn check_required_columns(headers: &csv::StringRecord) -> anyhow::Result<()> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|required| !headers.iter().any(|header| header == *required))
        .collect();
    if !missing.is_empty() {
        bail!("missing required columns: {}", missing.join(", "));
    }
    Ok(())
}

/// Maps the source headers that carry spaces or free text to the internal
/// column names. Already-normalized headers pass through unchanged, so
/// applying this twice is the same as applying it once.
pub fn normalize_header(name: &str) -> &str {
    match name.trim() {
        "Work/Study Hours" => "Work_Study_Hours",
        "Sleep Duration" => "Sleep_Duration",
        "Have you ever had suicidal thoughts ?" => "Suicidal_Thoughts",
        other => other,
    }
}

fn into_record(raw: RawRow) -> anyhow::Result<SurveyRecord> {
    let depression = raw
        .depression
        .context("missing Depression value")
        .and_then(DepressionLevel::from_raw)?;

    Ok(SurveyRecord {
        gender: raw.gender,
        age: raw.age,
        academic_pressure: raw.academic_pressure,
        cgpa: raw.cgpa,
        sleep_duration: raw.sleep_duration,
        dietary_habits: raw.dietary_habits,
        degree: raw.degree,
        suicidal_thoughts: raw.suicidal_thoughts,
        work_study_hours: raw.work_study_hours,
        financial_stress: raw.financial_stress,
        family_history: raw.family_history,
        depression,
    })
}

/// Loads the survey table, preferring the "sample" connection and falling
/// back to the local CSV. A failure of the fallback itself is fatal.
pub async fn load(fallback_csv: &Path) -> anyhow::Result<SurveyTable> {
    match load_sample_connection().await {
        Ok(table) => {
            info!(rows = table.len(), "loaded survey data from sample connection");
            Ok(table)
        }
        Err(err) => {
            warn!(error = %err, "sample connection unavailable, falling back to local csv");
            load_csv(fallback_csv).with_context(|| {
                format!(
                    "fallback load failed: could not read survey data from {}",
                    fallback_csv.display()
                )
            })
        }
    }
}

async fn load_sample_connection() -> anyhow::Result<SurveyTable> {
    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL is not set for the sample connection")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;

    fetch_sample(&pool).await
}

/// Reads the `sample` table. Column names match the internal schema; the
/// rename step only applies to the CSV path, mirroring the source data.
pub async fn fetch_sample(pool: &PgPool) -> anyhow::Result<SurveyTable> {
    let rows = sqlx::query(
        "SELECT gender, age, academic_pressure, cgpa, sleep_duration, \
         dietary_habits, degree, suicidal_thoughts, work_study_hours, \
         financial_stress, family_history, depression \
         FROM sample",
    )
    .fetch_all(pool)
    .await?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let raw = RawRow {
            gender: row.try_get("gender")?,
            age: row.try_get("age")?,
            academic_pressure: row.try_get("academic_pressure")?,
            cgpa: row.try_get("cgpa")?,
            sleep_duration: row.try_get("sleep_duration")?,
            dietary_habits: row.try_get("dietary_habits")?,
            degree: row.try_get("degree")?,
            suicidal_thoughts: row.try_get("suicidal_thoughts")?,
            work_study_hours: row.try_get("work_study_hours")?,
            financial_stress: row.try_get("financial_stress")?,
            family_history: row.try_get("family_history")?,
            depression: row.try_get::<Option<i32>, _>("depression")?.map(i64::from),
        };
        records.push(into_record(raw)?);
    }

    Ok(SurveyTable::new(records))
}

pub fn load_csv(csv_path: &Path) -> anyhow::Result<SurveyTable> {
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open survey data at {}", csv_path.display()))?;
    let headers = reader.headers()?.clone();
    let normalized: csv::StringRecord = headers.iter().map(normalize_header).collect();
    check_required_columns(&normalized)
        .with_context(|| format!("invalid survey schema in {}", csv_path.display()))?;

    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let row = result?;
        let raw: RawRow = row
            .deserialize(Some(&normalized))
            .with_context(|| format!("malformed survey row at line {}", index + 2))?;
        let record =
            into_record(raw).with_context(|| format!("invalid survey row at line {}", index + 2))?;
        records.push(record);
    }

    Ok(SurveyTable::new(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoricalColumn, NumericColumn};

    const RAW_HEADER: &str = "Gender,Age,Academic Pressure,CGPA,Sleep Duration,Dietary Habits,Degree,Have you ever had suicidal thoughts ?,Work/Study Hours,Financial Stress,Family History of Mental Illness,Depression";

    fn parse(csv_text: &str) -> anyhow::Result<SurveyTable> {
        let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
        let headers = reader.headers().unwrap().clone();
        let normalized: csv::StringRecord = headers.iter().map(normalize_header).collect();
        check_required_columns(&normalized)?;

        let mut records = Vec::new();
        for result in reader.records() {
            let row = result?;
            let raw: RawRow = row.deserialize(Some(&normalized))?;
            records.push(into_record(raw)?);
        }
        Ok(SurveyTable::new(records))
    }

    #[test]
    fn normalize_header_is_idempotent() {
        for header in [
            "Work/Study Hours",
            "Sleep Duration",
            "Have you ever had suicidal thoughts ?",
            "Gender",
            "CGPA",
        ] {
            let once = normalize_header(header);
            let twice = normalize_header(once);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn renames_exactly_three_headers() {
        assert_eq!(normalize_header("Work/Study Hours"), "Work_Study_Hours");
        assert_eq!(normalize_header("Sleep Duration"), "Sleep_Duration");
        assert_eq!(
            normalize_header("Have you ever had suicidal thoughts ?"),
            "Suicidal_Thoughts"
        );
        assert_eq!(normalize_header("Academic Pressure"), "Academic Pressure");
    }

    #[test]
    fn parses_rows_with_raw_headers() {
        let table = parse(&format!(
            "{RAW_HEADER}\nMale,24,3,8.5,5-6 hours,Healthy,BSc,Yes,6,2,No,1\n"
        ))
        .unwrap();

        assert_eq!(table.len(), 1);
        let record = &table.records()[0];
        assert_eq!(record.work_study_hours, Some(6.0));
        assert_eq!(record.sleep_duration.as_deref(), Some("5-6 hours"));
        assert_eq!(
            CategoricalColumn::SuicidalThoughts.value(record),
            Some("Yes")
        );
        assert_eq!(record.depression, DepressionLevel::Depressed);
    }

    #[test]
    fn blank_fields_become_none() {
        let table = parse(&format!(
            "{RAW_HEADER}\nFemale,,3,,7-8 hours,,MSc,No,4,1,Yes,0\n"
        ))
        .unwrap();

        let record = &table.records()[0];
        assert_eq!(record.age, None);
        assert_eq!(record.cgpa, None);
        assert_eq!(record.dietary_habits, None);
        assert_eq!(NumericColumn::Age.value(record), None);
    }

    #[test]
    fn missing_required_columns_halt_the_load() {
        let err = parse("Gender,Depression\nMale,0\nFemale,1\n").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("missing required columns"));
        assert!(message.contains("CGPA"));
        assert!(message.contains("Age"));
        assert!(!message.contains("Gender"));
    }

    #[test]
    fn raw_headers_satisfy_the_schema_check() {
        // The rename runs first, so the three raw header spellings count
        // as their internal columns.
        let table = parse(&format!(
            "{RAW_HEADER}\nMale,24,3,8.5,5-6 hours,Healthy,BSc,Yes,6,2,No,1\n"
        ));
        assert!(table.is_ok());
    }

    #[test]
    fn rejects_third_depression_value() {
        let err = parse(&format!(
            "{RAW_HEADER}\nMale,22,2,7.0,5-6 hours,Moderate,BA,No,5,1,No,2\n"
        ))
        .unwrap_err();
        assert!(err.to_string().contains("expected 0 or 1"));
    }

    #[test]
    fn rejects_missing_depression_value() {
        let err = parse(&format!(
            "{RAW_HEADER}\nMale,22,2,7.0,5-6 hours,Moderate,BA,No,5,1,No,\n"
        ))
        .unwrap_err();
        assert!(err.to_string().contains("missing Depression"));
    }
}
