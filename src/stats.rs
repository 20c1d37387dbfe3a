use std::collections::BTreeMap;

use crate::models::{
    CategoricalColumn, CorrelationMatrix, DepressionLevel, GroupCount, NumericColumn, SurveyRecord,
    SurveyTable, MISSING_CATEGORY,
};

/// Rows where `column` strictly exceeds `threshold`. Rows with a missing
/// value never pass. The result is always a subset of the input table.
pub fn filter_above(table: &SurveyTable, column: NumericColumn, threshold: f64) -> SurveyTable {
    let records: Vec<SurveyRecord> = table
        .records()
        .iter()
        .filter(|record| column.value(record).is_some_and(|value| value > threshold))
        .cloned()
        .collect();
    SurveyTable::new(records)
}

/// Bucket a record falls into for one categorical column. Blank and absent
/// values share the `"(missing)"` bucket; this is the only place that rule
/// lives.
pub fn category_of(record: &SurveyRecord, column: CategoricalColumn) -> String {
    column
        .value(record)
        .filter(|value| !value.is_empty())
        .unwrap_or(MISSING_CATEGORY)
        .to_string()
}

/// Value counts for one categorical column, largest bucket first. Blank
/// values count under their own bucket rather than being dropped.
pub fn count_by(table: &SurveyTable, column: CategoricalColumn) -> Vec<GroupCount> {
    let mut buckets: BTreeMap<String, usize> = BTreeMap::new();
    for record in table.records() {
        *buckets.entry(category_of(record, column)).or_insert(0) += 1;
    }

    let mut counts: Vec<GroupCount> = buckets
        .into_iter()
        .map(|(category, count)| GroupCount {
            category,
            depression: None,
            count,
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
    counts
}

/// Counts per (category, depression level) pair. Every row lands in exactly
/// one bucket, so the counts sum to the table's row count.
pub fn count_by_depression(table: &SurveyTable, column: CategoricalColumn) -> Vec<GroupCount> {
    let mut buckets: BTreeMap<(String, DepressionLevel), usize> = BTreeMap::new();
    for record in table.records() {
        let key = (category_of(record, column), record.depression);
        *buckets.entry(key).or_insert(0) += 1;
    }

    buckets
        .into_iter()
        .map(|((category, depression), count)| GroupCount {
            category,
            depression: Some(depression),
            count,
        })
        .collect()
}

/// Pearson correlation matrix over all numeric columns, computed after
/// dropping every row with a missing numeric value. A zero-variance column
/// yields NaN off the diagonal, matching the usual dataframe behavior.
pub fn correlation_matrix(table: &SurveyTable) -> CorrelationMatrix {
    let complete_rows: Vec<Vec<f64>> = table
        .records()
        .iter()
        .filter_map(|record| {
            NumericColumn::ALL
                .iter()
                .map(|column| column.value(record))
                .collect::<Option<Vec<f64>>>()
        })
        .collect();

    let columns: Vec<&'static str> = NumericColumn::ALL.iter().map(|c| c.name()).collect();
    let n = columns.len();
    let mut values = vec![vec![f64::NAN; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let r = if i == j {
                1.0
            } else {
                let xs: Vec<f64> = complete_rows.iter().map(|row| row[i]).collect();
                let ys: Vec<f64> = complete_rows.iter().map(|row| row[j]).collect();
                pearson(&xs, &ys)
            };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    let annotations = values
        .iter()
        .map(|row| row.iter().map(|v| format!("{v:.2}")).collect())
        .collect();

    CorrelationMatrix {
        columns,
        values,
        annotations,
    }
}

pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    if xs.is_empty() {
        return f64::NAN;
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    cov / (var_x.sqrt() * var_y.sqrt())
}
