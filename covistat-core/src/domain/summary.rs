// covistat-core/src/domain/summary.rs

// Agrégation groupée en mémoire : une map clé -> accumulateur (somme,
// compteur, max). Pas de moteur SQL ici, l'espace de clés est petit.

use std::collections::BTreeMap;

use crate::domain::error::AggregationError;
use crate::domain::table::{ColumnType, Table};

/// Aggregation function applied to a measure column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Sum,
    Mean,
    Max,
}

/// One aggregated value. Sum/Max over an integer column stay integral,
/// Mean is always a float.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Int(i64),
    Float(f64),
}

impl MetricValue {
    pub fn as_f64(&self) -> f64 {
        match self {
            MetricValue::Int(v) => *v as f64,
            MetricValue::Float(v) => *v,
        }
    }

    pub fn render(&self) -> String {
        match self {
            MetricValue::Int(v) => v.to_string(),
            // Trailing `.0` kept for integral floats (same shape as the
            // dataframe CSV exports this replaces).
            MetricValue::Float(v) => format!("{v:?}"),
        }
    }
}

/// One summary table: the grouping key column plus one metric column.
/// Rows are emitted in ascending key order, which makes artifact bytes
/// deterministic across runs.
#[derive(Debug, Clone)]
pub struct GroupSummary {
    pub key_name: String,
    pub metric_name: String,
    pub rows: Vec<(String, MetricValue)>,
}

#[derive(Debug, Clone, Copy)]
struct GroupStats {
    sum: f64,
    count: u64,
    max: f64,
}

/// Group `table` by the distinct values of `key` and aggregate `measure`.
///
/// An empty table yields an empty summary without touching the schema; a
/// non-empty table missing the key or measure column, or carrying a text
/// measure, is a typed failure.
pub fn grouped_aggregate(
    table: &Table,
    key: &str,
    measure: &str,
    agg: Aggregation,
    metric_name: &str,
) -> Result<GroupSummary, AggregationError> {
    if table.is_empty() {
        return Ok(GroupSummary {
            key_name: key.to_string(),
            metric_name: metric_name.to_string(),
            rows: Vec::new(),
        });
    }

    let key_idx = table
        .column_index(key)
        .ok_or_else(|| AggregationError::ColumnNotFound(key.to_string()))?;
    let measure_idx = table
        .column_index(measure)
        .ok_or_else(|| AggregationError::ColumnNotFound(measure.to_string()))?;

    let measure_type = table.dtype(measure_idx).unwrap_or(ColumnType::Text);
    if measure_type == ColumnType::Text {
        return Err(AggregationError::NonNumericMeasure(measure.to_string()));
    }

    let mut groups: BTreeMap<String, GroupStats> = BTreeMap::new();

    for row in table.rows() {
        let group = row[key_idx].render();
        // The clean table has no nulls left; a non-numeric cell cannot
        // appear in a numeric column either.
        let Some(value) = row[measure_idx].as_f64() else {
            continue;
        };

        groups
            .entry(group)
            .and_modify(|stats| {
                stats.sum += value;
                stats.count += 1;
                stats.max = stats.max.max(value);
            })
            .or_insert(GroupStats {
                sum: value,
                count: 1,
                max: value,
            });
    }

    let integral = measure_type == ColumnType::Int;
    let rows = groups
        .into_iter()
        .map(|(group, stats)| {
            let value = match agg {
                Aggregation::Sum if integral => MetricValue::Int(stats.sum as i64),
                Aggregation::Sum => MetricValue::Float(stats.sum),
                Aggregation::Max if integral => MetricValue::Int(stats.max as i64),
                Aggregation::Max => MetricValue::Float(stats.max),
                Aggregation::Mean => MetricValue::Float(stats.sum / stats.count as f64),
            };
            (group, value)
        })
        .collect();

    Ok(GroupSummary {
        key_name: key.to_string(),
        metric_name: metric_name.to_string(),
        rows,
    })
}
