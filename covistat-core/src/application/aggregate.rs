// covistat-core/src/application/aggregate.rs

use crate::domain::error::AggregationError;
use crate::domain::summary::{Aggregation, GroupSummary, grouped_aggregate};
use crate::domain::table::Table;

/// The grouping dimension every summary is computed over.
pub const GROUP_KEY: &str = "country";

/// Artifact name of the bounded raw preview.
pub const PREVIEW_ARTIFACT: &str = "raw_data_preview.csv";

/// One published summary: which measure, which function, which artifact.
pub struct SummarySpec {
    pub artifact: &'static str,
    pub title: &'static str,
    pub metric: &'static str,
    pub measure: &'static str,
    pub agg: Aggregation,
}

/// The five summaries the dashboard publishes. Artifact and column names
/// are part of the external contract and must not drift.
pub const SUMMARIES: [SummarySpec; 5] = [
    SummarySpec {
        artifact: "total_cases.csv",
        title: "Total Cases by Country",
        metric: "total_cases",
        measure: "new_cases",
        agg: Aggregation::Sum,
    },
    SummarySpec {
        artifact: "total_deaths.csv",
        title: "Total Deaths by Country",
        metric: "total_deaths",
        measure: "new_deaths",
        agg: Aggregation::Sum,
    },
    SummarySpec {
        artifact: "average_cases.csv",
        title: "Average Daily Cases",
        metric: "avg_daily_cases",
        measure: "new_cases",
        agg: Aggregation::Mean,
    },
    SummarySpec {
        artifact: "max_cases.csv",
        title: "Peak Daily Cases",
        metric: "max_daily_cases",
        measure: "new_cases",
        agg: Aggregation::Max,
    },
    SummarySpec {
        artifact: "total_vaccinated.csv",
        title: "Total Vaccinated",
        metric: "total_vaccinated",
        measure: "vaccinated",
        agg: Aggregation::Sum,
    },
];

/// All six artifact file names, summaries first, preview last.
pub fn artifact_names() -> impl Iterator<Item = &'static str> {
    SUMMARIES
        .iter()
        .map(|spec| spec.artifact)
        .chain(std::iter::once(PREVIEW_ARTIFACT))
}

/// The five summary tables plus the bounded preview, in memory.
#[derive(Debug)]
pub struct AggregationResult {
    pub summaries: Vec<GroupSummary>,
    pub preview: Table,
}

/// Compute every published summary from a clean table.
///
/// Pure with respect to the filesystem; artifact persistence is the
/// pipeline's job. Fails as a whole if any single summary fails.
pub fn aggregate(
    table: &Table,
    preview_rows: usize,
) -> Result<AggregationResult, AggregationError> {
    let summaries = SUMMARIES
        .iter()
        .map(|spec| grouped_aggregate(table, GROUP_KEY, spec.measure, spec.agg, spec.metric))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AggregationResult {
        summaries,
        preview: table.head(preview_rows),
    })
}
