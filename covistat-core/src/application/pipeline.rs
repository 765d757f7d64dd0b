// covistat-core/src/application/pipeline.rs

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::info;

use crate::application::aggregate::{
    AggregationResult, PREVIEW_ARTIFACT, SUMMARIES, aggregate,
};
use crate::application::ingest::load_and_clean;
use crate::domain::error::AggregationError;
use crate::error::CovistatError;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::csv::{summary_to_csv, table_to_csv};
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs;

/// Outcome of one analysis run: the in-memory result plus the artifact
/// paths it was persisted to.
pub struct AnalysisRun {
    pub result: AggregationResult,
    pub artifacts: Vec<PathBuf>,
    pub rows_clean: usize,
    pub completed_at: String,
}

/// One synchronous unit of work: ingest -> clean -> aggregate -> persist.
///
/// Stateless between runs; a successful run replaces the previous artifact
/// set, a failed load leaves it untouched (nothing is written before the
/// aggregation has fully succeeded).
pub fn run_analysis(config: &AppConfig, csv_path: &Path) -> Result<AnalysisRun, CovistatError> {
    let start = Instant::now();
    info!(input = ?csv_path, "Starting analysis run");

    // 1. INGEST & CLEAN
    let clean = load_and_clean(csv_path)?;

    // 2. AGGREGATE (pure, pas encore d'effet de bord)
    let result = aggregate(&clean, config.preview_rows)?;

    // 3. PERSIST (stage tout, puis commit)
    config.bootstrap_dirs()?;
    let artifacts = write_artifacts(config, &result)?;

    let countries = result.summaries.first().map_or(0, |s| s.rows.len());
    info!(
        rows = clean.len(),
        countries,
        elapsed = ?start.elapsed(),
        "Analysis run finished"
    );

    Ok(AnalysisRun {
        result,
        artifacts,
        rows_clean: clean.len(),
        completed_at: chrono::Utc::now().to_rfc3339(),
    })
}

/// Serialize and persist the six artifacts as a group: every file is
/// staged as a temp file first, the renames only start once all six are
/// fully written.
fn write_artifacts(
    config: &AppConfig,
    result: &AggregationResult,
) -> Result<Vec<PathBuf>, CovistatError> {
    let mut staged = Vec::with_capacity(SUMMARIES.len() + 1);

    for (spec, summary) in SUMMARIES.iter().zip(&result.summaries) {
        let bytes = summary_to_csv(summary).map_err(|e| write_error(spec.artifact, e))?;
        let write = fs::stage(config.artifact_path(spec.artifact), bytes)
            .map_err(|e| write_error(spec.artifact, e))?;
        staged.push(write);
    }

    let bytes = table_to_csv(&result.preview).map_err(|e| write_error(PREVIEW_ARTIFACT, e))?;
    let write = fs::stage(config.artifact_path(PREVIEW_ARTIFACT), bytes)
        .map_err(|e| write_error(PREVIEW_ARTIFACT, e))?;
    staged.push(write);

    let paths: Vec<PathBuf> = staged.iter().map(|w| w.target().to_path_buf()).collect();
    fs::commit_all(staged).map_err(|e| write_error("artifact set", e))?;

    Ok(paths)
}

fn write_error(artifact: &str, err: InfrastructureError) -> CovistatError {
    let source = match err {
        InfrastructureError::Io(io_err) => io_err,
        other => std::io::Error::other(other.to_string()),
    };
    AggregationError::ArtifactWrite {
        artifact: artifact.to_string(),
        source,
    }
    .into()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::aggregate::artifact_names;
    use anyhow::Result;
    use std::collections::BTreeMap;
    use std::fs as stdfs;
    use tempfile::tempdir;

    const SAMPLE: &str = "country,new_cases,new_deaths,vaccinated\n\
                          US,100,1,50\n\
                          US,200,2,60\n\
                          FR,,3,10\n";

    fn test_config(root: &Path) -> AppConfig {
        crate::infrastructure::config::load_config(root).unwrap()
    }

    fn read_artifacts(config: &AppConfig) -> BTreeMap<String, String> {
        artifact_names()
            .map(|name| {
                let content = stdfs::read_to_string(config.artifact_path(name)).unwrap();
                (name.to_string(), content)
            })
            .collect()
    }

    #[test]
    fn test_run_writes_the_canonical_scenario() -> Result<()> {
        let dir = tempdir()?;
        let config = test_config(dir.path());
        let input = dir.path().join("covid.csv");
        stdfs::write(&input, SAMPLE)?;

        let run = run_analysis(&config, &input)?;
        assert_eq!(run.rows_clean, 2);
        assert_eq!(run.artifacts.len(), 6);
        assert!(chrono::DateTime::parse_from_rfc3339(&run.completed_at).is_ok());

        let artifacts = read_artifacts(&config);
        assert_eq!(artifacts["total_cases.csv"], "country,total_cases\nUS,300\n");
        assert_eq!(
            artifacts["average_cases.csv"],
            "country,avg_daily_cases\nUS,150.0\n"
        );
        assert_eq!(
            artifacts["max_cases.csv"],
            "country,max_daily_cases\nUS,200\n"
        );
        assert_eq!(
            artifacts["total_vaccinated.csv"],
            "country,total_vaccinated\nUS,110\n"
        );
        // FR had a gap and must not appear anywhere
        assert!(artifacts.values().all(|content| !content.contains("FR")));
        Ok(())
    }

    #[test]
    fn test_two_runs_are_byte_identical() -> Result<()> {
        let dir = tempdir()?;
        let config = test_config(dir.path());
        let input = dir.path().join("covid.csv");
        stdfs::write(&input, SAMPLE)?;

        run_analysis(&config, &input)?;
        let first = read_artifacts(&config);
        run_analysis(&config, &input)?;
        let second = read_artifacts(&config);

        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_failed_load_leaves_prior_artifacts_untouched() -> Result<()> {
        let dir = tempdir()?;
        let config = test_config(dir.path());
        let input = dir.path().join("covid.csv");
        stdfs::write(&input, SAMPLE)?;
        run_analysis(&config, &input)?;
        let before = read_artifacts(&config);

        let err = run_analysis(&config, &dir.path().join("missing.csv"));
        assert!(err.is_err());

        assert_eq!(before, read_artifacts(&config));
        Ok(())
    }

    #[test]
    fn test_empty_clean_table_writes_header_only_artifacts() -> Result<()> {
        let dir = tempdir()?;
        let config = test_config(dir.path());
        let input = dir.path().join("gaps.csv");
        stdfs::write(
            &input,
            "country,new_cases,new_deaths,vaccinated\nUS,,1,2\n",
        )?;

        let run = run_analysis(&config, &input)?;
        assert_eq!(run.rows_clean, 0);

        let artifacts = read_artifacts(&config);
        assert_eq!(artifacts["total_cases.csv"], "country,total_cases\n");
        assert_eq!(
            artifacts["raw_data_preview.csv"],
            "country,new_cases,new_deaths,vaccinated\n"
        );
        Ok(())
    }

    #[test]
    fn test_preview_keeps_first_twenty_rows_in_order() -> Result<()> {
        let dir = tempdir()?;
        let config = test_config(dir.path());
        let input = dir.path().join("long.csv");

        let mut content = String::from("country,new_cases,new_deaths,vaccinated\n");
        for i in 0..30 {
            content.push_str(&format!("US,{i},0,0\n"));
        }
        stdfs::write(&input, &content)?;

        run_analysis(&config, &input)?;

        let preview = stdfs::read_to_string(config.artifact_path(PREVIEW_ARTIFACT))?;
        let lines: Vec<&str> = preview.lines().collect();
        assert_eq!(lines.len(), 21); // header + 20 rows
        assert_eq!(lines[1], "US,0,0,0");
        assert_eq!(lines[20], "US,19,0,0");
        Ok(())
    }
}
