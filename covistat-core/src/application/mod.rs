// covistat-core/src/application/mod.rs

pub mod aggregate;
pub mod clean;
pub mod ingest;
pub mod pipeline;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Cela permet au binaire de faire :
// `use covistat_core::application::{run_analysis, load_and_clean, clean_workspace};`
// sans avoir à connaître la structure interne des fichiers.

pub use aggregate::{
    AggregationResult, GROUP_KEY, PREVIEW_ARTIFACT, SUMMARIES, SummarySpec, aggregate,
    artifact_names,
};
pub use clean::clean_workspace;
pub use ingest::load_and_clean;
pub use pipeline::{AnalysisRun, run_analysis};
