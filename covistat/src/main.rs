// covistat/src/main.rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// Application (Use Cases)
use covistat_core::application::{AnalysisRun, clean_workspace, run_analysis};
// Infrastructure (Config)
use covistat_core::infrastructure::config::load_config;

mod error;
mod handlers;
mod render;
mod state;

use state::AppState;

#[derive(Parser)]
#[command(name = "covistat")]
#[command(about = "COVID-19 dataset analysis dashboard", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 🌐 Starts the upload & dashboard HTTP server
    Serve {
        /// Project directory (config, uploads/ and output/ live here)
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value = "8080", env = "COVISTAT_PORT")]
        port: u16,
    },

    /// 🚀 Runs the analysis pipeline once on a local CSV file
    Analyze {
        /// Dataset to analyze
        #[arg(long, short)]
        file: PathBuf,

        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🧹 Cleans generated artifacts (output/ and uploads/ folders)
    Clean {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Setup Logging (Tracing)
    // RUST_LOG=debug covistat serve ... pour voir les détails
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("covistat=info,covistat_core=info,warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        // --- USE CASE: SERVE DASHBOARD ---
        Commands::Serve {
            project_dir,
            host,
            port,
        } => {
            println!("⚙️  Loading configuration...");
            let config = load_config(&project_dir)?;
            config.bootstrap_dirs()?;

            let state = Arc::new(AppState::new(config)?);
            let router = handlers::build_router(state.clone());

            let bind_addr = format!("{host}:{port}");
            tracing::info!(
                bind_addr = %bind_addr,
                upload_dir = %state.config.upload_dir.display(),
                output_dir = %state.config.output_dir.display(),
                "Dashboard server starting"
            );

            let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
            println!("🌐 Covistat listening on http://{bind_addr}");
            axum::serve(listener, router).await?;
        }

        // --- USE CASE: ONE-SHOT ANALYSIS ---
        Commands::Analyze { file, project_dir } => {
            let start = std::time::Instant::now();

            println!("⚙️  Loading configuration...");
            let config = load_config(&project_dir)?;

            match run_analysis(&config, &file) {
                Ok(run) => {
                    print_summaries(&run);
                    println!(
                        "\n✨ SUCCESS! Analysis finished in {:.2?} ({} rows kept, {} artifacts)",
                        start.elapsed(),
                        run.rows_clean,
                        run.artifacts.len()
                    );
                }
                Err(e) => {
                    eprintln!("\n💥 CRITICAL PIPELINE ERROR: {e}");
                    // Exit with error code for CI/CD
                    std::process::exit(1);
                }
            }
        }

        // --- USE CASE: CLEAN ---
        Commands::Clean { project_dir } => {
            let config = load_config(&project_dir)?;
            if let Err(e) = clean_workspace(&config) {
                eprintln!("❌ Clean failed: {e}");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Print the five summaries on the terminal, one table each.
fn print_summaries(run: &AnalysisRun) {
    for summary in &run.result.summaries {
        let mut table = comfy_table::Table::new();
        table.set_header([summary.key_name.as_str(), summary.metric_name.as_str()]);
        for (group, value) in &summary.rows {
            table.add_row([group.clone(), value.render()]);
        }
        println!("\n{table}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};

    #[test]
    fn test_cli_parse_serve_defaults() -> Result<()> {
        let args = Cli::parse_from(["covistat", "serve"]);
        match args.command {
            Commands::Serve {
                project_dir,
                host,
                port,
            } => {
                assert_eq!(project_dir.to_string_lossy(), ".");
                assert_eq!(host, "127.0.0.1");
                assert_eq!(port, 8080);
                Ok(())
            }
            _ => bail!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_parse_analyze() -> Result<()> {
        let args = Cli::parse_from([
            "covistat",
            "analyze",
            "--file",
            "covid.csv",
            "--project-dir",
            "/tmp",
        ]);
        match args.command {
            Commands::Analyze { file, project_dir } => {
                assert_eq!(file.to_string_lossy(), "covid.csv");
                assert_eq!(project_dir.to_string_lossy(), "/tmp");
                Ok(())
            }
            _ => bail!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_cli_parse_clean() -> Result<()> {
        let args = Cli::parse_from(["covistat", "clean"]);
        match args.command {
            Commands::Clean { project_dir } => {
                assert_eq!(project_dir.to_string_lossy(), ".");
                Ok(())
            }
            _ => bail!("Expected Clean command"),
        }
    }
}
