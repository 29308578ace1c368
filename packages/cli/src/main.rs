#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI for the agricultural data tool.
//!
//! ```text
//! agri_data analyze --metric MAX_MIN_CROP --crop-z Rice
//! agri_data analyze --state-x Punjab --state-y Haryana --metric COMPARE_ALL --crop-type Cereals
//! agri_data status
//! agri_data schema
//! agri_data states
//! ```
//!
//! `analyze` and `status` need `CROP_API_KEY` and `RAIN_API_KEY` in the
//! environment. Set `RUST_LOG=debug` to see fetch progress.

use agri_data_analytics::{facade, status};
use agri_data_analytics_models::{ToolInput, demo, tool_definition};
use agri_data_reference::ReferenceTables;
use agri_data_source::DataGovSource;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "agri_data",
    about = "Analyze Indian crop production and rainfall from data.gov.in"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one analysis and print the JSON result
    Analyze {
        /// First state
        #[arg(long, default_value = demo::STATE_X)]
        state_x: String,
        /// Second state
        #[arg(long, default_value = demo::STATE_Y)]
        state_y: String,
        /// Number of trailing years to analyze
        #[arg(long, default_value_t = demo::YEARS)]
        years: u32,
        /// `COMPARE_ALL`, `MAX_MIN_CROP` or `POLICY_ADVICE`
        #[arg(long)]
        metric: String,
        /// Crop category (required by `COMPARE_ALL`)
        #[arg(long)]
        crop_type: Option<String>,
        /// Crop name (required by `MAX_MIN_CROP`)
        #[arg(long)]
        crop_z: Option<String>,
    },
    /// Check that both upstream resources answer the demo queries
    Status,
    /// Print the tool definition as JSON schema
    Schema,
    /// List states with a rainfall subdivision mapping
    States,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    let tables = ReferenceTables::builtin();

    match cli.command {
        Commands::Analyze {
            state_x,
            state_y,
            years,
            metric,
            crop_type,
            crop_z,
        } => {
            let source = DataGovSource::from_env()?;
            let input = ToolInput {
                state_x,
                state_y,
                years,
                metric,
                crop_type,
                crop_z,
            };
            println!("{}", facade::analyze(&source, tables, input).await);
        }
        Commands::Status => {
            let source = DataGovSource::from_env()?;
            let report = status::check_api_status(&source, tables).await;

            for probe in &report.probes {
                let mark = if probe.ok { "OK  " } else { "FAIL" };
                println!("{mark} {:<14} {}", probe.metric.as_ref(), probe.detail);
            }

            if !report.all_ok() {
                std::process::exit(1);
            }
        }
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&tool_definition())?);
        }
        Commands::States => {
            let mut count = 0;
            for (state, subdivisions) in tables.mapped_states() {
                println!("{state:<24} {}", subdivisions.join(", "));
                count += 1;
            }
            log::debug!("{count} mapped states");
            println!("\n{count} state(s)");
        }
    }

    Ok(())
}
