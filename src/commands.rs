//! CLI command definitions
//!
//! Defines the clap commands for the SoftSync API tester.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full API test script against a deployment
    Run {
        /// Base URL of the deployment (without the /api prefix)
        #[arg(long)]
        base_url: Option<String>,

        /// Where to write the JSON report
        #[arg(long)]
        report: Option<PathBuf>,

        /// Don't write a JSON report
        #[arg(long, conflicts_with = "report")]
        no_report: bool,

        /// Per-request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Register with this email instead of a generated one
        #[arg(long)]
        email: Option<String>,
    },

    /// Send a single request through the executor and print the outcome
    Call {
        /// HTTP method (GET, POST, PUT, DELETE)
        method: String,

        /// Endpoint under /api/, e.g. /health or events/123
        endpoint: String,

        /// JSON payload for POST/PUT
        #[arg(long, short)]
        data: Option<String>,

        /// Bearer token to authenticate with
        #[arg(long)]
        token: Option<String>,

        /// Expected status code
        #[arg(long, default_value = "200")]
        expect: u16,

        /// Base URL of the deployment (without the /api prefix)
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Print the summary of a previously written report
    Report {
        /// Report file (default: test_reports/backend_test_results.json)
        path: Option<PathBuf>,
    },

    /// Show the effective configuration
    Config,
}
