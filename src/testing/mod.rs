//! SoftSync API test suite
//!
//! Drives the fixed script against a deployment, prints the pass/fail
//! summary and persists a JSON report. Request failures never abort the
//! process; they become failed results.

mod report;
mod result;
mod runner;
mod session;
mod steps;

pub use report::{success_rate, Report, Summary};
pub use result::{ResultLog, TestResult};
pub use runner::{ApiTester, RunOutcome};
pub use session::{Session, TestAccount};
pub use steps::*;

use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use colored::Colorize;

use crate::client::ApiClient;
use crate::common::{Error, Result};

/// Everything a run needs, resolved from config and CLI flags
#[derive(Debug, Clone)]
pub struct SuiteOptions {
    pub base_url: String,
    pub timeout: Duration,
    pub account: TestAccount,
    /// Where to write the JSON report; `None` skips it
    pub report_path: Option<PathBuf>,
}

/// Result of a suite run
#[derive(Debug)]
pub struct SuiteOutcome {
    pub outcome: RunOutcome,
    pub summary: Summary,
    pub report_path: Option<PathBuf>,
}

impl SuiteOutcome {
    /// True only when the script completed and every test passed
    pub fn passed(&self) -> bool {
        self.outcome.is_completed() && self.summary.all_passed()
    }
}

/// Run the suite against a live deployment
pub async fn run_suite(options: SuiteOptions) -> Result<SuiteOutcome> {
    let client = ApiClient::new(&options.base_url, options.timeout)?;
    run_with_client(client, options.account, options.report_path).await
}

/// Run the suite with a prepared client
///
/// Ctrl-C aborts the run with [`Error::Interrupted`]; no report is written.
pub async fn run_with_client(
    client: ApiClient,
    account: TestAccount,
    report_path: Option<PathBuf>,
) -> Result<SuiteOutcome> {
    let mut tester = ApiTester::new(client, Session::start(account), ResultLog::new());

    let outcome = interruptible(tester.run_all(), tokio::signal::ctrl_c()).await?;

    let summary = Summary::from_log(tester.log());
    summary.print();

    if let Some(path) = &report_path {
        Report::now(tester.into_results()).write(path)?;
        println!("\n{} {}", "Report saved to:".dimmed(), path.display());
    }

    Ok(SuiteOutcome {
        outcome,
        summary,
        report_path,
    })
}

/// Race `run` against `signal`
///
/// Only a delivered signal interrupts. If the handler cannot be installed
/// the run continues uninterruptible.
async fn interruptible<F, S>(run: F, signal: S) -> Result<F::Output>
where
    F: Future,
    S: Future<Output = io::Result<()>>,
{
    tokio::pin!(run);
    tokio::select! {
        output = &mut run => return Ok(output),
        signal = signal => match signal {
            Ok(()) => return Err(Error::Interrupted),
            Err(e) => tracing::warn!(error = %e, "Ctrl-C handler unavailable, run cannot be interrupted"),
        },
    }
    Ok(run.await)
}
