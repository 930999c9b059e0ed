//! CLI command handling
//!
//! Dispatches CLI commands to the test suite and formats output. Each
//! handler returns whether the command succeeded, which `main` turns into
//! the process exit code.

use chrono::{DateTime, Local};
use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;

use crate::client::{ApiCall, ApiClient};
use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::{paths, Result};
use crate::testing::{self, Report, SuiteOptions, TestAccount};

/// Flags of the `run` command that override the config file
#[derive(Debug, Default)]
pub struct RunOverrides {
    pub base_url: Option<String>,
    pub report: Option<PathBuf>,
    pub no_report: bool,
    pub timeout: Option<u64>,
    pub email: Option<String>,
}

/// Dispatch a CLI command
pub async fn dispatch(command: Commands) -> Result<bool> {
    match command {
        Commands::Run {
            base_url,
            report,
            no_report,
            timeout,
            email,
        } => {
            let config = Config::load()?;
            let overrides = RunOverrides {
                base_url,
                report,
                no_report,
                timeout,
                email,
            };
            let options = suite_options(&config, overrides, &Local::now());

            tracing::debug!(?options, "Resolved run options");

            let outcome = testing::run_suite(options).await?;
            Ok(outcome.passed())
        }

        Commands::Call {
            method,
            endpoint,
            data,
            token,
            expect,
            base_url,
        } => {
            let config = Config::load()?;
            let base_url = base_url.unwrap_or(config.target.base_url);

            let mut call = match ApiCall::parse(&method, endpoint) {
                Ok(call) => call.expect_status(expect),
                Err(failure) => {
                    println!("{} {}", "✗".red(), failure);
                    return Ok(false);
                }
            };
            if let Some(data) = data {
                call = call.with_payload(serde_json::from_str(&data)?);
            }
            if token.is_some() {
                call = call.authed();
            }

            let client = ApiClient::new(&base_url, Duration::from_secs(config.timeouts.request_secs))?;
            println!("{} {}", call.method, client.url_for(&call.endpoint).dimmed());

            match client.execute(&call, token.as_deref()).await {
                Ok(response) => {
                    println!("{} {}", "✓".green(), response.status);
                    println!("{}", serde_json::to_string_pretty(&response.body)?);
                    Ok(true)
                }
                Err(failure) => {
                    println!("{} {}", "✗".red(), failure);
                    Ok(false)
                }
            }
        }

        Commands::Report { path } => {
            let path = path.unwrap_or_else(paths::default_report_path);
            let report = Report::load(&path)?;

            println!("Report: {}", path.display());
            println!("Timestamp: {}", report.timestamp);

            let summary = report.summary();
            summary.print();
            Ok(summary.all_passed())
        }

        Commands::Config => {
            let config = Config::load()?;

            match paths::config_path() {
                Some(path) if path.exists() => println!("# {}", path.display()),
                Some(path) => println!("# {} (not found, using defaults)", path.display()),
                None => println!("# no config directory available, using defaults"),
            }
            print!("{}", config.to_toml()?);
            Ok(true)
        }
    }
}

/// Merge config file values with command-line overrides
pub fn suite_options(config: &Config, overrides: RunOverrides, now: &DateTime<Local>) -> SuiteOptions {
    let credentials = &config.credentials;
    let mut account = TestAccount::generate(now, &credentials.password, &credentials.name);
    if let Some(email) = overrides.email.or_else(|| credentials.email.clone()) {
        account.email = email;
    }

    let report_path = if overrides.no_report || (!config.report.enabled && overrides.report.is_none()) {
        None
    } else {
        Some(overrides.report.unwrap_or_else(|| config.report.path.clone()))
    };

    SuiteOptions {
        base_url: overrides
            .base_url
            .unwrap_or_else(|| config.target.base_url.clone()),
        timeout: Duration::from_secs(overrides.timeout.unwrap_or(config.timeouts.request_secs)),
        account,
        report_path,
    }
}
