//! Per-step results and the logger that tallies them

use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of one test step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    #[serde(rename = "test")]
    pub name: String,
    pub success: bool,
    pub details: String,
    pub response_data: Value,
}

/// Ordered record of every step, with running counters
#[derive(Debug, Default)]
pub struct ResultLog {
    results: Vec<TestResult>,
    tests_run: usize,
    tests_passed: usize,
    quiet: bool,
}

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logger that records without printing
    pub fn quiet() -> Self {
        Self {
            quiet: true,
            ..Self::default()
        }
    }

    /// Record one step's outcome and print its pass/fail line
    pub fn record(&mut self, name: &str, success: bool, details: impl Into<String>, response: Option<Value>) {
        let details = details.into();

        self.tests_run += 1;
        if success {
            self.tests_passed += 1;
            tracing::info!(test = name, "passed");
        } else {
            tracing::info!(test = name, details = %details, "failed");
        }

        if !self.quiet {
            if success {
                println!("✅ {}: {}", name, "PASSED".green());
            } else {
                println!("❌ {}: {} - {}", name, "FAILED".red(), details);
            }
        }

        self.results.push(TestResult {
            name: name.to_string(),
            success,
            details,
            response_data: response.unwrap_or(Value::Null),
        });
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn tests_run(&self) -> usize {
        self.tests_run
    }

    pub fn tests_passed(&self) -> usize {
        self.tests_passed
    }

    pub fn failures(&self) -> impl Iterator<Item = &TestResult> {
        self.results.iter().filter(|r| !r.success)
    }

    pub fn all_passed(&self) -> bool {
        self.tests_passed == self.tests_run
    }

    pub fn into_results(self) -> Vec<TestResult> {
        self.results
    }
}
