//! Run summary and the persisted JSON report

use chrono::{DateTime, Local, TimeZone};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::common::{Error, Result};

use super::result::{ResultLog, TestResult};

/// Fraction of passed tests, 0 when nothing ran
pub fn success_rate(passed: usize, run: usize) -> f64 {
    if run == 0 {
        0.0
    } else {
        passed as f64 / run as f64
    }
}

/// Totals and failures of a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    /// (test name, details) for every failed test, in run order
    pub failures: Vec<(String, String)>,
}

impl Summary {
    pub fn from_log(log: &ResultLog) -> Self {
        Self::build(log.tests_run(), log.tests_passed(), log.results())
    }

    /// Totals are recounted from the stored results, not trusted from the file
    pub fn from_report(report: &Report) -> Self {
        let passed = report.results.iter().filter(|r| r.success).count();
        Self::build(report.results.len(), passed, &report.results)
    }

    fn build(total: usize, passed: usize, results: &[TestResult]) -> Self {
        Self {
            total,
            passed,
            failures: results
                .iter()
                .filter(|r| !r.success)
                .map(|r| (r.name.clone(), r.details.clone()))
                .collect(),
        }
    }

    pub fn failed(&self) -> usize {
        self.total.saturating_sub(self.passed)
    }

    pub fn success_rate(&self) -> f64 {
        success_rate(self.passed, self.total)
    }

    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }

    /// Summary block as printed after a run
    pub fn render(&self) -> String {
        let rule = "=".repeat(60);
        let mut out = format!(
            "\n{rule}\n📊 TEST SUMMARY\n{rule}\nTotal Tests: {}\nPassed: {}\nFailed: {}\nSuccess Rate: {:.1}%\n",
            self.total,
            self.passed,
            self.failed(),
            self.success_rate() * 100.0
        );

        if !self.failures.is_empty() {
            out.push_str("\n❌ FAILED TESTS:\n");
            for (name, details) in &self.failures {
                out.push_str(&format!("  • {name}: {details}\n"));
            }
        }
        out
    }

    pub fn print(&self) {
        let text = self.render();
        if self.all_passed() {
            print!("{text}");
        } else {
            print!("{}", text.as_str().yellow());
        }
    }
}

/// JSON report written at the end of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub timestamp: String,
    pub total_tests: usize,
    pub passed_tests: usize,
    pub success_rate: f64,
    pub results: Vec<TestResult>,
}

impl Report {
    pub fn new<Tz: TimeZone>(results: Vec<TestResult>, timestamp: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let total_tests = results.len();
        let passed_tests = results.iter().filter(|r| r.success).count();
        Self {
            timestamp: timestamp.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            total_tests,
            passed_tests,
            success_rate: success_rate(passed_tests, total_tests),
            results,
        }
    }

    /// Report stamped with the current local time
    pub fn now(results: Vec<TestResult>) -> Self {
        Self::new(results, &Local::now())
    }

    /// Write the report as pretty JSON, creating parent directories
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| Error::report_write(path, e))?;
            }
        }

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| Error::report_write(path, e))?;
        tracing::debug!(path = %path.display(), "Report written");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn summary(&self) -> Summary {
        Summary::from_report(self)
    }
}
