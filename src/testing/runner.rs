//! Orchestrates the fixed test script
//!
//! The first five steps gate the run: authentication and onboarding must
//! work before anything else is meaningful. The remaining steps are
//! best-effort and always run in order.

use colored::Colorize;

use crate::client::ApiClient;

use super::result::{ResultLog, TestResult};
use super::session::Session;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every gating step passed and the whole script ran
    Completed,
    /// A gating step failed; nothing after it was executed
    Halted { step: &'static str },
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed)
    }
}

/// Runner owning the client, the session and the result log for one run
pub struct ApiTester {
    pub(crate) client: ApiClient,
    pub(crate) session: Session,
    pub(crate) log: ResultLog,
}

impl ApiTester {
    pub fn new(client: ApiClient, session: Session, log: ResultLog) -> Self {
        Self {
            client,
            session,
            log,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn log(&self) -> &ResultLog {
        &self.log
    }

    pub fn into_results(self) -> Vec<TestResult> {
        self.log.into_results()
    }

    /// Run the whole script
    pub async fn run_all(&mut self) -> RunOutcome {
        if !self.log.is_quiet() {
            println!("{}", "🚀 Starting SoftSync API Tests...".bold());
            println!("📡 Testing against: {}", self.client.base_url().cyan());
            println!("{}", "=".repeat(60));
        }
        tracing::info!(base_url = self.client.base_url(), "Starting test run");

        if !self.test_health_check().await {
            return self.halt("Health check");
        }

        if !self.test_user_registration().await {
            return self.halt("Registration");
        }

        if !self.test_user_login().await {
            return self.halt("Login");
        }

        if !self.test_get_user_profile().await {
            return self.halt("Get profile");
        }

        // Onboarding
        if !self.test_update_profile().await {
            return self.halt("Profile update");
        }

        // Events
        self.test_create_event().await;
        self.test_get_events().await;
        self.test_natural_language_parsing().await;
        self.test_delete_event().await;

        // Cycle tracking
        self.test_cycle_tracking_create().await;
        self.test_get_cycles().await;
        self.test_cycle_prediction().await;

        self.test_notifications().await;

        self.test_logout().await;

        tracing::info!(
            run = self.log.tests_run(),
            passed = self.log.tests_passed(),
            "Test run completed"
        );
        RunOutcome::Completed
    }

    fn halt(&self, step: &'static str) -> RunOutcome {
        if !self.log.is_quiet() {
            println!("{}", format!("❌ {step} failed - stopping tests").red());
        }
        tracing::warn!(step, "Gating step failed, halting run");
        RunOutcome::Halted { step }
    }
}
