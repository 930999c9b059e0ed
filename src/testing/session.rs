//! Session state carried between test steps

use chrono::{DateTime, Local, NaiveDate, TimeZone};

/// Credentials for the throwaway account a run registers
#[derive(Debug, Clone)]
pub struct TestAccount {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl TestAccount {
    /// Account with an email unique to the second of the day, e.g. `test_142501@example.com`
    pub fn generate<Tz: TimeZone>(now: &DateTime<Tz>, password: &str, name: &str) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            email: format!("test_{}@example.com", now.format("%H%M%S")),
            password: password.to_string(),
            name: name.to_string(),
        }
    }
}

/// Values produced by earlier steps and consumed by later ones
#[derive(Debug, Clone)]
pub struct Session {
    pub account: TestAccount,
    /// Date payloads are computed against (tomorrow's event, last week's cycle)
    pub today: NaiveDate,
    pub token: Option<String>,
    pub user_id: Option<String>,
    pub event_id: Option<String>,
    pub cycle_id: Option<String>,
}

impl Session {
    pub fn new(account: TestAccount, today: NaiveDate) -> Self {
        Self {
            account,
            today,
            token: None,
            user_id: None,
            event_id: None,
            cycle_id: None,
        }
    }

    /// Session for a run starting now
    pub fn start(account: TestAccount) -> Self {
        Self::new(account, Local::now().date_naive())
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}
