//! The fixed scenario steps, one per endpoint
//!
//! Each step sends its request, validates the body, stashes whatever later
//! steps need in the session, and records exactly one result.

use chrono::Duration;
use serde_json::{json, Value};

use crate::client::{render_body, ApiCall, Method, RequestOutcome};

use super::runner::ApiTester;
use super::session::Session;

pub const HEALTH_CHECK: &str = "Health Check";
pub const USER_REGISTRATION: &str = "User Registration";
pub const USER_LOGIN: &str = "User Login";
pub const GET_USER_PROFILE: &str = "Get User Profile";
pub const UPDATE_PROFILE: &str = "Update Profile";
pub const CREATE_EVENT: &str = "Create Event";
pub const GET_EVENTS: &str = "Get Events";
pub const NATURAL_LANGUAGE_PARSING: &str = "Natural Language Parsing";
pub const DELETE_EVENT: &str = "Delete Event";
pub const CREATE_CYCLE: &str = "Create Cycle Data";
pub const GET_CYCLES: &str = "Get Cycle History";
pub const CYCLE_PREDICTION: &str = "Cycle Prediction";
pub const GET_NOTIFICATIONS: &str = "Get Notifications";
pub const USER_LOGOUT: &str = "User Logout";

/// Detail recorded when deletion runs without a created event
pub const NO_EVENT_ID: &str = "No event ID available";

const EVENT_TITLE: &str = "Test Event";
const PROFILE_COUNTRY: &str = "MX";
const PROFILE_TIMEZONE: &str = "America/Mexico_City";
const PROFILE_GENDER: &str = "female";

/// JSON truthiness: non-empty strings and containers, non-zero numbers, `true`
pub(crate) fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
    }
}

/// Identifier-like field as a string, if present and truthy
pub(crate) fn id_field(body: &Value, key: &str) -> Option<String> {
    let value = body.get(key);
    if !truthy(value) {
        return None;
    }
    match value? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn str_field_is(body: &Value, key: &str, expected: &str) -> bool {
    body.get(key).and_then(Value::as_str) == Some(expected)
}

fn non_empty_array(body: &Value) -> bool {
    body.as_array().is_some_and(|items| !items.is_empty())
}

fn iso_date(session: &Session, offset_days: i64) -> String {
    (session.today + Duration::days(offset_days))
        .format("%Y-%m-%d")
        .to_string()
}

impl ApiTester {
    async fn send(&self, call: ApiCall) -> RequestOutcome {
        self.client.execute(&call, self.session.token()).await
    }

    /// Validate a response and record the step
    ///
    /// Status failures record the executor's detail; validation failures
    /// record the response body as the detail.
    fn conclude<F>(&mut self, name: &str, outcome: RequestOutcome, check: F) -> bool
    where
        F: FnOnce(&Value, &mut Session) -> bool,
    {
        match outcome {
            Ok(response) => {
                let success = check(&response.body, &mut self.session);
                let details = if success {
                    String::new()
                } else {
                    tracing::debug!(test = name, "Response failed validation");
                    render_body(&response.body)
                };
                self.log.record(name, success, details, Some(response.body));
                success
            }
            Err(failure) => {
                let detail = failure.detail();
                self.log
                    .record(name, false, detail.clone(), Some(Value::String(detail)));
                false
            }
        }
    }

    pub async fn test_health_check(&mut self) -> bool {
        let outcome = self.send(ApiCall::get("/health")).await;
        self.conclude(HEALTH_CHECK, outcome, |_, _| true)
    }

    pub async fn test_user_registration(&mut self) -> bool {
        let account = &self.session.account;
        let payload = json!({
            "email": account.email,
            "password": account.password,
            "name": account.name,
        });

        let outcome = self.send(ApiCall::post("/auth/register", payload)).await;
        self.conclude(USER_REGISTRATION, outcome, |body, session| {
            if !body.is_object() {
                return false;
            }
            session.token = id_field(body, "token");
            session.user_id = id_field(body, "user_id");
            session.token.is_some() && session.user_id.is_some()
        })
    }

    pub async fn test_user_login(&mut self) -> bool {
        let account = &self.session.account;
        let payload = json!({
            "email": account.email,
            "password": account.password,
        });

        let outcome = self.send(ApiCall::post("/auth/login", payload)).await;
        self.conclude(USER_LOGIN, outcome, |body, session| {
            if !body.is_object() {
                return false;
            }
            if let Some(token) = id_field(body, "token") {
                session.token = Some(token);
            }
            session.is_authenticated()
        })
    }

    pub async fn test_get_user_profile(&mut self) -> bool {
        let outcome = self.send(ApiCall::get("/auth/me").authed()).await;
        self.conclude(GET_USER_PROFILE, outcome, |body, session| {
            str_field_is(body, "email", &session.account.email)
        })
    }

    pub async fn test_update_profile(&mut self) -> bool {
        let payload = json!({
            "country": PROFILE_COUNTRY,
            "timezone": PROFILE_TIMEZONE,
            "gender": PROFILE_GENDER,
        });

        let outcome = self.send(ApiCall::put("/auth/profile", payload).authed()).await;
        self.conclude(UPDATE_PROFILE, outcome, |body, _| {
            str_field_is(body, "country", PROFILE_COUNTRY)
                && str_field_is(body, "timezone", PROFILE_TIMEZONE)
                && str_field_is(body, "gender", PROFILE_GENDER)
                && body.get("onboarding_complete") == Some(&Value::Bool(true))
        })
    }

    pub async fn test_create_event(&mut self) -> bool {
        let payload = json!({
            "title": EVENT_TITLE,
            "description": "Test event description",
            "date": iso_date(&self.session, 1),
            "time": "15:30",
            "notify": true,
            "notify_minutes_before": 5,
        });

        let outcome = self.send(ApiCall::post("/events", payload).authed()).await;
        self.conclude(CREATE_EVENT, outcome, |body, session| {
            let Some(id) = id_field(body, "event_id") else {
                return false;
            };
            session.event_id = Some(id);
            str_field_is(body, "title", EVENT_TITLE)
        })
    }

    pub async fn test_get_events(&mut self) -> bool {
        let outcome = self.send(ApiCall::get("/events").authed()).await;
        self.conclude(GET_EVENTS, outcome, |body, _| non_empty_array(body))
    }

    pub async fn test_natural_language_parsing(&mut self) -> bool {
        let payload = json!({
            "text": "Reunión de trabajo mañana a las 2 de la tarde",
            "user_timezone": PROFILE_TIMEZONE,
            "user_country": PROFILE_COUNTRY,
        });

        let outcome = self.send(ApiCall::post("/events/parse", payload).authed()).await;
        self.conclude(NATURAL_LANGUAGE_PARSING, outcome, |body, _| {
            ["title", "date", "time"]
                .iter()
                .all(|key| truthy(body.get(*key)))
        })
    }

    pub async fn test_delete_event(&mut self) -> bool {
        let Some(event_id) = self.session.event_id.clone() else {
            self.log.record(DELETE_EVENT, false, NO_EVENT_ID, None);
            return false;
        };

        let outcome = self
            .send(ApiCall::delete(format!("/events/{event_id}")).authed())
            .await;
        self.conclude(DELETE_EVENT, outcome, |_, _| true)
    }

    pub async fn test_cycle_tracking_create(&mut self) -> bool {
        let payload = json!({
            "start_date": iso_date(&self.session, -7),
            "cycle_length": 28,
            "period_length": 5,
            "notes": "Test cycle data",
        });

        let outcome = self.send(ApiCall::post("/cycle", payload).authed()).await;
        self.conclude(CREATE_CYCLE, outcome, |body, session| {
            session.cycle_id = id_field(body, "cycle_id");
            session.cycle_id.is_some()
        })
    }

    pub async fn test_get_cycles(&mut self) -> bool {
        let outcome = self.send(ApiCall::get("/cycle").authed()).await;
        self.conclude(GET_CYCLES, outcome, |body, _| non_empty_array(body))
    }

    pub async fn test_cycle_prediction(&mut self) -> bool {
        let outcome = self.send(ApiCall::get("/cycle/prediction").authed()).await;
        self.conclude(CYCLE_PREDICTION, outcome, |body, _| {
            let avg = body.get("avg_cycle_length");
            (avg.is_some_and(Value::is_number) && truthy(avg)) || truthy(body.get("message"))
        })
    }

    pub async fn test_notifications(&mut self) -> bool {
        let outcome = self
            .send(ApiCall::get("/notifications/upcoming").authed())
            .await;
        // An empty list is fine
        self.conclude(GET_NOTIFICATIONS, outcome, |body, _| body.is_array())
    }

    pub async fn test_logout(&mut self) -> bool {
        let outcome = self
            .send(ApiCall::new(Method::Post, "/auth/logout").authed())
            .await;
        self.conclude(USER_LOGOUT, outcome, |_, _| true)
    }
}
