//! Client for the ÖBB ticket shop timetable API.

use chrono::Utc;
use reqwest::Client;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::{LookupError, Result};
use crate::journeys::{JourneyLookup, JourneyQuery};

mod request;
mod session;

use request::{TIMETABLE_PATH, TimetableRequest};
use session::Session;

pub const DEFAULT_API_BASE: &str = "https://tickets.oebb.at";

/// Journey lookup backed by `tickets.oebb.at`.
///
/// Holds on to its anonymous session between lookups and renews it shortly
/// before it runs out.
pub struct OebbClient {
    http: Client,
    base_url: String,
    session: Mutex<Option<Session>>,
}

impl OebbClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            http: Client::new(),
            base_url,
            session: Mutex::new(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn session(&self) -> Result<Session> {
        let mut cached = self.session.lock().await;
        if let Some(session) = cached.as_ref().filter(|s| s.is_fresh(Utc::now())) {
            return Ok(session.clone());
        }

        let session = Session::init(&self.http, &self.base_url).await?;
        *cached = Some(session.clone());
        Ok(session)
    }

    /// Fetch up to `query.results` connections departing at `query.when`.
    pub async fn timetable(
        &self,
        origin: Option<&str>,
        destination: Option<&str>,
        query: &JourneyQuery,
    ) -> Result<Value> {
        let session = self.session().await?;
        let body = TimetableRequest::new(origin, destination, &query.when, query.results);

        tracing::debug!(?origin, ?destination, "requesting timetable");

        let response = session
            .authorize(self.http.post(format!("{}{TIMETABLE_PATH}", self.base_url)))
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let mut timetable: Value = serde_json::from_slice(&response)?;
        match timetable.get_mut("connections") {
            Some(connections) => Ok(connections.take()),
            None => Err(LookupError::MissingConnections),
        }
    }
}

impl JourneyLookup for OebbClient {
    async fn journeys(
        &self,
        origin: Option<&str>,
        destination: Option<&str>,
        query: &JourneyQuery,
    ) -> Result<Value> {
        self.timetable(origin, destination, query).await
    }
}
