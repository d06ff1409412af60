//! Anonymous sessions for the ÖBB ticket shop API.
//!
//! The timetable endpoint only answers requests carrying the tokens handed out
//! by `/api/domain/v3/init`. Any `userId` of the form `anonym-xxxxxxxx-xxxx-xx`
//! is accepted there.

use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

use crate::error::{LookupError, Result};

pub const INIT_PATH: &str = "/api/domain/v3/init";

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/74.0.3729.169 Safari/537.36";
pub const CHANNEL: &str = "inet";

/// Sessions closer than this many seconds to their expiry are renewed.
const REFRESH_MARGIN_SECS: i64 = 1000;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitResponse {
    access_token: String,
    session_id: String,
    support_id: String,
    /// seconds
    session_timeout: i64,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub session_id: String,
    pub support_id: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Request a fresh anonymous session from `base_url`.
    pub async fn init(client: &Client, base_url: &str) -> Result<Self> {
        let user_id = anonymous_user_id();
        tracing::debug!("initializing session for {user_id}");

        let body = client
            .get(format!("{base_url}{INIT_PATH}"))
            .header("Channel", CHANNEL)
            .header("User-Agent", USER_AGENT)
            .query(&[("userId", user_id.as_str())])
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let InitResponse {
            access_token,
            session_id,
            support_id,
            session_timeout,
        } = serde_json::from_slice(&body)?;

        let expires_at = TimeDelta::try_seconds(session_timeout)
            .and_then(|timeout| Utc::now().checked_add_signed(timeout))
            .ok_or(LookupError::InvalidSession(session_timeout))?;

        tracing::debug!(session_id = %session_id, session_timeout, "session established");

        Ok(Session {
            access_token,
            session_id,
            support_id,
            expires_at,
        })
    }

    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + TimeDelta::seconds(REFRESH_MARGIN_SECS) < self.expires_at
    }

    /// Attach the headers every authenticated request needs.
    pub fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Channel", CHANNEL)
            .header("User-Agent", USER_AGENT)
            .header("AccessToken", &self.access_token)
            .header("SessionId", &self.session_id)
            .header("x-ts-supportid", &self.support_id)
    }
}

pub fn anonymous_user_id() -> String {
    format!(
        "anonym-{}-{}-{}",
        random_token(8),
        random_token(4),
        random_token(2)
    )
}

fn random_token(len: usize) -> String {
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}
