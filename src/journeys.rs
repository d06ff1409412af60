use std::future::Future;
use std::io::{self, Write};

use chrono::{DateTime, Local};
use serde_json::Value;

use crate::error::LookupError;

/// Number of journeys asked for per lookup.
pub const RESULTS: u32 = 5;

/// Query window handed to a [`JourneyLookup`].
#[derive(Debug, Clone, PartialEq)]
pub struct JourneyQuery {
    /// Earliest departure
    pub when: DateTime<Local>,
    /// Maximum number of journeys
    pub results: u32,
}

impl JourneyQuery {
    /// Journeys departing from now on.
    pub fn now() -> Self {
        Self {
            when: Local::now(),
            results: RESULTS,
        }
    }
}

/// Something that can plan journeys between two stations.
///
/// Station identifiers are opaque to this crate and passed along unchecked,
/// including when they are missing. The result is equally opaque.
pub trait JourneyLookup: Send + Sync {
    fn journeys(
        &self,
        origin: Option<&str>,
        destination: Option<&str>,
        query: &JourneyQuery,
    ) -> impl Future<Output = Result<Value, LookupError>> + Send;
}

/// Look up journeys from now on and report the outcome.
///
/// On success the result goes to `out` as a single line of JSON, on failure
/// the error goes to `err`. A failed lookup is not an error of this function,
/// only failing to write is.
pub async fn query_and_report<L, O, E>(
    lookup: &L,
    origin: Option<&str>,
    destination: Option<&str>,
    out: &mut O,
    err: &mut E,
) -> io::Result<()>
where
    L: JourneyLookup,
    O: Write,
    E: Write,
{
    let query = JourneyQuery::now();

    match lookup.journeys(origin, destination, &query).await {
        Ok(journeys) => {
            serde_json::to_writer(&mut *out, &journeys)?;
            writeln!(out)?;
            out.flush()
        }
        Err(error) => {
            tracing::debug!(?error, "lookup failed");
            writeln!(err, "{error}")?;
            err.flush()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    type Seen = (Option<String>, Option<String>, JourneyQuery);

    struct FakeLookup {
        outcome: fn() -> Result<Value, LookupError>,
        seen: Mutex<Vec<Seen>>,
    }

    impl FakeLookup {
        fn new(outcome: fn() -> Result<Value, LookupError>) -> Self {
            Self {
                outcome,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn seen(&self) -> Vec<Seen> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl JourneyLookup for FakeLookup {
        async fn journeys(
            &self,
            origin: Option<&str>,
            destination: Option<&str>,
            query: &JourneyQuery,
        ) -> Result<Value, LookupError> {
            self.seen.lock().unwrap().push((
                origin.map(str::to_owned),
                destination.map(str::to_owned),
                query.clone(),
            ));
            (self.outcome)()
        }
    }

    async fn run(
        lookup: &FakeLookup,
        origin: Option<&str>,
        destination: Option<&str>,
    ) -> (String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        query_and_report(lookup, origin, destination, &mut out, &mut err)
            .await
            .unwrap();
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[tokio::test]
    async fn prints_result_as_single_json_line() {
        let lookup = FakeLookup::new(|| {
            Ok(json!([{ "from": "8100002", "to": "8100001", "duration": 34 }]))
        });

        let (out, err) = run(&lookup, Some("8100002"), Some("8100001")).await;

        assert_eq!(
            out,
            "[{\"from\":\"8100002\",\"to\":\"8100001\",\"duration\":34}]\n"
        );
        assert!(err.is_empty());
    }

    #[tokio::test]
    async fn asks_for_five_results_starting_now() {
        let lookup = FakeLookup::new(|| Ok(json!([])));

        let before = Local::now();
        run(&lookup, Some("8100002"), Some("8100001")).await;
        let after = Local::now();

        let seen = lookup.seen();
        assert_eq!(seen.len(), 1);
        let (origin, destination, query) = &seen[0];
        assert_eq!(origin.as_deref(), Some("8100002"));
        assert_eq!(destination.as_deref(), Some("8100001"));
        assert_eq!(query.results, 5);
        assert!(before <= query.when && query.when <= after, "{query:?}");
    }

    #[tokio::test]
    async fn failure_goes_to_stderr_only() {
        let lookup = FakeLookup::new(|| Err(LookupError::MissingConnections));

        let (out, err) = run(&lookup, Some("nowhere"), Some("8100001")).await;

        assert!(out.is_empty());
        assert_eq!(err, format!("{}\n", LookupError::MissingConnections));
        assert_eq!(lookup.seen().len(), 1, "lookup must not be retried");
    }

    #[tokio::test]
    async fn missing_stations_are_passed_through() {
        let lookup = FakeLookup::new(|| Ok(Value::Null));

        let (out, err) = run(&lookup, None, None).await;

        let seen = lookup.seen();
        assert_eq!(seen[0].0, None);
        assert_eq!(seen[0].1, None);
        assert_eq!(out, "null\n");
        assert!(err.is_empty());
    }
}
