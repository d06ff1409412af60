//! Body of `POST /api/hafas/v4/timetable`.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Serialize, Serializer};

pub const TIMETABLE_PATH: &str = "/api/hafas/v4/timetable";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableRequest<'a> {
    pub reverse: bool,
    pub datetime_departure: String,
    pub filter: Filter,
    pub passengers: Vec<Passenger>,
    pub count: u32,
    pub from: StationRef<'a>,
    pub to: StationRef<'a>,
}

impl<'a> TimetableRequest<'a> {
    pub fn new<Tz: TimeZone>(
        origin: Option<&'a str>,
        destination: Option<&'a str>,
        when: &DateTime<Tz>,
        count: u32,
    ) -> Self {
        Self {
            reverse: false,
            datetime_departure: departure_time(when),
            filter: Filter::default(),
            passengers: vec![Passenger::anonymous_adult()],
            count,
            from: StationRef { number: origin },
            to: StationRef { number: destination },
        }
    }
}

/// The API expects UTC with millisecond precision, e.g. `2026-10-18T07:30:00.000Z`.
fn departure_time<Tz: TimeZone>(when: &DateTime<Tz>) -> String {
    when.with_timezone(&Utc)
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub regionaltrains: bool,
    pub direct: bool,
    pub change_time: bool,
    pub wheelchair: bool,
    pub bikes: bool,
    pub trains: bool,
    pub motorail: bool,
    pub dropped_connections: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Passenger {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub me: bool,
    pub remembered: bool,
    pub challenged_flags: ChallengedFlags,
    pub relations: Vec<serde_json::Value>,
    pub cards: Vec<serde_json::Value>,
    pub birthdate_changeable: bool,
    pub birthdate_deletable: bool,
    pub name_changeable: bool,
    pub passenger_deletable: bool,
}

impl Passenger {
    fn anonymous_adult() -> Self {
        Self {
            kind: "ADULT",
            me: false,
            remembered: false,
            challenged_flags: ChallengedFlags::default(),
            relations: Vec::new(),
            cards: Vec::new(),
            birthdate_changeable: true,
            birthdate_deletable: true,
            name_changeable: true,
            passenger_deletable: true,
        }
    }
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengedFlags {
    pub has_handicapped_pass: bool,
    pub has_assistance_dog: bool,
    pub has_wheelchair: bool,
    pub has_attendant: bool,
}

/// A station as the timetable endpoint wants it: `{"number": ...}`.
#[derive(Debug, Serialize)]
pub struct StationRef<'a> {
    #[serde(serialize_with = "station_number")]
    pub number: Option<&'a str>,
}

// Numeric identifiers go out as JSON numbers, anything else is passed through as-is.
fn station_number<S: Serializer>(
    number: &Option<&str>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match number {
        Some(id) if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) => {
            match id.parse::<u64>() {
                Ok(n) => serializer.serialize_u64(n),
                Err(_) => serializer.serialize_str(id),
            }
        }
        Some(id) => serializer.serialize_str(id),
        None => serializer.serialize_none(),
    }
}
