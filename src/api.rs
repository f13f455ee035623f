//! Requests understood by the device's web server.

use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::led::{LedId, LedState};
use crate::schedule::ScheduleEntry;

pub const LED_PATH: &str = "/led";
pub const SCHEDULE_PATH: &str = "/schedule";
pub const GET_SCHEDULE_PATH: &str = "/getSchedule";

/// Bytes a browser escapes in the query of a typed URL
const QUERY: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'#').add(b'<').add(b'>');

/// One GET exchange with the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub path: &'static str,
    pub query: Vec<(&'static str, String)>,
}

impl Request {
    /// Switch a channel on or off
    pub fn toggle(led: LedId, state: LedState) -> Self {
        Self {
            path: LED_PATH,
            query: vec![
                ("led", led.to_string()),
                ("state", state.query_value().to_string()),
            ],
        }
    }

    /// Store a channel's daily schedule
    pub fn schedule(led: LedId, entry: &ScheduleEntry) -> Self {
        Self {
            path: SCHEDULE_PATH,
            query: vec![
                ("led", led.to_string()),
                ("onTime", entry.on_time.clone()),
                ("offTime", entry.off_time.clone()),
                ("enabled", u8::from(entry.enabled).to_string()),
            ],
        }
    }

    /// Fetch the schedules of every channel
    pub fn get_schedule() -> Self {
        Self {
            path: GET_SCHEDULE_PATH,
            query: Vec::new(),
        }
    }

    /// Path and query with values left verbatim.
    pub fn uri(&self) -> String {
        self.render(|v| v.to_string())
    }

    /// Path and query as sent on the wire. Only bytes that cannot appear
    /// in a URL are escaped, so `06:00` stays `06:00`.
    pub fn encoded_uri(&self) -> String {
        self.render(|v| utf8_percent_encode(v, QUERY).to_string())
    }

    fn render(&self, value: impl Fn(&str) -> String) -> String {
        if self.query.is_empty() {
            return self.path.to_string();
        }
        let query: Vec<String> = self
            .query
            .iter()
            .map(|(k, v)| format!("{k}={}", value(v)))
            .collect();
        format!("{}?{}", self.path, query.join("&"))
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GET {}", self.uri())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_uri() {
        let led = LedId::try_from(1u8).unwrap();
        assert_eq!(Request::toggle(led, LedState::On).uri(), "/led?led=1&state=1");

        let led = LedId::try_from(2u8).unwrap();
        assert_eq!(
            Request::toggle(led, LedState::from_label("off")).uri(),
            "/led?led=2&state=0"
        );
    }

    #[test]
    fn test_schedule_uri() {
        let led = LedId::try_from(3u8).unwrap();
        let entry = ScheduleEntry::new("06:00", "22:00", true);
        assert_eq!(
            Request::schedule(led, &entry).uri(),
            "/schedule?led=3&onTime=06:00&offTime=22:00&enabled=1"
        );

        let entry = ScheduleEntry::new("", "", false);
        assert_eq!(
            Request::schedule(led, &entry).uri(),
            "/schedule?led=3&onTime=&offTime=&enabled=0"
        );
    }

    #[test]
    fn test_encoded_uri_keeps_colons() {
        let led = LedId::try_from(2u8).unwrap();
        let entry = ScheduleEntry::new("06:00", "22:00", true);
        let request = Request::schedule(led, &entry);
        assert_eq!(request.encoded_uri(), request.uri());

        let entry = ScheduleEntry::new("7 \"pm\"", "<late>#", false);
        assert_eq!(
            Request::schedule(led, &entry).encoded_uri(),
            "/schedule?led=2&onTime=7%20%22pm%22&offTime=%3Clate%3E%23&enabled=0"
        );
    }

    #[test]
    fn test_get_schedule_has_no_query() {
        let request = Request::get_schedule();
        assert_eq!(request.uri(), "/getSchedule");
        assert_eq!(request.to_string(), "GET /getSchedule");
    }
}
