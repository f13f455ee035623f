/*!
 # Schedules for LED channels

 Each channel carries one daily schedule: a time to switch on, a time to
 switch off and an enable flag. The device reports all three schedules at
 once as a JSON object keyed `"1"`, `"2"`, `"3"`.
*/

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::led::LedId;
use crate::{Error, Result};

/// Daily on/off schedule of one channel.
///
/// Times are kept exactly as the form or device supplied them (usually
/// `HH:MM`); the device owns their interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub on_time: String,
    pub off_time: String,
    #[serde(deserialize_with = "flag")]
    pub enabled: bool,
}

impl ScheduleEntry {
    pub fn new(on_time: impl Into<String>, off_time: impl Into<String>, enabled: bool) -> Self {
        Self {
            on_time: on_time.into(),
            off_time: off_time.into(),
            enabled,
        }
    }
}

/// Accepts `true`/`false` as well as the `1`/`0` some firmware emits.
fn flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(u64),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Int(0) => Ok(false),
        Flag::Int(1) => Ok(true),
        Flag::Int(n) => Err(serde::de::Error::custom(format!(
            "expected 0 or 1 for enabled, got {n}"
        ))),
    }
}

/// Schedules of all three channels
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScheduleTable {
    entries: [ScheduleEntry; 3],
}

impl ScheduleTable {
    pub fn new(entries: [ScheduleEntry; 3]) -> Self {
        Self { entries }
    }

    /// Validates a parsed `/getSchedule` document.
    ///
    /// The document must be an object with one well-formed entry under each
    /// of the keys `"1"`, `"2"` and `"3"`. Other keys are ignored.
    pub fn decode(document: &Value) -> Result<Self> {
        let object = document.as_object().ok_or_else(|| {
            Error::InvalidSchedule(format!("expected an object, got {}", kind(document)))
        })?;

        let mut entries: [ScheduleEntry; 3] = Default::default();
        for (slot, led) in entries.iter_mut().zip(LedId::ALL) {
            let key = led.to_string();
            let raw = object
                .get(&key)
                .ok_or_else(|| Error::InvalidSchedule(format!("missing entry for LED {led}")))?;
            *slot = ScheduleEntry::deserialize(raw)
                .map_err(|e| Error::InvalidSchedule(format!("LED {led}: {e}")))?;
        }

        Ok(Self { entries })
    }

    pub fn get(&self, led: LedId) -> &ScheduleEntry {
        &self.entries[usize::from(led.number() - LedId::MIN)]
    }

    /// Entries in LED order
    pub fn iter(&self) -> impl Iterator<Item = (LedId, &ScheduleEntry)> {
        LedId::ALL.into_iter().zip(self.entries.iter())
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_full_table() {
        let doc = json!({
            "1": {"onTime": "08:00", "offTime": "20:00", "enabled": true},
            "2": {"onTime": "07:30", "offTime": "23:15", "enabled": false},
            "3": {"onTime": "", "offTime": "", "enabled": 1},
        });

        let table = ScheduleTable::decode(&doc).unwrap();
        assert_eq!(
            table.get(LedId::ALL[0]),
            &ScheduleEntry::new("08:00", "20:00", true)
        );
        assert!(!table.get(LedId::ALL[1]).enabled);
        assert!(table.get(LedId::ALL[2]).enabled);

        let order: Vec<u8> = table.iter().map(|(led, _)| led.number()).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_decode_ignores_extra_keys() {
        let doc = json!({
            "0": "ignored",
            "1": {"onTime": "a", "offTime": "b", "enabled": false},
            "2": {"onTime": "a", "offTime": "b", "enabled": false},
            "3": {"onTime": "a", "offTime": "b", "enabled": false},
            "version": 2,
        });
        assert!(ScheduleTable::decode(&doc).is_ok());
    }

    #[test]
    fn test_decode_rejects_missing_entry() {
        let doc = json!({
            "1": {"onTime": "a", "offTime": "b", "enabled": false},
            "3": {"onTime": "a", "offTime": "b", "enabled": false},
        });
        match ScheduleTable::decode(&doc) {
            Err(Error::InvalidSchedule(msg)) => assert!(msg.contains("LED 2")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_bad_shapes() {
        assert!(matches!(
            ScheduleTable::decode(&json!([1, 2, 3])),
            Err(Error::InvalidSchedule(_))
        ));

        let missing_field = json!({
            "1": {"onTime": "a", "enabled": false},
            "2": {"onTime": "a", "offTime": "b", "enabled": false},
            "3": {"onTime": "a", "offTime": "b", "enabled": false},
        });
        assert!(matches!(
            ScheduleTable::decode(&missing_field),
            Err(Error::InvalidSchedule(_))
        ));

        let bad_flag = json!({
            "1": {"onTime": "a", "offTime": "b", "enabled": 7},
            "2": {"onTime": "a", "offTime": "b", "enabled": false},
            "3": {"onTime": "a", "offTime": "b", "enabled": false},
        });
        assert!(matches!(
            ScheduleTable::decode(&bad_flag),
            Err(Error::InvalidSchedule(_))
        ));
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let value = serde_json::to_value(ScheduleEntry::new("06:00", "22:00", true)).unwrap();
        assert_eq!(
            value,
            json!({"onTime": "06:00", "offTime": "22:00", "enabled": true})
        );
    }
}
