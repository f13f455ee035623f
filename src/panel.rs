/*!
 # Control panel surface

 The client reads schedule inputs from, and writes loaded schedules and
 device replies to, a [`Panel`]. Controls are addressed by the element ids
 the device's web page uses: `onTimeN`, `offTimeN` and the `scheduleN`
 checkbox for each LED `N`.
*/

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::trace;

use crate::led::LedId;
use crate::schedule::ScheduleEntry;

/// UI controls the client depends on
pub trait Panel: Send + Sync {
    /// Current text of a field, `None` if no such field exists
    fn value(&self, id: &str) -> Option<String>;

    /// Sets a field's text; returns `false` if no such field exists
    fn set_value(&self, id: &str, value: &str) -> bool;

    /// Current state of a checkbox, `None` if no such checkbox exists
    fn checked(&self, id: &str) -> Option<bool>;

    /// Sets a checkbox; returns `false` if no such checkbox exists
    fn set_checked(&self, id: &str, checked: bool) -> bool;

    /// Shows a message to the user
    fn alert(&self, message: &str);
}

/// Element ids of one LED's schedule controls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIds {
    pub on_time: String,
    pub off_time: String,
    pub enabled: String,
}

impl FieldIds {
    pub fn for_led(led: LedId) -> Self {
        Self {
            on_time: format!("onTime{led}"),
            off_time: format!("offTime{led}"),
            enabled: format!("schedule{led}"),
        }
    }
}

#[derive(Debug, Default)]
struct FormState {
    values: HashMap<String, String>,
    checks: HashMap<String, bool>,
    alerts: Vec<String>,
}

/// In-memory form with the schedule controls of LEDs 1..=3.
///
/// Text fields start empty and checkboxes unchecked. Every alert is kept;
/// an echoing form also prints alerts to stdout as they arrive.
#[derive(Debug)]
pub struct FormPanel {
    state: Mutex<FormState>,
    echo: bool,
}

impl FormPanel {
    pub fn new() -> Self {
        Self::build(false)
    }

    pub fn echoing() -> Self {
        Self::build(true)
    }

    /// A form with no controls at all
    pub fn empty() -> Self {
        Self {
            state: Mutex::new(FormState::default()),
            echo: false,
        }
    }

    fn build(echo: bool) -> Self {
        let mut state = FormState::default();
        for led in LedId::ALL {
            let ids = FieldIds::for_led(led);
            state.values.insert(ids.on_time, String::new());
            state.values.insert(ids.off_time, String::new());
            state.checks.insert(ids.enabled, false);
        }

        Self {
            state: Mutex::new(state),
            echo,
        }
    }

    /// Writes a schedule into an LED's controls, as a user typing would
    pub fn fill(&self, led: LedId, entry: &ScheduleEntry) -> bool {
        let ids = FieldIds::for_led(led);
        self.set_value(&ids.on_time, &entry.on_time)
            & self.set_value(&ids.off_time, &entry.off_time)
            & self.set_checked(&ids.enabled, entry.enabled)
    }

    /// Reads an LED's controls back as a schedule
    pub fn entry(&self, led: LedId) -> Option<ScheduleEntry> {
        let ids = FieldIds::for_led(led);
        Some(ScheduleEntry {
            on_time: self.value(&ids.on_time)?,
            off_time: self.value(&ids.off_time)?,
            enabled: self.checked(&ids.enabled)?,
        })
    }

    /// Alerts shown so far, oldest first
    pub fn alerts(&self) -> Vec<String> {
        self.state.lock().alerts.clone()
    }
}

impl Default for FormPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel for FormPanel {
    fn value(&self, id: &str) -> Option<String> {
        self.state.lock().values.get(id).cloned()
    }

    fn set_value(&self, id: &str, value: &str) -> bool {
        match self.state.lock().values.get_mut(id) {
            Some(slot) => {
                trace!("{} = {:?}", id, value);
                *slot = value.to_string();
                true
            }
            None => false,
        }
    }

    fn checked(&self, id: &str) -> Option<bool> {
        self.state.lock().checks.get(id).copied()
    }

    fn set_checked(&self, id: &str, checked: bool) -> bool {
        match self.state.lock().checks.get_mut(id) {
            Some(slot) => {
                trace!("{} = {}", id, checked);
                *slot = checked;
                true
            }
            None => false,
        }
    }

    fn alert(&self, message: &str) {
        if self.echo {
            println!("{message}");
        }
        self.state.lock().alerts.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_ids() {
        let ids = FieldIds::for_led(LedId::ALL[1]);
        assert_eq!(ids.on_time, "onTime2");
        assert_eq!(ids.off_time, "offTime2");
        assert_eq!(ids.enabled, "schedule2");
    }

    #[test]
    fn test_form_defaults() {
        let form = FormPanel::new();
        for led in LedId::ALL {
            assert_eq!(form.entry(led), Some(ScheduleEntry::default()));
        }
        assert!(form.alerts().is_empty());
    }

    #[test]
    fn test_unknown_controls_are_reported() {
        let form = FormPanel::new();
        assert_eq!(form.value("onTime4"), None);
        assert!(!form.set_value("onTime4", "06:00"));
        assert!(!form.set_checked("schedule0", true));

        let empty = FormPanel::empty();
        assert!(!empty.fill(LedId::ALL[0], &ScheduleEntry::default()));
        assert_eq!(empty.entry(LedId::ALL[0]), None);
    }

    #[test]
    fn test_fill_and_read_back() {
        let form = FormPanel::new();
        let entry = ScheduleEntry::new("06:00", "22:00", true);
        assert!(form.fill(LedId::ALL[2], &entry));
        assert_eq!(form.entry(LedId::ALL[2]), Some(entry));
        assert_eq!(form.entry(LedId::ALL[0]), Some(ScheduleEntry::default()));
    }

    #[test]
    fn test_alerts_are_recorded_in_order() {
        let form = FormPanel::new();
        form.alert("first");
        form.alert("second");
        assert_eq!(form.alerts(), vec!["first", "second"]);
    }
}
