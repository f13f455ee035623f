use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::api::Request;
use crate::led::{LedId, LedState};
use crate::panel::{FieldIds, Panel};
use crate::schedule::{ScheduleEntry, ScheduleTable};
use crate::transport::Transport;
use crate::{Error, Result};

/// Mediates between a [`Panel`] and the device's web server.
///
/// Every operation is a single independent request/response exchange.
/// Calls are neither queued nor merged: concurrent calls race and their
/// replies are handled in whatever order they complete.
pub struct ControlPanel<T, P> {
    transport: T,
    panel: P,
    initialized: AtomicBool,
}

impl<T: Transport, P: Panel> ControlPanel<T, P> {
    pub fn new(transport: T, panel: P) -> Self {
        Self {
            transport,
            panel,
            initialized: AtomicBool::new(false),
        }
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Page-ready hook: loads the schedule table into the panel.
    ///
    /// Only the first call does anything.
    #[instrument(skip(self))]
    pub async fn init(&self) -> Result<()> {
        if self.initialized.swap(true, Ordering::SeqCst) {
            warn!("Control panel already initialized, ignoring");
            return Ok(());
        }

        info!("Initializing control panel");
        self.load_schedule().await
    }

    /// Switches an LED on (`"on"`) or off (any other label).
    ///
    /// The device's reply is shown as an alert. Failures are only logged.
    #[instrument(skip(self))]
    pub async fn toggle_led(&self, led: LedId, state: &str) {
        let state = LedState::from_label(state);
        debug!("Turning LED {} {}", led, state);

        self.send_and_alert(&Request::toggle(led, state)).await;
    }

    /// Submits the schedule currently entered in the panel for an LED.
    ///
    /// Returns an error only if one of the LED's controls is missing; in that
    /// case nothing is sent. Request failures are logged, not returned.
    #[instrument(skip(self))]
    pub async fn set_schedule(&self, led: LedId) -> Result<()> {
        let entry = self.read_entry(led)?;
        debug!(
            "Scheduling LED {}: on {:?} off {:?} enabled {}",
            led, entry.on_time, entry.off_time, entry.enabled
        );

        self.send_and_alert(&Request::schedule(led, &entry)).await;
        Ok(())
    }

    /// Fetches the device's schedules and writes them into the panel.
    ///
    /// Network failures and unparseable bodies are logged and leave the
    /// panel untouched. A document of the wrong shape, or a missing control,
    /// is returned as an error.
    #[instrument(skip(self))]
    pub async fn load_schedule(&self) -> Result<()> {
        let document = match self.fetch_document().await {
            Ok(document) => document,
            Err(e) => {
                error!("Error loading schedule: {}", e);
                return Ok(());
            }
        };

        let table = ScheduleTable::decode(&document)?;
        self.write_table(&table)?;

        info!("Schedule loaded");
        Ok(())
    }

    /// Fetches the device's schedules without touching the panel.
    ///
    /// Unlike [`load_schedule`](Self::load_schedule), a non-success status
    /// is an error here.
    #[instrument(skip(self))]
    pub async fn fetch_schedule(&self) -> Result<ScheduleTable> {
        let response = self.transport.get(&Request::get_schedule()).await?;
        if !response.is_success() {
            return Err(Error::Status {
                status: response.status,
                body: response.body,
            });
        }
        let document: Value = serde_json::from_str(&response.body)?;
        ScheduleTable::decode(&document)
    }

    /// The reply body is alerted whatever its status; only a missing reply
    /// is an error.
    async fn send_and_alert(&self, request: &Request) {
        match self.transport.get(request).await {
            Ok(response) => {
                debug!("{} answered {} {:?}", request, response.status, response.body);
                self.panel.alert(&response.body);
            }
            Err(e) => error!("Error: {}", e),
        }
    }

    /// Body is parsed whatever the status, as the page did.
    async fn fetch_document(&self) -> Result<Value> {
        let response = self.transport.get(&Request::get_schedule()).await?;
        if !response.is_success() {
            debug!("/getSchedule answered {}", response.status);
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    fn read_entry(&self, led: LedId) -> Result<ScheduleEntry> {
        let ids = FieldIds::for_led(led);
        let on_time = self
            .panel
            .value(&ids.on_time)
            .ok_or(Error::MissingElement(ids.on_time))?;
        let off_time = self
            .panel
            .value(&ids.off_time)
            .ok_or(Error::MissingElement(ids.off_time))?;
        let enabled = self
            .panel
            .checked(&ids.enabled)
            .ok_or(Error::MissingElement(ids.enabled))?;

        Ok(ScheduleEntry {
            on_time,
            off_time,
            enabled,
        })
    }

    fn write_table(&self, table: &ScheduleTable) -> Result<()> {
        for (led, entry) in table.iter() {
            let ids = FieldIds::for_led(led);
            if !self.panel.set_value(&ids.on_time, &entry.on_time) {
                return Err(Error::MissingElement(ids.on_time));
            }
            if !self.panel.set_value(&ids.off_time, &entry.off_time) {
                return Err(Error::MissingElement(ids.off_time));
            }
            if !self.panel.set_checked(&ids.enabled, entry.enabled) {
                return Err(Error::MissingElement(ids.enabled));
            }
        }
        Ok(())
    }
}
