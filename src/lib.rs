/*!
 # LED Control Panel Client Library

 A Rust library for driving the web control panel of a three-channel LED
 controller (typically an ESP32 serving `/led`, `/schedule` and
 `/getSchedule`).

 ## Features

 * Per-channel on/off toggling
 * Daily on/off schedules with an enable flag
 * Loading the device's schedule table into a form
 * Pluggable HTTP transport and UI panel

 ## Example

 ```no_run
 use led_panel::*;

 #[tokio::main]
 async fn main() -> Result<()> {
     // Initialize tracing for logs
     tracing_subscriber::fmt::init();

     let transport = HttpTransport::new(DeviceConfig::default())?;
     let panel = ControlPanel::new(transport, FormPanel::echoing());

     // Populate the form from the device, like the page does on load
     panel.init().await?;

     // Basic operations
     panel.toggle_led(LedId::try_from(1u8)?, "on").await;
     panel.set_schedule(LedId::try_from(1u8)?).await?;

     Ok(())
 }
 ```
*/

use thiserror::Error;

/// Custom error types for the LED control panel library
#[derive(Error, Debug)]
pub enum Error {
    /// LED identifier outside 1..=3
    #[error("Invalid LED {0:?}, expected 1, 2 or 3")]
    InvalidLed(String),

    /// A form control the panel depends on does not exist
    #[error("Missing panel element: {0}")]
    MissingElement(String),

    /// Schedule document parsed but has the wrong shape
    #[error("Invalid schedule document: {0}")]
    InvalidSchedule(String),

    /// Device answered with a non-success status
    #[error("Device returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Failure reported by a non-reqwest transport
    #[error("Transport error: {0}")]
    Transport(String),

    /// Error from reqwest
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Response body was not valid JSON
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

pub mod api;
pub mod client;
pub mod led;
pub mod panel;
pub mod schedule;
pub mod transport;

// Re-export key types
pub use api::Request;
pub use client::ControlPanel;
pub use led::{LedId, LedState};
pub use panel::{FieldIds, FormPanel, Panel};
pub use schedule::{ScheduleEntry, ScheduleTable};
pub use transport::{DeviceConfig, HttpTransport, Response, Transport};
