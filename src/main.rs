use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{bail, Result};
use led_panel::*;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    device: DeviceArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Connection options shared by every command
#[derive(Args, Debug)]
struct DeviceArgs {
    /// Base URL of the LED controller
    #[arg(long, env = "LED_PANEL_URL", default_value = "http://192.168.4.1", global = true)]
    url: String,

    /// Request timeout in seconds (none by default)
    #[arg(long, env = "LED_PANEL_TIMEOUT", global = true)]
    timeout: Option<u64>,
}

impl DeviceArgs {
    fn config(&self) -> DeviceConfig {
        DeviceConfig {
            base_url: self.url.clone(),
            timeout: self.timeout.map(Duration::from_secs),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the schedule stored on the device
    Show,
    /// Turn an LED on
    On {
        /// LED number (1-3)
        led: LedId,
    },
    /// Turn an LED off
    Off {
        /// LED number (1-3)
        led: LedId,
    },
    /// Send a raw state label ("on" switches on, anything else off)
    Toggle {
        /// LED number (1-3)
        led: LedId,
        /// State label
        state: String,
    },
    /// Store a daily schedule for an LED
    Schedule {
        /// LED number (1-3)
        led: LedId,
        /// Time to switch on (e.g. 06:00)
        #[arg(long)]
        on_time: String,
        /// Time to switch off (e.g. 22:00)
        #[arg(long)]
        off_time: String,
        /// Store the schedule without enabling it
        #[arg(long)]
        disabled: bool,
    },
}

#[tokio::main]
#[instrument]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| EnvFilter::new("led_panel=info")),
        )
        .compact()
        .init();

    // Initialize color-eyre for pretty error reporting
    color_eyre::install()?;

    let cli = Cli::parse();
    debug!("Parsed command line arguments");

    let transport = match HttpTransport::new(cli.device.config()) {
        Ok(transport) => transport,
        Err(e) => {
            error!("Failed to set up HTTP client: {}", e);
            return Err(e.into());
        }
    };
    let panel = ControlPanel::new(transport, FormPanel::echoing());

    match cli.command.unwrap_or(Commands::Show) {
        Commands::Show => {
            show_schedule(&panel).await?;
        }
        Commands::On { led } => {
            panel.toggle_led(led, "on").await;
        }
        Commands::Off { led } => {
            panel.toggle_led(led, "off").await;
        }
        Commands::Toggle { led, state } => {
            panel.toggle_led(led, &state).await;
        }
        Commands::Schedule {
            led,
            on_time,
            off_time,
            disabled,
        } => {
            let entry = ScheduleEntry::new(on_time, off_time, !disabled);
            apply_schedule(&panel, led, &entry).await?;
        }
    }

    Ok(())
}

/// Load the form, overwrite one LED's fields and submit them
#[instrument(skip(panel))]
async fn apply_schedule<T: Transport>(
    panel: &ControlPanel<T, FormPanel>,
    led: LedId,
    entry: &ScheduleEntry,
) -> Result<()> {
    // Same order as the page: load on ready, then the user edits and submits.
    // The loaded fields are about to be overwritten, so a bad table is not fatal.
    if let Err(e) = panel.init().await {
        warn!("Could not load current schedule: {}", e);
    }
    if !panel.panel().fill(led, entry) {
        bail!("Missing schedule controls for LED {}", led);
    }
    panel.set_schedule(led).await?;
    Ok(())
}

/// Fetch the device's schedule table and print one line per LED
#[instrument(skip(panel))]
async fn show_schedule(panel: &ControlPanel<HttpTransport, FormPanel>) -> Result<()> {
    info!("Fetching schedule from {}", panel.transport().base_url());
    let table = panel.fetch_schedule().await?;

    for (led, entry) in table.iter() {
        println!("{}", describe(led, entry));
    }
    Ok(())
}

fn describe(led: LedId, entry: &ScheduleEntry) -> String {
    format!(
        "LED {}: on {:<5} off {:<5} [{}]",
        led,
        entry.on_time,
        entry.off_time,
        if entry.enabled { "enabled" } else { "disabled" }
    )
}
