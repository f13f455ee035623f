use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::Result;
use futures::future::join_all;
use led_panel::*;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

type Shell = ControlPanel<HttpTransport, FormPanel>;

/// Line-oriented control panel shell reading commands from stdin
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the LED controller
    #[arg(long, env = "LED_PANEL_URL", default_value = "http://192.168.4.1")]
    url: String,

    /// Request timeout in seconds (none by default)
    #[arg(long, env = "LED_PANEL_TIMEOUT")]
    timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only replies
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| EnvFilter::new("led_panel=warn")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();
    color_eyre::install()?;

    let cli = Cli::parse();
    let transport = HttpTransport::new(DeviceConfig {
        base_url: cli.url,
        timeout: cli.timeout.map(Duration::from_secs),
    })?;
    let shell = Arc::new(ControlPanel::new(transport, FormPanel::echoing()));

    // Page is ready: populate the form before accepting input
    if let Err(e) = shell.init().await {
        eprintln!("ERR {e}");
    }
    println!("OK");

    let mut in_flight: Vec<JoinHandle<()>> = Vec::new();
    let mut lines = BufReader::new(io::stdin()).lines();

    // Mainloop: one command per line until EOF
    while let Some(line) = lines.next_line().await? {
        let words: Vec<&str> = line.split_whitespace().collect();
        match dispatch(&shell, &words) {
            Ok(Some(task)) => in_flight.push(task),
            Ok(None) => {}
            Err(message) => eprintln!("ERR {message}"),
        }
        in_flight.retain(|task| !task.is_finished());
    }

    debug!("stdin closed, waiting for {} request(s)", in_flight.len());
    for result in join_all(in_flight).await {
        if let Err(e) = result {
            warn!("Request task failed: {}", e);
        }
    }
    Ok(())
}

/// Runs one command. Network commands are spawned and returned so they can
/// overlap with whatever is typed next.
fn dispatch(
    shell: &Arc<Shell>,
    words: &[&str],
) -> std::result::Result<Option<JoinHandle<()>>, String> {
    match words {
        [] => Ok(None),
        ["on", led] => {
            let led = parse_led(led)?;
            Ok(Some(spawn(shell, move |s| async move {
                s.toggle_led(led, "on").await
            })))
        }
        ["off", led] => {
            let led = parse_led(led)?;
            Ok(Some(spawn(shell, move |s| async move {
                s.toggle_led(led, "off").await
            })))
        }
        ["toggle", led, state] => {
            let led = parse_led(led)?;
            let state = state.to_string();
            Ok(Some(spawn(shell, move |s| async move {
                s.toggle_led(led, &state).await
            })))
        }
        ["set", led, on_time, off_time, enabled] => {
            let led = parse_led(led)?;
            let enabled = match *enabled {
                "1" | "true" | "on" => true,
                "0" | "false" | "off" => false,
                other => return Err(format!("Invalid enabled flag: {other}")),
            };
            let entry = ScheduleEntry::new(*on_time, *off_time, enabled);
            if !shell.panel().fill(led, &entry) {
                return Err(format!("Missing schedule controls for LED {led}"));
            }
            println!("OK");
            Ok(None)
        }
        ["submit", led] => {
            let led = parse_led(led)?;
            Ok(Some(spawn(shell, move |s| async move {
                if let Err(e) = s.set_schedule(led).await {
                    eprintln!("ERR {e}");
                }
            })))
        }
        ["load"] => Ok(Some(spawn(shell, |s| async move {
            if let Err(e) = s.load_schedule().await {
                eprintln!("ERR {e}");
            }
        }))),
        ["show"] => {
            for led in LedId::ALL {
                if let Some(entry) = shell.panel().entry(led) {
                    println!(
                        "{} {} {} {}",
                        led,
                        entry.on_time,
                        entry.off_time,
                        u8::from(entry.enabled)
                    );
                }
            }
            Ok(None)
        }
        [other, ..] => Err(format!("Unknown command: {other}")),
    }
}

fn spawn<F, Fut>(shell: &Arc<Shell>, f: F) -> JoinHandle<()>
where
    F: FnOnce(Arc<Shell>) -> Fut,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    tokio::spawn(f(Arc::clone(shell)))
}

fn parse_led(word: &str) -> std::result::Result<LedId, String> {
    word.parse().map_err(|e: Error| e.to_string())
}
