//! Headless console client: connects one slot and prints what arrives.
//!
//! ```text
//! honkbridge-console [server] [port] [slot] [password]
//! ```
//!
//! `HONKBRIDGE_CONFIG` may point at a JSON file of connection overrides,
//! in which case the positional arguments are ignored. Location checks
//! are read from stdin, one numeric id per line.

use std::path::{Path, PathBuf};

use honkbridge::prelude::*;
use honkbridge::session::RelayConfig;
use tokio::io::{AsyncBufReadExt, BufReader};

// ---------------------------------------------------------------------------
// Hooks
// ---------------------------------------------------------------------------

struct Console;

impl SessionHooks for Console {
    fn on_handshake_complete(&mut self, slot: Option<Slot>) {
        match slot {
            Some(slot) => println!("== connected as slot {}", slot.0),
            None => println!("== connected"),
        }
    }

    fn on_item_received(&mut self, item: &ReceivedItem) {
        println!("[item #{}] {} from {}", item.index, item.item_name, item.sender);
    }

    fn on_companion_failure(&mut self, source: Option<&str>, cause: Option<&str>) {
        println!(
            "[companion] {} ({})",
            source.unwrap_or("someone"),
            cause.unwrap_or("no cause given")
        );
    }

    fn on_log_entry(&mut self, entry: &LogEntry) {
        println!("[{:?}] {}", entry.category, entry.text);
    }

    fn on_resync(&mut self, attempt: u32) {
        tracing::debug!(attempt, "resync requested");
    }
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

fn config_from_env() -> Result<ConnectConfig, HonkbridgeError> {
    if let Some(path) = std::env::var_os("HONKBRIDGE_CONFIG") {
        return Ok(ConnectConfig::from_json_file(Path::new(&path))?);
    }

    let mut args = std::env::args().skip(1);
    let server = args.next().unwrap_or_else(|| "localhost".to_string());
    let port = args.next().and_then(|p| p.parse().ok()).unwrap_or(38281);
    let slot = args.next().unwrap_or_else(|| "Goose".to_string());

    let mut config = ConnectConfig::new(server, port, slot);
    config.password = args.next();
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    if let Some(dir) = exe_dir {
        config.relay = Some(RelayConfig::near(&dir));
    }
    Ok(config)
}

fn state_path() -> PathBuf {
    std::env::var_os("HONKBRIDGE_STATE")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("honkbridge-state.json"))
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = config_from_env()?;
    let store = JsonFileStore::open(state_path())?;
    let mut client = Client::new(config, Console, store);

    eprintln!(
        "connecting to {}:{} as {}",
        client.config().server,
        client.config().port,
        client.config().slot_name
    );
    client.connect().await?;

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = client.run_until(tokio::signal::ctrl_c()) => break,
            line = stdin.next_line() => match line? {
                Some(line) => match line.trim().parse::<i64>() {
                    Ok(id) => {
                        let sent = client.send_location_check(LocationId(id))?;
                        eprintln!("location {id}: {}", if sent { "sent" } else { "already sent" });
                    }
                    Err(_) if line.trim() == "goal" => client.send_goal_complete()?,
                    Err(_) => eprintln!("expected a location id or `goal`"),
                },
                None => break,
            },
        }
    }

    let (_, store) = client.into_parts().await;
    eprintln!("state saved to {}", store.path().display());
    Ok(())
}
