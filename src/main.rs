use std::net::IpAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use crossbeam_channel::unbounded;
use log::{error, info};
use tokio::sync::broadcast;

use nfc_manager::config::Config;
use nfc_manager::manufacturer::ManufacturerRegistry;
use nfc_manager::types::{NfcCommand, OutgoingMessage};
use nfc_manager::{nfc_service, ws};

/// Reads NFC tags from PC/SC readers and streams the results over WebSocket
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// WebSocket port
    #[arg(short, long)]
    port: Option<u16>,

    /// WebSocket bind address
    #[arg(long)]
    bind: Option<IpAddr>,

    /// Manufacturer code table (JSON object of decimal code -> name)
    #[arg(long)]
    manufacturer_table: Option<PathBuf>,

    /// Don't start a read when a card is placed on a reader
    #[arg(long)]
    no_read_on_insert: bool,
}

impl Args {
    fn into_config(self) -> Result<Config, nfc_manager::ConfigError> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if self.manufacturer_table.is_some() {
            config.manufacturer_table = self.manufacturer_table;
        }
        if self.no_read_on_insert {
            config.read_on_insert = false;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let config = match Args::parse().into_config() {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    info!("Starting NFC Manager on {}", config.socket_addr());

    let registry = ManufacturerRegistry::load(config.manufacturer_table.as_deref());

    // Channel: WS -> NFC (Commands)
    // Crossbeam (sync) because the NFC thread blocks on PC/SC
    let (cmd_tx, cmd_rx) = unbounded::<NfcCommand>();

    // Channel: NFC -> WS (Events)
    let (event_tx, event_rx) = broadcast::channel::<OutgoingMessage>(config.event_capacity);

    // Bridge NFC thread -> broadcast
    let (bridge_tx, bridge_rx) = unbounded::<OutgoingMessage>();
    std::thread::spawn(move || {
        while let Ok(msg) = bridge_rx.recv() {
            let _ = event_tx.send(msg);
        }
    });

    let nfc_config = config.clone();
    std::thread::spawn(move || {
        nfc_service::run(nfc_config, registry, bridge_tx, cmd_rx);
    });

    ws::start_server(config.socket_addr(), config.event_capacity, cmd_tx, event_rx).await;
    ExitCode::SUCCESS
}
