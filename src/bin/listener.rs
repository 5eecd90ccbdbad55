//! # Motion Listener
//!
//! PC-side receiver for Motion Remote packets.
//!
//! Decodes every datagram with the configured packet layout and writes one
//! JSON Lines record per packet to stdout, including button press and release
//! edges.

use anyhow::{Context, Result};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::info;

use motion_remote::config::Config;
use motion_remote::logging;
use motion_remote::receiver::Receiver;

/// Configuration file used when no path is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path))?;

    let _log_guard = logging::init(&config.logging);

    info!("Motion Listener v{} starting...", env!("CARGO_PKG_VERSION"));

    let layout = config.packet.resolve()?;
    let mut receiver = Receiver::bind(config.receiver.bind_addr()?, layout).await?;
    let mut out = BufWriter::new(tokio::io::stdout());

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut received: u64 = 0;

    loop {
        tokio::select! {
            record = receiver.next_record() => {
                let record = record?;
                let mut line = record.to_json_line()?;
                line.push('\n');
                out.write_all(line.as_bytes()).await?;
                out.flush().await?;
                received += 1;
            }

            _ = &mut shutdown => {
                info!("Received Ctrl+C, shutting down...");
                info!("Total packets received: {}", received);
                break;
            }
        }
    }

    Ok(())
}
