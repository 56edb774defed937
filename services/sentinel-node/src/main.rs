//! Sentinel node: hosts one ledger instance behind a JSON-lines protocol.
//!
//! ```text
//! sentinel-node [--config <path>] [--version-json]
//! ```
//!
//! Without `--config`, the file named by `SENTINEL_CONFIG` is used, or the
//! defaults with in-memory storage when that is unset too.

mod protocol;

use anyhow::{bail, Context, Result};
use sentinel_core::{logging, SentinelConfig};
use sentinel_crypto::CANONICAL_FORMAT_VERSION;
use sentinel_ledger::Sentinel;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

const NODE_PROTOCOL_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
struct NodeVersionHandshake {
    version: &'static str,
    protocol_version: u32,
    canonical_format_version: u32,
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|arg| arg == "--version-json") {
        let handshake = NodeVersionHandshake {
            version: env!("CARGO_PKG_VERSION"),
            protocol_version: NODE_PROTOCOL_VERSION,
            canonical_format_version: CANONICAL_FORMAT_VERSION,
        };
        println!("{}", serde_json::to_string(&handshake)?);
        return Ok(());
    }

    let config = match parse_config_path(&args)? {
        Some(path) => SentinelConfig::from_file(&path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => SentinelConfig::from_env().context("failed to load config from environment")?,
    };

    logging::try_init_with(&config.logging.level, config.logging.format)?;

    let mut sentinel = Sentinel::open(&config).context("failed to open ledger")?;
    info!(
        storage = ?config.storage.path,
        max_age_secs = config.ledger.max_age_secs,
        limit_amount = config.ledger.limit_amount,
        "Sentinel node ready"
    );

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    protocol::serve(&mut sentinel, stdin.lock(), stdout.lock())
        .context("request stream failed")?;

    info!("Input closed, shutting down");
    Ok(())
}

fn parse_config_path(args: &[String]) -> Result<Option<PathBuf>> {
    let mut args_iter = args.iter();
    while let Some(arg) = args_iter.next() {
        if arg == "--config" {
            match args_iter.next() {
                Some(path) => return Ok(Some(PathBuf::from(path))),
                None => bail!("--config was provided without a path"),
            }
        }
    }

    Ok(None)
}
