//! # Hunter Engine
//!
//! Main entry point for Monster Hunter, a top-down monster-collecting RPG.
//!
//! This binary ties together:
//! - Config: `hunter.toml` with a nested `[gameplay]` table
//! - Content: the RON bundle with characters, graphics and maps
//! - Gameplay: the world, stepped headless with scripted input

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hunter_engine::app;
use hunter_engine::config::{EngineConfig, CONFIG_FILE};

/// Main entry point.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("hunter=info".parse()?))
        .init();

    info!("Monster Hunter starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args().nth(1).unwrap_or_else(|| CONFIG_FILE.to_string());
    let config = EngineConfig::load_from(&config_path);

    let summary = app::run(&config)?;
    info!(
        frames = summary.frames,
        dialogs = summary.dialogs_ended,
        "Monster Hunter shutdown complete"
    );
    Ok(())
}
