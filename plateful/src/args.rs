use std::path::PathBuf;

use clap::Parser;

/// Plateful meal-plan server
#[derive(Debug, Parser)]
#[command(name = "plateful", about = "AI-backed meal-plan generation server")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "plateful.toml", env = "PLATEFUL_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "PLATEFUL_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,
}
