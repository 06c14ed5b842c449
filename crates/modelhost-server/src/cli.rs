//! Command line interface

use crate::config::Environment;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "modelhost")]
#[command(author, version, about = "Host for pluggable predictive models", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    pub config: String,

    /// Deployment environment (production, staging, development, testing)
    #[arg(short, long, env = "MODELHOST_ENVIRONMENT")]
    pub environment: Option<Environment>,

    /// Listen address
    #[arg(short = 'l', long)]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
