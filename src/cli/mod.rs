//! CLI module for Postbot.

pub mod commands;
mod output;

pub use output::{mask_secret, Output};

use clap::{Parser, Subcommand};

/// Postbot - restaurant location enrichment
///
/// Finds short-form videos, booking/menu links and cuisine labels for a
/// restaurant location, as an HTTP service or one-shot commands.
#[derive(Parser, Debug)]
#[command(name = "postbot")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server exposing /postbot_videos and /postbot_location
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port)
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,
    },

    /// Find short-form videos about a location and print them as JSON
    Videos {
        /// Business name or address fragment
        location: String,
    },

    /// Find booking/menu links and labels for a location and print them as JSON
    Location {
        /// Business name or address fragment
        location: String,

        /// Restaurant name used for the booking/menu search
        #[arg(short, long)]
        name: Option<String>,

        /// Full street address used for the label searches
        #[arg(long)]
        full_address: Option<String>,
    },

    /// Check configuration and credentials
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration (secrets are never printed)
    Show,

    /// Write the current configuration to the config file
    Init,

    /// Show configuration file path
    Path,
}
