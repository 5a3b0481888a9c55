mod client;
mod commands;
mod daemon_launcher;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{ModeArg, VariantArg};
use std::path::PathBuf;
use tock_core::MAX_COUNTDOWN_MINUTES;

#[derive(Parser)]
#[command(name = "tock")]
#[command(version, about = "Tock CLI - Control the Tock focus timer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start or resume the timer, launching the daemon if needed
    Start,
    /// Stop the timer; stopping a focus session starts the break
    Stop,
    /// Start when stopped, stop when running
    Toggle,
    /// Return the timer to zero
    Reset {
        /// Also clear the completed session count
        #[arg(long)]
        sessions: bool,
    },
    /// Show the timer status
    Status {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Follow the timer live until Ctrl-C
    Watch,
    /// Switch between focus and relax profiles
    Mode {
        #[arg(value_enum)]
        mode: ModeArg,
    },
    /// Show or configure the periodic mini-bell
    Bell {
        /// Enable the mini-bell
        #[arg(long, conflicts_with = "off")]
        on: bool,
        /// Disable the mini-bell
        #[arg(long)]
        off: bool,
        /// Minutes between two rings
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        interval: Option<u32>,
    },
    /// Choose an open-ended stopwatch or a fixed countdown (timer must be idle)
    Variant {
        #[arg(value_enum)]
        variant: VariantArg,
        /// Countdown length in minutes, at most one day
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..=MAX_COUNTDOWN_MINUTES))]
        minutes: Option<u64>,
    },
    /// Relay an alert as a desktop notification
    Push {
        /// Raw JSON push body with title, body and url fields
        #[arg(long)]
        data: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        body: Option<String>,
        /// Opened when the notification is clicked
        #[arg(long)]
        url: Option<String>,
    },
    /// Fetch a static asset through the daemon's offline cache
    Asset {
        url: String,
        /// Write the body to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check whether the daemon is alive
    Ping,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start => commands::start().await,
        Commands::Stop => commands::stop().await,
        Commands::Toggle => commands::toggle().await,
        Commands::Reset { sessions } => commands::reset(sessions).await,
        Commands::Status { json } => commands::status(json).await,
        Commands::Watch => commands::watch().await,
        Commands::Mode { mode } => commands::mode(mode).await,
        Commands::Bell { on, off, interval } => {
            let enabled = match (on, off) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            commands::bell(enabled, interval).await
        }
        Commands::Variant { variant, minutes } => commands::variant(variant, minutes).await,
        Commands::Push {
            data,
            title,
            body,
            url,
        } => commands::push(data, title, body, url).await,
        Commands::Asset { url, output } => commands::asset(url, output).await,
        Commands::Ping => commands::ping().await,
    }
}
