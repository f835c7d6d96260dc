//! `deaas`: terminal dashboard for hotel energy installations.
//! - `hotels` / `create-hotel`: the hotel list page.
//! - `show` / `watch`: the hotel detail page, once or polled every few seconds.
//! - `add-panel` / `add-inverter` / `add-tank` / `toggle-panel`: detail page actions.
//! - Config: `--config` (or DEAAS_CONFIG) YAML, DEAAS_API_BASE, DEAAS_POLL_SECS, flags.
//! - Logs go to stderr, filtered by RUST_LOG (default `info`).

use std::io::{IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use deaas_dashboard::{
    ApiClient, DashboardConfig, commands, config::Overrides, render,
    watch::{self, WatchOptions},
};
use hotel_core::{Id, NewHotel, NewInverter, NewPanel, NewTank};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    name = "deaas",
    version,
    about = "DEaaS Dashboard: monitor and administer hotel energy installations"
)]
struct Cli {
    /// Base URL of the hotel API (overrides DEAAS_API_BASE and the config file)
    #[arg(long, global = true)]
    api_base: Option<String>,
    /// YAML config file with api_base / poll_interval_secs / request_timeout_secs
    #[arg(long, global = true, env = "DEAAS_CONFIG")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List all hotels
    Hotels,
    /// Create a hotel, then list hotels again
    CreateHotel {
        #[arg(long)]
        name: String,
        #[arg(long)]
        location: String,
    },
    /// Fetch one hotel and print its dashboard
    Show { id: Id },
    /// Poll one hotel and redraw its dashboard on every response
    Watch {
        id: Id,
        /// Seconds between polls (overrides DEAAS_POLL_SECS and the config file)
        #[arg(long)]
        interval: Option<u64>,
        /// Stop after this many polls
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        polls: Option<u64>,
    },
    /// Add a panel to a hotel
    AddPanel {
        hotel_id: Id,
        #[arg(long)]
        name: String,
        /// Volts
        #[arg(long)]
        voltage: Option<f64>,
        /// Amps
        #[arg(long)]
        current: Option<f64>,
        /// Watts
        #[arg(long)]
        power: Option<f64>,
        /// Thermal watts
        #[arg(long)]
        thermal_power: Option<f64>,
    },
    /// Add an inverter to a hotel (enabled, no fault unless told otherwise)
    AddInverter {
        hotel_id: Id,
        #[arg(long)]
        disabled: bool,
        #[arg(long)]
        total_power: Option<f64>,
        #[arg(long)]
        ac_output: Option<f64>,
        #[arg(long)]
        fault: bool,
    },
    /// Add a thermal tank to a hotel
    AddTank {
        hotel_id: Id,
        /// Degrees Celsius
        #[arg(long)]
        temperature: Option<f64>,
        /// Watts
        #[arg(long)]
        thermal_input: Option<f64>,
    },
    /// Turn a panel on if it is off, off if it is on
    TogglePanel { hotel_id: Id, panel_id: Id },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let poll_override = match &cli.command {
        Commands::Watch { interval, .. } => *interval,
        _ => None,
    };
    let cfg = DashboardConfig::load(&Overrides {
        config_path: cli.config.clone(),
        api_base: cli.api_base.clone(),
        poll_interval_secs: poll_override,
    })?;
    let client = ApiClient::new(cfg.api_base.clone(), cfg.request_timeout)?;
    tracing::debug!(api_base = %cfg.api_base, "dashboard configured");

    let output = match cli.command {
        Commands::Hotels => commands::list_hotels(&client).await?,
        Commands::CreateHotel { name, location } => {
            commands::create_hotel(&client, NewHotel { name, location }).await?
        }
        Commands::Show { id } => commands::show_hotel(&client, id).await?,
        Commands::Watch { id, polls, .. } => {
            let opts = WatchOptions {
                interval: cfg.poll_interval,
                max_polls: polls,
            };
            let clear = std::io::stdout().is_terminal();
            watch::watch(&client, id, opts, |view| {
                let mut out = std::io::stdout().lock();
                if clear {
                    write!(out, "\x1B[2J\x1B[H")?;
                }
                writeln!(
                    out,
                    "{}updated {}",
                    render::hotel_detail(view),
                    Local::now().format("%H:%M:%S")
                )?;
                out.flush().context("failed to write dashboard to stdout")
            })
            .await?;
            return Ok(());
        }
        Commands::AddPanel {
            hotel_id,
            name,
            voltage,
            current,
            power,
            thermal_power,
        } => {
            let panel = NewPanel {
                hotel_id,
                name,
                voltage,
                current,
                power,
                thermal_power,
            };
            commands::add_panel(&client, panel).await?
        }
        Commands::AddInverter {
            hotel_id,
            disabled,
            total_power,
            ac_output,
            fault,
        } => {
            let inverter = NewInverter {
                enabled: !disabled,
                total_power,
                ac_output,
                fault,
                ..NewInverter::for_hotel(hotel_id)
            };
            commands::add_inverter(&client, inverter).await?
        }
        Commands::AddTank {
            hotel_id,
            temperature,
            thermal_input,
        } => {
            let tank = NewTank {
                hotel_id,
                temperature,
                thermal_input,
            };
            commands::add_tank(&client, tank).await?
        }
        Commands::TogglePanel { hotel_id, panel_id } => {
            commands::toggle_panel(&client, hotel_id, panel_id).await?
        }
    };

    print!("{output}");
    Ok(())
}

fn init_tracing() {
    // Stdout carries the rendered views, so logs go to stderr.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
