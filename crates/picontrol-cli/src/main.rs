//! pitest - piControl process image tool
//!
//! Reads and writes variables, lists devices and issues driver requests
//! against `/dev/piControl0` or the node given with `--device`.
//!
//! # Usage
//!
//! ```bash
//! # Read the RevPi Core LED byte
//! pitest read RevPiLED
//!
//! # Switch output O_1 on
//! pitest write O_1 1
//!
//! # List the connected modules as JSON
//! pitest --json ls
//!
//! # Reset counters 0 and 2 of the DIO at address 31
//! pitest counter 31 0b101
//! ```

mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use picontrol::{ClientConfig, ProcessImageClient, VariableValue};
use render::ValueFormat;
use serde_json::json;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// piControl process image tool
#[derive(Parser, Debug)]
#[command(name = "pitest")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Device node of the process image (default: $PICONTROL_DEVICE or /dev/piControl0)
    #[arg(long, global = true)]
    device: Option<PathBuf>,

    /// Reject variable names longer than 31 bytes instead of truncating them
    #[arg(long, global = true)]
    strict: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read the value of a variable
    Read {
        /// Variable name
        name: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "dec")]
        format: ValueFormat,

        /// Print only the value
        #[arg(short, long)]
        quiet: bool,
    },

    /// Write a value to a variable
    Write {
        /// Variable name
        name: String,

        /// Value; decimal, or hex with 0x, or binary with 0b
        #[arg(value_parser = parse_number)]
        value: u32,
    },

    /// Show offset, length and bit of a variable
    Variable {
        /// Variable name
        name: String,
    },

    /// List the connected devices
    Ls,

    /// Reset the process image
    Reset,

    /// Reset counters of a DIO module
    Counter {
        /// Module address
        #[arg(value_parser = parse_number)]
        address: u32,

        /// One bit per counter to reset
        #[arg(value_parser = parse_number)]
        bitfield: u32,
    },

    /// Wait for the next driver event
    Wait,

    /// Update module firmware
    Firmware {
        /// Module address; the driver picks the module when omitted
        #[arg(long, value_parser = parse_number)]
        address: Option<u32>,
    },
}

/// Parse decimal, `0x` hex or `0b` binary.
fn parse_number(s: &str) -> std::result::Result<u32, String> {
    let s = s.trim();
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else if let Some(bin) = s.strip_prefix("0b").or_else(|| s.strip_prefix("0B")) {
        u32::from_str_radix(bin, 2)
    } else {
        s.parse()
    };
    parsed.map_err(|e| format!("invalid number '{s}': {e}"))
}

fn tracing_filter(verbose: u8) -> EnvFilter {
    match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("pitest=debug,picontrol=debug,picontrol_transport=debug"),
        _ => EnvFilter::new("pitest=trace,picontrol=trace,picontrol_transport=trace"),
    }
}

fn init_tracing(verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_filter(verbose))
        .with_writer(std::io::stderr)
        .init();
}

fn config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = ClientConfig::from_env().context("Invalid PICONTROL_* environment")?;
    if let Some(device) = &cli.device {
        config = config.with_device_path(device);
    }
    if cli.strict {
        config = config.strict_names();
    }
    debug!(
        device = %config.device_path.display(),
        name_policy = ?config.name_policy,
        "Resolved configuration"
    );
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = config(&cli)?;
    let device = config.device_path.display().to_string();
    let mut client = ProcessImageClient::with_config(config);

    match &cli.command {
        Commands::Read {
            name,
            format,
            quiet,
        } => {
            let value = client
                .read_variable(name)
                .with_context(|| format!("Failed to read variable {name}"))?;
            if cli.json {
                print_json(&json!({ "name": name, "value": value }))?;
            } else {
                if !quiet {
                    println!("reading variable: {name}");
                }
                print!("{}", render::value(name, value, *format, *quiet));
            }
        }

        Commands::Write { name, value } => {
            if !cli.json {
                print!("{}", render::writing(name, *value));
            }
            let variable = client
                .resolve_variable(name)
                .with_context(|| format!("Failed to resolve variable {name}"))?;
            let value = VariableValue::for_variable(&variable, *value)?;
            client
                .write_value(&variable, value)
                .with_context(|| format!("Failed to write variable {name}"))?;
            if cli.json {
                print_json(&json!({ "name": name, "offset": variable.offset, "value": value }))?;
            } else {
                print!("{}", render::written(&variable, value));
            }
        }

        Commands::Variable { name } => {
            let variable = client
                .resolve_variable(name)
                .with_context(|| format!("Failed to resolve variable {name}"))?;
            if cli.json {
                print_json(&variable)?;
            } else {
                print!("{}", render::variable(&variable));
            }
        }

        Commands::Ls => {
            let devices = client
                .device_info_list()
                .with_context(|| format!("Failed to list devices on {device}"))?;
            if cli.json {
                print_json(&devices)?;
            } else {
                print!("{}", render::device_list(&devices));
            }
        }

        Commands::Reset => {
            client.reset().context("Failed to reset the process image")?;
            if !cli.json {
                println!("Reset of process image done");
            }
        }

        Commands::Counter { address, bitfield } => {
            let address = u8::try_from(*address).context("Module address must fit in 8 bits")?;
            let bitfield = u16::try_from(*bitfield).context("Counter bitfield must fit in 16 bits")?;
            client
                .reset_counter(address, bitfield)
                .with_context(|| format!("Failed to reset counters of module {address}"))?;
            if !cli.json {
                println!("Counters 0x{bitfield:04x} of module {address} reset");
            }
        }

        Commands::Wait => {
            let event = client.wait_for_event().context("Failed to wait for event")?;
            if cli.json {
                print_json(&event)?;
            } else {
                println!("Event: {event:?}");
            }
        }

        Commands::Firmware { address } => {
            let message = client
                .update_firmware(*address)
                .context("Failed to start firmware update")?;
            if cli.json {
                print_json(&json!({ "address": address, "message": message }))?;
            } else if let Some(message) = message {
                println!("{message}");
            }
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
