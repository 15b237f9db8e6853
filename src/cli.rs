/*
 * This file is part of Hyperfan.
 *
 * Copyright (C) 2025 Hyperfan contributors
 *
 * Hyperfan is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Hyperfan is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Hyperfan. If not, see <https://www.gnu.org/licenses/>.
 */

//! Command Line Interface

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use hf_sensors::constants::CONFIG_ENV;
use hf_sensors::report;
use hf_sensors::{Chip, Subfeature};

#[derive(Parser)]
#[command(name = "hf-sensors")]
#[command(version)]
#[command(about = "Read and write hardware sensors through libsensors")]
#[command(long_about = "Read and write hardware sensors through libsensors

EXAMPLES:
    hf-sensors                                          List every chip (default)
    hf-sensors list --json                              Same, as JSON
    hf-sensors read /sys/class/hwmon/hwmon0/temp1_input
    hf-sensors write /sys/class/hwmon/hwmon2/fan1_min 600
    hf-sensors chip /sys/class/hwmon/hwmon2
    hf-sensors --config ./sensors3.conf list

ENVIRONMENT VARIABLES:
    HF_SENSORS_CONFIG      libsensors configuration file (same as --config)
    RUST_LOG=debug         Log filter, overrides -v")]
#[command(propagate_version = true)]
pub struct Cli {
    /// libsensors configuration file (default: the library's own)
    #[arg(short, long, global = true, env = CONFIG_ENV)]
    pub config: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every chip with its features and current values (default)
    List {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print one subfeature value
    Read {
        /// Attribute path, e.g. /sys/class/hwmon/hwmon0/temp1_input
        path: String,
    },

    /// Write one subfeature value
    Write {
        path: String,
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },

    /// Show the identity of the chip owning a path
    Chip { path: String },

    /// Show crate and library versions
    Version,
}

impl Cli {
    /// Log filter for the requested verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

pub fn run_cli(cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.config {
        debug!("Using configuration {}", path);
        hf_sensors::load_config(path).with_context(|| format!("Failed to load configuration {}", path))?;
    }

    match cli.command.as_ref().unwrap_or(&Commands::List { json: false }) {
        Commands::List { json } => cmd_list(*json),
        Commands::Read { path } => cmd_read(path),
        Commands::Write { path, value } => cmd_write(path, *value),
        Commands::Chip { path } => cmd_chip(path),
        Commands::Version => cmd_version(),
    }
}

fn cmd_list(json: bool) -> Result<()> {
    let reports = report::collect_all()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }
    for chip in &reports {
        println!("{}", chip);
    }
    Ok(())
}

fn cmd_read(path: &str) -> Result<()> {
    let subfeature = Subfeature::resolve(path)?;
    let value = subfeature
        .read()
        .with_context(|| format!("Failed to read {}", path))?;
    println!("{}", value);
    Ok(())
}

fn cmd_write(path: &str, value: f64) -> Result<()> {
    let subfeature = Subfeature::resolve(path)?;
    if !subfeature.writable() {
        anyhow::bail!("{} is not writable", path);
    }
    subfeature
        .write(value)
        .with_context(|| format!("Failed to write {}", path))?;
    println!("{} = {}", path, value);
    Ok(())
}

fn cmd_chip(path: &str) -> Result<()> {
    let chip = Chip::resolve(path)?;
    let bus = chip.bus();
    println!("{}", chip_identity(&chip.name()?, &chip, &bus.adapter_name()?));
    Ok(())
}

/// Identity block for `chip`; touches no subfeature values
fn chip_identity(name: &str, chip: &Chip, adapter: &str) -> String {
    format!(
        "Name:    {}\nPrefix:  {}\nPath:    {}\nBus:     {}\nAdapter: {}\nAddress: {:#x}",
        name,
        chip.prefix(),
        chip.path(),
        chip.bus(),
        adapter,
        chip.address()
    )
}

fn cmd_version() -> Result<()> {
    println!("hf-sensors {}", env!("CARGO_PKG_VERSION"));
    match hf_sensors::library_version()? {
        Some(version) => println!("libsensors {}", version),
        None => println!("libsensors (version unknown)"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hf_sensors::backend::memory::{MemoryBackend, MemoryChip, MemoryFeature, MemorySubfeature};
    use hf_sensors::backend::{BusRecord, ChipRecord, FeatureRecord, NativeResult, SensorsBackend, SubfeatureRecord};
    use hf_sensors::config::ConfigFile;
    use hf_sensors::ffi::{SENSORS_FEATURE_FAN, SENSORS_SUBFEATURE_FAN_INPUT};
    use serial_test::serial;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_default_command_is_list() {
        let cli = Cli::try_parse_from(["hf-sensors"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.log_level(), "warn");
    }

    #[test]
    fn test_write_accepts_negative_values() {
        let cli = Cli::try_parse_from(["hf-sensors", "write", "/sys/class/hwmon/hwmon0/temp1_offset", "-2.5"]).unwrap();
        match cli.command {
            Some(Commands::Write { path, value }) => {
                assert_eq!(path, "/sys/class/hwmon/hwmon0/temp1_offset");
                assert_eq!(value, -2.5);
            }
            _ => panic!("expected write"),
        }
    }

    /// Memory library that counts feature and value traffic
    struct CountingBackend {
        inner: MemoryBackend,
        feature_scans: Arc<AtomicUsize>,
        value_reads: Arc<AtomicUsize>,
    }

    impl SensorsBackend for CountingBackend {
        fn init(&mut self, config: &ConfigFile) -> NativeResult<()> {
            self.inner.init(config)
        }

        fn cleanup(&mut self) {
            self.inner.cleanup()
        }

        fn next_detected_chip(&self, nr: &mut i32) -> Option<ChipRecord> {
            self.inner.next_detected_chip(nr)
        }

        fn next_feature(&self, chip: &ChipRecord, nr: &mut i32) -> Option<FeatureRecord> {
            self.feature_scans.fetch_add(1, Ordering::SeqCst);
            self.inner.next_feature(chip, nr)
        }

        fn next_subfeature(&self, chip: &ChipRecord, feature: &FeatureRecord, nr: &mut i32) -> Option<SubfeatureRecord> {
            self.inner.next_subfeature(chip, feature, nr)
        }

        fn label(&self, chip: &ChipRecord, feature: &FeatureRecord) -> Option<String> {
            self.inner.label(chip, feature)
        }

        fn value(&self, chip: &ChipRecord, number: i32) -> NativeResult<f64> {
            self.value_reads.fetch_add(1, Ordering::SeqCst);
            self.inner.value(chip, number)
        }

        fn set_value(&self, chip: &ChipRecord, number: i32, value: f64) -> NativeResult<()> {
            self.inner.set_value(chip, number, value)
        }

        fn snprintf_chip_name(&self, chip: &ChipRecord, buf: &mut [u8]) -> i32 {
            self.inner.snprintf_chip_name(chip, buf)
        }

        fn adapter_name(&self, bus: &BusRecord) -> Option<String> {
            self.inner.adapter_name(bus)
        }

        fn strerror(&self, code: i32) -> String {
            self.inner.strerror(code)
        }

        fn version(&self) -> Option<String> {
            SensorsBackend::version(&self.inner)
        }
    }

    #[test]
    #[serial]
    fn test_chip_command_reads_no_values() {
        let feature_scans = Arc::new(AtomicUsize::new(0));
        let value_reads = Arc::new(AtomicUsize::new(0));
        let inner = MemoryBackend::new().chip(
            MemoryChip::new("nct6775", "/sys/class/hwmon/hwmon2").address(0x290).feature(
                MemoryFeature::new("fan1", SENSORS_FEATURE_FAN)
                    .subfeature(MemorySubfeature::new("fan1_input", SENSORS_SUBFEATURE_FAN_INPUT).value(1180.0)),
            ),
        );
        hf_sensors::set_backend(Box::new(CountingBackend {
            inner,
            feature_scans: Arc::clone(&feature_scans),
            value_reads: Arc::clone(&value_reads),
        }));

        cmd_chip("/sys/class/hwmon/hwmon2/fan1_input").unwrap();
        assert_eq!(feature_scans.load(Ordering::SeqCst), 0);
        assert_eq!(value_reads.load(Ordering::SeqCst), 0);

        let chip = Chip::resolve("/sys/class/hwmon/hwmon2").unwrap();
        let text = chip_identity(&chip.name().unwrap(), &chip, "ISA adapter");
        assert_eq!(
            text,
            "Name:    nct6775-isa-0290\nPrefix:  nct6775\nPath:    /sys/class/hwmon/hwmon2\nBus:     isa-0\nAdapter: ISA adapter\nAddress: 0x290"
        );

        hf_sensors::cleanup();
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["hf-sensors", "list", "--json", "-vv", "--config", "/etc/sensors3.conf"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some("/etc/sensors3.conf"));
        assert_eq!(cli.log_level(), "trace");
        assert!(matches!(cli.command, Some(Commands::List { json: true })));
    }
}
