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

mod cli;

use clap::Parser;
use tracing::debug;

fn main() -> anyhow::Result<()> {
    let cli_args = cli::Cli::parse();

    // RUST_LOG wins over -v
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| cli_args.log_level().to_string());
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_env_filter(&log_level)
        .init();

    debug!("hf-sensors {} starting", env!("CARGO_PKG_VERSION"));
    let result = cli::run_cli(&cli_args);

    hf_sensors::cleanup();
    result
}
