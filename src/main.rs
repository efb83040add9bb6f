/*
 * This file is part of Rampcurve.
 *
 * Copyright (C) 2025 Rampcurve contributors
 *
 * Rampcurve is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Rampcurve is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Rampcurve. If not, see <https://www.gnu.org/licenses/>.
 */

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rampcurve::cli::{self, Cli};

fn main() -> anyhow::Result<()> {
    let cli_args = Cli::parse();

    init_logging(cli_args.verbose);

    let output = cli::execute(&cli_args)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Log to stderr so stdout stays pure JSON
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
