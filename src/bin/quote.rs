//! Quote
//!
//! Recommends the cheapest plan for each selected service.
//!
//! Use `-c` to load a different catalog file
//! Use `-i` to set the maximum number of installments offered
//! Use `-a` to list every evaluated plan per service
//!
//! Set `RUST_LOG=debug` to trace plan choices.

use std::{
    io::{self, Write},
    time::Instant,
};

use anyhow::Result;
use clap::Parser;
use humanize_duration::{Truncate, prelude::DurationExt};
use tracing_subscriber::EnvFilter;

use waxpass::{cart::recommend, fixtures::load_catalog, utils::QuoteArgs};

/// Quote
pub fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = QuoteArgs::parse();

    let catalog = load_catalog(&args.catalog)?;
    let selections = args.selections()?;

    let start = Instant::now();

    let recommendation = recommend(&catalog, &selections)?;

    let elapsed = start.elapsed();

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    recommendation.write_to(&mut handle)?;

    if args.alternatives {
        recommendation.write_alternatives_to(&mut handle)?;
        writeln!(handle)?;
    }

    recommendation.write_payment_plans_to(&mut handle, args.installments)?;

    writeln!(
        handle,
        " {} ({}s)",
        elapsed.human(Truncate::Nano),
        elapsed.as_secs_f32()
    )?;

    Ok(())
}
