//! Utils

use std::path::PathBuf;

use clap::Parser;

use crate::{
    cart::Selection,
    fixtures::{FixtureError, parse_selection},
    recommendation::MAX_INSTALLMENTS,
};

/// Quote the cheapest way to buy a set of services
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct QuoteArgs {
    /// Catalog YAML file
    #[clap(short, long, default_value = "fixtures/catalogs/standard.yml")]
    pub catalog: PathBuf,

    /// Maximum number of installments to offer
    #[clap(
        short,
        long,
        default_value_t = 4,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_INSTALLMENTS))
    )]
    pub installments: u32,

    /// Also list every evaluated plan per service
    #[clap(short, long)]
    pub alternatives: bool,

    /// Services to quote, as `NAME[=VISITS][@MONTHS]`
    #[clap(required = true)]
    pub selections: Vec<String>,
}

impl QuoteArgs {
    /// Parse the positional selections.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::InvalidSelection`] for the first malformed selection.
    pub fn selections(&self) -> Result<Vec<Selection>, FixtureError> {
        self.selections
            .iter()
            .map(|selection| parse_selection(selection))
            .collect()
    }
}
