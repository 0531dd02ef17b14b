//! Waxpass
//!
//! Waxpass quotes the cheapest way to buy a set of salon services: pay per visit,
//! buy prepaid "buy N, get M free" bundles, or buy time-boxed unlimited passes.

pub mod cart;
pub mod catalog;
pub mod evaluator;
pub mod fixtures;
pub mod optimizer;
pub mod plans;
pub mod prelude;
pub mod pricing;
pub mod recommendation;
pub mod services;
pub mod utils;
