//! mollie: browse a Mollie account from the terminal
//!
//! Lists and shows payments, refunds and payment methods (and any other
//! top-level API resource) as tables, CSV, JSON or YAML.

pub mod api;
pub mod cli;
pub mod core;
