//! CLI command implementations
//!
//! Each command validates its flags, makes exactly one client call and
//! hands the records to the formatter.

pub mod completions;
pub mod methods;
pub mod payments;
pub mod resource;

use crate::api::{Page, DEFAULT_LIMIT};
use crate::core::error::CliError;

/// Pagination flags shared by list commands
#[derive(clap::Args, Debug, Clone)]
pub struct PageArgs {
    /// Limit the number of results (1-250)
    #[arg(long, short = 'l', default_value_t = DEFAULT_LIMIT)]
    pub limit: u32,

    /// Start the page at this ID (the API paginates by cursor)
    #[arg(long, alias = "offset")]
    pub from: Option<String>,
}

impl PageArgs {
    pub fn page(&self) -> Result<Page, CliError> {
        Page::new(self.limit, self.from.clone())
    }
}
