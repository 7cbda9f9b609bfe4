//! Shell completion generation
//!
//! # Usage
//!
//! ```bash
//! # Bash - add to ~/.bashrc
//! source <(mollie completions bash)
//!
//! # Zsh - add to ~/.zshrc
//! source <(mollie completions zsh)
//!
//! # Fish
//! mollie completions fish > ~/.config/fish/completions/mollie.fish
//! ```

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io::Write;

use crate::cli::Cli;
use crate::core::error::CliError;

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run(args: CompletionsArgs, out: &mut dyn Write) -> Result<(), CliError> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "mollie", out);
    Ok(())
}
