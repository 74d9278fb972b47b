//! # Completions Command Implementation
//!
//! Writes a `clap_complete` script for the chosen shell to stdout.
//!
//! ```bash
//! app-repos completions bash > ~/.local/share/bash-completion/completions/app-repos
//! app-repos completions zsh > ~/.zfunc/_app-repos
//! ```

use std::io;

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};

use crate::cli::Cli;

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// The shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Execute the `completions` command.
pub fn execute(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "app-repos", &mut io::stdout());
    Ok(())
}
