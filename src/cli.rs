//! CLI argument parsing and command dispatch

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};

use app_repos::config::{parse_owner, Settings};
use app_repos::defaults::{self, DEFAULT_REPO_URL};

use crate::commands;

/// App Repos - Keep a home server's app store repositories in sync
#[derive(Parser, Debug)]
#[command(name = "app-repos")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Platform root holding `db/user.json` and the `repos/` clones.
    ///
    /// Defaults to `~/umbrel`.
    #[arg(long, global = true, value_name = "DIR", env = "APP_REPOS_ROOT")]
    root: Option<PathBuf>,

    /// URL of the primary app store repository
    #[arg(
        long,
        global = true,
        value_name = "URL",
        env = "APP_REPOS_DEFAULT_REPO",
        default_value = DEFAULT_REPO_URL
    )]
    default_repo: String,

    /// Owner applied to clones after syncing, as `uid:gid` or `none`
    #[arg(
        long,
        global = true,
        value_name = "UID:GID",
        env = "APP_REPOS_OWNER",
        default_value = "1000:1000"
    )]
    owner: String,

    /// Seconds allowed for each network git operation
    #[arg(
        long,
        global = true,
        value_name = "SECONDS",
        env = "APP_REPOS_GIT_TIMEOUT",
        default_value_t = defaults::GIT_TIMEOUT.as_secs()
    )]
    git_timeout: u64,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register an app store repository
    Add(commands::add::AddArgs),

    /// Unregister a repository and delete its clone
    Remove(commands::remove::RemoveArgs),

    /// Clone or pull registered repositories
    Update(commands::update::UpdateArgs),

    /// Switch a clone to another branch, then update it
    Branch(commands::branch::BranchArgs),

    /// Check out an alternate app store inside the primary clone
    Checkout(commands::checkout::CheckoutArgs),

    /// Print the local clone path for a repository URL
    Path(commands::path::PathArgs),

    /// Print the clone that provides an app
    Locate(commands::locate::LocateArgs),

    /// List registered repositories
    List(commands::list::ListArgs),

    /// Print the app store id declared by a repository's clone
    Id(commands::id::IdArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);
        let settings = self.settings()?;

        match self.command {
            Commands::Add(args) => commands::add::execute(args, &settings),
            Commands::Remove(args) => commands::remove::execute(args, &settings),
            Commands::Update(args) => commands::update::execute(args, &settings),
            Commands::Branch(args) => commands::branch::execute(args, &settings),
            Commands::Checkout(args) => commands::checkout::execute(args, &settings),
            Commands::Path(args) => commands::path::execute(args, &settings),
            Commands::Locate(args) => commands::locate::execute(args, &settings),
            Commands::List(args) => commands::list::execute(args, &settings),
            Commands::Id(args) => commands::id::execute(args, &settings),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }

    fn settings(&self) -> Result<Settings> {
        let owner = parse_owner(&self.owner).map_err(|e| anyhow!(e))?;
        let root = self.root.clone().unwrap_or_else(defaults::default_root);
        Ok(Settings::new(root)
            .with_default_repo(self.default_repo.clone())
            .with_owner(owner)
            .with_git_timeout(Duration::from_secs(self.git_timeout)))
    }
}

/// `RUST_LOG` wins over `--log-level` when set.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
