//! Clap derive structures for the `sprinkly` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// sprinkly -- command-line client for OpenSprinkler controllers
#[derive(Debug, Parser)]
#[command(
    name = "sprinkly",
    version,
    about = "Monitor and control OpenSprinkler irrigation controllers",
    long_about = "Read water level, rain delay and station state from an OpenSprinkler\n\
        controller, and start or stop stations and programs.\n\n\
        Reads are served from a shared cache refreshed at most once per\n\
        refresh interval, so repeated queries stay gentle on the device.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Device profile to use
    #[arg(long, short = 'p', env = "SPRINKLY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Device address or URL (overrides profile)
    #[arg(long, short = 'H', env = "SPRINKLY_HOST", global = true)]
    pub host: Option<String>,

    /// Device password (otherwise resolved from the profile, SPRINKLY_PASSWORD
    /// or the system keyring)
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SPRINKLY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates (https:// hosts only)
    #[arg(long, short = 'k', env = "SPRINKLY_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "SPRINKLY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show controller status (water level, rain delay, last run)
    #[command(alias = "st")]
    Status,

    /// List and control stations (zones)
    #[command(alias = "s")]
    Stations(StationsArgs),

    /// List and run programs
    #[command(alias = "pr")]
    Programs(ProgramsArgs),

    /// Poll controller status repeatedly
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Stations ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StationsArgs {
    #[command(subcommand)]
    pub command: StationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum StationsCommand {
    /// List stations with their current state
    #[command(alias = "ls")]
    List,

    /// Run a station for a number of minutes
    On {
        /// Station index (0-based, as shown by `stations list`)
        index: usize,

        /// Run time in minutes (1-1080)
        #[arg(long, short = 'm')]
        minutes: u32,
    },

    /// Stop a running station
    Off {
        /// Station index (0-based)
        index: usize,
    },
}

// ── Programs ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProgramsArgs {
    #[command(subcommand)]
    pub command: ProgramsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProgramsCommand {
    /// List stored programs
    #[command(alias = "ls")]
    List,

    /// Start a program now
    Run {
        /// Program index (0-based, as shown by `programs list`)
        index: usize,
    },
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between polls
    #[arg(long, short = 'e', default_value = "5")]
    pub every: u64,

    /// Stop after this many polls (runs until interrupted if omitted)
    #[arg(long, short = 'n')]
    pub count: Option<u32>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Display current configuration (secrets masked)
    Show,

    /// Store a profile's password in the system keyring
    SetPassword {
        /// Profile name (defaults to the active profile)
        name: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
