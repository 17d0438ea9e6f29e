//! CLI argument definitions.
//!
//! All clap derive structs for `swanclock` command-line parsing.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::config::DurationUnit;
use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Countdown with a gated restart code.
#[derive(Parser, Debug)]
#[command(name = "swanclock", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all diagnostic output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "SWANCLOCK_COLOR")]
    pub color: ColorChoice,

    /// Diagnostic log format.
    #[arg(long, default_value = "human", global = true, env = "SWANCLOCK_LOG_FORMAT")]
    pub log_format: LogFormat,
}

// ============================================================================
// Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the countdown and read restart codes from stdin.
    Run(RunArgs),

    /// Show how duration strings are interpreted.
    Parse(ParseArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

/// Arguments for `run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Start, attention and warning durations, in that order (e.g. `108:00 04:00 00:10`).
    #[arg(short, long, num_args = 1..=3, value_name = "DURATION")]
    pub timer: Vec<String>,

    /// Start duration; overrides the first `--timer` value.
    #[arg(long, env = "SWANCLOCK_START", value_name = "DURATION")]
    pub start: Option<String>,

    /// Attention threshold; overrides the second `--timer` value.
    #[arg(long, env = "SWANCLOCK_ATTENTION", value_name = "DURATION")]
    pub attention: Option<String>,

    /// Warning threshold; overrides the third `--timer` value.
    #[arg(long, env = "SWANCLOCK_WARNING", value_name = "DURATION")]
    pub warning: Option<String>,

    /// How bare numbers and separators are read.
    #[arg(long, default_value = "seconds", env = "SWANCLOCK_UNIT")]
    pub unit: DurationUnit,

    /// Where the countdown is shown.
    #[arg(long, default_value = "terminal", env = "SWANCLOCK_DISPLAY")]
    pub display: DisplayMode,

    /// Write JSONL lifecycle events to this file.
    #[arg(long, env = "SWANCLOCK_EVENTS_FILE")]
    pub events_file: Option<PathBuf>,

    /// Serve Prometheus metrics on 127.0.0.1 at this port.
    #[arg(long, env = "SWANCLOCK_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    /// Do not narrate gate decisions on stdout.
    #[arg(short, long, env = "SWANCLOCK_SILENT")]
    pub silent: bool,

    /// Tick period (humantime syntax).
    #[arg(long, default_value = "1s", value_parser = humantime::parse_duration, hide = true)]
    pub tick_interval: Duration,

    /// Play farewells without pauses.
    #[arg(long, hide = true)]
    pub no_pacing: bool,
}

/// Arguments for `parse`.
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Duration strings to interpret.
    #[arg(required = true, value_name = "DURATION")]
    pub values: Vec<String>,

    /// How bare numbers and separators are read.
    #[arg(long, default_value = "seconds")]
    pub unit: DurationUnit,
}

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Color when writing to a terminal and `NO_COLOR` is unset.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

impl ColorChoice {
    /// Decides whether to emit ANSI escapes on a stream.
    #[must_use]
    pub fn resolve(self, is_terminal: bool) -> bool {
        match self {
            Self::Auto => is_terminal && std::env::var_os("NO_COLOR").is_none(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Display sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DisplayMode {
    /// Coloured lines on stderr.
    #[default]
    Terminal,
    /// No display.
    #[value(name = "none")]
    Off,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

// ============================================================================
// Tests
// ============================================================================
