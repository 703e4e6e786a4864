//! CLI argument definitions
//!
//! All Clap derive structs for `namedeck` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::device::DeviceClass;

// ============================================================================
// Root CLI
// ============================================================================

/// Bilingual name-origin flashcards with speech playback.
#[derive(Parser, Debug)]
#[command(name = "namedeck", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "NAMEDECK_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true, env = "NAMEDECK_LOG_FORMAT")]
    pub log_format: LogFormatArg,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the deck as static HTML.
    Render(RenderArgs),

    /// Serve the deck and the speech endpoint over HTTP.
    Serve(ServeArgs),

    /// Speak a phrase through the system speech engine.
    Speak(SpeakArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version and build information.
    Version(VersionArgs),
}

// ============================================================================
// Shared Arguments
// ============================================================================

/// Configuration file and data source overrides.
#[derive(Args, Debug, Default, Clone)]
pub struct SourceArgs {
    /// Path to YAML configuration file.
    #[arg(short, long, env = "NAMEDECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Catalog source (path or URL), overriding the configuration.
    #[arg(long)]
    pub catalog: Option<String>,

    /// Origin map source (path or URL), overriding the configuration.
    #[arg(long)]
    pub origins: Option<String>,

    /// Category map source (path or URL), overriding the configuration.
    #[arg(long)]
    pub categories: Option<String>,

    /// Directory relative data sources are resolved against.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

// ============================================================================
// Render / Serve / Speak
// ============================================================================

/// Arguments for `render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Configuration and data sources.
    #[command(flatten)]
    pub source: SourceArgs,

    /// Layout to render.
    #[arg(long, default_value = "large")]
    pub device: DeviceArg,

    /// Page to show (0-based).
    #[arg(long, default_value_t = 0)]
    pub page: usize,

    /// What to emit.
    #[arg(long, default_value = "document")]
    pub fragment: Fragment,

    /// Document title.
    #[arg(long, default_value = crate::deck::DEFAULT_TITLE)]
    pub title: String,

    /// Output file (stdout when omitted).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Configuration and data sources.
    #[command(flatten)]
    pub source: SourceArgs,

    /// Bind address as `[host:]port`.
    #[arg(long, default_value = crate::server::DEFAULT_BIND, env = "NAMEDECK_HTTP")]
    pub http: String,

    /// Directory card images and icons are served from.
    ///
    /// Defaults to the catalog's directory when the catalog is a local file.
    #[arg(long)]
    pub static_root: Option<PathBuf>,

    /// Document title.
    #[arg(long, default_value = crate::deck::DEFAULT_TITLE)]
    pub title: String,
}

/// Arguments for `speak`.
#[derive(Args, Debug)]
pub struct SpeakArgs {
    /// Text to speak.
    #[arg(required = true)]
    pub text: Vec<String>,

    /// Language tag (defaults to the native language).
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Path to YAML configuration file.
    #[arg(short, long, env = "NAMEDECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Reading table replacing the embedded one.
    #[arg(long)]
    pub readings: Option<PathBuf>,

    /// Print the transliterated text instead of speaking it.
    #[arg(long)]
    pub dry_run: bool,
}

// ============================================================================
// Completions / Version
// ============================================================================

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
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormatArg {
    /// Human-readable lines.
    #[default]
    Human,
    /// Newline-delimited JSON.
    Json,
}

/// Layout selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DeviceArg {
    /// Desktop layout.
    #[default]
    Large,
    /// Mobile layout.
    Small,
}

impl From<DeviceArg> for DeviceClass {
    fn from(arg: DeviceArg) -> Self {
        match arg {
            DeviceArg::Large => Self::Large,
            DeviceArg::Small => Self::Small,
        }
    }
}

/// Rendered output selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Fragment {
    /// Complete HTML document.
    #[default]
    Document,
    /// Sheet markup only.
    Sheets,
    /// Pager markup only.
    Pager,
    /// Joined cards as JSON.
    Cards,
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
