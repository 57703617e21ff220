//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use anvil_core::domain::PackageManager;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "anvil",
    bin_name = "anvil",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Compose a project from a base template and layered addons",
    long_about = "Anvil copies a base template, merges each selected addon \
                  on top of it file by file, and moves the finished project \
                  into place in one step.",
    after_help = "EXAMPLES:\n\
        \x20 anvil new shop --base react-with-ts --addon tailwind --addon shadcn\n\
        \x20 anvil new api  --base next-with-ts  --addon prisma --param better-auth:DATABASE_PROVIDER=postgresql --addon better-auth\n\
        \x20 anvil list\n\
        \x20 anvil completions bash > /usr/share/bash-completion/completions/anvil",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new project from a base template and addons.
    #[command(
        visible_alias = "n",
        about = "Create a new project",
        after_help = "EXAMPLES:\n\
            \x20 anvil new shop --base react-with-ts --addon tailwind\n\
            \x20 anvil new shop --base react-with-ts --addon tailwind,shadcn --dry-run\n\
            \x20 anvil new ../app --base next-with-ts --package-manager pnpm"
    )]
    New(NewArgs),

    /// List base templates and addons.
    #[command(
        visible_alias = "ls",
        about = "List available templates",
        after_help = "EXAMPLES:\n\
            \x20 anvil list\n\
            \x20 anvil list --format json\n\
            \x20 anvil list --templates ./templates"
    )]
    List(ListArgs),

    /// Initialise an Anvil configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 anvil init           # default location\n\
            \x20 anvil init --local   # .anvil.toml in CWD"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 anvil completions bash > ~/.local/share/bash-completion/completions/anvil\n\
            \x20 anvil completions zsh  > ~/.zfunc/_anvil\n\
            \x20 anvil completions fish > ~/.config/fish/completions/anvil.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Anvil configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 anvil config get templates.root\n\
            \x20 anvil config list\n\
            \x20 anvil config path"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `anvil new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project name or path.  A plain name creates `./name`; a path like
    /// `../foo` places the project one level up.
    #[arg(value_name = "NAME", help = "Project name or path")]
    pub name: String,

    /// Base template under `frameworks/`.
    #[arg(
        short = 'b',
        long = "base",
        value_name = "ID",
        help = "Base template (prompted for when omitted)"
    )]
    pub base: Option<String>,

    /// Addons, applied in the order given.
    #[arg(
        short = 'a',
        long = "addon",
        value_name = "ID",
        value_delimiter = ',',
        help = "Addon to apply (repeatable, order matters)"
    )]
    pub addons: Vec<String>,

    /// Framework context for addon lookup.
    #[arg(
        short = 'f',
        long = "framework",
        value_name = "FRAMEWORK",
        help = "Framework used to pick addon variants (default: derived from the base)"
    )]
    pub framework: Option<String>,

    /// Placeholder values for one addon's files.
    #[arg(
        short = 'p',
        long = "param",
        value_name = "ADDON:KEY=VALUE",
        value_parser = parse_addon_param,
        help = "Addon parameter, e.g. better-auth:DATABASE_PROVIDER=postgresql"
    )]
    pub params: Vec<AddonParam>,

    /// Package manager for the install step.
    #[arg(
        long = "package-manager",
        visible_alias = "pm",
        value_name = "PM",
        value_enum,
        help = "Package manager used to install dependencies"
    )]
    pub package_manager: Option<PackageManagerArg>,

    /// Do not run the package manager after generating.
    #[arg(long = "skip-install", help = "Skip installing dependencies")]
    pub skip_install: bool,

    /// Template root directory.
    #[arg(
        short = 't',
        long = "templates",
        value_name = "DIR",
        help = "Template root (default: templates.root from config)"
    )]
    pub templates: Option<PathBuf>,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show the resolved plan without creating")]
    pub dry_run: bool,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip prompts and create immediately"
    )]
    pub yes: bool,
}

/// One `--param ADDON:KEY=VALUE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonParam {
    pub addon: String,
    pub key: String,
    pub value: String,
}

fn parse_addon_param(raw: &str) -> Result<AddonParam, String> {
    let (addon, assignment) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected ADDON:KEY=VALUE, got '{raw}'"))?;
    let (key, value) = assignment
        .split_once('=')
        .ok_or_else(|| format!("expected ADDON:KEY=VALUE, got '{raw}'"))?;

    let (addon, key) = (addon.trim(), key.trim());
    if addon.is_empty() || key.is_empty() {
        return Err(format!("addon and key must not be empty in '{raw}'"));
    }
    Ok(AddonParam {
        addon: addon.to_string(),
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Package managers accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum PackageManagerArg {
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl From<PackageManagerArg> for PackageManager {
    fn from(arg: PackageManagerArg) -> Self {
        match arg {
            PackageManagerArg::Npm => PackageManager::Npm,
            PackageManagerArg::Pnpm => PackageManager::Pnpm,
            PackageManagerArg::Yarn => PackageManager::Yarn,
            PackageManagerArg::Bun => PackageManager::Bun,
        }
    }
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `anvil list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Template root directory.
    #[arg(
        short = 't',
        long = "templates",
        value_name = "DIR",
        help = "Template root (default: templates.root from config)"
    )]
    pub templates: Option<PathBuf>,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One id per line.
    List,
    /// JSON object with `bases` and `addons`.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `anvil init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.anvil.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `anvil completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `anvil config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `templates.root`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
