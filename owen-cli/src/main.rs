//! owenctl - operator CLI for the OWEN engagement data layer
//!
//! Inspects tenants' initiatives and employee profiles and manages the
//! `~/.owen/config.toml` file that lists every tenant's databases.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use owen_core::OwenConfig;
use tracing::debug;

mod commands;
mod config;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "owenctl",
    author,
    version,
    about = "Inspect and maintain OWEN tenant data (initiatives, employee profiles)",
    long_about = "Talks to each tenant's relational and graph databases as listed in \
                  ~/.owen/config.toml (or $OWEN_CONFIG)."
)]
struct Cli {
    /// Debug logging unless RUST_LOG says otherwise
    #[arg(long, global = true)]
    debug: bool,

    /// Export spans over OTLP (needs the telemetry feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initiatives: get, list, complete, delete, types
    Initiative(commands::initiative::InitiativeArgs),
    /// Employee profiles: show, languages
    Employee(commands::employee::EmployeeArgs),
    /// Manage owenctl configuration (init, path, show, validate)
    Config(config::ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

fn load_env() {
    // local .env first so it wins over the user-wide one
    let _ = dotenvy::dotenv();
    let user_env = OwenConfig::config_dir().join(".env");
    if user_env.exists() {
        let _ = dotenvy::from_path(&user_env);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    let cli = Cli::parse();

    let level = OwenConfig::load()
        .ok()
        .and_then(|config| config.logging)
        .and_then(|logging| logging.level);
    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
        level,
    })
    .ok();
    debug!(command = ?cli.command, "owenctl starting");

    let result = match cli.command {
        Commands::Initiative(args) => commands::run_initiative(args).await,
        Commands::Employee(args) => commands::run_employee(args).await,
        Commands::Config(args) => config::run_config(args),
        Commands::Completions(args) => run_completions(args),
    };

    tracing_setup::shutdown_otel();
    result
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
