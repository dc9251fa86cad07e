use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gridsmith::cli::commands::generate::GenerateArgs;

#[derive(Parser)]
#[command(name = "gridsmith")]
#[command(
    version,
    about = "AI-assisted tile map generator: describe a place, get a validated grid"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a tile grid from a free-text place description
    Generate {
        #[arg(help = "What to build, e.g. \"a small tavern with a hidden cellar\"")]
        description: String,
        #[arg(long, help = "Grid width in cells (4-64)")]
        width: Option<usize>,
        #[arg(long, help = "Grid height in cells (4-64)")]
        height: Option<usize>,
        #[arg(long, help = "Archetype hint; see `gridsmith archetypes`")]
        archetype: Option<String>,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
        #[arg(long, help = "Model override")]
        model: Option<String>,
        #[arg(long, help = "Completion endpoint base URL override")]
        api_base: Option<String>,
        #[arg(long, help = "API credential; falls back to GRIDSMITH_API_KEY / OPENAI_API_KEY")]
        api_key: Option<String>,
        #[arg(long, help = "Attempt budget override (including the first attempt)")]
        max_attempts: Option<usize>,
    },

    /// List the archetype catalog and the checks each archetype carries
    Archetypes,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mgridsmith encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }

        eprintln!("\n\x1b[33mPlease report this issue at:\x1b[0m");
        eprintln!("  https://github.com/gridsmith/gridsmith/issues");
        eprintln!();

        // Default hook prints the backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Generate {
            description,
            width,
            height,
            archetype,
            format,
            model,
            api_base,
            api_key,
            max_attempts,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(gridsmith::cli::commands::generate::run(GenerateArgs {
                description,
                width,
                height,
                archetype,
                format,
                model,
                api_base,
                api_key,
                max_attempts,
            }))?;
        }
        Commands::Archetypes => {
            gridsmith::cli::commands::archetypes::run()?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                gridsmith::cli::commands::config::show(&format)?;
            }
            ConfigAction::Path => {
                gridsmith::cli::commands::config::path()?;
            }
            ConfigAction::Init { global, force } => {
                if global {
                    gridsmith::cli::commands::config::init_global(force)?;
                } else {
                    gridsmith::cli::commands::config::init_project()?;
                }
            }
        },
    }

    Ok(())
}
