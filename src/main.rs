use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use plancraft::ArtifactKind;
use plancraft::cli::commands::generate::Target;

#[derive(Parser)]
#[command(name = "plancraft")]
#[command(
    version,
    about = "AI-driven requirements elicitation and system design generator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize plancraft in the current directory
    Init {
        #[arg(long, short, help = "Overwrite existing project config")]
        force: bool,
    },

    /// Create a new project
    New {
        #[arg(help = "Project name")]
        name: String,
        #[arg(help = "Short description of what the project should do")]
        description: String,
        #[arg(long, short, help = "Start the requirements session right away")]
        gather: bool,
    },

    /// Run the interactive requirements session for a project
    Gather {
        #[arg(help = "Project ID")]
        id: i64,
        #[arg(long, short, help = "Replace existing requirements")]
        force: bool,
    },

    /// List projects
    List {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },

    /// Show a project with its requirements and artifacts
    Show {
        #[arg(help = "Project ID")]
        id: i64,
        #[arg(long, short, help = "Print only the latest artifact of this kind")]
        artifact: Option<ArtifactKind>,
        #[arg(long, help = "Print artifacts in full instead of a preview")]
        full: bool,
    },

    /// Generate design artifacts from stored requirements
    Generate {
        #[arg(help = "Project ID")]
        id: i64,
        #[arg(
            default_value = "complete_design",
            help = "Artifact kind, or 'all' for every individual artifact"
        )]
        target: Target,
    },

    /// Delete a project and everything stored for it
    Delete {
        #[arg(help = "Project ID")]
        id: i64,
        #[arg(long, short, help = "Skip confirmation")]
        yes: bool,
    },

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
        #[arg(short = 'g', long, help = "Show global config file only")]
        global: bool,
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json"
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
        eprintln!("\x1b[31mplancraft encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Backtrace when RUST_BACKTRACE=1
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
        "warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    use plancraft::cli::commands;

    match cli.command {
        Commands::Init { force } => commands::init::run(force)?,
        Commands::New {
            name,
            description,
            gather,
        } => commands::new::run(&name, &description, gather)?,
        Commands::Gather { id, force } => commands::gather::run(id, force)?,
        Commands::List { format } => commands::list::run(&format)?,
        Commands::Show { id, artifact, full } => commands::show::run(id, artifact, full)?,
        Commands::Generate { id, target } => commands::generate::run(id, target)?,
        Commands::Delete { id, yes } => commands::delete::run(id, yes)?,
        Commands::Config { action } => match action {
            ConfigAction::Show { global, format } => commands::config::show(global, &format)?,
            ConfigAction::Path => commands::config::path()?,
            ConfigAction::Init { global, force } => {
                if global {
                    commands::config::init_global(force)?;
                } else {
                    commands::config::init_project(force)?;
                }
            }
        },
    }

    Ok(())
}
