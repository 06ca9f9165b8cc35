//! Blockflow CLI
//!
//! Developer tool for compiling and inspecting visual block programs.

use anyhow::Result;
use blockflow_core::Language;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// Blockflow - visual block programs to C, C++, Python and Java
#[derive(Parser)]
#[command(name = "blockflow")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "blockflow.yaml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new Blockflow project
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,

        /// Project name (defaults to directory name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Compile programs to source code
    Compile {
        /// Program file or name under the programs directory (defaults to all)
        program: Option<String>,

        /// Target language (c, cpp, python, java)
        #[arg(short, long)]
        language: Option<Language>,

        /// Print generated source instead of writing files
        #[arg(long)]
        stdout: bool,
    },

    /// Check a program without generating code
    Validate {
        /// Program file or name under the programs directory
        program: String,
    },

    /// List supported target languages
    Languages,

    /// Show the block palette for a language
    Blocks {
        /// Target language
        #[arg(short, long, default_value = "python")]
        language: Language,
    },

    /// Print the intermediate representation of a program
    Ir {
        /// Program file or name under the programs directory
        program: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // Logs go to stderr; stdout carries generated code and JSON.
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Init { path, name } => {
            commands::init::run(&path, name.as_deref()).await?;
        }
        Commands::Compile {
            program,
            language,
            stdout,
        } => {
            commands::compile::run(&cli.config, program.as_deref(), language, stdout).await?;
        }
        Commands::Validate { program } => {
            commands::validate::run(&cli.config, &program).await?;
        }
        Commands::Languages => {
            commands::inspect::languages().await?;
        }
        Commands::Blocks { language } => {
            commands::inspect::blocks(language).await?;
        }
        Commands::Ir { program } => {
            commands::inspect::ir(&cli.config, &program).await?;
        }
    }

    Ok(())
}
