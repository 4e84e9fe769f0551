use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "lazydi")]
#[command(about = "Resolve lazily evaluated configuration paths")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one configuration path and print its value
    Get {
        /// Dotted key path, e.g. server.port
        path: String,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print the whole configuration tree
    Dump {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Configuration file (.yaml, .yml or .json)
    #[arg(short, long)]
    file: Option<PathBuf>,
    /// Override a path before resolving (key.path=value, value parsed as YAML)
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,
    /// Whole-tree fallback used when no file is loaded (parsed as YAML)
    #[arg(long)]
    fallback: Option<String>,
    /// Print JSON instead of YAML
    #[arg(long)]
    json: bool,
}

impl From<SourceArgs> for cli::SourceOptions {
    fn from(args: SourceArgs) -> Self {
        cli::SourceOptions {
            file: args.file,
            overrides: args.set,
            fallback: args.fallback,
            json: args.json,
        }
    }
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Get { path, source } => cli::get::run(&path, source.into()),
        Commands::Dump { source } => cli::dump::run(source.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
