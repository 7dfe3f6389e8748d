mod commands;
mod output;

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::ConfigArgs;

#[derive(Parser)]
#[command(
    name = "stmtchunk",
    version,
    about = "Normalize bank statements (PDF, CSV, Excel) into retrieval-ready chunks"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chunk a single statement file
    Process {
        /// Path to a .pdf, .csv, .xlsx or .xls statement
        input_file: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the result as JSON to a file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Also write the chunks as a Markdown document
        #[arg(long, value_name = "FILE")]
        markdown: Option<PathBuf>,
    },
    /// Chunk several statement files in parallel
    Batch {
        /// Statement files to process
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        config: ConfigArgs,

        /// Write the JSON report array to a file instead of stdout
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Show how each table row was classified and which parse mode wins
    Inspect {
        /// Path to a .pdf, .csv, .xlsx or .xls statement
        input_file: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Process {
            input_file,
            config,
            output,
            out,
            markdown,
        } => commands::process::run(input_file, &config, &output, out, markdown),
        Commands::Batch { files, config, out } => commands::batch::run(files, &config, out),
        Commands::Inspect {
            input_file,
            config,
            output,
        } => commands::inspect::run(input_file, &config, &output),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
