use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ilpsched::{parse_block, IlpEstimator, DEFAULT_RESOURCES};
use std::fs;
use std::path::PathBuf;

/// ILP estimation for straight-line basic blocks
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a basic block and print its schedule report
    Analyze {
        /// Block description file
        input: PathBuf,

        /// Number of interchangeable execution resources
        #[arg(short, long, default_value_t = DEFAULT_RESOURCES)]
        resources: u32,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt().with_env_filter(log_level).init();

    match cli.command {
        Commands::Analyze {
            input,
            resources,
            json,
        } => {
            let source = fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let name = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "block".to_string());

            let block = parse_block(&name, &source)
                .with_context(|| format!("failed to parse {}", input.display()))?;
            let estimator = IlpEstimator::new(resources)?;
            let analysis = estimator.analyze(&block)?;
            let report = analysis.report();

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                report.print();
            }
        }
    }

    Ok(())
}
