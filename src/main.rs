use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crapcov::cli::{self, CoverageArgs, ScoreArgs};

/// crapcov: CRAP scores from complexity counts and xccov or llvm-cov coverage.
#[derive(Parser)]
#[command(name = "crapcov", version, about)]
struct Cli {
    /// Config file (default: ./.crapcov.yml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score code units and print the report, riskiest first.
    Score(ScoreArgs),

    /// Show the measured coverage of a line range in one source file.
    Coverage {
        /// Source file path.
        file: PathBuf,

        /// First line, 1-based.
        start_line: u32,

        /// Last line, inclusive.
        end_line: u32,

        #[command(flatten)]
        coverage: CoverageArgs,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = cli::load_config(cli.config.as_deref())?;

    let output = match cli.command {
        Commands::Score(args) => {
            let opts = args.resolve(&config)?;
            cli::cmd_score(&opts)?
        }
        Commands::Coverage {
            file,
            start_line,
            end_line,
            coverage,
        } => {
            let opts = coverage.resolve(&config)?;
            cli::cmd_coverage(&opts, &file, start_line, end_line)?
        }
    };

    print!("{output}");
    Ok(())
}
