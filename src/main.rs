use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use jj_split::model::change_summary;
use jj_split::parse_diff;
use jj_split::source::{DiffSource, DirectorySource};

#[derive(Parser)]
#[command(name = "jj-split")]
#[command(about = "Diff engine for splitting changes between two directory snapshots")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the unified diff between two directories
    Diff {
        /// Directory holding the before state
        left: PathBuf,
        /// Directory holding the after state
        right: PathBuf,
    },
    /// Summarize per-file changes in unified diff text
    Stat {
        /// Diff file to read; stdin when omitted
        path: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Diff { left, right } => {
            let source = DirectorySource::new(left, right);
            print!("{}", source.diff()?);
        }
        Commands::Stat { path } => {
            let diff_text = match path {
                Some(path) => fs::read_to_string(path)?,
                None => {
                    let mut buffer = String::new();
                    io::stdin().read_to_string(&mut buffer)?;
                    buffer
                }
            };
            print!("{}", change_summary(&parse_diff(&diff_text)));
        }
    }

    Ok(())
}
