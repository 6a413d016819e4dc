use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::fetch::DEFAULT_API_URL;

#[derive(Parser, Debug)]
#[command(name = "cocktails-to-sqlite")]
#[command(version, about = "Load TheCocktailDB recipes into SQLite and query them")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Which analytical queries to run
#[derive(Args, Debug, Clone)]
pub struct QuerySelection {
    /// Only run these queries (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub include: Option<Vec<String>>,

    /// Skip these queries (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch (if needed), load into SQLite and print the report
    Sync {
        /// SQLite database path
        #[arg(env = "COCKTAILS_DB", default_value = "drinksdb")]
        output_db: PathBuf,

        /// Refetch listings even if cached
        #[arg(short, long)]
        force: bool,

        /// Drop existing tables before loading
        #[arg(long)]
        fresh: bool,

        /// Custom cache directory
        #[arg(short, long)]
        cache_dir: Option<PathBuf>,

        /// API base URL
        #[arg(long, env = "COCKTAILDB_API_URL", default_value = DEFAULT_API_URL)]
        api_url: String,

        #[command(flatten)]
        queries: QuerySelection,

        /// Show the full-screen progress interface
        #[arg(long)]
        tui: bool,
    },

    /// Download per-letter listings into the cache
    Fetch {
        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Refetch listings even if cached
        #[arg(short, long)]
        force: bool,

        /// API base URL
        #[arg(long, env = "COCKTAILDB_API_URL", default_value = DEFAULT_API_URL)]
        api_url: String,
    },

    /// Load listings from a local directory into SQLite
    Load {
        /// Directory containing <letter>.json listings
        input_dir: PathBuf,

        /// SQLite database path
        #[arg(env = "COCKTAILS_DB", default_value = "drinksdb")]
        output_db: PathBuf,

        /// Drop existing tables before loading
        #[arg(long)]
        fresh: bool,
    },

    /// Run the analytical queries against an existing database
    Report {
        /// SQLite database path
        #[arg(env = "COCKTAILS_DB", default_value = "drinksdb")]
        db: PathBuf,

        #[command(flatten)]
        queries: QuerySelection,
    },

    /// Drop the drinks, ingredients and measurements tables
    Drop {
        /// SQLite database path
        #[arg(env = "COCKTAILS_DB", default_value = "drinksdb")]
        db: PathBuf,
    },

    /// List the analytical queries
    ListQueries,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sync_defaults() {
        let cli = Cli::try_parse_from(["cocktails-to-sqlite", "sync", "bar.db"]).unwrap();
        match cli.command {
            Commands::Sync {
                output_db,
                force,
                fresh,
                queries,
                tui,
                ..
            } => {
                assert_eq!(output_db, PathBuf::from("bar.db"));
                assert!(!force && !fresh && !tui);
                assert!(queries.include.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_report_include() {
        let cli = Cli::try_parse_from([
            "cocktails-to-sqlite",
            "report",
            "bar.db",
            "--include",
            "lemon-whiskey,sambuca-15g",
        ])
        .unwrap();
        match cli.command {
            Commands::Report { queries, .. } => assert_eq!(
                queries.include,
                Some(vec!["lemon-whiskey".to_string(), "sambuca-15g".to_string()])
            ),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
