//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::MergeMode;

/// Grocery inventory ledger: track stock per item and brand, list it sorted, export a printable sheet
#[derive(Parser, Debug)]
#[command(name = "groc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Directory holding the local .groc.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add an item, or merge into an existing item/brand
    Add {
        /// Item name
        item: String,

        /// Available quantity (whole number, may be negative)
        #[arg(allow_negative_numbers = true)]
        available: String,

        /// Brand name
        #[arg(short, long, default_value = "")]
        brand: String,

        /// How to treat an existing item/brand: add to it or replace it
        /// (default from config)
        #[arg(short, long)]
        mode: Option<MergeMode>,
    },

    /// Show the list sorted by item, then brand
    List,

    /// Remove all items and the stored data
    Clear {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Export the list as a landscape PDF
    Export {
        /// Output file (default: export.file_name from config, in the -C directory or cwd)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Show storage location and item count
    Info,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show config paths
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_add_with_negative_quantity_when_parse_then_kept_as_text() {
        let cli = Cli::try_parse_from(["groc", "add", "Milk", "-2", "--brand", "A"]).unwrap();
        match cli.command {
            Some(Commands::Add {
                item,
                available,
                brand,
                mode,
            }) => {
                assert_eq!(item, "Milk");
                assert_eq!(available, "-2");
                assert_eq!(brand, "A");
                assert_eq!(mode, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn given_update_mode_when_parse_then_replace() {
        let cli = Cli::try_parse_from(["groc", "add", "Milk", "3", "-m", "update"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Add {
                mode: Some(MergeMode::Replace),
                ..
            })
        ));
    }

    #[test]
    fn given_unknown_mode_when_parse_then_error() {
        assert!(Cli::try_parse_from(["groc", "add", "Milk", "3", "-m", "bogus"]).is_err());
    }

    #[test]
    fn given_repeated_verbose_when_parse_then_counted() {
        let cli = Cli::try_parse_from(["groc", "-vv", "list"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
