//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Height-balanced search tree engine: stress driver and tree inspection
#[derive(Parser, Debug)]
#[command(name = "avlkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the randomized insert/remove workload
    Run(RunArgs),

    /// Build a tree from keys and print its shape
    Tree {
        /// Keys to insert, in order
        #[arg(required = true, allow_negative_numbers = true)]
        keys: Vec<i64>,
        /// Keys to remove afterwards
        #[arg(short, long, num_args = 1.., allow_negative_numbers = true)]
        remove: Vec<i64>,
        /// Drop every key above this bound afterwards
        #[arg(long, allow_negative_numbers = true)]
        remove_upper: Option<i64>,
    },

    /// Print keys in ascending order
    Values {
        /// Keys to insert
        #[arg(required = true, allow_negative_numbers = true)]
        keys: Vec<i64>,
    },

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

/// Overrides for the driver settings; unset flags keep the loaded values.
#[derive(clap::Args, Debug, Default)]
pub struct RunArgs {
    /// Distinct keys inserted per cycle
    #[arg(long)]
    pub max_count: Option<usize>,
    /// Keys surviving the removal phase
    #[arg(long)]
    pub min_count: Option<usize>,
    /// Number of rounds
    #[arg(long)]
    pub cycles: Option<usize>,
    /// Keys above this bound are dropped after each round
    #[arg(long, allow_negative_numbers = true)]
    pub upper_bound: Option<i64>,
    /// Permutation seed
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Print a template config file
    Template,
    /// Show config file locations
    Path,
}
