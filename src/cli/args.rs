//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::application::services::TreeQuery;
use crate::domain::CountPolicy;

/// Composite trees from TOML documents: walk, count, search and sum them
#[derive(Parser, Debug)]
#[command(name = "comptree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global one
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a tree document as a tree
    Show {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print values in pre-order
    Walk {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Only leaf values
        #[arg(long)]
        leaves: bool,
    },

    /// Count values matching a filter
    Count {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// First value matching a filter
    First {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Sum of leaf values
    Sum {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Multiply every value before summing
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        scale: i64,
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

/// Value filter shared by `count` and `first`.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Lower bound (inclusive)
    #[arg(long, allow_negative_numbers = true)]
    pub min: Option<i64>,
    /// Upper bound (inclusive)
    #[arg(long, allow_negative_numbers = true)]
    pub max: Option<i64>,
    /// Only even values
    #[arg(long)]
    pub even: bool,
    /// Override the configured traversal policy
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,
}

impl FilterArgs {
    pub fn query(&self) -> TreeQuery {
        TreeQuery {
            min: self.min,
            max: self.max,
            even: self.even,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyArg {
    LeafOnly,
    SelfCountsIfChildless,
}

impl From<PolicyArg> for CountPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::LeafOnly => CountPolicy::LeafOnly,
            PolicyArg::SelfCountsIfChildless => CountPolicy::SelfCountsIfChildless,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a commented config template
    Template,
    /// Show the global config file location
    Path,
}
