//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Slice-and-dice treemaps of directories and paper collections
#[derive(Parser, Debug)]
#[command(name = "treetile")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Config file layered over the global one
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Seed for node colors
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Width of the treemap area
    #[arg(long, global = true)]
    pub width: Option<i32>,

    /// Height of the treemap area
    #[arg(long, global = true)]
    pub height: Option<i32>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Treemap of a file or directory, weighted by file size
    Fs {
        /// File or directory to scan
        #[arg(value_hint = ValueHint::AnyPath)]
        path: PathBuf,
        #[command(subcommand)]
        action: Action,
    },

    /// Treemap of the paper dataset, weighted by citations
    Papers {
        /// CSV file (default: papers.data_file setting)
        #[arg(value_hint = ValueHint::FilePath)]
        csv: Option<PathBuf>,
        /// Do not group papers by year
        #[arg(long)]
        no_by_year: bool,
        #[command(subcommand)]
        action: Action,
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

/// What to do with a loaded tree
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Print the displayed rectangles with their colors
    Layout {
        /// Expand every internal node before laying out
        #[arg(long)]
        expand_all: bool,
    },
    /// Print the path of the node at a position
    Hit {
        x: i32,
        y: i32,
        /// Expand every internal node before hit testing
        #[arg(long)]
        expand_all: bool,
    },
    /// Print the hierarchy with weights
    Tree,
    /// Lay out and validate invariants and tiling
    Check,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Show global config file path
    Path,
}
