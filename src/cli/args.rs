//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::CONFIG_FILE;

/// Compile MDX content files into cached route modules
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path, searched upward from the current directory
    #[arg(short = 'C', long, global = true, default_value = CONFIG_FILE, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn common(&self) -> &CommonArgs {
        match &self.command {
            Commands::Build { common, .. }
            | Commands::Compile { common, .. }
            | Commands::Watch { common }
            | Commands::Clean { common } => common,
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Scan routes, compile content routes and print the route table
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        args: BuildArgs,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Compile a single content file
    #[command(visible_alias = "c")]
    Compile {
        #[command(flatten)]
        args: CompileArgs,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Build, then recompile content files as they change
    #[command(visible_alias = "w")]
    Watch {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Remove the cache directory
    Clean {
        #[command(flatten)]
        common: CommonArgs,
    },
}

/// Flags shared by every subcommand
#[derive(clap::Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

/// Build command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Write the route table to a file instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Pretty-print the route table JSON
    #[arg(short, long)]
    pub pretty: bool,
}

/// Compile command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct CompileArgs {
    /// Content file (relative to the current directory or the content root)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub file: PathBuf,

    /// Print the module text instead of its cache path
    #[arg(long)]
    pub print: bool,
}
