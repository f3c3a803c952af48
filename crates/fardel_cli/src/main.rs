//! Fardel CLI: the command-line interface for the Fardel bundler.
//!
//! Provides `fardel build` for compiling a project's declared bundles into
//! content-addressed artifacts under the configured output directory.

#![warn(missing_docs)]

mod build;
mod pipeline;

use std::process;

use clap::{Parser, Subcommand};

/// Fardel, a content-addressed module bundler.
#[derive(Parser, Debug)]
#[command(name = "fardel", version, about = "Fardel module bundler")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a custom `fardel.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile every declared bundle and write the artifacts.
    Build(BuildArgs),
}

/// Arguments for the `fardel build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Output directory, overriding `output.dir` from `fardel.toml`.
    #[arg(short, long)]
    pub out: Option<String>,

    /// Worker pool size (default: available parallelism).
    #[arg(short, long)]
    pub workers: Option<usize>,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Build(ref args) => build::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
