//! Fauna CLI - play in the terminal or run input scripts headless.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Fauna - explore, build and befriend creatures
#[derive(Parser, Debug)]
#[command(name = "fauna")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play interactively in the terminal
    Play {
        /// World seed (overrides the config file)
        #[arg(short, long)]
        seed: Option<u64>,

        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Save slot file, read at start and written on exit
        #[arg(long, default_value = "fauna.sav")]
        save: PathBuf,
    },

    /// Run a button script headless and print the final frame
    Script {
        /// Script file, or the script itself with --inline
        input: String,

        /// Treat INPUT as the script text instead of a path
        #[arg(short, long)]
        inline: bool,

        /// World seed (overrides the config file)
        #[arg(short, long)]
        seed: Option<u64>,

        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Write the in-game save slot to this file afterwards
        #[arg(long)]
        save: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Play { seed, config, save } => {
            cli::load_config(config.as_deref(), seed).and_then(|config| cli::play::execute(config, &save))
        }

        Commands::Script {
            input,
            inline,
            seed,
            config,
            format,
            save,
        } => cli::load_config(config.as_deref(), seed).and_then(|config| {
            cli::script::execute(config, &input, inline, format, save.as_deref())
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
