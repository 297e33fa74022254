//! StripeGate CLI
//!
//! Command-line tool for splitting files into gated erasure-coded shard sets.
//!
//! # Commands
//! - `info` - Show the codec profile and chunk sizing
//! - `encode` - Split a file into shard files
//! - `decode` - Rebuild a file from the shard files present
//! - `repair` - Recreate missing shard files
//! - `config` - Show or create the configuration file
//!
//! # Configuration
//! Config file: ~/.stripegate/config.toml
//! Without a config file, STRIPEGATE_K / STRIPEGATE_M select the profile.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use stripegate_core::{ReedSolomonProvider, SharedProvider, StripeCodec};

mod commands;
mod config;
mod layout;
mod symbols;

use commands::{decode, encode, info, repair};
use layout::ShardDir;

#[derive(Parser)]
#[command(name = "stripegate")]
#[command(about = "Gated erasure-coded shard sets")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.stripegate/config.toml)
    #[arg(long, global = true, env = "STRIPEGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the codec profile and chunk sizing
    Info {
        /// Stripe width in bytes to compute the chunk size for
        #[arg(short, long)]
        width: Option<usize>,
    },

    /// Split a file into shard files
    Encode {
        /// File to encode
        input: PathBuf,

        /// Directory for the shard files
        #[arg(short, long, default_value = "shards")]
        out_dir: PathBuf,
    },

    /// Rebuild a file from the shard files present
    Decode {
        /// Directory holding the shard files
        dir: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Recreate missing shard files in place
    Repair {
        /// Directory holding the shard files
        dir: PathBuf,
    },

    /// Show or edit configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Show config file path
    Path,
    /// Create default config file
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cfg = config::load_config(cli.config.as_deref());

    if let Commands::Config { command } = cli.command {
        return handle_config_command(command, &cfg);
    }

    let shared: Arc<SharedProvider> = SharedProvider::from_provider(ReedSolomonProvider::new()?);
    let codec = StripeCodec::new(config::profile_params(&cfg, cli.config.as_deref()), &shared)?;

    match cli.command {
        Commands::Info { width } => {
            info(&codec, info::InfoConfig { width })?;
        }

        Commands::Encode { input, out_dir } => {
            let layout = ShardDir::new(out_dir, cfg.output.clone());
            encode(&codec, &layout, encode::EncodeConfig { input })?;
        }

        Commands::Decode { dir, output } => {
            let layout = ShardDir::new(dir, cfg.output.clone());
            decode(&codec, &layout, decode::DecodeConfig { output })?;
        }

        Commands::Repair { dir } => {
            let layout = ShardDir::new(dir, cfg.output.clone());
            repair(&codec, &layout)?;
        }

        Commands::Config { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Handle config subcommands
fn handle_config_command(
    command: Option<ConfigCommands>,
    cfg: &config::StripeGateConfig,
) -> Result<()> {
    use console::style;

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("{}", style("StripeGate Configuration").bold().underlined());
            println!();
            println!("{}", style("[profile]").cyan());
            println!("  k = {}", cfg.profile.k);
            println!("  m = {}", cfg.profile.m);
            for (key, value) in &cfg.profile.extra {
                println!("  {} = \"{}\"", key, value);
            }
            println!();
            println!("{}", style("[output]").cyan());
            println!("  shard_prefix = \"{}\"", cfg.output.shard_prefix);
            println!("  manifest_name = \"{}\"", cfg.output.manifest_name);
            println!();

            if let Ok(path) = config::config_file_path() {
                println!("{} {}", style("Config file:").dim(), path.display());
                if !path.exists() {
                    println!(
                        "{} Run '{}' to create it",
                        style("(not created yet)").yellow(),
                        style("stripegate config init").green()
                    );
                }
            }
        }

        Some(ConfigCommands::Path) => {
            if let Ok(path) = config::config_file_path() {
                println!("{}", path.display());
            }
        }

        Some(ConfigCommands::Init { force }) => {
            let path = config::config_file_path()?;
            if path.exists() && !force {
                println!(
                    "{} Config file already exists at {}",
                    style(symbols::WARN).yellow(),
                    path.display()
                );
                println!("Use --force to overwrite");
                return Ok(());
            }

            let path = config::save_config(&config::StripeGateConfig::default())?;
            println!(
                "{} Config file created at {}",
                style(symbols::CHECK).green(),
                path.display()
            );
        }
    }

    Ok(())
}
