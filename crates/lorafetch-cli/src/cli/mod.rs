//! CLI for lorafetch.

mod commands;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use lorafetch_core::config;
use lorafetch_core::Credentials;
use std::path::PathBuf;

use commands::{run_cache_dir, run_completions, run_fetch, run_inspect, run_resolve};

/// Top-level CLI for lorafetch.
#[derive(Debug, Parser)]
#[command(name = "lorafetch")]
#[command(about = "Resolve, cache and inspect LoRA safetensors files by URL", long_about = None)]
pub struct Cli {
    /// Cache directory (overrides `cache_root` in config.toml).
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Show the provider, source and cache path a URL resolves to (no download).
    Resolve {
        /// Hugging Face, Civitai, Replicate or direct safetensors URL.
        url: String,
    },

    /// Download a URL into the cache if missing and print the local path.
    Fetch {
        /// Hugging Face, Civitai, Replicate or direct safetensors URL.
        url: String,
    },

    /// Fetch a URL, load it and list its tensors.
    Inspect {
        /// Hugging Face, Civitai, Replicate or direct safetensors URL.
        url: String,
        /// Print at most N tensors.
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },

    /// Print the effective cache directory.
    CacheDir,

    /// Generate shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_init()?;
        if cli.cache_root.is_some() {
            cfg.cache_root = cli.cache_root;
        }
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Resolve { url } => {
                let cache = cfg.build_cache(Credentials::from_env())?;
                run_resolve(&cache, &url)?
            }
            CliCommand::Fetch { url } => {
                let cache = cfg.build_cache(Credentials::from_env())?;
                run_fetch(&cache, &url)?
            }
            CliCommand::Inspect { url, limit } => {
                let cache = cfg.build_cache(Credentials::from_env())?;
                run_inspect(&cache, &url, limit)?
            }
            CliCommand::CacheDir => run_cache_dir(&cfg.cache_root()?)?,
            CliCommand::Completions { shell } => run_completions(shell, &mut Cli::command()),
        }

        Ok(())
    }
}
