//! `dybuf-fixtures` entry point.
//!
//! Regenerates or verifies the shared conformance fixtures that every dybuf
//! implementation must agree on.
//!
//! # Usage
//!
//! ```text
//! dybuf-fixtures generate [DIR]   -- rewrite the canonical JSON files
//! dybuf-fixtures verify [DIR]     -- check every case against this codec
//! dybuf-fixtures init-config      -- write the effective settings to --config
//! ```
//!
//! Settings come from an optional TOML file (`--config` / `DYBUF_CONFIG`);
//! a directory given on the command line wins over the file.  `verify`
//! exits non-zero if any file fails.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dybuf_fixtures::config::{load_config, save_config, FixtureToolConfig};
use dybuf_fixtures::generate::generate_dir;
use dybuf_fixtures::verify::verify_dir;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Generate or verify dybuf conformance fixtures.
#[derive(Debug, Parser)]
#[command(name = "dybuf-fixtures", version)]
struct Cli {
    /// Path to a TOML config file.  Missing files fall back to defaults.
    #[arg(long, env = "DYBUF_CONFIG", default_value = "dybuf-fixtures.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write the canonical fixture files.
    Generate {
        /// Output directory (defaults to `fixture_dir` from the config).
        #[arg(env = "DYBUF_FIXTURE_DIR")]
        dir: Option<PathBuf>,
    },
    /// Check existing fixture files against this codec.
    Verify {
        /// Fixture directory (defaults to `fixture_dir` from the config).
        #[arg(env = "DYBUF_FIXTURE_DIR")]
        dir: Option<PathBuf>,
    },
    /// Write the effective configuration (file values plus defaults) to the
    /// config path, so it can be edited.
    InitConfig,
}

fn resolve_dir(dir: Option<PathBuf>, config: &FixtureToolConfig) -> PathBuf {
    dir.unwrap_or_else(|| config.fixture_dir.clone())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // `RUST_LOG` wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    match cli.command {
        Command::Generate { dir } => {
            let dir = resolve_dir(dir, &config);
            let written = generate_dir(&dir, &config.files)
                .with_context(|| format!("generating fixtures in {}", dir.display()))?;
            for path in written {
                info!("wrote {}", path.display());
            }
        }
        Command::Verify { dir } => {
            let dir = resolve_dir(dir, &config);
            let reports = verify_dir(&dir, &config.files);
            let failed = reports.iter().filter(|r| !r.passed()).count();
            if failed > 0 {
                bail!(
                    "{failed} of {} fixture files failed in {}",
                    reports.len(),
                    dir.display()
                );
            }
            info!("all {} fixture files pass", reports.len());
        }
        Command::InitConfig => {
            save_config(&cli.config, &config)
                .with_context(|| format!("writing config to {}", cli.config.display()))?;
            info!("wrote {}", cli.config.display());
        }
    }

    Ok(())
}
