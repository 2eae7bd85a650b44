//! `diary` — command-line front end for the contact diary store.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the
//! encrypted diary in the configured data folder and runs one subcommand.
//!
//! ```text
//! diary add-person Alice
//! diary meet 1 --date 2026-10-14
//! diary show
//! ```

mod commands;
mod settings;

use std::{
  io::{self, Write as _},
  path::PathBuf,
  sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use diary_core::clock::{Clock as _, SystemClock};
use diary_store_sqlite::{DiaryPaths, FileKeyStore, SqliteDiaryStore};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use commands::Command;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "diary", author, version, about = "Encrypted local contact diary")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Folder holding the database and key; overrides the config file.
  #[arg(long, env = "DIARY_DATA_DIR")]
  data_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: CliCommand,
}

/// Store-agnostic commands plus those that need the SQLite backend itself.
#[derive(Subcommand, Debug, PartialEq, Eq)]
enum CliCommand {
  #[command(flatten)]
  Diary(Command),
  /// Print the on-disk schema version.
  SchemaVersion,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(io::stderr)
    .init();

  let cli = Cli::parse();

  let cfg = settings::load(&cli.config)?;
  let data_dir = settings::expand_tilde(&cli.data_dir.unwrap_or(cfg.data_dir));

  // Without its key or folder the diary cannot run at all; there is no
  // degraded mode.
  let paths = DiaryPaths::new(&data_dir);
  let keys = FileKeyStore::new(paths.key());
  let clock = Arc::new(SystemClock);
  let store = SqliteDiaryStore::open(&paths, &keys, clock)
    .await
    .with_context(|| format!("failed to open diary at {data_dir:?}"))?;

  let mut stdout = io::stdout().lock();
  match cli.command {
    CliCommand::SchemaVersion => {
      let version = store.schema_version().await.context("reading schema version")?;
      writeln!(stdout, "{version}")?;
    }
    CliCommand::Diary(command) => {
      commands::run(&store, command, SystemClock.today(), &mut stdout).await?
    }
  }

  store.close().await.context("closing diary")?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use clap::Parser as _;

  use super::*;

  #[test]
  fn parses_meet_with_date() {
    let cli = Cli::try_parse_from(["diary", "meet", "3", "--date", "2026-10-01"]).unwrap();
    assert_eq!(
      cli.command,
      CliCommand::Diary(Command::Meet {
        person: 3,
        date:   chrono::NaiveDate::from_ymd_opt(2026, 10, 1),
      })
    );
  }

  #[test]
  fn rejects_malformed_dates() {
    assert!(Cli::try_parse_from(["diary", "visit", "1", "--date", "01.10.2026"]).is_err());
  }

  #[test]
  fn data_dir_flag_overrides() {
    let cli = Cli::try_parse_from(["diary", "--data-dir", "/tmp/d", "show", "--json"]).unwrap();
    assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/d")));
    assert_eq!(cli.command, CliCommand::Diary(Command::Show { json: true }));
  }

  #[test]
  fn schema_version_is_a_binary_command() {
    let cli = Cli::try_parse_from(["diary", "schema-version"]).unwrap();
    assert_eq!(cli.command, CliCommand::SchemaVersion);
  }
}
