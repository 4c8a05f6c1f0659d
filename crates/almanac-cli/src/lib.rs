pub mod cli;
pub mod commands;
pub mod datastore;
pub mod render;

use std::ffi::OsString;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use almanac_core::config::AlmanacConfig;
use anyhow::{Context, anyhow};
use clap::Parser;
use tracing::{debug, info, warn};

pub const APP_DIR: &str = "almanac";
pub const CONFIG_FILE: &str = "almanac.toml";

#[tracing::instrument(skip_all)]
pub fn run(raw_args: Vec<OsString>) -> anyhow::Result<()> {
    let cli = cli::GlobalCli::parse_from(raw_args);

    cli::init_tracing(cli.verbose, cli.quiet)?;

    info!(verbose = cli.verbose, quiet = cli.quiet, "starting almanac CLI");

    let config = load_config(cli.config.as_deref())?;
    let data_dir = resolve_data_dir(cli.data.as_deref()).context("failed to resolve data directory")?;

    let mut store = datastore::DataStore::open(&data_dir)
        .with_context(|| format!("failed to open datastore at {}", data_dir.display()))?;

    let color = io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
    let today = config.today();
    {
        let mut session = commands::Session {
            store: &mut store,
            config: &config,
            renderer: render::Renderer::new(color),
            today,
            out: io::stdout().lock(),
        };
        commands::dispatch(&mut session, cli.command)?;
    }
    store.commit()?;

    info!("done");
    Ok(())
}

/// An explicit `--config` must exist; the default location is optional.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<AlmanacConfig> {
    if let Some(path) = explicit {
        info!(config = %path.display(), "loading config");
        return AlmanacConfig::load_file(path);
    }

    match dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE)) {
        Some(path) if path.exists() => {
            info!(config = %path.display(), "loading config");
            AlmanacConfig::load_file(&path)
        }
        _ => {
            debug!("no config file found; using defaults");
            Ok(AlmanacConfig::default())
        }
    }
}

pub fn resolve_data_dir(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Some(dir) = dirs::data_dir() {
        return Ok(dir.join(APP_DIR));
    }

    warn!("no platform data directory; falling back to home directory");
    dirs::home_dir()
        .map(|home| home.join(format!(".{APP_DIR}")))
        .ok_or_else(|| anyhow!("could not determine a data directory"))
}
