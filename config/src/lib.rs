//! Load prompt-engine configuration from XDG `config.toml` and a project `.env`, then apply
//! it to the process environment with priority: **existing env > .env > XDG**.
//!
//! `config.toml` lives at `$XDG_CONFIG_HOME/<app>/config.toml` and has two optional tables:
//!
//! ```toml
//! [engine]            # becomes PROMPT_ENGINE_POLL_INTERVAL_MS=500 for app "prompt-engine"
//! poll_interval_ms = 500
//!
//! [env]               # copied as-is
//! RUST_LOG = "prompt_engine=debug"
//! ```
//!
//! The engine itself only reads environment variables; this crate is how binaries fill them.

mod dotenv;
#[cfg(feature = "tracing-init")]
mod tracing_init;
mod xdg_toml;

#[cfg(feature = "tracing-init")]
pub use tracing_init::{init_tracing, LogTarget, TracingGuard};

use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// App name used for the XDG directory and the `[engine]` key prefix.
pub const APP_NAME: &str = "prompt-engine";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("xdg config path: {0}")]
    XdgPath(String),
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("read .env: {0}")]
    DotenvRead(std::io::Error),
}

/// Where an applied value came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    Dotenv,
    Xdg,
}

/// Keys set by [`load_and_apply`], with their source. Keys already present in the
/// environment are not listed.
pub type Applied = BTreeMap<String, Source>;

/// Loads `.env` (from `override_dir` or the current directory) and the XDG config for
/// `app_name`, then sets every key that is **not** already in the environment.
pub fn load_and_apply(app_name: &str, override_dir: Option<&Path>) -> Result<Applied, LoadError> {
    let xdg_map = xdg_toml::load_env_map(app_name)?;
    let dotenv_map = dotenv::load_env_map(override_dir).map_err(LoadError::DotenvRead)?;

    let mut applied = Applied::new();
    let candidates = dotenv_map
        .iter()
        .map(|(k, v)| (k, v, Source::Dotenv))
        .chain(xdg_map.iter().map(|(k, v)| (k, v, Source::Xdg)));
    for (key, value, source) in candidates {
        if applied.contains_key(key) || std::env::var_os(key).is_some() {
            continue;
        }
        std::env::set_var(key, value);
        applied.insert(key.clone(), source);
    }
    Ok(applied)
}

/// [`load_and_apply`] for [`APP_NAME`] and the current directory.
pub fn load_default() -> Result<Applied, LoadError> {
    load_and_apply(APP_NAME, None)
}

/// Serializes tests that point `XDG_CONFIG_HOME` somewhere else.
#[cfg(test)]
pub(crate) static XDG_ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
