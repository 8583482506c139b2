//! Load `[engine]` and `[env]` from `$XDG_CONFIG_HOME/<app>/config.toml`.
//!
//! `[engine]` keys become `<APP>_<KEY>` (upper-cased, `-` to `_`), so for app
//! `prompt-engine` the key `poll_interval_ms` becomes `PROMPT_ENGINE_POLL_INTERVAL_MS`.
//! `[env]` keys are taken verbatim. On a clash `[env]` wins.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::LoadError;

/// `$XDG_CONFIG_HOME` when set and non-empty, else the platform config dir.
fn config_home() -> Result<PathBuf, LoadError> {
    match std::env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => dirs::config_dir()
            .ok_or_else(|| LoadError::XdgPath("no config directory for this platform".into())),
    }
}

fn xdg_config_path(app_name: &str) -> Result<Option<PathBuf>, LoadError> {
    let path = config_home()?.join(app_name).join("config.toml");
    Ok(path.is_file().then_some(path))
}

#[derive(serde::Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    engine: HashMap<String, toml::Value>,
    #[serde(default)]
    env: HashMap<String, String>,
}

fn env_prefix(app_name: &str) -> String {
    app_name.to_uppercase().replace('-', "_")
}

/// Strings are used as-is; other scalars by their TOML rendering. Tables and arrays are skipped.
fn scalar_to_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Datetime(d) => Some(d.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => None,
    }
}

fn flatten(app_name: &str, config: ConfigFile) -> HashMap<String, String> {
    let prefix = env_prefix(app_name);
    let mut out: HashMap<String, String> = config
        .engine
        .iter()
        .filter_map(|(k, v)| {
            let key = format!("{}_{}", prefix, k.to_uppercase().replace('-', "_"));
            scalar_to_string(v).map(|v| (key, v))
        })
        .collect();
    out.extend(config.env);
    out
}

/// Returns env key-value pairs from the config file. Missing file returns an empty map.
pub fn load_env_map(app_name: &str) -> Result<HashMap<String, String>, LoadError> {
    let Some(path) = xdg_config_path(app_name)? else {
        return Ok(HashMap::new());
    };
    let content = std::fs::read_to_string(&path).map_err(LoadError::XdgRead)?;
    let config: ConfigFile = toml::from_str(&content)?;
    Ok(flatten(app_name, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::XDG_ENV_LOCK;
    use std::env;

    fn with_xdg_home<T>(dir: &std::path::Path, f: impl FnOnce() -> T) -> T {
        let _lock = XDG_ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let prev = env::var_os("XDG_CONFIG_HOME");
        env::set_var("XDG_CONFIG_HOME", dir);
        let out = f();
        match prev {
            Some(p) => env::set_var("XDG_CONFIG_HOME", p),
            None => env::remove_var("XDG_CONFIG_HOME"),
        }
        out
    }

    fn write_config(dir: &std::path::Path, app: &str, content: &str) {
        let app_dir = dir.join(app);
        std::fs::create_dir_all(&app_dir).unwrap();
        std::fs::write(app_dir.join("config.toml"), content).unwrap();
    }

    #[test]
    fn missing_config_returns_empty_map() {
        let dir = tempfile::tempdir().unwrap();
        let map = with_xdg_home(dir.path(), || load_env_map("prompt-engine")).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn engine_table_is_prefixed_and_env_is_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            "prompt-engine",
            r#"
[engine]
poll_interval_ms = 500
poll-timeout-ms = "60000"
nested = { ignored = true }

[env]
RUST_LOG = "prompt_engine=debug"
"#,
        );
        let map = with_xdg_home(dir.path(), || load_env_map("prompt-engine")).unwrap();
        assert_eq!(
            map.get("PROMPT_ENGINE_POLL_INTERVAL_MS").map(String::as_str),
            Some("500")
        );
        assert_eq!(
            map.get("PROMPT_ENGINE_POLL_TIMEOUT_MS").map(String::as_str),
            Some("60000")
        );
        assert_eq!(map.get("RUST_LOG").map(String::as_str), Some("prompt_engine=debug"));
        assert!(!map.contains_key("PROMPT_ENGINE_NESTED"));
    }

    #[test]
    fn env_table_wins_over_engine_table() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            "clash",
            "[engine]\nmode = \"a\"\n\n[env]\nCLASH_MODE = \"b\"\n",
        );
        let map = with_xdg_home(dir.path(), || load_env_map("clash")).unwrap();
        assert_eq!(map.get("CLASH_MODE").map(String::as_str), Some("b"));
    }

    #[test]
    fn invalid_toml_returns_xdg_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "badapp", "not valid toml [[[\n");
        let result = with_xdg_home(dir.path(), || load_env_map("badapp"));
        assert!(matches!(result, Err(LoadError::XdgParse(_))));
    }
}
