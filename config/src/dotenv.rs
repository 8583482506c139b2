//! Parse a project `.env` into a key-value map. Applying it to the environment happens in lib.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

fn dotenv_path(override_dir: Option<&Path>) -> Option<PathBuf> {
    let dir = match override_dir {
        Some(d) => d.to_path_buf(),
        None => std::env::current_dir().ok()?,
    };
    let path = dir.join(".env");
    path.is_file().then_some(path)
}

/// Strips one pair of matching quotes. Double quotes honour `\"`; single quotes are literal.
fn unquote(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        return value[1..value.len() - 1].replace("\\\"", "\"");
    }
    if value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'') {
        return value[1..value.len() - 1].to_string();
    }
    value.to_string()
}

/// `KEY=VALUE` per line. Blank lines and lines starting with `#` are skipped, an optional
/// leading `export ` is ignored, keys and values are trimmed. No multiline values.
fn parse_dotenv(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (k, v) = line.split_once('=')?;
            let key = k.trim();
            (!key.is_empty()).then(|| (key.to_string(), unquote(v.trim())))
        })
        .collect()
}

/// Missing file yields an empty map.
pub fn load_env_map(override_dir: Option<&Path>) -> std::io::Result<HashMap<String, String>> {
    let Some(path) = dotenv_path(override_dir) else {
        return Ok(HashMap::new());
    };
    let content = std::fs::read_to_string(&path)?;
    Ok(parse_dotenv(&content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pairs_and_skips_noise() {
        let m = parse_dotenv(
            "\n# provider settings\nPROMPT_ENGINE_POLL_INTERVAL_MS=100\n  \nNOT_A_PAIR\n=orphan\n",
        );
        assert_eq!(m.len(), 1);
        assert_eq!(
            m.get("PROMPT_ENGINE_POLL_INTERVAL_MS").map(String::as_str),
            Some("100")
        );
    }

    #[test]
    fn export_prefix_is_ignored() {
        let m = parse_dotenv("export RUST_LOG=debug\n");
        assert_eq!(m.get("RUST_LOG").map(String::as_str), Some("debug"));
    }

    #[test]
    fn quoting_rules() {
        let m = parse_dotenv(
            "A=\"hello world\"\nB='single # kept'\nC=\"say \\\"hi\\\"\"\nD=\nE=\"\"\nF=value # not a comment\n",
        );
        assert_eq!(m["A"], "hello world");
        assert_eq!(m["B"], "single # kept");
        assert_eq!(m["C"], "say \"hi\"");
        assert_eq!(m["D"], "");
        assert_eq!(m["E"], "");
        assert_eq!(m["F"], "value # not a comment");
    }

    #[test]
    fn missing_file_returns_empty_map() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_env_map(Some(dir.path())).unwrap().is_empty());
    }

    #[test]
    fn reads_file_from_override_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), "A=1\nB=2\n").unwrap();
        let m = load_env_map(Some(dir.path())).unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m["B"], "2");
    }
}
