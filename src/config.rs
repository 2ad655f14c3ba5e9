//! Configuration lookup and validation.
//!
//! The review pipeline never reads files or the environment directly; it
//! goes through a [`ConfigReader`], which the binary backs with a TOML file
//! and tests back with in-memory tables.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::types::RepositoryConfig;

/// File looked up in the home directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = ".reviewer.toml";

/// Prefix of environment variables that override configuration keys.
pub const ENV_PREFIX: &str = "REVIEWER_";

pub const TOKEN_KEY: &str = "authorization.token";
pub const REPOSITORIES_KEY: &str = "repositories";

/// Key/value access to the tool's configuration.
///
/// Keys are dotted paths (`repositories.reviewer.required`). Missing keys
/// read as the zero value of the requested type; use [`is_set`] to tell
/// absence apart.
///
/// [`is_set`]: ConfigReader::is_set
pub trait ConfigReader {
    fn get_string(&self, key: &str) -> String;
    fn get_bool(&self, key: &str) -> bool;
    fn get_int(&self, key: &str) -> i64;
    fn is_set(&self, key: &str) -> bool;
    /// Every leaf key, dotted.
    fn all_keys(&self) -> Vec<String>;
    /// Names of the entries directly under the table at `key`, verbatim.
    fn sub_keys(&self, key: &str) -> Vec<String>;
    /// Path of the file backing this configuration, or `""` if none.
    fn config_file_used(&self) -> String;
}

/// TOML-file backed configuration with `REVIEWER_*` environment overrides.
#[derive(Debug, Clone, Default)]
pub struct TomlConfig {
    path: Option<PathBuf>,
    table: toml::Table,
    env: HashMap<String, String>,
}

impl TomlConfig {
    /// Loads `explicit` if given, otherwise `~/.reviewer.toml` when it
    /// exists. A missing default file yields an empty configuration.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => dirs::home_dir()
                .map(|home| home.join(DEFAULT_CONFIG_FILE))
                .filter(|path| path.is_file()),
        };

        let mut config = match path {
            Some(path) => {
                let contents = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                debug!(path = %path.display(), "using config file");
                Self::from_toml_str(path, &contents)?
            }
            None => Self::default(),
        };

        config.env = std::env::vars()
            .filter(|(key, _)| key.starts_with(ENV_PREFIX))
            .collect();
        Ok(config)
    }

    pub fn from_toml_str(path: impl Into<PathBuf>, contents: &str) -> Result<Self> {
        let path = path.into();
        let table: toml::Table = contents
            .parse()
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(Self {
            path: Some(path),
            table,
            env: HashMap::new(),
        })
    }

    /// Sets an environment override, as if `name` were exported.
    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(name.into(), value.into());
        self
    }

    fn env_name(key: &str) -> String {
        format!("{ENV_PREFIX}{}", key.replace('.', "_").to_uppercase())
    }

    fn lookup(&self, key: &str) -> Option<toml::Value> {
        if let Some(value) = self.env.get(&Self::env_name(key)) {
            return Some(toml::Value::String(value.clone()));
        }

        let parts: Vec<&str> = key.split('.').collect();
        find_value(&self.table, &parts).cloned()
    }
}

/// Resolves dotted `parts` against nested tables. Table keys may contain
/// dots themselves (`[repositories."socket.io"]`), so every split point is
/// tried, shortest key first.
fn find_value<'a>(table: &'a toml::Table, parts: &[&str]) -> Option<&'a toml::Value> {
    for end in 1..=parts.len() {
        let Some(value) = table.get(&parts[..end].join(".")) else {
            continue;
        };
        if end == parts.len() {
            return Some(value);
        }
        if let Some(found) = value
            .as_table()
            .and_then(|inner| find_value(inner, &parts[end..]))
        {
            return Some(found);
        }
    }
    None
}

fn collect_leaf_keys(prefix: &str, table: &toml::Table, out: &mut Vec<String>) {
    for (key, value) in table {
        let full = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::Table(inner) => collect_leaf_keys(&full, inner, out),
            _ => out.push(full),
        }
    }
}

/// Accepts the spellings `1`, `t`, `true` and `0`, `f`, `false` in any
/// case. Anything else reads as false.
fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "t" | "true"
    )
}

impl ConfigReader for TomlConfig {
    fn get_string(&self, key: &str) -> String {
        match self.lookup(key) {
            Some(toml::Value::String(s)) => s,
            Some(toml::Value::Integer(i)) => i.to_string(),
            Some(toml::Value::Float(f)) => f.to_string(),
            Some(toml::Value::Boolean(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    fn get_bool(&self, key: &str) -> bool {
        match self.lookup(key) {
            Some(toml::Value::Boolean(b)) => b,
            Some(toml::Value::Integer(i)) => i != 0,
            Some(toml::Value::String(s)) => parse_bool(&s),
            _ => false,
        }
    }

    fn get_int(&self, key: &str) -> i64 {
        match self.lookup(key) {
            Some(toml::Value::Integer(i)) => i,
            Some(toml::Value::Float(f)) => f as i64,
            Some(toml::Value::Boolean(b)) => i64::from(b),
            Some(toml::Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    fn is_set(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    fn all_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        collect_leaf_keys("", &self.table, &mut keys);
        keys
    }

    fn sub_keys(&self, key: &str) -> Vec<String> {
        let parts: Vec<&str> = key.split('.').collect();
        find_value(&self.table, &parts)
            .and_then(toml::Value::as_table)
            .map(|table| table.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn config_file_used(&self) -> String {
        self.path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_default()
    }
}

/// Fails unless a configuration file backs `reader`.
pub fn check_file(reader: &dyn ConfigReader) -> Result<()> {
    if reader.config_file_used().is_empty() {
        anyhow::bail!(
            "Config file not defined or empty (use --config or create ~/{})",
            DEFAULT_CONFIG_FILE
        );
    }
    Ok(())
}

/// Fails unless the `repositories` section is present.
pub fn check_repositories(reader: &dyn ConfigReader) -> Result<()> {
    if !reader.is_set(REPOSITORIES_KEY) || repository_names(reader).is_empty() {
        anyhow::bail!("Repositories not set");
    }
    Ok(())
}

/// Repository names, in key order.
pub fn repository_names(reader: &dyn ConfigReader) -> Vec<String> {
    reader.sub_keys(REPOSITORIES_KEY)
}

/// Reads and validates every configured repository.
///
/// `enabled` takes precedence over the older `status` key when both exist.
pub fn load_repositories(reader: &dyn ConfigReader) -> Result<Vec<RepositoryConfig>> {
    check_repositories(reader)?;

    repository_names(reader)
        .into_iter()
        .map(|name| {
            let key = |field: &str| format!("{REPOSITORIES_KEY}.{name}.{field}");
            let enabled_key = if reader.is_set(&key("enabled")) {
                key("enabled")
            } else {
                key("status")
            };

            let username = reader.get_string(&key("username"));
            if username.is_empty()
                || !reader.is_set(&enabled_key)
                || !reader.is_set(&key("required"))
            {
                anyhow::bail!(
                    "Fields not set for repository '{}' (username, status and required are mandatory)",
                    name
                );
            }

            let required_score = reader.get_int(&key("required"));
            if required_score <= 0 {
                warn!(
                    repository = %name,
                    required_score, "non-positive required score lets every pull request pass the score check"
                );
            }

            Ok(RepositoryConfig {
                enabled: reader.get_bool(&enabled_key),
                username,
                required_score,
                name,
            })
        })
        .collect()
}

/// Reads the API token, which must be a non-empty string.
pub fn load_token(reader: &dyn ConfigReader) -> Result<String> {
    let token = reader.get_string(TOKEN_KEY);
    if token.trim().is_empty() {
        anyhow::bail!(
            "{} is not set (config file or {} environment variable)",
            TOKEN_KEY,
            TomlConfig::env_name(TOKEN_KEY)
        );
    }
    Ok(token)
}

/// Validated configuration for a review run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub token: String,
    pub repositories: Vec<RepositoryConfig>,
}

impl Settings {
    /// Runs every check; any failure is fatal for the run.
    pub fn load(reader: &dyn ConfigReader) -> Result<Self> {
        check_file(reader)?;
        let repositories = load_repositories(reader)?;
        let token = load_token(reader)?;
        Ok(Self {
            token,
            repositories,
        })
    }
}
