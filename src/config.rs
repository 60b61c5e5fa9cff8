//! Configuration management
//!
//! Built once at startup from the environment and passed by reference into
//! the store and the remote adapter. Nothing else reads the environment.

use std::path::PathBuf;

use tracing::info;

pub const DEFAULT_DATA_FILE: &str = "workout_data.csv";
pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Local backup file, rewritten in full on every save
    pub data_file: PathBuf,

    /// Remote document store; `None` means local-only mode
    pub remote: Option<RemoteConfig>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoteConfig {
    pub api_url: String,
    pub gist_id: String,
    pub token: String,
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_file = present("WORKOUT_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

        // Both or neither.
        let remote = match (present("GIST_ID"), present("GITHUB_TOKEN")) {
            (Some(gist_id), Some(token)) => Some(RemoteConfig {
                api_url: present("GIST_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                gist_id,
                token,
            }),
            _ => None,
        };

        let config = Config { data_file, remote };
        info!(
            data_file = %config.data_file.display(),
            "configuration loaded: {} mode",
            if config.remote.is_some() { "remote" } else { "local-only" }
        );
        config
    }

    pub fn local_only(data_file: impl Into<PathBuf>) -> Self {
        Config {
            data_file: data_file.into(),
            remote: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::local_only(DEFAULT_DATA_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_local_only() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn remote_requires_both_values() {
        let only_id = Config::from_lookup(lookup(&[("GIST_ID", "abc")]));
        assert!(only_id.remote.is_none());

        let only_token = Config::from_lookup(lookup(&[("GITHUB_TOKEN", "secret")]));
        assert!(only_token.remote.is_none());

        let blank_token =
            Config::from_lookup(lookup(&[("GIST_ID", "abc"), ("GITHUB_TOKEN", "  ")]));
        assert!(blank_token.remote.is_none());
    }

    #[test]
    fn remote_enabled_with_both_values() {
        let config = Config::from_lookup(lookup(&[
            ("GIST_ID", "abc"),
            ("GITHUB_TOKEN", "secret"),
            ("WORKOUT_DATA_FILE", "/tmp/lifts.csv"),
        ]));
        assert_eq!(config.data_file, PathBuf::from("/tmp/lifts.csv"));
        assert_eq!(
            config.remote,
            Some(RemoteConfig {
                api_url: DEFAULT_API_URL.to_string(),
                gist_id: "abc".to_string(),
                token: "secret".to_string(),
            })
        );
    }
}
