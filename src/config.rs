// Configuration module: where the vault lives, where the API lives and which
// directories are never walked. Values come from the environment (a `.env`
// file is loaded by `main`), with defaults matching a local setup.

use crate::api::Credentials;
use anyhow::{bail, Result};
use std::collections::BTreeSet;
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_SKIP_DIRS: &[&str] = &[".obsidian", ".git", ".claude", "image", ".DS_Store"];

/// Directory names starting with this marker are never walked.
pub const HIDDEN_MARKER: char = '.';

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub root_path: PathBuf,
    pub api_base_url: String,
    pub skip_dirs: BTreeSet<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            root_path: default_root(),
            api_base_url: DEFAULT_API_URL.to_string(),
            skip_dirs: DEFAULT_SKIP_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SyncConfig {
    /// Read `VAULT_ROOT`, `VAULT_API_URL` and `VAULT_SKIP_DIRS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`SyncConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = SyncConfig::default();
        if let Some(root) = lookup("VAULT_ROOT").filter(|v| !v.trim().is_empty()) {
            config.root_path = PathBuf::from(root);
        }
        if let Some(url) = lookup("VAULT_API_URL").filter(|v| !v.trim().is_empty()) {
            config.api_base_url = url.trim().to_string();
        }
        if let Some(list) = lookup("VAULT_SKIP_DIRS") {
            config.skip_dirs = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        config
    }

    /// The root must be an existing directory before anything is uploaded.
    pub fn validate(&self) -> Result<()> {
        if !self.root_path.is_dir() {
            bail!(
                "Vault root {} does not exist or is not a directory",
                self.root_path.display()
            );
        }
        Ok(())
    }

    /// Whether a directory with this name is left out of the walk.
    pub fn is_skipped(&self, dir_name: &str) -> bool {
        dir_name.starts_with(HIDDEN_MARKER) || self.skip_dirs.contains(dir_name)
    }
}

/// `~/Desktop/Obsidian`, or `./Desktop/Obsidian` when no home directory is known.
fn default_root() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join("Desktop").join("Obsidian")
}

/// Login credentials from `VAULT_EMAIL` / `VAULT_PASSWORD`, if both are set.
pub fn credentials_from_env() -> Option<Credentials> {
    credentials_from_lookup(|key| std::env::var(key).ok())
}

pub fn credentials_from_lookup<F>(lookup: F) -> Option<Credentials>
where
    F: Fn(&str) -> Option<String>,
{
    let email = lookup("VAULT_EMAIL").filter(|v| !v.is_empty())?;
    let password = lookup("VAULT_PASSWORD").filter(|v| !v.is_empty())?;
    Some(Credentials { email, password })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_variables() {
        let config = SyncConfig::from_lookup(|_| None);
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert!(config.root_path.ends_with("Desktop/Obsidian"));
        assert!(config.skip_dirs.contains("image"));
        assert!(config.skip_dirs.contains(".obsidian"));
    }

    #[test]
    fn variables_override_defaults() {
        let config = SyncConfig::from_lookup(lookup_from(&[
            ("VAULT_ROOT", "/tmp/vault"),
            ("VAULT_API_URL", " https://blog.example.com/api "),
            ("VAULT_SKIP_DIRS", "attachments, templates,,"),
        ]));
        assert_eq!(config.root_path, PathBuf::from("/tmp/vault"));
        assert_eq!(config.api_base_url, "https://blog.example.com/api");
        let expected: BTreeSet<String> =
            ["attachments", "templates"].iter().map(|s| s.to_string()).collect();
        assert_eq!(config.skip_dirs, expected);
    }

    #[test]
    fn hidden_and_listed_directories_are_skipped() {
        let config = SyncConfig::default();
        assert!(config.is_skipped(".trash"));
        assert!(config.is_skipped("image"));
        assert!(!config.is_skipped("Backend"));
        assert!(!config.is_skipped("images"));
    }

    #[test]
    fn validate_rejects_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SyncConfig::default();
        config.root_path = dir.path().to_path_buf();
        assert!(config.validate().is_ok());

        config.root_path = dir.path().join("missing");
        assert!(config.validate().is_err());
    }

    #[test]
    fn credentials_need_both_variables() {
        assert!(credentials_from_lookup(lookup_from(&[("VAULT_EMAIL", "a@b.c")])).is_none());
        let creds = credentials_from_lookup(lookup_from(&[
            ("VAULT_EMAIL", "a@b.c"),
            ("VAULT_PASSWORD", "secret"),
        ]))
        .unwrap();
        assert_eq!(creds.email, "a@b.c");
        assert_eq!(creds.password, "secret");
    }
}
