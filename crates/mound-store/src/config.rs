use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MoundError, Result};

/// Environment variable overriding [`MoundConfig::root`].
pub const ENV_DATA_DIR: &str = "MOUND_DATA_DIR";
/// Environment variable overriding [`MoundConfig::durable`].
pub const ENV_DURABLE: &str = "MOUND_DURABLE";

/// Configuration for a [`MoundStore`](crate::MoundStore).
///
/// Held by value in each store; there is no process-wide root. Changing the
/// root of a store that already holds entities would orphan their paths, so
/// build a new store instead.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoundConfig {
    /// Directory under which every entity is sharded.
    pub root: PathBuf,
    /// `sync_data` after every document write and blob append.
    pub durable: bool,
}

impl Default for MoundConfig {
    fn default() -> Self {
        Self {
            root: std::env::temp_dir().join("mound_data"),
            durable: false,
        }
    }
}

impl MoundConfig {
    /// Configuration rooted at `root`, other fields defaulted.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Read a TOML config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| MoundError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(MoundError::ConfigParse)
    }

    /// Apply `MOUND_DATA_DIR` and `MOUND_DURABLE` from the process environment.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.apply_env(|key| std::env::var(key).ok())
    }

    fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(root) = lookup(ENV_DATA_DIR).filter(|v| !v.is_empty()) {
            self.root = PathBuf::from(root);
        }
        if let Some(flag) = lookup(ENV_DURABLE) {
            self.durable = parse_flag(&flag).ok_or_else(|| MoundError::InvalidEnv {
                var: ENV_DURABLE,
                value: flag.clone(),
            })?;
        }
        Ok(self)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config() {
        let c = MoundConfig::default();
        assert!(c.root.ends_with("mound_data"));
        assert!(!c.durable);
    }

    #[test]
    fn with_root() {
        let c = MoundConfig::with_root("/srv/mound");
        assert_eq!(c.root, PathBuf::from("/srv/mound"));
        assert!(!c.durable);
    }

    #[test]
    fn toml_full() {
        let c = MoundConfig::from_toml("root = \"/data/mound\"\ndurable = true\n").unwrap();
        assert_eq!(c.root, PathBuf::from("/data/mound"));
        assert!(c.durable);
    }

    #[test]
    fn toml_partial_uses_defaults() {
        let c = MoundConfig::from_toml("durable = true").unwrap();
        assert_eq!(c.root, MoundConfig::default().root);
        assert!(c.durable);
    }

    #[test]
    fn toml_invalid() {
        let err = MoundConfig::from_toml("durable = \"sometimes\"").unwrap_err();
        assert!(matches!(err, MoundError::ConfigParse(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mound.toml");
        fs::write(&path, "root = \"/var/lib/mound\"\n").unwrap();
        let c = MoundConfig::load(&path).unwrap();
        assert_eq!(c.root, PathBuf::from("/var/lib/mound"));
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let err = MoundConfig::load(&missing).unwrap_err();
        match err {
            MoundError::ConfigRead { path, source } => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn env_overrides() {
        let c = MoundConfig::default()
            .apply_env(env(&[(ENV_DATA_DIR, "/env/root"), (ENV_DURABLE, "yes")]))
            .unwrap();
        assert_eq!(c.root, PathBuf::from("/env/root"));
        assert!(c.durable);
    }

    #[test]
    fn empty_env_root_is_ignored() {
        let c = MoundConfig::with_root("/keep")
            .apply_env(env(&[(ENV_DATA_DIR, "")]))
            .unwrap();
        assert_eq!(c.root, PathBuf::from("/keep"));
    }

    #[test]
    fn bad_durable_flag() {
        let err = MoundConfig::default()
            .apply_env(env(&[(ENV_DURABLE, "maybe")]))
            .unwrap_err();
        assert!(matches!(
            err,
            MoundError::InvalidEnv { var: ENV_DURABLE, ref value } if value == "maybe"
        ));
    }

    #[test]
    fn serde_roundtrip() {
        let c = MoundConfig {
            root: "/x".into(),
            durable: true,
        };
        let text = toml::to_string(&c).unwrap();
        assert_eq!(MoundConfig::from_toml(&text).unwrap(), c);
    }
}
