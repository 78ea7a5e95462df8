//! Client configuration: backend endpoint, health poll cadence, and the
//! module-toggle set forwarded with every chat request.
//!
//! Loaded from a TOML file (XDG config dir by default), with CLI flags
//! overriding individual fields. The [`ModuleToggles`] value is an explicit
//! type passed by reference into the request path rather than ambient state.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the knowledge-agent service.
    pub url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8000".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Health poll settings. The poll is an independent background collaborator;
/// it never gates the chat or memory pipelines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Seconds between health probes.
    pub poll_interval_secs: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 10,
        }
    }
}

/// Named processing modules and their enabled flags.
///
/// The backend decides what each module means; the client only forwards the
/// enabled set verbatim with each chat request. Ordered so listings and
/// serialized output are stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleToggles(BTreeMap<String, bool>);

impl ModuleToggles {
    /// The default module set of the reference agent service.
    pub fn defaults() -> Self {
        let mut map = BTreeMap::new();
        map.insert("memory".to_string(), true);
        map.insert("planning".to_string(), false);
        map.insert("reflection".to_string(), true);
        map.insert("retrieval".to_string(), true);
        Self(map)
    }

    /// Names of all enabled modules, in stable order.
    pub fn enabled_names(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|&(_, &on)| on)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Iterate all (name, enabled) pairs in stable order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(name, &on)| (name.as_str(), on))
    }

    /// Set a module's flag. Errors if the module is not configured.
    pub fn set(&mut self, name: &str, enabled: bool) -> Result<(), ConfigError> {
        match self.0.get_mut(name) {
            Some(flag) => {
                *flag = enabled;
                Ok(())
            }
            None => Err(ConfigError::UnknownModule { name: name.into() }),
        }
    }

    /// Whether a module exists and is enabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.0.get(name).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ModuleToggles {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Complete client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub backend: BackendConfig,
    pub health: HealthConfig,
    pub modules: ModuleToggles,
}

impl ClientConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file yields the defaults; a present-but-invalid file is an
    /// error, so typos don't silently fall back.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Write configuration back to a TOML file (used by `weft modules`).
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).expect("ClientConfig is always serializable");
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_modules() {
        let toggles = ModuleToggles::defaults();
        assert!(toggles.is_enabled("retrieval"));
        assert!(toggles.is_enabled("memory"));
        assert!(!toggles.is_enabled("planning"));
        assert_eq!(toggles.enabled_names(), vec!["memory", "reflection", "retrieval"]);
    }

    #[test]
    fn set_unknown_module_errors() {
        let mut toggles = ModuleToggles::defaults();
        assert!(toggles.set("retrieval", false).is_ok());
        assert!(!toggles.is_enabled("retrieval"));
        assert!(matches!(
            toggles.set("sparkles", true),
            Err(ConfigError::UnknownModule { .. })
        ));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = ClientConfig::load(Path::new("/nonexistent/weft.toml")).unwrap();
        assert_eq!(config.backend.url, "http://127.0.0.1:8000");
        assert_eq!(config.health.poll_interval_secs, 10);
    }

    #[test]
    fn round_trips_through_toml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = ClientConfig::default();
        config.backend.url = "http://10.0.0.5:9000".to_string();
        config.modules.set("planning", true).unwrap();
        config.save(&path).unwrap();

        let loaded = ClientConfig::load(&path).unwrap();
        assert_eq!(loaded.backend.url, "http://10.0.0.5:9000");
        assert!(loaded.modules.is_enabled("planning"));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "backend = \"not a table\"").unwrap();

        assert!(matches!(
            ClientConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[backend]\nurl = \"http://example:1234\"\n").unwrap();

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.backend.url, "http://example:1234");
        assert_eq!(config.backend.timeout_secs, 30);
        assert!(config.modules.is_enabled("retrieval"));
    }
}
