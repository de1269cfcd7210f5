//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/comptree/comptree.toml`
//! 3. Local config: file passed with `--config`
//! 4. Environment variables: `COMPTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::CountPolicy;

/// Traversal settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct TraversalConfig {
    /// Whether childless composites count themselves in count/first
    pub policy: CountPolicy,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Colored terminal output (NO_COLOR still wins)
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub traversal: RawTraversalConfig,
    pub display: RawDisplayConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawTraversalConfig {
    pub policy: Option<CountPolicy>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawDisplayConfig {
    pub color: Option<bool>,
}

/// Unified configuration for comptree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    pub traversal: TraversalConfig,
    pub display: DisplayConfig,
}

/// Get the XDG config directory for comptree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "comptree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("comptree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            traversal: TraversalConfig {
                policy: overlay.traversal.policy.unwrap_or(self.traversal.policy),
            },
            display: DisplayConfig {
                color: overlay.display.color.unwrap_or(self.display.color),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Optional config file given on the command line
    ///
    /// A missing global file is skipped; a missing local file is an error
    /// because the user asked for it explicitly.
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(local_path) = local {
            let raw = load_raw_settings(local_path)?;
            current = current.merge_with(&raw);
        }

        // 4. Environment variables (explicit override)
        Self::apply_env_overrides(current, env_source())
    }

    /// Apply COMPTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self, source: Environment) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(source)
            .build()
            .map_err(config_err)?;

        // An unset key keeps the current value, a malformed one is an error
        match config.get_string("traversal.policy") {
            Ok(val) => {
                settings.traversal.policy =
                    CountPolicy::parse(&val).ok_or_else(|| ApplicationError::Config {
                        message: format!("unknown traversal policy: {val}"),
                    })?;
            }
            Err(ConfigError::NotFound(_)) => {}
            Err(e) => return Err(config_err(e)),
        }
        match config.get_bool("display.color") {
            Ok(val) => settings.display.color = val,
            Err(ConfigError::NotFound(_)) => {}
            Err(e) => return Err(config_err(e)),
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# comptree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/comptree/comptree.toml
#   Local:  file passed with --config
#   Env:    COMPTREE_* environment variables, e.g. COMPTREE_TRAVERSAL__POLICY

[traversal]
# Whether a composite without children is tested against its own value
# in count/first: "leaf-only" or "self-counts-if-childless"
# policy = "leaf-only"

[display]
# Colored output (NO_COLOR in the environment still disables it)
# color = true
"#
        .to_string()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("COMPTREE")
        .prefix_separator("_")
        .separator("__")
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_with(pairs: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        env_source().source(Some(map))
    }

    #[test]
    fn given_defaults_when_created_then_leaf_only_and_color() {
        let settings = Settings::default();
        assert_eq!(settings.traversal.policy, CountPolicy::LeafOnly);
        assert!(settings.display.color);
    }

    #[test]
    fn given_local_file_when_loading_then_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[traversal]\npolicy = \"self-counts-if-childless\"\n[display]\ncolor = false"
        )
        .unwrap();

        let raw = load_raw_settings(file.path()).unwrap();
        let settings = Settings::default().merge_with(&raw);
        assert_eq!(
            settings.traversal.policy,
            CountPolicy::SelfCountsIfChildless
        );
        assert!(!settings.display.color);
    }

    #[test]
    fn given_partial_overlay_when_merging_then_keeps_base_values() {
        let raw: RawSettings = toml::from_str("[display]\ncolor = false").unwrap();
        let base = Settings {
            traversal: TraversalConfig {
                policy: CountPolicy::SelfCountsIfChildless,
            },
            display: DisplayConfig::default(),
        };
        let merged = base.merge_with(&raw);
        assert_eq!(merged.traversal.policy, CountPolicy::SelfCountsIfChildless);
        assert!(!merged.display.color);
    }

    #[test]
    fn given_missing_local_file_when_loading_then_config_error() {
        let result = Settings::load(Some(Path::new("/nonexistent/comptree.toml")));
        assert!(matches!(result, Err(ApplicationError::Config { .. })));
    }

    #[test]
    fn given_env_override_when_applied_then_replaces_policy() {
        let settings = Settings::apply_env_overrides(
            Settings::default(),
            env_with(&[
                ("COMPTREE_TRAVERSAL__POLICY", "self-counts-if-childless"),
                ("COMPTREE_DISPLAY__COLOR", "false"),
            ]),
        )
        .unwrap();
        assert_eq!(
            settings.traversal.policy,
            CountPolicy::SelfCountsIfChildless
        );
        assert!(!settings.display.color);
    }

    #[test]
    fn given_unknown_policy_in_env_when_applied_then_config_error() {
        let result = Settings::apply_env_overrides(
            Settings::default(),
            env_with(&[("COMPTREE_TRAVERSAL__POLICY", "sometimes")]),
        );
        assert!(matches!(result, Err(ApplicationError::Config { .. })));
    }

    #[test]
    fn given_malformed_color_in_env_when_applied_then_config_error() {
        let result = Settings::apply_env_overrides(
            Settings::default(),
            env_with(&[("COMPTREE_DISPLAY__COLOR", "maybe")]),
        );
        assert!(matches!(result, Err(ApplicationError::Config { .. })));
    }

    #[test]
    fn given_no_env_vars_when_applied_then_settings_unchanged() {
        let settings = Settings::apply_env_overrides(Settings::default(), env_with(&[])).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn given_settings_when_serialized_then_template_keys_match() {
        let toml = Settings::default().to_toml().unwrap();
        assert!(toml.contains("policy = \"leaf-only\""));
        assert!(Settings::template().contains("[traversal]"));
    }
}
