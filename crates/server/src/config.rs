use shared_types::{AppConfig, FeatureFlags};
use std::sync::OnceLock;

static FLAGS: OnceLock<FeatureFlags> = OnceLock::new();

/// Path to the config file, relative to the project root.
const CONFIG_PATH: &str = "config.toml";

/// Parse `config.toml` contents, falling back to defaults on a parse error.
pub fn parse_config(contents: &str) -> AppConfig {
    toml::from_str(contents).unwrap_or_else(|e| {
        tracing::warn!(path = CONFIG_PATH, error = %e, "Invalid config file, all features off");
        AppConfig::default()
    })
}

/// Read `config.toml` once and store its feature flags. Later calls are no-ops.
///
/// A missing file leaves every flag off.
pub fn load_feature_flags() {
    FLAGS.get_or_init(|| match std::fs::read_to_string(CONFIG_PATH) {
        Ok(contents) => {
            let config = parse_config(&contents);
            tracing::info!(flags = ?config.features, "Loaded feature flags");
            config.features
        }
        Err(e) => {
            tracing::info!(path = CONFIG_PATH, error = %e, "No config file, all features off");
            FeatureFlags::default()
        }
    });
}

/// The loaded feature flags, or all-off defaults before `load_feature_flags()`.
pub fn feature_flags() -> &'static FeatureFlags {
    static DEFAULT: FeatureFlags = FeatureFlags { telemetry: false };
    FLAGS.get().unwrap_or(&DEFAULT)
}

/// Read a setting from the environment, using `default` when unset or unparseable.
pub fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_config_reads_telemetry_flag() {
        let config = parse_config("[features]\ntelemetry = true\n");
        assert!(config.features.telemetry);
    }

    #[test]
    fn parse_config_falls_back_on_garbage() {
        let config = parse_config("[features\ntelemetry = ");
        assert!(!config.features.telemetry);
    }

    #[test]
    fn env_or_uses_default_for_missing_or_invalid() {
        assert_eq!(env_or("PULSATO_TEST_UNSET_KEY", 7_i64), 7);
        std::env::set_var("PULSATO_TEST_BAD_INT", "seven");
        assert_eq!(env_or("PULSATO_TEST_BAD_INT", 3_u32), 3);
    }
}
