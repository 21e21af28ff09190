//! Tool configuration loaded from environment variables.

use std::env;

/// Runtime configuration for `schema-check`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckConfig {
    /// Emit JSON log lines instead of pretty ones.
    pub json_logs: bool,
    /// Service name attached to log output.
    pub service_name: String,
    /// Pretty-print the JSON written to stdout.
    pub pretty: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            json_logs: false,
            service_name: "schema-check".to_string(),
            pretty: true,
        }
    }
}

impl CheckConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            json_logs: lookup("LOG_FORMAT")
                .map(|v| v.to_lowercase() == "json")
                .unwrap_or(defaults.json_logs),
            service_name: lookup("SCHEMA_CHECK_SERVICE_NAME").unwrap_or(defaults.service_name),
            pretty: lookup("SCHEMA_CHECK_PRETTY")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(defaults.pretty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> CheckConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CheckConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(config_from(&[]), CheckConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("LOG_FORMAT", "JSON"),
            ("SCHEMA_CHECK_SERVICE_NAME", "ideaverse-ci"),
            ("SCHEMA_CHECK_PRETTY", "0"),
        ]);
        assert!(config.json_logs);
        assert_eq!(config.service_name, "ideaverse-ci");
        assert!(!config.pretty);
    }

    #[test]
    fn unknown_log_format_falls_back_to_pretty() {
        assert!(!config_from(&[("LOG_FORMAT", "logfmt")]).json_logs);
    }
}
