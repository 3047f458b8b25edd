use std::env;
use actix_web::cookie::Key;

/// Minimum length accepted for a cookie signing key
pub const MIN_SESSION_KEY_BYTES: usize = 64;

/// Runtime settings, read from the environment
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub bind_address: String,
    pub port: u16,
    pub session_key: Option<String>,
    pub static_dir: String,
    pub output_file: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            session_key: None,
            static_dir: "static".to_string(),
            output_file: "planning.txt".to_string(),
        }
    }
}

impl PlannerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from any variable lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            bind_address: lookup("PLANNER_BIND").unwrap_or(defaults.bind_address),
            port: lookup("PLANNER_PORT")
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(defaults.port),
            session_key: lookup("PLANNER_SESSION_KEY").filter(|k| !k.is_empty()),
            static_dir: lookup("PLANNER_STATIC_DIR").unwrap_or(defaults.static_dir),
            output_file: lookup("PLANNER_OUTPUT").unwrap_or(defaults.output_file),
        }
    }

    /// Cookie signing key. A random key is generated when none (or a too short one)
    /// is configured, which invalidates client sessions on restart.
    pub fn cookie_key(&self) -> Key {
        match &self.session_key {
            Some(key) if key.len() >= MIN_SESSION_KEY_BYTES => Key::from(key.as_bytes()),
            Some(_) => {
                log::warn!(
                    "PLANNER_SESSION_KEY is shorter than {} bytes, using a random key",
                    MIN_SESSION_KEY_BYTES
                );
                Key::generate()
            }
            None => {
                log::warn!("PLANNER_SESSION_KEY not set, using a random key");
                Key::generate()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = PlannerConfig::from_lookup(|_| None);
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.static_dir, "static");
        assert!(config.session_key.is_none());
    }

    #[test]
    fn test_reads_overrides_and_ignores_bad_port() {
        let vars: HashMap<&str, &str> = [
            ("PLANNER_PORT", "9090"),
            ("PLANNER_BIND", "127.0.0.1"),
            ("PLANNER_OUTPUT", "out.txt"),
        ]
        .into_iter()
        .collect();
        let config = PlannerConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(config.port, 9090);
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.output_file, "out.txt");

        let config = PlannerConfig::from_lookup(|name| (name == "PLANNER_PORT").then(|| "http".to_string()));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_configured_key_is_used() {
        let secret = "k".repeat(64);
        let config = PlannerConfig {
            session_key: Some(secret.clone()),
            ..Default::default()
        };
        assert_eq!(config.cookie_key().master(), Key::from(secret.as_bytes()).master());
    }
}
