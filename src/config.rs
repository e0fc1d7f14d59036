use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub display: DisplayConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DisplayConfig {
    pub colored: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LogConfig {
    pub filter: String,
}

impl AppConfig {
    pub fn load() -> Self {
        let config_path = "Config.toml";
        let mut config = if Path::new(config_path).exists() {
            match fs::read_to_string(config_path) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(parsed) => parsed,
                    Err(e) => {
                        eprintln!("Failed to parse Config.toml ({}), using defaults", e);
                        Self::default()
                    }
                },
                Err(e) => {
                    eprintln!("Failed to read Config.toml ({}), using defaults", e);
                    Self::default()
                }
            }
        } else {
            eprintln!("Config.toml not found, using defaults");
            Self::default()
        };

        config.merge_env();

        eprintln!("----------------------------------------");
        eprintln!("TriChess Configuration:");
        eprintln!("  Colored output: {}", config.display.colored);
        eprintln!("  Log filter: {}", config.log.filter);
        eprintln!("----------------------------------------");

        config
    }

    fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("TRICHESS_DISPLAY_COLORED") {
            if let Ok(parsed) = val.parse() {
                self.display.colored = parsed;
            }
        }
        if let Ok(val) = std::env::var("TRICHESS_LOG_FILTER") {
            if !val.is_empty() {
                self.log.filter = val;
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { colored: true }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    struct EnvVarGuard {
        key: String,
        original: Option<String>,
    }

    impl EnvVarGuard {
        fn new(key: &str, value: &str) -> Self {
            let original = env::var(key).ok();
            unsafe {
                env::set_var(key, value);
            }
            Self {
                key: key.to_string(),
                original,
            }
        }
    }

    impl Drop for EnvVarGuard {
        fn drop(&mut self) {
            unsafe {
                match &self.original {
                    Some(val) => env::set_var(&self.key, val),
                    None => env::remove_var(&self.key),
                }
            }
        }
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.display.colored);
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn test_merge_env_overrides() {
        let mut config = AppConfig::default();

        let _g1 = EnvVarGuard::new("TRICHESS_DISPLAY_COLORED", "false");
        let _g2 = EnvVarGuard::new("TRICHESS_LOG_FILTER", "debug");

        config.merge_env();

        assert!(!config.display.colored);
        assert_eq!(config.log.filter, "debug");
    }

    #[test]
    fn test_invalid_env_vars_ignored() {
        let mut config = AppConfig::default();
        let _g1 = EnvVarGuard::new("TRICHESS_DISPLAY_COLORED", "not_a_bool");

        config.merge_env();

        assert!(config.display.colored);
    }
}
