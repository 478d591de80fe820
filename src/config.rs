// Process-wide defaults for tagcomp
// Reads from environment variables with sensible defaults

use std::env;
use std::sync::OnceLock;

/// Global configuration instance
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Search program used by the default command template (TAGCOMP_PROGRAM)
    pub program: String,

    /// Default vim-style `tags` option (TAGCOMP_TAGS)
    pub tags_option: String,

    /// Default maximum candidate count before clamping (TAGCOMP_MAX_SIZE)
    pub max_size: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            program: "rg".to_string(),
            tags_option: "./tags;,tags".to_string(),
            max_size: 100,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(val) = env::var("TAGCOMP_PROGRAM") {
            let val = val.trim();
            if val.is_empty() {
                tracing::warn!(
                    "empty TAGCOMP_PROGRAM, using default: {}",
                    config.program
                );
            } else {
                config.program = val.to_string();
            }
        }

        if let Ok(val) = env::var("TAGCOMP_TAGS") {
            config.tags_option = val;
        }

        if let Ok(val) = env::var("TAGCOMP_MAX_SIZE") {
            if let Ok(parsed) = val.trim().parse() {
                config.max_size = parsed;
            } else {
                tracing::warn!(
                    "invalid TAGCOMP_MAX_SIZE value: {}, using default: {}",
                    val,
                    config.max_size
                );
            }
        }

        config
    }

    /// Get the global configuration instance
    pub fn get() -> &'static Config {
        CONFIG.get_or_init(Config::from_env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.program, "rg");
        assert_eq!(config.tags_option, "./tags;,tags");
        assert_eq!(config.max_size, 100);
    }
}
