use super::defaults::DEFAULT_CONFIG_TEMPLATE;
use super::errors::ConfigError;
use super::models::Config;
use std::path::Path;

impl Config {
    /// Loads configuration from a file, creating it from the default
    /// template first when it does not exist.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            create_default_config(path).await?;
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh.concurrency == 0 {
            return Err(ConfigError::InvalidConfig(
                "refresh.concurrency must be at least 1".to_string(),
            ));
        }
        if self.rate_limit.threshold == 0 {
            return Err(ConfigError::InvalidConfig(
                "rate_limit.threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Creates a default configuration file
async fn create_default_config<P: AsRef<Path>>(path: P) -> Result<(), ConfigError> {
    tokio::fs::write(path, DEFAULT_CONFIG_TEMPLATE).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_parses_with_defaults_applied() {
        let config: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.probe.tcp_timeout_secs, 2);
        assert_eq!(config.refresh.interval_secs, 60);
        assert_eq!(config.refresh.concurrency, 50);
        assert_eq!(config.cache.offline_ttl_secs, 60);
        assert_eq!(config.cache.very_old_threshold_secs, 86400);
        assert_eq!(config.rate_limit.threshold, 5);
        assert!(!config.storage.enabled);
    }

    #[test]
    fn omitted_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str("[server]\nhost = \"127.0.0.1\"\nport = 9090\n").unwrap();
        assert_eq!(config.probe.job_deadline_secs, 5);
        assert!(config.refresh.enabled);
        assert_eq!(config.cache.max_staleness_secs, 0);
        assert_eq!(config.rate_limit.decay_interval_secs, 1);
    }
}
