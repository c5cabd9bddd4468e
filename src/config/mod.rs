use serde::Deserialize;

use crate::services::three_play::ThreePlayConfig;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:8000"). Unused by the refresher.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// PostgreSQL connection string. The server keeps jobs in memory when
    /// unset; the refresher refuses to start without it.
    pub database_url: Option<String>,

    /// Base URL prefixed to `{provider}/{filename}` for finished caption files
    #[serde(default)]
    pub callback_base_url: String,

    /// 3Play Media API key
    pub three_play_api_key: Option<String>,

    /// 3Play Media API secret
    pub three_play_api_secret: Option<String>,

    #[serde(default = "default_three_play_base_url")]
    pub three_play_base_url: String,

    /// Seconds between status refresh passes
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Maximum jobs refreshed per pass
    #[serde(default = "default_refresh_batch_size")]
    pub refresh_batch_size: usize,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_three_play_base_url() -> String {
    "https://api.3playmedia.com".to_string()
}

fn default_refresh_interval_secs() -> u64 {
    60
}

fn default_refresh_batch_size() -> usize {
    50
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// 3Play settings, present only when both key and secret are configured.
    pub fn three_play(&self) -> Option<ThreePlayConfig> {
        match (&self.three_play_api_key, &self.three_play_api_secret) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
                Some(ThreePlayConfig {
                    api_key: key.clone(),
                    api_secret: secret.clone(),
                    base_url: self.three_play_base_url.clone(),
                })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> AppConfig {
        envy::from_iter(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.bind_addr, "0.0.0.0:8000");
        assert!(config.database_url.is_none());
        assert_eq!(config.callback_base_url, "");
        assert_eq!(config.refresh_interval_secs, 60);
        assert_eq!(config.refresh_batch_size, 50);
        assert!(config.three_play().is_none());
    }

    #[test]
    fn test_three_play_requires_key_and_secret() {
        let config = config_from(&[("THREE_PLAY_API_KEY", "key")]);
        assert!(config.three_play().is_none());

        let config = config_from(&[
            ("THREE_PLAY_API_KEY", "key"),
            ("THREE_PLAY_API_SECRET", "secret"),
            ("CALLBACK_BASE_URL", "https://cdn.example.com/captions"),
        ]);
        let three_play = config.three_play().unwrap();
        assert_eq!(three_play.api_key, "key");
        assert_eq!(three_play.base_url, "https://api.3playmedia.com");
        assert_eq!(config.callback_base_url, "https://cdn.example.com/captions");
    }
}
