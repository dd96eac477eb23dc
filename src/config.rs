use std::env;
use std::path::PathBuf;

use crate::artifacts::ArtifactStore;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("VK_API_TOKEN is not set; add it to the environment or a .env file")]
    MissingToken,
}

/// Process configuration, read once at startup.
///
/// The VK access token is required; startup fails without it. The model
/// directory falls back to the [`ArtifactStore`] resolution chain when
/// `TONALITY_MODEL_DIR` is unset.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub vk_token: String,
    pub model_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let vk_token = env::var("VK_API_TOKEN")
            .ok()
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        Ok(Self {
            vk_token,
            model_dir: ArtifactStore::default_model_dir(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var mutation is process-global; keep both cases in one test so
    // parallel test threads cannot interleave between set and unset.
    #[test]
    fn test_token_required() {
        env::remove_var("VK_API_TOKEN");
        assert!(matches!(AppConfig::from_env(), Err(ConfigError::MissingToken)));

        env::set_var("VK_API_TOKEN", "");
        assert!(matches!(AppConfig::from_env(), Err(ConfigError::MissingToken)));

        env::set_var("VK_API_TOKEN", "token-value");
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.vk_token, "token-value");
        env::remove_var("VK_API_TOKEN");
    }
}
