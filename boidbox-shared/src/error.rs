use boidbox_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(#[from] ConfigError),
    #[error("unknown theme '{0}'")]
    UnknownTheme(String),
    #[error("theme '{theme}' lists {count} models, more than a model kind can index")]
    TooManyModels { theme: String, count: usize },
}
