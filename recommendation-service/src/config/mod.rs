use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Immutable service configuration, constructed once at startup and
/// passed explicitly into `Application::build`.
#[derive(Debug, Clone)]
pub struct RecommendConfig {
    pub common: core_config::Config,
    /// Serve the hardcoded catalog instead of calling Gemini.
    pub mock_mode: bool,
    pub gemini: GeminiSettings,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    /// Missing key is a call-time upstream error, not a startup error,
    /// so the mock fallback still works without one.
    pub api_key: Option<String>,
    pub model: String,
}

impl RecommendConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let mock_mode = get_env("MOCK_MODE", Some("true"), is_prod)?.to_lowercase() == "true";

        Ok(RecommendConfig {
            common,
            mock_mode,
            gemini: GeminiSettings {
                api_key: env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
                model: get_env("GEMINI_MODEL", Some("gemini-1.5-flash"), is_prod)?,
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
