use crate::utils::AppError;
use std::env;

pub const DEFAULT_REFERRAL_LINK_BASE: &str = "https://ref.bloxsolutions.app/";

/// Runtime configuration, read from the environment (after `.env` is loaded)
#[derive(Debug, Clone)]
pub struct WidgetConfig {
    pub host: String,
    pub port: String,
    /// Referral backend base URL, without trailing slash
    pub api_url: String,
    /// Static value sent as `x-api-key` on every backend request
    pub api_key: String,
    pub referral_link_base: String,
    pub jwt_secret: String,
    pub jwt_issuer: Option<String>,
    pub cors_origins: Vec<String>,
}

impl WidgetConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| AppError::Config(format!("{} must be set", key)))
        };

        let api_url = required("API_URL")?.trim_end_matches('/').to_string();
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "API_URL must be an http(s) URL, got '{}'",
                api_url
            )));
        }

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: lookup("PORT").unwrap_or_else(|| "3002".to_string()),
            api_url,
            api_key: required("API_KEY")?,
            referral_link_base: lookup("REFERRAL_LINK_BASE")
                .unwrap_or_else(|| DEFAULT_REFERRAL_LINK_BASE.to_string()),
            jwt_secret: required("JWT_SECRET")?,
            jwt_issuer: lookup("JWT_ISSUER").filter(|v| !v.is_empty()),
            cors_origins,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
