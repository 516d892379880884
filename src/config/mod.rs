use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub article: ArticleConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub session_lifetime_hours: u64,
    pub pbkdf2_iterations: u32,
    pub derived_key_length: usize,
}

/// Field validation bounds, measured in characters after trimming
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleConfig {
    pub title_min: usize,
    pub title_max: usize,
    pub content_min: usize,
    pub content_max: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("QUILL_PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("QUILL_JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("QUILL_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("QUILL_SESSION_LIFETIME_HOURS") {
            self.security.session_lifetime_hours =
                v.parse().unwrap_or(self.security.session_lifetime_hours);
        }
        if let Ok(v) = env::var("QUILL_PBKDF2_ITERATIONS") {
            self.security.pbkdf2_iterations =
                v.parse().unwrap_or(self.security.pbkdf2_iterations);
        }
        if let Ok(v) = env::var("QUILL_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(v);
        }
        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 5009 },
            security: SecurityConfig {
                jwt_secret: "jwt_secret_654321".to_string(),
                jwt_expiry_hours: 2,
                session_lifetime_hours: 2,
                pbkdf2_iterations: 10_000,
                derived_key_length: 64,
            },
            article: ArticleConfig {
                title_min: 2,
                title_max: 50,
                content_min: 5,
                content_max: 5000,
            },
            storage: StorageConfig {
                data_dir: PathBuf::from("data"),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 5009 },
            security: SecurityConfig {
                // Production refuses to start without an explicit secret
                jwt_secret: String::new(),
                jwt_expiry_hours: 2,
                session_lifetime_hours: 2,
                pbkdf2_iterations: 10_000,
                derived_key_length: 64,
            },
            article: ArticleConfig {
                title_min: 2,
                title_max: 50,
                content_min: 5,
                content_max: 5000,
            },
            storage: StorageConfig {
                data_dir: PathBuf::from("data"),
            },
        }
    }

    /// Startup validation. A failure here is fatal: the process must not
    /// serve requests with a broken signing or hashing configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.security.jwt_secret.is_empty() {
            return Err("jwt secret is empty; set QUILL_JWT_SECRET".to_string());
        }
        if self.security.pbkdf2_iterations == 0 {
            return Err("pbkdf2 iteration count must be non-zero".to_string());
        }
        if self.security.derived_key_length == 0 {
            return Err("derived key length must be non-zero".to_string());
        }
        if self.article.title_min > self.article.title_max
            || self.article.content_min > self.article.content_max
        {
            return Err("article validation bounds are inverted".to_string());
        }
        Ok(())
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_defaults_match_business_rules() {
        let config = AppConfig::development();
        assert_eq!(config.security.jwt_expiry_hours, 2);
        assert_eq!(config.security.session_lifetime_hours, 2);
        assert_eq!(config.security.pbkdf2_iterations, 10_000);
        assert_eq!(config.article.title_min, 2);
        assert_eq!(config.article.title_max, 50);
        assert_eq!(config.article.content_min, 5);
        assert_eq!(config.article.content_max, 5000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn production_without_secret_fails_validation() {
        let config = AppConfig::production();
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_bounds_fail_validation() {
        let mut config = AppConfig::development();
        config.article.title_min = 100;
        assert!(config.validate().is_err());
    }
}
