use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub backend: BackendConfig,
    pub server: ServerConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the pharmacy REST API, without trailing slash
    pub base_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub secure_cookie: bool,
    /// Sessions untouched for longer than this are purged
    pub idle_timeout_mins: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Backend overrides
        if let Ok(v) = env::var("FARMACIA_BACKEND_URL").or_else(|_| env::var("VITE_URL_BACKEND")) {
            self = self.with_backend_url(&v);
        }
        if let Ok(v) = env::var("FARMACIA_BACKEND_TIMEOUT_SECS") {
            self.backend.request_timeout_secs = v.parse().unwrap_or(self.backend.request_timeout_secs);
        }

        // Server overrides
        if let Ok(v) = env::var("FARMACIA_PORT").or_else(|_| env::var("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("FARMACIA_ENABLE_REQUEST_LOGGING") {
            self.server.enable_request_logging = v.parse().unwrap_or(self.server.enable_request_logging);
        }

        // Session overrides
        if let Ok(v) = env::var("FARMACIA_SESSION_COOKIE") {
            if !v.trim().is_empty() {
                self.session.cookie_name = v.trim().to_string();
            }
        }
        if let Ok(v) = env::var("FARMACIA_SECURE_COOKIE") {
            self.session.secure_cookie = v.parse().unwrap_or(self.session.secure_cookie);
        }
        if let Ok(v) = env::var("FARMACIA_SESSION_IDLE_MINS") {
            self.session.idle_timeout_mins = v.parse().unwrap_or(self.session.idle_timeout_mins);
        }

        self
    }

    /// Replace the backend URL; blank values are ignored.
    pub fn with_backend_url(mut self, url: &str) -> Self {
        let url = url.trim().trim_end_matches('/');
        if !url.is_empty() {
            self.backend.base_url = url.to_string();
        }
        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            backend: BackendConfig {
                base_url: "http://localhost:8080".to_string(),
                request_timeout_secs: 30,
            },
            server: ServerConfig {
                port: 3000,
                enable_request_logging: true,
            },
            session: SessionConfig {
                cookie_name: "farmacia_sid".to_string(),
                secure_cookie: false,
                idle_timeout_mins: 8 * 60,
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            backend: BackendConfig {
                base_url: "http://localhost:8080".to_string(),
                request_timeout_secs: 15,
            },
            server: ServerConfig {
                port: 3000,
                enable_request_logging: true,
            },
            session: SessionConfig {
                cookie_name: "farmacia_sid".to_string(),
                secure_cookie: true,
                idle_timeout_mins: 2 * 60,
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            backend: BackendConfig {
                base_url: "http://localhost:8080".to_string(),
                request_timeout_secs: 10,
            },
            server: ServerConfig {
                port: 3000,
                enable_request_logging: false,
            },
            session: SessionConfig {
                cookie_name: "farmacia_sid".to_string(),
                secure_cookie: true,
                idle_timeout_mins: 60,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    ($config:expr) => {
        matches!($config.environment, $crate::config::Environment::Production)
    };
}
