use std::env;

use tracing::warn;

pub const DEMO_KEY: &str = "DEMO_KEY";

/// Process configuration, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub backend_url: String,
    pub api_key: String,
    pub ppe_bucket: String,
    pub hazard_bucket: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:54321".into(),
            api_key: DEMO_KEY.into(),
            ppe_bucket: "ppe-icons".into(),
            hazard_bucket: "signage-icons".into(),
            port: 8080,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str, default: String| {
            lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()).unwrap_or(default)
        };
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("⚠️ Ignoring invalid PORT '{}', using {}", raw, defaults.port);
                defaults.port
            }),
            None => defaults.port,
        };
        Self {
            backend_url: text("BACKEND_URL", defaults.backend_url).trim_end_matches('/').to_string(),
            api_key: text("BACKEND_API_KEY", defaults.api_key),
            ppe_bucket: text("PPE_BUCKET", defaults.ppe_bucket),
            hazard_bucket: text("HAZARD_BUCKET", defaults.hazard_bucket),
            port,
        }
    }

    /// Demo mode serves a built-in letterhead instead of querying the backend.
    pub fn is_demo(&self) -> bool {
        self.api_key == DEMO_KEY
    }

    /// First characters of the key, for startup logs.
    pub fn key_preview(&self) -> &str {
        let end = self.api_key.char_indices().nth(10).map(|(i, _)| i).unwrap_or(self.api_key.len());
        &self.api_key[..end]
    }
}
