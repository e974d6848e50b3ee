//! Process configuration, loaded once at startup
//!
//! The navigation core never reads the environment; everything it needs
//! arrives through constructors.

/// Environment-derived configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Port for the message endpoint.
    pub port: u16,
    /// Delivery endpoint for submission records. Absent means log-only.
    pub webhook_url: Option<String>,
    /// Bot Framework app credentials. Absent means unauthenticated
    /// (local emulator) mode.
    pub app_id: Option<String>,
    pub app_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3978),
            webhook_url: non_empty(std::env::var("WEBHOOK_URL").ok()),
            app_id: non_empty(std::env::var("MICROSOFT_APP_ID").ok()),
            app_password: non_empty(std::env::var("MICROSOFT_APP_PASSWORD").ok()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
