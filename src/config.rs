use envconfig::Envconfig;
use std::time::Duration;

use crate::auth::PasswordScheme;

#[derive(Envconfig)]
pub struct Config {
    #[envconfig(from = "PORT", default = "8080")]
    pub port: u16,
    /// Keeps clubs in PostgreSQL when set; otherwise they live in memory.
    #[envconfig(from = "DATABASE_URL")]
    pub db_url: Option<String>,
    /// Base64 HS256 secret for session tokens.
    #[envconfig(from = "JWT_SECRET")]
    pub jwt_secret: Option<String>,
    #[envconfig(from = "SESSION_TTL_HOURS", default = "168")]
    pub session_ttl_hours: u64,
    #[envconfig(from = "PASSWORD_SCHEME", default = "plaintext")]
    pub password_scheme: PasswordScheme,
    #[envconfig(from = "SEED_DEMO_DATA", default = "true")]
    pub seed_demo_data: bool,
    #[envconfig(from = "ASSETS_DIR", default = "assets")]
    pub assets_dir: String,
}

impl Config {
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_hours * 60 * 60)
    }
}
