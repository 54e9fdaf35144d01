use std::env;

/// Process configuration, read once at startup. Values come from the
/// environment, with `.env` loaded first when present.
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub admin_username: String,
    pub admin_password: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://warung.db?mode=rwc".to_owned()),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_owned()),
            admin_username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_owned()),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin12345".to_owned()),
        }
    }
}
