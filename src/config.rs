use std::env;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const PORT: &str = "PORT";
    pub const DATABASE_URL: &str = "DATABASE_URL";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 8080;
    pub const DATABASE_URL: &str = "./todo.db";
}

/// Port the HTTP server binds to
pub fn port() -> u16 {
    env::var(env_vars::PORT)
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(defaults::PORT)
}

/// Path to the SQLite database file
pub fn database_url() -> String {
    env::var(env_vars::DATABASE_URL).unwrap_or_else(|_| defaults::DATABASE_URL.to_string())
}
