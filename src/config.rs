use std::net::{IpAddr, SocketAddr};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: IpAddr,
    pub server_port: u16,
    pub environment: Environment,
    pub log_level: String,
    /// Process-wide JWT signing secret. Rotating it invalidates every
    /// outstanding token; there is no migration path (tokens are stateless).
    pub jwt_secret: String,
    /// Token lifetime in seconds (default: 7 days).
    pub jwt_expiration_secs: u64,
    /// Frontend origin allowed by CORS in production.
    pub cors_origin: String,
}

/// Deployment environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

const DEFAULT_JWT_EXPIRATION_SECS: u64 = 7 * 24 * 60 * 60;

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required: `DATABASE_URL`, `JWT_SECRET`
    /// Optional with defaults: `SERVER_HOST`, `SERVER_PORT` / `PORT`,
    /// `ENVIRONMENT`, `LOG_LEVEL`, `JWT_EXPIRATION_SECS`, `CORS_ORIGIN`
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is not set, or if
    /// `SERVER_HOST` / `SERVER_PORT` / `JWT_EXPIRATION_SECS` contain invalid values.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;

        let jwt_expiration_secs = match std::env::var("JWT_EXPIRATION_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("JWT_EXPIRATION_SECS must be a positive integer"))?,
            Err(_) => DEFAULT_JWT_EXPIRATION_SECS,
        };

        let environment = match std::env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string())
            .as_str()
        {
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            _ => Environment::Development,
        };

        // Container platforms provide PORT; fall back to SERVER_PORT, then 5000
        let server_port = std::env::var("PORT")
            .or_else(|_| std::env::var("SERVER_PORT"))
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .map_err(|_| anyhow::anyhow!("SERVER_PORT / PORT must be a valid u16"))?;

        // In production, default to 0.0.0.0 so the platform can route traffic
        let default_host = if environment == Environment::Production {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        };

        let server_host = std::env::var("SERVER_HOST")
            .unwrap_or_else(|_| default_host.to_string())
            .parse::<IpAddr>()
            .map_err(|_| anyhow::anyhow!("SERVER_HOST must be a valid IP address"))?;

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let cors_origin =
            std::env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());

        Ok(Self {
            database_url,
            server_host,
            server_port,
            environment,
            log_level,
            jwt_secret,
            jwt_expiration_secs,
            cors_origin,
        })
    }

    /// Build the socket address for the server to bind to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            database_url: String::new(),
            server_host: IpAddr::from([127, 0, 0, 1]),
            server_port: 5000,
            environment: Environment::Development,
            log_level: "info".to_string(),
            jwt_secret: "secret".to_string(),
            jwt_expiration_secs: DEFAULT_JWT_EXPIRATION_SECS,
            cors_origin: "http://localhost:3000".to_string(),
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = test_config().socket_addr();
        assert_eq!(addr.port(), 5000);
    }

    #[test]
    fn test_default_token_lifetime_is_seven_days() {
        assert_eq!(test_config().jwt_expiration_secs, 604_800);
    }
}
