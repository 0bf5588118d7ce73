//! Configuration module
//!
//! Server and pipeline settings, loaded from the environment (and an optional `.env`
//! file). There is no other process-wide state.

use std::env;

const SERVER_PORT: u16 = 8080;
/// Request body ceiling of the reference deployment: 2 MiB.
const MAX_BODY_SIZE_BYTES: usize = 2 << 20;
const HTTP_CONCURRENCY_LIMIT: usize = 1024;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub max_body_size_bytes: usize,
    /// Upper bound on per-item transforms running at once within one request.
    pub transform_concurrency: usize,
    pub http_concurrency_limit: usize,
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            max_body_size_bytes: MAX_BODY_SIZE_BYTES,
            transform_concurrency: default_transform_concurrency(),
            http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
            environment: "development".to_string(),
        }
    }
}

fn default_transform_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, anyhow::Error> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("{} must be a valid number, got '{}'", name, raw)),
        Err(_) => Ok(None),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let server_port = match parse_var::<u16>("SERVER_PORT")? {
            Some(port) => port,
            None => parse_var::<u16>("PORT")?.unwrap_or(defaults.server_port),
        };

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or(defaults.environment);

        let config = Config {
            server_port,
            max_body_size_bytes: parse_var("MAX_BODY_SIZE_BYTES")?
                .unwrap_or(defaults.max_body_size_bytes),
            transform_concurrency: parse_var("TRANSFORM_CONCURRENCY")?
                .unwrap_or(defaults.transform_concurrency),
            http_concurrency_limit: parse_var("HTTP_CONCURRENCY_LIMIT")?
                .unwrap_or(defaults.http_concurrency_limit),
            environment,
        };

        config.validate()?;
        Ok(config)
    }

    /// Override the listen port (e.g. from a `--port` flag).
    pub fn with_port(mut self, port: u16) -> Self {
        self.server_port = port;
        self
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_body_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_BODY_SIZE_BYTES must be greater than 0"));
        }

        if self.transform_concurrency == 0 {
            return Err(anyhow::anyhow!(
                "TRANSFORM_CONCURRENCY must be greater than 0"
            ));
        }

        if self.http_concurrency_limit == 0 {
            return Err(anyhow::anyhow!(
                "HTTP_CONCURRENCY_LIMIT must be greater than 0"
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}
