use anyhow::{Context, Result};
use deadpool_postgres::{ManagerConfig, Pool, RecyclingMethod, Runtime};
use dotenv::var;
use tokio_postgres::NoTls;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;

/// Service settings, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub postgres_url: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let postgres_url = var("POSTGRES_URL").context("POSTGRES_URL must be set")?;
        let host = var("QVIEW_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = match var("QVIEW_PORT") {
            Ok(port) => port
                .parse()
                .with_context(|| format!("QVIEW_PORT is not a valid port: {port}"))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            postgres_url,
            host,
            port,
        })
    }

    /// Build the connection pool. No connection is opened until the first request needs one.
    pub fn pool(&self) -> Result<Pool> {
        let mut cfg = deadpool_postgres::Config::new();
        cfg.url = Some(self.postgres_url.clone());
        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .context("failed to create PostgreSQL pool")?;
        Ok(pool)
    }
}
