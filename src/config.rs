use anyhow::{bail, Context};

/// Which `InventoryStore` implementation the service runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres { database_url: String },
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub backend: StoreBackend,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    /// Only honoured by the memory backend.
    pub seed_demo_data: bool,
    pub seed_count: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests don't touch process env.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match lookup("STORE_BACKEND")
            .unwrap_or_else(|| "postgres".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "postgres" => StoreBackend::Postgres {
                database_url: lookup("DATABASE_URL").context("DATABASE_URL must be set")?,
            },
            "memory" => StoreBackend::Memory,
            other => bail!("STORE_BACKEND must be `postgres` or `memory`, got `{}`", other),
        };

        Ok(Self {
            backend,
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            max_connections: lookup("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "20".to_string())
                .parse()
                .context("DB_MAX_CONNECTIONS must be a valid number")?,
            seed_demo_data: lookup("SEED_DEMO_DATA")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            seed_count: lookup("SEED_COUNT")
                .unwrap_or_else(|| "200".to_string())
                .parse()
                .context("SEED_COUNT must be a valid number")?,
        })
    }
}
