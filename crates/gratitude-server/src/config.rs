use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Sqlite,
    Memory,
}

impl FromStr for StoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            other => bail!("unknown store '{other}', expected 'sqlite' or 'memory'"),
        }
    }
}

pub struct Config {
    pub host: String,
    pub port: u16,
    pub store: StoreKind,
    pub db_path: PathBuf,
    pub admin_key: String,
    pub seed_demo: bool,
    pub max_audio_bytes: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        let admin_key = var("GRATITUDE_ADMIN_KEY").unwrap_or_else(|| {
            warn!("GRATITUDE_ADMIN_KEY not set, using the development key");
            "admin".to_string()
        });

        Ok(Self {
            host: try_load("GRATITUDE_HOST", "0.0.0.0")?,
            port: try_load("GRATITUDE_PORT", "3000")?,
            store: try_load("GRATITUDE_STORE", "sqlite")?,
            db_path: try_load("GRATITUDE_DB_PATH", "gratitude.db")?,
            admin_key,
            seed_demo: try_load("GRATITUDE_SEED_DEMO", "false")?,
            max_audio_bytes: try_load("GRATITUDE_MAX_AUDIO_BYTES", "5242880")?,
        })
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("invalid {key} value '{raw}'"))
}
