mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Utc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use gratitude_api::routes::router;
use gratitude_api::state::AppStateInner;
use gratitude_core::memory::{MemoryLedgerStore, MemoryStore};
use gratitude_core::{LedgerStore, NoteStore};
use gratitude_db::{Database, SqliteStore};

use crate::config::{Config, StoreKind};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gratitude=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::load()?;

    let (store, ledgers) = open_stores(&config)?;
    info!("Using {:?} store", config.store);

    let state = AppStateInner::new(store, ledgers, config.admin_key, config.max_audio_bytes);

    // First snapshot before accepting traffic
    state.refresh().await;

    let app = router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Gratitude wall listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Opens the configured record store adapter and its ledger store.
fn open_stores(config: &Config) -> anyhow::Result<(Arc<dyn NoteStore>, Arc<dyn LedgerStore>)> {
    match config.store {
        StoreKind::Sqlite => {
            let db = Database::open(&config.db_path)?;
            if config.seed_demo {
                gratitude_db::seed::seed_demo(&db)?;
            }
            let sqlite = Arc::new(SqliteStore::new(db));
            let store: Arc<dyn NoteStore> = sqlite.clone();
            let ledgers: Arc<dyn LedgerStore> = sqlite;
            Ok((store, ledgers))
        }
        StoreKind::Memory => {
            let notes = if config.seed_demo {
                gratitude_db::seed::demo_notes(Utc::now())
            } else {
                Vec::new()
            };
            info!("Memory store starts with {} notes", notes.len());
            let store: Arc<dyn NoteStore> = Arc::new(MemoryStore::with_notes(notes));
            let ledgers: Arc<dyn LedgerStore> = Arc::new(MemoryLedgerStore::new());
            Ok((store, ledgers))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(store: StoreKind, seed_demo: bool) -> Config {
        Config {
            host: "127.0.0.1".into(),
            port: 0,
            store,
            db_path: "unused.db".into(),
            admin_key: "admin".into(),
            seed_demo,
            max_audio_bytes: 1024,
        }
    }

    #[test]
    fn memory_store_honors_demo_seed() {
        let (store, _) = open_stores(&config(StoreKind::Memory, true)).unwrap();
        assert_eq!(store.list().unwrap().len(), 4);

        let (store, _) = open_stores(&config(StoreKind::Memory, false)).unwrap();
        assert!(store.list().unwrap().is_empty());
    }
}
