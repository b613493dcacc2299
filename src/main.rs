use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use env_logger::{Env, Target};
use log::info;

use rusty_chess_server::api::{self, AppState};
use rusty_chess_server::session::{SessionStore, StoreConfig};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .init();

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8000".into())
        .parse()
        .unwrap_or(8000);
    let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| "static".into());

    let defaults = StoreConfig::default();
    let config = StoreConfig {
        capacity: env_parsed("SESSION_CAPACITY", defaults.capacity),
        ttl: Duration::from_secs(env_parsed(
            "SESSION_TTL_SECS",
            defaults.ttl.as_secs(),
        )),
    };

    let store = Arc::new(SessionStore::new(config));
    let app = api::router(AppState { store }, &static_dir);

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!("Chess server listening on http://{addr} (client from {static_dir}/)");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
