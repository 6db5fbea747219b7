//! Runs one CardDuel match.
//!
//! Listens on `CARDDUEL_BIND` (default `0.0.0.0:5000`). Log verbosity
//! follows `RUST_LOG` and defaults to `info`.

use cardduel::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let bind = std::env::var("CARDDUEL_BIND").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

    let server = DuelServer::builder()
        .bind(&bind)
        .match_config(MatchConfig::default())
        .build()
        .await?;
    server.run().await?;
    Ok(())
}
