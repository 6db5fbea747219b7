//! Plays one CardDuel match from the terminal.
//!
//! Connects to the address given as the first argument, else
//! `CARDDUEL_SERVER`, else `127.0.0.1:5000`. Commands: `upload <path>`,
//! `pass`, `play <card id>`, `resign`, `quit`.

use std::io::BufRead;

use cardduel_client::{DEFAULT_SERVER_ADDR, DuelClient, FsDeckSource};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let addr = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("CARDDUEL_SERVER").ok())
        .unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());

    let client = DuelClient::connect(&addr, FsDeckSource).await?;

    // Stdin blocks, so it gets its own thread and hands lines over.
    let (line_tx, line_rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    let (display_tx, mut display_rx) = mpsc::unbounded_channel::<String>();
    let printer = tokio::spawn(async move {
        while let Some(line) = display_rx.recv().await {
            println!("{line}");
        }
    });

    client.run(line_rx, display_tx).await?;
    printer.await?;
    Ok(())
}
