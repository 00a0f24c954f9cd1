//! Relay bot entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config from the environment
//!   3. Init logger at the configured level
//!   4. Build the responder
//!   5. Authorize the Telegram bot (fatal on failure)
//!   6. Spawn Ctrl-C → shutdown signal watcher
//!   7. Run the listener until shutdown

use relay_bot::comms::Listener;
use relay_bot::comms::telegram::TelegramChannel;
use relay_bot::error::AppError;
use relay_bot::llm::Responder;
use relay_bot::{config, logger};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Load .env if present; the file is optional.
    let _ = dotenvy::dotenv();

    let config = config::load()?;

    logger::init(config.log_level)?;

    info!(
        log_level = %config.log_level,
        http_timeout_secs = ?config.http_timeout.map(|t| t.as_secs()),
        "config loaded"
    );

    let responder = Responder::from_config(&config)?;
    let channel = TelegramChannel::connect(&config.telegram_bot_token).await?;
    let listener = Listener::new(responder);

    let shutdown = CancellationToken::new();

    let ctrlc_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received, initiating shutdown");
            ctrlc_token.cancel();
        }
    });

    let stats = channel.run(&listener, shutdown).await;

    info!(account = %channel.username(), replied = stats.replied, "relay bot stopped");
    Ok(())
}
