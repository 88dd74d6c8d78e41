mod config;
mod feed;
mod message;
mod telegram;

use std::process::ExitCode;

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::telegram::TelegramSender;

const LOG_FILE: &str = "newsbot.log";

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Log to the console and to an append-only file next to the binary.
    // The guard must drop on the way out of main so the file writer flushes;
    // exiting via std::process::exit would lose buffered log lines.
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE);
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,newsbot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false),
        )
        .init();

    // Single recovery point: everything below logs its failure and
    // propagates here, so the process always exits through a log line.
    if let Err(e) = run().await {
        error!("Script failed: {:#}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run() -> Result<()> {
    info!("Starting newsbot");

    let config = Config::from_env()?;

    let client = feed::http_client()?;
    let url = feed::pick_feed(&mut rand::rng());
    let article = feed::fetch_latest_article(&client, url).await?;
    if article.is_none() {
        info!("No article found, using default message");
    }
    let text = message::format_message(article.as_ref());

    let sender = TelegramSender::new(&config.bot_token);
    telegram::dispatch_all(&sender, &config.destinations, &text).await
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn test_fatal_log_line_reaches_file_after_guard_drops() {
        let dir = std::env::temp_dir().join(format!("newsbot-log-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let file_appender = tracing_appender::rolling::never(&dir, super::LOG_FILE);
        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false),
        );

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!("Script failed: boom");
        });

        // Dropping the guard is what flushes the non-blocking writer; main
        // relies on this by returning an ExitCode instead of exiting early.
        drop(guard);

        let contents = std::fs::read_to_string(dir.join(super::LOG_FILE)).unwrap();
        assert!(contents.contains("Script failed: boom"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
