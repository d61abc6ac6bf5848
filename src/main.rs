use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use xcli::app::AppContext;
use xcli::cli::{commands, Cli, Commands};
use xcli::config::Config;
use xcli::tui::feed::FeedKind;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean JSON
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let ctx = Arc::new(AppContext::new(config)?);
    let limits = ctx.config.limits.clone();

    match cli.command {
        None => {
            commands::menu(ctx).await?;
        }
        Some(Commands::Post { text, images }) => {
            let text = match text {
                Some(text) => text,
                None => commands::read_stdin_text()?,
            };
            commands::post(&ctx, &text, &images).await?;
        }
        Some(Commands::Mentions { all, limit }) => {
            commands::mentions(&ctx, all, limit.unwrap_or(limits.mentions)).await?;
        }
        Some(Commands::Interact { limit }) => {
            commands::browse(ctx, FeedKind::Mentions, limit.unwrap_or(limits.interact)).await?;
        }
        Some(Commands::Thread { limit }) => {
            commands::browse(ctx, FeedKind::Thread, limit.unwrap_or(limits.thread)).await?;
        }
        Some(Commands::Timeline { limit }) => {
            commands::browse(ctx, FeedKind::Timeline, limit.unwrap_or(limits.timeline)).await?;
        }
        Some(Commands::Engagement { limit }) => {
            commands::engagement(&ctx, limit.unwrap_or(limits.engagement)).await?;
        }
    }

    Ok(())
}
