use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::api::{PageQuery, User};
use crate::app::{AppContext, Result, XcliError};
use crate::compose::ComposeSession;
use crate::domain::{Item, ItemId, MAX_ATTACHMENTS};
use crate::tui::{self, feed::FeedKind};

#[derive(Debug, Serialize)]
pub struct MentionsReport {
    pub user: User,
    pub mentions: Vec<Item>,
}

#[derive(Debug, Serialize)]
pub struct EngagementReport {
    pub user: User,
    pub posts: Vec<Item>,
}

pub async fn post(ctx: &AppContext, text: &str, images: &[PathBuf]) -> Result<()> {
    let item = publish(ctx, text, images).await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({ "id": item.id, "text": item.text }))?
    );
    Ok(())
}

/// Builds a draft from `text` and image files, then sends it.
pub async fn publish(ctx: &AppContext, text: &str, images: &[PathBuf]) -> Result<Item> {
    if images.len() > MAX_ATTACHMENTS {
        return Err(XcliError::Usage(format!(
            "at most {} --image options are allowed, got {}",
            MAX_ATTACHMENTS,
            images.len()
        )));
    }

    let mut session = ComposeSession::new();
    session.append(text.trim());
    for path in images {
        let mime = image_mime(path)?;
        let bytes = std::fs::read(path).map_err(|e| {
            XcliError::Usage(format!("cannot read image {}: {}", path.display(), e))
        })?;
        session.attach(bytes, mime)?;
    }

    session.commit(ctx.api.as_ref()).await
}

/// Post text given on stdin, for `xcli post` without an argument.
pub fn read_stdin_text() -> Result<String> {
    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;
    Ok(text)
}

fn image_mime(path: &Path) -> Result<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => Ok("image/png"),
        Some("jpg") | Some("jpeg") => Ok("image/jpeg"),
        Some("gif") => Ok("image/gif"),
        Some("webp") => Ok("image/webp"),
        _ => Err(XcliError::Usage(format!(
            "unsupported image type: {}",
            path.display()
        ))),
    }
}

pub async fn mentions(ctx: &AppContext, all: bool, limit: u8) -> Result<()> {
    let report = mentions_report(ctx, all, limit).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Fetches one page of mentions, keeps the unseen ones unless `all` is set
/// and moves the unread cursor to the newest fetched id.
pub async fn mentions_report(ctx: &AppContext, all: bool, limit: u8) -> Result<MentionsReport> {
    let user = ctx.api.me().await?;
    let seen = if all { None } else { ctx.state.load() };

    let query = PageQuery {
        since_id: seen.clone(),
        ..PageQuery::new(limit)
    };
    let page = ctx.api.mentions(&user.id, &query).await?;
    let newest = page.items.iter().map(|i| &i.id).max().cloned();

    let mentions = match &seen {
        Some(seen) => unread_since(page.items, seen),
        None => page.items,
    };
    info!(count = mentions.len(), all, "Fetched mentions");

    if let Some(newest) = newest {
        if let Err(e) = ctx.state.save(&newest) {
            warn!(error = %e, "Could not save unread cursor");
            eprintln!("Warning: could not save read state: {}", e.one_line());
        }
    }

    Ok(MentionsReport { user, mentions })
}

/// Items strictly newer than `seen`, in their original order.
pub fn unread_since(items: Vec<Item>, seen: &ItemId) -> Vec<Item> {
    items
        .into_iter()
        .filter(|item| item.id.is_newer_than(seen))
        .collect()
}

pub async fn engagement(ctx: &AppContext, limit: u8) -> Result<()> {
    let report = engagement_report(ctx, limit).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub async fn engagement_report(ctx: &AppContext, limit: u8) -> Result<EngagementReport> {
    let user = ctx.api.me().await?;
    let page = ctx.api.own_posts(&user.id, &PageQuery::new(limit)).await?;
    Ok(EngagementReport {
        user,
        posts: page.items,
    })
}

/// Opens the interactive list for `kind`.
pub async fn browse(ctx: Arc<AppContext>, kind: FeedKind, limit: u8) -> Result<()> {
    let user = ctx.api.me().await?;
    tui::run(ctx, user, kind, limit).await
}

pub async fn menu(ctx: Arc<AppContext>) -> Result<()> {
    let user = ctx.api.me().await?;
    tui::run_menu(ctx, user).await
}
