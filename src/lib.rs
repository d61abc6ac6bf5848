//! # xcli
//!
//! A personal command-line client for the X API v2.
//!
//! ## Architecture
//!
//! ```text
//! RemoteApi → ListCursor → NavigationController → terminal UI
//!                                   │
//!                    ComposeSession ┴ StateStore (unread cursor)
//! ```
//!
//! - [`api`]: Signed HTTP client and wire types
//! - [`store`]: The persisted unread cursor
//! - [`tui`]: List cursor, navigation state machine and rendering
//! - [`compose`]: Drafts and posting
//!
//! ## Quick Start
//!
//! ```bash
//! # Post, with an image
//! xcli post "hello" --image cat.png
//!
//! # Mentions you have not seen yet, as JSON
//! xcli mentions
//!
//! # Browse and reply to mentions
//! xcli interact
//!
//! # Interactive menu
//! xcli
//! ```

/// X API v2 access.
///
/// - [`RemoteApi`](api::RemoteApi): Async trait over the endpoints xcli uses
/// - [`XApiClient`](api::XApiClient): reqwest implementation with OAuth 1.0a signing
/// - [`types`](api::types): Wire structs converted into [`Item`](domain::Item)
pub mod api;

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the remote
/// API, the state store and the configuration.
pub mod app;

/// Command-line interface using clap.
///
/// - `post [text] [--image PATH]...` - Publish a post
/// - `mentions [--all] [--limit N]` - Print unseen mentions
/// - `interact`, `thread`, `timeline` - Browse interactively
/// - `engagement [--limit N]` - Print metrics of recent posts
pub mod cli;

/// Drafting and committing posts.
pub mod compose;

/// Configuration management.
///
/// Loads from `~/.config/xcli/config.toml`, supporting:
/// - API credentials (overridable from the environment)
/// - Per-command default limits
/// - Custom colors (named or hex)
/// - Custom keybindings
pub mod config;

/// Core domain models.
///
/// - [`Item`](domain::Item): A fetched post
/// - [`ItemId`](domain::ItemId): Snowflake id with numeric ordering
/// - [`Draft`](domain::Draft): Unsent post content
pub mod domain;

/// Persistence of the unread cursor.
///
/// - [`StateStore`](store::StateStore): Load/save contract
/// - [`JsonStateStore`](store::JsonStateStore): Atomic JSON file implementation
pub mod store;

/// Terminal user interface.
///
/// A line-oriented menu, then a ratatui list/detail/compose view driven by
/// the [`NavigationController`](tui::controller::NavigationController).
///
/// Keybindings: j/k navigate, Enter opens and replies, m marks mentions
/// read, o opens in browser, Esc goes back, q quits.
pub mod tui;
