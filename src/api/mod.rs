pub mod http;
pub mod oauth;
pub mod types;

#[cfg(test)]
pub mod fake;

use std::sync::Arc;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::{Attachment, Item, ItemId};

pub use http::XApiClient;
pub use types::User;

/// One page of items in API order (newest first).
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<Item>,
    /// The server reported a further page of older items.
    pub has_more: bool,
}

/// Window of a list request. `since_id` and `until_id` are exclusive bounds.
#[derive(Debug, Clone)]
pub struct PageQuery {
    pub limit: u8,
    pub since_id: Option<ItemId>,
    pub until_id: Option<ItemId>,
}

impl PageQuery {
    pub fn new(limit: u8) -> Self {
        Self {
            limit,
            since_id: None,
            until_id: None,
        }
    }
}

/// A post ready to be sent. Media must already be uploaded.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub text: String,
    pub media_ids: Vec<String>,
    pub reply_to: Option<ItemId>,
}

#[async_trait]
pub trait RemoteApi {
    /// The account the credentials belong to.
    async fn me(&self) -> Result<User>;

    async fn create_post(&self, post: &NewPost) -> Result<Item>;

    async fn mentions(&self, user_id: &str, query: &PageQuery) -> Result<Page>;

    /// Posts authored by `user_id`, with public metrics.
    async fn own_posts(&self, user_id: &str, query: &PageQuery) -> Result<Page>;

    /// Home timeline of `user_id`, newest first.
    async fn timeline(&self, user_id: &str, query: &PageQuery) -> Result<Page>;

    /// Uploads one media blob and returns its media id.
    async fn upload_media(&self, attachment: &Attachment) -> Result<String>;
}

pub type SharedApi = Arc<dyn RemoteApi + Send + Sync>;
