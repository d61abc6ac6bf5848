use async_trait::async_trait;

use crate::api::{Page, PageQuery, SharedApi};
use crate::app::Result;
use crate::domain::ItemId;

use super::list_cursor::PageFetcher;

/// The lists the interactive UI can browse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    /// Mentions of the authenticated user; tracks the unread cursor.
    Mentions,
    /// The user's own posts; replies build a thread.
    Thread,
    /// Home timeline, read-only.
    Timeline,
}

impl FeedKind {
    pub const ALL: [FeedKind; 3] = [FeedKind::Mentions, FeedKind::Thread, FeedKind::Timeline];

    pub fn title(self) -> &'static str {
        match self {
            FeedKind::Mentions => "Mentions",
            FeedKind::Thread => "Your Posts",
            FeedKind::Timeline => "Timeline",
        }
    }

    /// Plural noun used in "Fetching ..." and "No ... found." messages.
    pub fn noun(self) -> &'static str {
        match self {
            FeedKind::Mentions => "mentions",
            FeedKind::Thread => "posts",
            FeedKind::Timeline => "timeline posts",
        }
    }

    pub fn can_reply(self) -> bool {
        matches!(self, FeedKind::Mentions | FeedKind::Thread)
    }

    pub fn compose_label(self) -> &'static str {
        match self {
            FeedKind::Thread => "Threading",
            _ => "Replying to",
        }
    }

    pub fn tracks_unread(self) -> bool {
        self == FeedKind::Mentions
    }

    /// A newly created post belongs at the top of this list.
    pub fn shows_new_posts(self) -> bool {
        matches!(self, FeedKind::Thread | FeedKind::Timeline)
    }
}

/// Pages of one feed for one user, fetched with a fixed page size.
pub struct FeedSource {
    api: SharedApi,
    kind: FeedKind,
    user_id: String,
    limit: u8,
}

impl FeedSource {
    pub fn new(api: SharedApi, kind: FeedKind, user_id: impl Into<String>, limit: u8) -> Self {
        Self {
            api,
            kind,
            user_id: user_id.into(),
            limit,
        }
    }
}

#[async_trait]
impl PageFetcher for FeedSource {
    async fn fetch_page(&self, before: Option<ItemId>) -> Result<Page> {
        let query = PageQuery {
            until_id: before,
            ..PageQuery::new(self.limit)
        };
        match self.kind {
            FeedKind::Mentions => self.api.mentions(&self.user_id, &query).await,
            FeedKind::Thread => self.api.own_posts(&self.user_id, &query).await,
            FeedKind::Timeline => self.api.timeline(&self.user_id, &query).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;

    #[tokio::test]
    async fn test_source_routes_by_kind_and_pages_backwards() {
        let (fake, api) = FakeApi::new().shared();
        let source = FeedSource::new(api.clone(), FeedKind::Thread, "1", 10);
        source.fetch_page(Some(ItemId::from("77"))).await.unwrap();
        FeedSource::new(api, FeedKind::Timeline, "1", 20)
            .fetch_page(None)
            .await
            .unwrap();

        let queries = fake.queries.lock().unwrap();
        assert_eq!(queries[0].0, "own_posts");
        assert_eq!(queries[0].1.limit, 10);
        assert_eq!(queries[0].1.until_id, Some(ItemId::from("77")));
        assert_eq!(queries[1].0, "timeline");
        assert_eq!(queries[1].1.until_id, None);
    }

    #[test]
    fn test_kind_capabilities() {
        assert!(FeedKind::Mentions.can_reply());
        assert!(FeedKind::Thread.can_reply());
        assert!(!FeedKind::Timeline.can_reply());
        assert!(FeedKind::Mentions.tracks_unread());
        assert!(!FeedKind::Mentions.shows_new_posts());
        assert_eq!(FeedKind::Thread.compose_label(), "Threading");
    }
}
