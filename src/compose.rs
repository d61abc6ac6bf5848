use tracing::info;

use crate::api::{NewPost, RemoteApi};
use crate::app::{Result, XcliError};
use crate::domain::{Draft, Item, ItemId};

/// An open draft and the steps to turn it into a post.
///
/// `commit` borrows the session, so a failed send leaves the draft as it was
/// and the user can retry or cancel.
#[derive(Debug, Default)]
pub struct ComposeSession {
    draft: Draft,
}

impl ComposeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replying_to(parent: ItemId) -> Self {
        Self {
            draft: Draft::reply_to(parent),
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn append(&mut self, text: &str) {
        self.draft.append(text);
    }

    pub fn push_char(&mut self, c: char) {
        self.draft.insert_char(c);
    }

    pub fn backspace(&mut self) {
        self.draft.backspace();
    }

    pub fn cursor_left(&mut self) {
        self.draft.move_left();
    }

    pub fn cursor_right(&mut self) {
        self.draft.move_right();
    }

    pub fn attach(&mut self, bytes: Vec<u8>, mime: impl Into<String>) -> Result<()> {
        self.draft.attach(bytes, mime)
    }

    /// Uploads every attachment, then creates the post in one call.
    pub async fn commit(&self, api: &(dyn RemoteApi + Send + Sync)) -> Result<Item> {
        if self.draft.is_empty() {
            return Err(XcliError::EmptyDraft);
        }

        let mut media_ids = Vec::with_capacity(self.draft.attachments().len());
        for attachment in self.draft.attachments() {
            media_ids.push(api.upload_media(attachment).await?);
        }

        let post = NewPost {
            text: self.draft.text().trim().to_string(),
            media_ids,
            reply_to: self.draft.reply_target().cloned(),
        };
        let item = api.create_post(&post).await?;
        info!(id = %item.id, attachments = post.media_ids.len(), "Draft committed");
        Ok(item)
    }

    pub fn discard(self) {
        if !self.draft.is_empty() {
            info!("Draft discarded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::domain::MAX_ATTACHMENTS;

    #[tokio::test]
    async fn test_commit_uploads_then_posts_reply() {
        let api = FakeApi::new();
        let mut session = ComposeSession::replying_to(ItemId::from("55"));
        session.append("thanks!");
        session.attach(vec![1, 2], "image/png").unwrap();
        session.attach(vec![3], "image/png").unwrap();

        let item = session.commit(&api).await.unwrap();
        assert_eq!(item.text, "thanks!");

        let posts = api.posts.lock().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].media_ids, vec!["media-1", "media-2"]);
        assert_eq!(posts[0].reply_to, Some(ItemId::from("55")));
        assert_eq!(api.uploads.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_draft_never_reaches_network() {
        let api = FakeApi::new();
        let mut session = ComposeSession::new();
        session.append("  \n ");

        let err = session.commit(&api).await.unwrap_err();
        assert!(matches!(err, XcliError::EmptyDraft));
        assert!(api.posts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remote_failure_keeps_draft() {
        let api = FakeApi::new().failing_create(403);
        let mut session = ComposeSession::new();
        session.append("hello");

        let err = session.commit(&api).await.unwrap_err();
        assert!(matches!(err, XcliError::Remote { status: 403, .. }));
        assert_eq!(session.draft().text(), "hello");

        // Retry goes through once the server accepts it.
        assert!(session.commit(&api).await.is_ok());
    }

    #[test]
    fn test_fifth_attachment_leaves_four() {
        let mut session = ComposeSession::new();
        for _ in 0..MAX_ATTACHMENTS {
            session.attach(vec![0], "image/png").unwrap();
        }
        assert!(matches!(
            session.attach(vec![1], "image/png"),
            Err(XcliError::AttachmentLimitExceeded)
        ));
        assert_eq!(session.draft().attachments().len(), MAX_ATTACHMENTS);
    }

    #[test]
    fn test_editing_goes_through_draft() {
        let mut session = ComposeSession::new();
        session.push_char('a');
        session.push_char('c');
        session.cursor_left();
        session.push_char('b');
        session.cursor_right();
        session.backspace();
        assert_eq!(session.draft().text(), "ab");
        session.discard();
    }
}
