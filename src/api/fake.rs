//! Scripted in-memory `RemoteApi` for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::api::{NewPost, Page, PageQuery, RemoteApi, SharedApi, User};
use crate::app::{Result, XcliError};
use crate::domain::{Attachment, Item};

/// What the next list call answers with.
pub enum Reply {
    Page(Page),
    Fail(u16),
    /// Never completes.
    Hang,
}

#[derive(Default)]
pub struct FakeApi {
    lists: Mutex<VecDeque<Reply>>,
    create_failures: Mutex<VecDeque<u16>>,
    pub queries: Mutex<Vec<(String, PageQuery)>>,
    pub posts: Mutex<Vec<NewPost>>,
    pub uploads: Mutex<Vec<Attachment>>,
    created: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> (Arc<FakeApi>, SharedApi) {
        let fake = Arc::new(self);
        let api: SharedApi = fake.clone();
        (fake, api)
    }

    pub fn with_page(self, ids: &[&str], has_more: bool) -> Self {
        self.push(Reply::Page(page(ids, has_more)));
        self
    }

    pub fn with_failure(self, status: u16) -> Self {
        self.push(Reply::Fail(status));
        self
    }

    pub fn with_hang(self) -> Self {
        self.push(Reply::Hang);
        self
    }

    pub fn failing_create(self, status: u16) -> Self {
        self.create_failures.lock().unwrap().push_back(status);
        self
    }

    pub fn push(&self, reply: Reply) {
        self.lists.lock().unwrap().push_back(reply);
    }

    pub fn list_calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    async fn answer(&self, endpoint: &str, query: &PageQuery) -> Result<Page> {
        self.queries
            .lock()
            .unwrap()
            .push((endpoint.to_string(), query.clone()));
        let next = self.lists.lock().unwrap().pop_front();
        match next {
            Some(Reply::Page(p)) => Ok(p),
            Some(Reply::Fail(status)) => Err(remote(status)),
            Some(Reply::Hang) => futures::future::pending().await,
            None => Ok(Page::default()),
        }
    }
}

pub fn page(ids: &[&str], has_more: bool) -> Page {
    Page {
        items: ids.iter().map(|id| Item::new(*id, format!("post {}", id))).collect(),
        has_more,
    }
}

fn remote(status: u16) -> XcliError {
    XcliError::Remote {
        status,
        body: format!("{{\"title\":\"scripted {}\"}}", status),
    }
}

#[async_trait]
impl RemoteApi for FakeApi {
    async fn me(&self) -> Result<User> {
        Ok(User {
            id: "1".into(),
            username: Some("me".into()),
            name: Some("Me".into()),
        })
    }

    async fn create_post(&self, post: &NewPost) -> Result<Item> {
        self.posts.lock().unwrap().push(post.clone());
        if let Some(status) = self.create_failures.lock().unwrap().pop_front() {
            return Err(remote(status));
        }
        let n = self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Item::new(format!("{}", 9000 + n), post.text.clone()))
    }

    async fn mentions(&self, _user_id: &str, query: &PageQuery) -> Result<Page> {
        self.answer("mentions", query).await
    }

    async fn own_posts(&self, _user_id: &str, query: &PageQuery) -> Result<Page> {
        self.answer("own_posts", query).await
    }

    async fn timeline(&self, _user_id: &str, query: &PageQuery) -> Result<Page> {
        self.answer("timeline", query).await
    }

    async fn upload_media(&self, attachment: &Attachment) -> Result<String> {
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push(attachment.clone());
        Ok(format!("media-{}", uploads.len()))
    }
}
