//! Loaded items plus a selection, refilled from older pages in the
//! background.
//!
//! At most one page fetch runs at a time. Its result arrives on a oneshot
//! that only the UI loop consumes, so the item list needs no locking.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::api::Page;
use crate::app::{Result, XcliError};
use crate::domain::{Item, ItemId};

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// A page of items strictly older than `before`, or the newest page.
    async fn fetch_page(&self, before: Option<ItemId>) -> Result<Page>;
}

struct PendingPage {
    rx: oneshot::Receiver<Result<Page>>,
    handle: JoinHandle<()>,
}

pub struct ListCursor {
    fetcher: Arc<dyn PageFetcher>,
    items: Vec<Item>,
    selected: Option<usize>,
    has_more: bool,
    pending: Option<PendingPage>,
}

impl ListCursor {
    /// Fetches the first page and waits for it.
    pub async fn load(fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        let page = fetcher.fetch_page(None).await?;
        Ok(Self::new(fetcher, page))
    }

    pub fn new(fetcher: Arc<dyn PageFetcher>, page: Page) -> Self {
        let mut cursor = Self {
            fetcher,
            items: Vec::with_capacity(page.items.len()),
            selected: None,
            has_more: page.has_more,
            pending: None,
        };
        cursor.append_unique(page.items);
        if !cursor.items.is_empty() {
            cursor.selected = Some(0);
        }
        cursor
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn current(&self) -> Option<&Item> {
        self.selected.and_then(|i| self.items.get(i))
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_fetching(&self) -> bool {
        self.pending.is_some()
    }

    /// Newest id loaded so far, independent of the selection.
    pub fn newest_id(&self) -> Option<&ItemId> {
        self.items.iter().map(|i| &i.id).max()
    }

    pub fn move_next(&mut self) -> bool {
        match self.selected {
            Some(i) if i + 1 < self.items.len() => {
                self.selected = Some(i + 1);
                true
            }
            _ => false,
        }
    }

    pub fn move_prev(&mut self) -> bool {
        match self.selected {
            Some(i) if i > 0 => {
                self.selected = Some(i - 1);
                true
            }
            _ => false,
        }
    }

    /// Moves up to `n` items forward, stopping at the last loaded one.
    pub fn move_forward(&mut self, n: usize) -> bool {
        let Some(i) = self.selected else {
            return false;
        };
        let target = (i + n).min(self.items.len().saturating_sub(1));
        self.selected = Some(target);
        target != i
    }

    pub fn move_back(&mut self, n: usize) -> bool {
        let Some(i) = self.selected else {
            return false;
        };
        let target = i.saturating_sub(n);
        self.selected = Some(target);
        target != i
    }

    /// Starts fetching the next older page when the selection is within one
    /// item of the end. Returns whether a fetch was started.
    pub fn ensure_lookahead(&mut self) -> bool {
        if self.pending.is_some() || !self.has_more {
            return false;
        }
        let (Some(selected), Some(oldest)) = (self.selected, self.items.last()) else {
            return false;
        };
        if selected + 2 < self.items.len() {
            return false;
        }

        let before = oldest.id.clone();
        debug!(before = %before, "Prefetching older page");

        let fetcher = Arc::clone(&self.fetcher);
        let (tx, rx) = oneshot::channel();
        let handle = tokio::spawn(async move {
            let result = fetcher.fetch_page(Some(before)).await;
            // The receiver is gone when the list was closed meanwhile.
            let _ = tx.send(result);
        });

        self.pending = Some(PendingPage { rx, handle });
        true
    }

    /// Resolves when the in-flight fetch finishes. Never resolves while
    /// nothing is in flight, which makes it safe inside `tokio::select!`.
    pub async fn page_ready(&mut self) -> Result<Page> {
        let result = match self.pending.as_mut() {
            Some(pending) => match (&mut pending.rx).await {
                Ok(result) => result,
                Err(_) => Err(XcliError::Other("background fetch ended early".into())),
            },
            None => std::future::pending().await,
        };
        self.pending = None;
        result
    }

    /// Folds a finished background fetch into the list. Failures only stop
    /// further prefetching.
    pub fn absorb(&mut self, result: Result<Page>) {
        self.pending = None;
        match result {
            Ok(page) => self.merge(page),
            Err(e) => {
                debug!(error = %e, "Background page fetch failed");
                self.has_more = false;
            }
        }
    }

    fn merge(&mut self, page: Page) {
        let selected_id = self.current().map(|i| i.id.clone());
        let added = self.append_unique(page.items);
        self.has_more = page.has_more && added > 0;
        self.reselect(selected_id);
        debug!(added, total = self.items.len(), has_more = self.has_more, "Merged page");
    }

    /// Puts a new item at the top, keeping the selected item selected.
    pub fn splice_front(&mut self, item: Item) {
        if self.items.iter().any(|i| i.id == item.id) {
            return;
        }
        let selected_id = self.current().map(|i| i.id.clone());
        self.items.insert(0, item);
        self.reselect(selected_id);
    }

    fn append_unique(&mut self, items: Vec<Item>) -> usize {
        let before = self.items.len();
        for item in items {
            if !self.items.iter().any(|i| i.id == item.id) {
                self.items.push(item);
            }
        }
        self.items.len() - before
    }

    fn reselect(&mut self, id: Option<ItemId>) {
        self.selected = match id {
            Some(id) => self.items.iter().position(|i| i.id == id),
            None => None,
        }
        .or(if self.items.is_empty() { None } else { Some(0) });
    }
}

impl Drop for ListCursor {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
        }
    }
}
