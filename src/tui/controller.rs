//! Mode state machine behind the interactive UI.
//!
//! The controller owns the open list, the draft being composed and the
//! status line. It never touches the terminal: `tui::run` feeds it keys and
//! background pages and draws whatever it exposes.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;
use tracing::{debug, info, warn};

use crate::api::{Page, User};
use crate::app::{AppContext, Result};
use crate::compose::ComposeSession;
use crate::domain::{Item, ItemId, MAX_ATTACHMENTS};

use super::clipboard::{ClipboardSource, SystemClipboard};
use super::event::{Action, ComposeAction};
use super::feed::{FeedKind, FeedSource};
use super::list_cursor::{ListCursor, PageFetcher};

/// Items skipped by `n`/`p` in the list.
pub const PAGE_SIZE: usize = 10;
/// Lines scrolled by `n`/`p` in the detail view.
const SCROLL_STEP: u16 = 5;
const STATUS_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    List,
    Detail,
    Compose,
    Exiting,
}

/// Where leaving the list goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Menu,
    Command,
}

#[derive(Debug, Clone)]
pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
    set_at: Instant,
}

pub struct NavigationController {
    ctx: Arc<AppContext>,
    user: User,
    origin: Origin,
    screen: Screen,
    kind: FeedKind,
    cursor: Option<ListCursor>,
    compose: Option<ComposeSession>,
    /// Unread boundary as stored when the list was opened or last marked.
    seen: Option<ItemId>,
    status: Option<StatusLine>,
    save_error: Option<String>,
    clipboard: Box<dyn ClipboardSource + Send>,
    pub list_state: ListState,
    pub detail_scroll: u16,
}

impl NavigationController {
    pub fn new(ctx: Arc<AppContext>, user: User, origin: Origin) -> Self {
        Self {
            ctx,
            user,
            origin,
            screen: Screen::Menu,
            kind: FeedKind::Mentions,
            cursor: None,
            compose: None,
            seen: None,
            status: None,
            save_error: None,
            clipboard: Box::new(SystemClipboard),
            list_state: ListState::default(),
            detail_scroll: 0,
        }
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn ClipboardSource + Send>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn kind(&self) -> FeedKind {
        self.kind
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn cursor(&self) -> Option<&ListCursor> {
        self.cursor.as_ref()
    }

    pub fn compose(&self) -> Option<&ComposeSession> {
        self.compose.as_ref()
    }

    pub fn status(&self) -> Option<&StatusLine> {
        self.status.as_ref()
    }

    /// The last cursor write failure, for reporting after the UI closes.
    pub fn take_save_error(&mut self) -> Option<String> {
        self.save_error.take()
    }

    /// Whether the modal UI should be showing.
    pub fn is_browsing(&self) -> bool {
        matches!(self.screen, Screen::List | Screen::Detail | Screen::Compose)
    }

    pub fn is_unread(&self, item: &Item) -> bool {
        self.kind.tracks_unread() && self.seen.as_ref().is_none_or(|seen| item.id > *seen)
    }

    pub fn unread_count(&self) -> usize {
        self.cursor
            .as_ref()
            .map(|c| c.items().iter().filter(|i| self.is_unread(i)).count())
            .unwrap_or(0)
    }

    /// Fetches the first page of `kind` and enters the list.
    ///
    /// Errors leave the controller where it was. An empty first page returns
    /// `Ok(false)` and goes straight back to the origin.
    pub async fn open(&mut self, kind: FeedKind, limit: u8) -> Result<bool> {
        let source: Arc<dyn PageFetcher> = Arc::new(FeedSource::new(
            self.ctx.api.clone(),
            kind,
            self.user.id.clone(),
            limit,
        ));
        let mut cursor = ListCursor::load(source).await?;
        cursor.ensure_lookahead();
        info!(kind = ?kind, count = cursor.len(), has_more = cursor.has_more(), "Opened list");

        self.kind = kind;
        self.seen = if kind.tracks_unread() {
            self.ctx.state.load()
        } else {
            None
        };
        self.status = None;
        self.detail_scroll = 0;
        self.list_state = ListState::default();

        if cursor.is_empty() {
            self.screen = self.exit_target();
            return Ok(false);
        }

        self.list_state.select(cursor.selected_index());
        self.cursor = Some(cursor);
        self.screen = Screen::List;
        Ok(true)
    }

    /// Completion of the in-flight background fetch; pending forever when
    /// there is none.
    pub async fn background_page(&mut self) -> Result<Page> {
        match self.cursor.as_mut() {
            Some(cursor) => cursor.page_ready().await,
            None => std::future::pending().await,
        }
    }

    pub fn absorb_page(&mut self, result: Result<Page>) {
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.absorb(result);
            self.list_state.select(cursor.selected_index());
        }
    }

    /// Expires stale informational messages.
    pub fn tick(&mut self) {
        if let Some(status) = &self.status {
            if !status.is_error && status.set_at.elapsed() >= STATUS_TTL {
                self.status = None;
            }
        }
    }

    pub async fn handle_key(&mut self, key: KeyEvent) {
        match self.screen {
            Screen::List => self.handle_list_key(key),
            Screen::Detail => self.handle_detail_key(key),
            Screen::Compose => self.handle_compose_key(key).await,
            Screen::Menu | Screen::Exiting => {}
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match self.ctx.config.keybindings.get_action(&key) {
            Action::Quit => self.close_list(Screen::Exiting),
            Action::Back => {
                let target = self.exit_target();
                self.close_list(target);
            }
            Action::MoveUp => {
                self.navigate(|c| c.move_prev());
            }
            Action::MoveDown => {
                self.navigate(|c| c.move_next());
            }
            Action::NextPage => {
                self.navigate(|c| c.move_forward(PAGE_SIZE));
            }
            Action::PrevPage => {
                self.navigate(|c| c.move_back(PAGE_SIZE));
            }
            Action::Select => {
                if self.current().is_some() {
                    self.detail_scroll = 0;
                    self.screen = Screen::Detail;
                }
            }
            Action::MarkRead => self.mark_read(),
            Action::OpenInBrowser => self.open_current(),
            Action::None => {}
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        if is_interrupt(&key) {
            self.close_list(Screen::Exiting);
            return;
        }

        match self.ctx.config.keybindings.get_action(&key) {
            Action::Quit | Action::Back => self.screen = Screen::List,
            Action::MoveUp => {
                if self.navigate(|c| c.move_prev()) {
                    self.detail_scroll = 0;
                }
            }
            Action::MoveDown => {
                if self.navigate(|c| c.move_next()) {
                    self.detail_scroll = 0;
                }
            }
            Action::NextPage => self.detail_scroll = self.detail_scroll.saturating_add(SCROLL_STEP),
            Action::PrevPage => self.detail_scroll = self.detail_scroll.saturating_sub(SCROLL_STEP),
            Action::Select => self.start_compose(),
            Action::OpenInBrowser => self.open_current(),
            Action::MarkRead | Action::None => {}
        }
    }

    async fn handle_compose_key(&mut self, key: KeyEvent) {
        let Some(session) = self.compose.as_mut() else {
            self.screen = Screen::Detail;
            return;
        };

        match self.ctx.config.keybindings.get_compose_action(&key) {
            ComposeAction::Quit => {
                if let Some(session) = self.compose.take() {
                    session.discard();
                }
                self.close_list(Screen::Exiting);
            }
            ComposeAction::Cancel => {
                if let Some(session) = self.compose.take() {
                    session.discard();
                }
                self.screen = Screen::Detail;
                self.set_info("Draft discarded");
            }
            ComposeAction::Commit => self.commit().await,
            ComposeAction::AttachImage => self.attach_from_clipboard(),
            ComposeAction::Backspace => session.backspace(),
            ComposeAction::CursorLeft => session.cursor_left(),
            ComposeAction::CursorRight => session.cursor_right(),
            ComposeAction::Insert(c) => session.push_char(c),
            ComposeAction::None => {}
        }
    }

    fn current(&self) -> Option<&Item> {
        self.cursor.as_ref().and_then(|c| c.current())
    }

    /// Applies a movement, then tops up the list if the selection got close
    /// to the end.
    fn navigate(&mut self, step: impl FnOnce(&mut ListCursor) -> bool) -> bool {
        let Some(cursor) = self.cursor.as_mut() else {
            return false;
        };
        let moved = step(cursor);
        cursor.ensure_lookahead();
        self.list_state.select(cursor.selected_index());
        moved
    }

    fn start_compose(&mut self) {
        if !self.kind.can_reply() {
            self.set_info(format!("Replies are not available in {}", self.kind.title()));
            return;
        }
        if let Some(parent) = self.current().map(|i| i.id.clone()) {
            debug!(parent = %parent, "Composing reply");
            self.compose = Some(ComposeSession::replying_to(parent));
            self.status = None;
            self.screen = Screen::Compose;
        }
    }

    async fn commit(&mut self) {
        let Some(session) = self.compose.as_ref() else {
            return;
        };

        match session.commit(self.ctx.api.as_ref()).await {
            Ok(item) => {
                self.compose = None;
                self.set_info(format!("Posted {}", item.id));
                if self.kind.shows_new_posts() {
                    if let Some(cursor) = self.cursor.as_mut() {
                        cursor.splice_front(item);
                        self.list_state.select(cursor.selected_index());
                    }
                }
                self.screen = Screen::List;
            }
            Err(e) => {
                warn!(error = %e, "Commit failed");
                self.set_error(e.one_line());
            }
        }
    }

    fn attach_from_clipboard(&mut self) {
        let Some(session) = self.compose.as_mut() else {
            return;
        };
        let result = self
            .clipboard
            .read_image()
            .and_then(|a| session.attach(a.bytes, a.mime));
        let count = session.draft().attachments().len();

        match result {
            Ok(()) => self.set_info(format!("Attached image ({}/{})", count, MAX_ATTACHMENTS)),
            Err(e) => self.set_error(e.one_line()),
        }
    }

    fn open_current(&mut self) {
        let Some(url) = self.current().map(|i| i.web_url()) else {
            return;
        };
        if let Err(e) = open::that(&url) {
            self.set_error(format!("Failed to open browser: {}", e));
        }
    }

    fn mark_read(&mut self) {
        if !self.kind.tracks_unread() {
            return;
        }
        let count = self.unread_count();
        if self.save_newest() {
            self.set_info(format!("Marked {} as read", count));
        }
    }

    /// Persists the newest loaded id as the unread boundary. Returns whether
    /// the save went through.
    fn save_newest(&mut self) -> bool {
        let Some(newest) = self
            .cursor
            .as_ref()
            .and_then(|c| c.newest_id())
            .cloned()
        else {
            return true;
        };

        match self.ctx.state.save(&newest) {
            Ok(()) => {
                if self.seen.as_ref().is_none_or(|seen| newest > *seen) {
                    self.seen = Some(newest);
                }
                true
            }
            Err(e) => {
                warn!(error = %e, "Could not save unread cursor");
                let message = format!("Could not save read state: {}", e.one_line());
                self.set_error(message.clone());
                self.save_error = Some(message);
                false
            }
        }
    }

    /// Leaves whatever list is open, saving the unread boundary. Used when
    /// the event loop stops on an error instead of a key.
    pub fn shutdown(&mut self) {
        if self.is_browsing() {
            self.close_list(Screen::Exiting);
        }
    }

    fn close_list(&mut self, target: Screen) {
        if self.kind.tracks_unread() {
            self.save_newest();
        }
        self.cursor = None;
        self.compose = None;
        self.screen = target;
    }

    fn exit_target(&self) -> Screen {
        match self.origin {
            Origin::Menu => Screen::Menu,
            Origin::Command => Screen::Exiting,
        }
    }

    fn set_info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            text: text.into(),
            is_error: false,
            set_at: Instant::now(),
        });
    }

    fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            text: text.into(),
            is_error: true,
            set_at: Instant::now(),
        });
    }
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}
