use crate::app::{Result, XcliError};

use super::ItemId;

/// Platform limit on media per post.
pub const MAX_ATTACHMENTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub bytes: Vec<u8>,
    pub mime: String,
}

/// Unsent post content: text, up to [`MAX_ATTACHMENTS`] media blobs and an
/// optional parent post. `cursor` is a char index into `text`.
#[derive(Debug, Clone, Default)]
pub struct Draft {
    text: String,
    cursor: usize,
    attachments: Vec<Attachment>,
    reply_to: Option<ItemId>,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply_to(parent: ItemId) -> Self {
        Self {
            reply_to: Some(parent),
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn reply_target(&self) -> Option<&ItemId> {
        self.reply_to.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.attachments.is_empty()
    }

    pub fn append(&mut self, text: &str) {
        self.text.push_str(text);
        self.cursor = self.text.chars().count();
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = self.byte_offset(self.cursor - 1);
        self.text.remove(at);
        self.cursor -= 1;
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.text.chars().count() {
            self.cursor += 1;
        }
    }

    /// Adds a media blob. Rejects the blob, leaving the draft untouched, once
    /// the limit is reached.
    pub fn attach(&mut self, bytes: Vec<u8>, mime: impl Into<String>) -> Result<()> {
        if self.attachments.len() >= MAX_ATTACHMENTS {
            return Err(XcliError::AttachmentLimitExceeded);
        }
        self.attachments.push(Attachment {
            bytes,
            mime: mime.into(),
        });
        Ok(())
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }
}
