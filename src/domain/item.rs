use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ItemId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: Option<String>,
    pub username: Option<String>,
    pub name: Option<String>,
}

/// Public engagement counters. Each one is optional so that fields the API
/// stops sending (or has not started sending yet) are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retweet_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impression_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmark_count: Option<u64>,
}

impl Metrics {
    pub fn is_empty(&self) -> bool {
        *self == Metrics::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// One post fetched from the remote API. Never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(rename = "from", skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    pub text: String,
    #[serde(rename = "at", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Metrics>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<MediaRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_reply_to_user_id: Option<String>,
}

impl Item {
    pub fn new(id: impl Into<ItemId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            author: None,
            text: text.into(),
            created_at: None,
            metrics: None,
            media: Vec::new(),
            conversation_id: None,
            in_reply_to_user_id: None,
        }
    }

    pub fn display_author(&self) -> String {
        match self.author.as_ref().and_then(|a| a.username.as_deref()) {
            Some(username) => format!("@{}", username),
            None => "@unknown".to_string(),
        }
    }

    pub fn display_time(&self) -> String {
        self.created_at
            .map(|d| d.format("%b %d, %Y %I:%M %p").to_string())
            .unwrap_or_default()
    }

    /// Body collapsed onto one line, for list rows.
    pub fn summary(&self) -> String {
        self.text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    pub fn web_url(&self) -> String {
        match self.author.as_ref().and_then(|a| a.username.as_deref()) {
            Some(username) => format!("https://x.com/{}/status/{}", username, self.id),
            None => format!("https://x.com/i/web/status/{}", self.id),
        }
    }
}
