//! X API v2 wire types and their conversion into domain items.
//!
//! Only the fields xcli reads are declared; everything else in a response is
//! ignored, and every optional field defaults to absent.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Author, Item, ItemId, MediaRef, Metrics};

use super::Page;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub includes: Includes,
    #[serde(default)]
    pub meta: Meta,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Includes {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub media: Vec<Media>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub result_count: Option<u32>,
    #[serde(default)]
    pub next_token: Option<String>,
}

/// The authenticated account, also printed by the CLI commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl User {
    pub fn as_author(&self) -> Author {
        Author {
            id: Some(self.id.clone()),
            username: self.username.clone(),
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Media {
    pub media_key: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub preview_image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TweetAttachments {
    #[serde(default)]
    pub media_keys: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tweet {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub in_reply_to_user_id: Option<String>,
    #[serde(default)]
    pub public_metrics: Option<Metrics>,
    #[serde(default)]
    pub attachments: Option<TweetAttachments>,
}

/// `data` of a successful create-post call.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedTweet {
    pub id: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaUploadResponse {
    pub media_id_string: String,
}

/// Body of `POST /2/tweets`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTweetRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<CreateTweetMedia>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<CreateTweetReply>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateTweetMedia {
    pub media_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateTweetReply {
    pub in_reply_to_tweet_id: String,
}

impl Tweet {
    fn into_item(self, users: &HashMap<&str, &User>, media: &HashMap<&str, &Media>) -> Item {
        let author = self.author_id.as_deref().map(|author_id| {
            users
                .get(author_id)
                .map(|u| u.as_author())
                .unwrap_or_else(|| Author {
                    id: Some(author_id.to_string()),
                    username: None,
                    name: None,
                })
        });

        let media_refs = self
            .attachments
            .map(|a| a.media_keys)
            .unwrap_or_default()
            .into_iter()
            .map(|key| {
                let found = media.get(key.as_str());
                MediaRef {
                    kind: found.and_then(|m| m.kind.clone()),
                    url: found.and_then(|m| m.url.clone().or_else(|| m.preview_image_url.clone())),
                    key,
                }
            })
            .collect();

        Item {
            id: ItemId::new(self.id),
            author,
            text: html_escape::decode_html_entities(&self.text).into_owned(),
            created_at: self.created_at.as_deref().and_then(parse_timestamp),
            metrics: self.public_metrics,
            media: media_refs,
            conversation_id: self.conversation_id,
            in_reply_to_user_id: self.in_reply_to_user_id,
        }
    }
}

impl ApiResponse<Vec<Tweet>> {
    /// Resolves authors and media from `includes` and reports whether the
    /// server has another page.
    pub fn into_page(self) -> Page {
        let users: HashMap<&str, &User> = self
            .includes
            .users
            .iter()
            .map(|u| (u.id.as_str(), u))
            .collect();
        let media: HashMap<&str, &Media> = self
            .includes
            .media
            .iter()
            .map(|m| (m.media_key.as_str(), m))
            .collect();

        let items: Vec<Item> = self
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.into_item(&users, &media))
            .collect();

        Page {
            has_more: self.meta.next_token.is_some() && !items.is_empty(),
            items,
        }
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MENTIONS: &str = r#"{
        "data": [
            {
                "id": "1800000000000000002",
                "text": "@me ship it &amp; tell me",
                "author_id": "42",
                "created_at": "2024-06-01T12:30:00.000Z",
                "conversation_id": "1799",
                "public_metrics": {"like_count": 3, "retweet_count": 1, "reply_count": 0, "quote_count": 0, "brand_new_count": 9},
                "attachments": {"media_keys": ["3_1"]}
            },
            {
                "id": "1800000000000000001",
                "text": "older",
                "author_id": "77"
            }
        ],
        "includes": {
            "users": [{"id": "42", "username": "ferris", "name": "Ferris"}],
            "media": [{"media_key": "3_1", "type": "photo", "url": "https://pbs.example/1.png"}]
        },
        "meta": {"result_count": 2, "next_token": "abc"}
    }"#;

    #[test]
    fn test_page_from_mentions_response() {
        let resp: ApiResponse<Vec<Tweet>> = serde_json::from_str(MENTIONS).unwrap();
        let page = resp.into_page();

        assert!(page.has_more);
        assert_eq!(page.items.len(), 2);

        let first = &page.items[0];
        assert_eq!(first.id.as_str(), "1800000000000000002");
        assert_eq!(first.text, "@me ship it & tell me");
        assert_eq!(first.display_author(), "@ferris");
        assert_eq!(first.metrics.as_ref().unwrap().like_count, Some(3));
        assert_eq!(first.metrics.as_ref().unwrap().impression_count, None);
        assert_eq!(first.media[0].kind.as_deref(), Some("photo"));
        assert_eq!(first.created_at.unwrap().to_rfc3339(), "2024-06-01T12:30:00+00:00");

        // Author missing from includes keeps the id only.
        let second = &page.items[1];
        assert_eq!(second.author.as_ref().unwrap().id.as_deref(), Some("77"));
        assert_eq!(second.display_author(), "@unknown");
        assert!(second.metrics.is_none());
    }

    #[test]
    fn test_empty_response_has_no_more() {
        let resp: ApiResponse<Vec<Tweet>> =
            serde_json::from_str(r#"{"meta": {"result_count": 0}}"#).unwrap();
        let page = resp.into_page();
        assert!(page.items.is_empty());
        assert!(!page.has_more);
    }

    #[test]
    fn test_bad_timestamp_is_absent() {
        let resp: ApiResponse<Vec<Tweet>> = serde_json::from_str(
            r#"{"data": [{"id": "1", "text": "x", "created_at": "yesterday"}]}"#,
        )
        .unwrap();
        assert!(resp.into_page().items[0].created_at.is_none());
    }

    #[test]
    fn test_create_request_omits_empty_parts() {
        let body = CreateTweetRequest {
            text: "hi".into(),
            media: None,
            reply: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"text": "hi"})
        );

        let body = CreateTweetRequest {
            text: "hi".into(),
            media: Some(CreateTweetMedia {
                media_ids: vec!["9".into()],
            }),
            reply: Some(CreateTweetReply {
                in_reply_to_tweet_id: "5".into(),
            }),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "text": "hi",
                "media": {"media_ids": ["9"]},
                "reply": {"in_reply_to_tweet_id": "5"}
            })
        );
    }
}
