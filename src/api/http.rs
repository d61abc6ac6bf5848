use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};
use url::Url;

use crate::api::oauth::OAuthSigner;
use crate::api::types::{
    ApiResponse, CreateTweetMedia, CreateTweetReply, CreateTweetRequest, CreatedTweet,
    MediaUploadResponse, Tweet, User,
};
use crate::api::{NewPost, Page, PageQuery, RemoteApi};
use crate::app::{Result, XcliError};
use crate::config::{ApiConfig, Credentials};
use crate::domain::{Attachment, Item};

const TWEET_FIELDS: &str =
    "created_at,conversation_id,in_reply_to_user_id,public_metrics,attachments";
const EXPANSIONS: &str = "author_id,attachments.media_keys";
const USER_FIELDS: &str = "username,name";
const MEDIA_FIELDS: &str = "media_key,type,url,preview_image_url";

/// reqwest-backed X API v2 client. Every request is signed with OAuth 1.0a.
pub struct XApiClient {
    client: Client,
    base_url: Url,
    upload_url: Url,
    signer: OAuthSigner,
}

impl XApiClient {
    pub fn new(credentials: Credentials, api: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(api.timeout())
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("xcli/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: Url::parse(&api.base_url)?,
            upload_url: Url::parse(&api.upload_url)?,
            signer: OAuthSigner::new(credentials),
        })
    }

    /// Signs and builds a request. `params` become the query string and are
    /// included in the signature.
    fn request(
        &self,
        method: Method,
        mut url: Url,
        params: &[(String, String)],
    ) -> Result<RequestBuilder> {
        url.set_query(None);
        let auth = self.signer.sign(method.as_str(), url.as_str(), params)?;

        if !params.is_empty() {
            let mut query = url.query_pairs_mut();
            for (k, v) in params {
                query.append_pair(k, v);
            }
        }

        debug!(%method, %url, "Sending API request");
        Ok(self
            .client
            .request(method, url)
            .header(reqwest::header::AUTHORIZATION, auth))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(String, String)]) -> Result<T> {
        let url = self.base_url.join(path)?;
        let response = self.request(Method::GET, url, params)?.send().await?;
        read_json(response).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.base_url.join(path)?;
        let response = self
            .request(Method::POST, url, &[])?
            .json(body)
            .send()
            .await?;
        read_json(response).await
    }

    async fn list(&self, path: &str, query: &PageQuery) -> Result<Page> {
        let mut params = vec![
            ("max_results".to_string(), query.limit.to_string()),
            ("expansions".to_string(), EXPANSIONS.to_string()),
            ("tweet.fields".to_string(), TWEET_FIELDS.to_string()),
            ("user.fields".to_string(), USER_FIELDS.to_string()),
            ("media.fields".to_string(), MEDIA_FIELDS.to_string()),
        ];
        if let Some(since) = &query.since_id {
            params.push(("since_id".to_string(), since.to_string()));
        }
        if let Some(until) = &query.until_id {
            params.push(("until_id".to_string(), until.to_string()));
        }

        let resp: ApiResponse<Vec<Tweet>> = self.get(path, &params).await?;
        let page = resp.into_page();
        debug!(path, count = page.items.len(), has_more = page.has_more, "Fetched page");
        Ok(page)
    }
}

/// Non-2xx responses become `Remote` with the body kept verbatim.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        return Err(XcliError::Remote {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }

    Ok(serde_json::from_slice(&bytes)?)
}

fn missing_data(what: &str) -> XcliError {
    XcliError::Other(format!("API response did not include {}", what))
}

#[async_trait]
impl RemoteApi for XApiClient {
    async fn me(&self) -> Result<User> {
        let params = vec![("user.fields".to_string(), USER_FIELDS.to_string())];
        let resp: ApiResponse<User> = self.get("/2/users/me", &params).await?;
        resp.data.ok_or_else(|| missing_data("the authenticated user"))
    }

    async fn create_post(&self, post: &NewPost) -> Result<Item> {
        let body = CreateTweetRequest {
            text: post.text.clone(),
            media: (!post.media_ids.is_empty()).then(|| CreateTweetMedia {
                media_ids: post.media_ids.clone(),
            }),
            reply: post.reply_to.as_ref().map(|id| CreateTweetReply {
                in_reply_to_tweet_id: id.to_string(),
            }),
        };

        let resp: ApiResponse<CreatedTweet> = self.post_json("/2/tweets", &body).await?;
        let created = resp.data.ok_or_else(|| missing_data("the created post"))?;
        info!(id = %created.id, reply_to = ?post.reply_to, "Created post");
        Ok(Item::new(created.id, created.text))
    }

    async fn mentions(&self, user_id: &str, query: &PageQuery) -> Result<Page> {
        self.list(&format!("/2/users/{}/mentions", user_id), query)
            .await
    }

    async fn own_posts(&self, user_id: &str, query: &PageQuery) -> Result<Page> {
        self.list(&format!("/2/users/{}/tweets", user_id), query)
            .await
    }

    async fn timeline(&self, user_id: &str, query: &PageQuery) -> Result<Page> {
        self.list(
            &format!("/2/users/{}/timelines/reverse_chronological", user_id),
            query,
        )
        .await
    }

    async fn upload_media(&self, attachment: &Attachment) -> Result<String> {
        let url = self.upload_url.join("/1.1/media/upload.json")?;
        let part = Part::bytes(attachment.bytes.clone()).mime_str(&attachment.mime)?;
        let form = Form::new().part("media", part);

        let response = self
            .request(Method::POST, url, &[])?
            .multipart(form)
            .send()
            .await?;
        let uploaded: MediaUploadResponse = read_json(response).await?;
        info!(media_id = %uploaded.media_id_string, bytes = attachment.bytes.len(), "Uploaded media");
        Ok(uploaded.media_id_string)
    }
}
