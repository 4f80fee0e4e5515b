//! YouTube Data API v3 access.
//!
//! [`YouTubeApi`] is the seam the pipeline talks to: one method per query shape
//! the pipeline needs. [`DataApiClient`] is the reqwest-backed implementation;
//! tests substitute an in-memory fake.

use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

use crate::constants::constants;
use crate::error::{Error, Result};

/// Opaque identifier of one uploaded video.
pub type VideoId = String;

// --- Wire types ---

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchListResponse {
  pub items: Option<Vec<SearchResult>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
  pub id: SearchResultId,
  pub snippet: SearchSnippet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultId {
  pub channel_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSnippet {
  pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelListResponse {
  pub items: Option<Vec<ChannelItem>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelItem {
  pub content_details: ChannelContentDetails,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelContentDetails {
  pub related_playlists: RelatedPlaylists,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelatedPlaylists {
  pub uploads: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemListResponse {
  /// Absent when the key lacks permission for the list; callers treat that as fatal.
  pub items: Option<Vec<PlaylistItem>>,
  pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
  pub content_details: PlaylistItemContentDetails,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemContentDetails {
  pub video_id: VideoId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoListResponse {
  pub items: Option<Vec<VideoItem>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
  pub id: VideoId,
  pub content_details: VideoContentDetails,
  pub snippet: VideoSnippet,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoContentDetails {
  /// ISO-8601 duration token, e.g. `PT1H2M3S`.
  pub duration: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoSnippet {
  pub title: String,
  #[serde(default)]
  pub description: String,
}

/// Google API error envelope returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
  error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
  message: String,
}

// --- API seam ---

/// The four read-only query shapes the pipeline issues.
pub trait YouTubeApi: Send + Sync {
  /// `search?part=snippet&type=channel`
  fn search_channels(&self, api_key: &str, query: &str) -> impl Future<Output = Result<SearchListResponse>> + Send;

  /// `channels?part=contentDetails`
  fn channel_details(&self, api_key: &str, channel_id: &str) -> impl Future<Output = Result<ChannelListResponse>> + Send;

  /// `playlistItems?part=contentDetails`, one page.
  fn playlist_items(
    &self,
    api_key: &str,
    playlist_id: &str,
    page_token: Option<&str>,
  ) -> impl Future<Output = Result<PlaylistItemListResponse>> + Send;

  /// `videos?part=contentDetails,snippet` for up to one batch of ids.
  fn videos(&self, api_key: &str, ids: &[VideoId]) -> impl Future<Output = Result<VideoListResponse>> + Send;
}

/// reqwest-backed [`YouTubeApi`].
#[derive(Debug, Clone)]
pub struct DataApiClient {
  http: Client,
  base_url: String,
}

impl DataApiClient {
  /// Build a client against the public endpoint. `timeout` of `None` leaves the transport default.
  pub fn new(timeout: Option<Duration>) -> Result<Self> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
      builder = builder.timeout(timeout);
    }
    Ok(Self { http: builder.build()?, base_url: constants().api_base_url.clone() })
  }

  fn endpoint(&self, resource: &str, api_key: &str, params: &[(&str, &str)]) -> Result<Url> {
    let base = format!("{}/{}", self.base_url.trim_end_matches('/'), resource);
    let pairs = params.iter().copied().chain(std::iter::once(("key", api_key)));
    Url::parse_with_params(&base, pairs).map_err(|e| Error::Upstream(format!("Invalid request URL: {}", e)))
  }

  async fn get_json<T: DeserializeOwned>(&self, resource: &str, api_key: &str, params: &[(&str, &str)]) -> Result<T> {
    let url = self.endpoint(resource, api_key, params)?;
    debug!(resource, ?params, "youtube: GET");

    let response = self.http.get(url).send().await?;
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
      return Err(upstream_status_error(status, &body));
    }
    Ok(serde_json::from_str(&body)?)
  }
}

/// Turn a non-2xx response into an upstream error, preferring Google's own message.
fn upstream_status_error(status: StatusCode, body: &str) -> Error {
  match serde_json::from_str::<ErrorEnvelope>(body) {
    Ok(envelope) => Error::Upstream(format!("YouTube API error ({}): {}", status.as_u16(), envelope.error.message)),
    Err(_) => Error::Upstream(format!("YouTube API error ({})", status)),
  }
}

impl YouTubeApi for DataApiClient {
  async fn search_channels(&self, api_key: &str, query: &str) -> Result<SearchListResponse> {
    self.get_json("search", api_key, &[("part", "snippet"), ("q", query), ("type", "channel")]).await
  }

  async fn channel_details(&self, api_key: &str, channel_id: &str) -> Result<ChannelListResponse> {
    self.get_json("channels", api_key, &[("part", "contentDetails"), ("id", channel_id)]).await
  }

  async fn playlist_items(
    &self,
    api_key: &str,
    playlist_id: &str,
    page_token: Option<&str>,
  ) -> Result<PlaylistItemListResponse> {
    let page_size = constants().page_size.to_string();
    let mut params = vec![("part", "contentDetails"), ("playlistId", playlist_id), ("maxResults", page_size.as_str())];
    if let Some(token) = page_token {
      params.push(("pageToken", token));
    }
    self.get_json("playlistItems", api_key, &params).await
  }

  async fn videos(&self, api_key: &str, ids: &[VideoId]) -> Result<VideoListResponse> {
    let joined = ids.join(",");
    self.get_json("videos", api_key, &[("part", "contentDetails,snippet"), ("id", joined.as_str())]).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn endpoint_appends_key_last_and_encodes_query() {
    let client = DataApiClient::new(None).unwrap();
    let url = client.endpoint("search", "KEY", &[("q", "Example Creator"), ("type", "channel")]).unwrap();
    assert_eq!(url.as_str(), "https://www.googleapis.com/youtube/v3/search?q=Example+Creator&type=channel&key=KEY");
  }

  #[test]
  fn decodes_search_response() {
    let resp: SearchListResponse = serde_json::from_value(json!({
      "kind": "youtube#searchListResponse",
      "items": [{
        "id": { "kind": "youtube#channel", "channelId": "UC123" },
        "snippet": { "title": "Example Creator", "description": "ignored" }
      }]
    }))
    .unwrap();
    let items = resp.items.unwrap();
    assert_eq!(items[0].id.channel_id.as_deref(), Some("UC123"));
    assert_eq!(items[0].snippet.title, "Example Creator");
  }

  #[test]
  fn decodes_channel_uploads_reference() {
    let resp: ChannelListResponse = serde_json::from_value(json!({
      "items": [{ "contentDetails": { "relatedPlaylists": { "likes": "", "uploads": "UU123" } } }]
    }))
    .unwrap();
    assert_eq!(resp.items.unwrap()[0].content_details.related_playlists.uploads, "UU123");
  }

  #[test]
  fn playlist_page_without_items_keeps_none() {
    let resp: PlaylistItemListResponse = serde_json::from_value(json!({ "pageInfo": { "totalResults": 0 } })).unwrap();
    assert!(resp.items.is_none());
    assert!(resp.next_page_token.is_none());
  }

  #[test]
  fn video_description_defaults_to_empty() {
    let resp: VideoListResponse = serde_json::from_value(json!({
      "items": [{ "id": "v1", "contentDetails": { "duration": "PT30S" }, "snippet": { "title": "t" } }]
    }))
    .unwrap();
    let item = &resp.items.unwrap()[0];
    assert_eq!(item.content_details.duration, "PT30S");
    assert_eq!(item.snippet.description, "");
  }

  #[test]
  fn status_error_uses_google_message() {
    let body = r#"{"error":{"code":403,"message":"API key not valid."}}"#;
    let err = upstream_status_error(StatusCode::FORBIDDEN, body);
    assert_eq!(err.to_string(), "YouTube API error (403): API key not valid.");

    let err = upstream_status_error(StatusCode::BAD_GATEWAY, "<html>");
    assert!(err.to_string().starts_with("YouTube API error (502"));
  }
}
