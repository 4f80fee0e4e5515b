//! In-memory [`YouTubeApi`] for pipeline tests. Responses are built from the
//! same JSON shapes the real endpoint returns.

use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::youtube::{
  ChannelListResponse, PlaylistItemListResponse, SearchListResponse, VideoId, VideoListResponse, YouTubeApi,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
  Search(String),
  Channel(String),
  Page { playlist_id: String, token: Option<String> },
  Videos(Vec<VideoId>),
}

#[derive(Default)]
pub struct FakeApi {
  channels_by_name: HashMap<String, Vec<(String, String)>>,
  uploads_by_channel: HashMap<String, String>,
  pages: HashMap<(String, Option<String>), Value>,
  videos: HashMap<VideoId, Value>,
  reverse_batches: bool,
  failing_batch: Option<usize>,
  calls: Mutex<Vec<Call>>,
}

impl FakeApi {
  pub fn with_search_result(mut self, query: &str, channel_id: &str, title: &str) -> Self {
    self.channels_by_name.entry(query.to_string()).or_default().push((channel_id.to_string(), title.to_string()));
    self
  }

  pub fn with_uploads(mut self, channel_id: &str, playlist_id: &str) -> Self {
    self.uploads_by_channel.insert(channel_id.to_string(), playlist_id.to_string());
    self
  }

  pub fn with_page(mut self, playlist_id: &str, token: Option<&str>, ids: &[&str], next: Option<&str>) -> Self {
    let items: Vec<Value> = ids.iter().map(|id| json!({ "contentDetails": { "videoId": id } })).collect();
    let mut page = json!({ "items": items });
    if let Some(next) = next {
      page["nextPageToken"] = json!(next);
    }
    self.pages.insert((playlist_id.to_string(), token.map(str::to_string)), page);
    self
  }

  /// A page whose body lacks `items`, as returned for a key without list permission.
  pub fn with_page_without_items(mut self, playlist_id: &str, token: Option<&str>) -> Self {
    self.pages.insert((playlist_id.to_string(), token.map(str::to_string)), json!({ "kind": "youtube#playlistItemListResponse" }));
    self
  }

  pub fn with_video(mut self, id: &str, duration: &str, title: &str, description: &str) -> Self {
    self.videos.insert(
      id.to_string(),
      json!({
        "id": id,
        "contentDetails": { "duration": duration },
        "snippet": { "title": title, "description": description }
      }),
    );
    self
  }

  /// Return each batch in reverse request order.
  pub fn reversing_video_batches(mut self) -> Self {
    self.reverse_batches = true;
    self
  }

  /// Fail the zero-based `index`-th videos request.
  pub fn failing_video_batch(mut self, index: usize) -> Self {
    self.failing_batch = Some(index);
    self
  }

  pub fn calls(&self) -> Vec<Call> {
    self.calls.lock().unwrap().clone()
  }

  pub fn video_batches(&self) -> Vec<Vec<VideoId>> {
    self
      .calls()
      .into_iter()
      .filter_map(|c| match c {
        Call::Videos(ids) => Some(ids),
        _ => None,
      })
      .collect()
  }

  fn record(&self, call: Call) {
    self.calls.lock().unwrap().push(call);
  }
}

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T> {
  Ok(serde_json::from_value(value)?)
}

impl YouTubeApi for FakeApi {
  async fn search_channels(&self, _api_key: &str, query: &str) -> Result<SearchListResponse> {
    self.record(Call::Search(query.to_string()));
    let items: Vec<Value> = self
      .channels_by_name
      .get(query)
      .into_iter()
      .flatten()
      .map(|(id, title)| json!({ "id": { "kind": "youtube#channel", "channelId": id }, "snippet": { "title": title } }))
      .collect();
    decode(json!({ "items": items }))
  }

  async fn channel_details(&self, _api_key: &str, channel_id: &str) -> Result<ChannelListResponse> {
    self.record(Call::Channel(channel_id.to_string()));
    match self.uploads_by_channel.get(channel_id) {
      Some(uploads) => decode(json!({ "items": [{ "contentDetails": { "relatedPlaylists": { "uploads": uploads } } }] })),
      None => decode(json!({ "pageInfo": { "totalResults": 0 } })),
    }
  }

  async fn playlist_items(
    &self,
    _api_key: &str,
    playlist_id: &str,
    page_token: Option<&str>,
  ) -> Result<PlaylistItemListResponse> {
    let token = page_token.map(str::to_string);
    self.record(Call::Page { playlist_id: playlist_id.to_string(), token: token.clone() });
    match self.pages.get(&(playlist_id.to_string(), token)) {
      Some(page) => decode(page.clone()),
      None => Err(Error::Upstream(format!("YouTube API error (404): playlist {} not found", playlist_id))),
    }
  }

  async fn videos(&self, _api_key: &str, ids: &[VideoId]) -> Result<VideoListResponse> {
    let batch_index = self.video_batches().len();
    self.record(Call::Videos(ids.to_vec()));
    if self.failing_batch == Some(batch_index) {
      return Err(Error::Upstream("YouTube API error (500): backend error".to_string()));
    }
    let mut items: Vec<Value> = ids.iter().filter_map(|id| self.videos.get(id).cloned()).collect();
    if self.reverse_batches {
      items.reverse();
    }
    decode(json!({ "items": items }))
  }
}
