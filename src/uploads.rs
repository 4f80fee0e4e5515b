//! Channel lookup and uploads-list pagination.

use futures::stream::{self, Stream, TryStreamExt};
use std::pin::pin;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::youtube::{VideoId, YouTubeApi};

/// A content publisher found by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
  pub id: String,
  pub title: String,
}

fn is_blank(s: &str) -> bool {
  s.trim().is_empty()
}

/// Resolve a free-text channel name to the first matching channel.
pub async fn resolve_channel<A: YouTubeApi>(api: &A, settings: &Settings, name: &str) -> Result<Channel> {
  if is_blank(&settings.api_key) || is_blank(name) {
    return Err(Error::MissingInput("Please enter both an API key and a channel name."));
  }
  info!(name = %name, "channel: searching");

  let response = api.search_channels(&settings.api_key, name).await?;
  let first = response
    .items
    .and_then(|items| items.into_iter().next())
    .ok_or(Error::ChannelNotFound("No channel found with that name."))?;
  let id = first.id.channel_id.ok_or_else(|| Error::Upstream("Search result is missing a channel id.".to_string()))?;

  info!(channel_id = %id, title = %first.snippet.title, "channel: found");
  Ok(Channel { id, title: first.snippet.title })
}

/// Look up the platform-managed uploads list of `channel_id`.
pub async fn uploads_playlist_id<A: YouTubeApi>(api: &A, api_key: &str, channel_id: &str) -> Result<String> {
  let response = api.channel_details(api_key, channel_id).await?;
  let channel = response
    .items
    .and_then(|items| items.into_iter().next())
    .ok_or(Error::ChannelNotFound("Could not find channel. Check the Channel ID and API Key."))?;
  let uploads = channel.content_details.related_playlists.uploads;
  debug!(channel_id, uploads = %uploads, "uploads: playlist resolved");
  Ok(uploads)
}

enum Cursor {
  Start,
  Next(String),
  Done,
}

/// Lazily page through an uploads list, yielding one batch of ids per page.
///
/// The stream ends when the server omits `nextPageToken`. A server that always
/// returns a token never ends it; callers wanting a bound stop polling.
pub fn upload_pages<'a, A: YouTubeApi>(
  api: &'a A,
  api_key: &'a str,
  playlist_id: &'a str,
) -> impl Stream<Item = Result<Vec<VideoId>>> + Send + 'a {
  stream::try_unfold(Cursor::Start, move |cursor| async move {
    let token = match cursor {
      Cursor::Done => return Ok::<_, Error>(None),
      Cursor::Start => None,
      Cursor::Next(token) => Some(token),
    };

    let page = api.playlist_items(api_key, playlist_id, token.as_deref()).await?;
    let items = page
      .items
      .ok_or_else(|| Error::Upstream("Error fetching playlist items. Check API key permissions.".to_string()))?;
    let ids: Vec<VideoId> = items.into_iter().map(|item| item.content_details.video_id).collect();

    let next = match page.next_page_token {
      Some(token) if !token.is_empty() => Cursor::Next(token),
      _ => Cursor::Done,
    };
    Ok::<_, Error>(Some((ids, next)))
  })
}

/// Every video id uploaded by `channel_id`, in server order.
pub async fn collect_uploads<A: YouTubeApi>(api: &A, settings: &Settings, channel_id: &str) -> Result<Vec<VideoId>> {
  if is_blank(&settings.api_key) || is_blank(channel_id) {
    return Err(Error::MissingInput("Please enter both an API key and a channel ID."));
  }

  let playlist_id = uploads_playlist_id(api, &settings.api_key, channel_id).await?;
  let mut pages = pin!(upload_pages(api, &settings.api_key, &playlist_id));
  let mut ids: Vec<VideoId> = Vec::new();
  let mut fetched = 0usize;

  while let Some(page) = pages.try_next().await? {
    fetched += 1;
    debug!(page = fetched, items = page.len(), "uploads: page fetched");
    ids.extend(page);
    if let Some(cap) = settings.max_pages
      && fetched >= cap
    {
      warn!(cap, collected = ids.len(), "uploads: page cap reached, stopping early");
      break;
    }
  }

  info!(channel_id, pages = fetched, videos = ids.len(), "uploads: all pages fetched");
  Ok(ids)
}
