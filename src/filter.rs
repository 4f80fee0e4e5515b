//! Batch detail lookup and the duration / shorts / keyword filters.

use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info};

use crate::constants::constants;
use crate::error::{Error, Result};
use crate::youtube::{VideoId, VideoItem, YouTubeApi};

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
  // Safety: literal pattern, covered by the tests below.
  Regex::new(r"PT(?:([0-9]+)H)?(?:([0-9]+)M)?(?:([0-9]+)S)?").expect("duration pattern is valid")
});

static LEADING_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
  // Safety: literal pattern, covered by the tests below.
  Regex::new(r"^\s*[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?").expect("number pattern is valid")
});

/// Read the leading decimal number of free-text input, ignoring anything after it.
///
/// `"1..5"` reads as `1`, `" 2.5 min"` as `2.5`. No leading number gives `None`.
pub fn parse_minutes(input: &str) -> Option<f64> {
  let m = LEADING_NUMBER_RE.find(input)?;
  m.as_str().trim_start().parse().ok()
}

/// Decode a `PT[nH][nM][nS]` token into whole seconds.
///
/// Missing components count as zero. A token without a `PT` section (e.g. `P0D`
/// for an upcoming premiere) also decodes to zero.
pub fn parse_duration(token: &str) -> u64 {
  let Some(caps) = DURATION_RE.captures(token) else { return 0 };
  let part = |idx: usize| caps.get(idx).and_then(|m| m.as_str().parse::<u64>().ok()).unwrap_or(0);
  part(1).saturating_mul(3600).saturating_add(part(2).saturating_mul(60)).saturating_add(part(3))
}

/// Shorts are anything up to and including the threshold (60 s).
pub fn is_short(total_secs: u64) -> bool {
  total_secs <= constants().short_max_secs
}

/// One upload with the metadata the filters and orderer need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRecord {
  pub id: VideoId,
  pub duration_secs: u64,
  pub title: String,
  pub description: String,
}

impl From<VideoItem> for VideoRecord {
  fn from(item: VideoItem) -> Self {
    Self {
      duration_secs: parse_duration(&item.content_details.duration),
      id: item.id,
      title: item.snippet.title,
      description: item.snippet.description,
    }
  }
}

/// Inclusion rules applied to every fetched video.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
  pub include_shorts: bool,
  pub min_duration: Option<Duration>,
  /// Always stored lowercased; empty disables the keyword filter.
  keyword: String,
}

impl Default for FilterCriteria {
  fn default() -> Self {
    Self { include_shorts: true, min_duration: None, keyword: String::new() }
  }
}

impl FilterCriteria {
  /// `min_duration_minutes` that is negative, NaN or absent leaves the minimum unset.
  pub fn new(include_shorts: bool, min_duration_minutes: Option<f64>, keyword: &str) -> Self {
    let min_duration = min_duration_minutes.and_then(|m| Duration::try_from_secs_f64(m * 60.0).ok());
    Self { include_shorts, min_duration, keyword: keyword.to_lowercase() }
  }

  pub fn keyword(&self) -> &str {
    &self.keyword
  }

  /// Minimum duration in minutes, for display.
  pub fn min_duration_minutes(&self) -> Option<f64> {
    self.min_duration.map(|d| d.as_secs_f64() / 60.0)
  }

  /// Shorts toggle and minimum duration.
  pub fn admits_duration(&self, total_secs: u64) -> bool {
    if !self.include_shorts && is_short(total_secs) {
      return false;
    }
    if let Some(min) = self.min_duration
      && Duration::from_secs(total_secs) < min
    {
      return false;
    }
    true
  }

  /// Case-insensitive substring match on title or description.
  pub fn matches_keyword(&self, record: &VideoRecord) -> bool {
    if self.keyword.is_empty() {
      return true;
    }
    record.title.to_lowercase().contains(&self.keyword) || record.description.to_lowercase().contains(&self.keyword)
  }
}

/// Fetch details for `ids` in sequential batches and apply `criteria`.
///
/// Output follows chunk order, and within a chunk whatever order the batch
/// endpoint returned. Any failed batch fails the whole call.
pub async fn fetch_filtered<A: YouTubeApi>(
  api: &A,
  api_key: &str,
  ids: &[VideoId],
  criteria: &FilterCriteria,
) -> Result<Vec<VideoRecord>> {
  let mut kept: Vec<VideoRecord> = Vec::new();

  for (batch, chunk) in ids.chunks(constants().batch_size).enumerate() {
    let response = api.videos(api_key, chunk).await?;
    let items = response
      .items
      .ok_or_else(|| Error::Upstream("Error fetching video details. Check API key permissions.".to_string()))?;
    let returned = items.len();
    let before = kept.len();
    kept.extend(items.into_iter().map(VideoRecord::from).filter(|r| criteria.admits_duration(r.duration_secs)));
    debug!(batch, requested = chunk.len(), returned, kept = kept.len() - before, "details: batch filtered");
  }

  let after_duration = kept.len();
  kept.retain(|r| criteria.matches_keyword(r));
  info!(
    total = ids.len(),
    after_duration,
    after_keyword = kept.len(),
    keyword = %criteria.keyword,
    "details: filtering complete"
  );
  Ok(kept)
}
