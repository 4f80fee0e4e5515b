//! The "get video ids" action: collect, filter, order, truncate.

use tracing::info;

use crate::config::Settings;
use crate::error::Result;
use crate::filter::{FilterCriteria, fetch_filtered};
use crate::order::{OrderMode, apply_order};
use crate::share::{Presentation, present};
use crate::uploads::collect_uploads;
use crate::youtube::YouTubeApi;

/// Inputs of one run, gathered from the form or the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoQuery {
  pub channel_id: String,
  pub criteria: FilterCriteria,
  pub order: OrderMode,
}

impl VideoQuery {
  /// A query for `channel_id` using the configured default filters and order.
  pub fn with_defaults(channel_id: &str, settings: &Settings) -> Self {
    Self {
      channel_id: channel_id.trim().to_string(),
      criteria: settings.default_filters.clone(),
      order: settings.default_order,
    }
  }
}

/// Run the whole pipeline. Stages run one after another; any failure aborts the run.
pub async fn fetch_video_ids<A: YouTubeApi>(api: &A, settings: &Settings, query: &VideoQuery) -> Result<Presentation> {
  info!(channel_id = %query.channel_id, order = ?query.order, "pipeline: started");

  let ids = collect_uploads(api, settings, &query.channel_id).await?;
  let mut records = fetch_filtered(api, &settings.api_key, &ids, &query.criteria).await?;
  apply_order(&mut records, query.order, &mut rand::rng());
  let presentation = present(&records);

  info!(matched = presentation.matched, shown = presentation.shown, "pipeline: finished");
  Ok(presentation)
}
