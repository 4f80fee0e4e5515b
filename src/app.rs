use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::config::{Config, Settings};
use crate::constants::constants;
use crate::error::{Error, Result};
use crate::filter::{FilterCriteria, parse_minutes};
use crate::input::TextInput;
use crate::order::OrderMode;
use crate::pipeline::{VideoQuery, fetch_video_ids};
use crate::share::{Presentation, SystemLinks, copy_share_url, open_share_url};
use crate::theme::{THEMES, Theme, theme_index};
use crate::uploads::{Channel, resolve_channel};
use crate::youtube::DataApiClient;

/// Form rows, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  ChannelName,
  ChannelId,
  Keyword,
  MinDuration,
  Shorts,
  Order,
}

impl Field {
  pub const ALL: [Field; 6] =
    [Field::ChannelName, Field::ChannelId, Field::Keyword, Field::MinDuration, Field::Shorts, Field::Order];

  pub fn label(self) -> &'static str {
    match self {
      Field::ChannelName => "Channel name",
      Field::ChannelId => "Channel ID",
      Field::Keyword => "Keyword",
      Field::MinDuration => "Min minutes",
      Field::Shorts => "Shorts",
      Field::Order => "Order",
    }
  }

  pub fn next(self) -> Self {
    let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
    Self::ALL[(idx + 1) % Self::ALL.len()]
  }

  pub fn prev(self) -> Self {
    let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
    Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
  Success,
  Error,
}

/// A transient notification, dismissed after `message_ttl_ms`.
#[derive(Debug, Clone)]
pub struct Message {
  pub text: String,
  pub kind: MessageKind,
  shown_at: Instant,
}

/// In-flight action receivers. A new action of the same kind replaces the old receiver.
#[derive(Default)]
pub(crate) struct AsyncTasks {
  pub(crate) search_rx: Option<oneshot::Receiver<Result<Channel>>>,
  pub(crate) videos_rx: Option<oneshot::Receiver<Result<Presentation>>>,
}

pub struct App {
  settings: Arc<Settings>,
  api: DataApiClient,
  pub channel_name: TextInput,
  pub channel_id: TextInput,
  pub keyword: TextInput,
  pub min_duration: TextInput,
  pub include_shorts: bool,
  pub order: OrderMode,
  pub focus: Field,
  /// Comma-joined ids from the last successful run.
  pub video_ids: String,
  pub last_result: Option<Presentation>,
  pub message: Option<Message>,
  pub theme_index: usize,
  pub should_quit: bool,
  pub(crate) tasks: AsyncTasks,
}

impl App {
  pub fn new(settings: Settings, api: DataApiClient) -> Self {
    let config = Config::load();
    let filters = &settings.default_filters;
    let min_duration = filters.min_duration_minutes().map(|m| m.to_string()).unwrap_or_default();

    Self {
      channel_name: TextInput::default(),
      channel_id: TextInput::default(),
      keyword: TextInput::new(filters.keyword()),
      min_duration: TextInput::new(&min_duration),
      include_shorts: filters.include_shorts,
      order: settings.default_order,
      focus: Field::ChannelName,
      video_ids: String::new(),
      last_result: None,
      message: None,
      theme_index: theme_index(config.theme_name.as_deref()),
      should_quit: false,
      tasks: AsyncTasks::default(),
      settings: Arc::new(settings),
      api,
    }
  }

  pub fn theme(&self) -> &'static Theme {
    // Safety: theme_index is produced by theme_index() or next_theme(), both bounded by THEMES.len().
    &THEMES[self.theme_index]
  }

  pub fn next_theme(&mut self) {
    self.theme_index = (self.theme_index + 1) % THEMES.len();
    let mut config = Config::load();
    config.theme_name = Some(self.theme().name.to_string());
    config.save();
  }

  /// The editable text behind `field`, if it is a text row.
  pub fn input_mut(&mut self, field: Field) -> Option<&mut TextInput> {
    match field {
      Field::ChannelName => Some(&mut self.channel_name),
      Field::ChannelId => Some(&mut self.channel_id),
      Field::Keyword => Some(&mut self.keyword),
      Field::MinDuration => Some(&mut self.min_duration),
      Field::Shorts | Field::Order => None,
    }
  }

  // --- Messages ---

  pub fn notify(&mut self, text: String, kind: MessageKind) {
    self.message = Some(Message { text, kind, shown_at: Instant::now() });
  }

  pub fn expire_message(&mut self) {
    if let Some(msg) = &self.message
      && msg.shown_at.elapsed() >= Duration::from_millis(constants().message_ttl_ms)
    {
      self.message = None;
    }
  }

  /// Busy label while any action is pending. Derived from the receivers so it
  /// disappears on both success and failure.
  pub fn busy_label(&self) -> Option<&'static str> {
    if self.tasks.videos_rx.is_some() {
      Some("Fetching videos…")
    } else if self.tasks.search_rx.is_some() {
      Some("Searching for channel…")
    } else {
      None
    }
  }

  // --- Actions ---

  pub fn trigger_search(&mut self) {
    let name = self.channel_name.trimmed().to_string();
    info!(name = %name, "search triggered");
    self.channel_id.clear();

    let api = self.api.clone();
    let settings = Arc::clone(&self.settings);
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(resolve_channel(&api, &settings, &name).await);
    });
    self.tasks.search_rx = Some(rx);
  }

  /// Current form values as a pipeline query. The keyword is matched as typed, spaces included.
  pub fn query(&self) -> VideoQuery {
    let min_minutes = parse_minutes(&self.min_duration.value);
    VideoQuery {
      channel_id: self.channel_id.trimmed().to_string(),
      criteria: FilterCriteria::new(self.include_shorts, min_minutes, &self.keyword.value),
      order: self.order,
    }
  }

  pub fn trigger_videos(&mut self) {
    let query = self.query();
    info!(channel_id = %query.channel_id, "get videos triggered");
    self.video_ids.clear();
    self.last_result = None;

    let api = self.api.clone();
    let settings = Arc::clone(&self.settings);
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(fetch_video_ids(&api, &settings, &query).await);
    });
    self.tasks.videos_rx = Some(rx);
  }

  pub fn copy_url(&mut self) {
    match copy_share_url(&self.video_ids, &mut SystemLinks) {
      Ok(_) => self.notify("URL copied to clipboard!".to_string(), MessageKind::Success),
      Err(Error::NoIdsAvailable) => self.notify("No video IDs to copy.".to_string(), MessageKind::Error),
      Err(e) => {
        warn!(err = %e, "share: copy failed");
        self.notify("Failed to copy URL. Please copy manually.".to_string(), MessageKind::Error);
      }
    }
  }

  pub fn open_url(&mut self) {
    match open_share_url(&self.video_ids, &mut SystemLinks) {
      Ok(_) => self.notify("Opened playlist in browser.".to_string(), MessageKind::Success),
      Err(Error::NoIdsAvailable) => self.notify("No video IDs to open.".to_string(), MessageKind::Error),
      Err(e) => {
        warn!(err = %e, "share: open failed");
        self.notify(format!("Failed to open browser: {}", e), MessageKind::Error);
      }
    }
  }

  // --- Completion ---

  pub fn check_pending(&mut self) {
    if let Some(mut rx) = self.tasks.search_rx.take() {
      match rx.try_recv() {
        Ok(result) => self.finish_search(result),
        Err(oneshot::error::TryRecvError::Empty) => self.tasks.search_rx = Some(rx),
        Err(oneshot::error::TryRecvError::Closed) => {
          self.notify("Search task failed.".to_string(), MessageKind::Error);
        }
      }
    }

    if let Some(mut rx) = self.tasks.videos_rx.take() {
      match rx.try_recv() {
        Ok(result) => self.finish_videos(result),
        Err(oneshot::error::TryRecvError::Empty) => self.tasks.videos_rx = Some(rx),
        Err(oneshot::error::TryRecvError::Closed) => {
          self.notify("Fetch task failed.".to_string(), MessageKind::Error);
        }
      }
    }
  }

  fn finish_search(&mut self, result: Result<Channel>) {
    match result {
      Ok(channel) => {
        self.channel_id.set(&channel.id);
        self.notify(format!("Found channel: {} (ID: {})", channel.title, channel.id), MessageKind::Success);
      }
      Err(e @ (Error::MissingInput(_) | Error::ChannelNotFound(_))) => self.notify(e.to_string(), MessageKind::Error),
      Err(e) => {
        warn!(err = %e, "channel search failed");
        self.notify(format!("Error searching for channel: {}", e), MessageKind::Error);
      }
    }
  }

  fn finish_videos(&mut self, result: Result<Presentation>) {
    match result {
      Ok(presentation) => {
        self.video_ids = presentation.video_ids.clone();
        self.notify(
          format!("Showing {} of {} matching videos.", presentation.shown, presentation.matched),
          MessageKind::Success,
        );
        self.last_result = Some(presentation);
      }
      Err(e @ Error::MissingInput(_)) => self.notify(e.to_string(), MessageKind::Error),
      Err(e) => {
        warn!(err = %e, "video fetch failed");
        self.notify(format!("An error occurred: {}", e), MessageKind::Error);
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn app() -> App {
    let settings = Settings::resolve(&Config::default(), Some("KEY".into()), None);
    let api = DataApiClient::new(None).unwrap();
    App::new(settings, api)
  }

  // --- Field ---

  #[test]
  fn focus_wraps_around() {
    assert_eq!(Field::Order.next(), Field::ChannelName);
    assert_eq!(Field::ChannelName.prev(), Field::Order);
  }

  // --- query ---

  #[test]
  fn query_reads_form_fields() {
    let mut app = app();
    app.channel_id.set("  UC123 ");
    app.keyword.set("Tour");
    app.min_duration.set("2");
    app.include_shorts = false;
    app.order = OrderMode::YearInTitleDesc;

    let q = app.query();
    assert_eq!(q.channel_id, "UC123");
    assert_eq!(q.criteria, FilterCriteria::new(false, Some(2.0), "tour"));
    assert_eq!(q.order, OrderMode::YearInTitleDesc);
  }

  #[test]
  fn keyword_keeps_surrounding_spaces() {
    let mut app = app();
    app.keyword.set(" Live ");
    assert_eq!(app.query().criteria.keyword(), " live ");
  }

  #[test]
  fn min_duration_reads_leading_number() {
    let mut app = app();
    app.min_duration.set("1..5");
    assert_eq!(app.query().criteria.min_duration, Some(Duration::from_secs(60)));
  }

  #[test]
  fn unparsable_min_duration_is_unset() {
    let mut app = app();
    app.min_duration.set("..");
    assert_eq!(app.query().criteria.min_duration, None);
  }

  // --- completion handling ---

  #[test]
  fn found_channel_fills_channel_id() {
    let mut app = app();
    app.finish_search(Ok(Channel { id: "UC123".into(), title: "Example Creator".into() }));
    assert_eq!(app.channel_id.value, "UC123");
    let msg = app.message.as_ref().unwrap();
    assert_eq!(msg.kind, MessageKind::Success);
    assert_eq!(msg.text, "Found channel: Example Creator (ID: UC123)");
  }

  #[test]
  fn failed_fetch_leaves_result_empty() {
    let mut app = app();
    app.finish_videos(Err(Error::Upstream("boom".into())));
    assert!(app.video_ids.is_empty());
    let msg = app.message.as_ref().unwrap();
    assert_eq!(msg.kind, MessageKind::Error);
    assert_eq!(msg.text, "An error occurred: boom");
  }

  #[test]
  fn successful_fetch_fills_result() {
    let mut app = app();
    app.finish_videos(Ok(Presentation { video_ids: "v2,v3".into(), shown: 2, matched: 2 }));
    assert_eq!(app.video_ids, "v2,v3");
    assert_eq!(app.message.as_ref().unwrap().kind, MessageKind::Success);
  }

  #[test]
  fn copy_with_no_ids_reports_error() {
    let mut app = app();
    app.copy_url();
    let msg = app.message.as_ref().unwrap();
    assert_eq!(msg.kind, MessageKind::Error);
    assert_eq!(msg.text, "No video IDs to copy.");
  }

  #[test]
  fn messages_expire() {
    let mut app = app();
    app.message = Some(Message {
      text: "old".into(),
      kind: MessageKind::Success,
      shown_at: Instant::now() - Duration::from_millis(constants().message_ttl_ms + 1),
    });
    app.expire_message();
    assert!(app.message.is_none());
  }

  #[test]
  fn idle_app_is_not_busy() {
    assert_eq!(app().busy_label(), None);
  }
}
