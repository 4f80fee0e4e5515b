mod app;
mod config;
mod constants;
mod error;
#[cfg(test)]
mod fake_api;
mod filter;
mod input;
mod logging;
mod order;
mod pipeline;
mod share;
mod theme;
mod ui;
mod uploads;
mod youtube;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use ratatui::{
  DefaultTerminal,
  crossterm::event::{self, Event, KeyEventKind},
};
use std::time::Duration;

use app::App;
use config::{API_KEY_ENV, Config, Settings};
use filter::FilterCriteria;
use order::OrderMode;
use pipeline::{VideoQuery, fetch_video_ids};
use share::{SystemLinks, copy_share_url, open_share_url, share_url};
use uploads::resolve_channel;
use youtube::DataApiClient;

// --- CLI ---

/// Build a YouTube "watch_videos" playlist from a channel's uploads.
#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
  /// YouTube Data API key (overrides YOUTUBE_API_KEY and prefs.toml)
  #[arg(long, global = true)]
  api_key: Option<String>,

  /// Log at debug level (RUST_LOG takes precedence)
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Without a subcommand, the interactive form is opened.
  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Find a channel by name and print its ID
  Search {
    /// Channel name to search for
    #[arg(required = true)]
    name: Vec<String>,
  },
  /// Print up to 50 filtered upload IDs of a channel and their playlist URL
  Videos(VideosArgs),
  /// Print shell completions
  Completions {
    #[arg(value_enum)]
    shell: Shell,
  },
}

#[derive(clap::Args, Debug)]
struct VideosArgs {
  /// Channel ID (starts with "UC")
  channel_id: String,

  /// Ordering applied before the list is cut to 50
  #[arg(short, long, value_enum)]
  order: Option<OrderMode>,

  /// Include Shorts (videos of 60 seconds or less)
  #[arg(long, conflicts_with = "no_shorts")]
  shorts: bool,

  /// Exclude Shorts
  #[arg(long)]
  no_shorts: bool,

  /// Minimum duration in minutes
  #[arg(long, value_name = "MINUTES")]
  min_duration: Option<f64>,

  /// Keep only videos whose title or description contains this text
  #[arg(short, long)]
  keyword: Option<String>,

  /// Copy the playlist URL to the clipboard (OSC 52)
  #[arg(long)]
  copy: bool,

  /// Open the playlist URL in the browser
  #[arg(long)]
  open: bool,
}

impl VideosArgs {
  /// Flags override the configured defaults field by field.
  fn query(&self, settings: &Settings) -> VideoQuery {
    let mut query = VideoQuery::with_defaults(&self.channel_id, settings);
    let defaults = &settings.default_filters;
    let include_shorts = if self.shorts {
      true
    } else if self.no_shorts {
      false
    } else {
      defaults.include_shorts
    };
    let min_duration = self.min_duration.or(defaults.min_duration_minutes());
    let keyword = self.keyword.as_deref().unwrap_or(defaults.keyword());
    query.criteria = FilterCriteria::new(include_shorts, min_duration, keyword);
    if let Some(order) = self.order {
      query.order = order;
    }
    query
  }
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  if let Some(Command::Completions { shell }) = args.command {
    clap_complete::generate(shell, &mut Args::command(), "ytmix", &mut std::io::stdout());
    return Ok(());
  }

  let _log_guard = logging::init(args.verbose).context("Failed to initialise logging")?;
  let config = Config::load();
  let settings = Settings::resolve(&config, args.api_key, std::env::var(API_KEY_ENV).ok());
  let api = DataApiClient::new(settings.request_timeout).context("Failed to build HTTP client")?;

  match args.command {
    Some(Command::Search { name }) => {
      let channel = resolve_channel(&api, &settings, &name.join(" ")).await?;
      println!("Found channel: {} (ID: {})", channel.title, channel.id);
      Ok(())
    }
    Some(Command::Videos(videos)) => run_videos(&api, &settings, &videos).await,
    Some(Command::Completions { .. }) => Ok(()),
    None => run_form(settings, api),
  }
}

async fn run_videos(api: &DataApiClient, settings: &Settings, args: &VideosArgs) -> Result<()> {
  let query = args.query(settings);
  let presentation = fetch_video_ids(api, settings, &query).await?;

  println!("{}", presentation.video_ids);
  if let Ok(url) = share_url(&presentation.video_ids) {
    println!("{}", url);
  }
  eprintln!("Showing {} of {} matching videos.", presentation.shown, presentation.matched);

  if args.copy {
    copy_share_url(&presentation.video_ids, &mut SystemLinks)?;
  }
  if args.open {
    open_share_url(&presentation.video_ids, &mut SystemLinks)?;
  }
  Ok(())
}

fn run_form(settings: Settings, api: DataApiClient) -> Result<()> {
  let default_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    ratatui::restore();
    default_hook(info);
  }));

  let mut terminal = ratatui::init();
  let result = run(&mut terminal, App::new(settings, api));
  ratatui::restore();
  result
}

fn run(terminal: &mut DefaultTerminal, mut app: App) -> Result<()> {
  loop {
    app.check_pending();
    app.expire_message();

    terminal.draw(|frame| ui::ui(frame, &mut app)).context("Failed to draw frame")?;

    if event::poll(Duration::from_millis(100))? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
          input::handle_key_event(&mut app, key);
        }
        _ => {}
      }
    }

    if app.should_quit {
      break;
    }
  }
  Ok(())
}
