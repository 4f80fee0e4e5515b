//! Truncation, id serialisation and the `watch_videos` share links.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use std::io::Write;
use tracing::info;

use crate::constants::constants;
use crate::error::{Error, Result};
use crate::filter::VideoRecord;

/// The bounded result of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Presentation {
  /// Comma-joined ids of the records kept after truncation.
  pub video_ids: String,
  pub shown: usize,
  /// Records that survived filtering, before truncation.
  pub matched: usize,
}

/// Keep the first `max_output` records and join their ids.
pub fn present(records: &[VideoRecord]) -> Presentation {
  let shown = &records[..records.len().min(constants().max_output)];
  Presentation {
    video_ids: shown.iter().map(|r| r.id.as_str()).collect::<Vec<_>>().join(","),
    shown: shown.len(),
    matched: records.len(),
  }
}

/// `watch_videos` URL for a comma-joined id list.
pub fn share_url(video_ids: &str) -> Result<String> {
  if video_ids.trim().is_empty() {
    return Err(Error::NoIdsAvailable);
  }
  Ok(format!("{}?video_ids={}", constants().share_base_url, video_ids))
}

/// Where share links are handed off to.
pub trait LinkTarget {
  fn copy_to_clipboard(&mut self, text: &str) -> std::io::Result<()>;
  fn open_in_browser(&mut self, url: &str) -> std::io::Result<()>;
}

/// Copy the share URL. Nothing reaches `target` when there are no ids.
pub fn copy_share_url(video_ids: &str, target: &mut impl LinkTarget) -> Result<String> {
  let url = share_url(video_ids)?;
  target.copy_to_clipboard(&url).map_err(Error::ShareFailed)?;
  info!(url = %url, "share: copied");
  Ok(url)
}

/// Open the share URL. Nothing reaches `target` when there are no ids.
pub fn open_share_url(video_ids: &str, target: &mut impl LinkTarget) -> Result<String> {
  let url = share_url(video_ids)?;
  target.open_in_browser(&url).map_err(Error::ShareFailed)?;
  info!(url = %url, "share: opened");
  Ok(url)
}

/// Terminal clipboard via OSC 52 and the platform URL opener.
#[derive(Debug, Default)]
pub struct SystemLinks;

impl LinkTarget for SystemLinks {
  fn copy_to_clipboard(&mut self, text: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "\x1B]52;c;{}\x07", BASE64.encode(text))?;
    stdout.flush()
  }

  fn open_in_browser(&mut self, url: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    let cmd = "open";
    #[cfg(not(target_os = "macos"))]
    let cmd = "xdg-open";
    let mut child = std::process::Command::new(cmd)
      .arg(url)
      .stdin(std::process::Stdio::null())
      .stdout(std::process::Stdio::null())
      .stderr(std::process::Stdio::null())
      .spawn()?;
    // Reap the child in a background thread to avoid zombie processes.
    std::thread::spawn(move || {
      let _ = child.wait();
    });
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Default)]
  struct Recorder {
    copied: Vec<String>,
    opened: Vec<String>,
  }

  impl LinkTarget for Recorder {
    fn copy_to_clipboard(&mut self, text: &str) -> std::io::Result<()> {
      self.copied.push(text.to_string());
      Ok(())
    }

    fn open_in_browser(&mut self, url: &str) -> std::io::Result<()> {
      self.opened.push(url.to_string());
      Ok(())
    }
  }

  struct Broken;

  impl LinkTarget for Broken {
    fn copy_to_clipboard(&mut self, _text: &str) -> std::io::Result<()> {
      Err(std::io::Error::other("no clipboard"))
    }

    fn open_in_browser(&mut self, _url: &str) -> std::io::Result<()> {
      Err(std::io::Error::other("no browser"))
    }
  }

  fn recs(n: usize) -> Vec<VideoRecord> {
    (0..n)
      .map(|i| VideoRecord { id: format!("v{}", i), duration_secs: 100, title: String::new(), description: String::new() })
      .collect()
  }

  #[test]
  fn truncates_to_first_fifty() {
    let p = present(&recs(73));
    assert_eq!(p.shown, 50);
    assert_eq!(p.matched, 73);
    let ids: Vec<&str> = p.video_ids.split(',').collect();
    assert_eq!(ids.len(), 50);
    assert_eq!(ids.first(), Some(&"v0"));
    assert_eq!(ids.last(), Some(&"v49"));
  }

  #[test]
  fn short_lists_are_kept_whole() {
    let p = present(&recs(2));
    assert_eq!(p.video_ids, "v0,v1");
    assert_eq!(p.shown, 2);
  }

  #[test]
  fn empty_list_presents_empty_string() {
    assert_eq!(present(&[]), Presentation::default());
  }

  #[test]
  fn share_url_shape() {
    assert_eq!(share_url("v2,v3").unwrap(), "https://www.youtube.com/watch_videos?video_ids=v2,v3");
  }

  #[test]
  fn copy_and_open_produce_the_same_url() {
    let mut target = Recorder::default();
    let copied = copy_share_url("v2,v3", &mut target).unwrap();
    let opened = open_share_url("v2,v3", &mut target).unwrap();
    assert_eq!(copied, opened);
    assert_eq!(target.copied, vec![copied]);
    assert_eq!(target.opened, vec![opened]);
  }

  #[test]
  fn empty_ids_never_reach_the_target() {
    let mut target = Recorder::default();
    assert!(matches!(copy_share_url("", &mut target), Err(Error::NoIdsAvailable)));
    assert!(matches!(open_share_url("", &mut target), Err(Error::NoIdsAvailable)));
    assert!(target.copied.is_empty());
    assert!(target.opened.is_empty());
  }

  #[test]
  fn target_failure_is_reported() {
    let err = copy_share_url("v1", &mut Broken).unwrap_err();
    assert!(matches!(err, Error::ShareFailed(_)));
    assert_eq!(err.to_string(), "Failed to share URL: no clipboard");
  }
}
