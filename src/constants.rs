//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!` so it's always available,
//! no runtime file I/O. Parsed once on first access via `LazyLock`.

use serde::Deserialize;
use std::sync::LazyLock;

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  // YouTube Data API
  pub api_base_url: String,
  pub share_base_url: String,

  // Paging and batching
  pub page_size: usize,
  pub batch_size: usize,

  // Filtering and output
  pub short_max_secs: u64,
  pub max_output: usize,

  // Interactive form
  pub message_ttl_ms: u64,
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; if it's malformed every test below fails.
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn embedded_constants_parse() {
    let c = constants();
    assert_eq!(c.page_size, 50);
    assert_eq!(c.batch_size, 50);
    assert_eq!(c.short_max_secs, 60);
    assert_eq!(c.max_output, 50);
    assert!(c.api_base_url.starts_with("https://"));
    assert!(c.share_base_url.ends_with("/watch_videos"));
  }
}
