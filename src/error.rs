use thiserror::Error;

/// Failures of a single pipeline action. Every variant aborts the action.
#[derive(Debug, Error)]
pub enum Error {
  /// A required input (API key, channel name, channel id) was empty. No request was made.
  #[error("{0}")]
  MissingInput(&'static str),

  /// The search or channel lookup returned zero results.
  #[error("{0}")]
  ChannelNotFound(&'static str),

  /// Transport failure, non-2xx status, or a response body missing an expected field.
  #[error("{0}")]
  Upstream(String),

  /// A share action was attempted with an empty id list.
  #[error("No video IDs to share.")]
  NoIdsAvailable,

  /// The clipboard or browser hand-off itself failed.
  #[error("Failed to share URL: {0}")]
  ShareFailed(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<reqwest::Error> for Error {
  fn from(e: reqwest::Error) -> Self {
    Error::Upstream(e.to_string())
  }
}

impl From<serde_json::Error> for Error {
  fn from(e: serde_json::Error) -> Self {
    Error::Upstream(format!("Malformed API response: {}", e))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn messages_pass_through() {
    assert_eq!(Error::MissingInput("Enter a key.").to_string(), "Enter a key.");
    assert_eq!(Error::Upstream("boom".into()).to_string(), "boom");
  }

  #[test]
  fn json_errors_become_upstream() {
    let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    assert!(matches!(Error::from(err), Error::Upstream(msg) if msg.starts_with("Malformed API response")));
  }
}
