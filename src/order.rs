use clap::ValueEnum;
use rand::Rng;
use rand::seq::SliceRandom;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::filter::VideoRecord;

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
  // Safety: literal pattern, covered by the tests below.
  Regex::new(r"(?-u:\b)(?:19|20)[0-9]{2}(?-u:\b)").expect("year pattern is valid")
});

/// How the filtered uploads are arranged before truncation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderMode {
  /// As returned by the uploads list (newest first).
  #[default]
  Unmodified,
  /// Oldest first.
  DateAsc,
  Random,
  YearInTitleAsc,
  YearInTitleDesc,
}

impl OrderMode {
  pub const ALL: [OrderMode; 5] =
    [OrderMode::Unmodified, OrderMode::DateAsc, OrderMode::Random, OrderMode::YearInTitleAsc, OrderMode::YearInTitleDesc];

  pub fn label(self) -> &'static str {
    match self {
      OrderMode::Unmodified => "Newest first",
      OrderMode::DateAsc => "Oldest first",
      OrderMode::Random => "Random",
      OrderMode::YearInTitleAsc => "Year in title (oldest first)",
      OrderMode::YearInTitleDesc => "Year in title (newest first)",
    }
  }

  pub fn next(self) -> Self {
    let idx = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
    Self::ALL[(idx + 1) % Self::ALL.len()]
  }

  pub fn prev(self) -> Self {
    let idx = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
    Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
  }
}

/// First standalone 1900-2099 token in `title`, scanning left to right.
///
/// Word boundaries are ASCII-only, so a year directly next to a non-ASCII letter
/// (`2019年`, `Café1999`) still counts.
pub fn year_in_title(title: &str) -> Option<u16> {
  YEAR_RE.find(title).and_then(|m| m.as_str().parse().ok())
}

/// Sort key where a missing year ranks after every real one.
fn year_key(record: &VideoRecord) -> u32 {
  year_in_title(&record.title).map_or(u32::MAX, u32::from)
}

/// Arrange `records` in place. Year sorts are stable: equal years keep their relative order.
pub fn apply_order<R: Rng + ?Sized>(records: &mut [VideoRecord], mode: OrderMode, rng: &mut R) {
  match mode {
    OrderMode::Unmodified => {}
    OrderMode::DateAsc => records.reverse(),
    OrderMode::Random => records.shuffle(rng),
    OrderMode::YearInTitleAsc => records.sort_by_cached_key(year_key),
    OrderMode::YearInTitleDesc => records.sort_by_cached_key(|r| std::cmp::Reverse(year_key(r))),
  }
}
