use ratatui::{
  Frame,
  layout::{Constraint, Layout, Rect},
  style::{Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Padding, Paragraph, Wrap},
};

use crate::app::{App, Field, MessageKind};
use crate::input::TextInput;
use crate::share::share_url;
use crate::theme::Theme;

/// Width of the label column in the form, including the gap.
const LABEL_WIDTH: usize = 14;

// --- Helpers ---

/// Compute the display width of the first `n` chars (accounting for double-width CJK).
pub fn display_width(s: &str, n: usize) -> usize {
  use unicode_width::UnicodeWidthChar;
  s.chars().take(n).map(|c| c.width().unwrap_or(0)).sum()
}

/// Scroll `input` so the cursor stays inside `width` columns.
/// Returns the visible text and the cursor column relative to it.
fn visible_text(input: &mut TextInput, width: usize) -> (String, usize) {
  let cursor_col = display_width(&input.value, input.cursor);
  if cursor_col < input.scroll {
    input.scroll = cursor_col;
  } else if width > 0 && cursor_col >= input.scroll + width {
    input.scroll = cursor_col.saturating_sub(width) + 1;
  }

  let scroll = input.scroll;
  let visible: String = input
    .value
    .chars()
    .scan(0usize, |col, c| {
      let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
      let start = *col;
      *col += w;
      Some((start, *col, c))
    })
    .skip_while(|(_, end, _)| *end <= scroll)
    .take_while(|(start, _, _)| *start < scroll + width)
    .map(|(_, _, c)| c)
    .collect();
  (visible, cursor_col - scroll)
}

// --- UI Rendering ---

pub fn ui(frame: &mut Frame, app: &mut App) {
  let theme = app.theme();

  frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), frame.area());

  let [header_area, form_area, result_area, status_area, footer_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Length(Field::ALL.len() as u16 + 2),
    Constraint::Min(4),
    Constraint::Length(1),
    Constraint::Length(1),
  ])
  .areas(frame.area());

  render_header(frame, theme, header_area);
  render_form(frame, app, form_area);
  render_result(frame, app, result_area);
  render_status(frame, app, status_area);
  render_footer(frame, app, footer_area);
}

fn render_header(frame: &mut Frame, theme: &Theme, area: Rect) {
  let left = Line::from(Span::styled(" ▶ ytmix ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)));
  frame.render_widget(left, area);

  let version = format!("v{} ", env!("CARGO_PKG_VERSION"));
  let right = Line::from(Span::styled(&version, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(version.len() as u16), width: version.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

fn render_form(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let block = Block::bordered()
    .title(" Channel & filters ")
    .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
    .border_type(ratatui::widgets::BorderType::Rounded)
    .border_style(Style::default().fg(theme.border))
    .padding(Padding::horizontal(1));

  // Inner width: area minus 2 borders minus 2 padding, minus the label column.
  let value_w = (area.width.saturating_sub(4) as usize).saturating_sub(LABEL_WIDTH);
  let focus = app.focus;
  let mut cursor = None;

  let lines: Vec<Line> = Field::ALL
    .iter()
    .enumerate()
    .map(|(row, &field)| {
      let focused = field == focus;
      let label_style = if focused {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
      } else {
        Style::default().fg(theme.muted)
      };
      let label = Span::styled(format!("{:<width$}", field.label(), width = LABEL_WIDTH), label_style);
      let value_style = if focused { Style::default().fg(theme.fg).bg(theme.highlight_bg) } else { Style::default().fg(theme.fg) };

      let value = match field {
        Field::Shorts => {
          let mark = if app.include_shorts { "[x]" } else { "[ ]" };
          Span::styled(format!("{} include videos of 60 s or less", mark), value_style)
        }
        Field::Order => Span::styled(format!("◀ {} ▶", app.order.label()), value_style),
        _ => match app.input_mut(field) {
          Some(input) => {
            let (text, col) = visible_text(input, value_w);
            if focused {
              cursor = Some((row, col));
            }
            Span::styled(format!("{:<width$}", text, width = value_w), value_style)
          }
          None => Span::raw(""),
        },
      };
      Line::from(vec![label, value])
    })
    .collect();

  frame.render_widget(Paragraph::new(lines).block(block), area);

  if let Some((row, col)) = cursor {
    let x = area.x + 2 + (LABEL_WIDTH + col) as u16;
    frame.set_cursor_position((x, area.y + 1 + row as u16));
  }
}

fn render_result(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let title = match &app.last_result {
    Some(p) => format!(" Video IDs ({} of {}) ", p.shown, p.matched),
    None => " Video IDs ".to_string(),
  };
  let block = Block::bordered()
    .title(title)
    .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
    .border_type(ratatui::widgets::BorderType::Rounded)
    .border_style(Style::default().fg(theme.border))
    .padding(Padding::horizontal(1));

  let mut lines = vec![Line::from(Span::styled(app.video_ids.as_str(), Style::default().fg(theme.fg)))];
  if let Ok(url) = share_url(&app.video_ids) {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(url, Style::default().fg(theme.accent).add_modifier(Modifier::UNDERLINED))));
  }

  let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(block);
  frame.render_widget(paragraph, area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let (text, style) = if let Some(label) = app.busy_label() {
    (format!(" ⏳ {}", label), Style::default().fg(theme.status))
  } else if let Some(msg) = &app.message {
    match msg.kind {
      MessageKind::Success => (format!(" ✔ {}", msg.text), Style::default().fg(theme.success)),
      MessageKind::Error => (format!(" ⚠  {}", msg.text), Style::default().fg(theme.error)),
    }
  } else {
    (" Ready".to_string(), Style::default().fg(theme.muted))
  };
  frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let mut keys: Vec<(&str, &str)> = vec![("Tab", "Next")];
  match app.focus {
    Field::ChannelName => keys.push(("Enter", "Find channel")),
    _ => keys.push(("Enter", "Get IDs")),
  }
  if matches!(app.focus, Field::Shorts | Field::Order) {
    keys.push(("←/→", "Change"));
  }
  keys.push(("^g", "Get IDs"));
  if !app.video_ids.is_empty() {
    keys.push(("^y", "Copy URL"));
    keys.push(("^o", "Open URL"));
  }
  keys.push(("^t", "Theme"));
  keys.push(("Esc", "Quit"));

  let spans: Vec<Span> = keys
    .iter()
    .enumerate()
    .flat_map(|(i, (key, action))| {
      let mut s = vec![
        Span::styled(format!(" {} ", key), Style::default().fg(theme.key_fg).bg(theme.key_bg)),
        Span::styled(format!(" {} ", action), Style::default().fg(theme.muted)),
      ];
      if i < keys.len() - 1 {
        s.push(Span::raw("  "));
      }
      s
    })
    .collect();

  frame.render_widget(Line::from(spans), area);

  let theme_label = format!("{} ", theme.name);
  let right = Line::from(Span::styled(&theme_label, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(theme_label.len() as u16), width: theme_label.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_width_counts_wide_chars() {
    assert_eq!(display_width("abc", 2), 2);
    assert_eq!(display_width("日本", 2), 4);
  }

  #[test]
  fn short_text_is_not_scrolled() {
    let mut input = TextInput::new("UC123");
    let (text, col) = visible_text(&mut input, 20);
    assert_eq!(text, "UC123");
    assert_eq!(col, 5);
    assert_eq!(input.scroll, 0);
  }

  #[test]
  fn long_text_scrolls_to_keep_cursor_visible() {
    let mut input = TextInput::new("abcdefghij");
    let (text, col) = visible_text(&mut input, 4);
    assert_eq!(input.scroll, 7);
    assert_eq!(text, "hij");
    assert_eq!(col, 3);

    input.home();
    let (text, col) = visible_text(&mut input, 4);
    assert_eq!(input.scroll, 0);
    assert_eq!(text, "abcd");
    assert_eq!(col, 0);
  }
}
