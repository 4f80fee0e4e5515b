use ratatui::crossterm::event::{self, KeyCode, KeyModifiers};

use crate::app::{App, Field};

// --- Helpers ---

/// Convert a char index to a byte offset within the string.
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
  s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

/// A single-line editable field with a char-indexed cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
  pub value: String,
  /// Cursor position in chars, `0..=value.chars().count()`.
  pub cursor: usize,
  /// Horizontal scroll offset in display columns.
  pub scroll: usize,
}

impl TextInput {
  pub fn new(value: &str) -> Self {
    Self { value: value.to_string(), cursor: value.chars().count(), scroll: 0 }
  }

  pub fn set(&mut self, value: &str) {
    *self = Self::new(value);
  }

  pub fn clear(&mut self) {
    *self = Self::default();
  }

  pub fn trimmed(&self) -> &str {
    self.value.trim()
  }

  fn len(&self) -> usize {
    self.value.chars().count()
  }

  pub fn insert(&mut self, c: char) {
    let byte_idx = char_to_byte_index(&self.value, self.cursor);
    self.value.insert(byte_idx, c);
    self.cursor += 1;
  }

  pub fn backspace(&mut self) {
    if self.cursor > 0 {
      self.cursor -= 1;
      let byte_idx = char_to_byte_index(&self.value, self.cursor);
      self.value.remove(byte_idx);
    }
  }

  pub fn delete(&mut self) {
    if self.cursor < self.len() {
      let byte_idx = char_to_byte_index(&self.value, self.cursor);
      self.value.remove(byte_idx);
    }
  }

  pub fn left(&mut self) {
    self.cursor = self.cursor.saturating_sub(1);
  }

  pub fn right(&mut self) {
    if self.cursor < self.len() {
      self.cursor += 1;
    }
  }

  pub fn home(&mut self) {
    self.cursor = 0;
  }

  pub fn end(&mut self) {
    self.cursor = self.len();
  }
}

// --- Event Handling ---

pub fn handle_key_event(app: &mut App, key: event::KeyEvent) {
  if key.modifiers.contains(KeyModifiers::CONTROL) {
    match key.code {
      KeyCode::Char('c') => app.should_quit = true,
      KeyCode::Char('t') => app.next_theme(),
      KeyCode::Char('g') => app.trigger_videos(),
      KeyCode::Char('y') => app.copy_url(),
      KeyCode::Char('o') => app.open_url(),
      _ => {}
    }
    return;
  }

  match key.code {
    KeyCode::Esc => {
      app.should_quit = true;
      return;
    }
    KeyCode::Tab | KeyCode::Down => {
      app.focus = app.focus.next();
      return;
    }
    KeyCode::BackTab | KeyCode::Up => {
      app.focus = app.focus.prev();
      return;
    }
    KeyCode::Enter => {
      if app.focus == Field::ChannelName {
        app.trigger_search();
      } else {
        app.trigger_videos();
      }
      return;
    }
    _ => {}
  }

  match app.focus {
    Field::Shorts => handle_toggle_key(app, key),
    Field::Order => handle_order_key(app, key),
    field => {
      if let Some(input) = app.input_mut(field) {
        handle_text_key(input, field, key);
      }
    }
  }
}

fn handle_text_key(input: &mut TextInput, field: Field, key: event::KeyEvent) {
  match key.code {
    KeyCode::Char(c) => {
      if field == Field::MinDuration && !(c.is_ascii_digit() || c == '.') {
        return;
      }
      input.insert(c);
    }
    KeyCode::Backspace => input.backspace(),
    KeyCode::Delete => input.delete(),
    KeyCode::Left => input.left(),
    KeyCode::Right => input.right(),
    KeyCode::Home => input.home(),
    KeyCode::End => input.end(),
    _ => {}
  }
}

fn handle_toggle_key(app: &mut App, key: event::KeyEvent) {
  if matches!(key.code, KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right) {
    app.include_shorts = !app.include_shorts;
  }
}

fn handle_order_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Left => app.order = app.order.prev(),
    KeyCode::Right | KeyCode::Char(' ') => app.order = app.order.next(),
    _ => {}
  }
}
