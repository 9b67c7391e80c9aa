use super::input::{InputResult, TextInput};
use super::KeyResult;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Events emitted by a form that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
  /// Enter pressed; raw text per field name, in field order
  Submitted(Vec<(&'static str, String)>),
  Cancelled,
}

/// One labelled input line
#[derive(Debug, Clone)]
pub struct FormField {
  name: &'static str,
  label: String,
  /// Fixed choices cycled with Left/Right; empty means free text
  options: &'static [&'static str],
  /// Characters a free-text field accepts; None accepts anything
  accepts: Option<fn(char) -> bool>,
  input: TextInput,
}

impl FormField {
  pub fn new(name: &'static str, label: impl Into<String>, initial: &str) -> Self {
    Self {
      name,
      label: label.into(),
      options: &[],
      accepts: None,
      input: TextInput::with_value(initial),
    }
  }

  pub fn with_filter(mut self, accepts: Option<fn(char) -> bool>) -> Self {
    self.accepts = accepts;
    self
  }

  fn rejects(&self, key: &KeyEvent) -> bool {
    match (key.code, self.accepts) {
      (KeyCode::Char(c), Some(accepts)) => {
        !key.modifiers.contains(KeyModifiers::CONTROL) && !accepts(c)
      }
      _ => false,
    }
  }

  /// Restrict to `options`. An initial value outside them snaps to the first.
  pub fn with_options(mut self, options: &'static [&'static str]) -> Self {
    if let Some(first) = options.first() {
      if !options.iter().any(|o| *o == self.input.value()) {
        self.input.set_value(first);
      }
    }
    self.options = options;
    self
  }

  fn cycle(&mut self, direction: i32) {
    let total = self.options.len();
    if total == 0 {
      return;
    }
    let current = self
      .options
      .iter()
      .position(|o| *o == self.input.value())
      .unwrap_or(0);
    let next = if direction > 0 {
      (current + 1) % total
    } else if current == 0 {
      total - 1
    } else {
      current - 1
    };
    self.input.set_value(self.options[next]);
  }
}

/// Modal form with one input per field. Tab moves between fields.
#[derive(Debug, Clone)]
pub struct FormOverlay {
  title: String,
  fields: Vec<FormField>,
  focus: usize,
  error: Option<String>,
  busy: bool,
}

impl FormOverlay {
  pub fn new(title: impl Into<String>, fields: Vec<FormField>) -> Self {
    Self {
      title: title.into(),
      fields,
      focus: 0,
      error: None,
      busy: false,
    }
  }

  pub fn values(&self) -> Vec<(&'static str, String)> {
    self
      .fields
      .iter()
      .map(|f| (f.name, f.input.value().to_string()))
      .collect()
  }

  /// Show an error under the fields and unlock the form.
  pub fn set_error(&mut self, message: impl Into<String>) {
    self.error = Some(message.into());
    self.busy = false;
  }

  /// Lock the form while a submission is in flight.
  pub fn set_busy(&mut self) {
    self.error = None;
    self.busy = true;
  }

  pub fn is_busy(&self) -> bool {
    self.busy
  }

  #[cfg(test)]
  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  /// Move focus to the named field, if present.
  pub fn focus_field(&mut self, name: &str) {
    if let Some(idx) = self.fields.iter().position(|f| f.name == name) {
      self.focus = idx;
    }
  }

  fn move_focus(&mut self, direction: i32) {
    let total = self.fields.len();
    if total == 0 {
      return;
    }
    self.focus = if direction > 0 {
      (self.focus + 1) % total
    } else if self.focus == 0 {
      total - 1
    } else {
      self.focus - 1
    };
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<FormEvent> {
    match key.code {
      KeyCode::Esc => return KeyResult::Event(FormEvent::Cancelled),
      // One submission at a time
      _ if self.busy => return KeyResult::Handled,
      KeyCode::Enter => return KeyResult::Event(FormEvent::Submitted(self.values())),
      KeyCode::Tab | KeyCode::Down => {
        self.move_focus(1);
        return KeyResult::Handled;
      }
      KeyCode::BackTab | KeyCode::Up => {
        self.move_focus(-1);
        return KeyResult::Handled;
      }
      _ => {}
    }

    let Some(field) = self.fields.get_mut(self.focus) else {
      return KeyResult::Handled;
    };
    if !field.options.is_empty() {
      match key.code {
        KeyCode::Left => field.cycle(-1),
        KeyCode::Right | KeyCode::Char(' ') => field.cycle(1),
        _ => {}
      }
      return KeyResult::Handled;
    }

    if field.rejects(&key) {
      return KeyResult::Handled;
    }
    field.input.handle_key(key);
    self.error = None;
    KeyResult::Handled
  }

  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    let label_width = self
      .fields
      .iter()
      .map(|f| f.label.chars().count())
      .max()
      .unwrap_or(8) as u16;
    let width = (label_width + 40).min(area.width.saturating_sub(4)).max(20);
    let height = (self.fields.len() as u16 + 5).min(area.height.saturating_sub(2));

    // Center the overlay
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let overlay_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(format!(" {} ", self.title));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let mut lines: Vec<Line> = self
      .fields
      .iter()
      .enumerate()
      .map(|(idx, field)| {
        let focused = idx == self.focus;
        let label_style = if focused {
          Style::default().fg(Color::Cyan).bold()
        } else {
          Style::default().fg(Color::Gray)
        };
        let mut spans = vec![
          Span::styled(
            format!("{:>width$}: ", field.label, width = label_width as usize),
            label_style,
          ),
          Span::raw(field.input.value().to_string()),
        ];
        if focused && field.options.is_empty() {
          spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
        } else if !field.options.is_empty() {
          spans.push(Span::styled("  ◂▸", Style::default().fg(Color::DarkGray)));
        }
        Line::from(spans)
      })
      .collect();

    lines.push(Line::raw(""));
    lines.push(match (&self.error, self.busy) {
      (Some(error), _) => Line::styled(error.clone(), Style::default().fg(Color::Red)),
      (None, true) => Line::styled("Saving...", Style::default().fg(Color::Yellow)),
      (None, false) => Line::styled(
        "Enter:save  Tab:next field  Esc:cancel",
        Style::default().fg(Color::DarkGray),
      ),
    });

    frame.render_widget(Paragraph::new(lines), inner);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn form() -> FormOverlay {
    FormOverlay::new(
      "Add New Customer",
      vec![
        FormField::new("name", "Customer Name", ""),
        FormField::new("phone", "Phone", ""),
        FormField::new("status", "Status", "").with_options(&["Received", "Pending"]),
      ],
    )
  }

  #[test]
  fn test_typing_goes_to_focused_field() {
    let mut form = form();
    form.handle_key(key(KeyCode::Char('A')));
    form.handle_key(key(KeyCode::Tab));
    form.handle_key(key(KeyCode::Char('1')));
    assert_eq!(
      form.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(FormEvent::Submitted(vec![
        ("name", "A".to_string()),
        ("phone", "1".to_string()),
        ("status", "Received".to_string()),
      ]))
    );
  }

  #[test]
  fn test_options_cycle() {
    let mut form = form();
    form.focus_field("status");
    form.handle_key(key(KeyCode::Right));
    assert_eq!(form.values()[2].1, "Pending");
    form.handle_key(key(KeyCode::Right));
    assert_eq!(form.values()[2].1, "Received");
    form.handle_key(key(KeyCode::Left));
    assert_eq!(form.values()[2].1, "Pending");
    // Free typing is ignored on choice fields
    form.handle_key(key(KeyCode::Char('x')));
    assert_eq!(form.values()[2].1, "Pending");
  }

  #[test]
  fn test_busy_form_ignores_submit_but_can_cancel() {
    let mut form = form();
    form.set_busy();
    assert_eq!(form.handle_key(key(KeyCode::Enter)), KeyResult::Handled);
    assert_eq!(
      form.handle_key(key(KeyCode::Esc)),
      KeyResult::Event(FormEvent::Cancelled)
    );
  }

  #[test]
  fn test_error_unlocks_and_clears_on_typing() {
    let mut form = form();
    form.set_busy();
    form.set_error("Phone is required");
    assert!(!form.is_busy());
    assert_eq!(form.error(), Some("Phone is required"));
    form.handle_key(key(KeyCode::Char('x')));
    assert!(form.error().is_none());
  }

  #[test]
  fn test_filtered_field_drops_other_characters() {
    fn digit(c: char) -> bool {
      c.is_ascii_digit()
    }
    let mut form = FormOverlay::new(
      "Add New Supplier",
      vec![FormField::new("phone", "Phone", "").with_filter(Some(digit))],
    );
    for c in "03a1b".chars() {
      form.handle_key(key(KeyCode::Char(c)));
    }
    assert_eq!(form.values()[0].1, "031");
  }

  #[test]
  fn test_prefilled_choice_is_kept() {
    let field = FormField::new("status", "Status", "Pending").with_options(&["Received", "Pending"]);
    assert_eq!(field.input.value(), "Pending");
  }
}
