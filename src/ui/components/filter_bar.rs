use super::KeyResult;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Events emitted by filter bar that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterBarEvent {
  /// User moved to another tab; carries its label
  SelectionChanged(&'static str),
}

/// Status filter tabs. The first label is "All".
#[derive(Debug, Clone)]
pub struct FilterBar {
  labels: &'static [&'static str],
  selected: usize,
}

impl FilterBar {
  pub fn new(labels: &'static [&'static str]) -> Self {
    Self {
      labels,
      selected: 0,
    }
  }

  pub fn selected_label(&self) -> &'static str {
    self.labels.get(self.selected).copied().unwrap_or("All")
  }

  /// Handle a key event
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<FilterBarEvent> {
    if self.labels.len() < 2 {
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Tab => {
        self.navigate(1);
        KeyResult::Event(FilterBarEvent::SelectionChanged(self.selected_label()))
      }
      KeyCode::BackTab => {
        self.navigate(-1);
        KeyResult::Event(FilterBarEvent::SelectionChanged(self.selected_label()))
      }
      _ => KeyResult::NotHandled,
    }
  }

  /// Navigate tabs with wrapping
  fn navigate(&mut self, direction: i32) {
    let total = self.labels.len();
    self.selected = if direction > 0 {
      (self.selected + 1) % total
    } else if self.selected == 0 {
      total - 1
    } else {
      self.selected - 1
    };
  }

  pub fn render(&self, frame: &mut Frame, area: Rect) {
    let mut spans = vec![Span::styled("[Status] ", Style::default().fg(Color::Yellow))];

    for (idx, label) in self.labels.iter().enumerate() {
      if idx > 0 {
        spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
      }
      let style = if self.selected == idx {
        Style::default().fg(Color::Black).bg(Color::Cyan)
      } else {
        Style::default().fg(Color::Gray)
      };
      spans.push(Span::styled(format!(" {} ", label), style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  const LABELS: &[&str] = &["All", "Pending Payments", "Received Payments"];

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  #[test]
  fn test_tab_cycles_and_wraps() {
    let mut bar = FilterBar::new(LABELS);
    assert_eq!(bar.selected_label(), "All");
    assert_eq!(
      bar.handle_key(key(KeyCode::Tab)),
      KeyResult::Event(FilterBarEvent::SelectionChanged("Pending Payments"))
    );
    bar.handle_key(key(KeyCode::Tab));
    bar.handle_key(key(KeyCode::Tab));
    assert_eq!(bar.selected_label(), "All");
  }

  #[test]
  fn test_backtab_wraps_to_last() {
    let mut bar = FilterBar::new(LABELS);
    bar.handle_key(key(KeyCode::BackTab));
    assert_eq!(bar.selected_label(), "Received Payments");
  }

  #[test]
  fn test_other_keys_pass_through() {
    let mut bar = FilterBar::new(LABELS);
    assert_eq!(bar.handle_key(key(KeyCode::Char('j'))), KeyResult::NotHandled);
  }
}
