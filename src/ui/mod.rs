pub mod components;
pub mod renderfns;
pub mod view;
pub mod views;

use crate::app::App;
use view::View;
use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, TableState};

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Active collection
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  let title = app.title();
  let view = app.active_view_mut();
  renderfns::draw_header(
    frame,
    chunks[0],
    &title,
    &view.breadcrumb_label(),
    view.fetch_status(),
    &view.shortcuts(),
  );
  view.render(frame, chunks[1]);

  draw_status_bar(frame, chunks[2], app);
  app.command_input().render_overlay(frame, chunks[1]);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
  let (content, style) = match app.status_message() {
    Some(message) => (format!(" {}", message), Style::default().fg(Color::Red)),
    None => (
      " :command  /search  j/k:nav  n/p:page  a:add  e:edit  x:delete  q:quit".to_string(),
      Style::default().fg(Color::DarkGray),
    ),
  };

  let paragraph = Paragraph::new(content).style(style);
  frame.render_widget(paragraph, area);
}

/// Clamp or initialize a table selection for a list of `len` rows
pub fn ensure_valid_selection(state: &mut TableState, len: usize) {
  if len == 0 {
    state.select(None);
    return;
  }
  match state.selected() {
    Some(idx) if idx >= len => state.select(Some(len - 1)),
    None => state.select(Some(0)),
    _ => {}
  }
}
