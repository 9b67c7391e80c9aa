use crate::sync::FetchStatus;
use crate::ui::view::ShortcutInfo;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the header bar with title, service host, collection, fetch status
/// and shortcut hints
pub fn draw_header(
  frame: &mut Frame,
  area: Rect,
  title: &str,
  collection: &str,
  status: FetchStatus,
  shortcuts: &[ShortcutInfo],
) {
  let mut spans = vec![
    Span::styled(format!(" {} ", title), Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(
      format!(" {} ", collection),
      Style::default().fg(Color::Yellow).bold(),
    ),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", status.label()), status_style(status)),
    Span::raw(" "),
  ];

  let mut visible: Vec<&ShortcutInfo> = shortcuts.iter().collect();
  visible.sort_by_key(|s| s.priority);
  for shortcut in visible {
    // Keys highlighted, descriptions dimmed
    spans.push(Span::styled(
      format!(" <{}>", shortcut.key),
      Style::default().fg(Color::Cyan),
    ));
    spans.push(Span::styled(
      format!(" {} ", shortcut.label),
      Style::default().fg(Color::DarkGray),
    ));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}

fn status_style(status: FetchStatus) -> Style {
  match status {
    FetchStatus::Idle => Style::default().fg(Color::DarkGray),
    FetchStatus::InitialLoading | FetchStatus::BackgroundRefreshing => {
      Style::default().fg(Color::Yellow)
    }
    FetchStatus::Error => Style::default().fg(Color::Red).bold(),
  }
}

/// Host part of a service URL, for the header title
pub fn extract_domain(url: &str) -> &str {
  let rest = url
    .strip_prefix("https://")
    .or_else(|| url.strip_prefix("http://"))
    .unwrap_or(url);
  rest.split('/').next().unwrap_or(rest)
}
