use crate::sync::DataSource;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the pagination footer: page position, row count and data source
pub fn draw_footer(
  frame: &mut Frame,
  area: Rect,
  page: usize,
  page_count: usize,
  total: u64,
  source: DataSource,
) {
  let mut spans = vec![
    Span::raw(" "),
    Span::styled(
      format!("Page {}/{}", page + 1, page_count),
      Style::default().fg(Color::Cyan).bold(),
    ),
    Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
    Span::styled(format!("{} rows", total), Style::default().fg(Color::White)),
  ];

  let source_label = match source {
    DataSource::None => None,
    DataSource::Network => Some(("live", Color::Green)),
    DataSource::Cache => Some(("cached", Color::Yellow)),
    DataSource::Offline => Some(("offline", Color::Red)),
  };
  if let Some((label, color)) = source_label {
    spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
    spans.push(Span::styled(label, Style::default().fg(color)));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}
