use ratatui::prelude::Color;

/// Truncate a string to at most `max_len` chars, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Display color for a row status
pub fn status_color(status: &str) -> Color {
  match status {
    "Received" | "Paid" | "Active" | "In Stock" => Color::Green,
    "Pending" | "Due" => Color::Yellow,
    "Inactive" | "Out of Stock" => Color::Red,
    _ => Color::White,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
  }

  #[test]
  fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_truncate_counts_chars() {
    assert_eq!(truncate("Çağrı Öztürk", 8), "Çağrı...");
  }

  #[test]
  fn test_status_color_settled() {
    assert_eq!(status_color("Received"), Color::Green);
    assert_eq!(status_color("In Stock"), Color::Green);
  }

  #[test]
  fn test_status_color_outstanding() {
    assert_eq!(status_color("Pending"), Color::Yellow);
    assert_eq!(status_color("Due"), Color::Yellow);
    assert_eq!(status_color("Out of Stock"), Color::Red);
  }

  #[test]
  fn test_status_color_default() {
    assert_eq!(status_color(""), Color::White);
  }
}
