use crate::cache::OfflineStore;
use crate::collection::Collection;
use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::record::Attributes;
use crate::remote::RemoteDataService;
use crate::sync::{
  ColumnFilterModel, FetchStatus, PaginationModel, QueryCoordinator, SyncEvent,
};
use crate::ui::components::{
  FilterBar, FilterBarEvent, FormEvent, FormField, FormOverlay, KeyResult, SearchEvent,
  SearchInput,
};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{draw_footer, status_color, truncate};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// What the open form submits to
#[derive(Debug, Clone, PartialEq, Eq)]
enum FormKind {
  Add,
  Edit(String),
  ColumnFilter,
  DateRange,
}

/// Paginated grid over one collection
pub struct CollectionView {
  coordinator: QueryCoordinator,
  table_state: TableState,
  search: SearchInput,
  filters: FilterBar,
  form: Option<(FormKind, FormOverlay)>,
  /// Ticket of the mutation the busy form submitted
  awaiting: Option<u64>,
  /// Row id waiting for y/n
  confirm_delete: Option<String>,
}

impl CollectionView {
  pub fn new(
    collection: Collection,
    config: &SyncConfig,
    remote: Arc<dyn RemoteDataService>,
    store: Arc<dyn OfflineStore>,
    tx: UnboundedSender<SyncEvent>,
  ) -> Self {
    Self {
      coordinator: QueryCoordinator::new(collection, config, remote, store, tx),
      table_state: TableState::default(),
      search: SearchInput::new(),
      filters: FilterBar::new(collection.status_filters()),
      form: None,
      awaiting: None,
      confirm_delete: None,
    }
  }

  /// Kick off the first page load
  pub fn start(&mut self) {
    self.coordinator.start();
  }

  pub fn collection(&self) -> Collection {
    self.coordinator.collection()
  }

  /// Feed a sync event back into the coordinator and settle the form if
  /// this is the mutation it submitted
  pub fn handle_sync(&mut self, event: SyncEvent) {
    let Some(settled) = self.coordinator.handle(event) else {
      return;
    };
    if self.awaiting != Some(settled.ticket) {
      return;
    }
    self.awaiting = None;
    let waiting = matches!(&self.form, Some((FormKind::Add | FormKind::Edit(_), f)) if f.is_busy());
    if !waiting {
      return;
    }
    match settled.result {
      Ok(_) => self.form = None,
      Err(e) => {
        if let Some((_, form)) = self.form.as_mut() {
          form.set_error(e.to_string());
        }
      }
    }
  }

  fn selected_id(&self) -> Option<String> {
    let idx = self.table_state.selected()?;
    self.coordinator.rows().get(idx).map(|r| r.id.clone())
  }

  fn change_page(&mut self, delta: i64) {
    let current = self.coordinator.page() as i64;
    let last = self.coordinator.page_count() as i64 - 1;
    let target = (current + delta).clamp(0, last.max(0));
    if target == current {
      return;
    }
    self.coordinator.on_page_change(PaginationModel {
      page: target as usize,
      page_size: self.coordinator.page_size(),
    });
    self.table_state.select(Some(0));
  }

  // Forms

  fn open_add_form(&mut self) {
    let collection = self.collection();
    let fields = collection
      .fields()
      .iter()
      .map(|f| {
        FormField::new(f.name, f.label, "")
          .with_options(f.options)
          .with_filter(f.char_filter())
      })
      .collect();
    let form = FormOverlay::new(format!("Add New {}", collection.singular()), fields);
    self.form = Some((FormKind::Add, form));
  }

  fn open_edit_form(&mut self) {
    let Some(id) = self.selected_id() else {
      return;
    };
    let Some(record) = self.coordinator.on_edit(&id) else {
      return;
    };
    let collection = self.collection();
    let fields = collection
      .fields()
      .iter()
      .map(|f| {
        FormField::new(f.name, f.label, &record.text(f.name))
          .with_options(f.options)
          .with_filter(f.char_filter())
      })
      .collect();
    let form = FormOverlay::new(format!("Edit {}", collection.singular()), fields);
    self.form = Some((FormKind::Edit(id), form));
  }

  fn open_column_filter_form(&mut self) {
    let current = &self.coordinator.inputs().column_filters;
    let fields = self
      .coordinator
      .columns()
      .iter()
      .map(|c| {
        let value = current
          .items
          .iter()
          .find(|f| f.field == c.field)
          .map(|f| f.value.as_str())
          .unwrap_or("");
        FormField::new(c.field, c.header, value)
      })
      .collect();
    self.form = Some((
      FormKind::ColumnFilter,
      FormOverlay::new("Filter Columns", fields),
    ));
  }

  fn open_date_range_form(&mut self) {
    let inputs = self.coordinator.inputs();
    let format = |d: Option<NaiveDate>| d.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default();
    let fields = vec![
      FormField::new("start", "From (YYYY-MM-DD)", &format(inputs.start_date)),
      FormField::new("end", "To (YYYY-MM-DD)", &format(inputs.end_date)),
    ];
    self.form = Some((
      FormKind::DateRange,
      FormOverlay::new("Date Range", fields),
    ));
  }

  fn submit_form(&mut self, kind: FormKind, values: Vec<(&'static str, String)>) {
    match kind {
      FormKind::Add => {
        let data = self.to_attributes(&values);
        let result = self.coordinator.on_add(data);
        self.after_mutation_submit(result);
      }
      FormKind::Edit(id) => {
        let data = self.to_attributes(&values);
        let result = self.coordinator.on_update(&id, data);
        self.after_mutation_submit(result);
      }
      FormKind::ColumnFilter => {
        let model = ColumnFilterModel::new(
          values
            .into_iter()
            .filter(|(_, v)| !v.trim().is_empty())
            .map(|(field, value)| (field, value.trim().to_string())),
        );
        self.form = None;
        self.coordinator.on_column_filter_change(model);
        self.table_state.select(Some(0));
      }
      FormKind::DateRange => match parse_date_range(&values) {
        Ok((start, end)) => {
          self.form = None;
          self.coordinator.on_date_range_change(start, end);
          self.table_state.select(Some(0));
        }
        Err(message) => {
          if let Some((_, form)) = self.form.as_mut() {
            form.set_error(message);
          }
        }
      },
    }
  }

  fn after_mutation_submit(&mut self, result: Result<u64, SyncError>) {
    let Some((_, form)) = self.form.as_mut() else {
      return;
    };
    match result {
      Ok(ticket) => {
        self.awaiting = Some(ticket);
        form.set_busy();
      }
      Err(e) => {
        if let SyncError::Validation { field, .. } = &e {
          form.focus_field(field);
        }
        form.set_error(e.to_string());
      }
    }
  }

  fn to_attributes(&self, values: &[(&'static str, String)]) -> Attributes {
    let specs = self.collection().fields();
    values
      .iter()
      .map(|(name, raw)| {
        let value = specs
          .iter()
          .find(|f| f.name == *name)
          .map(|f| f.to_value(raw))
          .unwrap_or_else(|| raw.trim().into());
        (name.to_string(), value)
      })
      .collect()
  }

  // Rendering

  fn render_notice(&self, frame: &mut Frame, area: Rect) {
    let line = if let Some(id) = &self.confirm_delete {
      Line::from(vec![
        Span::styled(format!(" Delete {}? ", id), Style::default().fg(Color::Red).bold()),
        Span::styled("(y/n)", Style::default().fg(Color::DarkGray)),
      ])
    } else if let Some(notice) = self.coordinator.notice() {
      let hint = if notice.retry.is_some() {
        "  <r> retry  <esc> dismiss"
      } else {
        "  <esc> dismiss"
      };
      Line::from(vec![
        Span::styled(format!(" {}", notice.message), Style::default().fg(Color::Red)),
        Span::styled(hint, Style::default().fg(Color::DarkGray)),
      ])
    } else {
      Line::default()
    };
    frame.render_widget(Paragraph::new(line), area);
  }

  fn render_table(&mut self, frame: &mut Frame, area: Rect) {
    let len = self.coordinator.rows().len();
    ensure_valid_selection(&mut self.table_state, len);

    let collection = self.collection();
    let title = if self.coordinator.is_mutating() {
      format!(" {} (saving...) ", collection.title())
    } else {
      match self.coordinator.status() {
        FetchStatus::InitialLoading => format!(" {} (loading...) ", collection.title()),
        FetchStatus::BackgroundRefreshing => format!(" {} (refreshing...) ", collection.title()),
        _ => format!(" {} ({}) ", collection.title(), self.coordinator.total()),
      }
    };
    let border = if self.coordinator.tracker().is_offline() {
      Color::Red
    } else {
      Color::Blue
    };
    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(border));

    if len == 0 {
      let tracker = self.coordinator.tracker();
      let content = match (tracker.status(), tracker.error()) {
        (FetchStatus::InitialLoading, _) => "Loading...".to_string(),
        (FetchStatus::Error, Some(err)) => format!("Failed to load rows: {}. Press 'r' to retry.", err),
        (FetchStatus::Error, None) => "Failed to load rows. Press 'r' to retry.".to_string(),
        _ => "No rows found.".to_string(),
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let columns = self.coordinator.columns();
    let header = Row::new(
      columns
        .iter()
        .map(|c| Cell::from(c.header).style(Style::default().fg(Color::Yellow).bold())),
    );
    let rows: Vec<Row> = self
      .coordinator
      .rows()
      .iter()
      .map(|record| {
        Row::new(columns.iter().map(|c| {
          let text = truncate(&record.text(c.field), c.width as usize);
          if c.field == "status" {
            let color = status_color(&text);
            Cell::from(text).style(Style::default().fg(color))
          } else {
            Cell::from(text)
          }
        }))
      })
      .collect();
    let widths: Vec<Constraint> = columns.iter().map(|c| Constraint::Length(c.width)).collect();

    let table = Table::new(rows, widths)
      .header(header)
      .block(block)
      .row_highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(table, area, &mut self.table_state);
  }
}

/// Parse the date range form. Empty fields clear that bound.
fn parse_date_range(
  values: &[(&'static str, String)],
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), String> {
  let parse = |name: &str| -> Result<Option<NaiveDate>, String> {
    let raw = values
      .iter()
      .find(|(n, _)| *n == name)
      .map(|(_, v)| v.trim())
      .unwrap_or("");
    if raw.is_empty() {
      return Ok(None);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
      .map(Some)
      .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", raw))
  };
  let start = parse("start")?;
  let end = parse("end")?;
  if let (Some(s), Some(e)) = (start, end) {
    if s > e {
      return Err("Start date is after end date".to_string());
    }
  }
  Ok((start, end))
}

impl View for CollectionView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    if let Some((kind, form)) = self.form.as_mut() {
      match form.handle_key(key) {
        KeyResult::Event(FormEvent::Submitted(values)) => {
          let kind = kind.clone();
          self.submit_form(kind, values);
        }
        KeyResult::Event(FormEvent::Cancelled) => {
          self.form = None;
          self.awaiting = None;
        }
        KeyResult::Handled | KeyResult::NotHandled => {}
      }
      return ViewAction::None;
    }

    if let Some(id) = self.confirm_delete.take() {
      if key.code == KeyCode::Char('y') {
        debug!(collection = self.collection().name(), id = %id, "Delete confirmed");
        self.coordinator.on_delete(&id);
      }
      return ViewAction::None;
    }

    match self.search.handle_key(key) {
      KeyResult::Event(SearchEvent::Changed(text)) => {
        self.coordinator.on_search_change(&text);
        return ViewAction::None;
      }
      KeyResult::Event(SearchEvent::Submitted) | KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    if let KeyResult::Event(FilterBarEvent::SelectionChanged(label)) = self.filters.handle_key(key) {
      self.coordinator.on_filter_change(label);
      self.table_state.select(Some(0));
      return ViewAction::None;
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.table_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.table_state.select_previous(),
      KeyCode::Char('n') | KeyCode::PageDown | KeyCode::Right => self.change_page(1),
      KeyCode::Char('p') | KeyCode::PageUp | KeyCode::Left => self.change_page(-1),
      KeyCode::Char('a') => self.open_add_form(),
      KeyCode::Char('e') | KeyCode::Enter => self.open_edit_form(),
      KeyCode::Char('x') | KeyCode::Delete => self.confirm_delete = self.selected_id(),
      KeyCode::Char('f') => self.open_column_filter_form(),
      KeyCode::Char('d') => self.open_date_range_form(),
      KeyCode::Char('r') => {
        if self.coordinator.notice().is_some_and(|n| n.retry.is_some()) {
          self.coordinator.retry_notice();
        } else {
          self.coordinator.on_retry();
        }
      }
      KeyCode::Esc => self.coordinator.dismiss_notice(),
      KeyCode::Char('q') => return ViewAction::Quit,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1), // Status tabs
        Constraint::Length(1), // Notice
        Constraint::Min(3),    // Grid
        Constraint::Length(1), // Pagination
      ])
      .split(area);

    self.filters.render(frame, chunks[0]);
    self.render_notice(frame, chunks[1]);
    self.render_table(frame, chunks[2]);
    draw_footer(
      frame,
      chunks[3],
      self.coordinator.page(),
      self.coordinator.page_count(),
      self.coordinator.total(),
      self.coordinator.tracker().source(),
    );

    self.search.render_overlay(frame, area);
    if let Some((_, form)) = &self.form {
      form.render_overlay(frame, area);
    }
  }

  fn breadcrumb_label(&self) -> String {
    let search = self.coordinator.search_text();
    if search.is_empty() {
      self.collection().title().to_string()
    } else {
      format!("{} /{}", self.collection().title(), search)
    }
  }

  fn fetch_status(&self) -> FetchStatus {
    self.coordinator.status()
  }

  fn is_capturing_input(&self) -> bool {
    self.form.is_some() || self.confirm_delete.is_some() || self.search.is_active()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    if self.form.is_some() {
      return vec![
        ShortcutInfo::new("tab", "next field").with_priority(10),
        ShortcutInfo::new("enter", "save").with_priority(20),
        ShortcutInfo::new("esc", "cancel").with_priority(30),
      ];
    }
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("/", "search").with_priority(20),
      ShortcutInfo::new("tab", "status").with_priority(30),
      ShortcutInfo::new("a", "add").with_priority(40),
      ShortcutInfo::new("e", "edit").with_priority(50),
      ShortcutInfo::new("x", "delete").with_priority(60),
      ShortcutInfo::new("n/p", "page").with_priority(70),
      ShortcutInfo::new("f", "filter").with_priority(80),
      ShortcutInfo::new("d", "dates").with_priority(85),
      ShortcutInfo::new("q", "quit").with_priority(90),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::NoopStorage;
  use crate::sync::testing::FakeService;
  use crossterm::event::KeyModifiers;
  use std::time::Duration;
  use tokio::sync::mpsc::{self, UnboundedReceiver};
  use tokio::time::timeout;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn press(view: &mut CollectionView, c: char) -> ViewAction {
    view.handle_key(key(KeyCode::Char(c)))
  }

  fn view(service: &Arc<FakeService>) -> (CollectionView, UnboundedReceiver<SyncEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let remote: Arc<dyn RemoteDataService> = service.clone();
    let mut v = CollectionView::new(
      Collection::Customers,
      &SyncConfig::default(),
      remote,
      Arc::new(NoopStorage),
      tx,
    );
    v.start();
    (v, rx)
  }

  async fn pump(view: &mut CollectionView, rx: &mut UnboundedReceiver<SyncEvent>) {
    while let Ok(Some(event)) = timeout(Duration::from_secs(10), rx.recv()).await {
      view.handle_sync(event);
    }
  }

  #[tokio::test(start_paused = true)]
  async fn test_add_form_shows_validation_inline() {
    let service = Arc::new(FakeService::with_customers(5));
    let (mut v, mut rx) = view(&service);
    pump(&mut v, &mut rx).await;

    press(&mut v, 'a');
    assert!(v.is_capturing_input());
    v.handle_key(key(KeyCode::Enter));

    let (kind, form) = v.form.as_ref().expect("form stays open");
    assert_eq!(*kind, FormKind::Add);
    assert_eq!(form.error(), Some("Customer Name is required"));
    assert!(!form.is_busy());
    assert_eq!(service.mutation_count(), 0);
  }

  #[tokio::test(start_paused = true)]
  async fn test_add_form_closes_after_confirmed_create() {
    let service = Arc::new(FakeService::with_customers(5));
    let (mut v, mut rx) = view(&service);
    pump(&mut v, &mut rx).await;

    press(&mut v, 'a');
    for c in "Zara".chars() {
      press(&mut v, c);
    }
    v.handle_key(key(KeyCode::Tab));
    for c in "0311-1234567".chars() {
      press(&mut v, c);
    }
    v.handle_key(key(KeyCode::Enter));
    assert!(v.form.as_ref().is_some_and(|(_, f)| f.is_busy()));

    pump(&mut v, &mut rx).await;
    assert!(v.form.is_none());
    assert_eq!(v.coordinator.rows()[0].id, "0311-1234567");
  }

  #[tokio::test(start_paused = true)]
  async fn test_failed_create_keeps_form_with_error() {
    let service = Arc::new(FakeService::with_customers(5));
    let (mut v, mut rx) = view(&service);
    pump(&mut v, &mut rx).await;
    service.fail_mutations(true);

    press(&mut v, 'a');
    for c in "Zara".chars() {
      press(&mut v, c);
    }
    v.handle_key(key(KeyCode::Tab));
    for c in "0311".chars() {
      press(&mut v, c);
    }
    v.handle_key(key(KeyCode::Enter));
    pump(&mut v, &mut rx).await;

    let (_, form) = v.form.as_ref().expect("form stays open");
    assert!(!form.is_busy());
    assert!(form.error().is_some_and(|e| e.contains("service unavailable")));
    assert_eq!(v.coordinator.rows().len(), 5);
  }

  #[tokio::test(start_paused = true)]
  async fn test_other_mutation_result_leaves_busy_form_open() {
    let service = Arc::new(FakeService::with_customers(5));
    let (mut v, mut rx) = view(&service);
    pump(&mut v, &mut rx).await;

    v.table_state.select(Some(0));
    press(&mut v, 'x');
    press(&mut v, 'y');
    let deleted = rx.recv().await.expect("delete result");
    assert!(matches!(deleted, SyncEvent::Mutated { .. }));

    service.fail_mutations(true);
    press(&mut v, 'a');
    for c in "Zara".chars() {
      press(&mut v, c);
    }
    v.handle_key(key(KeyCode::Tab));
    for c in "0311".chars() {
      press(&mut v, c);
    }
    v.handle_key(key(KeyCode::Enter));

    // The delete lands while the create is still in flight
    v.handle_sync(deleted);
    assert!(v.form.as_ref().is_some_and(|(_, f)| f.is_busy()));
    assert!(v.coordinator.rows().iter().all(|r| r.id != "0300-0000000"));

    pump(&mut v, &mut rx).await;
    let (kind, form) = v.form.as_ref().expect("form stays open");
    assert_eq!(*kind, FormKind::Add);
    assert!(!form.is_busy());
    assert!(form.error().is_some_and(|e| e.contains("service unavailable")));
    assert_eq!(form.values()[0], ("name", "Zara".to_string()));
  }

  #[tokio::test(start_paused = true)]
  async fn test_edit_prefills_selected_row() {
    let service = Arc::new(FakeService::with_customers(5));
    let (mut v, mut rx) = view(&service);
    pump(&mut v, &mut rx).await;

    v.table_state.select(Some(1));
    press(&mut v, 'e');

    let (kind, form) = v.form.as_ref().expect("edit form");
    assert_eq!(*kind, FormKind::Edit("0300-0000001".to_string()));
    let values = form.values();
    assert_eq!(values[0], ("name", "Customer 1".to_string()));
    assert_eq!(values[2], ("status", "Received".to_string()));
  }

  #[tokio::test(start_paused = true)]
  async fn test_delete_needs_confirmation() {
    let service = Arc::new(FakeService::with_customers(5));
    let (mut v, mut rx) = view(&service);
    pump(&mut v, &mut rx).await;

    v.table_state.select(Some(0));
    press(&mut v, 'x');
    press(&mut v, 'n');
    pump(&mut v, &mut rx).await;
    assert_eq!(service.mutation_count(), 0);

    press(&mut v, 'x');
    press(&mut v, 'y');
    pump(&mut v, &mut rx).await;
    assert_eq!(service.mutation_count(), 1);
    assert!(v.coordinator.rows().iter().all(|r| r.id != "0300-0000000"));
  }

  #[tokio::test(start_paused = true)]
  async fn test_paging_stops_at_bounds() {
    let service = Arc::new(FakeService::with_customers(15));
    let (mut v, mut rx) = view(&service);
    pump(&mut v, &mut rx).await;
    assert_eq!(v.coordinator.page_count(), 2);

    press(&mut v, 'p');
    assert_eq!(v.coordinator.page(), 0);
    press(&mut v, 'n');
    pump(&mut v, &mut rx).await;
    assert_eq!(v.coordinator.page(), 1);
    assert_eq!(v.coordinator.rows().len(), 5);
    press(&mut v, 'n');
    assert_eq!(v.coordinator.page(), 1);
  }

  #[tokio::test(start_paused = true)]
  async fn test_tab_switches_status_filter() {
    let service = Arc::new(FakeService::with_customers(10));
    let (mut v, mut rx) = view(&service);
    pump(&mut v, &mut rx).await;

    v.handle_key(key(KeyCode::Tab));
    pump(&mut v, &mut rx).await;

    assert_eq!(v.coordinator.inputs().status_label, "Pending Payments");
    assert_eq!(v.coordinator.rows().len(), 5);
    assert!(v
      .coordinator
      .rows()
      .iter()
      .all(|r| r.text("status") == "Pending"));
  }

  #[tokio::test(start_paused = true)]
  async fn test_quit_key() {
    let service = Arc::new(FakeService::with_customers(1));
    let (mut v, _rx) = view(&service);
    assert_eq!(press(&mut v, 'q'), ViewAction::Quit);
  }

  #[test]
  fn test_parse_date_range() {
    let values = vec![
      ("start", "2024-01-01".to_string()),
      ("end", String::new()),
    ];
    assert_eq!(
      parse_date_range(&values),
      Ok((NaiveDate::from_ymd_opt(2024, 1, 1), None))
    );

    let bad = vec![("start", "01/02/2024".to_string()), ("end", String::new())];
    assert!(parse_date_range(&bad).is_err());

    let reversed = vec![
      ("start", "2024-02-01".to_string()),
      ("end", "2024-01-01".to_string()),
    ];
    assert_eq!(
      parse_date_range(&reversed),
      Err("Start date is after end date".to_string())
    );
  }
}
