use crate::cache::{NoopStorage, OfflineStore, SqliteStorage};
use crate::collection::Collection;
use crate::commands::CommandAction;
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::remote::{GraphqlClient, RemoteDataService};
use crate::sync::SyncEvent;
use crate::ui;
use crate::ui::components::{CommandEvent, CommandInput, KeyResult};
use crate::ui::renderfns::extract_domain;
use crate::ui::view::{View, ViewAction};
use crate::ui::views::CollectionView;
use color_eyre::{eyre::eyre, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::collections::HashMap;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Main application state
pub struct App {
  config: Config,

  remote: Arc<dyn RemoteDataService>,

  store: Arc<dyn OfflineStore>,

  /// One view per opened collection. Switching back keeps its page, filters
  /// and cache.
  views: HashMap<Collection, CollectionView>,

  active: Collection,

  /// `:` prompt
  command: CommandInput,

  /// Shown in the status bar until the next key press
  status_message: Option<String>,

  /// Handed to every coordinator; drained by the event handler
  sync_tx: mpsc::UnboundedSender<SyncEvent>,
  sync_rx: Option<mpsc::UnboundedReceiver<SyncEvent>>,

  should_quit: bool,
}

impl App {
  pub fn new(config: Config, initial: Collection) -> Result<Self> {
    let remote: Arc<dyn RemoteDataService> = Arc::new(GraphqlClient::new(&config.service)?);
    let store = open_store(&config);
    let (sync_tx, sync_rx) = mpsc::unbounded_channel();

    Ok(Self {
      config,
      remote,
      store,
      views: HashMap::new(),
      active: initial,
      command: CommandInput::new(),
      status_message: None,
      sync_tx,
      sync_rx: Some(sync_rx),
      should_quit: false,
    })
  }

  pub async fn run(&mut self) -> Result<()> {
    let sync_rx = self
      .sync_rx
      .take()
      .ok_or_else(|| eyre!("App is already running"))?;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    let mut events = EventHandler::new(Duration::from_millis(250), sync_rx);
    info!(collection = self.active.name(), "starting");

    let result = self.main_loop(&mut terminal, &mut events).await;

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn main_loop<B: Backend>(
    &mut self,
    terminal: &mut Terminal<B>,
    events: &mut EventHandler,
  ) -> Result<()> {
    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      if let Some(event) = events.next().await {
        self.handle_event(event);
      }
    }
    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => {} // Redraw happens on every loop
      Event::Sync(sync_event) => self.route_sync(sync_event),
    }
  }

  /// Deliver a sync event to the view of its collection
  fn route_sync(&mut self, event: SyncEvent) {
    let collection = event.collection();
    match self.views.get_mut(&collection) {
      Some(view) => view.handle_sync(event),
      None => debug!(collection = collection.name(), "no view for sync event"),
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    self.status_message = None;

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    // The prompt only opens on ':' while the view is not taking text
    if self.command.is_active() || !self.active_view_mut().is_capturing_input() {
      match self.command.handle_key(key) {
        KeyResult::Event(CommandEvent::Run(action)) => {
          self.run_command(action);
          return;
        }
        KeyResult::Event(CommandEvent::Unknown(name)) => {
          self.status_message = Some(format!("Unknown command: {}", name));
          return;
        }
        KeyResult::Event(CommandEvent::Cancelled) | KeyResult::Handled => return,
        KeyResult::NotHandled => {}
      }
    }

    if self.active_view_mut().handle_key(key) == ViewAction::Quit {
      self.should_quit = true;
    }
  }

  fn run_command(&mut self, action: CommandAction) {
    match action {
      CommandAction::Open(collection) => {
        debug!(collection = collection.name(), "switching collection");
        self.active = collection;
        self.active_view_mut();
      }
      CommandAction::Quit => self.should_quit = true,
    }
  }

  /// View of the active collection, created and started on first use
  pub fn active_view_mut(&mut self) -> &mut CollectionView {
    let active = self.active;
    let sync = &self.config.sync;
    let remote = &self.remote;
    let store = &self.store;
    let sync_tx = &self.sync_tx;
    self.views.entry(active).or_insert_with(|| {
      let mut view = CollectionView::new(active, sync, remote.clone(), store.clone(), sync_tx.clone());
      view.start();
      view
    })
  }

  // Accessors for UI rendering

  /// Header title: configured title or the service host
  pub fn title(&self) -> String {
    match &self.config.title {
      Some(title) => title.clone(),
      None => format!("stockroom @ {}", extract_domain(&self.config.service.url)),
    }
  }

  pub fn command_input(&self) -> &CommandInput {
    &self.command
  }

  pub fn status_message(&self) -> Option<&str> {
    self.status_message.as_deref()
  }
}

/// SQLite store when offline fallback is on. A store that cannot be opened
/// downgrades to no fallback rather than blocking startup.
fn open_store(config: &Config) -> Arc<dyn OfflineStore> {
  if !config.sync.offline {
    return Arc::new(NoopStorage);
  }
  match SqliteStorage::open() {
    Ok(store) => Arc::new(store),
    Err(e) => {
      warn!(error = %e, "offline store unavailable, continuing without fallback");
      Arc::new(NoopStorage)
    }
  }
}
