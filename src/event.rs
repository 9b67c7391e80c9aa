use crate::sync::SyncEvent;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;

/// Application events
#[derive(Debug)]
pub enum Event {
  /// Terminal key press
  Key(KeyEvent),
  /// Periodic tick for UI refresh
  Tick,
  /// Timer or remote call finished in a sync task
  Sync(SyncEvent),
}

/// Event handler that merges terminal input, a tick timer and sync task
/// results into one stream
pub struct EventHandler {
  rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
  /// Create a new event handler with the given tick rate, forwarding
  /// everything coordinators send on `sync_rx`
  pub fn new(tick_rate: Duration, mut sync_rx: mpsc::UnboundedReceiver<SyncEvent>) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();

    // Terminal reader. crossterm's poll blocks, so keep it off the runtime workers.
    let input_tx = tx.clone();
    tokio::task::spawn_blocking(move || loop {
      if event::poll(tick_rate).unwrap_or(false) {
        if let Ok(CrosstermEvent::Key(key)) = event::read() {
          if key.kind == KeyEventKind::Press && input_tx.send(Event::Key(key)).is_err() {
            break;
          }
        }
      } else if input_tx.send(Event::Tick).is_err() {
        break;
      }
    });

    tokio::spawn(async move {
      while let Some(event) = sync_rx.recv().await {
        if tx.send(Event::Sync(event)).is_err() {
          break;
        }
      }
    });

    Self { rx }
  }

  /// Receive the next event
  pub async fn next(&mut self) -> Option<Event> {
    self.rx.recv().await
  }
}
