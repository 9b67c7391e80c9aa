//! Debounce and throttle stages in front of the network.
//!
//! Each limiter owns its timer task. Nothing is shared between instances, so
//! two list views never delay or swallow each other's requests.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

type Emit<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Emits the latest value once input has been idle for `delay`.
pub struct Debouncer<T> {
  delay: Duration,
  emit: Emit<T>,
  pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
  pub fn new<F>(delay: Duration, emit: F) -> Self
  where
    F: Fn(T) + Send + Sync + 'static,
  {
    Self {
      delay,
      emit: Arc::new(emit),
      pending: None,
    }
  }

  /// Restart the timer with a new value.
  pub fn schedule(&mut self, value: T) {
    self.cancel();
    let delay = self.delay;
    let emit = Arc::clone(&self.emit);
    self.pending = Some(tokio::spawn(async move {
      tokio::time::sleep(delay).await;
      emit(value);
    }));
  }

  /// Drop the pending value, if any.
  pub fn cancel(&mut self) {
    if let Some(handle) = self.pending.take() {
      handle.abort();
    }
  }

  #[cfg(test)]
  pub fn is_pending(&self) -> bool {
    self.pending.as_ref().is_some_and(|h| !h.is_finished())
  }
}

impl<T> Drop for Debouncer<T> {
  fn drop(&mut self) {
    if let Some(handle) = self.pending.take() {
      handle.abort();
    }
  }
}

struct ThrottleState<T> {
  in_window: bool,
  trailing: Option<T>,
  timer: Option<JoinHandle<()>>,
}

/// Fires at most once per window.
///
/// The first call in an idle window fires immediately. Calls made while the
/// window is open collapse into one trailing call with the last value, fired
/// when the window closes. A window with no calls closes silently.
pub struct Throttle<T> {
  window: Duration,
  emit: Emit<T>,
  state: Arc<Mutex<ThrottleState<T>>>,
}

impl<T: Send + 'static> Throttle<T> {
  pub fn new<F>(window: Duration, emit: F) -> Self
  where
    F: Fn(T) + Send + Sync + 'static,
  {
    Self {
      window,
      emit: Arc::new(emit),
      state: Arc::new(Mutex::new(ThrottleState {
        in_window: false,
        trailing: None,
        timer: None,
      })),
    }
  }

  pub fn schedule(&self, value: T) {
    let Ok(mut state) = self.state.lock() else {
      return;
    };

    if state.in_window {
      state.trailing = Some(value);
      return;
    }

    state.in_window = true;
    let window = self.window;
    let emit = Arc::clone(&self.emit);
    let shared = Arc::clone(&self.state);
    state.timer = Some(tokio::spawn(async move {
      loop {
        tokio::time::sleep(window).await;
        let trailing = match shared.lock() {
          Ok(mut state) => {
            let trailing = state.trailing.take();
            if trailing.is_none() {
              state.in_window = false;
              state.timer = None;
            }
            trailing
          }
          Err(_) => None,
        };
        // A trailing call starts a fresh window
        match trailing {
          Some(value) => emit(value),
          None => break,
        }
      }
    }));
    drop(state);

    (self.emit)(value);
  }
}

impl<T> Throttle<T> {
  /// Drop the trailing value and close the window.
  pub fn cancel(&self) {
    if let Ok(mut state) = self.state.lock() {
      state.trailing = None;
      state.in_window = false;
      if let Some(handle) = state.timer.take() {
        handle.abort();
      }
    }
  }
}

impl<T> Drop for Throttle<T> {
  fn drop(&mut self) {
    self.cancel();
  }
}
