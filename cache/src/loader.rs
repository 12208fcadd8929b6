use crate::error::CacheError;

use std::sync::Arc;
use std::thread::{self, Thread};

use parking_lot::Mutex;

/// The boxed error type a loader reports on failure.
pub type LoaderError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A caller-supplied function that computes the value for a missing key.
///
/// Loaders run outside the cache's instance lock; they may be slow or do
/// I/O without blocking unrelated cache operations.
pub(crate) type Loader<K, V> = Arc<dyn Fn(&K) -> Result<V, LoaderError> + Send + Sync>;

/// The state of a value being computed in the background.
enum State<V> {
  Computing,
  Complete(Result<Arc<V>, CacheError>),
}

struct Inner<V> {
  state: State<V>,
  waiters: Vec<Thread>,
}

/// A one-shot completion cell for a background load.
///
/// Threads wanting the outcome park until `complete` wakes them. One cell
/// exists per in-flight key, so a second miss on the same key attaches here
/// instead of spawning a duplicate load.
pub(crate) struct LoadFuture<V> {
  inner: Mutex<Inner<V>>,
}

impl<V> LoadFuture<V> {
  /// Creates a new `LoadFuture` in the computing state.
  pub(crate) fn new() -> Self {
    Self {
      inner: Mutex::new(Inner {
        state: State::Computing,
        waiters: Vec::new(),
      }),
    }
  }

  /// Completes the load with its outcome, waking all waiters.
  pub(crate) fn complete(&self, result: Result<Arc<V>, CacheError>) {
    let mut inner = self.inner.lock();
    inner.state = State::Complete(result);
    for waiter in inner.waiters.drain(..) {
      waiter.unpark();
    }
  }

  /// Blocks the calling thread until the load completes, then returns its
  /// outcome.
  pub(crate) fn wait(&self) -> Result<Arc<V>, CacheError> {
    loop {
      {
        let mut inner = self.inner.lock();
        match &inner.state {
          State::Complete(result) => return result.clone(),
          State::Computing => inner.waiters.push(thread::current()),
        }
      }
      // Parking can wake spuriously; the loop re-checks the state.
      thread::park();
    }
  }
}
