//! Coalescing of identical in-flight work.
//!
//! Callers that ask for the same key while a computation is still running
//! wait for that computation instead of starting their own. Nothing is kept
//! once the computation finishes; the next caller starts fresh.

use std::{collections::HashMap, future::Future, hash::Hash, sync::Arc};

use parking_lot::Mutex;
use tokio::sync::OnceCell;

pub struct Coalescer<K, V> {
  in_flight: Mutex<HashMap<K, Arc<OnceCell<V>>>>,
}

impl<K, V> Default for Coalescer<K, V> {
  fn default() -> Self {
    Self { in_flight: Mutex::new(HashMap::new()) }
  }
}

impl<K, V> Coalescer<K, V>
where
  K: Eq + Hash + Clone,
  V: Clone,
{
  /// Run `work` for `key`, or join an identical run already in progress.
  pub async fn run<F, Fut>(&self, key: K, work: F) -> V
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = V>,
  {
    let cell = self.in_flight.lock().entry(key.clone()).or_default().clone();
    let _release = Release { owner: self, key, cell: cell.clone() };

    cell.get_or_init(work).await.clone()
  }

  /// Number of keys with a computation currently running.
  pub fn in_flight(&self) -> usize { self.in_flight.lock().len() }
}

/// Drops the in-flight entry when a run finishes or is cancelled.
struct Release<'c, K: Eq + Hash, V> {
  owner: &'c Coalescer<K, V>,
  key:   K,
  cell:  Arc<OnceCell<V>>,
}

impl<K: Eq + Hash, V> Drop for Release<'_, K, V> {
  fn drop(&mut self) {
    let mut in_flight = self.owner.in_flight.lock();
    if in_flight.get(&self.key).is_some_and(|c| Arc::ptr_eq(c, &self.cell)) {
      in_flight.remove(&self.key);
    }
  }
}
