//! Coalescing Layer
//!
//! Deduplicates concurrent loads of the same key. When many callers miss on
//! one key at once, a single "leader" runs the backing fetch while everyone
//! else waits on the call record and receives the same outcome, success or
//! error. Calls for distinct keys never serialize against each other.

use std::sync::{Arc, OnceLock};

use anyhow::Result;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::Notify;

/// One in-flight (or just-finished) load. The result is written exactly once,
/// then `done` wakes every waiter.
struct Call<T> {
    done: Notify,
    result: OnceLock<Result<T, String>>,
}

/// Leader-side RAII for one call. On the way out (normal completion or a
/// dropped future) it publishes the result, storing a cancellation error if
/// the work never finished, wakes every waiter, and only then unregisters
/// the record.
struct Completion<'a, T> {
    calls: &'a DashMap<String, Arc<Call<T>>>,
    key: &'a str,
    call: &'a Arc<Call<T>>,
}

impl<T> Drop for Completion<'_, T> {
    fn drop(&mut self) {
        if self.call.result.get().is_none() {
            let _ = self
                .call
                .result
                .set(Err(format!("load for {:?} was cancelled", self.key)));
        }
        self.call.done.notify_waiters();
        self.calls.remove(self.key);
    }
}

/// Per-key suppression of duplicate work.
///
/// The call table is only touched to join or register a record; the work
/// future itself always runs without any table lock held, so slow loads for
/// one key cannot stall loads for another.
pub struct FlightGroup<T> {
    calls: DashMap<String, Arc<Call<T>>>,
}

impl<T> Default for FlightGroup<T> {
    fn default() -> Self {
        Self {
            calls: DashMap::new(),
        }
    }
}

impl<T: Clone> FlightGroup<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `work` for `key` unless an identical call is already in flight,
    /// in which case the caller waits for that call's outcome instead.
    ///
    /// The record is removed only after its result is stored and signalled,
    /// so a caller arriving while a call finishes still joins it and observes
    /// the stored outcome rather than starting a duplicate load. Errors are
    /// shared with waiters by message; the leader keeps the original error.
    pub async fn call_once<F, Fut>(&self, key: &str, work: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let call = match self.calls.entry(key.to_string()) {
            Entry::Occupied(existing) => {
                let call = existing.get().clone();
                drop(existing);
                return Self::wait(&call).await;
            }
            Entry::Vacant(slot) => {
                let call = Arc::new(Call {
                    done: Notify::new(),
                    result: OnceLock::new(),
                });
                slot.insert(call.clone());
                call
            }
        };

        // The guard signals and unregisters the record even if this future
        // is dropped mid-load, so a cancelled leader cannot strand waiters
        // on a record nobody will ever complete.
        let _completion = Completion {
            calls: &self.calls,
            key,
            call: &call,
        };

        let outcome = work().await;

        let shared = match &outcome {
            Ok(value) => Ok(value.clone()),
            Err(error) => Err(error.to_string()),
        };
        let _ = call.result.set(shared);

        outcome
    }

    /// Blocks a follower until the leader's result is available.
    async fn wait(call: &Call<T>) -> Result<T> {
        // Register for the wakeup before checking the result; otherwise the
        // leader could store and notify between our check and our await.
        let notified = call.done.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        if call.result.get().is_none() {
            notified.await;
        }

        match call
            .result
            .get()
            .expect("single-flight call signalled without a result")
        {
            Ok(value) => Ok(value.clone()),
            Err(message) => Err(anyhow::anyhow!("{}", message)),
        }
    }
}
