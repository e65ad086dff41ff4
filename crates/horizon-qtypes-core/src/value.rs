//! Single-slot values and update notification.
//!
//! A [`Value<T>`] is the storage cell behind every model. It is replaced
//! wholesale on each write and is never observed half-written: readers take a
//! shared lock, writers an exclusive one.
//!
//! A [`Notifier`] owns the "updated" signal of a model and implements the
//! scoped suppression used to coalesce several internal mutations into one
//! externally visible update.
//!
//! # Example
//!
//! ```
//! use horizon_qtypes_core::value::{Notifier, Value};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let value = Value::new(1.0_f64);
//! let notifier = Notifier::new();
//! let hits = Arc::new(AtomicUsize::new(0));
//!
//! let hits_clone = hits.clone();
//! notifier.updated().connect(move |_| {
//!     hits_clone.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! {
//!     let _lock = notifier.lock();
//!     value.write(2.0);
//!     notifier.notify();
//!     value.write(3.0);
//!     notifier.notify();
//! }
//!
//! assert_eq!(value.read(), 3.0);
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//! ```

use std::fmt;

use parking_lot::{Mutex, RwLock};

use crate::logging::targets;
use crate::signal::Signal;

/// A single-slot mutable container.
pub struct Value<T> {
    raw: RwLock<T>,
}

impl<T: Clone> Value<T> {
    /// Create a new value.
    pub fn new(raw: T) -> Self {
        Self {
            raw: RwLock::new(raw),
        }
    }

    /// Get a copy of the current value.
    pub fn read(&self) -> T {
        self.raw.read().clone()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.raw.read())
    }

    /// Replace the value.
    ///
    /// Equal values are written too; callers notify unconditionally.
    pub fn write(&self, raw: T) {
        *self.raw.write() = raw;
    }

    /// Replace the value, returning the previous one.
    pub fn replace(&self, raw: T) -> T {
        std::mem::replace(&mut *self.raw.write(), raw)
    }

    /// Modify the value in place under one exclusive lock.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        f(&mut self.raw.write());
    }

    /// Compute a replacement from the current value under one exclusive lock.
    ///
    /// Fails without touching the value if `f` returns an error.
    pub fn try_update<E, F>(&self, f: F) -> Result<(), E>
    where
        F: FnOnce(&T) -> Result<T, E>,
    {
        let mut guard = self.raw.write();
        let next = f(&guard)?;
        *guard = next;
        Ok(())
    }
}

impl<T: Clone + Default> Default for Value<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value").field("raw", &self.read()).finish()
    }
}

#[derive(Debug, Default)]
struct LockState {
    depth: usize,
    pending: bool,
}

/// Owner of an "updated" signal with scoped suppression.
///
/// [`notify`](Self::notify) emits immediately unless an [`UpdateLock`] is
/// alive, in which case the notification is recorded and a single "updated"
/// fires when the outermost lock is released.
#[derive(Default)]
pub struct Notifier {
    updated: Signal<()>,
    state: Mutex<LockState>,
}

impl Notifier {
    /// Create a notifier with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// The "updated" signal.
    pub fn updated(&self) -> &Signal<()> {
        &self.updated
    }

    /// Announce one logical write.
    pub fn notify(&self) {
        {
            let mut state = self.state.lock();
            if state.depth > 0 {
                state.pending = true;
                tracing::trace!(target: targets::VALUE, depth = state.depth, "update deferred");
                return;
            }
        }
        self.updated.emit(());
    }

    /// Suppress notifications until the returned guard is dropped.
    ///
    /// Locks nest; only the outermost release emits.
    pub fn lock(&self) -> UpdateLock<'_> {
        self.state.lock().depth += 1;
        UpdateLock { notifier: self }
    }

    /// Whether an [`UpdateLock`] is currently held.
    pub fn is_locked(&self) -> bool {
        self.state.lock().depth > 0
    }

    fn unlock(&self) {
        let fire = {
            let mut state = self.state.lock();
            state.depth = state.depth.saturating_sub(1);
            if state.depth == 0 && state.pending {
                state.pending = false;
                true
            } else {
                false
            }
        };
        // Slots are not run while a panic unwinds through the lock.
        if fire && !std::thread::panicking() {
            self.updated.emit(());
        }
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Notifier")
            .field("depth", &state.depth)
            .field("pending", &state.pending)
            .field("updated", &self.updated)
            .finish()
    }
}

/// RAII guard returned by [`Notifier::lock`].
///
/// The lock is released on every exit path, including early returns and
/// unwinding.
#[must_use = "notifications resume as soon as the lock is dropped"]
pub struct UpdateLock<'a> {
    notifier: &'a Notifier,
}

impl Drop for UpdateLock<'_> {
    fn drop(&mut self) {
        self.notifier.unlock();
    }
}

impl fmt::Debug for UpdateLock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateLock").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting(notifier: &Notifier) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        notifier.updated().connect(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        count
    }

    #[test]
    fn test_value_read_write() {
        let value = Value::new(10);
        assert_eq!(value.read(), 10);
        value.write(20);
        assert_eq!(value.read(), 20);
        assert_eq!(value.replace(30), 20);
        assert_eq!(value.with(|v| v * 2), 60);
        value.update(|v| *v += 1);
        assert_eq!(value.read(), 31);
    }

    #[test]
    fn test_try_update_is_all_or_nothing() {
        let value = Value::new((1.0, "mm".to_string()));

        let failed: Result<(), &str> = value.try_update(|_| Err("nope"));
        assert!(failed.is_err());
        assert_eq!(value.read(), (1.0, "mm".to_string()));

        let ok: Result<(), &str> = value.try_update(|(v, _)| Ok((v / 1000.0, "m".to_string())));
        assert!(ok.is_ok());
        assert_eq!(value.read(), (0.001, "m".to_string()));
    }

    #[test]
    fn test_notify_without_lock_emits_each_time() {
        let notifier = Notifier::new();
        let count = counting(&notifier);

        notifier.notify();
        notifier.notify();

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_lock_coalesces() {
        let notifier = Notifier::new();
        let count = counting(&notifier);

        {
            let _outer = notifier.lock();
            notifier.notify();
            {
                let _inner = notifier.lock();
                notifier.notify();
            }
            assert_eq!(count.load(Ordering::SeqCst), 0);
            assert!(notifier.is_locked());
        }

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!notifier.is_locked());
    }

    #[test]
    fn test_lock_without_writes_is_silent() {
        let notifier = Notifier::new();
        let count = counting(&notifier);

        drop(notifier.lock());

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_lock_released_on_panic() {
        let notifier = Notifier::new();
        let count = counting(&notifier);

        let result = catch_unwind(AssertUnwindSafe(|| {
            let _lock = notifier.lock();
            notifier.notify();
            panic!("conversion blew up");
        }));

        assert!(result.is_err());
        assert!(!notifier.is_locked());

        notifier.notify();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
