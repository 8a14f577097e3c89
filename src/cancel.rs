//! Cooperative cancellation for fetches and the poller

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::sync::Notify;

struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
    children: Mutex<Vec<Weak<Inner>>>,
}

impl Inner {
    fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
            notify: Notify::new(),
            children: Mutex::new(Vec::new()),
        }
    }

    fn children(&self) -> MutexGuard<'_, Vec<Weak<Inner>>> {
        match self.children.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn cancel(&self) {
        if self.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }
        self.notify.notify_waiters();
        let children = std::mem::take(&mut *self.children());
        for child in children.iter().filter_map(Weak::upgrade) {
            child.cancel();
        }
    }
}

/// Cloneable cancellation handle
///
/// All clones share one flag. Cancelling is idempotent and wakes every task
/// parked in [`CancellationToken::cancelled`].
#[derive(Clone)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner::new()),
        }
    }

    /// Creates a token that is cancelled along with this one (but not vice versa)
    ///
    /// The parent only keeps a weak reference. Children that were dropped or
    /// cancelled on their own are pruned whenever a new child is registered.
    pub fn child_token(&self) -> Self {
        let child = Arc::new(Inner::new());
        {
            let mut children = self.inner.children();
            // Checked under the lock so a concurrent cancel() cannot miss the child
            if !self.inner.cancelled.load(Ordering::SeqCst) {
                children.retain(|weak| {
                    weak.upgrade().is_some_and(|c| !c.cancelled.load(Ordering::SeqCst))
                });
                children.push(Arc::downgrade(&child));
            } else {
                child.cancelled.store(true, Ordering::SeqCst);
            }
        }
        Self { inner: child }
    }

    pub fn cancel(&self) {
        self.inner.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once the token is cancelled
    pub async fn cancelled(&self) {
        // Register interest before checking the flag so a concurrent
        // cancel() between the check and the await is not lost.
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
