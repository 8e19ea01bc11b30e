use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Cooperative cancellation signal for one request.
///
/// Cancelling is advisory: transports may register an abort hook with
/// [`CancelHandle::on_cancel`], but whether a completion is still wanted is
/// decided by [`CancellationSlot::is_live`].
#[derive(Clone)]
pub struct CancelHandle {
    id: u64,
    inner: Rc<CancelInner>,
}

#[derive(Default)]
struct CancelInner {
    cancelled: Cell<bool>,
    hooks: RefCell<Vec<Box<dyn FnOnce()>>>,
}

impl CancelHandle {
    fn new(id: u64) -> Self {
        Self {
            id,
            inner: Rc::new(CancelInner::default()),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.get()
    }

    /// Signal cancellation once; later calls do nothing
    pub fn cancel(&self) {
        if self.inner.cancelled.replace(true) {
            return;
        }
        let hooks = std::mem::take(&mut *self.inner.hooks.borrow_mut());
        for hook in hooks {
            hook();
        }
    }

    /// Run `hook` on cancellation (immediately if already cancelled)
    pub fn on_cancel(&self, hook: impl FnOnce() + 'static) {
        if self.is_cancelled() {
            hook();
        } else {
            self.inner.hooks.borrow_mut().push(Box::new(hook));
        }
    }
}

impl PartialEq for CancelHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for CancelHandle {}

impl fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelHandle")
            .field("id", &self.id)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Holds at most one live handle for a single-flight request path
#[derive(Debug, Default)]
pub struct CancellationSlot {
    live: Option<CancelHandle>,
    next_id: u64,
}

impl CancellationSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the live handle (if any), then store and return a fresh one
    pub fn acquire(&mut self) -> CancelHandle {
        if let Some(previous) = self.live.take() {
            previous.cancel();
        }
        self.next_id += 1;
        let handle = CancelHandle::new(self.next_id);
        self.live = Some(handle.clone());
        handle
    }

    /// Clear the slot only if `handle` is still the live one
    pub fn release(&mut self, handle: &CancelHandle) -> bool {
        if self.is_live(handle) {
            self.live = None;
            true
        } else {
            false
        }
    }

    pub fn is_live(&self, handle: &CancelHandle) -> bool {
        self.live.as_ref() == Some(handle)
    }

    pub fn has_live(&self) -> bool {
        self.live.is_some()
    }

    /// Cancel and forget the live handle
    pub fn cancel(&mut self) {
        if let Some(live) = self.live.take() {
            live.cancel();
        }
    }
}
