use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use leptos::prelude::{set_timeout_with_handle, TimeoutHandle};

/// Something that can run a callback later and forget about it on request.
pub trait Timer {
    type Handle;

    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> Option<Self::Handle>;
    fn cancel(&self, handle: Self::Handle);
}

/// `window.setTimeout` through leptos.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTimer;

impl Timer for BrowserTimer {
    type Handle = TimeoutHandle;

    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> Option<TimeoutHandle> {
        match set_timeout_with_handle(callback, delay) {
            Ok(handle) => Some(handle),
            Err(e) => {
                leptos::logging::error!("failed to schedule timeout: {:?}", e);
                None
            }
        }
    }

    fn cancel(&self, handle: TimeoutHandle) {
        handle.clear();
    }
}

/// Runs the most recently triggered callback once the triggers have been
/// quiet for `delay`. Each trigger cancels the pending one.
pub struct Debouncer<T: Timer> {
    timer: T,
    delay: Duration,
    pending: Rc<RefCell<Option<T::Handle>>>,
}

impl<T: Timer> Debouncer<T> {
    pub fn new(timer: T, delay: Duration) -> Self {
        Self {
            timer,
            delay,
            pending: Rc::new(RefCell::new(None)),
        }
    }

    pub fn trigger(&self, callback: impl FnOnce() + 'static)
    where
        T::Handle: 'static,
    {
        self.cancel();

        let pending = Rc::clone(&self.pending);
        let handle = self.timer.schedule(
            self.delay,
            Box::new(move || {
                pending.borrow_mut().take();
                callback();
            }),
        );
        *self.pending.borrow_mut() = handle;
    }

    pub fn cancel(&self) {
        if let Some(handle) = self.pending.borrow_mut().take() {
            self.timer.cancel(handle);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }
}

impl<T: Timer> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    type Scheduled = Vec<(usize, Duration, Option<Box<dyn FnOnce()>>)>;

    /// Timer whose callbacks only run when the test says so.
    #[derive(Clone, Default)]
    pub struct ManualTimer {
        scheduled: Rc<RefCell<Scheduled>>,
    }

    impl ManualTimer {
        pub fn live(&self) -> usize {
            self.scheduled
                .borrow()
                .iter()
                .filter(|(_, _, callback)| callback.is_some())
                .count()
        }

        pub fn last_delay(&self) -> Option<Duration> {
            self.scheduled.borrow().last().map(|(_, delay, _)| *delay)
        }

        /// Fires every callback that has not been cancelled.
        pub fn fire_all(&self) {
            let callbacks: Vec<Box<dyn FnOnce()>> = self
                .scheduled
                .borrow_mut()
                .iter_mut()
                .filter_map(|(_, _, callback)| callback.take())
                .collect();
            for callback in callbacks {
                callback();
            }
        }
    }

    impl Timer for ManualTimer {
        type Handle = usize;

        fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> Option<usize> {
            let mut scheduled = self.scheduled.borrow_mut();
            let id = scheduled.len();
            scheduled.push((id, delay, Some(callback)));
            Some(id)
        }

        fn cancel(&self, handle: usize) {
            if let Some(entry) = self.scheduled.borrow_mut().get_mut(handle) {
                entry.2 = None;
            }
        }
    }
}
