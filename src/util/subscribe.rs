use std::error::Error;
use std::sync::{Arc, Mutex};

pub type NextFn<T> = Arc<dyn Fn(&T) + Send + Sync + 'static>;
pub type ErrorFn = Arc<dyn Fn(&dyn Error) + Send + Sync + 'static>;

/// Callback bundle handed to `on_*` registration methods.
#[derive(Clone)]
pub struct PartialObserver<T> {
    pub next: Option<NextFn<T>>,
    pub error: Option<ErrorFn>,
}

impl<T> PartialObserver<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_next<F>(mut self, callback: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.next = Some(Arc::new(callback));
        self
    }

    pub fn with_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&dyn Error) + Send + Sync + 'static,
    {
        self.error = Some(Arc::new(callback));
        self
    }
}

impl<T> Default for PartialObserver<T> {
    fn default() -> Self {
        Self {
            next: None,
            error: None,
        }
    }
}

pub type Unsubscribe = Box<dyn FnOnce() + Send + 'static>;

/// Ordered set of observers with id-based removal.
pub struct ObserverList<T> {
    inner: Arc<Mutex<ObserverEntries<T>>>,
}

struct ObserverEntries<T> {
    next_id: usize,
    observers: Vec<(usize, PartialObserver<T>)>,
}

impl<T> Default for ObserverList<T> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ObserverEntries {
                next_id: 0,
                observers: Vec::new(),
            })),
        }
    }
}

impl<T: 'static> ObserverList<T> {
    /// Registers an observer; the returned closure removes it again.
    pub fn add(&self, observer: PartialObserver<T>) -> Unsubscribe {
        let id = {
            let mut entries = self.inner.lock().unwrap();
            let id = entries.next_id;
            entries.next_id += 1;
            entries.observers.push((id, observer));
            id
        };
        let inner = Arc::downgrade(&self.inner);
        Box::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner
                    .lock()
                    .unwrap()
                    .observers
                    .retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }

    /// Calls every `next` callback with `value`.
    ///
    /// Callbacks run outside the lock so they may register or remove observers.
    pub fn notify(&self, value: &T) {
        let callbacks: Vec<NextFn<T>> = self
            .inner
            .lock()
            .unwrap()
            .observers
            .iter()
            .filter_map(|(_, observer)| observer.next.clone())
            .collect();
        for callback in callbacks {
            callback(value);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
