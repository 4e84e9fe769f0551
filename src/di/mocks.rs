//! Test doubles for providers and wrapped functions

use super::traits::Produce;
use crate::core::DiResult;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared invocation counter.
///
/// # Example
///
/// ```
/// use lazydi::di::mocks::CallCounter;
/// use lazydi::di::Provider;
/// use lazydi::provider::Callable;
///
/// let counter = CallCounter::new();
/// let tick = counter.clone();
/// let provider = Callable::from_fn(move || Ok(tick.hit()));
///
/// provider.get().unwrap();
/// provider.get().unwrap();
/// assert_eq!(counter.count(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CallCounter {
    hits: Arc<AtomicUsize>,
}

impl CallCounter {
    /// Create a new counter at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one call, returning the new total
    pub fn hit(&self) -> usize {
        self.hits.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Number of recorded calls
    pub fn count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Producer that never overrides [`Produce::produce`].
#[derive(Clone, Copy, Debug, Default)]
pub struct MockAbstractProducer;

impl<T> Produce<T> for MockAbstractProducer {}

/// Producer returning a fixed value and counting calls.
#[derive(Clone, Debug)]
pub struct MockProducer<T> {
    pub value: T,
    pub counter: CallCounter,
}

impl<T> MockProducer<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            counter: CallCounter::new(),
        }
    }
}

impl<T: Clone> Produce<T> for MockProducer<T> {
    fn produce(&self) -> DiResult<T> {
        self.counter.hit();
        Ok(self.value.clone())
    }
}
