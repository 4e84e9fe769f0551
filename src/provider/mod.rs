//! Provider implementations
//!
//! - [`Static`]: a fixed value
//! - [`Callable`] / [`Factory`]: the result of a function, recomputed per `get`
//! - [`MemoizedCallable`] / [`SingletonFactory`]: the result of a function,
//!   computed once
//! - [`Custom`]: any [`Produce`] implementation with an override slot
//! - [`Erased`]: a typed provider seen as a provider of dynamic values

pub mod args;
pub mod callable;
pub mod static_value;

pub use args::{Arg, Arguments, Resolved};
pub use callable::{Callable, Factory, MemoizedCallable, SingletonFactory, UnboundCallable};
pub use static_value::Static;

use crate::core::DiResult;
use crate::di::{DynProvider, Produce, Provider};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Override state shared by every provider.
///
/// Holds `Some(value)` while an override is set. Presence is what counts,
/// so a falsy or `null` override still wins over the provider's own value.
pub struct Override<T> {
    slot: RwLock<Option<T>>,
}

impl<T> Override<T> {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    pub fn set(&self, value: T) {
        debug!(value_type = std::any::type_name::<T>(), "provider override set");
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(value);
    }

    pub fn reset(&self) {
        debug!(value_type = std::any::type_name::<T>(), "provider override reset");
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_set(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl<T: Clone> Override<T> {
    pub fn current(&self) -> Option<T> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Return the override if present, else run `produce`.
    ///
    /// The lock is released before `produce` runs so that nested providers
    /// may be resolved (or overridden) from inside it.
    pub fn resolve(&self, produce: impl FnOnce() -> DiResult<T>) -> DiResult<T> {
        match self.current() {
            Some(value) => Ok(value),
            None => produce(),
        }
    }
}

impl<T> Default for Override<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Override<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        match slot.as_ref() {
            Some(value) => f.debug_tuple("Override").field(value).finish(),
            None => f.write_str("Override(<unset>)"),
        }
    }
}

/// Provider built from any [`Produce`] implementation.
///
/// # Example
///
/// ```
/// use lazydi::core::DiResult;
/// use lazydi::di::{Produce, Provider};
/// use lazydi::provider::Custom;
///
/// struct Hostname;
///
/// impl Produce<String> for Hostname {
///     fn produce(&self) -> DiResult<String> {
///         Ok("localhost".to_string())
///     }
/// }
///
/// let host = Custom::new(Hostname);
/// assert_eq!(host.get().unwrap(), "localhost");
/// ```
pub struct Custom<T, P> {
    base: Override<T>,
    producer: P,
}

impl<T, P> Custom<T, P> {
    pub fn new(producer: P) -> Self {
        Self {
            base: Override::new(),
            producer,
        }
    }

    pub fn producer(&self) -> &P {
        &self.producer
    }
}

impl<T, P> Provider<T> for Custom<T, P>
where
    T: Clone + Send + Sync,
    P: Produce<T> + Send + Sync,
{
    fn get(&self) -> DiResult<T> {
        self.base.resolve(|| self.producer.produce())
    }

    fn set(&self, value: T) -> DiResult<()> {
        self.base.set(value);
        Ok(())
    }

    fn reset(&self) -> DiResult<()> {
        self.base.reset();
        Ok(())
    }
}

impl<T: fmt::Debug, P: fmt::Debug> fmt::Debug for Custom<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Custom")
            .field("override", &self.base)
            .field("producer", &self.producer)
            .finish()
    }
}

/// A typed provider seen as a provider of [`Value`]s.
///
/// Values cross the boundary through serde: `get` serializes, `set`
/// deserializes (failing on a shape mismatch) and `reset` is forwarded.
pub struct Erased<T> {
    inner: Arc<dyn Provider<T>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Erased<T> {
    pub fn new(inner: Arc<dyn Provider<T>>) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }
}

impl<T> Provider<Value> for Erased<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    fn get(&self) -> DiResult<Value> {
        Ok(serde_json::to_value(self.inner.get()?)?)
    }

    fn set(&self, value: Value) -> DiResult<()> {
        self.inner.set(serde_json::from_value(value)?)
    }

    fn reset(&self) -> DiResult<()> {
        self.inner.reset()
    }

    fn assign(&self, value: Option<Value>) -> DiResult<()> {
        match value {
            Some(value) => self.set(value),
            None => self.inner.assign(None),
        }
    }
}

/// Erase a typed provider into a [`DynProvider`].
pub fn erase<T, P>(provider: Arc<P>) -> DynProvider
where
    T: Serialize + DeserializeOwned + 'static,
    P: Provider<T> + 'static,
{
    let inner: Arc<dyn Provider<T>> = provider;
    Arc::new(Erased::new(inner))
}
