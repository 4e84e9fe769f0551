//! Function-backed providers

use super::args::{Arguments, Resolved};
use super::Override;
use crate::core::{DiError, DiResult};
use crate::di::{Produce, Provider};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, ThreadId};
use tracing::{debug, trace};

type CallFn<T> = Arc<dyn Fn(&Resolved) -> DiResult<T> + Send + Sync>;
type MethodFn<R, T> = Arc<dyn Fn(&R, &Resolved) -> DiResult<T> + Send + Sync>;

/// A function together with the arguments it will be called with.
struct Invocation<T> {
    func: CallFn<T>,
    args: Arguments,
}

impl<T> Invocation<T> {
    fn invoke(&self) -> DiResult<T> {
        let resolved = self.args.resolve()?;
        trace!(
            positional = resolved.positional().len(),
            named = resolved.named().len(),
            "invoking provider function"
        );
        (self.func)(&resolved)
    }
}

/// Provider returning the result of a function.
///
/// Arguments that are providers are resolved again on every `get`, and the
/// function runs again on every `get`.
///
/// # Example
///
/// ```
/// use lazydi::di::Provider;
/// use lazydi::provider::{erase, Arguments, Callable, Static};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let base = Arc::new(Static::new(2i64));
/// let doubled = Callable::new(
///     |args| Ok(args.positional_as::<i64>(0)? * 2),
///     Arguments::new().arg(erase(Arc::clone(&base))),
/// );
///
/// assert_eq!(doubled.get().unwrap(), 4);
/// base.set(5).unwrap();
/// assert_eq!(doubled.get().unwrap(), 10);
/// ```
pub struct Callable<T> {
    base: Override<T>,
    call: Invocation<T>,
}

/// Alias kept for callers that think in factories.
pub type Factory<T> = Callable<T>;

impl<T> Callable<T> {
    pub fn new<F>(func: F, args: Arguments) -> Self
    where
        F: Fn(&Resolved) -> DiResult<T> + Send + Sync + 'static,
    {
        Self {
            base: Override::new(),
            call: Invocation {
                func: Arc::new(func),
                args,
            },
        }
    }

    /// Provider for a function that takes no arguments.
    pub fn from_fn<F>(func: F) -> Self
    where
        F: Fn() -> DiResult<T> + Send + Sync + 'static,
    {
        Self::new(move |_| func(), Arguments::new())
    }

    pub fn arguments(&self) -> &Arguments {
        &self.call.args
    }
}

impl<T> Produce<T> for Callable<T> {
    fn produce(&self) -> DiResult<T> {
        self.call.invoke()
    }
}

impl<T> Provider<T> for Callable<T>
where
    T: Clone + Send + Sync,
{
    fn get(&self) -> DiResult<T> {
        self.base.resolve(|| self.produce())
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

impl<T: fmt::Debug> fmt::Debug for Callable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("args", &self.call.args)
            .field("override", &self.base)
            .finish()
    }
}

/// Provider returning the result of a function, computed at most once.
///
/// The first successful computation is cached for the life of the provider.
/// Later changes to argument providers are not observed. `reset` only clears
/// the override; the cache is dropped solely through [`invalidate`].
///
/// A function that resolves its own provider while computing fails with
/// [`DiError::Recursion`].
///
/// [`invalidate`]: MemoizedCallable::invalidate
pub struct MemoizedCallable<T> {
    base: Override<T>,
    call: Invocation<T>,
    cache: Mutex<Option<T>>,
    /// Thread currently running the function, if any.
    computing: Mutex<Option<ThreadId>>,
}

/// Alias kept for callers that think in singletons.
pub type SingletonFactory<T> = MemoizedCallable<T>;

impl<T> MemoizedCallable<T> {
    pub fn new<F>(func: F, args: Arguments) -> Self
    where
        F: Fn(&Resolved) -> DiResult<T> + Send + Sync + 'static,
    {
        Self {
            base: Override::new(),
            call: Invocation {
                func: Arc::new(func),
                args,
            },
            cache: Mutex::new(None),
            computing: Mutex::new(None),
        }
    }

    pub fn from_fn<F>(func: F) -> Self
    where
        F: Fn() -> DiResult<T> + Send + Sync + 'static,
    {
        Self::new(move |_| func(), Arguments::new())
    }

    pub fn arguments(&self) -> &Arguments {
        &self.call.args
    }

    pub fn is_cached(&self) -> bool {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Drop the cached result so the next `get` without an override
    /// recomputes it.
    pub fn invalidate(&self) {
        debug!("memoized provider cache invalidated");
        *self.cache.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl<T> MemoizedCallable<T> {
    fn is_computing_on(&self, thread: ThreadId) -> bool {
        *self.computing.lock().unwrap_or_else(PoisonError::into_inner) == Some(thread)
    }
}

/// Marks a thread as computing for as long as it lives.
struct ComputingGuard<'a> {
    slot: &'a Mutex<Option<ThreadId>>,
}

impl<'a> ComputingGuard<'a> {
    fn enter(slot: &'a Mutex<Option<ThreadId>>, thread: ThreadId) -> Self {
        *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(thread);
        Self { slot }
    }
}

impl Drop for ComputingGuard<'_> {
    fn drop(&mut self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl<T: Clone> Produce<T> for MemoizedCallable<T> {
    fn produce(&self) -> DiResult<T> {
        let current = thread::current().id();
        // The cache lock is not re-entrant; a nested get on this thread
        // would wait on itself.
        if self.is_computing_on(current) {
            return Err(DiError::Recursion(format!(
                "memoized provider of {} resolved itself while computing",
                std::any::type_name::<T>()
            )));
        }

        // Held across the call so concurrent first `get`s compute once.
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = cache.as_ref() {
            return Ok(value.clone());
        }

        debug!("computing memoized provider value");
        let _computing = ComputingGuard::enter(&self.computing, current);
        let value = self.call.invoke()?;
        *cache = Some(value.clone());
        Ok(value)
    }
}

impl<T> Provider<T> for MemoizedCallable<T>
where
    T: Clone + Send + Sync,
{
    fn get(&self) -> DiResult<T> {
        self.base.resolve(|| self.produce())
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

impl<T: fmt::Debug> fmt::Debug for MemoizedCallable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("MemoizedCallable")
            .field("args", &self.call.args)
            .field("override", &self.base)
            .field("cache", &*cache)
            .finish()
    }
}

/// A method-like function that still needs its receiver.
///
/// Binding is an explicit step: [`bind_to`](Self::bind_to) produces an
/// independent provider for one receiver. Binding does not touch any result
/// cache; every bound provider starts empty.
///
/// The bound provider calls the function with the fixed [`Arguments`] given
/// here. For a method whose own parameters have provider defaults, use
/// [`Injector::wrap_method`](crate::inject::Injector::wrap_method) and turn
/// the result into a provider with `to_provider`.
///
/// # Example
///
/// ```
/// use lazydi::di::Provider;
/// use lazydi::provider::{Arguments, UnboundCallable};
/// use std::sync::Arc;
///
/// struct Database {
///     url: String,
/// }
///
/// let dsn = UnboundCallable::new(
///     |db: &Database, _| Ok(format!("{}?pool=4", db.url)),
///     Arguments::new(),
/// );
///
/// let primary = dsn.bind_to(Arc::new(Database { url: "pg://primary".into() }));
/// assert_eq!(primary.get().unwrap(), "pg://primary?pool=4");
/// ```
pub struct UnboundCallable<R, T> {
    func: MethodFn<R, T>,
    args: Arguments,
}

impl<R, T> UnboundCallable<R, T>
where
    R: Send + Sync + 'static,
    T: 'static,
{
    pub fn new<F>(func: F, args: Arguments) -> Self
    where
        F: Fn(&R, &Resolved) -> DiResult<T> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            args,
        }
    }

    /// Bind to `receiver`, producing an unmemoized provider.
    pub fn bind_to(&self, receiver: Arc<R>) -> Callable<T> {
        let func = Arc::clone(&self.func);
        Callable::new(move |args| func(&receiver, args), self.args.clone())
    }

    /// Bind to `receiver`, producing a memoized provider.
    pub fn bind_to_memoized(&self, receiver: Arc<R>) -> MemoizedCallable<T> {
        let func = Arc::clone(&self.func);
        MemoizedCallable::new(move |args| func(&receiver, args), self.args.clone())
    }
}

impl<R, T> Clone for UnboundCallable<R, T> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
            args: self.args.clone(),
        }
    }
}
