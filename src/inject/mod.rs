//! Call-time injection of provider values
//!
//! A parameter whose declared default is a provider (see [`provide`]) gets
//! that provider's value whenever the caller leaves the parameter out.
//! Values the caller passes explicitly always win.
//!
//! # Example
//! ```
//! use lazydi::inject::{inject, provide, CallArgs, Signature};
//! use lazydi::provider::Static;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let answer = Arc::new(Static::new(json!(42)));
//! let add = inject(
//!     Signature::new().positional("x").optional("y", provide(answer)),
//!     |args| Ok(args.value::<i64>("x")? + args.value::<i64>("y")?),
//! )
//! .unwrap();
//!
//! assert_eq!(add.call(CallArgs::new().arg(json!(1))).unwrap(), 43);
//! assert_eq!(add.call(CallArgs::new().arg(json!(1)).arg(json!(7))).unwrap(), 8);
//! ```

pub mod binding;
pub mod signature;

pub use binding::InjectedArgs;
pub use signature::{ParamKind, Parameter, Signature};

use crate::core::DiResult;
use crate::di::Provider;
use crate::provider::{erase, Arg, Arguments, Callable};
use binding::BoundArguments;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// The absent-argument marker: a parameter passed as `NOT_PASSED` is
/// treated as if the caller had left it out.
pub const NOT_PASSED: Option<Arg> = None;

/// Mark a provider as the value to inject for a parameter.
///
/// Returns the provider itself, wrapped as an [`Arg`]; no work happens
/// until the wrapped function is called.
pub fn provide<P>(provider: Arc<P>) -> Arg
where
    P: Provider<Value> + 'static,
{
    Arg::Provider(provider)
}

/// [`provide`] for a typed provider, erased through serde.
pub fn provide_typed<T, P>(provider: Arc<P>) -> Arg
where
    T: Serialize + DeserializeOwned + 'static,
    P: Provider<T> + 'static,
{
    Arg::Provider(erase(provider))
}

/// Raw arguments of one call, some possibly [`NOT_PASSED`].
#[derive(Clone, Debug, Default)]
pub struct CallArgs {
    positional: Vec<Option<Arg>>,
    named: Vec<(String, Option<Arg>)>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(self, arg: impl Into<Arg>) -> Self {
        self.arg_opt(Some(arg.into()))
    }

    pub fn arg_opt(mut self, arg: Option<Arg>) -> Self {
        self.positional.push(arg);
        self
    }

    /// Positional placeholder that will be dropped before binding.
    pub fn not_passed(self) -> Self {
        self.arg_opt(NOT_PASSED)
    }

    pub fn kwarg(self, name: impl Into<String>, arg: impl Into<Arg>) -> Self {
        self.kwarg_opt(name, Some(arg.into()))
    }

    /// Named argument; a later one with the same name replaces it.
    pub fn kwarg_opt(mut self, name: impl Into<String>, arg: Option<Arg>) -> Self {
        let name = name.into();
        match self.named.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = arg,
            None => self.named.push((name, arg)),
        }
        self
    }

    /// Drop placeholders. `NOT_PASSED` always goes; with `respect_none`
    /// explicit nulls go too. Later positionals shift left.
    fn into_filtered(self, respect_none: bool) -> (Vec<Arg>, Vec<(String, Arg)>) {
        let keep = |arg: &Arg| !(respect_none && arg.is_null());

        let positional = self.positional.into_iter().flatten().filter(keep).collect();
        let named = self
            .named
            .into_iter()
            .filter_map(|(name, arg)| arg.filter(keep).map(|arg| (name, arg)))
            .collect();
        (positional, named)
    }
}

type InjectedFn<R> = Arc<dyn Fn(&InjectedArgs) -> DiResult<R> + Send + Sync>;

/// Wrapping policy.
///
/// # Example
/// ```
/// use lazydi::inject::{CallArgs, Injector, Signature, provide};
/// use lazydi::provider::Static;
/// use serde_json::{json, Value};
/// use std::sync::Arc;
///
/// let name = Arc::new(Static::new(json!("world")));
/// let greet = Injector::new()
///     .respect_none(true)
///     .wrap(Signature::new().optional("name", provide(name)), |args| {
///         Ok(format!("hello {}", args.value::<String>("name")?))
///     })
///     .unwrap();
///
/// // An explicit null counts as "not passed" under respect_none.
/// assert_eq!(greet.call(CallArgs::new().arg(Value::Null)).unwrap(), "hello world");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Injector {
    respect_none: bool,
}

impl Injector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat explicit `null` arguments as not passed.
    pub fn respect_none(mut self, respect_none: bool) -> Self {
        self.respect_none = respect_none;
        self
    }

    /// Wrap `func` so that provider defaults are injected at call time.
    ///
    /// Fails with `InvalidArgument` when `signature` could not belong to a
    /// real function.
    pub fn wrap<R, F>(&self, signature: Signature, func: F) -> DiResult<Injected<R>>
    where
        F: Fn(&InjectedArgs) -> DiResult<R> + Send + Sync + 'static,
    {
        signature.validate()?;
        debug!(
            parameters = signature.parameters().len(),
            respect_none = self.respect_none,
            "function wrapped for injection"
        );
        Ok(Injected {
            signature: Arc::new(signature),
            func: Arc::new(func),
            respect_none: self.respect_none,
        })
    }

    /// Wrap a method: `receiver` is bound now, and the remaining
    /// parameters are bound and injected on every call.
    ///
    /// [`Injected::to_provider`] turns the result into a provider.
    pub fn wrap_method<S, R, F>(
        &self,
        receiver: Arc<S>,
        signature: Signature,
        method: F,
    ) -> DiResult<Injected<R>>
    where
        S: Send + Sync + 'static,
        F: Fn(&S, &InjectedArgs) -> DiResult<R> + Send + Sync + 'static,
    {
        self.wrap(signature, move |args| method(&receiver, args))
    }
}

/// Wrap `func` with the default policy.
pub fn inject<R, F>(signature: Signature, func: F) -> DiResult<Injected<R>>
where
    F: Fn(&InjectedArgs) -> DiResult<R> + Send + Sync + 'static,
{
    Injector::new().wrap(signature, func)
}

/// A function wrapped for injection.
pub struct Injected<R> {
    signature: Arc<Signature>,
    func: InjectedFn<R>,
    respect_none: bool,
}

impl<R> Injected<R> {
    /// Bind, apply defaults, resolve providers, then call.
    ///
    /// Errors from the wrapped function are returned unchanged.
    pub fn call(&self, args: CallArgs) -> DiResult<R> {
        let (positional, named) = args.into_filtered(self.respect_none);
        let mut bound = BoundArguments::bind_partial(&self.signature, positional, named)?;
        bound.apply_defaults(&self.signature);
        let injected = bound.resolve(&self.signature)?;
        (self.func)(&injected)
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn respects_none(&self) -> bool {
        self.respect_none
    }
}

impl<R: 'static> Injected<R> {
    /// Provider that calls this function with `args` on every `get`.
    pub fn to_provider(&self, args: CallArgs) -> Callable<R> {
        let injected = self.clone();
        Callable::new(move |_| injected.call(args.clone()), Arguments::new())
    }
}

impl<R> Clone for Injected<R> {
    fn clone(&self) -> Self {
        Self {
            signature: Arc::clone(&self.signature),
            func: Arc::clone(&self.func),
            respect_none: self.respect_none,
        }
    }
}

impl<R> fmt::Debug for Injected<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injected")
            .field("signature", &self.signature)
            .field("respect_none", &self.respect_none)
            .finish()
    }
}
