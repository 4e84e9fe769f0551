//! Trait definitions for lazily resolved providers

use crate::core::{DiError, DiResult};
use serde_json::Value;
use std::sync::Arc;

/// A lazily resolved, overridable source of a single value.
///
/// `get` returns the override when one is set and otherwise runs the
/// provider's own computation. Implementations must be thread-safe
/// (Send + Sync) but make no ordering promises across providers.
pub trait Provider<T>: Send + Sync {
    /// Resolve the current value.
    fn get(&self) -> DiResult<T>;

    /// Override the value; subsequent `get` calls return it.
    fn set(&self, value: T) -> DiResult<()>;

    /// Remove the override and restore the provider's own value.
    fn reset(&self) -> DiResult<()>;

    /// Store an optional value, `None` meaning "no value".
    ///
    /// For ordinary providers storing no value clears the override.
    /// Configuration providers treat `None` as a no-op instead.
    fn assign(&self, value: Option<T>) -> DiResult<()> {
        match value {
            Some(value) => self.set(value),
            None => self.reset(),
        }
    }
}

/// Provider of dynamic values, the currency of injection and configuration.
pub type DynProvider = Arc<dyn Provider<Value>>;

/// A provider's own value computation.
///
/// The default implementation fails with [`DiError::NotImplemented`]; a type
/// that is meant to produce values must override it.
pub trait Produce<T> {
    fn produce(&self) -> DiResult<T> {
        Err(DiError::NotImplemented(format!(
            "{} does not produce a value",
            std::any::type_name::<Self>()
        )))
    }
}
