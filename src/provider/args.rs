//! Arguments captured by function-backed providers

use crate::core::{DiError, DiResult};
use crate::di::DynProvider;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;

/// A single argument: either a plain value or a provider resolved on use.
#[derive(Clone)]
pub enum Arg {
    Value(Value),
    Provider(DynProvider),
}

impl Arg {
    pub fn value(value: impl Into<Value>) -> Self {
        Arg::Value(value.into())
    }

    pub fn provider(provider: DynProvider) -> Self {
        Arg::Provider(provider)
    }

    pub fn is_provider(&self) -> bool {
        matches!(self, Arg::Provider(_))
    }

    /// True for an explicit `null` value (never for a provider).
    pub fn is_null(&self) -> bool {
        matches!(self, Arg::Value(Value::Null))
    }

    /// One `get` hop for providers; values pass through unchanged.
    pub fn resolve(&self) -> DiResult<Value> {
        match self {
            Arg::Value(value) => Ok(value.clone()),
            Arg::Provider(provider) => provider.get(),
        }
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

impl From<DynProvider> for Arg {
    fn from(provider: DynProvider) -> Self {
        Arg::Provider(provider)
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Arg::Provider(_) => f.write_str("Provider(..)"),
        }
    }
}

/// Positional and named arguments, as captured at construction time.
#[derive(Clone, Debug, Default)]
pub struct Arguments {
    positional: Vec<Arg>,
    named: Vec<(String, Arg)>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument.
    pub fn arg(mut self, arg: impl Into<Arg>) -> Self {
        self.positional.push(arg.into());
        self
    }

    /// Add a named argument, replacing an earlier one with the same name.
    pub fn named(mut self, name: impl Into<String>, arg: impl Into<Arg>) -> Self {
        let name = name.into();
        let arg = arg.into();
        match self.named.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = arg,
            None => self.named.push((name, arg)),
        }
        self
    }

    pub fn positional(&self) -> &[Arg] {
        &self.positional
    }

    pub fn named_args(&self) -> &[(String, Arg)] {
        &self.named
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }

    /// Resolve every argument, positional first, in declaration order.
    pub fn resolve(&self) -> DiResult<Resolved> {
        let positional = self
            .positional
            .iter()
            .map(Arg::resolve)
            .collect::<DiResult<Vec<_>>>()?;

        let mut named = Map::new();
        for (name, arg) in &self.named {
            named.insert(name.clone(), arg.resolve()?);
        }

        Ok(Resolved { positional, named })
    }
}

/// Fully resolved arguments handed to a provider's function.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Resolved {
    positional: Vec<Value>,
    named: Map<String, Value>,
}

impl Resolved {
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn named(&self) -> &Map<String, Value> {
        &self.named
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    pub fn get_named(&self, name: &str) -> Option<&Value> {
        self.named.get(name)
    }

    /// Deserialize the positional argument at `index`.
    pub fn positional_as<T: DeserializeOwned>(&self, index: usize) -> DiResult<T> {
        let value = self
            .get(index)
            .ok_or_else(|| DiError::MissingArgument(format!("positional argument {}", index)))?;
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Deserialize the named argument `name`.
    pub fn named_as<T: DeserializeOwned>(&self, name: &str) -> DiResult<T> {
        let value = self
            .get_named(name)
            .ok_or_else(|| DiError::MissingArgument(format!("'{}'", name)))?;
        Ok(serde_json::from_value(value.clone())?)
    }
}
