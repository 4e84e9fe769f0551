//! lazydi: lazily resolved values with call-time injection
//!
//! This crate provides overridable value providers, a configuration
//! provider exposing lazily resolved key paths into a mapping-shaped tree,
//! and a wrapper that injects provider values into omitted function
//! parameters. Core types are re-exported from `lazydi-core`.

pub use lazydi_core::{DiError, DiResult, KeyPath};

/// Core module re-exported from `lazydi-core`.
pub mod core {
    pub use lazydi_core::core::*;
}

/// Provider capability traits and the container marker.
pub mod di;

/// Provider implementations.
pub mod provider;

/// Configuration providers and file loading.
pub mod config;

/// Call-time injection.
pub mod inject;

pub use config::{Configuration, ConfigurationPath};
pub use di::{Container, DynProvider, Produce, Provider};
pub use inject::{inject, provide, provide_typed, CallArgs, Injected, Injector, Signature, NOT_PASSED};
pub use provider::{
    Arg, Arguments, Callable, Factory, MemoizedCallable, SingletonFactory, Static, UnboundCallable,
};
