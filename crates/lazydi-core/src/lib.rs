//! Core types shared by the `lazydi` crates: the error taxonomy and the
//! configuration key path.

pub mod core;

pub use crate::core::{DiError, DiResult, KeyPath};
