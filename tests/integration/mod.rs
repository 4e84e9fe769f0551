//! Integration tests module
//!
//! End-to-end tests for the library surface and the `lazydi` CLI.

pub mod cli;
pub mod common;
pub mod configuration;
pub mod injection;
pub mod providers;
