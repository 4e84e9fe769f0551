//! Provider capability traits and the container marker
//!
//! Every provider in this crate implements [`Provider`]: `get`, `set` and
//! `reset` over a single lazily resolved value.
//!
//! # Example
//! ```
//! use lazydi::di::Provider;
//! use lazydi::provider::Static;
//!
//! let port = Static::new(8080u16);
//! port.set(9090).unwrap();
//! assert_eq!(port.get().unwrap(), 9090);
//! port.reset().unwrap();
//! assert_eq!(port.get().unwrap(), 8080);
//! ```

pub mod container;
pub mod mocks;
pub mod traits;

// Re-export key types
pub use container::Container;
pub use traits::{DynProvider, Produce, Provider};
