pub mod error;
pub mod path;

pub use error::{value_kind, DiError, DiResult};
pub use path::KeyPath;
