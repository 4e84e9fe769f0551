//! Container marker for grouping providers

/// Marker for types that group providers as fields.
///
/// A container carries no behaviour of its own; it exists so that a set of
/// related providers can be named, passed around and overridden together.
///
/// # Example
///
/// ```
/// use lazydi::config::Configuration;
/// use lazydi::di::{Container, Provider};
/// use lazydi::provider::{Callable, Static};
/// use serde_json::json;
///
/// struct AppContainer {
///     config: Configuration,
///     greeting: Static<String>,
///     port: Callable<u16>,
/// }
///
/// impl Container for AppContainer {}
///
/// let config = Configuration::with_data(json!({"server": {"port": 8080}}));
/// let port_path = config.lookup("server.port").unwrap();
/// let app = AppContainer {
///     config: config.clone(),
///     greeting: Static::new("hello".to_string()),
///     port: Callable::from_fn(move || port_path.get_as::<u16>()),
/// };
///
/// assert_eq!(app.port.get().unwrap(), 8080);
/// app.config.lookup("server.port").unwrap().set(json!(9090)).unwrap();
/// assert_eq!(app.port.get().unwrap(), 9090);
/// assert_eq!(app.greeting.get().unwrap(), "hello");
/// ```
pub trait Container {}
