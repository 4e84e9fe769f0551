//! Configuration providers
//!
//! A [`Configuration`] wraps a mapping-shaped [`Value`] (or is left
//! uninitialized with a whole-tree fallback) and hands out
//! [`ConfigurationPath`] providers, one per key path. Paths resolve against
//! the live tree on every `get`, so a path created before the data is set,
//! or before the data changes, observes the latest value.
//!
//! # Example
//! ```
//! use lazydi::config::Configuration;
//! use lazydi::di::Provider;
//! use serde_json::json;
//!
//! let config = Configuration::new();
//! let size = config.child("pool").child("size");
//!
//! config.set(json!({"pool": {"size": 4}})).unwrap();
//! assert_eq!(size.get().unwrap(), json!(4));
//!
//! config.lookup("pool.timeout").unwrap().set(json!(30)).unwrap();
//! assert_eq!(config.get().unwrap(), json!({"pool": {"size": 4, "timeout": 30}}));
//! ```

pub mod loader;

use crate::core::{DiError, DiResult, KeyPath};
use crate::di::Provider;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, trace};

#[derive(Debug, Default)]
struct ConfigState {
    data: Option<Value>,
    fallback: Option<Value>,
}

/// Provider of a configuration tree.
///
/// Cloning yields another handle to the same tree.
#[derive(Clone, Default)]
pub struct Configuration {
    state: Arc<RwLock<ConfigState>>,
}

impl Configuration {
    /// Uninitialized configuration without fallback.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: Value) -> Self {
        Self::from_parts(Some(data), None)
    }

    /// Uninitialized configuration that resolves to `fallback` as a whole.
    pub fn with_fallback(fallback: Value) -> Self {
        Self::from_parts(None, Some(fallback))
    }

    pub fn from_parts(data: Option<Value>, fallback: Option<Value>) -> Self {
        Self {
            state: Arc::new(RwLock::new(ConfigState { data, fallback })),
        }
    }

    pub fn fallback(&self) -> Option<Value> {
        self.read().fallback.clone()
    }

    pub fn set_fallback(&self, fallback: Option<Value>) {
        self.write().fallback = fallback;
    }

    pub fn is_initialized(&self) -> bool {
        self.read().data.is_some()
    }

    /// Path provider for a top-level key.
    pub fn child(&self, key: impl Into<String>) -> ConfigurationPath {
        self.at(KeyPath::root(key))
    }

    /// Path provider for explicit segments; any string is a valid key.
    pub fn path<I, S>(&self, segments: I) -> DiResult<ConfigurationPath>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(self.at(KeyPath::new(segments)?))
    }

    /// Path provider for a dotted path such as `"server.port"`.
    pub fn lookup(&self, dotted: &str) -> DiResult<ConfigurationPath> {
        Ok(self.at(KeyPath::parse(dotted)?))
    }

    pub fn at(&self, path: KeyPath) -> ConfigurationPath {
        ConfigurationPath {
            config: self.clone(),
            path,
        }
    }

    /// Resolve the whole tree and deserialize it.
    pub fn get_as<T: DeserializeOwned>(&self) -> DiResult<T> {
        Ok(serde_json::from_value(self.get()?)?)
    }

    fn read(&self) -> RwLockReadGuard<'_, ConfigState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ConfigState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn resolve_path(&self, path: &KeyPath) -> DiResult<Value> {
        let state = self.read();
        let root = match (&state.data, &state.fallback) {
            (Some(data), _) => data,
            // The fallback stands for the whole tree, not for single keys.
            (None, Some(fallback)) => {
                trace!(path = %path, "configuration fallback short-circuit");
                return Ok(fallback.clone());
            }
            (None, None) => return Err(DiError::NotInitialized),
        };

        let mut cursor = root;
        for (depth, key) in path.segments().iter().enumerate() {
            let map = cursor
                .as_object()
                .ok_or_else(|| DiError::not_a_mapping(location(path, depth), cursor))?;
            cursor = map.get(key).ok_or_else(|| DiError::MissingKey {
                path: path.to_string(),
                key: key.clone(),
            })?;
        }
        Ok(cursor.clone())
    }

    fn write_path(&self, path: &KeyPath, value: Value) -> DiResult<()> {
        let mut state = self.write();
        let ConfigState { data, fallback } = &mut *state;
        let root = match (data.as_mut(), fallback.as_mut()) {
            (Some(data), _) => data,
            (None, Some(fallback)) => fallback,
            (None, None) => return Err(DiError::NotInitialized),
        };

        let mut cursor = root;
        for (depth, key) in path.parents().iter().enumerate() {
            let map = match cursor {
                Value::Object(map) => map,
                other => return Err(DiError::not_a_mapping(location(path, depth), other)),
            };
            if !map.contains_key(key) {
                debug!(path = %path, key = %key, "materializing configuration mapping");
            }
            cursor = map
                .entry(key.as_str())
                .or_insert_with(|| Value::Object(Map::new()));
        }

        match cursor {
            Value::Object(map) => {
                debug!(path = %path, "configuration value written");
                map.insert(path.last().to_string(), value);
                Ok(())
            }
            other => Err(DiError::not_a_mapping(
                location(path, path.len() - 1),
                other,
            )),
        }
    }
}

/// Dotted location of the cursor after `depth` segments.
fn location(path: &KeyPath, depth: usize) -> String {
    if depth == 0 {
        "<root>".to_string()
    } else {
        path.prefix(depth)
    }
}

impl Provider<Value> for Configuration {
    fn get(&self) -> DiResult<Value> {
        let state = self.read();
        match (&state.data, &state.fallback) {
            (Some(data), _) => Ok(data.clone()),
            (None, Some(fallback)) => Ok(fallback.clone()),
            (None, None) => Err(DiError::NotInitialized),
        }
    }

    fn set(&self, value: Value) -> DiResult<()> {
        debug!("configuration data set");
        self.write().data = Some(value);
        Ok(())
    }

    fn reset(&self) -> DiResult<()> {
        Err(DiError::UnsupportedOperation(
            "a configuration provider cannot be reset".to_string(),
        ))
    }

    /// `None` leaves the configuration untouched.
    fn assign(&self, value: Option<Value>) -> DiResult<()> {
        match value {
            Some(value) => self.set(value),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read();
        f.debug_struct("Configuration")
            .field("data", &state.data)
            .field("fallback", &state.fallback)
            .finish()
    }
}

/// Provider for one key path into a [`Configuration`].
///
/// Immutable: [`child`](Self::child) returns a new provider one segment
/// deeper. The configuration is shared, not owned.
#[derive(Clone)]
pub struct ConfigurationPath {
    config: Configuration,
    path: KeyPath,
}

impl ConfigurationPath {
    pub fn child(&self, key: impl Into<String>) -> ConfigurationPath {
        ConfigurationPath {
            config: self.config.clone(),
            path: self.path.child(key),
        }
    }

    pub fn path(&self) -> &KeyPath {
        &self.path
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Resolve and deserialize into `T`.
    pub fn get_as<T: DeserializeOwned>(&self) -> DiResult<T> {
        Ok(serde_json::from_value(self.get()?)?)
    }
}

impl Provider<Value> for ConfigurationPath {
    fn get(&self) -> DiResult<Value> {
        self.config.resolve_path(&self.path)
    }

    /// Write through to the live tree, creating missing intermediate
    /// mappings along the way.
    fn set(&self, value: Value) -> DiResult<()> {
        self.config.write_path(&self.path, value)
    }

    fn reset(&self) -> DiResult<()> {
        Err(DiError::UnsupportedOperation(format!(
            "configuration path '{}' cannot be reset",
            self.path
        )))
    }

    fn assign(&self, value: Option<Value>) -> DiResult<()> {
        match value {
            Some(value) => self.set(value),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for ConfigurationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.config.read();
        f.debug_struct("ConfigurationPath")
            .field("data", &state.data)
            .field("path", &self.path.segments())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_uninitialized_without_fallback_fails() {
        let config = Configuration::new();
        assert!(matches!(config.get(), Err(DiError::NotInitialized)));
        assert!(matches!(
            config.child("a").get(),
            Err(DiError::NotInitialized)
        ));
        assert!(!config.is_initialized());
    }

    #[test]
    fn test_nested_get() {
        let config = Configuration::with_data(json!({"a": {"b": 1}}));
        assert_eq!(config.child("a").child("b").get().unwrap(), json!(1));
        assert_eq!(config.child("a").get().unwrap(), json!({"b": 1}));
    }

    #[test]
    fn test_missing_key() {
        let config = Configuration::with_data(json!({"a": {"b": 1}}));
        match config.child("a").child("c").get() {
            Err(DiError::MissingKey { path, key }) => {
                assert_eq!(path, "a.c");
                assert_eq!(key, "c");
            }
            other => panic!("expected MissingKey, got {:?}", other),
        }
    }

    #[test]
    fn test_walk_into_scalar_is_type_mismatch() {
        let config = Configuration::with_data(json!({"a": 5}));
        match config.lookup("a.b").unwrap().get() {
            Err(DiError::TypeMismatch { path, found, .. }) => {
                assert_eq!(path, "a");
                assert_eq!(found, "number");
            }
            other => panic!("expected TypeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_path_sees_live_data() {
        let config = Configuration::with_data(json!({"a": 1}));
        let a = config.child("a");
        assert_eq!(a.get().unwrap(), json!(1));

        config.set(json!({"a": 2})).unwrap();
        assert_eq!(a.get().unwrap(), json!(2));
    }

    #[test]
    fn test_set_creates_missing_intermediates_only() {
        let config = Configuration::with_data(json!({"a": {}}));
        config.child("a").child("c").set(json!(5)).unwrap();
        assert_eq!(config.get().unwrap(), json!({"a": {"c": 5}}));

        config.lookup("x.y.z").unwrap().set(json!(true)).unwrap();
        assert_eq!(
            config.get().unwrap(),
            json!({"a": {"c": 5}, "x": {"y": {"z": true}}})
        );
    }

    #[test]
    fn test_set_keeps_existing_siblings() {
        let config = Configuration::with_data(json!({"a": {"keep": 1}}));
        config.lookup("a.add").unwrap().set(json!(2)).unwrap();
        assert_eq!(config.get().unwrap(), json!({"a": {"keep": 1, "add": 2}}));
    }

    #[test]
    fn test_set_through_scalar_fails() {
        let config = Configuration::with_data(json!({"a": 1}));
        let err = config.lookup("a.b.c").unwrap().set(json!(0)).unwrap_err();
        assert!(matches!(err, DiError::TypeMismatch { .. }));
        assert_eq!(config.get().unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_set_on_uninitialized_fails() {
        let config = Configuration::new();
        let err = config.child("a").set(json!(1)).unwrap_err();
        assert!(matches!(err, DiError::NotInitialized));
    }

    #[test]
    fn test_whole_tree_fallback() {
        let config = Configuration::with_fallback(json!("X"));
        assert_eq!(config.get().unwrap(), json!("X"));
        assert_eq!(config.child("anything").get().unwrap(), json!("X"));
        assert_eq!(
            config.lookup("deeply.nested.key").unwrap().get().unwrap(),
            json!("X")
        );
    }

    #[test]
    fn test_write_through_scalar_fallback_fails() {
        let config = Configuration::with_fallback(json!("X"));
        let err = config.child("anything").set(json!(1)).unwrap_err();
        assert!(matches!(err, DiError::TypeMismatch { .. }));
    }

    #[test]
    fn test_write_through_mapping_fallback_updates_fallback() {
        let config = Configuration::with_fallback(json!({"a": 1}));
        config.child("b").set(json!(2)).unwrap();

        assert!(!config.is_initialized());
        assert_eq!(config.fallback(), Some(json!({"a": 1, "b": 2})));
        // Still short-circuits to the whole fallback.
        assert_eq!(config.child("a").get().unwrap(), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_data_takes_precedence_over_fallback() {
        let config = Configuration::from_parts(Some(json!({"a": 1})), Some(json!("X")));
        assert_eq!(config.get().unwrap(), json!({"a": 1}));
        assert_eq!(config.child("a").get().unwrap(), json!(1));
    }

    #[test]
    fn test_assign_none_is_noop() {
        let config = Configuration::with_data(json!({"a": 1}));
        config.assign(None).unwrap();
        assert_eq!(config.get().unwrap(), json!({"a": 1}));

        config.child("a").assign(None).unwrap();
        assert_eq!(config.get().unwrap(), json!({"a": 1}));

        let empty = Configuration::new();
        empty.assign(None).unwrap();
        assert!(!empty.is_initialized());

        empty.assign(Some(json!({}))).unwrap();
        assert!(empty.is_initialized());
    }

    #[test]
    fn test_null_is_a_real_value() {
        let config = Configuration::new();
        config.set(Value::Null).unwrap();
        assert!(config.is_initialized());
        assert_eq!(config.get().unwrap(), Value::Null);
    }

    #[test]
    fn test_reset_is_unsupported() {
        let config = Configuration::with_data(json!({"a": 1}));
        assert!(matches!(
            config.reset(),
            Err(DiError::UnsupportedOperation(_))
        ));
        assert!(matches!(
            config.child("a").reset(),
            Err(DiError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_keys_are_not_reserved() {
        let config = Configuration::with_data(json!({"_data": 1, "fallback": 2, "_path": 3}));
        assert_eq!(config.child("_data").get().unwrap(), json!(1));
        assert_eq!(config.child("fallback").get().unwrap(), json!(2));
        assert_eq!(config.path(["_path"]).unwrap().get().unwrap(), json!(3));
    }

    #[test]
    fn test_path_with_dotted_key() {
        let config = Configuration::with_data(json!({"hosts": {"example.com": 443}}));
        let port = config.path(["hosts", "example.com"]).unwrap();
        assert_eq!(port.get_as::<u16>().unwrap(), 443);
        assert!(config.path(Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_child_is_immutable() {
        let config = Configuration::with_data(json!({}));
        let a = config.child("a");
        let ab = a.child("b");
        assert_eq!(a.path().to_string(), "a");
        assert_eq!(ab.path().to_string(), "a.b");
    }

    #[test]
    fn test_clones_share_tree() {
        let config = Configuration::with_data(json!({}));
        let other = config.clone();
        other.child("k").set(json!("v")).unwrap();
        assert_eq!(config.child("k").get().unwrap(), json!("v"));
    }

    #[test]
    fn test_debug_output() {
        let config = Configuration::with_data(json!({"a": 1}));
        let rendered = format!("{:?}", config);
        assert!(rendered.starts_with("Configuration { data: Some("));
        assert!(rendered.ends_with("fallback: None }"));
        let rendered = format!("{:?}", config.lookup("a.b").unwrap());
        assert!(rendered.contains(r#"path: ["a", "b"]"#));
    }
}
