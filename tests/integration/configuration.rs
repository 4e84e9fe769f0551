use super::common::write_config;
use lazydi::config::{loader, Configuration};
use lazydi::core::DiError;
use lazydi::di::Provider;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize, PartialEq)]
struct Pool {
    size: u32,
    #[serde(default)]
    timeout_secs: Option<u64>,
}

#[test]
fn test_paths_created_before_data() {
    let config = Configuration::new();
    let size = config.lookup("db.pool.size").unwrap();
    assert!(matches!(size.get(), Err(DiError::NotInitialized)));

    config.set(json!({"db": {"pool": {"size": 4}}})).unwrap();
    assert_eq!(size.get().unwrap(), json!(4));
}

#[test]
fn test_typed_subtree() {
    let (_temp, file) = write_config(
        "db.yaml",
        "db:\n  pool:\n    size: 10\n    timeout_secs: 30\n",
    );
    let config = loader::load(&file).unwrap();

    let pool: Pool = config.lookup("db.pool").unwrap().get_as().unwrap();
    assert_eq!(
        pool,
        Pool {
            size: 10,
            timeout_secs: Some(30)
        }
    );
}

#[test]
fn test_lazy_materialization_only_for_missing_segments() {
    let config = Configuration::with_data(json!({"a": {}}));
    config.child("a").child("c").set(json!(5)).unwrap();
    assert_eq!(config.get().unwrap(), json!({"a": {"c": 5}}));
}

#[test]
fn test_fallback_whole_tree() {
    let config = Configuration::with_fallback(json!("X"));
    assert_eq!(config.get().unwrap(), json!("X"));
    assert_eq!(config.child("anything").get().unwrap(), json!("X"));
    assert!(matches!(
        config.child("anything").set(json!(1)),
        Err(DiError::TypeMismatch { .. })
    ));

    // Setting data ends the short-circuit.
    config.set(json!({"anything": 1})).unwrap();
    assert_eq!(config.child("anything").get().unwrap(), json!(1));
}

#[test]
fn test_save_round_trip_json() {
    let (temp, _) = write_config("unused.txt", "");
    let file = temp.path().join("out.json");

    let config = Configuration::with_data(json!({"k": [1, 2, 3]}));
    loader::save(&config, &file).unwrap();
    assert_eq!(loader::load(&file).unwrap().get().unwrap(), json!({"k": [1, 2, 3]}));
}
