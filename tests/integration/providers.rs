use lazydi::di::mocks::CallCounter;
use lazydi::di::{Container, Provider};
use lazydi::provider::{erase, Arguments, Callable, MemoizedCallable, Static};
use serde_json::json;
use std::sync::Arc;
use std::thread;

#[test]
fn test_override_always_wins() {
    let counter = CallCounter::new();
    let tick = counter.clone();
    let providers: Vec<Box<dyn Provider<i64>>> = vec![
        Box::new(Static::new(1)),
        Box::new(Callable::from_fn(move || {
            tick.hit();
            Ok(2)
        })),
        Box::new(MemoizedCallable::from_fn(|| Ok(3))),
    ];

    for (expected, provider) in (1..).zip(&providers) {
        assert_eq!(provider.get().unwrap(), expected);
        provider.set(-7).unwrap();
        assert_eq!(provider.get().unwrap(), -7);
        provider.reset().unwrap();
        assert_eq!(provider.get().unwrap(), expected);
    }

    // Only the two gets without an override reached the function.
    assert_eq!(counter.count(), 2);
}

#[test]
fn test_memoized_counts_once_across_overrides() {
    let counter = CallCounter::new();
    let tick = counter.clone();
    let input = Arc::new(Static::new(json!("a")));
    let memo = MemoizedCallable::new(
        move |args| {
            tick.hit();
            args.positional_as::<String>(0)
        },
        Arguments::new().arg(erase(Arc::clone(&input))),
    );

    assert_eq!(memo.get().unwrap(), "a");
    input.set(json!("b")).unwrap();
    assert_eq!(memo.get().unwrap(), "a");
    input.reset().unwrap();
    assert_eq!(memo.get().unwrap(), "a");
    assert_eq!(counter.count(), 1);
}

#[test]
fn test_memoized_shared_across_threads() {
    let counter = CallCounter::new();
    let tick = counter.clone();
    let memo = Arc::new(MemoizedCallable::from_fn(move || Ok(tick.hit())));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let memo = Arc::clone(&memo);
            thread::spawn(move || memo.get().unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 1);
    }
    assert_eq!(counter.count(), 1);
}

struct Services {
    base_url: Arc<Static<String>>,
    endpoint: Callable<String>,
}

impl Container for Services {}

impl Services {
    fn new() -> Self {
        let base_url = Arc::new(Static::new("http://localhost".to_string()));
        let endpoint = Callable::new(
            |args| Ok(format!("{}/api", args.positional_as::<String>(0)?)),
            Arguments::new().arg(erase(Arc::clone(&base_url))),
        );
        Self { base_url, endpoint }
    }
}

#[test]
fn test_container_groups_providers() {
    let services = Services::new();
    assert_eq!(services.endpoint.get().unwrap(), "http://localhost/api");

    services.base_url.set("https://staging".to_string()).unwrap();
    assert_eq!(services.endpoint.get().unwrap(), "https://staging/api");

    services.endpoint.set("mock://api".to_string()).unwrap();
    assert_eq!(services.endpoint.get().unwrap(), "mock://api");

    services.endpoint.reset().unwrap();
    services.base_url.reset().unwrap();
    assert_eq!(services.endpoint.get().unwrap(), "http://localhost/api");
}
