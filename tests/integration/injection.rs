use lazydi::config::Configuration;
use lazydi::di::mocks::CallCounter;
use lazydi::di::Provider;
use lazydi::inject::{
    inject, provide, provide_typed, CallArgs, InjectedArgs, Injector, Signature, NOT_PASSED,
};
use lazydi::DiResult;
use lazydi::provider::{MemoizedCallable, Static};
use serde_json::{json, Value};
use std::sync::Arc;

/// `connect(host, port=<config server.port>, *, retries=<static 3>)`
fn connect(config: &Configuration, retries: Arc<Static<u8>>) -> lazydi::Injected<String> {
    inject(
        Signature::new()
            .positional("host")
            .optional("port", provide(Arc::new(config.lookup("server.port").unwrap())))
            .keyword_only_with_default("retries", provide_typed(retries)),
        |args| {
            Ok(format!(
                "{}:{} (retries={})",
                args.value::<String>("host")?,
                args.value::<u16>("port")?,
                args.value::<u8>("retries")?
            ))
        },
    )
    .unwrap()
}

#[test]
fn test_injection_from_configuration_and_static() {
    let config = Configuration::with_data(json!({"server": {"port": 8080}}));
    let retries = Arc::new(Static::new(3u8));
    let f = connect(&config, Arc::clone(&retries));

    assert_eq!(
        f.call(CallArgs::new().arg(json!("db"))).unwrap(),
        "db:8080 (retries=3)"
    );

    config.lookup("server.port").unwrap().set(json!(9000)).unwrap();
    retries.set(5).unwrap();
    assert_eq!(
        f.call(CallArgs::new().arg(json!("db"))).unwrap(),
        "db:9000 (retries=5)"
    );

    assert_eq!(
        f.call(
            CallArgs::new()
                .arg(json!("db"))
                .arg_opt(NOT_PASSED)
                .kwarg("retries", json!(0))
        )
        .unwrap(),
        "db:9000 (retries=0)"
    );
}

#[test]
fn test_respect_none_policies() {
    let fallback = Arc::new(Static::new(json!("default")));
    let sig = Signature::new().optional("v", provide(fallback));
    let body = |args: &InjectedArgs| -> DiResult<Option<Value>> { Ok(args.get("v").cloned()) };

    let strict = Injector::new().wrap(sig.clone(), body).unwrap();
    let lenient = Injector::new().respect_none(true).wrap(sig, body).unwrap();

    let null_call = || CallArgs::new().arg(Value::Null);
    assert_eq!(strict.call(null_call()).unwrap(), Some(Value::Null));
    assert_eq!(lenient.call(null_call()).unwrap(), Some(json!("default")));
}

#[test]
fn test_singleton_dependency_built_once() {
    let counter = CallCounter::new();
    let tick = counter.clone();
    let client = Arc::new(MemoizedCallable::from_fn(move || {
        Ok(format!("client#{}", tick.hit()))
    }));

    let handler = inject(
        Signature::new()
            .positional("request")
            .keyword_only_with_default("client", provide_typed(client)),
        |args| {
            Ok(format!(
                "{} via {}",
                args.value::<String>("request")?,
                args.value::<String>("client")?
            ))
        },
    )
    .unwrap();

    for request in ["a", "b", "c"] {
        let out = handler.call(CallArgs::new().arg(json!(request))).unwrap();
        assert_eq!(out, format!("{} via client#1", request));
    }
    assert_eq!(counter.count(), 1);
}
