mod common;

use std::panic::{catch_unwind, AssertUnwindSafe};

use mixin_composer::{
    CapabilitySet, Composable, CompositionBuilder, CompositionError, MixinInstance, Proxy, Target,
};

use common::{
    init_tracing, Counter, Echo, Fragile, Glass, ParseError, Parser, Relay, StubA, StubB,
    StubParser, TaggedA, Ticker, A, AB, B,
};

/// Untyped composition of two disjoint capabilities answers both.
#[test]
fn test_disjoint_mixins_dynamic() {
    init_tracing();
    let composition = CompositionBuilder::new().mixin(StubA).mixin(StubB).build().unwrap();

    assert_eq!(composition.invoke::<(), String>("a", ()).unwrap(), "a");
    assert_eq!(composition.invoke::<(), String>("b", ()).unwrap(), "b");
    assert!(composition.implements("A"));
    assert!(composition.implements("B"));
    assert_eq!(composition.provider_of("a"), Some("StubA"));
    assert_eq!(composition.provider_of("b"), Some("StubB"));
}

/// Typed target extending both capabilities is usable as the trait itself.
#[test]
fn test_typed_target_proxy() {
    let proxy = CompositionBuilder::new()
        .mixins((StubA, StubB))
        .build_as::<dyn AB>()
        .unwrap();

    assert_eq!(proxy.a(), "a");
    assert_eq!(proxy.b(), "b");

    fn both(ab: &dyn AB) -> String {
        format!("{}{}", ab.a(), ab.b())
    }
    assert_eq!(both(&proxy), "ab");

    let boxed: Box<dyn AB> = Box::new(proxy);
    assert_eq!(boxed.b(), "b");
}

/// Explicit capability-set target, dispatched dynamically.
#[test]
fn test_explicit_capability_target() {
    let composition = CompositionBuilder::targeting(CapabilitySet::of::<dyn AB>())
        .mixins((StubA, StubB))
        .build()
        .unwrap();

    assert!(composition.implements("AB"));
    assert!(composition.implements("A"));
    assert_eq!(composition.invoke::<(), String>("a", ()).unwrap(), "a");
    assert_eq!(composition.capability_of("b"), Some("B"));
}

#[test]
fn test_empty_composition() {
    let err = CompositionBuilder::new().build().unwrap_err();
    assert_eq!(err, CompositionError::Empty);

    let err = CompositionBuilder::new().build_as::<dyn A>().unwrap_err();
    assert_eq!(err, CompositionError::Empty);
}

/// A concrete target is reported even before any mixin is added.
#[test]
fn test_concrete_target_without_mixins() {
    let err = CompositionBuilder::targeting(Target::concrete::<String>())
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        CompositionError::InvalidTarget(std::any::type_name::<String>().to_string())
    );

    let err = CompositionBuilder::targeting(MixinInstance::new(StubA).ty())
        .build()
        .unwrap_err();
    assert_eq!(err, CompositionError::InvalidTarget("StubA".to_string()));
}

#[test]
fn test_concrete_target_rejected() {
    let err = CompositionBuilder::targeting(Target::concrete::<StubA>())
        .mixin(StubA)
        .build()
        .unwrap_err();
    match err {
        CompositionError::InvalidTarget(name) => assert!(name.ends_with("StubA"), "{name}"),
        other => panic!("unexpected error: {other}"),
    }

    let stub = MixinInstance::new(StubB);
    let err = CompositionBuilder::targeting(stub.ty())
        .mixin(StubB)
        .build()
        .unwrap_err();
    assert_eq!(err, CompositionError::InvalidTarget("StubB".to_string()));
    assert!(err.to_string().contains("StubB"));
}

/// Every method of every contributed capability is answered by its owner.
#[test]
fn test_any_non_empty_list_builds() {
    let mut builder = CompositionBuilder::new();
    builder
        .mixins((StubA, StubParser, Counter::default()))
        .mixins(vec![TaggedA("x"), TaggedA("y")]);

    let composition = builder.build().unwrap();

    assert_eq!(composition.invoke::<(), String>("a", ()).unwrap(), "a");
    assert_eq!(
        composition
            .invoke::<(String,), Result<u32, ParseError>>("parse", ("42".to_string(),))
            .unwrap(),
        Ok(42)
    );
    assert_eq!(composition.invoke::<(), u32>("tick", ()).unwrap(), 1);
    assert_eq!(
        composition
            .invoke::<(u32, String), String>("add", (4, "hits".to_string()))
            .unwrap(),
        "hits=5"
    );
    assert_eq!(composition.signatures().count(), 4);
    let ids: Vec<&str> = composition.ids().collect();
    assert_eq!(ids, vec!["StubA", "StubParser", "Counter", "TaggedA", "TaggedA#2"]);
}

#[test]
fn test_missing_implementation() {
    let err = CompositionBuilder::new()
        .mixin(StubA)
        .build_as::<dyn AB>()
        .unwrap_err();

    match err {
        CompositionError::MissingImplementation { capability, signature } => {
            assert_eq!(capability, "B");
            assert!(signature.starts_with("b()"), "{signature}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unknown_method_and_wrong_signature() {
    let composition = CompositionBuilder::new().mixin(StubA).build().unwrap();

    let err = composition.invoke::<(), String>("b", ()).unwrap_err();
    assert_eq!(err, CompositionError::FuncNotFound("b".to_string()));

    let err = composition.invoke::<(u8,), String>("a", (1,)).unwrap_err();
    match err {
        CompositionError::SignatureMismatch { method, available, .. } => {
            assert_eq!(method, "a");
            assert_eq!(available.len(), 1);
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// Same call twice, same answer; two builds route identically.
#[test]
fn test_idempotence() {
    let mut builder = CompositionBuilder::new();
    builder.mixin(StubA).mixin(StubParser);

    let first = builder.build().unwrap();
    let second = builder.build().unwrap();

    for composition in [&first, &second] {
        let once = composition.invoke::<(), String>("a", ()).unwrap();
        let twice = composition.invoke::<(), String>("a", ()).unwrap();
        assert_eq!(once, twice);
        assert_eq!(composition.provider_of("parse"), Some("StubParser"));
    }

    // Later additions never reach proxies already built.
    builder.mixin(StubB);
    assert!(!first.implements("B"));
    assert!(builder.build().unwrap().implements("B"));
}

/// Delegate errors come back exactly as the delegate produced them.
#[test]
fn test_failure_propagation() {
    let proxy = CompositionBuilder::new()
        .mixin(StubParser)
        .build_as::<dyn Parser>()
        .unwrap();

    assert_eq!(proxy.parse("7".to_string()), Ok(7));
    assert_eq!(
        proxy.parse("seven".to_string()),
        Err(ParseError("seven".to_string()))
    );
    assert_eq!(
        proxy.parse("seven".to_string()),
        StubParser.parse("seven".to_string())
    );

    let dynamic = proxy
        .invoke::<(String,), Result<u32, ParseError>>("parse", ("-1".to_string(),))
        .unwrap();
    assert_eq!(dynamic, Err(ParseError("-1".to_string())));
}

#[test]
fn test_panic_propagation() {
    let proxy = CompositionBuilder::new()
        .mixin(Glass)
        .build_as::<dyn Fragile>()
        .unwrap();

    let payload = catch_unwind(AssertUnwindSafe(|| proxy.snap())).unwrap_err();
    assert_eq!(payload.downcast_ref::<&str>(), Some(&"shattered"));
}

#[test]
fn test_resolved_method_handle() {
    let composition = CompositionBuilder::new()
        .mixin(Counter::default())
        .build()
        .unwrap();

    let tick = composition.resolve::<(), u32>("tick").unwrap();
    assert_eq!(tick.call(()).unwrap(), 1);
    assert_eq!(tick.clone().call(()).unwrap(), 2);
    assert_eq!(tick.signature().name(), "tick");
}

#[test]
fn test_typed_proxy_multiple_arguments() {
    let proxy = CompositionBuilder::new()
        .mixin(Counter::default())
        .build_as::<dyn Ticker>()
        .unwrap();

    assert_eq!(proxy.tick(), 1);
    assert_eq!(proxy.add(10, "total".to_string()), "total=11");
    assert_eq!(Proxy::composition(&proxy).provider_of("add"), Some("Counter"));
}

/// Capability methods may share names with the proxy's own helpers.
#[test]
fn test_proxy_helper_names_free_for_capabilities() {
    let proxy = CompositionBuilder::new()
        .mixin(Echo)
        .build_as::<dyn Relay>()
        .unwrap();

    assert_eq!(proxy.forward("hi".to_string()), "echo:hi");
    assert_eq!(proxy.composition(), "echo");
    assert_eq!(Proxy::composition(&proxy).provider_of("forward"), Some("Echo"));
    assert!(Proxy::into_composition(proxy).implements("Relay"));
}
