//! Runtime circular dependency detection.

use keyed_di::{DiError, ServiceCollection, ServiceProvider};

fn register_chain(services: &mut ServiceCollection, edges: &[(&str, &str)]) {
    for (from, to) in edges {
        let to = to.to_string();
        services
            .add_singleton_factory::<String, _, _>(*from, [to.clone()], move |_| {
                Ok(format!("built past {to}"))
            })
            .unwrap();
    }
}

fn root_circular_error(err: DiError) -> DiError {
    // Unwrap the per-level resolution frames down to the root cause.
    match err {
        DiError::ResolutionFailed { source, .. } => root_circular_error(*source),
        other => other,
    }
}

#[test]
fn direct_cycle_is_detected() {
    let mut services = ServiceCollection::new();
    register_chain(&mut services, &[("A", "B"), ("B", "A")]);
    let provider = services.build().unwrap();

    let err = root_circular_error(provider.get::<String>("A").unwrap_err());
    assert!(matches!(
        err,
        DiError::Circular(ref path) if path == &["A", "B", "A"]
    ));
}

#[test]
fn self_cycle_is_detected() {
    let mut services = ServiceCollection::new();
    register_chain(&mut services, &[("X", "X")]);
    let provider = services.build().unwrap();

    let err = root_circular_error(provider.get::<String>("X").unwrap_err());
    assert!(matches!(
        err,
        DiError::Circular(ref path) if path == &["X", "X"]
    ));
}

#[test]
fn longer_cycle_reports_the_full_path() {
    let mut services = ServiceCollection::new();
    register_chain(&mut services, &[("A", "B"), ("B", "C"), ("C", "A")]);
    let provider = services.build().unwrap();

    let err = root_circular_error(provider.get::<String>("A").unwrap_err());
    assert!(matches!(
        err,
        DiError::Circular(ref path) if path == &["A", "B", "C", "A"]
    ));
}

#[test]
fn cycle_entered_mid_chain_reports_only_the_cycle() {
    // Entry -> A -> B -> A: the reported path starts at A, not Entry.
    let mut services = ServiceCollection::new();
    register_chain(&mut services, &[("Entry", "A"), ("A", "B"), ("B", "A")]);
    let provider = services.build().unwrap();

    let err = root_circular_error(provider.get::<String>("Entry").unwrap_err());
    assert!(matches!(
        err,
        DiError::Circular(ref path) if path == &["A", "B", "A"]
    ));
}

#[test]
fn cycle_error_message_shows_ascii_arrows() {
    let mut services = ServiceCollection::new();
    register_chain(&mut services, &[("A", "B"), ("B", "A")]);
    let provider = services.build().unwrap();

    let msg = provider.get::<String>("A").unwrap_err().to_string();
    assert!(msg.contains("Circular dependency: A -> B -> A"));
}

#[test]
fn failed_resolution_unwinds_the_guard() {
    let mut services = ServiceCollection::new();
    register_chain(&mut services, &[("A", "B"), ("B", "A")]);
    let provider = services.build().unwrap();

    assert!(provider.get::<String>("A").is_err());
    // The stack must be clean; an unrelated resolution still works.
    let mut more = ServiceCollection::new();
    more.add_singleton("A", "fresh".to_string()).unwrap();
    let other = more.build().unwrap();
    assert_eq!(*other.get::<String>("A").unwrap(), "fresh");
}

#[test]
fn diamond_dependencies_are_not_a_cycle() {
    let mut services = ServiceCollection::new();
    services.add_singleton("Leaf", 1usize).unwrap();
    services
        .add_singleton_factory::<usize, _, _>("Left", ["Leaf"], |_| Ok(2))
        .unwrap();
    services
        .add_singleton_factory::<usize, _, _>("Right", ["Leaf"], |_| Ok(3))
        .unwrap();
    services
        .add_singleton_factory::<usize, _, _>("Top", ["Left", "Right"], |_| Ok(4))
        .unwrap();
    let provider = services.build().unwrap();

    assert_eq!(*provider.get::<usize>("Top").unwrap(), 4);
}

#[test]
fn resolver_factory_cycles_are_caught_too() {
    #[derive(Debug)]
    struct Left;
    #[derive(Debug)]
    struct Right;

    let mut services = ServiceCollection::new();
    services
        .add_singleton_with("Left", |locator: &ServiceProvider| {
            locator.get::<Right>("Right")?;
            Ok(Left)
        })
        .unwrap();
    services
        .add_singleton_with("Right", |locator: &ServiceProvider| {
            locator.get::<Left>("Left")?;
            Ok(Right)
        })
        .unwrap();
    let provider = services.build().unwrap();

    let msg = provider.get::<Left>("Left").unwrap_err().to_string();
    assert!(msg.contains("Circular dependency"));
}
