//! Core registration and resolution behavior.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use keyed_di::{dep, key_for, DiError, Registration, ServiceCollection, ServiceProvider, Lifetime};

#[derive(Debug)]
struct Config {
    url: String,
}

#[derive(Debug)]
struct Database {
    config: Arc<Config>,
}

struct Repository {
    db: Arc<Database>,
    label: Arc<String>,
}

#[test]
fn resolves_singleton_instance() {
    let mut services = ServiceCollection::new();
    services
        .add_singleton(
            "Config",
            Config {
                url: "postgres://localhost".to_string(),
            },
        )
        .unwrap();
    let provider = services.build().unwrap();

    let config = provider.get::<Config>("Config").unwrap();
    assert_eq!(config.url, "postgres://localhost");
}

#[test]
fn singleton_factory_runs_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = calls.clone();

    let mut services = ServiceCollection::new();
    services
        .add_singleton_factory::<u64, [&str; 0], _>("Clock", [], move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            Ok(1700000000)
        })
        .unwrap();
    let provider = services.build().unwrap();

    let a = provider.get::<u64>("Clock").unwrap();
    let b = provider.get::<u64>("Clock").unwrap();

    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn transient_factory_runs_every_time() {
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = calls.clone();

    let mut services = ServiceCollection::new();
    services
        .add_transient_factory::<usize, [&str; 0], _>("Ticket", [], move |_| {
            Ok(calls_clone.fetch_add(1, Ordering::SeqCst))
        })
        .unwrap();
    let provider = services.build().unwrap();

    assert_eq!(*provider.get::<usize>("Ticket").unwrap(), 0);
    assert_eq!(*provider.get::<usize>("Ticket").unwrap(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn dependencies_arrive_in_declaration_order() {
    let mut services = ServiceCollection::new();
    services
        .add_singleton(
            "Config",
            Config {
                url: "postgres://prod".to_string(),
            },
        )
        .unwrap()
        .add_singleton("Label", "orders".to_string())
        .unwrap()
        .add_singleton_factory("Database", ["Config"], |args| {
            Ok(Database {
                config: dep::<Config>(args, 0)?,
            })
        })
        .unwrap()
        .add_singleton_factory("Repository", ["Database", "Label"], |args| {
            Ok(Repository {
                db: dep::<Database>(args, 0)?,
                label: dep::<String>(args, 1)?,
            })
        })
        .unwrap();
    let provider = services.build().unwrap();

    let repo = provider.get::<Repository>("Repository").unwrap();
    assert_eq!(repo.db.config.url, "postgres://prod");
    assert_eq!(*repo.label, "orders");
}

#[test]
fn shared_dependency_is_resolved_as_the_same_instance() {
    let mut services = ServiceCollection::new();
    services
        .add_singleton(
            "Config",
            Config {
                url: "x".to_string(),
            },
        )
        .unwrap()
        .add_singleton_factory("DbA", ["Config"], |args| {
            Ok(Database {
                config: dep::<Config>(args, 0)?,
            })
        })
        .unwrap()
        .add_singleton_factory("DbB", ["Config"], |args| {
            Ok(Database {
                config: dep::<Config>(args, 0)?,
            })
        })
        .unwrap();
    let provider = services.build().unwrap();

    let a = provider.get::<Database>("DbA").unwrap();
    let b = provider.get::<Database>("DbB").unwrap();
    assert!(Arc::ptr_eq(&a.config, &b.config));
}

#[test]
fn unknown_key_is_not_found() {
    let provider = ServiceCollection::new().build().unwrap();
    assert!(matches!(
        provider.get::<Config>("Config"),
        Err(DiError::NotFound(ref key)) if key == "Config"
    ));
}

#[test]
fn wrong_type_is_a_type_mismatch() {
    let mut services = ServiceCollection::new();
    services.add_singleton("Port", 8080u16).unwrap();
    let provider = services.build().unwrap();

    assert!(matches!(
        provider.get::<String>("Port"),
        Err(DiError::TypeMismatch(_))
    ));
}

#[test]
fn missing_dependency_error_names_the_whole_chain() {
    let mut services = ServiceCollection::new();
    services
        .add_singleton_factory("Database", ["Config"], |args| {
            Ok(Database {
                config: dep::<Config>(args, 0)?,
            })
        })
        .unwrap();
    let provider = services.build().unwrap();

    let err = provider.get::<Database>("Database").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("Failed to resolve service 'Database'"));
    assert!(msg.contains("Service not registered: 'Config'"));
}

#[test]
fn factory_error_surfaces_as_creation_failed() {
    let mut services = ServiceCollection::new();
    services
        .add_singleton_factory::<Config, [&str; 0], _>("Config", [], |_| {
            Err("missing CONFIG_URL".into())
        })
        .unwrap();
    let provider = services.build().unwrap();

    let err = provider.get::<Config>("Config").unwrap_err();
    assert!(err.to_string().contains("missing CONFIG_URL"));
}

#[test]
fn last_registration_wins() {
    let mut services = ServiceCollection::new();
    services.add_singleton("Greeting", "hello".to_string()).unwrap();
    services.add_singleton("Greeting", "bonjour".to_string()).unwrap();
    let provider = services.build().unwrap();

    assert_eq!(*provider.get::<String>("Greeting").unwrap(), "bonjour");
}

#[test]
fn get_of_uses_the_type_name_as_key() {
    let mut services = ServiceCollection::new();
    services
        .register(Registration::instance(
            key_for::<Config>(),
            Lifetime::Singleton,
            Config {
                url: "typed".to_string(),
            },
        ))
        .unwrap();
    let provider = services.build().unwrap();

    let config = provider.get_of::<Config>().unwrap();
    assert_eq!(config.url, "typed");
}

#[test]
fn provider_resolves_itself() {
    let mut services = ServiceCollection::new();
    services.add_singleton("Config", 1usize).unwrap();
    let provider = services.build().unwrap();

    let this = provider
        .get::<ServiceProvider>(ServiceProvider::SELF_KEY)
        .unwrap();
    assert_eq!(*this.get::<usize>("Config").unwrap(), 1);
}

#[test]
fn resolver_factory_receives_the_locator() {
    struct Service {
        port: Arc<u16>,
    }

    let mut services = ServiceCollection::new();
    services.add_singleton("Port", 9000u16).unwrap();
    services
        .add_singleton_with("Service", |locator: &ServiceProvider| {
            Ok(Service {
                port: locator.get::<u16>("Port")?,
            })
        })
        .unwrap();
    let provider = services.build().unwrap();

    assert_eq!(*provider.get::<Service>("Service").unwrap().port, 9000);
}
