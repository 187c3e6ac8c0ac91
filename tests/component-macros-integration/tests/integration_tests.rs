//! 派生宏与上下文树的集成测试

use async_trait::async_trait;
use component_macros::Injectable;
use di_abstractions::{Injectable, Instance, NoopSink, ScopedResource, TargetDescriptor};
use di_impl::Bootstrap;
use infrastructure_common::{BoxError, DependencyError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

static RELEASED: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());
static CACHE_BUILDS: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, Default)]
struct Stats {
    hits: AtomicUsize,
}

/// 作用域资源：释放时记录名称
#[derive(Debug, Injectable)]
#[injectable(scoped)]
struct Database {
    #[inject(skip)]
    stats: Stats,
}

#[async_trait]
impl ScopedResource for Database {
    async fn release(&self) -> Result<(), BoxError> {
        RELEASED.lock().unwrap().push("database");
        Ok(())
    }
}

#[derive(Debug, Injectable)]
#[injectable(scoped)]
struct Cache {
    database: Arc<Database>,
}

#[async_trait]
impl ScopedResource for Cache {
    async fn acquire(&self) -> Result<Option<Instance>, BoxError> {
        CACHE_BUILDS.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }

    async fn release(&self) -> Result<(), BoxError> {
        RELEASED.lock().unwrap().push("cache");
        Ok(())
    }
}

#[derive(Debug, Injectable)]
#[injectable(providers(Database, Cache), exports(Cache))]
struct Persistence;

#[derive(Debug, Injectable)]
#[injectable(name = "users")]
struct UserService {
    #[inject(name = "cache")]
    store: Arc<Cache>,
}

#[derive(Debug, Injectable)]
#[injectable(providers(UserService), imports(Persistence), exports(UserService, Persistence))]
struct Accounts;

#[derive(Debug, Injectable)]
#[injectable(imports(Accounts))]
struct Gateway {
    users: Arc<UserService>,
    cache: Arc<Cache>,
}

fn quiet() -> Bootstrap {
    Bootstrap::new().with_sink(Arc::new(NoopSink))
}

#[test]
fn generated_descriptors_describe_the_graph() {
    assert_eq!(UserService::NAME, "users");
    assert_eq!(Persistence::NAME, "persistence");

    let accounts = TargetDescriptor::of::<Accounts>();
    let module = accounts.module_descriptor().unwrap();
    assert_eq!(module.providers()[0].name(), "users");
    assert_eq!(module.imports()[0].name(), "persistence");
    assert_eq!(module.exports(), ["users", "persistence"]);

    let gateway = TargetDescriptor::of::<Gateway>();
    assert_eq!(gateway.manifest().names(), vec!["users", "cache"]);
}

#[tokio::test]
async fn derived_graph_resolves_and_unwinds() {
    RELEASED.lock().unwrap().clear();
    CACHE_BUILDS.store(0, Ordering::SeqCst);

    let handle = quiet()
        .open::<Gateway>(Gateway::descriptor())
        .await
        .unwrap();

    assert!(Arc::ptr_eq(&handle.users.store, &handle.cache));
    handle.cache.database.stats.hits.fetch_add(1, Ordering::SeqCst);
    assert_eq!(CACHE_BUILDS.load(Ordering::SeqCst), 1);
    assert!(!handle.context().can_provide("database"));

    handle.close().await.unwrap();
    assert_eq!(*RELEASED.lock().unwrap(), vec!["cache", "database"]);
}

#[tokio::test]
async fn unexported_provider_is_not_injectable_across_modules() {
    #[derive(Debug, Injectable)]
    #[injectable(imports(Persistence))]
    struct Reporting {
        database: Arc<Database>,
    }

    let error = quiet()
        .open::<Reporting>(Reporting::descriptor())
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        DependencyError::ResolutionFailed { ref name, .. } if name == "database"
    ));
}
