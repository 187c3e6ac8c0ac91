//! 启动入口与作用域句柄的跨 crate 集成测试

use async_trait::async_trait;
use di_abstractions::{ModuleDescriptor, NoopSink, ScopedResource, TargetDescriptor};
use di_impl::{bootstrap, Bootstrap};
use futures::FutureExt;
use infrastructure_common::{BoxError, DependencyError, NodeState};
use parking_lot::Mutex;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

type Log = Arc<Mutex<Vec<String>>>;

#[derive(Debug)]
struct Connection {
    name: String,
    log: Log,
}

#[async_trait]
impl ScopedResource for Connection {
    async fn acquire(&self) -> Result<Option<di_abstractions::Instance>, BoxError> {
        self.log.lock().push(format!("open {}", self.name));
        Ok(None)
    }

    async fn release(&self) -> Result<(), BoxError> {
        self.log.lock().push(format!("close {}", self.name));
        Ok(())
    }
}

#[derive(Debug)]
struct Repository {
    connection: Arc<Connection>,
}

#[derive(Debug)]
struct Server {
    repository: Arc<Repository>,
}

fn connection(name: &str, log: &Log) -> Arc<TargetDescriptor> {
    let log = log.clone();
    let label = name.to_string();
    TargetDescriptor::builder::<Connection>(name).construct_scoped(move |_| {
        Ok(Connection {
            name: label.clone(),
            log: log.clone(),
        })
    })
}

/// storage 模块导出 repository，repository 依赖模块内部的 connection
fn server(log: &Log) -> Arc<TargetDescriptor> {
    let repository = TargetDescriptor::builder::<Repository>("repository")
        .depends_on::<Connection>("connection")
        .construct(|deps| {
            Ok(Repository {
                connection: deps.get("connection")?,
            })
        });
    let storage = TargetDescriptor::module(
        "storage",
        ModuleDescriptor::new()
            .provider(connection("connection", log))
            .provider(repository)
            .export("repository"),
    );

    TargetDescriptor::builder::<Server>("server")
        .depends_on::<Repository>("repository")
        .module(ModuleDescriptor::new().import(storage))
        .construct(|deps| {
            Ok(Server {
                repository: deps.get("repository")?,
            })
        })
}

#[tokio::test]
async fn bootstrap_runs_body_and_closes_scope() {
    let log: Log = Arc::default();

    let name = bootstrap(server(&log), |server: Arc<Server>| async move {
        server.repository.connection.name.clone()
    })
    .await
    .unwrap();

    assert_eq!(name, "connection");
    assert_eq!(*log.lock(), vec!["open connection", "close connection"]);
}

#[tokio::test]
async fn internal_provider_stays_hidden_from_the_importer() {
    let log: Log = Arc::default();
    let handle = Bootstrap::new()
        .with_sink(Arc::new(NoopSink))
        .open::<Server>(server(&log))
        .await
        .unwrap();

    assert!(handle.context().can_provide("repository"));
    assert!(!handle.context().can_provide("connection"));
    assert!(matches!(
        handle.context().get_dependency("connection").await,
        Err(DependencyError::ResolutionFailed { .. })
    ));

    handle.close().await.unwrap();
}

#[tokio::test]
async fn panicking_body_still_releases_resources() {
    let log: Log = Arc::default();
    let bootstrap = Bootstrap::new().with_sink(Arc::new(NoopSink));

    let outcome = AssertUnwindSafe(bootstrap.run(server(&log), |_server: Arc<Server>| async {
        panic!("request handler crashed");
    }))
    .catch_unwind()
    .await;

    assert!(outcome.is_err());
    assert_eq!(*log.lock(), vec!["open connection", "close connection"]);
}

#[tokio::test]
async fn error_returned_by_body_is_passed_through() {
    let log: Log = Arc::default();

    let result: Result<(), String> = Bootstrap::new()
        .with_sink(Arc::new(NoopSink))
        .run(server(&log), |_server: Arc<Server>| async {
            Err("shutdown requested".to_string())
        })
        .await
        .unwrap();

    assert_eq!(result, Err("shutdown requested".to_string()));
    assert_eq!(log.lock().len(), 2);
}

#[tokio::test]
async fn dropped_handle_is_cleaned_up_in_background() {
    let log: Log = Arc::default();
    let handle = Bootstrap::new()
        .with_sink(Arc::new(NoopSink))
        .open::<Server>(server(&log))
        .await
        .unwrap();
    let context = handle.context().clone();

    drop(handle);
    for _ in 0..50 {
        if context.state() == NodeState::Exited {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(context.state(), NodeState::Exited);
    assert_eq!(*log.lock(), vec!["open connection", "close connection"]);
}

#[tokio::test]
async fn wrong_root_type_is_reported_and_unwound() {
    let log: Log = Arc::default();

    let error = Bootstrap::new()
        .with_sink(Arc::new(NoopSink))
        .open::<Repository>(server(&log))
        .await
        .unwrap_err();

    assert!(matches!(error, DependencyError::TypeMismatch { ref name, .. } if name == "server"));
    assert_eq!(*log.lock(), vec!["open connection", "close connection"]);
}

#[tokio::test]
async fn separate_scopes_do_not_share_instances() {
    let log: Log = Arc::default();
    let bootstrap = Bootstrap::new().with_sink(Arc::new(NoopSink));

    let first = bootstrap.open::<Server>(server(&log)).await.unwrap();
    let second = bootstrap.open::<Server>(server(&log)).await.unwrap();
    assert!(!Arc::ptr_eq(
        &first.repository.connection,
        &second.repository.connection
    ));

    second.close().await.unwrap();
    first.close().await.unwrap();
    assert_eq!(
        *log.lock(),
        vec![
            "open connection",
            "open connection",
            "close connection",
            "close connection"
        ]
    );
}
