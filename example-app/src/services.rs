//! 示例服务与模块
//!
//! `Application` 导入 `ApplicationServices` 和 `DomainServices`。`GooglePinger` 位于
//! `DomainServices` 中，它需要的 `HttpService` 由 `ApplicationServices` 导出，
//! 经由父节点 `Application` 解析得到。

use async_trait::async_trait;
use component_macros::Injectable;
use di_abstractions::{Instance, ScopedResource};
use infrastructure_common::BoxError;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// 模拟的 HTTP 会话
#[derive(Debug, Default)]
pub struct Session {
    open: AtomicBool,
    requests: AtomicUsize,
}

impl Session {
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

/// HTTP 服务，作用域内共享一个会话
#[derive(Debug, Injectable)]
#[injectable(scoped)]
pub struct HttpService {
    #[inject(skip)]
    session: Session,
}

impl HttpService {
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// 发送 GET 请求，返回状态码
    pub async fn get(&self, url: &str) -> Result<u16, BoxError> {
        if !self.session.is_open() {
            return Err(format!("会话已关闭，无法请求 {url}").into());
        }
        self.session.requests.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        debug!(url = %url, "GET 请求完成");
        Ok(200)
    }
}

#[async_trait]
impl ScopedResource for HttpService {
    async fn acquire(&self) -> Result<Option<Instance>, BoxError> {
        self.session.open.store(true, Ordering::SeqCst);
        info!("HTTP 会话已打开");
        Ok(None)
    }

    async fn release(&self) -> Result<(), BoxError> {
        self.session.open.store(false, Ordering::SeqCst);
        info!(requests = self.session.requests(), "HTTP 会话已关闭");
        Ok(())
    }
}

/// 应用服务模块
#[derive(Debug, Injectable)]
#[injectable(providers(HttpService), exports(HttpService))]
pub struct ApplicationServices;

/// 连通性探测
#[derive(Debug, Injectable)]
pub struct GooglePinger {
    http_service: Arc<HttpService>,
}

impl GooglePinger {
    pub const TARGET_URL: &'static str = "https://google.com";

    pub async fn ping(&self) -> Result<bool, BoxError> {
        let status = self.http_service.get(Self::TARGET_URL).await?;
        Ok(status == 200)
    }
}

/// 领域服务模块
#[derive(Debug, Injectable)]
#[injectable(providers(GooglePinger), exports(GooglePinger))]
pub struct DomainServices;

/// 根模块
#[derive(Debug, Injectable)]
#[injectable(imports(ApplicationServices, DomainServices))]
pub struct Application {
    google_pinger: Arc<GooglePinger>,
}

impl Application {
    /// 按给定轮数探测，返回每轮结果
    pub async fn run(&self, rounds: usize, interval: Duration) -> Result<Vec<bool>, BoxError> {
        let mut results = Vec::with_capacity(rounds);
        for round in 1..=rounds {
            let reachable = self.google_pinger.ping().await?;
            info!(round, reachable, "探测完成");
            results.push(reachable);
            if round < rounds {
                tokio::time::sleep(interval).await;
            }
        }
        Ok(results)
    }

    pub fn google_pinger(&self) -> &Arc<GooglePinger> {
        &self.google_pinger
    }
}
