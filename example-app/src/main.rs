//! # 示例应用程序
//!
//! 演示模块化依赖注入：声明模块图，启动根模块，运行业务逻辑，退出时逆序释放资源。

mod services;

use anyhow::Context;
use clap::Parser;
use di_abstractions::Injectable;
use infrastructure_composition::{ApplicationBuilder, LoggingConfig};
use services::Application;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "模块化依赖注入示例应用")]
struct Args {
    /// 配置文件路径
    #[arg(short, long, default_value = "config/app.toml")]
    config: String,

    /// 日志级别，覆盖配置文件中的设置
    #[arg(long)]
    log_level: Option<String>,

    /// 探测轮数
    #[arg(long, default_value_t = 3)]
    rounds: usize,

    /// 每轮间隔（毫秒）
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let builder = build_application(&args)?;
    let rounds = args.rounds;
    let interval = Duration::from_millis(args.interval_ms);

    let results = builder
        .run(Application::descriptor(), |app: Arc<Application>| async move {
            app.run(rounds, interval).await
        })
        .await
        .context("启动应用失败")?
        .map_err(|e| anyhow::anyhow!("运行失败: {e}"))?;

    let reachable = results.iter().filter(|ok| **ok).count();
    info!(reachable, total = results.len(), "应用已关闭");
    for (round, ok) in results.iter().enumerate() {
        println!("第 {} 轮: {}", round + 1, ok);
    }
    Ok(())
}

/// 组装应用构建器
fn build_application(args: &Args) -> anyhow::Result<ApplicationBuilder> {
    let mut builder = ApplicationBuilder::new();

    if Path::new(&args.config).exists() {
        builder = builder
            .with_config_file(&args.config)
            .with_context(|| format!("读取配置文件失败: {}", args.config))?;
    } else {
        eprintln!("配置文件不存在，使用默认配置: {}", args.config);
    }

    let mut logging = builder
        .logging_config()
        .cloned()
        .unwrap_or_else(LoggingConfig::development);
    if let Some(level) = &args.log_level {
        logging = logging.with_level(parse_log_level(level));
    }
    Ok(builder.with_logging(logging))
}

/// 解析日志级别
fn parse_log_level(level: &str) -> tracing::Level {
    level.parse().unwrap_or(tracing::Level::INFO)
}
