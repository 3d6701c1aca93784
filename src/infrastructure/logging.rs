//! 日志系统配置模块
//! 结构化日志输出到 stderr，标准输出只留给钱包报告

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::LoggingConfig;

/// 构造过滤器：`RUST_LOG` 优先，否则使用配置中的级别
pub fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// 初始化日志系统
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = build_filter(config);

    // 根据配置选择日志格式
    if config.format == "json" {
        Registry::default()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        Registry::default()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(false),
            )
            .try_init()?;
    }

    Ok(())
}
