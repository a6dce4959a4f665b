#![deny(unsafe_code)]

//! `gatelog-tracing` 把 gatelog 的日志目标接到 `tracing` 生态。
//!
//! # 教案式说明
//! - **意图（Why）**：宿主进程通常已经使用 `tracing` 收集日志，gatelog 产出的消息应当直接汇入同一条管线，
//!   而不是另起一套输出通道；
//! - **逻辑（How）**：[`TracingSink`] 实现 [`LogSink`]，把每条已完成的消息转成一个 `tracing` 事件；
//!   [`install`] 为尚未配置订阅者的进程组装 `fmt + EnvFilter` 并注册为全局订阅者；
//! - **契约（What）**：事件统一使用 `gatelog` 目标，级别映射见 [`tracing_level`]。

use std::sync::atomic::{AtomicBool, Ordering};

use gatelog_core::{LevelThreshold, LogLevel, LogSink, LoggingConfig};
use thiserror::Error;
use tracing::{Level, dispatcher, level_filters::LevelFilter};
use tracing_subscriber::{EnvFilter, filter::ParseError, layer::SubscriberExt};

/// 所有桥接事件使用的 `tracing` 目标。
pub const EVENT_TARGET: &str = "gatelog";

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// 安装全局订阅者时可能出现的错误。
#[derive(Debug, Error)]
pub enum InstallError {
    /// `install` 已经成功执行过。
    #[error("gatelog-tracing 已完成安装，禁止重复调用 install")]
    AlreadyInstalled,
    /// 进程内已有其他组件设置了全局订阅者。
    #[error("全局 tracing Subscriber 已由外部设置")]
    SubscriberAlreadySet,
    /// 默认过滤指令无法解析。
    #[error("无效的过滤指令: {0}")]
    InvalidDirective(#[source] ParseError),
    /// 设置全局订阅者失败的底层错误。
    #[error("设置全局 tracing Subscriber 失败: {0}")]
    SetGlobalSubscriber(#[source] dispatcher::SetGlobalDefaultError),
}

/// gatelog 级别到 `tracing` 级别的映射；`Critical` 与 `Error` 同为 `ERROR`。
pub const fn tracing_level(level: LogLevel) -> Level {
    match level {
        LogLevel::Critical | LogLevel::Error => Level::ERROR,
        LogLevel::Warning => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    }
}

/// 根据 `tracing` 的最大级别推导 gatelog 阈值；`OFF` 时退化为只放行 `Critical`。
pub fn threshold_for(filter: LevelFilter) -> LogLevel {
    let Some(level) = filter.into_level() else {
        return LogLevel::Critical;
    };
    if level == Level::ERROR {
        LogLevel::Error
    } else if level == Level::WARN {
        LogLevel::Warning
    } else if level == Level::INFO {
        LogLevel::Info
    } else if level == Level::DEBUG {
        LogLevel::Debug
    } else {
        LogLevel::Trace
    }
}

/// 把消息转成 `tracing` 事件的日志目标。
///
/// # 教案式说明
/// - **意图（Why）**：gatelog 的门控先于 `tracing` 的过滤生效，阈值以外的消息根本不会被构建；
/// - **逻辑（How）**：每个级别对应一个固定的事件调用点，`Critical` 额外携带 `critical = true` 字段，
///   便于下游在 `ERROR` 中区分致命错误；
/// - **契约（What）**：`log` 不做二次门控，`tracing` 侧的过滤仍然独立生效。
#[derive(Debug)]
pub struct TracingSink {
    threshold: LevelThreshold,
}

impl TracingSink {
    pub fn new(threshold: LogLevel) -> Self {
        Self {
            threshold: LevelThreshold::new(threshold),
        }
    }

    /// 使用配置中的阈值创建日志目标。
    pub fn from_config(config: &LoggingConfig) -> Self {
        Self::new(config.threshold)
    }

    /// 以当前 `tracing` 订阅者允许的最详细级别作为阈值，避免构建注定被过滤掉的消息。
    pub fn matching_subscriber() -> Self {
        Self::new(threshold_for(LevelFilter::current()))
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

impl LogSink for TracingSink {
    fn threshold(&self) -> LogLevel {
        self.threshold.load()
    }

    fn set_threshold(&self, level: LogLevel) {
        self.threshold.store(level);
    }

    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Critical => tracing::error!(target: EVENT_TARGET, critical = true, "{}", message),
            LogLevel::Error => tracing::error!(target: EVENT_TARGET, "{}", message),
            LogLevel::Warning => tracing::warn!(target: EVENT_TARGET, "{}", message),
            LogLevel::Info => tracing::info!(target: EVENT_TARGET, "{}", message),
            LogLevel::Debug => tracing::debug!(target: EVENT_TARGET, "{}", message),
            LogLevel::Trace => tracing::trace!(target: EVENT_TARGET, "{}", message),
        }
    }
}

/// 注册 `fmt + EnvFilter` 全局订阅者。
///
/// # 教案式说明
/// - **意图（Why）**：小型宿主只需一次调用即可看到 gatelog 与缓冲池自身的事件；
/// - **逻辑（How）**：
///   1. 先校验 `default_directive`，`RUST_LOG` 存在且合法时以环境变量为准；
///   2. 以 CAS 抢占安装权，并发调用中只有一个线程继续往下走；
///   3. 检查外部已设置的订阅者，组装 `registry + EnvFilter + fmt` 并设为全局默认，失败时交还安装权；
/// - **契约（What）**：
///   - 成功后（或另一线程正在安装时）再次调用返回 [`InstallError::AlreadyInstalled`]；
///   - 指令无效时不占用安装权，修正后可以重试；
///   - 库代码自身从不调用本函数。
pub fn install(default_directive: &str) -> Result<(), InstallError> {
    let fallback = EnvFilter::try_new(default_directive).map_err(InstallError::InvalidDirective)?;

    if INSTALLED
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        return Err(InstallError::AlreadyInstalled);
    }
    if dispatcher::has_been_set() {
        INSTALLED.store(false, Ordering::Release);
        return Err(InstallError::SubscriberAlreadySet);
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or(fallback);
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer());
    tracing::subscriber::set_global_default(subscriber).map_err(|err| {
        INSTALLED.store(false, Ordering::Release);
        InstallError::SetGlobalSubscriber(err)
    })
}
