use alloc::sync::Arc;

use crate::level::LogLevel;

/// 日志目标契约：接收已完成的消息文本。
///
/// # 设计背景（Why）
/// - 核心只负责“是否构建”与“如何构建”，消息最终写到哪里由宿主决定（控制台、`tracing`、内存记录器等）；
/// - 阈值属于目标本身：同一进程内的不同目标可以有不同的详细程度。
///
/// # 契约说明（What）
/// - `threshold`：当前仍会输出的最详细级别，每次门控判断都会读取；
/// - `set_threshold`：由目标的拥有者随时修改，实现需保证并发读取不会观察到撕裂值；
/// - `log`：核心对每条未被抑制的消息恰好调用一次，被抑制的消息永不调用；
/// - **前置条件**：实现必须 `Send + Sync`，`log` 不应 panic。
pub trait LogSink: Send + Sync + 'static {
    fn threshold(&self) -> LogLevel;

    fn set_threshold(&self, level: LogLevel);

    fn log(&self, level: LogLevel, message: &str);
}

impl<S: LogSink + ?Sized> LogSink for Arc<S> {
    fn threshold(&self) -> LogLevel {
        (**self).threshold()
    }

    fn set_threshold(&self, level: LogLevel) {
        (**self).set_threshold(level);
    }

    fn log(&self, level: LogLevel, message: &str) {
        (**self).log(level, message);
    }
}
