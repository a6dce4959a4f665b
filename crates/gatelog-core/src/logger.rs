use alloc::sync::Arc;
use core::fmt;

use gatelog_buffer::CharBufferPool;

use crate::{builder::MessageBuilder, level::LogLevel, sink::LogSink};

/// 日志句柄：日志目标与缓冲池的组合。
///
/// # 设计背景（Why）
/// - 调用点需要同时拿到“阈值来自哪里”与“缓冲向谁租借”，把两者打包成可廉价克隆的句柄，
///   即可在线程间传递，也可安装为线程内的默认日志器（见 [`crate::scope`]）；
/// - 取代进程级可变的全局日志目标：每个组件显式持有自己的句柄。
///
/// # 契约说明（What）
/// - [`Logger::builder`] 只读取一次阈值，之后的阈值变化不影响该构建器；
/// - [`Logger::emit`] 对启用的构建器恰好调用一次 [`LogSink::log`]，对被抑制的构建器什么也不做；
/// - 克隆只增加两个引用计数。
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
    pool: CharBufferPool,
}

impl Logger {
    /// 使用进程级共享缓冲池创建句柄。
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self::with_pool(sink, CharBufferPool::shared().clone())
    }

    pub fn with_pool(sink: Arc<dyn LogSink>, pool: CharBufferPool) -> Self {
        Self { sink, pool }
    }

    pub fn sink(&self) -> &Arc<dyn LogSink> {
        &self.sink
    }

    pub fn pool(&self) -> &CharBufferPool {
        &self.pool
    }

    #[inline]
    pub fn threshold(&self) -> LogLevel {
        self.sink.threshold()
    }

    pub fn set_threshold(&self, level: LogLevel) {
        self.sink.set_threshold(level);
    }

    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.threshold().is_loggable(level)
    }

    /// 为一条消息创建构建器，参数含义同 [`MessageBuilder::new`]。
    pub fn builder(&self, level: LogLevel, literal_len: usize, formatted_count: usize) -> MessageBuilder<'_> {
        MessageBuilder::new(literal_len, formatted_count, self.threshold(), level, &self.pool)
    }

    /// 完成构建并把文本交给日志目标。
    pub fn emit(&self, builder: MessageBuilder<'_>) {
        if !builder.is_enabled() {
            return;
        }
        let level = builder.level();
        let text = builder.finish();
        self.sink.log(level, &text);
    }

    /// 输出一段现成的文本，仍然经过门控。
    pub fn log_str(&self, level: LogLevel, message: &str) {
        if self.is_enabled(level) {
            self.sink.log(level, message);
        }
    }

    /// 以闭包填充消息；门控未通过时闭包不会被调用。
    pub fn log_with<F>(&self, level: LogLevel, literal_len: usize, formatted_count: usize, fill: F)
    where
        F: FnOnce(&mut MessageBuilder<'_>),
    {
        if !self.is_enabled(level) {
            return;
        }
        let mut builder = self.builder(level, literal_len, formatted_count);
        fill(&mut builder);
        self.emit(builder);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("threshold", &self.threshold())
            .field("pool", &self.pool.config())
            .finish()
    }
}

#[cfg(all(test, not(any(loom, gatelog_loom))))]
mod tests {
    use super::*;
    use crate::test_stubs::MemorySink;

    fn logger_with(threshold: LogLevel) -> (Logger, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new(threshold));
        let logger = Logger::with_pool(sink.clone(), CharBufferPool::new());
        (logger, sink)
    }

    #[test]
    fn emit_forwards_enabled_messages_once() {
        let (logger, sink) = logger_with(LogLevel::Info);
        let mut builder = logger.builder(LogLevel::Warning, 8, 1);
        builder.append_literal("disk at ");
        builder.append_formatted(&93);
        logger.emit(builder);

        assert_eq!(sink.records(), vec![(LogLevel::Warning, "disk at 93".to_owned())]);
    }

    #[test]
    fn emit_ignores_suppressed_builders() {
        let (logger, sink) = logger_with(LogLevel::Warning);
        let mut builder = logger.builder(LogLevel::Info, 4, 0);
        builder.append_literal("noise");
        logger.emit(builder);

        assert_eq!(sink.call_count(), 0);
        assert_eq!(logger.pool().statistics().allocations, 0);
    }

    #[test]
    fn log_str_is_gated() {
        let (logger, sink) = logger_with(LogLevel::Error);
        logger.log_str(LogLevel::Critical, "down");
        logger.log_str(LogLevel::Warning, "slow");
        assert_eq!(sink.messages(), vec!["down".to_owned()]);
    }

    #[test]
    fn log_with_skips_closure_when_suppressed() {
        let (logger, sink) = logger_with(LogLevel::Info);
        logger.log_with(LogLevel::Trace, 0, 0, |_| panic!("被抑制时不应构建消息"));
        logger.log_with(LogLevel::Info, 6, 0, |builder| builder.append_literal("booted"));
        assert_eq!(sink.messages(), vec!["booted".to_owned()]);
    }

    #[test]
    fn threshold_changes_apply_to_later_builders() {
        let (logger, sink) = logger_with(LogLevel::Info);
        let early = logger.builder(LogLevel::Debug, 0, 0);
        logger.set_threshold(LogLevel::Debug);
        assert!(!early.is_enabled());
        assert!(logger.builder(LogLevel::Debug, 0, 0).is_enabled());
        assert_eq!(sink.threshold(), LogLevel::Debug);
    }
}
