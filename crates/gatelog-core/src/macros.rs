//! 调用点宏。
//!
//! # 设计缘起（Why）
//! - 宏展开把门控判断放在参数求值之前：被抑制的调用点既不求值参数，也不租借缓冲；
//! - 格式串长度与参数个数在编译期已知，直接作为构建器的容量提示。
//!
//! # 使用方式（How）
//! - 显式句柄：`info!(logger, "connected to {}", peer)`，`logger` 为 `Logger` 或其引用；
//! - 作用域默认：`info!("connected to {}", peer)`，使用 [`crate::scope`] 安装的日志器，未安装时为空操作；
//! - 任意级别：`log_at!(LogLevel::Debug, "..")` 或 `log_at!(logger, level, "..")`。

/// 统计参数个数，作为容量提示。
#[doc(hidden)]
#[macro_export]
macro_rules! __gatelog_count {
    () => { 0usize };
    ($head:expr $(, $tail:expr)*) => { 1usize + $crate::__gatelog_count!($($tail),*) };
}

/// 向指定日志器输出一条消息。
#[doc(hidden)]
#[macro_export]
macro_rules! __gatelog_emit {
    ($logger:expr, $level:expr, $fmt:literal $(, $arg:expr)*) => {{
        let __logger: &$crate::Logger = &$logger;
        let __level: $crate::LogLevel = $level;
        if __logger.is_enabled(__level) {
            let mut __builder = __logger.builder(
                __level,
                $fmt.len(),
                $crate::__gatelog_count!($($arg),*),
            );
            __builder.append_args(::core::format_args!($fmt $(, $arg)*));
            __logger.emit(__builder);
        }
    }};
}

/// 以任意级别输出一条消息。
///
/// ```
/// use std::sync::Arc;
/// use gatelog_core::{LogLevel, Logger, log_at, test_stubs::MemorySink};
///
/// let sink = Arc::new(MemorySink::new(LogLevel::Info));
/// let logger = Logger::new(sink.clone());
/// log_at!(logger, LogLevel::Warning, "queue depth {}", 17);
/// log_at!(logger, LogLevel::Debug, "not emitted {}", 1);
/// assert_eq!(sink.messages(), vec!["queue depth 17".to_owned()]);
/// ```
#[macro_export]
macro_rules! log_at {
    ($level:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::scope::with_current(|__current| {
            if let ::core::option::Option::Some(__current) = __current {
                $crate::__gatelog_emit!(__current, $level, $fmt $(, $arg)*);
            }
        })
    };
    ($logger:expr, $level:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__gatelog_emit!($logger, $level, $fmt $(, $arg)*)
    };
}

#[macro_export]
macro_rules! critical {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::log_at!($crate::LogLevel::Critical, $fmt $(, $arg)*)
    };
    ($logger:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::log_at!($logger, $crate::LogLevel::Critical, $fmt $(, $arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::log_at!($crate::LogLevel::Error, $fmt $(, $arg)*)
    };
    ($logger:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::log_at!($logger, $crate::LogLevel::Error, $fmt $(, $arg)*)
    };
}

#[macro_export]
macro_rules! warning {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::log_at!($crate::LogLevel::Warning, $fmt $(, $arg)*)
    };
    ($logger:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::log_at!($logger, $crate::LogLevel::Warning, $fmt $(, $arg)*)
    };
}

#[macro_export]
macro_rules! info {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::log_at!($crate::LogLevel::Info, $fmt $(, $arg)*)
    };
    ($logger:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::log_at!($logger, $crate::LogLevel::Info, $fmt $(, $arg)*)
    };
}

#[macro_export]
macro_rules! debug {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::log_at!($crate::LogLevel::Debug, $fmt $(, $arg)*)
    };
    ($logger:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::log_at!($logger, $crate::LogLevel::Debug, $fmt $(, $arg)*)
    };
}

#[macro_export]
macro_rules! trace {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::log_at!($crate::LogLevel::Trace, $fmt $(, $arg)*)
    };
    ($logger:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::log_at!($logger, $crate::LogLevel::Trace, $fmt $(, $arg)*)
    };
}
