//! 级别门控。
//!
//! # 设计缘起（Why）
//! - 被阈值丢弃的日志调用点，其全部成本应当只是一次比较：不租借缓冲、不格式化参数、不拼接字符串；
//! - 因此门控判断必须先于构建器的任何动作执行，并且能够短路后续全部工作。
//!
//! # 契约说明（What）
//! - [`should_log`]：`threshold >= level` 时放行；
//! - [`LevelThreshold`]：日志目标持有的可变阈值，读多写少；
//!   读取方总能观察到某个曾经写入的合法级别，但阈值变更与进行中的门控判断之间不保证线性一致，
//!   与变更竞争的消息可能被输出也可能被抑制。

#[cfg(any(loom, gatelog_loom))]
use loom::sync::atomic::{AtomicU8, Ordering};
#[cfg(not(any(loom, gatelog_loom)))]
use core::sync::atomic::{AtomicU8, Ordering};

use core::fmt;

use crate::level::LogLevel;

/// 门控判断：阈值为 `threshold` 的目标是否输出 `level` 级别的消息。
#[inline]
pub const fn should_log(threshold: LogLevel, level: LogLevel) -> bool {
    threshold.is_loggable(level)
}

/// 以原子字节保存的阈值级别。
///
/// - 读写均为 `Relaxed`：阈值不保护任何其他数据，只需要避免撕裂读；
/// - 存储的永远是 [`LogLevel`] 的合法判别值。
pub struct LevelThreshold {
    raw: AtomicU8,
}

impl LevelThreshold {
    pub fn new(level: LogLevel) -> Self {
        Self {
            raw: AtomicU8::new(level.as_u8()),
        }
    }

    #[inline]
    pub fn load(&self) -> LogLevel {
        let raw = self.raw.load(Ordering::Relaxed);
        debug_assert!(LogLevel::from_u8(raw).is_some());
        LogLevel::from_u8(raw).unwrap_or(LogLevel::Trace)
    }

    #[inline]
    pub fn store(&self, level: LogLevel) {
        self.raw.store(level.as_u8(), Ordering::Relaxed);
    }

    /// 替换阈值并返回旧值。
    pub fn replace(&self, level: LogLevel) -> LogLevel {
        let previous = self.raw.swap(level.as_u8(), Ordering::Relaxed);
        LogLevel::from_u8(previous).unwrap_or(LogLevel::Trace)
    }

    /// 以当前阈值执行门控判断。
    #[inline]
    pub fn allows(&self, level: LogLevel) -> bool {
        should_log(self.load(), level)
    }
}

impl Default for LevelThreshold {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

impl fmt::Debug for LevelThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LevelThreshold").field(&self.load()).finish()
    }
}

#[cfg(all(test, not(any(loom, gatelog_loom))))]
mod tests {
    use super::*;

    fn emitted(threshold: LogLevel) -> usize {
        LogLevel::ALL
            .iter()
            .filter(|level| should_log(threshold, **level))
            .count()
    }

    #[test]
    fn threshold_scenarios() {
        assert_eq!(emitted(LogLevel::Info), 4);
        assert_eq!(emitted(LogLevel::Critical), 1);
        assert_eq!(emitted(LogLevel::Trace), 6);
    }

    #[test]
    fn info_threshold_suppresses_debug_and_trace() {
        assert!(should_log(LogLevel::Info, LogLevel::Warning));
        assert!(should_log(LogLevel::Info, LogLevel::Info));
        assert!(!should_log(LogLevel::Info, LogLevel::Debug));
        assert!(!should_log(LogLevel::Info, LogLevel::Trace));
    }

    #[test]
    fn threshold_cell_updates() {
        let threshold = LevelThreshold::new(LogLevel::Error);
        assert!(!threshold.allows(LogLevel::Warning));
        assert_eq!(threshold.replace(LogLevel::Debug), LogLevel::Error);
        assert!(threshold.allows(LogLevel::Warning));
        threshold.store(LogLevel::Critical);
        assert_eq!(threshold.load(), LogLevel::Critical);
    }
}
