//! 缓冲池错误域。
//!
//! 池的正常路径不会失败：越权归还、重复归还已由所有权在编译期排除。
//! 这里只保留两类运行期错误，分别来自可失败分配与配置解析。

use alloc::collections::TryReserveError;

use thiserror::Error;

/// 租借阶段的错误。
///
/// - **意图 (Why)**：`acquire` 沿用宿主默认的分配失败处理（终止进程）；
///   需要优雅降级的调用方改用 `try_acquire`，由本错误携带请求容量。
/// - **契约 (What)**：不可重试，调用方只能缩小请求或放弃本次构建。
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("failed to allocate a {requested}-byte buffer")]
    AllocationFailed {
        requested: usize,
        #[source]
        source: TryReserveError,
    },
}

/// 池配置解析或校验失败。
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid pool configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// `max_idle_per_class = 0` 会让池退化为纯分配器，视为配置错误；
    /// 需要关闭复用时应显式缩小调用方的使用范围而非依赖该值。
    #[error("max_idle_per_class must be at least 1 when set")]
    ZeroIdleBound,
}
