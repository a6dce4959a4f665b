#![deny(unsafe_code)]

//! `gatelog-buffer` 提供按尺寸分级的字符缓冲池。
//!
//! # 模块定位（Why）
//! - 日志消息构建器需要可增长的字符存储，但不希望每次增长都向堆申请内存；
//! - 本 crate 把缓冲按 2 的幂次容量分级，每级维护自由链表，使“租借、写入、归还”形成闭环。
//!
//! # 设计概要（How）
//! - `size_class` 模块是纯函数层：请求容量 → 级别 → 精确容量；
//! - `pool` 模块实现 [`CharBufferPool`]，负责租借、归还、收缩与统计；
//! - [`CharBuffer`] 是池发放的定长存储块，携带自身级别，归还时无需再次定级；
//! - 超过 1,048,575 字节的请求不进入池，按原尺寸分配、归还即释放。
//!
//! # 命名约定（Consistency）
//! - 统一使用 `acquire`/`release` 描述所有权转移，`statistics` 返回只读快照。

extern crate alloc;

mod buffer;
mod config;
mod error;
mod metrics;
mod pool;
pub mod size_class;
mod sync;

pub use buffer::CharBuffer;
pub use config::PoolConfig;
pub use error::{ConfigError, PoolError};
pub use metrics::PoolStats;
pub use pool::CharBufferPool;
