#![deny(unsafe_code)]

//! `gatelog-core` 提供级别门控的延迟格式化日志。
//!
//! # 模块定位（Why）
//! - 日志调用点在大多数运行时刻都会被阈值丢弃，丢弃路径必须只剩一次比较；
//! - 真正输出的消息在池化缓冲中拼接，完成后才物化为一个 `String` 交给日志目标。
//!
//! # 设计概要（How）
//! - [`LogLevel`] 与 [`gate`]：级别定义与门控判断；
//! - [`MessageBuilder`]：在门控放行后向 [`gatelog_buffer::CharBufferPool`] 租借缓冲并拼接消息；
//! - [`LogSink`] 与 [`Logger`]：向下的输出契约与面向调用点的句柄；
//! - [`scope`] 与调用点宏（`info!` 等）：作用域化的默认日志器，取代进程级可变的全局目标；
//! - [`LoggingConfig`]：阈值与缓冲池参数的 TOML 配置。

extern crate alloc;

mod builder;
mod config;
mod error;
pub mod gate;
mod level;
mod logger;
mod macros;
pub mod scope;
mod sink;
pub mod test_stubs;

pub use builder::{GUESSED_LENGTH_PER_HOLE, MessageBuilder, capacity_hint};
pub use config::LoggingConfig;
pub use error::CoreError;
pub use gate::{LevelThreshold, should_log};
pub use level::LogLevel;
pub use logger::Logger;
pub use sink::LogSink;
