use alloc::string::String;

use gatelog_buffer::ConfigError;
use thiserror::Error;

/// 日志核心的错误类型。
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown log level `{0}`, expected one of critical/error/warning/info/debug/trace")]
    UnknownLevel(String),
    #[error("invalid buffer pool configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid logging configuration: {0}")]
    Toml(#[from] toml::de::Error),
}
