use alloc::string::String;
use core::{fmt, str::FromStr};

use serde::Deserialize;

use crate::error::CoreError;

/// 日志级别，数值越大越详细。
///
/// # 设计背景（Why）
/// - 日志目标的阈值表示“仍会输出的最详细级别”，因此枚举按详细程度递增排序，
///   门控只需一次整数比较：`threshold >= level`；
/// - 判别值固定为 1..=6，便于存入 `AtomicU8` 并跨配置文件、FFI 保持稳定。
///
/// # 契约说明（What）
/// - `Critical < Error < Warning < Info < Debug < Trace`；
/// - `Display` 输出首字母大写的名称（如 `Info`），`FromStr` 不区分大小写并接受 `warn`。
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
#[repr(u8)]
pub enum LogLevel {
    /// 致命错误，进程通常无法继续。
    Critical = 1,
    /// 运行期错误与意外状况。
    Error = 2,
    /// 异常但尚未构成错误的情况。
    Warning = 3,
    /// 值得关注的运行期事件，如进程启停。
    Info = 4,
    /// 排障用的调试信息。
    Debug = 5,
    /// 最详细的事件追踪。
    Trace = 6,
}

impl LogLevel {
    /// 按详细程度递增排列的全部级别。
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Critical,
        LogLevel::Error,
        LogLevel::Warning,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(LogLevel::Critical),
            2 => Some(LogLevel::Error),
            3 => Some(LogLevel::Warning),
            4 => Some(LogLevel::Info),
            5 => Some(LogLevel::Debug),
            6 => Some(LogLevel::Trace),
            _ => None,
        }
    }

    /// 以 `self` 作为阈值时，`message_level` 的消息是否会被输出。
    #[inline]
    pub const fn is_loggable(self, message_level: LogLevel) -> bool {
        self as u8 >= message_level as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            LogLevel::Critical => "Critical",
            LogLevel::Error => "Error",
            LogLevel::Warning => "Warning",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for LogLevel {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let level = match trimmed.to_ascii_lowercase().as_str() {
            "critical" => LogLevel::Critical,
            "error" => LogLevel::Error,
            "warning" | "warn" => LogLevel::Warning,
            "info" => LogLevel::Info,
            "debug" => LogLevel::Debug,
            "trace" => LogLevel::Trace,
            _ => return Err(CoreError::UnknownLevel(trimmed.into())),
        };
        Ok(level)
    }
}

impl TryFrom<String> for LogLevel {
    type Error = CoreError;

    fn try_from(raw: String) -> Result<Self, CoreError> {
        raw.parse()
    }
}
