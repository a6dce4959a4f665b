use serde::Deserialize;

use crate::error::ConfigError;

/// 缓冲池的可调参数。
///
/// # 设计背景（Why）
/// - 默认行为不限制自由链表深度：突发的“先租后还”会让每个级别保留与并发峰值等量的闲置缓冲；
/// - 对内存敏感的宿主可以设置每级闲置上限，超过上限的归还直接丢弃（计为一次驱逐）。
///
/// # 契约说明（What）
/// - `max_idle_per_class = None`：不设上限；
/// - `max_idle_per_class = Some(n)`：`n >= 1`，由 [`validate`](Self::validate) 保证。
///
/// ```toml
/// max_idle_per_class = 64
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolConfig {
    pub max_idle_per_class: Option<usize>,
}

impl PoolConfig {
    /// 不限制闲置深度的配置。
    pub const fn unbounded() -> Self {
        Self {
            max_idle_per_class: None,
        }
    }

    /// 每个级别最多保留 `limit` 个闲置缓冲。
    pub const fn bounded(limit: usize) -> Self {
        Self {
            max_idle_per_class: Some(limit),
        }
    }

    /// 从 TOML 文本解析并校验配置。
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.max_idle_per_class {
            Some(0) => Err(ConfigError::ZeroIdleBound),
            _ => Ok(()),
        }
    }
}
