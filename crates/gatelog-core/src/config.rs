use gatelog_buffer::{CharBufferPool, PoolConfig};
use serde::Deserialize;

use crate::{error::CoreError, level::LogLevel, sink::LogSink};

/// 日志子系统配置。
///
/// ```toml
/// threshold = "debug"
///
/// [pool]
/// max_idle_per_class = 32
/// ```
///
/// 缺省字段取默认值：阈值 `Info`，缓冲池不限闲置深度。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub threshold: LogLevel,
    pub pool: PoolConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            threshold: LogLevel::Info,
            pool: PoolConfig::default(),
        }
    }
}

impl LoggingConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, CoreError> {
        let config: Self = toml::from_str(source)?;
        config.pool.validate()?;
        Ok(config)
    }

    /// 按配置创建独立的缓冲池。
    pub fn build_pool(&self) -> Result<CharBufferPool, CoreError> {
        Ok(CharBufferPool::with_config(self.pool)?)
    }

    /// 把配置的阈值写入日志目标。
    pub fn apply(&self, sink: &dyn LogSink) {
        sink.set_threshold(self.threshold);
    }
}

#[cfg(all(test, not(any(loom, gatelog_loom))))]
mod tests {
    use super::*;
    use crate::test_stubs::MemorySink;

    #[test]
    fn empty_document_uses_defaults() {
        let config = LoggingConfig::from_toml_str("").expect("空配置合法");
        assert_eq!(config, LoggingConfig::default());
        assert_eq!(config.threshold, LogLevel::Info);
    }

    #[test]
    fn parses_threshold_and_pool() {
        let config = LoggingConfig::from_toml_str(
            "threshold = \"Warn\"\n[pool]\nmax_idle_per_class = 4\n",
        )
        .expect("配置合法");
        assert_eq!(config.threshold, LogLevel::Warning);
        assert_eq!(config.pool.max_idle_per_class, Some(4));

        let pool = config.build_pool().expect("池配置合法");
        assert_eq!(pool.config().max_idle_per_class, Some(4));

        let sink = MemorySink::new(LogLevel::Trace);
        config.apply(&sink);
        assert_eq!(sink.threshold(), LogLevel::Warning);
    }

    #[test]
    fn rejects_unknown_level_and_zero_bound() {
        assert!(matches!(
            LoggingConfig::from_toml_str("threshold = \"loud\""),
            Err(CoreError::Toml(_))
        ));
        assert!(matches!(
            LoggingConfig::from_toml_str("[pool]\nmax_idle_per_class = 0"),
            Err(CoreError::Config(_))
        ));
        assert!(LoggingConfig::from_toml_str("verbosity = 3").is_err());
    }
}
