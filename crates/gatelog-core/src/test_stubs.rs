//! 测试替身：供单元测试、集成测试与下游 crate 复用的日志目标实现。
//!
//! - [`MemorySink`]：记录每一次 `log` 调用，不做二次门控，便于断言“被抑制的消息从未到达目标”；
//! - [`NoopSink`]：只维护阈值，丢弃所有消息，适合基准测试。

use alloc::{string::String, vec::Vec};

use spin::Mutex;

use crate::{gate::LevelThreshold, level::LogLevel, sink::LogSink};

/// 把消息记录在内存中的日志目标。
#[derive(Debug, Default)]
pub struct MemorySink {
    threshold: LevelThreshold,
    records: Mutex<Vec<(LogLevel, String)>>,
}

impl MemorySink {
    pub fn new(threshold: LogLevel) -> Self {
        Self {
            threshold: LevelThreshold::new(threshold),
            records: Mutex::new(Vec::new()),
        }
    }

    /// 按到达顺序返回全部记录的副本。
    pub fn records(&self) -> Vec<(LogLevel, String)> {
        self.records.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.records.lock().iter().map(|(_, text)| text.clone()).collect()
    }

    pub fn call_count(&self) -> usize {
        self.records.lock().len()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl LogSink for MemorySink {
    fn threshold(&self) -> LogLevel {
        self.threshold.load()
    }

    fn set_threshold(&self, level: LogLevel) {
        self.threshold.store(level);
    }

    fn log(&self, level: LogLevel, message: &str) {
        self.records.lock().push((level, String::from(message)));
    }
}

/// 丢弃所有消息的日志目标。
#[derive(Debug, Default)]
pub struct NoopSink {
    threshold: LevelThreshold,
}

impl NoopSink {
    pub fn new(threshold: LogLevel) -> Self {
        Self {
            threshold: LevelThreshold::new(threshold),
        }
    }
}

impl LogSink for NoopSink {
    fn threshold(&self) -> LogLevel {
        self.threshold.load()
    }

    fn set_threshold(&self, level: LogLevel) {
        self.threshold.store(level);
    }

    fn log(&self, _level: LogLevel, _message: &str) {}
}
