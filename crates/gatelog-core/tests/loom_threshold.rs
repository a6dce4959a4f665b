#![cfg(any(loom, gatelog_loom))]

use gatelog_core::{LevelThreshold, LogLevel};
use loom::{model, sync::Arc, thread};

#[test]
fn racing_reader_observes_a_written_level() {
    //
    // 教案级说明：一个线程调整阈值，另一个线程同时做门控判断。
    // - **Why**：阈值以单字节原子保存，读取方绝不能观察到非法的判别值；
    // - **How**：Loom 穷举读写交错；
    // - **What**：读到的级别只能是初值或新值之一，门控结果与之一致。
    model(|| {
        let threshold = Arc::new(LevelThreshold::new(LogLevel::Info));

        let writer = {
            let threshold = Arc::clone(&threshold);
            thread::spawn(move || threshold.store(LogLevel::Critical))
        };

        let observed = threshold.load();
        assert!(observed == LogLevel::Info || observed == LogLevel::Critical);
        assert!(threshold.allows(LogLevel::Error), "Error 在两种阈值下都应放行");

        writer.join().expect("写线程不应 panic");
        assert_eq!(threshold.load(), LogLevel::Critical);
    });
}
