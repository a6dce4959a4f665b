#![cfg(not(any(loom, gatelog_loom)))]

//! `pool_contract` 集成测试：从 crate 公开 API 视角验证 `CharBufferPool` 的租借与归还契约。
//!
//! # 测试目标（Why）
//! - 固定池化区间内“容量恰为级别容量”、超大请求“按原尺寸分配”两条核心规则；
//! - 验证归还后同级别租借复用同一块内存，而超大缓冲永不复用；
//! - 观察统计快照，确保收缩与驱逐路径的计数一致。

use std::{collections::HashSet, sync::Arc, thread};

use gatelog_buffer::{
    CharBufferPool, PoolConfig,
    size_class::{MAX_POOLED_CAPACITY, classify},
};

const POOLED_CAPACITIES: [usize; 13] = [
    255, 511, 1023, 2047, 4095, 8191, 16_383, 32_767, 65_535, 131_071, 262_143, 524_287,
    1_048_575,
];

/// “请求 → 返回容量”对照表，覆盖级别边界与超大区间。
const RENT_CASES: [(usize, usize); 13] = [
    (1, 255),
    (100, 255),
    (255, 255),
    (256, 511),
    (511, 511),
    (512, 1023),
    (513, 1023),
    (1000, 1023),
    (1024, 2047),
    (1025, 2047),
    (1_000_000, 1_048_575),
    (1_048_576, 1_048_576),
    (1_048_577, 1_048_577),
];

#[test]
fn rent_without_prior_release() {
    let pool = CharBufferPool::new();
    for (requested, expected) in RENT_CASES {
        let buffer = pool.acquire(requested);
        assert_eq!(buffer.capacity(), expected, "acquire({requested})");
    }
}

#[test]
fn rent_after_release() {
    let pool = CharBufferPool::new();
    for (requested, expected) in RENT_CASES.into_iter().chain([(2_000_000, 2_000_000)]) {
        let buffer = pool.acquire(requested);
        pool.release(buffer);
        let buffer = pool.acquire(requested);
        assert_eq!(buffer.capacity(), expected, "acquire({requested}) after release");
    }
}

/// 在池化区间内抽样，容量必须等于 `2^(classify(r)+1) - 1` 且落在已知集合中。
#[test]
fn pooled_capacity_follows_class_formula() {
    let pool = CharBufferPool::new();
    let mut requested = 1usize;
    while requested <= MAX_POOLED_CAPACITY {
        let buffer = pool.acquire(requested);
        let expected = (1usize << (classify(requested) + 1)) - 1;
        assert_eq!(buffer.capacity(), expected);
        assert!(POOLED_CAPACITIES.contains(&buffer.capacity()));
        pool.release(buffer);
        requested = requested * 3 + 1;
    }
}

#[test]
fn oversize_buffers_are_never_reused() {
    let pool = CharBufferPool::new();
    let first = pool.acquire(1_048_576);
    assert!(!first.is_poolable());
    pool.release(first);

    let stats = pool.statistics();
    assert_eq!(stats.idle_buffers, 0, "超大缓冲不应进入自由链表");
    assert_eq!(stats.oversize_discards, 1);

    let second = pool.acquire(1_048_576);
    assert_eq!(second.capacity(), 1_048_576);
    assert_eq!(pool.statistics().oversize_allocations, 2, "第二次租借必须重新分配");
    assert_eq!(pool.statistics().reuses, 0);
}

#[test]
fn identity_reuse_without_intervening_acquire() {
    let pool = CharBufferPool::new();
    let buffer = pool.acquire(2000);
    let address = buffer.as_ptr();
    pool.release(buffer);
    let again = pool.acquire(1500);
    assert_eq!(again.as_ptr(), address);
    assert_eq!(again.capacity(), 2047);
}

#[test]
fn different_classes_do_not_share_buffers() {
    let pool = CharBufferPool::new();
    let small = pool.acquire(100);
    let small_address = small.as_ptr();
    pool.release(small);
    let large = pool.acquire(600);
    assert_ne!(large.as_ptr(), small_address);
    assert_eq!(pool.statistics().idle_in_class(7), 1);
}

#[test]
fn shrink_releases_idle_buffers() {
    let pool = CharBufferPool::new();
    let a = pool.acquire(10);
    let b = pool.acquire(300);
    pool.release(a);
    pool.release(b);
    assert_eq!(pool.statistics().idle_bytes, 255 + 511);

    let reclaimed = pool.shrink_to_fit();
    assert_eq!(reclaimed, 255 + 511);
    let stats = pool.statistics();
    assert_eq!(stats.idle_buffers, 0);
    assert_eq!(stats.idle_bytes, 0);
}

#[test]
fn bounded_pool_from_toml() {
    let config = PoolConfig::from_toml_str("max_idle_per_class = 2").expect("合法配置");
    let pool = CharBufferPool::with_config(config).expect("合法配置");
    let buffers: Vec<_> = (0..4).map(|_| pool.acquire(64)).collect();
    for buffer in buffers {
        pool.release(buffer);
    }
    let stats = pool.statistics();
    assert_eq!(stats.idle_in_class(7), 2);
    assert_eq!(stats.evictions, 2);
}

/// 多线程并发租借、写入、归还：任何时刻都不应出现两个持有者拿到同一块内存。
#[test]
fn concurrent_holders_never_share_a_buffer() {
    let pool = Arc::new(CharBufferPool::new());
    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                for round in 0..200 {
                    let mut held: Vec<_> = (0..4).map(|_| pool.acquire(200)).collect();
                    let addresses: HashSet<usize> =
                        held.iter().map(|buffer| buffer.as_ptr() as usize).collect();
                    assert_eq!(addresses.len(), held.len(), "同一线程内持有的缓冲必须互不相同");
                    let tag = (worker * 31 + round) as u8;
                    for buffer in held.iter_mut() {
                        buffer.as_mut_slice().fill(tag);
                    }
                    for buffer in held.iter() {
                        assert!(buffer.as_slice().iter().all(|byte| *byte == tag), "缓冲被其他持有者改写");
                    }
                    for buffer in held {
                        pool.release(buffer);
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("工作线程不应 panic");
    }

    let stats = pool.statistics();
    assert_eq!(stats.allocations + stats.reuses, 8 * 200 * 4);
    assert_eq!(stats.idle_buffers, stats.allocations, "所有分配过的缓冲最终都应回到自由链表");
}
