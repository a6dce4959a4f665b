#![cfg(not(any(loom, gatelog_loom)))]

//! 尺寸分级的性质测试。
//!
//! - **Why**：分级函数决定自由链表的容量不变量，任何越界或非单调都会让池把缓冲放错链表；
//! - **How**：用 proptest 在全 `usize` 与池化区间内随机取样，分别断言区间、容量覆盖与单调性；
//! - **What**：池化区间内 `class_capacity(classify(r)) >= r`，且容量是 `2^(c+1)-1` 形式。

use gatelog_buffer::{
    CharBufferPool,
    size_class::{
        MAX_POOLED_CAPACITY, MIN_CLASS, UPPER_CLAMP_CLASS, class_capacity, class_for_capacity,
        classify, pooled_class,
    },
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn class_stays_within_clamp(requested in any::<usize>()) {
        let class = classify(requested);
        prop_assert!((MIN_CLASS..=UPPER_CLAMP_CLASS).contains(&class));
    }

    #[test]
    fn pooled_capacity_covers_request(requested in 0usize..=MAX_POOLED_CAPACITY) {
        let class = pooled_class(requested).expect("池化区间内必然有级别");
        let capacity = class_capacity(class);
        prop_assert!(capacity >= requested);
        prop_assert_eq!(class_for_capacity(capacity), Some(class));
    }

    #[test]
    fn classify_is_monotonic(a in any::<usize>(), b in any::<usize>()) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(classify(low) <= classify(high));
    }

    #[test]
    fn oversize_requests_are_exact(extra in 1usize..4096) {
        let pool = CharBufferPool::new();
        let requested = MAX_POOLED_CAPACITY + extra;
        prop_assert_eq!(pooled_class(requested), None);
        let buffer = pool.acquire(requested);
        prop_assert_eq!(buffer.capacity(), requested);
    }
}
