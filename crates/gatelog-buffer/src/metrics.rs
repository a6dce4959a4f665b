use crate::{
    size_class::{MIN_CLASS, POOLED_CLASS_COUNT},
    sync::{AtomicUsize, Ordering},
};

/// 池统计的只读快照。
///
/// # 字段语义（What）
/// - `allocations`：池化级别上的新分配次数（自由链表未命中）；
/// - `reuses`：自由链表命中次数；
/// - `releases`：归还次数（含被丢弃的超大缓冲与被驱逐的缓冲）；
/// - `oversize_allocations` / `oversize_discards`：超大缓冲旁路的分配与丢弃；
/// - `evictions`：因闲置上限而被丢弃的池化缓冲；
/// - `idle_buffers` / `idle_bytes`：快照时刻仍在自由链表中的缓冲数量与总容量；
/// - `idle_per_class`：按级别展开的闲置数量，下标 0 对应级别 7。
///
/// 计数器使用 `Relaxed` 序，快照不保证各字段之间的瞬时一致性。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub allocations: usize,
    pub reuses: usize,
    pub releases: usize,
    pub oversize_allocations: usize,
    pub oversize_discards: usize,
    pub evictions: usize,
    pub idle_buffers: usize,
    pub idle_bytes: usize,
    pub idle_per_class: [usize; POOLED_CLASS_COUNT],
}

impl PoolStats {
    /// 查询指定级别的闲置数量；超出池化范围返回 0。
    pub fn idle_in_class(&self, class: u32) -> usize {
        class
            .checked_sub(MIN_CLASS)
            .and_then(|offset| self.idle_per_class.get(offset as usize))
            .copied()
            .unwrap_or_default()
    }
}

pub(crate) struct PoolMetrics {
    allocations: AtomicUsize,
    reuses: AtomicUsize,
    releases: AtomicUsize,
    oversize_allocations: AtomicUsize,
    oversize_discards: AtomicUsize,
    evictions: AtomicUsize,
    idle_bytes: AtomicUsize,
}

impl PoolMetrics {
    pub(crate) fn new() -> Self {
        Self {
            allocations: AtomicUsize::new(0),
            reuses: AtomicUsize::new(0),
            releases: AtomicUsize::new(0),
            oversize_allocations: AtomicUsize::new(0),
            oversize_discards: AtomicUsize::new(0),
            evictions: AtomicUsize::new(0),
            idle_bytes: AtomicUsize::new(0),
        }
    }

    pub(crate) fn record_allocation(&self) {
        self.allocations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_reuse(&self, capacity: usize) {
        self.reuses.fetch_add(1, Ordering::Relaxed);
        saturating_sub(&self.idle_bytes, capacity);
    }

    pub(crate) fn record_oversize_allocation(&self) {
        self.oversize_allocations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_retained(&self, capacity: usize) {
        self.releases.fetch_add(1, Ordering::Relaxed);
        self.idle_bytes.fetch_add(capacity, Ordering::Relaxed);
    }

    pub(crate) fn record_oversize_discard(&self) {
        self.releases.fetch_add(1, Ordering::Relaxed);
        self.oversize_discards.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_eviction(&self) {
        self.releases.fetch_add(1, Ordering::Relaxed);
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_shrink(&self, reclaimed: usize) {
        saturating_sub(&self.idle_bytes, reclaimed);
    }

    pub(crate) fn snapshot(&self, idle_per_class: [usize; POOLED_CLASS_COUNT]) -> PoolStats {
        PoolStats {
            allocations: self.allocations.load(Ordering::Relaxed),
            reuses: self.reuses.load(Ordering::Relaxed),
            releases: self.releases.load(Ordering::Relaxed),
            oversize_allocations: self.oversize_allocations.load(Ordering::Relaxed),
            oversize_discards: self.oversize_discards.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            idle_buffers: idle_per_class.iter().sum(),
            idle_bytes: self.idle_bytes.load(Ordering::Relaxed),
            idle_per_class,
        }
    }
}

fn saturating_sub(target: &AtomicUsize, value: usize) {
    let _ = target.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
        Some(current.saturating_sub(value))
    });
}
