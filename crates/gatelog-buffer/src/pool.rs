use alloc::{sync::Arc, vec::Vec};
use core::mem;
use std::sync::OnceLock;

use crate::{
    buffer::{CharBuffer, class_matches_capacity},
    config::PoolConfig,
    error::{ConfigError, PoolError},
    metrics::{PoolMetrics, PoolStats},
    size_class::{POOLED_CLASS_COUNT, class_capacity, pooled_class, slot_index},
    sync::FreeListLock,
};

const TRACE_TARGET: &str = "gatelog::pool";

static SHARED_POOL: OnceLock<CharBufferPool> = OnceLock::new();

/// `CharBufferPool` 是按尺寸分级的字符缓冲池。
///
/// # 模块角色（Why）
/// - 消息构建器在首次写入与每次扩容时都需要一块更大的缓冲；若每次直接向堆申请，
///   高频日志路径会被分配器主导；
/// - 池为 `7..=19` 每个级别维护一条自由链表，把“用完即还”的缓冲留给下一次同级别租借。
///
/// # 核心机制（How）
/// - 每个级别一把 `spin::Mutex<Vec<CharBuffer>>`，不同级别的租借互不争用；
/// - 租借：请求容量经 [`classify`](crate::size_class::classify) 定级，命中则弹出（内容不清零），
///   未命中则按级别精确容量新建；超过 1,048,575 的请求按原尺寸分配并标记为不可池化；
/// - 归还：可池化缓冲压回对应链表，超大缓冲直接丢弃；若配置了闲置上限且链表已满，则驱逐本次归还的缓冲；
/// - `PoolMetrics` 以原子计数记录命中、未命中、驱逐等，[`statistics`](Self::statistics) 生成快照。
///
/// # 契约说明（What）
/// - **线程安全**：任意线程可并发租借与归还；同一缓冲不会同时交给两个持有者，也不会丢失；
/// - **后置条件**：`acquire(r).capacity() >= r`；池化路径下容量恰为级别容量而非 `r`；
/// - `release` 以值接收缓冲，重复归还与归还后继续使用在编译期即不可表达。
///
/// # 设计权衡（Trade-offs）
/// - 使用自旋锁而非 `parking_lot`：临界区只有一次 `Vec::push/pop`，持锁时间极短；
/// - 默认不限制闲置深度，每级常驻的闲置缓冲数等于该级别的历史并发峰值；
///   需要约束常驻内存时通过 [`PoolConfig::bounded`] 设置上限。
#[derive(Clone)]
pub struct CharBufferPool {
    inner: Arc<PoolInner>,
}

impl Default for CharBufferPool {
    fn default() -> Self {
        Self::from_validated(PoolConfig::default())
    }
}

impl CharBufferPool {
    /// 创建不限制闲置深度的空池。
    pub fn new() -> Self {
        Self::default()
    }

    /// 按给定配置创建空池，配置非法时返回错误。
    pub fn with_config(config: PoolConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: PoolConfig) -> Self {
        Self {
            inner: Arc::new(PoolInner::new(config)),
        }
    }

    /// 进程级默认池，首次访问时以默认配置惰性初始化。
    pub fn shared() -> &'static CharBufferPool {
        SHARED_POOL.get_or_init(CharBufferPool::new)
    }

    /// 当前池使用的配置。
    pub fn config(&self) -> PoolConfig {
        self.inner.config
    }

    /// 租借一块容量不小于 `requested` 的缓冲。
    ///
    /// # 契约
    /// - `requested == 0` 按最小级别处理，返回 255 字节缓冲；
    /// - 复用的缓冲保留旧内容，调用方只能信任自己写入的前缀；
    /// - 分配失败沿用宿主默认行为（终止进程），需要可恢复语义时使用 [`try_acquire`](Self::try_acquire)。
    pub fn acquire(&self, requested: usize) -> CharBuffer {
        match pooled_class(requested) {
            Some(class) => {
                if let Some(buffer) = self.inner.pop(class) {
                    return buffer;
                }
                self.inner.metrics.record_allocation();
                tracing::trace!(
                    target: TRACE_TARGET,
                    class,
                    capacity = class_capacity(class),
                    "free list empty, allocating pooled buffer"
                );
                CharBuffer::for_class(class)
            }
            None => {
                self.inner.metrics.record_oversize_allocation();
                tracing::debug!(
                    target: TRACE_TARGET,
                    requested,
                    "oversize request bypasses the pool"
                );
                CharBuffer::oversize(requested)
            }
        }
    }

    /// [`acquire`](Self::acquire) 的可失败版本：分配失败时返回 [`PoolError::AllocationFailed`]。
    pub fn try_acquire(&self, requested: usize) -> Result<CharBuffer, PoolError> {
        match pooled_class(requested) {
            Some(class) => {
                if let Some(buffer) = self.inner.pop(class) {
                    return Ok(buffer);
                }
                let buffer = CharBuffer::try_for_class(class)?;
                self.inner.metrics.record_allocation();
                Ok(buffer)
            }
            None => {
                let buffer = CharBuffer::try_oversize(requested)?;
                self.inner.metrics.record_oversize_allocation();
                Ok(buffer)
            }
        }
    }

    /// 归还缓冲。
    ///
    /// - 可池化缓冲压回所属级别，内容不做清理；
    /// - 超大缓冲直接释放；
    /// - 若链表已达闲置上限，本次归还的缓冲被驱逐。
    pub fn release(&self, buffer: CharBuffer) {
        debug_assert!(class_matches_capacity(&buffer));
        let Some(class) = buffer.class() else {
            self.inner.metrics.record_oversize_discard();
            tracing::trace!(
                target: TRACE_TARGET,
                capacity = buffer.capacity(),
                "discarding oversize buffer"
            );
            return;
        };

        let capacity = buffer.capacity();
        let limit = self.inner.config.max_idle_per_class;
        let outcome = self.inner.free_lists[slot_index(class)].with(|list| {
            if limit.is_some_and(|limit| list.len() >= limit) {
                Err(buffer)
            } else {
                list.push(buffer);
                Ok(())
            }
        });

        match outcome {
            Ok(()) => self.inner.metrics.record_retained(capacity),
            Err(evicted) => {
                self.inner.metrics.record_eviction();
                tracing::debug!(
                    target: TRACE_TARGET,
                    class,
                    capacity,
                    "free list at idle bound, evicting released buffer"
                );
                drop(evicted);
            }
        }
    }

    /// 清空全部自由链表，返回释放的字节数。
    pub fn shrink_to_fit(&self) -> usize {
        let mut reclaimed = 0usize;
        for lock in self.inner.free_lists.iter() {
            let drained = lock.with(mem::take);
            reclaimed += drained.iter().map(CharBuffer::capacity).sum::<usize>();
        }
        self.inner.metrics.record_shrink(reclaimed);
        tracing::debug!(target: TRACE_TARGET, reclaimed, "free lists drained");
        reclaimed
    }

    /// 生成统计快照。
    pub fn statistics(&self) -> PoolStats {
        let mut idle = [0usize; POOLED_CLASS_COUNT];
        for (slot, lock) in idle.iter_mut().zip(self.inner.free_lists.iter()) {
            *slot = lock.with(|list| list.len());
        }
        self.inner.metrics.snapshot(idle)
    }
}

struct PoolInner {
    free_lists: [FreeListLock<Vec<CharBuffer>>; POOLED_CLASS_COUNT],
    config: PoolConfig,
    metrics: PoolMetrics,
}

impl PoolInner {
    fn new(config: PoolConfig) -> Self {
        Self {
            free_lists: core::array::from_fn(|_| FreeListLock::new(Vec::new())),
            config,
            metrics: PoolMetrics::new(),
        }
    }

    /// 从级别 `class` 的自由链表弹出一块缓冲，命中时更新统计。
    fn pop(&self, class: u32) -> Option<CharBuffer> {
        let reused = self.free_lists[slot_index(class)].with(Vec::pop)?;
        self.metrics.record_reuse(reused.capacity());
        Some(reused)
    }
}
