//! 同步原语切换层。
//!
//! # 设计缘起（Why）
//! - 自由链表与统计计数是池内仅有的共享可变状态，模型检查需要接管它们的全部调度点；
//!
//! # 实现方式（How）
//! - `--cfg loom`（或 `--cfg gatelog_loom`）下使用 loom 的互斥锁与原子类型，穷举自由链表上的交错；
//! - 常规构建使用 `spin::Mutex` 与 `core` 原子类型，临界区内不触发阻塞系统调用。
#[cfg(any(loom, gatelog_loom))]
pub(crate) use loom::sync::atomic::{AtomicUsize, Ordering};
#[cfg(not(any(loom, gatelog_loom)))]
pub(crate) use core::sync::atomic::{AtomicUsize, Ordering};

/// 自由链表所用的互斥容器，屏蔽 `spin` 与 `loom` 的 API 差异。
pub(crate) struct FreeListLock<T> {
    #[cfg(not(any(loom, gatelog_loom)))]
    inner: spin::Mutex<T>,
    #[cfg(any(loom, gatelog_loom))]
    inner: loom::sync::Mutex<T>,
}

impl<T> FreeListLock<T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            #[cfg(not(any(loom, gatelog_loom)))]
            inner: spin::Mutex::new(value),
            #[cfg(any(loom, gatelog_loom))]
            inner: loom::sync::Mutex::new(value),
        }
    }

    /// 在持锁状态下执行 `f`，锁在闭包返回后立即释放。
    #[cfg(not(any(loom, gatelog_loom)))]
    pub(crate) fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut *guard)
    }

    #[cfg(any(loom, gatelog_loom))]
    pub(crate) fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut *guard)
    }
}
