//! 线程内的默认日志器。
//!
//! # 设计缘起（Why）
//! - 宏调用点往往拿不到日志句柄；与其维护进程级可变的全局目标，不如在调用栈上安装作用域化的默认值，
//!   作用域结束（包括 panic 展开）即恢复先前的日志器；
//! - 每个线程独立持有自己的默认值，测试之间互不干扰。
//!
//! # 契约说明（What）
//! - [`set_default`] 返回的 [`ScopeGuard`] 析构时恢复旧值，守卫可以嵌套，但必须按后进先出顺序析构；
//! - [`with_current`] 在借用期间调用闭包，闭包内不得再安装新的默认日志器；
//! - 守卫不可跨线程移动。

use core::{cell::RefCell, fmt, marker::PhantomData};

use crate::logger::Logger;

std::thread_local! {
    static CURRENT: RefCell<Option<Logger>> = const { RefCell::new(None) };
}

/// 把 `logger` 安装为当前线程的默认日志器，直到返回的守卫被析构。
pub fn set_default(logger: Logger) -> ScopeGuard {
    let previous = CURRENT.with(|slot| slot.replace(Some(logger)));
    ScopeGuard {
        previous,
        _not_send: PhantomData,
    }
}

/// 在 `logger` 作为默认日志器的作用域内执行 `f`。
pub fn with_logger<R>(logger: Logger, f: impl FnOnce() -> R) -> R {
    let _guard = set_default(logger);
    f()
}

/// 返回当前线程默认日志器的克隆。
pub fn current() -> Option<Logger> {
    CURRENT.try_with(|slot| slot.borrow().clone()).ok().flatten()
}

/// 以借用方式访问当前默认日志器，避免克隆句柄。
pub fn with_current<R>(f: impl FnOnce(Option<&Logger>) -> R) -> R {
    CURRENT.with(|slot| f(slot.borrow().as_ref()))
}

/// 默认日志器的作用域守卫。
#[must_use = "守卫析构时立即恢复先前的默认日志器"]
pub struct ScopeGuard {
    previous: Option<Logger>,
    _not_send: PhantomData<*const ()>,
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        let _ = CURRENT.try_with(|slot| *slot.borrow_mut() = previous);
    }
}

impl fmt::Debug for ScopeGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeGuard")
            .field("restores", &self.previous.is_some())
            .finish()
    }
}
