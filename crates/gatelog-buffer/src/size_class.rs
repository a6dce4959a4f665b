//! 尺寸分级（Size Class）计算。
//!
//! # 模块定位（Why）
//! - 池内每个自由链表只存放同一精确容量的缓冲，租借时需要把任意请求容量映射到一个级别；
//! - 分级函数位于热路径上，必须是无状态的纯函数：一次前导零计数加两次比较。
//!
//! # 分级规则（What）
//! - 级别 `c` 对应精确容量 `2^(c+1) - 1`；
//! - 请求容量的最高有效位下标记为 `m`（`0` 视为第 0 位），级别为 `clamp(m, 7, 30)`；
//! - 下限 7 保证最小缓冲为 255 字节；上限 30 保证容量公式不会超出 32 位有符号表示；
//! - 池只跟踪 `7..=19` 级（最大 1,048,575 字节），更高的级别走超大缓冲旁路。

/// 最小级别，对应容量 255。
pub const MIN_CLASS: u32 = 7;

/// 分级函数的通用上限，对应容量 `2^31 - 1`。
pub const UPPER_CLAMP_CLASS: u32 = 30;

/// 池化的最大级别，对应容量 1,048,575。
pub const MAX_POOLED_CLASS: u32 = 19;

/// 池化缓冲的最大容量；超过该值的请求按原尺寸分配且不回收。
pub const MAX_POOLED_CAPACITY: usize = class_capacity(MAX_POOLED_CLASS);

/// 池内自由链表的数量（`MIN_CLASS..=MAX_POOLED_CLASS`）。
pub const POOLED_CLASS_COUNT: usize = (MAX_POOLED_CLASS - MIN_CLASS + 1) as usize;

/// 将请求容量映射为尺寸级别。
///
/// # 契约说明（What）
/// - 对相同输入恒返回相同结果，不依赖任何隐藏状态；
/// - 返回值落在 `[MIN_CLASS, UPPER_CLAMP_CLASS]` 区间；
/// - `0` 与 `1` 均映射为 [`MIN_CLASS`]。
///
/// # 示例
/// ```rust
/// use gatelog_buffer::size_class::classify;
///
/// assert_eq!(classify(255), 7);
/// assert_eq!(classify(256), 8);
/// assert_eq!(classify(2_000_000_000), 30);
/// ```
#[inline]
pub const fn classify(requested: usize) -> u32 {
    let msb = if requested == 0 {
        0
    } else {
        usize::BITS - 1 - requested.leading_zeros()
    };
    if msb < MIN_CLASS {
        MIN_CLASS
    } else if msb > UPPER_CLAMP_CLASS {
        UPPER_CLAMP_CLASS
    } else {
        msb
    }
}

/// 返回级别 `class` 的精确容量 `2^(class+1) - 1`。
///
/// 调用方需保证 `class <= UPPER_CLAMP_CLASS`。
#[inline]
pub const fn class_capacity(class: u32) -> usize {
    (1usize << (class + 1)) - 1
}

/// 请求容量是否走池化路径；超大请求返回 `None`。
#[inline]
pub const fn pooled_class(requested: usize) -> Option<u32> {
    let class = classify(requested);
    if class > MAX_POOLED_CLASS {
        None
    } else {
        Some(class)
    }
}

/// 反查：仅当 `capacity` 恰好等于某个池化级别的精确容量时返回该级别。
///
/// 回收路径依赖此函数维持“自由链表内容量一致”的不变量，
/// 因此不做任何向上或向下取整。
#[inline]
pub const fn class_for_capacity(capacity: usize) -> Option<u32> {
    if capacity > MAX_POOLED_CAPACITY {
        return None;
    }
    let class = classify(capacity);
    if class_capacity(class) == capacity {
        Some(class)
    } else {
        None
    }
}

/// 级别到自由链表下标的换算。
#[inline]
pub(crate) const fn slot_index(class: u32) -> usize {
    (class - MIN_CLASS) as usize
}
