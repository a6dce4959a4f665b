use alloc::{boxed::Box, vec::Vec};
use core::fmt;

use crate::{
    error::PoolError,
    size_class::{class_capacity, class_for_capacity},
};

/// `CharBuffer` 是由 [`CharBufferPool`](crate::CharBufferPool) 发放的定长字符存储块。
///
/// # 设计初衷（Why）
/// - 消息构建器需要一块可随机写入、容量固定的连续内存，并在用完后原样交还给池；
/// - 与 `Vec<u8>` 不同，这里的“长度”永远等于容量：是否为有效内容由持有者自己的写游标决定，
///   这样复用时无需清零，也不会被 `Vec` 的长度语义误导。
///
/// # 契约说明（What）
/// - 存储单元为 UTF-8 编码单元（字节），容量以字节计；
/// - **不保证清零**：复用的缓冲保留上一位持有者写入的字节，持有者必须把游标之后的内容视为垃圾；
/// - 所有权独占：缓冲要么在池中闲置，要么被唯一一个构建器持有；
///   `release` 以值接收缓冲，重复归还在编译期即被拒绝；
/// - `class` 为 `Some` 表示可池化（容量恰为该级别的精确容量），`None` 表示超大缓冲。
pub struct CharBuffer {
    storage: Box<[u8]>,
    class: Option<u32>,
}

impl CharBuffer {
    /// 为池化级别分配新缓冲，容量恰为 `class_capacity(class)`。
    pub(crate) fn for_class(class: u32) -> Self {
        Self {
            storage: zeroed_storage(class_capacity(class)),
            class: Some(class),
        }
    }

    /// 分配精确尺寸的超大缓冲，释放时直接丢弃。
    pub(crate) fn oversize(capacity: usize) -> Self {
        Self {
            storage: zeroed_storage(capacity),
            class: None,
        }
    }

    /// 可失败版本：分配失败时返回 [`PoolError::AllocationFailed`] 而非终止进程。
    pub(crate) fn try_for_class(class: u32) -> Result<Self, PoolError> {
        Ok(Self {
            storage: try_zeroed_storage(class_capacity(class))?,
            class: Some(class),
        })
    }

    pub(crate) fn try_oversize(capacity: usize) -> Result<Self, PoolError> {
        Ok(Self {
            storage: try_zeroed_storage(capacity)?,
            class: None,
        })
    }

    /// 缓冲的精确容量（字节）。
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// 所属尺寸级别；超大缓冲返回 `None`。
    #[inline]
    pub fn class(&self) -> Option<u32> {
        self.class
    }

    /// 是否会在归还后被池保留。
    #[inline]
    pub fn is_poolable(&self) -> bool {
        self.class.is_some()
    }

    /// 底层存储的起始地址，仅用于判断两次租借是否为同一块内存。
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.storage.as_ptr()
    }

    /// 整块存储的只读视图，包含可能残留的旧内容。
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.storage
    }

    /// 整块存储的可写视图。
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.storage
    }
}

impl fmt::Debug for CharBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CharBuffer")
            .field("capacity", &self.capacity())
            .field("class", &self.class)
            .finish()
    }
}

fn zeroed_storage(capacity: usize) -> Box<[u8]> {
    alloc::vec![0u8; capacity].into_boxed_slice()
}

fn try_zeroed_storage(capacity: usize) -> Result<Box<[u8]>, PoolError> {
    let mut storage = Vec::new();
    storage
        .try_reserve_exact(capacity)
        .map_err(|source| PoolError::AllocationFailed {
            requested: capacity,
            source,
        })?;
    storage.resize(capacity, 0u8);
    Ok(storage.into_boxed_slice())
}

/// 校验缓冲的级别标记与容量一致，供归还路径在调试构建中断言。
#[inline]
pub(crate) fn class_matches_capacity(buffer: &CharBuffer) -> bool {
    match buffer.class {
        Some(class) => class_for_capacity(buffer.capacity()) == Some(class),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_buffers_have_exact_capacity() {
        let buffer = CharBuffer::for_class(8);
        assert_eq!(buffer.capacity(), 511);
        assert_eq!(buffer.class(), Some(8));
        assert!(class_matches_capacity(&buffer));
    }

    #[test]
    fn oversize_buffers_are_not_poolable() {
        let buffer = CharBuffer::oversize(2_000_000);
        assert_eq!(buffer.capacity(), 2_000_000);
        assert!(!buffer.is_poolable());
    }

    #[test]
    fn fallible_allocation_reports_capacity() {
        let err = CharBuffer::try_oversize(usize::MAX).expect_err("无法分配 usize::MAX 字节");
        match err {
            PoolError::AllocationFailed { requested, .. } => assert_eq!(requested, usize::MAX),
        }
    }
}
