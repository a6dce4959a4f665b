//! 延迟格式化的消息构建器。
//!
//! # 设计缘起（Why）
//! - 调用点以“字面量片段 + 待格式化参数”的形式描述一条消息，构建器负责在门控放行后才真正拼接；
//! - 被抑制的构建器不持有缓冲，所有追加操作立即返回，最终产出空字符串；
//! - 拼接过程的中间存储全部向 [`CharBufferPool`] 租借，消息完成后立即归还，稳态下不产生堆分配
//!   （最终交给日志目标的 `String` 除外）。
//!
//! # 状态机（How）
//! - `Suppressed`：构造时门控未通过，终态；
//! - `Building`：持有一块缓冲与已写入长度；
//! - 完成：`finish(self)` 消耗构建器，借用检查器保证完成后不会再追加或再次完成。
//!
//! # 风险提示（Trade-offs）
//! - 缓冲容量以 UTF-8 字节计，多字节字符会比按字符计数更早触发扩容；
//! - 对齐宽度按 `char` 计数，与 `format!` 的 `{:>N}` 语义保持一致。

use alloc::string::String;
use core::{fmt, mem, str};

use gatelog_buffer::{CharBuffer, CharBufferPool};

use crate::{gate::should_log, level::LogLevel};

/// 每个格式化占位符的预估长度，用于计算初始容量。
pub const GUESSED_LENGTH_PER_HOLE: usize = 11;

/// 根据字面量长度与占位符数量估算初始容量。
#[inline]
pub const fn capacity_hint(literal_len: usize, formatted_count: usize) -> usize {
    literal_len.saturating_add(formatted_count.saturating_mul(GUESSED_LENGTH_PER_HOLE))
}

/// 级别门控的消息构建器。
///
/// # 契约说明（What）
/// - **前置条件**：`pool` 的生命周期覆盖构建器；
/// - **后置条件**：无论以 `finish` 结束还是被直接丢弃，租借的缓冲都会归还到 `pool`；
/// - 被抑制时不会调用 `pool` 的任何方法。
///
/// # 使用示例
/// ```
/// use gatelog_buffer::CharBufferPool;
/// use gatelog_core::{LogLevel, MessageBuilder};
///
/// let pool = CharBufferPool::new();
/// let mut builder = MessageBuilder::new(9, 1, LogLevel::Info, LogLevel::Warning, &pool);
/// builder.append_literal("attempt #");
/// builder.append_formatted(&3);
/// assert_eq!(builder.finish(), "attempt #3");
/// ```
pub struct MessageBuilder<'p> {
    level: LogLevel,
    state: BuilderState<'p>,
}

enum BuilderState<'p> {
    Suppressed,
    Building(Active<'p>),
}

struct Active<'p> {
    pool: &'p CharBufferPool,
    buffer: CharBuffer,
    len: usize,
}

impl<'p> MessageBuilder<'p> {
    /// 创建构建器；门控在此处一次性决定，之后阈值变化不影响本条消息。
    pub fn new(
        literal_len: usize,
        formatted_count: usize,
        threshold: LogLevel,
        level: LogLevel,
        pool: &'p CharBufferPool,
    ) -> Self {
        if !should_log(threshold, level) {
            return Self::suppressed(level);
        }
        let buffer = pool.acquire(capacity_hint(literal_len, formatted_count));
        Self {
            level,
            state: BuilderState::Building(Active {
                pool,
                buffer,
                len: 0,
            }),
        }
    }

    /// 直接构造一个被抑制的构建器。
    pub const fn suppressed(level: LogLevel) -> Self {
        Self {
            level,
            state: BuilderState::Suppressed,
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        matches!(self.state, BuilderState::Building(_))
    }

    #[inline]
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// 已写入的字节数；被抑制时恒为 0。
    pub fn len(&self) -> usize {
        match &self.state {
            BuilderState::Suppressed => 0,
            BuilderState::Building(active) => active.len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 当前持有缓冲的容量；被抑制时为 0。
    pub fn capacity(&self) -> usize {
        match &self.state {
            BuilderState::Suppressed => 0,
            BuilderState::Building(active) => active.buffer.capacity(),
        }
    }

    /// 查看已构建的文本而不结束构建。
    pub fn as_str(&self) -> &str {
        match &self.state {
            BuilderState::Suppressed => "",
            BuilderState::Building(active) => active.as_str(),
        }
    }

    pub fn append_literal(&mut self, literal: &str) {
        if let BuilderState::Building(active) = &mut self.state {
            active.push_bytes(literal.as_bytes());
        }
    }

    /// 追加一个格式化值；被抑制时不会调用 `value` 的 `Display` 实现。
    pub fn append_formatted<T: fmt::Display + ?Sized>(&mut self, value: &T) {
        if self.is_enabled() {
            // 写入自身永不失败，错误只可能来自 `Display` 实现，此时保留已写入的部分。
            let _ = fmt::Write::write_fmt(self, format_args!("{value}"));
        }
    }

    /// 追加一个带对齐宽度的格式化值。
    ///
    /// - `alignment > 0`：右对齐，左侧补空格至 `alignment` 个字符；
    /// - `alignment < 0`：左对齐，右侧补空格至 `|alignment|` 个字符；
    /// - 值本身已达到宽度时不补齐，也不截断。
    pub fn append_aligned<T: fmt::Display + ?Sized>(&mut self, value: &T, alignment: isize) {
        let start = match &self.state {
            BuilderState::Suppressed => return,
            BuilderState::Building(active) => active.len,
        };
        let _ = fmt::Write::write_fmt(self, format_args!("{value}"));

        let BuilderState::Building(active) = &mut self.state else {
            return;
        };
        let written = &active.buffer.as_slice()[start..active.len];
        let chars = str::from_utf8(written).map_or(written.len(), |text| text.chars().count());
        let width = alignment.unsigned_abs();
        if chars >= width {
            return;
        }
        let padding = width - chars;
        if alignment < 0 {
            active.push_spaces(padding);
        } else {
            active.insert_spaces(start, padding);
        }
    }

    /// 追加 `format_args!` 产出的参数，支持完整的格式说明符。
    pub fn append_args(&mut self, args: fmt::Arguments<'_>) {
        if self.is_enabled() {
            let _ = fmt::Write::write_fmt(self, args);
        }
    }

    /// 结束构建并产出独立的字符串，同时把缓冲归还到池中。
    ///
    /// 被抑制的构建器返回不分配内存的空 `String`。
    pub fn finish(mut self) -> String {
        match mem::replace(&mut self.state, BuilderState::Suppressed) {
            BuilderState::Suppressed => String::new(),
            BuilderState::Building(active) => active.into_string(),
        }
    }
}

impl fmt::Write for MessageBuilder<'_> {
    fn write_str(&mut self, fragment: &str) -> fmt::Result {
        self.append_literal(fragment);
        Ok(())
    }
}

impl Drop for MessageBuilder<'_> {
    fn drop(&mut self) {
        if let BuilderState::Building(active) = mem::replace(&mut self.state, BuilderState::Suppressed) {
            active.release();
        }
    }
}

impl fmt::Debug for MessageBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBuilder")
            .field("level", &self.level)
            .field("enabled", &self.is_enabled())
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl<'p> Active<'p> {
    fn as_str(&self) -> &str {
        let written = &self.buffer.as_slice()[..self.len];
        debug_assert!(str::from_utf8(written).is_ok());
        str::from_utf8(written).unwrap_or_default()
    }

    fn push_bytes(&mut self, bytes: &[u8]) {
        let end = self.reserve(bytes.len());
        self.buffer.as_mut_slice()[self.len..end].copy_from_slice(bytes);
        self.len = end;
    }

    fn push_spaces(&mut self, count: usize) {
        let end = self.reserve(count);
        self.buffer.as_mut_slice()[self.len..end].fill(b' ');
        self.len = end;
    }

    /// 在 `at` 处插入 `count` 个空格，`at..len` 的内容整体后移。
    fn insert_spaces(&mut self, at: usize, count: usize) {
        let end = self.reserve(count);
        let slice = self.buffer.as_mut_slice();
        slice.copy_within(at..self.len, at + count);
        slice[at..at + count].fill(b' ');
        self.len = end;
    }

    /// 确保还能写入 `additional` 字节，返回写入后的结束位置。
    fn reserve(&mut self, additional: usize) -> usize {
        let required = self.len.saturating_add(additional);
        if required > self.buffer.capacity() {
            self.grow(required);
        }
        required
    }

    /// 换用更大的缓冲：容量至少翻倍，已写入内容原样复制，旧缓冲归还池中。
    fn grow(&mut self, required: usize) {
        let target = required.max(self.buffer.capacity().saturating_mul(2));
        let mut next = self.pool.acquire(target);
        next.as_mut_slice()[..self.len].copy_from_slice(&self.buffer.as_slice()[..self.len]);
        let previous = mem::replace(&mut self.buffer, next);
        self.pool.release(previous);
    }

    fn into_string(self) -> String {
        let text = String::from(self.as_str());
        self.release();
        text
    }

    fn release(self) {
        self.pool.release(self.buffer);
    }
}
