//! 点标签分配
//!
//! 标签按`A`..`Z`、`A_1`..`Z_1`、`A_2`……的顺序枚举，取第一个未被占用的。

use crate::error::{GraphError, GraphResult};
use std::collections::HashSet;

const LETTERS: u32 = 26;

/// 标签分配器，每个文档持有一个
#[derive(Debug, Clone, Default)]
pub struct LabelAllocator {
    labels: HashSet<String>,
}

impl LabelAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 第n个候选标签
    fn nth(n: u32) -> String {
        let letter = char::from(b'A' + (n % LETTERS) as u8);
        match n / LETTERS {
            0 => letter.to_string(),
            round => format!("{}_{}", letter, round),
        }
    }

    /// 下一个可用标签，不会自动占用
    pub fn next_label(&self) -> String {
        (0..)
            .map(Self::nth)
            .find(|label| !self.labels.contains(label))
            .unwrap_or_default()
    }

    /// 占用一个标签
    pub fn add(&mut self, label: &str) -> GraphResult<()> {
        if !self.labels.insert(label.to_string()) {
            return Err(GraphError::LabelTaken(label.to_string()));
        }
        Ok(())
    }

    /// 把已占用的`raw`改为`label`；改为自身总是成功
    pub fn rename(&mut self, raw: &str, label: &str) -> GraphResult<()> {
        if raw == label {
            return Ok(());
        }
        if self.labels.contains(label) {
            return Err(GraphError::LabelTaken(label.to_string()));
        }
        self.labels.remove(raw);
        self.labels.insert(label.to_string());
        Ok(())
    }

    /// 释放标签，返回标签原先是否被占用
    pub fn remove(&mut self, label: &str) -> bool {
        self.labels.remove(label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
