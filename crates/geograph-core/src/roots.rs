//! 祖先根集合
//!
//! 每个根节点（自由点、无父变量、以及担任过传播驱动者的节点）分配一个位下标，
//! 节点的祖先根集合用位集表示，并集与成员判断都是按字操作。

use serde::{Deserialize, Serialize};

const WORD_BITS: usize = u64::BITS as usize;

/// 根节点位集
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootSet {
    words: Vec<u64>,
}

impl RootSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 只包含一个根的集合
    pub fn single(bit: usize) -> Self {
        let mut set = Self::new();
        set.insert(bit);
        set
    }

    pub fn insert(&mut self, bit: usize) {
        let word = bit / WORD_BITS;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1 << (bit % WORD_BITS);
    }

    pub fn contains(&self, bit: usize) -> bool {
        self.words
            .get(bit / WORD_BITS)
            .is_some_and(|w| w & (1 << (bit % WORD_BITS)) != 0)
    }

    /// 并入另一集合
    pub fn union_with(&mut self, other: &RootSet) {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        for (w, o) in self.words.iter_mut().zip(&other.words) {
            *w |= o;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_contains() {
        let mut set = RootSet::new();
        assert!(set.is_empty());
        set.insert(3);
        set.insert(130);
        assert!(set.contains(3));
        assert!(set.contains(130));
        assert!(!set.contains(4));
        assert!(!set.contains(1000));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_union() {
        let mut a = RootSet::single(1);
        let b = RootSet::single(70);
        a.union_with(&b);
        assert!(a.contains(1));
        assert!(a.contains(70));

        let mut c = RootSet::single(200);
        c.union_with(&RootSet::single(2));
        assert!(c.contains(2) && c.contains(200));
    }
}
