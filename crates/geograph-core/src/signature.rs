//! 父图元类型签名
//!
//! 每种图元声明一组有序的父图元类型签名。构造图元时逐个提供父图元，
//! 每提供一个就筛掉不再匹配的签名：
//! - 匹配按子类型逆变：签名位置要求`Point`时，`Intersection`也可接受
//! - 剩余签名决定下一个输入应是已有图元还是新建的点

use crate::entity::{EntityKind, EntityType};
use crate::error::{GraphError, GraphResult};

/// 一个完整的父图元类型签名
pub type Signature = &'static [EntityType];

const FREE_POINT: &[Signature] = &[&[]];
const PATH_POINT: &[Signature] = &[&[EntityType::Path]];
const LINE: &[Signature] = &[&[EntityType::Point, EntityType::Point]];
const CIRCLE: &[Signature] = &[&[EntityType::Point, EntityType::Point]];
const INTERSECTION: &[Signature] = &[
    &[EntityType::Path, EntityType::Path],
    &[EntityType::Path, EntityType::Path, EntityType::Variable],
];
const VARIABLE: &[Signature] = &[&[], &[EntityType::Any]];

/// 种类声明的全部签名
pub fn signatures(kind: EntityKind) -> &'static [Signature] {
    match kind {
        EntityKind::FreePoint => FREE_POINT,
        EntityKind::PathPoint => PATH_POINT,
        EntityKind::Line => LINE,
        EntityKind::Circle => CIRCLE,
        EntityKind::Intersection => INTERSECTION,
        EntityKind::Variable => VARIABLE,
    }
}

/// 种类允许的最多父图元数
pub fn max_masters(kind: EntityKind) -> usize {
    signatures(kind).iter().map(|s| s.len()).max().unwrap_or(0)
}

/// 从`admissible`中筛选出在`slot`位置接受`candidate`的签名
pub fn narrow(admissible: &[Signature], slot: usize, candidate: EntityType) -> Vec<Signature> {
    admissible
        .iter()
        .copied()
        .filter(|sig| slot < sig.len() && candidate.is_subtype_of(sig[slot]))
        .collect()
}

/// 在种类的全部签名中筛选出在`slot`位置接受`candidate`的签名
pub fn match_signature(kind: EntityKind, slot: usize, candidate: EntityType) -> Vec<Signature> {
    narrow(signatures(kind), slot, candidate)
}

/// 已有父图元类型序列是否与某个签名的前缀相符
pub fn admits_prefix(kind: EntityKind, types: &[EntityType]) -> bool {
    signatures(kind).iter().any(|sig| {
        types.len() <= sig.len() && types.iter().zip(sig.iter()).all(|(t, s)| t.is_subtype_of(*s))
    })
}

/// 已有父图元类型序列是否完整匹配某个签名
pub fn is_complete(kind: EntityKind, types: &[EntityType]) -> bool {
    signatures(kind).iter().any(|sig| {
        types.len() == sig.len() && types.iter().zip(sig.iter()).all(|(t, s)| t.is_subtype_of(*s))
    })
}

/// 增量构造会话
///
/// 供外部构造流程使用：每次输入一个父图元的类型，逐步缩小可用签名。
#[derive(Debug, Clone)]
pub struct Construction {
    kind: EntityKind,
    admissible: Vec<Signature>,
    fed: Vec<EntityType>,
}

impl Construction {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            admissible: signatures(kind).to_vec(),
            fed: Vec::new(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// 下一个输入所在的位置
    pub fn slot(&self) -> usize {
        self.fed.len()
    }

    /// 下一个位置可接受的类型（去重，按签名顺序）
    pub fn expected(&self) -> Vec<EntityType> {
        let slot = self.slot();
        let mut types = Vec::new();
        for sig in &self.admissible {
            if let Some(t) = sig.get(slot) {
                if !types.contains(t) {
                    types.push(*t);
                }
            }
        }
        types
    }

    /// 下一个输入能否是新建的自由点
    pub fn accepts_new_point(&self) -> bool {
        self.expected()
            .iter()
            .any(|t| EntityType::FreePoint.is_subtype_of(*t))
    }

    /// 输入一个父图元类型；不匹配时会话保持不变
    pub fn feed(&mut self, candidate: EntityType) -> GraphResult<()> {
        let slot = self.slot();
        let narrowed = narrow(&self.admissible, slot, candidate);
        if narrowed.is_empty() {
            return Err(GraphError::TypeMismatch {
                kind: self.kind,
                slot,
                candidate,
            });
        }
        self.admissible = narrowed;
        self.fed.push(candidate);
        Ok(())
    }

    /// 是否已有签名被完整匹配
    pub fn is_complete(&self) -> bool {
        let n = self.fed.len();
        self.admissible.iter().any(|sig| sig.len() == n)
    }
}
