//! 结构性错误定义
//!
//! 几何上的"未定义"（平行线、相离等）不是错误，用 [`crate::number::Num::UNDEFINED`] 表示。
//! 这里只包含图结构操作失败的情况，失败时图保持不变。

use crate::entity::{EntityKind, EntityType, NodeId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("{kind:?} node {node} already has its maximum of {max} masters")]
    InvalidArity {
        node: NodeId,
        kind: EntityKind,
        max: usize,
    },

    #[error("linking {master} as a master of {node} would create a cycle")]
    CyclicDependency { node: NodeId, master: NodeId },

    #[error("{kind:?} does not accept {candidate:?} at master slot {slot}")]
    TypeMismatch {
        kind: EntityKind,
        slot: usize,
        candidate: EntityType,
    },

    #[error("{kind:?} needs more masters than the {given} supplied")]
    IncompleteSignature { kind: EntityKind, given: usize },

    #[error("circle-circle intersections are not supported")]
    UnsupportedIntersection,

    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Node {0} has been removed")]
    Unavailable(NodeId),

    #[error("Node {0} cannot be moved directly")]
    NotMovable(NodeId),

    #[error("Node {0} is not a variable")]
    NotAVariable(NodeId),

    #[error("Label already in use: {0}")]
    LabelTaken(String),
}

pub type GraphResult<T> = Result<T, GraphError>;
