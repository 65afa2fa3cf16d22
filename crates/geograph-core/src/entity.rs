//! 图元种类与派生值
//!
//! 采用标签枚举表示图元种类：
//! - `EntityKind`: 节点的具体种类
//! - `EntityType`: 签名匹配使用的类型格，包含抽象类型`Point`、`Path`、`Any`
//! - `EntityData`: 各种类节点自身持有的原始状态
//! - `Value`: 求解器计算出的派生值

use crate::geometry::{CircleValue, LineCoeffs, Pos};
use crate::number::Num;
use crate::solver::IntersectionMode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 节点句柄
///
/// 图内的稳定下标，同一张图中不会复用。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 图元种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// 自由点，可直接拖动
    FreePoint,
    /// 路径上的点，位置为原始坐标在路径上的垂足
    PathPoint,
    /// 线段（按直线求解）
    Line,
    /// 圆，父图元为圆心与圆上一点
    Circle,
    /// 两路径的交点
    Intersection,
    /// 标量变量
    Variable,
}

impl EntityKind {
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::FreePoint => "FreePoint",
            EntityKind::PathPoint => "PathPoint",
            EntityKind::Line => "Line",
            EntityKind::Circle => "Circle",
            EntityKind::Intersection => "Intersection",
            EntityKind::Variable => "Variable",
        }
    }

    /// 种类对应的具体类型
    pub fn entity_type(&self) -> EntityType {
        match self {
            EntityKind::FreePoint => EntityType::FreePoint,
            EntityKind::PathPoint => EntityType::PathPoint,
            EntityKind::Line => EntityType::Line,
            EntityKind::Circle => EntityType::Circle,
            EntityKind::Intersection => EntityType::Intersection,
            EntityKind::Variable => EntityType::Variable,
        }
    }

    pub fn is_point(&self) -> bool {
        self.entity_type().is_subtype_of(EntityType::Point)
    }

    pub fn is_path(&self) -> bool {
        self.entity_type().is_subtype_of(EntityType::Path)
    }
}

/// 签名匹配用的类型格
///
/// ```text
/// Any ─┬─ Point ─┬─ FreePoint
///      │         ├─ PathPoint
///      │         └─ Intersection
///      ├─ Path ──┬─ Line
///      │         └─ Circle
///      └─ Variable
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Any,
    Point,
    Path,
    FreePoint,
    PathPoint,
    Intersection,
    Line,
    Circle,
    Variable,
}

impl EntityType {
    /// 直接父类型
    pub fn parent(&self) -> Option<EntityType> {
        match self {
            EntityType::Any => None,
            EntityType::Point | EntityType::Path | EntityType::Variable => Some(EntityType::Any),
            EntityType::FreePoint | EntityType::PathPoint | EntityType::Intersection => {
                Some(EntityType::Point)
            }
            EntityType::Line | EntityType::Circle => Some(EntityType::Path),
        }
    }

    /// 是否为`other`本身或其子类型
    pub fn is_subtype_of(&self, other: EntityType) -> bool {
        let mut current = Some(*self);
        while let Some(t) = current {
            if t == other {
                return true;
            }
            current = t.parent();
        }
        false
    }
}

/// 节点自身持有的原始状态
#[derive(Debug, Clone, PartialEq)]
pub enum EntityData {
    FreePoint {
        pos: Pos,
    },
    PathPoint {
        /// 未经约束的原始坐标
        raw: Pos,
    },
    Line,
    Circle,
    Intersection {
        /// 创建时用户给出的坐标，用于自动选择分支
        target: Pos,
        mode: IntersectionMode,
    },
    Variable {
        value: Num,
    },
}

impl EntityData {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityData::FreePoint { .. } => EntityKind::FreePoint,
            EntityData::PathPoint { .. } => EntityKind::PathPoint,
            EntityData::Line => EntityKind::Line,
            EntityData::Circle => EntityKind::Circle,
            EntityData::Intersection { .. } => EntityKind::Intersection,
            EntityData::Variable { .. } => EntityKind::Variable,
        }
    }
}

/// 节点的派生值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    Point(Pos),
    Line(LineCoeffs),
    Circle(CircleValue),
    Scalar(Num),
}

impl Value {
    pub fn is_defined(&self) -> bool {
        match self {
            Value::Point(p) => p.is_defined(),
            Value::Line(l) => l.is_defined(),
            Value::Circle(c) => c.is_defined(),
            Value::Scalar(n) => n.is_defined(),
        }
    }

    /// 作为点坐标读取，其他种类得到未定义
    pub fn as_point(&self) -> Pos {
        match self {
            Value::Point(p) => *p,
            _ => Pos::UNDEFINED,
        }
    }

    pub fn as_line(&self) -> LineCoeffs {
        match self {
            Value::Line(l) => *l,
            _ => LineCoeffs::UNDEFINED,
        }
    }

    pub fn as_circle(&self) -> CircleValue {
        match self {
            Value::Circle(c) => *c,
            _ => CircleValue::UNDEFINED,
        }
    }

    pub fn as_scalar(&self) -> Num {
        match self {
            Value::Scalar(n) => *n,
            _ => Num::UNDEFINED,
        }
    }
}
