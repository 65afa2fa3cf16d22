//! GeoGraph 动态几何核心
//!
//! 提供精确数值模型、图元依赖图、几何求解器与更新传播。
//!
//! # 架构设计
//!
//! 采用以句柄寻址的节点数组：
//! - `EntityGraph`: 节点、父子关系、祖先根集合
//! - `solver`: 每种图元由父图元计算派生值的公式
//! - `propagation`: 单个节点改变后，所有依赖节点恰好重算一次
//! - `Document`: 对宿主暴露的创建、拖动、删除与查询接口
//!
//! # 示例
//!
//! ```rust
//! use geograph_core::prelude::*;
//!
//! let mut doc = Document::new();
//! let a = doc.create_independent_point(0, 0);
//! let b = doc.create_independent_point(4, 0);
//! let c = doc.create_independent_point(2, -2);
//! let d = doc.create_independent_point(2, 2);
//! let ab = doc.create_line(a, b).unwrap();
//! let cd = doc.create_line(c, d).unwrap();
//! let x = doc.create_intersection(ab, cd, Pos::new(0, 0)).unwrap();
//! assert_eq!(doc.position(x), Some(Pos::new(2, 0)));
//!
//! // 拖动b，交点随之更新
//! let report = doc.move_point(b, Pos::new(4, 4)).unwrap();
//! assert_eq!(report.recomputed, vec![ab, x]);
//! assert_eq!(doc.position(x), Some(Pos::new(2, 2)));
//! ```

pub mod config;
pub mod document;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod labels;
pub mod math;
pub mod number;
pub mod propagation;
pub mod roots;
pub mod signature;
pub mod solver;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::config::DocumentConfig;
    pub use crate::document::Document;
    pub use crate::entity::{EntityData, EntityKind, EntityType, NodeId, Value};
    pub use crate::error::{GraphError, GraphResult};
    pub use crate::geometry::{Branch, Candidates, CircleValue, LineCoeffs, Pos};
    pub use crate::graph::{EntityGraph, Node};
    pub use crate::labels::LabelAllocator;
    pub use crate::math::Point2;
    pub use crate::number::Num;
    pub use crate::propagation::WaveReport;
    pub use crate::roots::RootSet;
    pub use crate::signature::Construction;
    pub use crate::solver::IntersectionMode;
}
