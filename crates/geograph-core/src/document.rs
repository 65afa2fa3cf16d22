//! 几何文档
//!
//! 对宿主（界面、命令行）暴露的唯一入口：创建图元、拖动点、删除、查询派生值。
//! 文档持有依赖图、标签分配器与配置，所有修改都经过 `&mut self`，
//! 每次修改及其引发的传播在返回前完成。

use crate::config::DocumentConfig;
use crate::entity::{EntityData, EntityKind, NodeId, Value};
use crate::error::{GraphError, GraphResult};
use crate::geometry::{Branch, CircleValue, LineCoeffs, Pos};
use crate::graph::EntityGraph;
use crate::labels::LabelAllocator;
use crate::number::Num;
use crate::propagation::WaveReport;
use crate::signature::Construction;
use crate::solver::{self, IntersectionMode};
use std::collections::HashMap;
use tracing::debug;

/// 几何文档
#[derive(Debug, Clone, Default)]
pub struct Document {
    graph: EntityGraph,
    labels: LabelAllocator,
    point_labels: HashMap<NodeId, String>,
    config: DocumentConfig,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DocumentConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// 只读访问依赖图
    pub fn graph(&self) -> &EntityGraph {
        &self.graph
    }

    // === 创建 ===

    /// 创建自由点
    pub fn create_independent_point(&mut self, x: impl Into<Num>, y: impl Into<Num>) -> NodeId {
        let id = self.graph.add_node(EntityData::FreePoint {
            pos: Pos::new(x, y),
        });
        self.assign_label(id);
        id
    }

    /// 创建路径上的点，位置为`raw`在路径上的垂足
    pub fn create_constrained_point(&mut self, path: NodeId, raw: Pos) -> GraphResult<NodeId> {
        let id = self.build(EntityData::PathPoint { raw }, &[path])?;
        self.assign_label(id);
        Ok(id)
    }

    /// 创建经过两点的线段
    pub fn create_line(&mut self, a: NodeId, b: NodeId) -> GraphResult<NodeId> {
        self.build(EntityData::Line, &[a, b])
    }

    /// 创建圆，`edge`为圆上一点
    pub fn create_circle(&mut self, center: NodeId, edge: NodeId) -> GraphResult<NodeId> {
        self.build(EntityData::Circle, &[center, edge])
    }

    /// 创建两条路径的交点
    ///
    /// 多值交点会额外创建一个分支变量作为第三个父图元，
    /// 分支取离`target`较近的候选；候选未定义时取配置中的默认分支。
    pub fn create_intersection(
        &mut self,
        path_a: NodeId,
        path_b: NodeId,
        target: Pos,
    ) -> GraphResult<NodeId> {
        let id = self.build(
            EntityData::Intersection {
                target,
                mode: IntersectionMode::Pending,
            },
            &[path_a, path_b],
        )?;

        // 两条路径齐备后仍未满足签名，说明需要分支变量
        if !self.graph.is_committed(id) {
            let candidates = self.graph.candidates(id)?;
            let branch = solver::auto_branch(&candidates, &target, self.config.default_branch());
            let variable = self.graph.add_node(EntityData::Variable {
                value: branch.to_num(),
            });
            if let Err(err) = self.graph.link(id, variable) {
                self.graph.remove(variable);
                self.graph.remove(id);
                return Err(err);
            }
            debug!(node = %id, branch = branch.index(), "branch selected");
        }
        self.assign_label(id);
        Ok(id)
    }

    /// 创建标量变量
    pub fn create_variable(&mut self, value: impl Into<Num>) -> NodeId {
        self.graph.add_node(EntityData::Variable {
            value: value.into(),
        })
    }

    /// 为已有节点追加父图元（增量构造）
    pub fn link(&mut self, node: NodeId, master: NodeId) -> GraphResult<()> {
        self.graph.link(node, master)
    }

    /// 先整体校验父图元，再创建节点并逐个链接
    fn build(&mut self, data: EntityData, masters: &[NodeId]) -> GraphResult<NodeId> {
        let kind = data.kind();
        let mut session = Construction::new(kind);
        let mut kinds = Vec::with_capacity(masters.len());
        for master in masters {
            let master_kind = self.graph.get_available(*master)?.kind();
            session.feed(master_kind.entity_type())?;
            kinds.push(master_kind);
        }
        if !session.is_complete() {
            return Err(GraphError::IncompleteSignature {
                kind,
                given: masters.len(),
            });
        }
        if kind == EntityKind::Intersection {
            if let &[first, second] = kinds.as_slice() {
                IntersectionMode::resolve(first, second)?;
            }
        }

        let id = self.graph.add_node(data);
        for master in masters {
            if let Err(err) = self.graph.link(id, *master) {
                self.graph.remove(id);
                return Err(err);
            }
        }
        debug!(node = %id, kind = kind.name(), "entity created");
        Ok(id)
    }

    // === 修改 ===

    /// 拖动点并传播
    pub fn move_point(&mut self, point: NodeId, raw: Pos) -> GraphResult<WaveReport> {
        self.graph.move_point(point, raw)
    }

    /// 以任意节点为驱动者手动传播
    pub fn push_update(&mut self, node: NodeId) -> GraphResult<WaveReport> {
        self.graph.push_update(node)
    }

    /// 修改变量并传播
    pub fn set_variable_value(
        &mut self,
        variable: NodeId,
        value: impl Into<Num>,
    ) -> GraphResult<WaveReport> {
        self.graph.set_variable_value(variable, value.into())
    }

    /// 级联删除，释放被删点的标签
    pub fn remove(&mut self, node: NodeId) -> Vec<NodeId> {
        let removed = self.graph.remove(node);
        for id in &removed {
            if let Some(label) = self.point_labels.remove(id) {
                self.labels.remove(&label);
            }
        }
        removed
    }

    // === 查询 ===

    fn defined_value(&self, id: NodeId) -> Option<Value> {
        self.graph
            .get_available(id)
            .ok()
            .map(|n| n.value())
            .filter(Value::is_defined)
    }

    /// 点的当前位置；节点不可用、不是点或位置未定义时为`None`
    pub fn position(&self, point: NodeId) -> Option<Pos> {
        match self.defined_value(point)? {
            Value::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn line_coeffs(&self, line: NodeId) -> Option<LineCoeffs> {
        match self.defined_value(line)? {
            Value::Line(l) => Some(l),
            _ => None,
        }
    }

    pub fn circle(&self, circle: NodeId) -> Option<CircleValue> {
        match self.defined_value(circle)? {
            Value::Circle(c) => Some(c),
            _ => None,
        }
    }

    pub fn variable_value(&self, variable: NodeId) -> Option<Num> {
        match self.defined_value(variable)? {
            Value::Scalar(n) => Some(n),
            _ => None,
        }
    }

    /// 多值交点当前选中的分支
    pub fn branch(&self, intersection: NodeId) -> Option<Branch> {
        let node = self.graph.get_available(intersection).ok()?;
        let variable = *node.masters().get(2)?;
        Branch::from_num(self.variable_value(variable)?)
    }

    /// 点到路径的距离，用于点击测试
    pub fn distance_to_path(&self, point: &Pos, path: NodeId) -> Option<Num> {
        let value = self.defined_value(path)?;
        Some(solver::distance_to_path(point, &value)).filter(Num::is_defined)
    }

    pub fn label(&self, point: NodeId) -> Option<&str> {
        self.point_labels.get(&point).map(String::as_str)
    }

    /// 修改点的标签；点尚无标签时直接占用新标签
    pub fn rename_label(&mut self, point: NodeId, label: &str) -> GraphResult<()> {
        let kind = self.graph.get_available(point)?.kind();
        if !kind.is_point() {
            return Err(GraphError::TypeMismatch {
                kind,
                slot: 0,
                candidate: kind.entity_type(),
            });
        }
        match self.point_labels.get(&point) {
            Some(old) => self.labels.rename(old, label)?,
            None => self.labels.add(label)?,
        }
        self.point_labels.insert(point, label.to_string());
        Ok(())
    }

    fn assign_label(&mut self, id: NodeId) {
        if !self.config.auto_label_points {
            return;
        }
        let label = self.labels.next_label();
        if self.labels.add(&label).is_ok() {
            debug!(node = %id, label = %label, "label assigned");
            self.point_labels.insert(id, label);
        }
    }
}
