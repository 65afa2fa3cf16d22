//! 图元依赖图
//!
//! 节点存放在以 [`NodeId`] 为下标的数组中，父子关系以句柄列表双向保存。
//!
//! 核心操作：
//! - `link`: 为节点追加父图元，校验全部通过后才修改图
//! - `unlink`: 删除一条父子边
//! - `remove`: 级联删除节点及其全部后代
//! - `check_available`: 惰性可用性检查
//!
//! 祖先根集合在每次改变边时精确维护，更新传播依赖它判断父图元是否会在本轮触发。

use crate::entity::{EntityData, EntityKind, EntityType, NodeId, Value};
use crate::error::{GraphError, GraphResult};
use crate::geometry::Candidates;
use crate::roots::RootSet;
use crate::signature;
use crate::solver::{self, IntersectionMode};
use std::collections::HashSet;
use tracing::{debug, trace};

/// 图中的一个节点
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) data: EntityData,
    pub(crate) masters: Vec<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) roots: RootSet,
    pub(crate) root_bit: Option<usize>,
    pub(crate) available: bool,
    pub(crate) value: Value,
    pub(crate) revision: u64,
}

impl Node {
    fn new(data: EntityData) -> Self {
        let value = solver::derive(&data, &[]);
        Self {
            data,
            masters: Vec::new(),
            children: Vec::new(),
            roots: RootSet::new(),
            root_bit: None,
            available: true,
            value,
            revision: 0,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.data.kind()
    }

    pub fn data(&self) -> &EntityData {
        &self.data
    }

    /// 有序的父图元
    pub fn masters(&self) -> &[NodeId] {
        &self.masters
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// 祖先根集合
    pub fn roots(&self) -> &RootSet {
        &self.roots
    }

    /// 自身的根下标（若自身是根）
    pub fn root_bit(&self) -> Option<usize> {
        self.root_bit
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// 最近一次计算出的派生值
    pub fn value(&self) -> Value {
        self.value
    }

    /// 派生值被重算的次数
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// 图元依赖图
#[derive(Debug, Clone, Default)]
pub struct EntityGraph {
    nodes: Vec<Node>,
    next_root: usize,
}

impl EntityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// 节点总数（含已删除节点）
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 可用节点数
    pub fn available_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.available).count()
    }

    /// 遍历所有可用节点
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.available)
            .map(|(i, n)| (NodeId::new(i), n))
    }

    /// 添加节点
    ///
    /// 自由点、变量与路径上的点拥有独立的自由度，创建时即成为根。
    pub fn add_node(&mut self, data: EntityData) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        let kind = data.kind();
        self.nodes.push(Node::new(data));
        if matches!(
            kind,
            EntityKind::FreePoint | EntityKind::Variable | EntityKind::PathPoint
        ) {
            self.promote_to_root(id);
        }
        trace!(node = %id, kind = kind.name(), "node added");
        id
    }

    /// 获取节点（含已删除节点）
    pub fn get(&self, id: NodeId) -> GraphResult<&Node> {
        self.nodes.get(id.index()).ok_or(GraphError::NodeNotFound(id))
    }

    /// 获取可用节点
    pub fn get_available(&self, id: NodeId) -> GraphResult<&Node> {
        let node = self.get(id)?;
        if !node.available {
            return Err(GraphError::Unavailable(id));
        }
        Ok(node)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> GraphResult<&mut Node> {
        let node = self
            .nodes
            .get_mut(id.index())
            .ok_or(GraphError::NodeNotFound(id))?;
        if !node.available {
            return Err(GraphError::Unavailable(id));
        }
        Ok(node)
    }

    pub fn kind(&self, id: NodeId) -> GraphResult<EntityKind> {
        Ok(self.get(id)?.kind())
    }

    pub fn value(&self, id: NodeId) -> GraphResult<Value> {
        Ok(self.get_available(id)?.value)
    }

    /// 为节点追加一个父图元
    ///
    /// 依次检查：父图元数上限、类型签名、交点模式、环。任一失败时图保持不变。
    /// 路径上的点再链接第二条路径时特化为交点，原始坐标保留为分支选择的目标点。
    pub fn link(&mut self, node: NodeId, master: NodeId) -> GraphResult<()> {
        let target = self.get_available(node)?;
        let source = self.get_available(master)?;
        let slot = target.masters.len();
        let master_kind = source.kind();

        let promote = target.kind() == EntityKind::PathPoint && slot == 1 && master_kind.is_path();
        let kind = if promote {
            EntityKind::Intersection
        } else {
            target.kind()
        };

        let max = match &target.data {
            EntityData::Intersection { mode, .. } if *mode != IntersectionMode::Pending => {
                mode.master_count()
            }
            _ => signature::max_masters(kind),
        };
        if slot >= max {
            return Err(GraphError::InvalidArity { node, kind, max });
        }

        let mut types: Vec<EntityType> = target
            .masters
            .iter()
            .map(|m| self.nodes[m.index()].kind().entity_type())
            .collect();
        types.push(master_kind.entity_type());
        if !signature::admits_prefix(kind, &types) {
            return Err(GraphError::TypeMismatch {
                kind,
                slot,
                candidate: master_kind.entity_type(),
            });
        }

        let resolved = if kind == EntityKind::Intersection && slot == 1 {
            let first = self.nodes[target.masters[0].index()].kind();
            Some(IntersectionMode::resolve(first, master_kind)?)
        } else {
            None
        };

        if self.depends_on(master, node) {
            return Err(GraphError::CyclicDependency { node, master });
        }

        let target = &mut self.nodes[node.index()];
        if promote {
            if let EntityData::PathPoint { raw } = target.data {
                target.data = EntityData::Intersection {
                    target: raw,
                    mode: IntersectionMode::Pending,
                };
                debug!(node = %node, "path point promoted to intersection");
            }
        }
        if let Some(resolved) = resolved {
            if let EntityData::Intersection { mode, .. } = &mut target.data {
                *mode = resolved;
            }
        }
        target.masters.push(master);

        let source = &mut self.nodes[master.index()];
        if !source.children.contains(&node) {
            source.children.push(node);
        }
        let master_roots = source.roots.clone();
        self.spread_roots(node, &master_roots);
        self.recompute(node);

        debug!(node = %node, master = %master, slot, "linked");
        Ok(())
    }

    /// 删除`node`到`child`的边，边不存在时什么也不做
    pub fn unlink(&mut self, node: NodeId, child: NodeId) {
        let Some(parent) = self.nodes.get_mut(node.index()) else {
            return;
        };
        let before = parent.children.len();
        parent.children.retain(|c| *c != child);
        if parent.children.len() == before {
            return;
        }

        if let Some(c) = self.nodes.get_mut(child.index()) {
            c.masters.retain(|m| *m != node);
        }
        self.refresh_mode(child);
        self.refresh_roots(child);
        if self.nodes[child.index()].available {
            self.recompute(child);
        }
        debug!(master = %node, child = %child, "unlinked");
    }

    /// 按剩余的前两个父图元重新确定交点模式，不是两条路径时为`Pending`
    fn refresh_mode(&mut self, id: NodeId) {
        let kinds: Vec<EntityKind> = self.nodes[id.index()]
            .masters
            .iter()
            .take(2)
            .map(|m| self.nodes[m.index()].kind())
            .collect();
        let resolved = match kinds.as_slice() {
            &[first, second] if first.is_path() && second.is_path() => {
                IntersectionMode::resolve(first, second).unwrap_or(IntersectionMode::Pending)
            }
            _ => IntersectionMode::Pending,
        };
        if let EntityData::Intersection { mode, .. } = &mut self.nodes[id.index()].data {
            if *mode != resolved {
                trace!(node = %id, ?resolved, "intersection mode refreshed");
            }
            *mode = resolved;
        }
    }

    /// 级联删除节点，返回按删除顺序排列的被删节点；重复删除返回空列表
    pub fn remove(&mut self, id: NodeId) -> Vec<NodeId> {
        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get_mut(current.index()) else {
                continue;
            };
            if !node.available {
                continue;
            }
            node.available = false;
            let masters = std::mem::take(&mut node.masters);
            let children = std::mem::take(&mut node.children);
            for master in masters {
                if let Some(m) = self.nodes.get_mut(master.index()) {
                    m.children.retain(|c| *c != current);
                }
            }
            // 逆序入栈，使子图元按链接顺序删除
            stack.extend(children.into_iter().rev());
            removed.push(current);
        }
        if !removed.is_empty() {
            debug!(node = %id, count = removed.len(), "removed");
        }
        removed
    }

    /// 惰性可用性检查：任一父图元不可用则自身标记为不可用
    pub fn check_available(&mut self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(id.index()) else {
            return false;
        };
        if !node.available {
            return false;
        }
        let masters = node.masters.clone();
        if masters.iter().all(|m| self.check_available(*m)) {
            return true;
        }
        self.nodes[id.index()].available = false;
        false
    }

    /// `node`是否依赖于`ancestor`（或二者相同）
    pub fn depends_on(&self, node: NodeId, ancestor: NodeId) -> bool {
        if node == ancestor {
            return true;
        }
        let (Some(n), Some(a)) = (self.nodes.get(node.index()), self.nodes.get(ancestor.index()))
        else {
            return false;
        };
        if let Some(bit) = a.root_bit {
            return n.roots.contains(bit);
        }
        let mut visited = HashSet::new();
        let mut stack = n.masters.clone();
        while let Some(current) = stack.pop() {
            if current == ancestor {
                return true;
            }
            if visited.insert(current) {
                stack.extend(self.nodes[current.index()].masters.iter().copied());
            }
        }
        false
    }

    /// 父图元是否已满足完整签名
    pub fn is_committed(&self, id: NodeId) -> bool {
        let Ok(node) = self.get_available(id) else {
            return false;
        };
        let types: Vec<EntityType> = node
            .masters
            .iter()
            .map(|m| self.nodes[m.index()].kind().entity_type())
            .collect();
        if !signature::is_complete(node.kind(), &types) {
            return false;
        }
        match &node.data {
            EntityData::Intersection { mode, .. } => {
                *mode != IntersectionMode::Pending && node.masters.len() == mode.master_count()
            }
            _ => true,
        }
    }

    /// 多值交点的两个候选解
    pub fn candidates(&self, id: NodeId) -> GraphResult<Candidates> {
        let node = self.get_available(id)?;
        match &node.data {
            EntityData::Intersection { mode, .. } => {
                Ok(solver::candidates(*mode, &self.master_values(id)))
            }
            _ => Ok(Candidates::UNDEFINED),
        }
    }

    /// 使节点成为根（若尚不是），返回其根下标
    ///
    /// 新的根下标会并入所有后代的祖先根集合。
    pub(crate) fn promote_to_root(&mut self, id: NodeId) -> usize {
        if let Some(bit) = self.nodes[id.index()].root_bit {
            return bit;
        }
        let bit = self.next_root;
        self.next_root += 1;
        self.nodes[id.index()].root_bit = Some(bit);
        self.spread_roots(id, &RootSet::single(bit));
        trace!(node = %id, bit, "promoted to root");
        bit
    }

    /// 父图元的当前值，按父图元顺序
    pub(crate) fn master_values(&self, id: NodeId) -> Vec<Value> {
        self.nodes[id.index()]
            .masters
            .iter()
            .map(|m| self.nodes[m.index()].value)
            .collect()
    }

    /// 用求解器重算节点的派生值
    pub(crate) fn recompute(&mut self, id: NodeId) -> Value {
        let masters = self.master_values(id);
        let node = &mut self.nodes[id.index()];
        node.value = solver::derive(&node.data, &masters);
        node.revision += 1;
        node.value
    }

    /// 把`roots`并入`start`及其全部后代
    fn spread_roots(&mut self, start: NodeId, roots: &RootSet) {
        let mut visited = HashSet::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            let node = &mut self.nodes[current.index()];
            node.roots.union_with(roots);
            stack.extend(node.children.iter().copied());
        }
    }

    /// 删边后按拓扑序重建`start`及其后代的祖先根集合
    fn refresh_roots(&mut self, start: NodeId) {
        for id in self.descendants_topological(start) {
            let node = &self.nodes[id.index()];
            let mut roots = node.root_bit.map(RootSet::single).unwrap_or_default();
            for m in &node.masters {
                roots.union_with(&self.nodes[m.index()].roots);
            }
            self.nodes[id.index()].roots = roots;
        }
    }

    /// `start`及其后代的拓扑序（父图元在前）
    fn descendants_topological(&self, start: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![(start, 0usize)];
        visited.insert(start);
        while let Some((id, i)) = stack.pop() {
            let children = &self.nodes[id.index()].children;
            if i < children.len() {
                stack.push((id, i + 1));
                let child = children[i];
                if visited.insert(child) {
                    stack.push((child, 0));
                }
            } else {
                order.push(id);
            }
        }
        order.reverse();
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{LineCoeffs, Pos};
    use crate::number::Num;

    fn free_point(graph: &mut EntityGraph, x: i64, y: i64) -> NodeId {
        graph.add_node(EntityData::FreePoint {
            pos: Pos::new(x, y),
        })
    }

    fn line(graph: &mut EntityGraph, p1: NodeId, p2: NodeId) -> NodeId {
        let l = graph.add_node(EntityData::Line);
        graph.link(l, p1).unwrap();
        graph.link(l, p2).unwrap();
        l
    }

    fn variable(graph: &mut EntityGraph, value: i64) -> NodeId {
        graph.add_node(EntityData::Variable {
            value: Num::from(value),
        })
    }

    #[test]
    fn test_link_builds_line() {
        let mut graph = EntityGraph::new();
        let a = free_point(&mut graph, 0, 0);
        let b = free_point(&mut graph, 4, 0);
        let l = graph.add_node(EntityData::Line);

        graph.link(l, a).unwrap();
        assert!(!graph.value(l).unwrap().is_defined());
        assert!(!graph.is_committed(l));

        graph.link(l, b).unwrap();
        assert_eq!(graph.value(l).unwrap().as_line(), LineCoeffs::new(0, -4, 0));
        assert!(graph.is_committed(l));
        assert_eq!(graph.get(l).unwrap().masters(), &[a, b]);
        assert_eq!(graph.get(a).unwrap().children(), &[l]);
    }

    #[test]
    fn test_ancestor_roots_union() {
        let mut graph = EntityGraph::new();
        let a = free_point(&mut graph, 0, 0);
        let b = free_point(&mut graph, 4, 0);
        let l = line(&mut graph, a, b);

        let bit_a = graph.get(a).unwrap().root_bit().unwrap();
        let bit_b = graph.get(b).unwrap().root_bit().unwrap();
        let roots = graph.get(l).unwrap().roots();
        assert!(roots.contains(bit_a));
        assert!(roots.contains(bit_b));
        assert_eq!(roots.len(), 2);
        assert_eq!(graph.get(l).unwrap().root_bit(), None);
    }

    #[test]
    fn test_invalid_arity() {
        let mut graph = EntityGraph::new();
        let a = free_point(&mut graph, 0, 0);
        let b = free_point(&mut graph, 4, 0);
        let c = free_point(&mut graph, 1, 1);
        let l = line(&mut graph, a, b);

        let err = graph.link(l, c).unwrap_err();
        assert!(matches!(err, GraphError::InvalidArity { max: 2, .. }));
        assert_eq!(graph.get(l).unwrap().masters().len(), 2);
        assert!(graph.get(c).unwrap().children().is_empty());

        let err = graph.link(a, c).unwrap_err();
        assert!(matches!(err, GraphError::InvalidArity { max: 0, .. }));
    }

    #[test]
    fn test_type_mismatch() {
        let mut graph = EntityGraph::new();
        let a = free_point(&mut graph, 0, 0);
        let b = free_point(&mut graph, 4, 0);
        let l = line(&mut graph, a, b);
        let circle = graph.add_node(EntityData::Circle);

        let err = graph.link(circle, l).unwrap_err();
        assert_eq!(
            err,
            GraphError::TypeMismatch {
                kind: EntityKind::Circle,
                slot: 0,
                candidate: EntityType::Line,
            }
        );
        assert!(graph.get(circle).unwrap().masters().is_empty());
        assert!(graph.get(l).unwrap().children().is_empty());
    }

    #[test]
    fn test_cyclic_dependency_rejected() {
        let mut graph = EntityGraph::new();
        let v1 = variable(&mut graph, 1);
        let v2 = variable(&mut graph, 2);
        graph.link(v2, v1).unwrap();

        let err = graph.link(v1, v2).unwrap_err();
        assert_eq!(err, GraphError::CyclicDependency { node: v1, master: v2 });
        assert!(graph.get(v1).unwrap().masters().is_empty());
        assert_eq!(graph.get(v2).unwrap().children(), &[] as &[NodeId]);

        let v3 = variable(&mut graph, 3);
        let err = graph.link(v3, v3).unwrap_err();
        assert!(matches!(err, GraphError::CyclicDependency { .. }));
    }

    #[test]
    fn test_indirect_cycle_without_root_bit() {
        let mut graph = EntityGraph::new();
        let a = free_point(&mut graph, 0, 0);
        let b = free_point(&mut graph, 4, 0);
        let l = line(&mut graph, a, b);
        // 变量挂在直线下，直线不是根，走深度优先检查
        let v = graph.add_node(EntityData::Variable { value: Num::ONE });
        graph.link(v, l).unwrap();
        let w = graph.add_node(EntityData::Variable { value: Num::ONE });
        graph.link(w, v).unwrap();

        assert!(graph.depends_on(w, l));
        assert!(graph.depends_on(w, a));
        assert!(!graph.depends_on(l, w));
    }

    #[test]
    fn test_circle_circle_refused() {
        let mut graph = EntityGraph::new();
        let o = free_point(&mut graph, 0, 0);
        let e = free_point(&mut graph, 1, 0);
        let f = free_point(&mut graph, 2, 0);
        let c1 = graph.add_node(EntityData::Circle);
        graph.link(c1, o).unwrap();
        graph.link(c1, e).unwrap();
        let c2 = graph.add_node(EntityData::Circle);
        graph.link(c2, f).unwrap();
        graph.link(c2, e).unwrap();

        let i = graph.add_node(EntityData::Intersection {
            target: Pos::UNDEFINED,
            mode: IntersectionMode::Pending,
        });
        graph.link(i, c1).unwrap();
        assert_eq!(graph.link(i, c2), Err(GraphError::UnsupportedIntersection));
        assert_eq!(graph.get(i).unwrap().masters(), &[c1]);
    }

    #[test]
    fn test_line_line_rejects_branch_variable() {
        let mut graph = EntityGraph::new();
        let a = free_point(&mut graph, 0, 0);
        let b = free_point(&mut graph, 4, 0);
        let c = free_point(&mut graph, 2, -2);
        let d = free_point(&mut graph, 2, 2);
        let ab = line(&mut graph, a, b);
        let cd = line(&mut graph, c, d);
        let i = graph.add_node(EntityData::Intersection {
            target: Pos::UNDEFINED,
            mode: IntersectionMode::Pending,
        });
        graph.link(i, ab).unwrap();
        graph.link(i, cd).unwrap();
        assert_eq!(graph.value(i).unwrap().as_point(), Pos::new(2, 0));
        assert!(graph.is_committed(i));

        let v = variable(&mut graph, 1);
        assert!(matches!(
            graph.link(i, v),
            Err(GraphError::InvalidArity { max: 2, .. })
        ));
    }

    #[test]
    fn test_path_point_promoted_to_intersection() {
        let mut graph = EntityGraph::new();
        let a = free_point(&mut graph, 0, 0);
        let b = free_point(&mut graph, 4, 0);
        let c = free_point(&mut graph, 2, -2);
        let d = free_point(&mut graph, 2, 2);
        let ab = line(&mut graph, a, b);
        let cd = line(&mut graph, c, d);

        let p = graph.add_node(EntityData::PathPoint {
            raw: Pos::new(3, 1),
        });
        graph.link(p, ab).unwrap();
        assert_eq!(graph.value(p).unwrap().as_point(), Pos::new(3, 0));

        graph.link(p, cd).unwrap();
        assert_eq!(graph.kind(p).unwrap(), EntityKind::Intersection);
        assert_eq!(graph.value(p).unwrap().as_point(), Pos::new(2, 0));
        match graph.get(p).unwrap().data() {
            EntityData::Intersection { target, mode } => {
                assert_eq!(*target, Pos::new(3, 1));
                assert_eq!(*mode, IntersectionMode::LineLine);
            }
            other => panic!("unexpected data {:?}", other),
        }
    }

    #[test]
    fn test_remove_cascades_once() {
        let mut graph = EntityGraph::new();
        let a = free_point(&mut graph, 0, 0);
        let b = free_point(&mut graph, 4, 0);
        let c = free_point(&mut graph, 2, -2);
        let d = free_point(&mut graph, 2, 2);
        let ab = line(&mut graph, a, b);
        let cd = line(&mut graph, c, d);
        let i = graph.add_node(EntityData::Intersection {
            target: Pos::UNDEFINED,
            mode: IntersectionMode::Pending,
        });
        graph.link(i, ab).unwrap();
        graph.link(i, cd).unwrap();
        // 菱形：经过交点与直线两条路径都依赖a
        let ai = line(&mut graph, a, i);

        let removed = graph.remove(a);
        let unique: HashSet<_> = removed.iter().copied().collect();
        assert_eq!(removed.len(), unique.len());
        assert_eq!(unique, HashSet::from([a, ab, i, ai]));

        assert!(graph.get_available(cd).is_ok());
        assert!(!graph.get(cd).unwrap().children().contains(&i));
        assert!(graph.get(b).unwrap().children().is_empty());
        assert!(graph.remove(a).is_empty());
        assert!(graph.remove(i).is_empty());
        assert_eq!(graph.available_count(), 4);
    }

    #[test]
    fn test_check_available_is_lazy_and_monotone() {
        let mut graph = EntityGraph::new();
        let a = free_point(&mut graph, 0, 0);
        let b = free_point(&mut graph, 4, 0);
        let l = line(&mut graph, a, b);

        assert!(graph.check_available(l));
        // 只标记父图元不可用，不走级联删除
        graph.nodes[a.index()].available = false;
        assert!(!graph.check_available(l));
        assert!(!graph.get(l).unwrap().is_available());
        graph.nodes[a.index()].available = true;
        assert!(!graph.check_available(l));
    }

    fn intersection_mode(graph: &EntityGraph, id: NodeId) -> IntersectionMode {
        match graph.get(id).unwrap().data() {
            EntityData::Intersection { mode, .. } => *mode,
            other => panic!("unexpected data {:?}", other),
        }
    }

    #[test]
    fn test_unlink_path_refreshes_intersection_mode() {
        let mut graph = EntityGraph::new();
        let o = free_point(&mut graph, 0, 0);
        let e = free_point(&mut graph, 5, 0);
        let l1 = free_point(&mut graph, -10, 0);
        let l2 = free_point(&mut graph, 10, 0);
        let circle = graph.add_node(EntityData::Circle);
        graph.link(circle, o).unwrap();
        graph.link(circle, e).unwrap();
        let ln = line(&mut graph, l1, l2);
        let branch = variable(&mut graph, 2);
        let i = graph.add_node(EntityData::Intersection {
            target: Pos::UNDEFINED,
            mode: IntersectionMode::Pending,
        });
        graph.link(i, ln).unwrap();
        graph.link(i, circle).unwrap();
        graph.link(i, branch).unwrap();
        assert!(graph.is_committed(i));

        graph.unlink(ln, i);
        assert_eq!(graph.get(i).unwrap().masters(), &[circle, branch]);
        assert_eq!(intersection_mode(&graph, i), IntersectionMode::Pending);
        assert!(!graph.value(i).unwrap().is_defined());
        assert!(!graph.is_committed(i));

        // 先摘下分支变量，再按新顺序重新链接
        graph.unlink(branch, i);
        graph.link(i, ln).unwrap();
        assert_eq!(
            intersection_mode(&graph, i),
            IntersectionMode::LineCircle { line: 1, circle: 0 }
        );
        graph.link(i, branch).unwrap();
        assert!(graph.is_committed(i));
        let p = graph.value(i).unwrap().as_point();
        assert!(crate::geometry::tests::approx_pos(p, 5, 0));
    }

    #[test]
    fn test_unlink_branch_keeps_mode() {
        let mut graph = EntityGraph::new();
        let o = free_point(&mut graph, 0, 0);
        let e = free_point(&mut graph, 5, 0);
        let l1 = free_point(&mut graph, -10, 0);
        let l2 = free_point(&mut graph, 10, 0);
        let circle = graph.add_node(EntityData::Circle);
        graph.link(circle, o).unwrap();
        graph.link(circle, e).unwrap();
        let ln = line(&mut graph, l1, l2);
        let branch = variable(&mut graph, 1);
        let i = graph.add_node(EntityData::Intersection {
            target: Pos::UNDEFINED,
            mode: IntersectionMode::Pending,
        });
        graph.link(i, circle).unwrap();
        graph.link(i, ln).unwrap();
        graph.link(i, branch).unwrap();

        graph.unlink(branch, i);
        assert_eq!(
            intersection_mode(&graph, i),
            IntersectionMode::LineCircle { line: 1, circle: 0 }
        );
        assert!(!graph.value(i).unwrap().is_defined());
        graph.link(i, branch).unwrap();
        assert!(crate::geometry::tests::approx_pos(
            graph.value(i).unwrap().as_point(),
            -5,
            0
        ));
    }

    #[test]
    fn test_unlink_refreshes_roots() {
        let mut graph = EntityGraph::new();
        let a = free_point(&mut graph, 0, 0);
        let b = free_point(&mut graph, 4, 0);
        let l = line(&mut graph, a, b);
        let v = graph.add_node(EntityData::Variable { value: Num::ONE });
        graph.link(v, l).unwrap();
        let bit_a = graph.get(a).unwrap().root_bit().unwrap();

        graph.unlink(a, l);
        assert_eq!(graph.get(l).unwrap().masters(), &[b]);
        assert!(!graph.get(l).unwrap().roots().contains(bit_a));
        assert!(!graph.get(v).unwrap().roots().contains(bit_a));
        assert!(!graph.value(l).unwrap().is_defined());

        // 再次删除同一条边不做任何事
        graph.unlink(a, l);
        assert_eq!(graph.get(l).unwrap().masters(), &[b]);
    }

    #[test]
    fn test_unknown_node() {
        let mut graph = EntityGraph::new();
        let a = free_point(&mut graph, 0, 0);
        assert_eq!(
            graph.link(a, NodeId(42)),
            Err(GraphError::NodeNotFound(NodeId(42)))
        );
        graph.remove(a);
        assert_eq!(graph.value(a), Err(GraphError::Unavailable(a)));
    }
}
