//! 更新传播
//!
//! 一次传播（wave）由单个节点的单次改变触发，该节点称为驱动者。
//! 从驱动者可达的每个节点在本轮恰好重算一次，且只在其所有同样可达的父图元重算之后。
//!
//! 完成判断：子节点被父图元通知时，从待定集合中删去该父图元，
//! 再丢弃祖先根集合不含驱动者的父图元（它们本轮不会触发）；集合为空即可重算。

use crate::entity::{EntityData, NodeId};
use crate::error::{GraphError, GraphResult};
use crate::geometry::Pos;
use crate::graph::EntityGraph;
use crate::number::Num;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use tracing::{debug, trace};

/// 一次传播的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveReport {
    pub driver: NodeId,
    /// 按重算顺序排列的节点，不含驱动者
    pub recomputed: Vec<NodeId>,
}

impl WaveReport {
    fn new(driver: NodeId) -> Self {
        Self {
            driver,
            recomputed: Vec::new(),
        }
    }

    /// 节点在本轮被重算的次数
    pub fn count(&self, id: NodeId) -> usize {
        self.recomputed.iter().filter(|n| **n == id).count()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.recomputed.contains(&id)
    }

    /// 节点在重算顺序中的位置
    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.recomputed.iter().position(|n| *n == id)
    }
}

/// 单轮传播的工作状态
struct Wave {
    driver: NodeId,
    bit: usize,
    /// 每个子节点仍在等待的父图元，首次收到通知时初始化
    pending: HashMap<NodeId, Vec<NodeId>>,
    queue: VecDeque<(NodeId, NodeId)>,
    report: WaveReport,
}

impl Wave {
    fn notify_children(&mut self, graph: &EntityGraph, master: NodeId) {
        if let Ok(node) = graph.get(master) {
            self.queue
                .extend(node.children().iter().map(|child| (*child, master)));
        }
    }

    /// 处理一次通知，返回子节点是否已可重算
    fn receive(&mut self, graph: &EntityGraph, child: NodeId, master: NodeId) -> bool {
        let Ok(node) = graph.get_available(child) else {
            return false;
        };
        let waiting = self
            .pending
            .entry(child)
            .or_insert_with(|| node.masters().to_vec());
        waiting.retain(|m| *m != master);
        let bit = self.bit;
        waiting.retain(|m| {
            graph
                .get_available(*m)
                .is_ok_and(|n| n.roots().contains(bit))
        });
        if waiting.is_empty() {
            self.pending.remove(&child);
            true
        } else {
            false
        }
    }
}

impl EntityGraph {
    /// 以`driver`为驱动者传播一轮，驱动者自身不重算
    ///
    /// 驱动者若尚不是根，先分配根下标，保证完成判断精确。
    pub fn propagate(&mut self, driver: NodeId) -> GraphResult<WaveReport> {
        self.get(driver)?;
        if !self.check_available(driver) {
            return Err(GraphError::Unavailable(driver));
        }
        let bit = self.promote_to_root(driver);
        let mut wave = Wave {
            driver,
            bit,
            pending: HashMap::new(),
            queue: VecDeque::new(),
            report: WaveReport::new(driver),
        };
        wave.notify_children(self, driver);

        while let Some((child, master)) = wave.queue.pop_front() {
            if !wave.receive(self, child, master) {
                continue;
            }
            let value = self.recompute(child);
            trace!(node = %child, defined = value.is_defined(), "recomputed");
            wave.report.recomputed.push(child);
            wave.notify_children(self, child);
        }

        if !wave.pending.is_empty() {
            // 只有根集合失真时才会发生
            tracing::warn!(
                driver = %wave.driver,
                stalled = wave.pending.len(),
                "wave finished with stalled nodes"
            );
        }
        debug!(
            driver = %driver,
            recomputed = wave.report.recomputed.len(),
            "wave finished"
        );
        Ok(wave.report)
    }

    /// 手动推送：把任意可用节点作为驱动者，从其子节点开始传播
    pub fn push_update(&mut self, node: NodeId) -> GraphResult<WaveReport> {
        self.propagate(node)
    }

    /// 移动点：自由点直接设坐标，路径上的点设原始坐标后重新投影
    pub fn move_point(&mut self, point: NodeId, raw: Pos) -> GraphResult<WaveReport> {
        match &mut self.node_mut(point)?.data {
            EntityData::FreePoint { pos } => *pos = raw,
            EntityData::PathPoint { raw: current } => *current = raw,
            _ => return Err(GraphError::NotMovable(point)),
        }
        self.recompute(point);
        debug!(node = %point, x = %raw.x, y = %raw.y, "point moved");
        self.propagate(point)
    }

    /// 修改变量的值并传播
    pub fn set_variable_value(&mut self, variable: NodeId, value: Num) -> GraphResult<WaveReport> {
        match &mut self.node_mut(variable)?.data {
            EntityData::Variable { value: current } => *current = value,
            _ => return Err(GraphError::NotAVariable(variable)),
        }
        self.recompute(variable);
        self.propagate(variable)
    }
}
