//! 几何求解器
//!
//! 每种图元的派生值是其自身状态与父图元当前值的纯函数。
//! 交点的计算公式由两条路径的种类决定，在链接第二条路径时查表确定一次，
//! 之后每次重算直接按记录的模式分派。

use crate::entity::{EntityData, EntityKind, Value};
use crate::error::{GraphError, GraphResult};
use crate::geometry::{Branch, Candidates, CircleValue, LineCoeffs, Pos};
use crate::number::Num;
use serde::{Deserialize, Serialize};

/// 交点的计算模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntersectionMode {
    /// 两条路径尚未齐备
    Pending,
    /// 两直线，唯一解
    LineLine,
    /// 直线与圆，两个解；字段为直线和圆在父图元列表中的位置
    LineCircle { line: usize, circle: usize },
}

impl IntersectionMode {
    /// 按两条路径的种类查表
    pub fn resolve(first: EntityKind, second: EntityKind) -> GraphResult<IntersectionMode> {
        use EntityKind::{Circle, Line};
        match (first, second) {
            (Line, Line) => Ok(IntersectionMode::LineLine),
            (Line, Circle) => Ok(IntersectionMode::LineCircle { line: 0, circle: 1 }),
            (Circle, Line) => Ok(IntersectionMode::LineCircle { line: 1, circle: 0 }),
            (Circle, Circle) => Err(GraphError::UnsupportedIntersection),
            (Line | Circle, other) => Err(GraphError::TypeMismatch {
                kind: EntityKind::Intersection,
                slot: 1,
                candidate: other.entity_type(),
            }),
            (other, _) => Err(GraphError::TypeMismatch {
                kind: EntityKind::Intersection,
                slot: 0,
                candidate: other.entity_type(),
            }),
        }
    }

    /// 是否需要分支变量
    pub fn is_multi_valued(&self) -> bool {
        matches!(self, IntersectionMode::LineCircle { .. })
    }

    /// 该模式下允许的父图元数
    pub fn master_count(&self) -> usize {
        match self {
            IntersectionMode::Pending | IntersectionMode::LineLine => 2,
            IntersectionMode::LineCircle { .. } => 3,
        }
    }
}

/// 由自身状态与父图元的值计算派生值
///
/// `masters`按父图元顺序排列。父图元不全时结果为未定义。
pub fn derive(data: &EntityData, masters: &[Value]) -> Value {
    match data {
        EntityData::FreePoint { pos } => Value::Point(*pos),
        EntityData::PathPoint { raw } => Value::Point(project(raw, masters.first())),
        EntityData::Line => Value::Line(match masters {
            [p1, p2] => LineCoeffs::through(&p1.as_point(), &p2.as_point()),
            _ => LineCoeffs::UNDEFINED,
        }),
        EntityData::Circle => Value::Circle(match masters {
            [center, edge] => CircleValue::from_center_edge(&center.as_point(), &edge.as_point()),
            _ => CircleValue::UNDEFINED,
        }),
        EntityData::Intersection { mode, .. } => Value::Point(intersection(*mode, masters)),
        EntityData::Variable { value } => Value::Scalar(*value),
    }
}

/// 原始坐标在路径上的垂足
pub fn project(raw: &Pos, path: Option<&Value>) -> Pos {
    match path {
        Some(Value::Line(line)) => line.foot_point(raw),
        Some(Value::Circle(circle)) => circle.foot_point(raw),
        _ => Pos::UNDEFINED,
    }
}

/// 按模式计算交点
pub fn intersection(mode: IntersectionMode, masters: &[Value]) -> Pos {
    match mode {
        IntersectionMode::Pending => Pos::UNDEFINED,
        IntersectionMode::LineLine => match masters {
            [l1, l2, ..] => l1.as_line().intersect(&l2.as_line()),
            _ => Pos::UNDEFINED,
        },
        IntersectionMode::LineCircle { .. } => {
            // 没有分支变量时交点待定
            let Some(branch) = masters.get(2).and_then(|v| Branch::from_num(v.as_scalar())) else {
                return Pos::UNDEFINED;
            };
            candidates(mode, masters).get(branch)
        }
    }
}

/// 多值交点的两个候选解，单值或未齐备时均未定义
pub fn candidates(mode: IntersectionMode, masters: &[Value]) -> Candidates {
    match mode {
        IntersectionMode::LineCircle { line, circle } => {
            match (masters.get(line), masters.get(circle)) {
                (Some(l), Some(c)) => c.as_circle().intersect_line(&l.as_line()),
                _ => Candidates::UNDEFINED,
            }
        }
        _ => Candidates::UNDEFINED,
    }
}

/// 为多值交点自动选择分支：离目标点较近的候选，无法比较时用`fallback`
pub fn auto_branch(candidates: &Candidates, target: &Pos, fallback: Branch) -> Branch {
    candidates.nearest_to(target).unwrap_or(fallback)
}

/// 点到路径（直线或圆）的距离，供宿主做点击测试
pub fn distance_to_path(point: &Pos, path: &Value) -> Num {
    match path {
        Value::Line(line) => line.distance_to(point),
        Value::Circle(circle) => circle.distance_to(point),
        _ => Num::UNDEFINED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::tests::{approx, approx_pos};

    fn point(x: i64, y: i64) -> Value {
        Value::Point(Pos::new(x, y))
    }

    fn line(p1: (i64, i64), p2: (i64, i64)) -> Value {
        derive(&EntityData::Line, &[point(p1.0, p1.1), point(p2.0, p2.1)])
    }

    fn circle(center: (i64, i64), edge: (i64, i64)) -> Value {
        derive(
            &EntityData::Circle,
            &[point(center.0, center.1), point(edge.0, edge.1)],
        )
    }

    #[test]
    fn test_resolve_dispatch_table() {
        use EntityKind::*;
        assert_eq!(IntersectionMode::resolve(Line, Line), Ok(IntersectionMode::LineLine));
        assert_eq!(
            IntersectionMode::resolve(Circle, Line),
            Ok(IntersectionMode::LineCircle { line: 1, circle: 0 })
        );
        assert_eq!(
            IntersectionMode::resolve(Circle, Circle),
            Err(GraphError::UnsupportedIntersection)
        );
        assert!(matches!(
            IntersectionMode::resolve(Line, FreePoint),
            Err(GraphError::TypeMismatch { slot: 1, .. })
        ));
    }

    #[test]
    fn test_line_needs_both_masters() {
        let v = derive(&EntityData::Line, &[point(0, 0)]);
        assert_eq!(v, Value::Line(LineCoeffs::UNDEFINED));
    }

    #[test]
    fn test_circle_radius() {
        let c = circle((0, 0), (3, 4)).as_circle();
        assert!(approx(c.radius, 5));
        assert_eq!(c.center, Pos::new(0, 0));
    }

    #[test]
    fn test_path_point_projection() {
        let raw = Pos::new(3, 7);
        let on_line = derive(
            &EntityData::PathPoint { raw },
            &[line((-10, 0), (10, 0))],
        );
        assert_eq!(on_line.as_point(), Pos::new(3, 0));

        let unbound = derive(&EntityData::PathPoint { raw }, &[]);
        assert!(!unbound.is_defined());
    }

    #[test]
    fn test_line_line_intersection() {
        let data = EntityData::Intersection {
            target: Pos::UNDEFINED,
            mode: IntersectionMode::LineLine,
        };
        let v = derive(&data, &[line((0, 0), (4, 0)), line((2, -2), (2, 2))]);
        assert_eq!(v.as_point(), Pos::new(2, 0));

        let parallel = derive(&data, &[line((0, 0), (4, 0)), line((0, 1), (4, 1))]);
        assert!(!parallel.is_defined());
    }

    #[test]
    fn test_line_circle_branch_selection() {
        let mode = IntersectionMode::LineCircle { line: 1, circle: 0 };
        let data = EntityData::Intersection {
            target: Pos::UNDEFINED,
            mode,
        };
        let c = circle((0, 0), (5, 0));
        let l = line((-10, 0), (10, 0));

        // 没有分支变量时未定义
        assert!(!derive(&data, &[c, l]).is_defined());

        let first = derive(&data, &[c, l, Value::Scalar(Num::ONE)]);
        assert!(approx_pos(first.as_point(), -5, 0));
        let second = derive(&data, &[c, l, Value::Scalar(Num::TWO)]);
        assert!(approx_pos(second.as_point(), 5, 0));

        let bogus = derive(&data, &[c, l, Value::Scalar(Num::from(7))]);
        assert!(!bogus.is_defined());

        let cands = candidates(mode, &[c, l]);
        assert_eq!(
            auto_branch(&cands, &Pos::new(4, 0), Branch::First),
            Branch::Second
        );
        assert_eq!(
            auto_branch(&Candidates::UNDEFINED, &Pos::new(4, 0), Branch::First),
            Branch::First
        );
    }

    #[test]
    fn test_degenerate_circle_intersection_undefined() {
        let mode = IntersectionMode::LineCircle { line: 0, circle: 1 };
        let data = EntityData::Intersection {
            target: Pos::UNDEFINED,
            mode,
        };
        let l = line((-10, 0), (10, 0));
        let c = circle((0, 3), (0, 3));
        let v = derive(&data, &[l, c, Value::Scalar(Num::ONE)]);
        assert!(!v.is_defined());
    }

    #[test]
    fn test_distance_to_path() {
        let p = Pos::new(0, 8);
        assert!(approx(distance_to_path(&p, &circle((0, 0), (5, 0))), 3));
        assert!(approx(distance_to_path(&p, &line((-1, 2), (1, 2))), 6));
        assert!(distance_to_path(&p, &point(0, 0)).is_undefined());
    }
}
