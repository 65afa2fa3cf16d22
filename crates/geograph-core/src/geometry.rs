//! 几何值与闭式公式
//!
//! 图元的派生值：
//! - 点坐标 (Pos)
//! - 直线方程系数 (LineCoeffs)，直线为 `a·x + b·y + c = 0`
//! - 圆 (CircleValue)，由圆心与半径表示
//!
//! 所有公式都是纯函数，输入含未定义值时结果为未定义，不会panic。

use crate::number::Num;
use serde::{Deserialize, Serialize};

/// 点坐标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Pos {
    pub x: Num,
    pub y: Num,
}

impl Pos {
    pub const UNDEFINED: Pos = Pos {
        x: Num::UNDEFINED,
        y: Num::UNDEFINED,
    };

    pub fn new(x: impl Into<Num>, y: impl Into<Num>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }

    pub fn is_defined(&self) -> bool {
        self.x.is_defined() && self.y.is_defined()
    }

    /// 到另一点距离的平方
    pub fn distance_sq(&self, other: &Pos) -> Num {
        (self.x - other.x).square() + (self.y - other.y).square()
    }

    /// 两点欧氏距离
    pub fn distance_to(&self, other: &Pos) -> Num {
        self.distance_sq(other).sqrt()
    }

    /// 按左点规则排序两点，返回 (左点, 右点)
    ///
    /// 横坐标较小的点为左点；横坐标相同时纵坐标较大的点为左点。
    pub fn left_point_first(p1: Pos, p2: Pos) -> (Pos, Pos) {
        if p1.x.lt(&p2.x) {
            return (p1, p2);
        }
        if p1.x.gt(&p2.x) {
            return (p2, p1);
        }
        if p1.y.gt(&p2.y) {
            (p1, p2)
        } else {
            (p2, p1)
        }
    }
}

/// 直线方程 `a·x + b·y + c = 0` 的系数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LineCoeffs {
    pub a: Num,
    pub b: Num,
    pub c: Num,
}

impl LineCoeffs {
    pub const UNDEFINED: LineCoeffs = LineCoeffs {
        a: Num::UNDEFINED,
        b: Num::UNDEFINED,
        c: Num::UNDEFINED,
    };

    pub fn new(a: impl Into<Num>, b: impl Into<Num>, c: impl Into<Num>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            c: c.into(),
        }
    }

    /// 过两点的直线：a = y2−y1, b = x1−x2, c = x2·y1−x1·y2
    pub fn through(p1: &Pos, p2: &Pos) -> Self {
        Self {
            a: p2.y - p1.y,
            b: p1.x - p2.x,
            c: p2.x * p1.y - p1.x * p2.y,
        }
    }

    pub fn is_defined(&self) -> bool {
        self.a.is_defined() && self.b.is_defined() && self.c.is_defined()
    }

    /// a² + b²，为零时直线退化
    pub fn norm_sq(&self) -> Num {
        self.a.square() + self.b.square()
    }

    /// 直线是否退化（两端点重合）
    pub fn is_degenerate(&self) -> bool {
        self.norm_sq().is_zero()
    }

    /// 将点代入方程左侧
    pub fn eval(&self, p: &Pos) -> Num {
        self.a * p.x + self.b * p.y + self.c
    }

    /// 点到直线的距离
    pub fn distance_to(&self, p: &Pos) -> Num {
        // 退化直线的norm_sq为零，除法得到未定义
        self.eval(p).abs() / self.norm_sq().sqrt()
    }

    /// 点在直线上的垂足
    pub fn foot_point(&self, p: &Pos) -> Pos {
        let s = self.norm_sq();
        if s.is_zero() {
            return Pos::UNDEFINED;
        }
        let k = -self.eval(p) / s;
        Pos {
            x: p.x + self.a * k,
            y: p.y + self.b * k,
        }
    }

    /// 两直线交点，平行或重合时未定义
    pub fn intersect(&self, other: &LineCoeffs) -> Pos {
        let k = self.a * other.b - other.a * self.b;
        if k.is_zero() {
            return Pos::UNDEFINED;
        }
        Pos {
            x: (self.b * other.c - other.b * self.c) / k,
            y: (other.a * self.c - self.a * other.c) / k,
        }
    }
}

/// 圆，由圆心与半径表示
///
/// `radius_sq`由坐标直接算出，是精确值；`radius`经过开方，可能有末位误差。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CircleValue {
    pub center: Pos,
    pub radius: Num,
    pub radius_sq: Num,
}

impl CircleValue {
    pub const UNDEFINED: CircleValue = CircleValue {
        center: Pos::UNDEFINED,
        radius: Num::UNDEFINED,
        radius_sq: Num::UNDEFINED,
    };

    /// 以圆心和圆上一点构造
    pub fn from_center_edge(center: &Pos, edge: &Pos) -> Self {
        let radius_sq = center.distance_sq(edge);
        Self {
            center: *center,
            radius: radius_sq.sqrt(),
            radius_sq,
        }
    }

    pub fn is_defined(&self) -> bool {
        self.center.is_defined() && self.radius_sq.is_defined()
    }

    /// 圆心与圆上一点重合，半径为零
    pub fn is_degenerate(&self) -> bool {
        self.radius_sq.is_zero()
    }

    /// 点到圆周的最短距离
    pub fn distance_to(&self, p: &Pos) -> Num {
        (p.distance_to(&self.center) - self.radius).abs()
    }

    /// 点在圆上的垂足，即以圆心为端点、经过该点的射线与圆的交点
    pub fn foot_point(&self, p: &Pos) -> Pos {
        let d = p.distance_to(&self.center);
        if d.is_undefined() || d.is_zero() || self.is_degenerate() {
            return Pos::UNDEFINED;
        }
        let k = self.radius / d;
        Pos {
            x: self.center.x + k * (p.x - self.center.x),
            y: self.center.y + k * (p.y - self.center.y),
        }
    }

    /// 直线与圆的两个交点，已按左点规则排序
    ///
    /// 相离、直线退化或圆退化时两个候选都未定义；相切时两个候选重合。
    pub fn intersect_line(&self, line: &LineCoeffs) -> Candidates {
        let s = line.norm_sq();
        if s.is_undefined() || s.is_zero() || self.is_degenerate() {
            return Candidates::UNDEFINED;
        }
        let h = line.foot_point(&self.center);
        // 判别式乘以 a²+b² 后只含乘法与减法，相切时精确为零
        let disc = self.radius_sq * s - line.eval(&self.center).square();
        if disc.is_undefined() || disc.lt(&Num::ZERO) {
            return Candidates::UNDEFINED;
        }
        let q = disc.sqrt() / s;
        let dx = -line.b * q;
        let dy = line.a * q;
        let i1 = Pos {
            x: h.x + dx,
            y: h.y + dy,
        };
        let i2 = Pos {
            x: h.x - dx,
            y: h.y - dy,
        };
        if !i1.is_defined() || !i2.is_defined() {
            return Candidates::UNDEFINED;
        }
        let (first, second) = Pos::left_point_first(i1, i2);
        Candidates { first, second }
    }
}

/// 多值交点的分支编号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Branch {
    /// 左点
    First,
    /// 右点
    Second,
}

impl Branch {
    /// 由分支变量的值得到分支，只接受1或2
    pub fn from_num(value: Num) -> Option<Branch> {
        if value == Num::ONE {
            Some(Branch::First)
        } else if value == Num::TWO {
            Some(Branch::Second)
        } else {
            None
        }
    }

    pub fn from_index(index: u8) -> Option<Branch> {
        match index {
            1 => Some(Branch::First),
            2 => Some(Branch::Second),
            _ => None,
        }
    }

    pub fn index(&self) -> u8 {
        match self {
            Branch::First => 1,
            Branch::Second => 2,
        }
    }

    pub fn to_num(&self) -> Num {
        Num::from(self.index() as i64)
    }
}

/// 多值交点的两个候选解，`first`为分支1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidates {
    pub first: Pos,
    pub second: Pos,
}

impl Candidates {
    pub const UNDEFINED: Candidates = Candidates {
        first: Pos::UNDEFINED,
        second: Pos::UNDEFINED,
    };

    pub fn is_defined(&self) -> bool {
        self.first.is_defined() && self.second.is_defined()
    }

    pub fn get(&self, branch: Branch) -> Pos {
        match branch {
            Branch::First => self.first,
            Branch::Second => self.second,
        }
    }

    /// 选择离目标点较近的分支，距离相同时取分支1
    ///
    /// 任一候选未定义时返回`None`，由调用方决定默认分支。
    pub fn nearest_to(&self, target: &Pos) -> Option<Branch> {
        let d1 = self.first.distance_sq(target);
        let d2 = self.second.distance_sq(target);
        if d1.is_undefined() || d2.is_undefined() {
            return None;
        }
        if d2.lt(&d1) {
            Some(Branch::Second)
        } else {
            Some(Branch::First)
        }
    }
}
