//! 精确数值模型
//!
//! 所有坐标与系数均使用十进制定点数（`rust_decimal::Decimal`，28位有效数字），
//! 并附带一个显式的"未定义"哨兵值：
//! - 任何以未定义值为操作数的运算结果仍为未定义
//! - 溢出、除以零、负数开方同样得到未定义
//! - 运算永不panic，也不返回错误

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

/// 可能未定义的精确数值
///
/// 相等比较是结构性的：两个未定义值彼此相等，便于测试与缓存比较。
/// 数值大小比较请使用 [`Num::compare`]，未定义值不参与排序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Num(Option<Decimal>);

impl Num {
    /// 未定义哨兵值
    pub const UNDEFINED: Num = Num(None);
    pub const ZERO: Num = Num(Some(Decimal::ZERO));
    pub const ONE: Num = Num(Some(Decimal::ONE));
    pub const TWO: Num = Num(Some(Decimal::TWO));

    pub fn new(value: Decimal) -> Self {
        Self(Some(value))
    }

    /// 从浮点数转换（供显示层使用），NaN与无穷大得到未定义
    pub fn from_f64(value: f64) -> Self {
        Self(Decimal::from_f64(value))
    }

    pub fn is_defined(&self) -> bool {
        self.0.is_some()
    }

    pub fn is_undefined(&self) -> bool {
        self.0.is_none()
    }

    /// 内部十进制值
    pub fn value(&self) -> Option<Decimal> {
        self.0
    }

    /// 是否为已定义的零
    pub fn is_zero(&self) -> bool {
        matches!(self.0, Some(d) if d.is_zero())
    }

    pub fn abs(self) -> Num {
        Num(self.0.map(|d| d.abs()))
    }

    pub fn square(self) -> Num {
        self * self
    }

    /// 平方根，负数得到未定义
    pub fn sqrt(self) -> Num {
        Num(self.0.and_then(|d| d.sqrt()))
    }

    /// 比较大小，任一方未定义时返回`None`
    pub fn compare(&self, other: &Num) -> Option<Ordering> {
        match (self.0, other.0) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => None,
        }
    }

    /// 是否严格小于；未定义参与时为`false`
    pub fn lt(&self, other: &Num) -> bool {
        self.compare(other) == Some(Ordering::Less)
    }

    /// 是否严格大于；未定义参与时为`false`
    pub fn gt(&self, other: &Num) -> bool {
        self.compare(other) == Some(Ordering::Greater)
    }

    /// 转换为浮点数（供显示层使用）
    pub fn to_f64(&self) -> Option<f64> {
        self.0.and_then(|d| d.to_f64())
    }

    fn zip_with(self, rhs: Num, f: impl FnOnce(Decimal, Decimal) -> Option<Decimal>) -> Num {
        match (self.0, rhs.0) {
            (Some(a), Some(b)) => Num(f(a, b)),
            _ => Num::UNDEFINED,
        }
    }
}

impl From<Decimal> for Num {
    fn from(value: Decimal) -> Self {
        Self::new(value)
    }
}

impl From<i64> for Num {
    fn from(value: i64) -> Self {
        Self::new(Decimal::from(value))
    }
}

impl From<i32> for Num {
    fn from(value: i32) -> Self {
        Self::new(Decimal::from(value))
    }
}

impl FromStr for Num {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("undefined") || s.eq_ignore_ascii_case("nan") {
            return Ok(Num::UNDEFINED);
        }
        Decimal::from_str(s).map(Num::new)
    }
}

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(d) => write!(f, "{}", d.normalize()),
            None => write!(f, "undefined"),
        }
    }
}

impl Add for Num {
    type Output = Num;

    fn add(self, rhs: Num) -> Num {
        self.zip_with(rhs, |a, b| a.checked_add(b))
    }
}

impl Sub for Num {
    type Output = Num;

    fn sub(self, rhs: Num) -> Num {
        self.zip_with(rhs, |a, b| a.checked_sub(b))
    }
}

impl Mul for Num {
    type Output = Num;

    fn mul(self, rhs: Num) -> Num {
        self.zip_with(rhs, |a, b| a.checked_mul(b))
    }
}

impl Div for Num {
    type Output = Num;

    fn div(self, rhs: Num) -> Num {
        // checked_div对除数为零返回None
        self.zip_with(rhs, |a, b| a.checked_div(b))
    }
}

impl Neg for Num {
    type Output = Num;

    fn neg(self) -> Num {
        Num(self.0.map(|d| -d))
    }
}
