//! 显示坐标转换
//!
//! 核心只交换精确数值；绘图层需要浮点坐标时通过这里转换。

use crate::geometry::Pos;
use crate::number::Num;

pub type Point2 = nalgebra::Point2<f64>;

impl Pos {
    /// 转为浮点显示坐标，未定义时返回`None`
    pub fn to_display(&self) -> Option<Point2> {
        Some(Point2::new(self.x.to_f64()?, self.y.to_f64()?))
    }

    /// 由浮点显示坐标构造（例如鼠标拖动目标）
    pub fn from_display(p: &Point2) -> Pos {
        Pos {
            x: Num::from_f64(p.x),
            y: Num::from_f64(p.y),
        }
    }
}
