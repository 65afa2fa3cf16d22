//! 文档配置

use crate::geometry::Branch;
use serde::{Deserialize, Serialize};

/// 文档配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// 创建点时是否自动分配标签
    pub auto_label_points: bool,
    /// 无法自动选择分支时使用的分支（1或2）
    pub default_branch: u8,
    /// 日志级别
    pub log_level: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            auto_label_points: true,
            default_branch: 1,
            log_level: "info".to_string(),
        }
    }
}

impl DocumentConfig {
    /// 从JSON读取，缺省字段取默认值
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 默认分支，非法取值按第一分支处理
    pub fn default_branch(&self) -> Branch {
        Branch::from_index(self.default_branch).unwrap_or_else(|| {
            tracing::warn!(
                value = self.default_branch,
                "default_branch must be 1 or 2, using 1"
            );
            Branch::First
        })
    }
}
