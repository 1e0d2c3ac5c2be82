// ==========================================
// 顾问项目管理 - 顾问领域模型
// ==========================================
// 对齐: Consultant 表
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Consultant - 顾问
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consultant {
    pub consultant_id: i64, // 内部主键
    pub consultant_no: i64, // 业务编号（唯一）
    pub name: String,
    pub title: String,
}

impl fmt::Display for Consultant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.title)
    }
}

/// 新建/更新顾问的输入（不含内部主键）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewConsultant {
    pub consultant_no: i64,
    pub name: String,
    pub title: String,
}

impl NewConsultant {
    pub fn new(consultant_no: i64, name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            consultant_no,
            name: name.into(),
            title: title.into(),
        }
    }
}

/// 顾问 + 参与项目数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultantWithProjectCount {
    pub consultant_no: i64,
    pub name: String,
    pub title: String,
    pub project_count: i64,
}

/// 顾问概览（详情面板）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultantOverview {
    pub consultant: Consultant,
    pub assignment_count: usize,
    pub total_hours: i64,
}
