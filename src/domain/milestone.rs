// ==========================================
// 顾问项目管理 - 里程碑领域模型
// ==========================================
// 对齐: Milestone 表（ProjectID 外键）
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub milestone_id: i64,
    pub milestone_no: i64,
    pub name: String,
    pub date: NaiveDate,
    pub project_id: i64,
    pub project_no: i64, // 关联查询得到，便于展示
}

/// 新建里程碑的输入（按项目编号关联）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMilestone {
    pub milestone_no: i64,
    pub name: String,
    pub date: NaiveDate,
    pub project_no: i64,
}
