// ==========================================
// 顾问项目管理 - 项目分配领域模型
// ==========================================
// 对齐: Project_Assignment 表（ConsultantID + ProjectID 联合主键）
// ==========================================

use serde::{Deserialize, Serialize};

/// 默认资源超配阈值：项目人数占全部在岗顾问的比例上限
pub const DEFAULT_OVERSUBSCRIPTION_THRESHOLD: f64 = 0.60;

// ==========================================
// ProjectAssignment - 项目分配
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectAssignment {
    pub consultant_id: i64,
    pub project_id: i64,
    pub hours_worked: i64,
}

impl ProjectAssignment {
    /// 新分配，工时从 0 开始
    pub fn new(consultant_id: i64, project_id: i64) -> Self {
        Self {
            consultant_id,
            project_id,
            hours_worked: 0,
        }
    }

    /// 累加工时（可为负，用于更正）
    ///
    /// # 返回
    /// - Some(i64): 累加后的工时
    /// - None: 溢出，工时保持不变
    pub fn add_hours(&mut self, hours: i64) -> Option<i64> {
        self.hours_worked = self.hours_worked.checked_add(hours)?;
        Some(self.hours_worked)
    }
}

/// 分配明细（附带顾问信息，用于项目人员列表）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentDetail {
    pub consultant_id: i64,
    pub project_id: i64,
    pub hours_worked: i64,
    pub consultant_no: i64,
    pub consultant_name: String,
    pub title: String,
}

// ==========================================
// ResourceLoad - 项目资源负载
// ==========================================
// 来源: 单条聚合查询（见 AssignmentRepository::resource_load）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLoad {
    /// 参与任一进行中项目的顾问数（去重）
    pub active_consultants: i64,
    /// 已在本项目的顾问数（不论项目状态）
    pub consultants_on_project: i64,
    /// 本项目是否进行中
    pub project_active: bool,
}

impl ResourceLoad {
    /// 再加入一名顾问后，本项目人数占比是否超过阈值
    ///
    /// # 规则
    /// - 已结束项目: 不判定超配
    /// - 无进行中项目的顾问: 无可比较基数，不判定超配
    /// - 否则: (项目人数 + 1) / 在岗顾问数 > threshold
    pub fn would_exceed(&self, threshold: f64) -> bool {
        if !self.project_active || self.active_consultants == 0 {
            return false;
        }
        let ratio = (self.consultants_on_project + 1) as f64 / self.active_consultants as f64;
        ratio > threshold
    }
}
