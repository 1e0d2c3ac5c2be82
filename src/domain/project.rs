// ==========================================
// 顾问项目管理 - 项目领域模型
// ==========================================
// 对齐: Project 表
// 约定: end_date 为 None 表示进行中（active）
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Project - 项目
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: i64,
    pub project_no: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl Project {
    /// 是否为进行中项目（无结束日期）
    pub fn is_active(&self) -> bool {
        self.end_date.is_none()
    }

    /// 日期是否落在项目周期内（含首尾；无结束日期时只看开始日期）
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && self.end_date.map_or(true, |end| date <= end)
    }
}

/// 新建/更新项目的输入
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    pub project_no: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(end: Option<NaiveDate>) -> Project {
        Project {
            project_id: 1,
            project_no: 100,
            name: "Apollo".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end_date: end,
        }
    }

    #[test]
    fn test_is_active() {
        assert!(project(None).is_active());
        assert!(!project(NaiveDate::from_ymd_opt(2024, 6, 1)).is_active());
    }

    #[test]
    fn test_contains_边界() {
        let p = project(NaiveDate::from_ymd_opt(2024, 6, 1));
        assert!(p.contains(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
        assert!(p.contains(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()));
        assert!(!p.contains(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
        assert!(!p.contains(NaiveDate::from_ymd_opt(2024, 6, 2).unwrap()));

        let open = project(None);
        assert!(open.contains(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()));
    }
}
