// ==========================================
// 顾问项目管理 - 里程碑 API
// ==========================================
// 职责: 里程碑查询、新增、删除
// 规则: 日期不早于最早允许日期，且落在项目周期内；编号全局唯一
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;

use crate::api::error::{ApiError, ApiResult};
use crate::api::project_api;
use crate::api::validator::{require_text, validate_milestone_date};
use crate::domain::milestone::{Milestone, NewMilestone};
use crate::domain::project::Project;
use crate::i18n::{t, t_with_args};
use crate::repository::error::RepositoryError;
use crate::repository::{MilestoneRepository, ProjectRepository};

/// 里程碑API
pub struct MilestoneApi {
    milestone_repo: Arc<MilestoneRepository>,
    project_repo: Arc<ProjectRepository>,
    min_date: NaiveDate,
}

impl MilestoneApi {
    /// 创建新的MilestoneApi实例
    ///
    /// # 参数
    /// - min_date: 里程碑最早允许日期（见 AppConfig::milestone_min_date）
    pub fn new(
        milestone_repo: Arc<MilestoneRepository>,
        project_repo: Arc<ProjectRepository>,
        min_date: NaiveDate,
    ) -> Self {
        Self {
            milestone_repo,
            project_repo,
            min_date,
        }
    }

    /// 查询项目的全部里程碑（按日期排序）
    pub fn list_for_project(&self, project_no: i64) -> ApiResult<Vec<Milestone>> {
        self.require_project(project_no)?;
        Ok(self.milestone_repo.find_by_project_no(project_no)?)
    }

    /// 项目里程碑数
    pub fn count_for_project(&self, project_no: i64) -> ApiResult<i64> {
        self.require_project(project_no)?;
        Ok(self.milestone_repo.count_for_project_no(project_no)?)
    }

    /// 新增里程碑
    ///
    /// # 校验顺序
    /// 1. 编号 > 0，名称非空
    /// 2. 项目存在
    /// 3. 日期规则（最早日期 / 项目周期）
    /// 4. 编号未被占用
    pub fn create(
        &self,
        milestone_no: i64,
        name: &str,
        date: NaiveDate,
        project_no: i64,
    ) -> ApiResult<Milestone> {
        if milestone_no <= 0 {
            return Err(ApiError::InvalidInput(t("milestone.no_positive")));
        }
        let name = require_text(name, "milestone.name_empty")?;
        let project = self.require_project(project_no)?;
        validate_milestone_date(date, self.min_date, &project)?;

        if self.milestone_repo.exists(milestone_no)? {
            return Err(duplicate(milestone_no));
        }

        let new = NewMilestone {
            milestone_no,
            name,
            date,
            project_no,
        };
        let milestone_id = self.milestone_repo.insert(&new).map_err(|e| match e {
            RepositoryError::UniqueConstraintViolation(_) => duplicate(milestone_no),
            RepositoryError::NotFound { .. } => project_api::not_found(project_no),
            other => other.into(),
        })?;

        Ok(Milestone {
            milestone_id,
            milestone_no: new.milestone_no,
            name: new.name,
            date: new.date,
            project_id: project.project_id,
            project_no,
        })
    }

    /// 删除里程碑
    pub fn delete(&self, milestone_no: i64) -> ApiResult<()> {
        if self.milestone_repo.delete(milestone_no)? == 0 {
            return Err(ApiError::NotFound(t_with_args(
                "milestone.not_found",
                &[("no", &milestone_no.to_string())],
            )));
        }
        Ok(())
    }

    fn require_project(&self, project_no: i64) -> ApiResult<Project> {
        self.project_repo
            .find_by_no(project_no)?
            .ok_or_else(|| project_api::not_found(project_no))
    }
}

fn duplicate(milestone_no: i64) -> ApiError {
    ApiError::Duplicate(t_with_args(
        "milestone.duplicate",
        &[("no", &milestone_no.to_string())],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use crate::domain::project::NewProject;
    use std::sync::Mutex;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup() -> MilestoneApi {
        let conn = Arc::new(Mutex::new(open_in_memory().unwrap()));
        let project_repo = Arc::new(ProjectRepository::from_connection(conn.clone()));
        project_repo
            .insert(&NewProject {
                project_no: 1,
                name: "Alpha".to_string(),
                start_date: date(2024, 1, 1),
                end_date: Some(date(2024, 12, 31)),
            })
            .unwrap();
        project_repo
            .insert(&NewProject {
                project_no: 2,
                name: "Legacy".to_string(),
                start_date: date(2020, 1, 1),
                end_date: None,
            })
            .unwrap();
        MilestoneApi::new(
            Arc::new(MilestoneRepository::from_connection(conn)),
            project_repo,
            date(2022, 1, 1),
        )
    }

    #[test]
    fn test_create_and_list() {
        let api = setup();
        api.create(2, "Launch", date(2024, 9, 1), 1).unwrap();
        let m = api.create(1, " Kickoff ", date(2024, 2, 1), 1).unwrap();
        assert_eq!(m.name, "Kickoff");

        let list = api.list_for_project(1).unwrap();
        let nos: Vec<i64> = list.iter().map(|m| m.milestone_no).collect();
        assert_eq!(nos, vec![1, 2]);
        assert_eq!(api.count_for_project(1).unwrap(), 2);
        assert_eq!(api.count_for_project(2).unwrap(), 0);
    }

    #[test]
    fn test_create_日期规则() {
        let api = setup();
        // 项目周期外
        assert!(matches!(
            api.create(1, "Early", date(2023, 12, 31), 1),
            Err(ApiError::InvalidInput(_))
        ));
        assert!(matches!(
            api.create(1, "Late", date(2025, 1, 1), 1),
            Err(ApiError::InvalidInput(_))
        ));
        // 项目内但早于最早允许日期
        assert!(matches!(
            api.create(1, "Old", date(2021, 6, 1), 2),
            Err(ApiError::InvalidInput(_))
        ));
        assert!(api.create(1, "Ok", date(2022, 1, 1), 2).is_ok());
    }

    #[test]
    fn test_create_重复编号与项目不存在() {
        let api = setup();
        api.create(7, "A", date(2024, 3, 1), 1).unwrap();
        assert!(matches!(
            api.create(7, "B", date(2024, 4, 1), 2),
            Err(ApiError::Duplicate(_))
        ));
        assert!(api.create(8, "C", date(2024, 4, 1), 99).unwrap_err().is_not_found());
        assert!(matches!(
            api.create(0, "D", date(2024, 4, 1), 1),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_delete() {
        let api = setup();
        api.create(3, "A", date(2024, 3, 1), 1).unwrap();
        api.delete(3).unwrap();
        assert!(api.delete(3).unwrap_err().is_not_found());
    }
}
