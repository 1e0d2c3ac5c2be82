// ==========================================
// 顾问项目管理 - 项目 API
// ==========================================
// 职责: 项目的查询、维护、删除与人员明细
// 约束: 删除项目时级联删除里程碑与分配（仓储层单事务）
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{require_text, validate_project_dates, validate_project_no};
use crate::domain::assignment::AssignmentDetail;
use crate::domain::project::{NewProject, Project};
use crate::i18n::t_with_args;
use crate::repository::error::RepositoryError;
use crate::repository::{AssignmentRepository, ProjectDeletion, ProjectRepository};

/// 项目API
pub struct ProjectApi {
    project_repo: Arc<ProjectRepository>,
    assignment_repo: Arc<AssignmentRepository>,
}

impl ProjectApi {
    pub fn new(
        project_repo: Arc<ProjectRepository>,
        assignment_repo: Arc<AssignmentRepository>,
    ) -> Self {
        Self {
            project_repo,
            assignment_repo,
        }
    }

    /// 查询全部项目（按编号排序）
    pub fn list(&self) -> ApiResult<Vec<Project>> {
        Ok(self.project_repo.find_all()?)
    }

    /// 按编号查询项目
    pub fn get(&self, project_no: i64) -> ApiResult<Project> {
        self.project_repo
            .find_by_no(project_no)?
            .ok_or_else(|| not_found(project_no))
    }

    /// 新增项目
    ///
    /// # 参数
    /// - project_no: 项目编号（> 0，唯一）
    /// - name: 非空
    /// - start_date / end_date: end_date 为空表示进行中；否则不得早于 start_date
    pub fn create(
        &self,
        project_no: i64,
        name: &str,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> ApiResult<Project> {
        let new = build_project(project_no, name, start_date, end_date)?;

        let project_id = self.project_repo.insert(&new).map_err(|e| match e {
            RepositoryError::UniqueConstraintViolation(_) => ApiError::Duplicate(t_with_args(
                "project.duplicate",
                &[("no", &project_no.to_string())],
            )),
            other => other.into(),
        })?;

        Ok(Project {
            project_id,
            project_no: new.project_no,
            name: new.name,
            start_date: new.start_date,
            end_date: new.end_date,
        })
    }

    /// 修改项目名称与起止日期（编号不可修改）
    pub fn update(
        &self,
        project_no: i64,
        name: &str,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> ApiResult<Project> {
        let new = build_project(project_no, name, start_date, end_date)?;

        self.project_repo.update(&new).map_err(|e| match e {
            RepositoryError::NotFound { .. } => not_found(project_no),
            other => other.into(),
        })?;

        self.get(project_no)
    }

    /// 删除项目
    ///
    /// # 返回
    /// - Ok(ProjectDeletion): 级联删除的里程碑数与分配数
    pub fn delete(&self, project_no: i64) -> ApiResult<ProjectDeletion> {
        self.project_repo.delete(project_no).map_err(|e| match e {
            RepositoryError::NotFound { .. } => not_found(project_no),
            other => other.into(),
        })
    }

    /// 项目人员明细（按顾问编号排序）
    pub fn staff(&self, project_no: i64) -> ApiResult<Vec<AssignmentDetail>> {
        let project = self.get(project_no)?;
        Ok(self
            .assignment_repo
            .find_details_by_project_id(project.project_id)?)
    }
}

fn build_project(
    project_no: i64,
    name: &str,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> ApiResult<NewProject> {
    validate_project_no(project_no)?;
    let name = require_text(name, "project.name_empty")?;
    validate_project_dates(start_date, end_date)?;
    Ok(NewProject {
        project_no,
        name,
        start_date,
        end_date,
    })
}

pub(crate) fn not_found(project_no: i64) -> ApiError {
    ApiError::NotFound(t_with_args(
        "project.not_found",
        &[("no", &project_no.to_string())],
    ))
}
