// ==========================================
// 顾问项目管理 - 项目分配 API
// ==========================================
// 职责: 分配/取消分配顾问、登记工时、资源超配检查
// 说明: 超配只做提示（返回 + warn 日志），不阻止分配
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::project_api;
use crate::api::validator::validate_hours;
use crate::domain::assignment::ProjectAssignment;
use crate::domain::consultant::Consultant;
use crate::domain::project::Project;
use crate::i18n::{t, t_with_args};
use crate::repository::error::RepositoryError;
use crate::repository::{AssignmentRepository, ConsultantRepository, ProjectRepository};

// ==========================================
// AssignmentOutcome - 分配结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentOutcome {
    pub assignment: ProjectAssignment,
    /// 分配前评估：再加一人是否超过资源阈值
    pub oversubscribed: bool,
}

// ==========================================
// AssignmentApi - 项目分配 API
// ==========================================

/// 项目分配API
///
/// 职责：
/// 1. 顾问 ↔ 项目的分配与取消
/// 2. 工时登记（覆盖 / 累加）
/// 3. 资源超配评估
pub struct AssignmentApi {
    assignment_repo: Arc<AssignmentRepository>,
    consultant_repo: Arc<ConsultantRepository>,
    project_repo: Arc<ProjectRepository>,
    threshold: f64,
}

impl AssignmentApi {
    /// 创建新的AssignmentApi实例
    ///
    /// # 参数
    /// - threshold: 资源超配阈值 (0, 1]
    pub fn new(
        assignment_repo: Arc<AssignmentRepository>,
        consultant_repo: Arc<ConsultantRepository>,
        project_repo: Arc<ProjectRepository>,
        threshold: f64,
    ) -> Self {
        Self {
            assignment_repo,
            consultant_repo,
            project_repo,
            threshold,
        }
    }

    /// 将顾问分配到项目
    ///
    /// # 返回
    /// - Ok(AssignmentOutcome): 分配成功（oversubscribed 表示是否超配）
    /// - Err(NotFound): 顾问或项目不存在
    /// - Err(Duplicate): 顾问已在该项目
    pub fn assign(&self, consultant_no: i64, project_no: i64) -> ApiResult<AssignmentOutcome> {
        let project = self.require_project(project_no)?;
        let consultant = self.require_consultant(consultant_no)?;

        if self
            .assignment_repo
            .find(consultant.consultant_id, project.project_id)?
            .is_some()
        {
            return Err(already_assigned(&consultant, &project));
        }

        let oversubscribed = self.is_oversubscribed(&project)?;
        if oversubscribed {
            tracing::warn!(
                project_no,
                consultant_no,
                threshold = self.threshold,
                "项目资源超配"
            );
        }

        self.assignment_repo
            .insert(consultant.consultant_id, project.project_id)
            .map_err(|e| match e {
                RepositoryError::UniqueConstraintViolation(_) => {
                    already_assigned(&consultant, &project)
                }
                other => other.into(),
            })?;

        Ok(AssignmentOutcome {
            assignment: ProjectAssignment::new(consultant.consultant_id, project.project_id),
            oversubscribed,
        })
    }

    /// 取消分配
    pub fn unassign(&self, consultant_no: i64, project_no: i64) -> ApiResult<()> {
        let (consultant, project) = self.resolve(consultant_no, project_no)?;
        let rows = self
            .assignment_repo
            .delete(consultant.consultant_id, project.project_id)?;
        if rows == 0 {
            return Err(ApiError::NotFound(t("assignment.not_found")));
        }
        Ok(())
    }

    /// 设置工时（覆盖）
    pub fn set_hours(
        &self,
        consultant_no: i64,
        project_no: i64,
        hours: i64,
    ) -> ApiResult<ProjectAssignment> {
        validate_hours(hours)?;
        let mut assignment = self.require_assignment(consultant_no, project_no)?;
        assignment.hours_worked = hours;
        self.store_hours(&assignment)?;
        Ok(assignment)
    }

    /// 登记工时（在当前工时上累加，结果不得为负）
    pub fn log_hours(
        &self,
        consultant_no: i64,
        project_no: i64,
        delta: i64,
    ) -> ApiResult<ProjectAssignment> {
        let mut assignment = self.require_assignment(consultant_no, project_no)?;
        if assignment.add_hours(delta).is_none() {
            return Err(ApiError::InvalidInput(t("assignment.hours_overflow")));
        }
        validate_hours(assignment.hours_worked)?;
        self.store_hours(&assignment)?;
        Ok(assignment)
    }

    /// 顾问当前参与的进行中项目
    pub fn active_for_consultant(&self, consultant_no: i64) -> ApiResult<Vec<Project>> {
        let consultant = self.require_consultant(consultant_no)?;
        let ids: Vec<i64> = self
            .assignment_repo
            .find_active_by_consultant_id(consultant.consultant_id)?
            .into_iter()
            .map(|a| a.project_id)
            .collect();
        Ok(self.project_repo.find_by_ids(&ids)?)
    }

    /// 再向项目加入一名顾问是否超配
    pub fn check_oversubscription(&self, project_no: i64) -> ApiResult<bool> {
        let project = self.require_project(project_no)?;
        self.is_oversubscribed(&project)
    }

    fn is_oversubscribed(&self, project: &Project) -> ApiResult<bool> {
        let load = self
            .assignment_repo
            .resource_load(project.project_id)?
            .ok_or_else(|| project_api::not_found(project.project_no))?;
        tracing::debug!(project_no = project.project_no, ?load, "资源负载");
        Ok(load.would_exceed(self.threshold))
    }

    fn store_hours(&self, assignment: &ProjectAssignment) -> ApiResult<()> {
        self.assignment_repo.update_hours(
            assignment.consultant_id,
            assignment.project_id,
            assignment.hours_worked,
        )?;
        Ok(())
    }

    fn require_assignment(
        &self,
        consultant_no: i64,
        project_no: i64,
    ) -> ApiResult<ProjectAssignment> {
        let (consultant, project) = self.resolve(consultant_no, project_no)?;
        self.assignment_repo
            .find(consultant.consultant_id, project.project_id)?
            .ok_or_else(|| ApiError::NotFound(t("assignment.not_found")))
    }

    fn resolve(&self, consultant_no: i64, project_no: i64) -> ApiResult<(Consultant, Project)> {
        let consultant = self.require_consultant(consultant_no)?;
        let project = self.require_project(project_no)?;
        Ok((consultant, project))
    }

    fn require_consultant(&self, consultant_no: i64) -> ApiResult<Consultant> {
        self.consultant_repo.find_by_no(consultant_no)?.ok_or_else(|| {
            ApiError::NotFound(t_with_args(
                "consultant.not_found",
                &[("no", &consultant_no.to_string())],
            ))
        })
    }

    fn require_project(&self, project_no: i64) -> ApiResult<Project> {
        self.project_repo
            .find_by_no(project_no)?
            .ok_or_else(|| project_api::not_found(project_no))
    }
}

fn already_assigned(consultant: &Consultant, project: &Project) -> ApiError {
    ApiError::Duplicate(t_with_args(
        "consultant.already_assigned",
        &[("consultant", &consultant.name), ("project", &project.name)],
    ))
}
