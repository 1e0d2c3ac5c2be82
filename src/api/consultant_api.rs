// ==========================================
// 顾问项目管理 - 顾问 API
// ==========================================
// 职责: 顾问的查询、新增、修改、删除与概览
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{require_text, validate_consultant_no, validate_project_no};
use crate::domain::consultant::{
    Consultant, ConsultantOverview, ConsultantWithProjectCount, NewConsultant,
};
use crate::i18n::t_with_args;
use crate::repository::error::RepositoryError;
use crate::repository::{AssignmentRepository, ConsultantRepository, ProjectRepository};

// ==========================================
// ConsultantApi - 顾问 API
// ==========================================

/// 顾问API
///
/// 职责：
/// 1. 顾问列表（含参与项目数）
/// 2. 顾问维护（编号可修改）
/// 3. 删除顾问时级联删除其分配
pub struct ConsultantApi {
    consultant_repo: Arc<ConsultantRepository>,
    project_repo: Arc<ProjectRepository>,
    assignment_repo: Arc<AssignmentRepository>,
}

impl ConsultantApi {
    /// 创建新的ConsultantApi实例
    pub fn new(
        consultant_repo: Arc<ConsultantRepository>,
        project_repo: Arc<ProjectRepository>,
        assignment_repo: Arc<AssignmentRepository>,
    ) -> Self {
        Self {
            consultant_repo,
            project_repo,
            assignment_repo,
        }
    }

    /// 查询全部顾问
    pub fn list(&self) -> ApiResult<Vec<Consultant>> {
        Ok(self.consultant_repo.find_all()?)
    }

    /// 按编号查询顾问
    ///
    /// # 返回
    /// - Ok(Consultant): 找到
    /// - Err(ApiError::NotFound): 不存在
    pub fn get(&self, consultant_no: i64) -> ApiResult<Consultant> {
        self.consultant_repo
            .find_by_no(consultant_no)?
            .ok_or_else(|| not_found(consultant_no))
    }

    /// 查询全部顾问及其参与项目数
    pub fn list_with_project_count(&self) -> ApiResult<Vec<ConsultantWithProjectCount>> {
        Ok(self.consultant_repo.find_all_with_project_count()?)
    }

    /// 查询尚未参与指定项目的顾问（可分配人选）
    pub fn list_available_for_project(&self, project_no: i64) -> ApiResult<Vec<Consultant>> {
        validate_project_no(project_no)?;
        let project_id = self.project_repo.find_id_by_no(project_no)?.ok_or_else(|| {
            ApiError::NotFound(t_with_args(
                "project.not_found",
                &[("no", &project_no.to_string())],
            ))
        })?;
        Ok(self.consultant_repo.find_not_in_project(project_id)?)
    }

    /// 新增顾问
    ///
    /// # 参数
    /// - consultant_no: 顾问编号（> 0，唯一）
    /// - name / title: 非空（去除首尾空白后保存）
    pub fn create(&self, consultant_no: i64, name: &str, title: &str) -> ApiResult<Consultant> {
        let new = build_consultant(consultant_no, name, title)?;

        let consultant_id = self
            .consultant_repo
            .insert(&new)
            .map_err(|e| duplicate_or(e, consultant_no))?;

        Ok(Consultant {
            consultant_id,
            consultant_no: new.consultant_no,
            name: new.name,
            title: new.title,
        })
    }

    /// 修改顾问（编号、姓名、头衔）
    pub fn update(
        &self,
        old_consultant_no: i64,
        new_consultant_no: i64,
        name: &str,
        title: &str,
    ) -> ApiResult<Consultant> {
        let new = build_consultant(new_consultant_no, name, title)?;

        self.consultant_repo
            .update(old_consultant_no, &new)
            .map_err(|e| match e {
                RepositoryError::NotFound { .. } => not_found(old_consultant_no),
                other => duplicate_or(other, new_consultant_no),
            })?;

        self.get(new_consultant_no)
    }

    /// 删除顾问（同时删除其全部项目分配）
    ///
    /// # 返回
    /// - Ok(usize): 同时删除的分配数
    pub fn delete(&self, consultant_no: i64) -> ApiResult<usize> {
        self.consultant_repo
            .delete(consultant_no)
            .map_err(|e| match e {
                RepositoryError::NotFound { .. } => not_found(consultant_no),
                other => other.into(),
            })
    }

    /// 顾问概览（分配数 + 总工时）
    pub fn overview(&self, consultant_no: i64) -> ApiResult<ConsultantOverview> {
        let consultant = self.get(consultant_no)?;
        let assignments = self
            .assignment_repo
            .find_by_consultant_id(consultant.consultant_id)?;
        let total_hours = self
            .assignment_repo
            .total_hours_for_consultant(consultant.consultant_id)?;

        Ok(ConsultantOverview {
            consultant,
            assignment_count: assignments.len(),
            total_hours,
        })
    }
}

fn build_consultant(consultant_no: i64, name: &str, title: &str) -> ApiResult<NewConsultant> {
    validate_consultant_no(consultant_no)?;
    let name = require_text(name, "consultant.name_empty")?;
    let title = require_text(title, "consultant.title_empty")?;
    Ok(NewConsultant::new(consultant_no, name, title))
}

fn not_found(consultant_no: i64) -> ApiError {
    ApiError::NotFound(t_with_args(
        "consultant.not_found",
        &[("no", &consultant_no.to_string())],
    ))
}

fn duplicate_or(err: RepositoryError, consultant_no: i64) -> ApiError {
    match err {
        RepositoryError::UniqueConstraintViolation(_) => ApiError::Duplicate(t_with_args(
            "consultant.duplicate",
            &[("no", &consultant_no.to_string())],
        )),
        other => other.into(),
    }
}
