// ==========================================
// 顾问项目管理 - 统计报表 API
// ==========================================
// 职责: 工时最高顾问、全员参与项目、参与项目数上限、总工时、汇总
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::consultant::Consultant;
use crate::domain::project::Project;
use crate::i18n::t;
use crate::repository::error::RepositoryError;
use crate::repository::{AssignmentRepository, ConsultantRepository, ProjectRepository};

// ==========================================
// StaffingSummary - 人员配置汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffingSummary {
    pub consultant_count: i64,
    pub project_count: i64,
    pub active_project_count: i64,
    pub total_hours: i64,
    /// 尚无分配时为空
    pub hardest_working: Vec<Consultant>,
    pub all_hands_projects: Vec<Project>,
}

/// 统计报表API
pub struct ReportApi {
    assignment_repo: Arc<AssignmentRepository>,
    consultant_repo: Arc<ConsultantRepository>,
    project_repo: Arc<ProjectRepository>,
    threshold: f64,
}

impl ReportApi {
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

    /// 累计工时最高的顾问（并列时全部返回）
    ///
    /// # 返回
    /// - Err(ApiError::NotFound): 尚无任何分配记录
    pub fn hardest_working_consultants(&self) -> ApiResult<Vec<Consultant>> {
        let ids = self
            .assignment_repo
            .hardest_working_consultants()
            .map_err(|e| match e {
                RepositoryError::NotFound { .. } => ApiError::NotFound(t("report.no_assignments")),
                other => other.into(),
            })?;
        Ok(self.consultant_repo.find_by_ids(&ids)?)
    }

    /// 全体顾问均参与的项目
    pub fn projects_involving_every_consultant(&self) -> ApiResult<Vec<Project>> {
        let ids = self.assignment_repo.projects_involving_every_consultant()?;
        Ok(self.project_repo.find_by_ids(&ids)?)
    }

    /// 参与项目数不超过 max 的顾问姓名
    pub fn consultants_in_max_projects(&self, max: i64) -> ApiResult<Vec<String>> {
        if max < 0 {
            return Err(ApiError::InvalidInput(t("report.max_negative")));
        }
        Ok(self.assignment_repo.consultants_in_max_projects(max)?)
    }

    /// 全体顾问累计工时
    pub fn total_hours_for_all(&self) -> ApiResult<i64> {
        Ok(self.assignment_repo.total_hours_for_all()?)
    }

    /// 再加入一名顾问即超配的进行中项目
    pub fn oversubscribed_projects(&self) -> ApiResult<Vec<Project>> {
        let mut result = Vec::new();
        for project in self.project_repo.find_all()? {
            if !project.is_active() {
                continue;
            }
            let exceeded = self
                .assignment_repo
                .resource_load(project.project_id)?
                .map_or(false, |load| load.would_exceed(self.threshold));
            if exceeded {
                result.push(project);
            }
        }
        Ok(result)
    }

    /// 汇总（报表页概览）
    pub fn summary(&self) -> ApiResult<StaffingSummary> {
        let consultant_count = self.consultant_repo.count()?;
        let (project_count, active_project_count) = self.project_repo.count()?;
        let total_hours = self.total_hours_for_all()?;

        let hardest_working = match self.hardest_working_consultants() {
            Ok(list) => list,
            Err(ApiError::NotFound(_)) => Vec::new(),
            Err(e) => return Err(e),
        };
        let all_hands_projects = self.projects_involving_every_consultant()?;

        tracing::debug!(consultant_count, project_count, total_hours, "生成汇总");
        Ok(StaffingSummary {
            consultant_count,
            project_count,
            active_project_count,
            total_hours,
            hardest_working,
            all_hands_projects,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use crate::domain::consultant::NewConsultant;
    use crate::domain::project::NewProject;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    struct Fixture {
        api: ReportApi,
        assignments: Arc<AssignmentRepository>,
        consultants: Vec<i64>,
        projects: Vec<i64>,
    }

    fn setup() -> Fixture {
        let conn = Arc::new(Mutex::new(open_in_memory().unwrap()));
        let assignment_repo = Arc::new(AssignmentRepository::from_connection(conn.clone()));
        let consultant_repo = Arc::new(ConsultantRepository::from_connection(conn.clone()));
        let project_repo = Arc::new(ProjectRepository::from_connection(conn));

        let consultants = ["Cy", "Al", "Bo"]
            .iter()
            .enumerate()
            .map(|(i, name)| {
                consultant_repo
                    .insert(&NewConsultant::new(i as i64 + 1, *name, "Dev"))
                    .unwrap()
            })
            .collect();
        let projects = [(10, None), (20, NaiveDate::from_ymd_opt(2024, 3, 1))]
            .iter()
            .map(|(no, end)| {
                project_repo
                    .insert(&NewProject {
                        project_no: *no,
                        name: format!("P{}", no),
                        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                        end_date: *end,
                    })
                    .unwrap()
            })
            .collect();

        Fixture {
            api: ReportApi::new(assignment_repo.clone(), consultant_repo, project_repo, 0.60),
            assignments: assignment_repo,
            consultants,
            projects,
        }
    }

    #[test]
    fn test_summary_空库() {
        let f = setup();
        let summary = f.api.summary().unwrap();
        assert_eq!(summary.consultant_count, 3);
        assert_eq!(summary.project_count, 2);
        assert_eq!(summary.active_project_count, 1);
        assert_eq!(summary.total_hours, 0);
        assert!(summary.hardest_working.is_empty());
        assert!(summary.all_hands_projects.is_empty());
        assert!(f.api.hardest_working_consultants().unwrap_err().is_not_found());
    }

    #[test]
    fn test_hardest_working_并列() {
        let f = setup();
        let (c, p) = (&f.consultants, &f.projects);
        f.assignments.insert(c[0], p[0]).unwrap();
        f.assignments.insert(c[1], p[0]).unwrap();
        f.assignments.insert(c[1], p[1]).unwrap();
        f.assignments.update_hours(c[0], p[0], 10).unwrap();
        f.assignments.update_hours(c[1], p[0], 4).unwrap();
        f.assignments.update_hours(c[1], p[1], 6).unwrap();

        let names: Vec<String> = f
            .api
            .hardest_working_consultants()
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Cy", "Al"]);
        assert_eq!(f.api.total_hours_for_all().unwrap(), 20);
    }

    #[test]
    fn test_all_hands_and_max_projects() {
        let f = setup();
        let (c, p) = (&f.consultants, &f.projects);
        for id in c {
            f.assignments.insert(*id, p[0]).unwrap();
        }
        f.assignments.insert(c[2], p[1]).unwrap();

        let all_hands = f.api.projects_involving_every_consultant().unwrap();
        assert_eq!(all_hands.len(), 1);
        assert_eq!(all_hands[0].project_no, 10);

        assert_eq!(f.api.consultants_in_max_projects(1).unwrap(), vec!["Al", "Cy"]);
        assert_eq!(f.api.consultants_in_max_projects(2).unwrap().len(), 3);
        assert!(f.api.consultants_in_max_projects(0).unwrap().is_empty());
        assert!(matches!(
            f.api.consultants_in_max_projects(-1),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_oversubscribed_projects() {
        let f = setup();
        let (c, p) = (&f.consultants, &f.projects);
        assert!(f.api.oversubscribed_projects().unwrap().is_empty());

        f.assignments.insert(c[0], p[0]).unwrap();
        f.assignments.insert(c[1], p[1]).unwrap();
        let list = f.api.oversubscribed_projects().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].project_no, 10);
    }
}
