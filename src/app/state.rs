// ==========================================
// 顾问项目管理 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 说明: 全部仓储共享同一个数据库连接
// ==========================================

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::api::{
    ApiError, ApiResult, AssignmentApi, ConsultantApi, MetadataApi, MilestoneApi, ProjectApi,
    ReportApi,
};
use crate::config::AppConfig;
use crate::db::{init_schema, open_sqlite_connection};
use crate::i18n::t;
use crate::importer::{CsvRosterParser, RosterImporterImpl};
use crate::repository::{
    AssignmentRepository, ConsultantRepository, MetadataRepository, MilestoneRepository,
    ProjectRepository,
};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    pub consultant_api: Arc<ConsultantApi>,
    pub project_api: Arc<ProjectApi>,
    pub milestone_api: Arc<MilestoneApi>,
    pub assignment_api: Arc<AssignmentApi>,
    pub report_api: Arc<ReportApi>,
    pub metadata_api: Arc<MetadataApi>,

    /// 名册导入器
    pub importer: Arc<RosterImporterImpl>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 1. 打开数据库（不存在时创建）并初始化表结构
    /// 2. 初始化所有Repository（共享连接）
    /// 3. 创建所有API实例
    pub fn new(config: &AppConfig) -> ApiResult<Self> {
        tracing::info!(db_path = %config.db_path, "初始化AppState");

        // 数据库文件所在目录不存在时先创建
        if let Some(dir) = Path::new(&config.db_path).parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| ApiError::DatabaseConnectionError {
                    message: t("db.unavailable"),
                    detail: format!("{}: {}", dir.display(), e),
                })?;
                tracing::info!(dir = %dir.display(), "已创建数据目录");
            }
        }


        let conn = open_sqlite_connection(&config.db_path).map_err(|e| {
            ApiError::DatabaseConnectionError {
                message: t("db.unavailable"),
                detail: e.to_string(),
            }
        })?;
        Self::from_connection(conn, config)
    }

    /// 基于已打开的连接创建（测试可传入内存库）
    pub fn from_connection(conn: Connection, config: &AppConfig) -> ApiResult<Self> {
        init_schema(&conn).map_err(ApiError::database)?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let consultant_repo = Arc::new(ConsultantRepository::from_connection(conn.clone()));
        let project_repo = Arc::new(ProjectRepository::from_connection(conn.clone()));
        let milestone_repo = Arc::new(MilestoneRepository::from_connection(conn.clone()));
        let assignment_repo = Arc::new(AssignmentRepository::from_connection(conn.clone()));
        let metadata_repo = Arc::new(MetadataRepository::from_connection(conn));

        // ==========================================
        // 初始化API层
        // ==========================================
        let threshold = config.oversubscription_threshold;

        Ok(Self {
            db_path: config.db_path.clone(),
            consultant_api: Arc::new(ConsultantApi::new(
                consultant_repo.clone(),
                project_repo.clone(),
                assignment_repo.clone(),
            )),
            project_api: Arc::new(ProjectApi::new(project_repo.clone(), assignment_repo.clone())),
            milestone_api: Arc::new(MilestoneApi::new(
                milestone_repo,
                project_repo.clone(),
                config.milestone_min_date,
            )),
            assignment_api: Arc::new(AssignmentApi::new(
                assignment_repo.clone(),
                consultant_repo.clone(),
                project_repo.clone(),
                threshold,
            )),
            report_api: Arc::new(ReportApi::new(
                assignment_repo,
                consultant_repo.clone(),
                project_repo.clone(),
                threshold,
            )),
            metadata_api: Arc::new(MetadataApi::new(metadata_repo)),
            importer: Arc::new(RosterImporterImpl::new(
                consultant_repo,
                project_repo,
                Arc::new(CsvRosterParser),
            )),
        })
    }
}
