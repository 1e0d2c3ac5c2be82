// ==========================================
// 顾问项目管理 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 顾问、项目、里程碑与工时记录
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与只读视图
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - CSV 名册
pub mod importer;

// 配置层 - 应用配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{
    AssignmentDetail, Consultant, ConsultantOverview, ConsultantWithProjectCount,
    DatabaseMetadata, ImportSummary, Milestone, NewConsultant, NewMilestone, NewProject, Project,
    ProjectAssignment, ResourceLoad, TableRowCount,
};

// API
pub use api::{
    ApiError, ApiResult, AssignmentApi, AssignmentOutcome, ConsultantApi, MetadataApi,
    MilestoneApi, ProjectApi, ReportApi, StaffingSummary,
};

pub use app::AppState;
pub use config::AppConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "project-staffing";
