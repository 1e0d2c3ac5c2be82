// ==========================================
// 顾问项目管理 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod assignment_repo;
pub mod consultant_repo;
pub mod error;
pub mod metadata_repo;
pub mod milestone_repo;
pub mod project_repo;

// 重导出核心仓储
pub use assignment_repo::AssignmentRepository;
pub use consultant_repo::ConsultantRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use metadata_repo::MetadataRepository;
pub use milestone_repo::MilestoneRepository;
pub use project_repo::{ProjectDeletion, ProjectRepository};
