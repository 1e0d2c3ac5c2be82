// ==========================================
// 顾问项目管理 - 领域模型层
// ==========================================
// 职责: 定义领域实体与只读视图
// 红线: 不含数据访问逻辑
// ==========================================

pub mod assignment;
pub mod consultant;
pub mod import;
pub mod metadata;
pub mod milestone;
pub mod project;

// 重导出核心类型
pub use assignment::{AssignmentDetail, ProjectAssignment, ResourceLoad};
pub use consultant::{Consultant, ConsultantOverview, ConsultantWithProjectCount, NewConsultant};
pub use import::{ImportSummary, RowError};
pub use metadata::{DatabaseMetadata, TableRowCount};
pub use milestone::{Milestone, NewMilestone};
pub use project::{NewProject, Project};
