// ==========================================
// 顾问项目管理 - API 层
// ==========================================
// 职责: 输入校验 + 错误翻译，供 CLI 与导入层调用
// ==========================================

pub mod assignment_api;
pub mod consultant_api;
pub mod error;
pub mod metadata_api;
pub mod milestone_api;
pub mod project_api;
pub mod report_api;
pub mod validator;

// 重导出核心类型
pub use assignment_api::{AssignmentApi, AssignmentOutcome};
pub use consultant_api::ConsultantApi;
pub use error::{ApiError, ApiResult};
pub use metadata_api::MetadataApi;
pub use milestone_api::MilestoneApi;
pub use project_api::ProjectApi;
pub use report_api::{ReportApi, StaffingSummary};
