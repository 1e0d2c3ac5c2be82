// ==========================================
// 顾问项目管理 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换Repository错误为用户可读的错误消息
// ==========================================

use crate::i18n::{t, t_with_args};
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
///
/// 面向用户的变体携带已翻译的消息（见 locales/）
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    BusinessRuleViolation(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("{message} ({detail})")]
    DatabaseError { message: String, detail: String },

    #[error("{message} ({detail})")]
    DatabaseConnectionError { message: String, detail: String },

    // ==========================================
    // 导入错误
    // ==========================================
    #[error("{0}")]
    ImportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 数据库读写失败（附带技术细节）
    pub fn database(detail: impl ToString) -> Self {
        ApiError::DatabaseError {
            message: t("db.save_failed"),
            detail: detail.to_string(),
        }
    }

    /// 是否为 NotFound
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

// ==========================================
// 从 RepositoryError 转换
// 目的: 将Repository层的技术错误转换为用户可读的业务错误
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, key, id } => {
                tracing::debug!(%entity, %key, %id, "记录未找到");
                ApiError::NotFound(t_with_args(
                    "db.not_found",
                    &[("entity", &entity), ("id", &id)],
                ))
            }
            RepositoryError::DatabaseConnectionError(msg) | RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError {
                    message: t("db.unavailable"),
                    detail: msg,
                }
            }
            RepositoryError::DatabaseTransactionError(msg)
            | RepositoryError::DatabaseQueryError(msg) => ApiError::database(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                tracing::warn!(detail = %msg, "唯一约束违反");
                ApiError::Duplicate(t("db.duplicate"))
            }
            RepositoryError::ForeignKeyViolation(msg)
            | RepositoryError::CheckConstraintViolation(msg) => {
                tracing::warn!(detail = %msg, "约束违反");
                ApiError::BusinessRuleViolation(t("db.constraint"))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_conversion() {
        let api_err: ApiError = RepositoryError::not_found("Consultant", "ConsultantNo", 7).into();
        match api_err {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("Consultant"));
                assert!(msg.contains("7"));
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }

        let api_err: ApiError =
            RepositoryError::UniqueConstraintViolation("UNIQUE constraint failed".into()).into();
        assert!(matches!(api_err, ApiError::Duplicate(_)));

        let api_err: ApiError =
            RepositoryError::ForeignKeyViolation("FOREIGN KEY constraint failed".into()).into();
        assert!(matches!(api_err, ApiError::BusinessRuleViolation(_)));

        let api_err: ApiError = RepositoryError::CheckConstraintViolation(
            "CHECK constraint failed: CK_Project_EndDate".into(),
        )
        .into();
        assert!(matches!(api_err, ApiError::BusinessRuleViolation(_)));

        let api_err: ApiError = RepositoryError::LockError("poisoned".into()).into();
        assert!(matches!(api_err, ApiError::DatabaseConnectionError { .. }));
    }

    #[test]
    fn test_约束错误_不暴露sqlite原文() {
        let raw = "UNIQUE constraint failed: Consultant.ConsultantNo";
        let dup: ApiError = RepositoryError::UniqueConstraintViolation(raw.into()).into();
        assert!(!dup.to_string().is_empty());
        assert!(!dup.to_string().contains("UNIQUE"));
        assert!(!dup.to_string().contains("Consultant.ConsultantNo"));

        let raw = "FOREIGN KEY constraint failed";
        let fk: ApiError = RepositoryError::ForeignKeyViolation(raw.into()).into();
        assert!(!fk.to_string().contains("FOREIGN KEY"));

        let nf: ApiError = RepositoryError::not_found("Milestone", "MilestoneNo", 31).into();
        assert!(!nf.to_string().contains("MilestoneNo="));
    }

    #[test]
    fn test_is_not_found() {
        assert!(ApiError::NotFound("x".into()).is_not_found());
        assert!(!ApiError::InvalidInput("x".into()).is_not_found());
    }
}
