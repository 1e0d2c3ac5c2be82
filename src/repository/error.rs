// ==========================================
// 顾问项目管理 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 数据库错误 =====
    #[error("记录未找到: {entity} with {key}={id}")]
    NotFound {
        entity: String,
        key: String,
        id: String,
    },

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    #[error("外键约束违反: {0}")]
    ForeignKeyViolation(String),

    #[error("检查约束违反: {0}")]
    CheckConstraintViolation(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RepositoryError {
    /// 构造 NotFound 错误
    pub fn not_found(entity: &str, key: &str, id: impl ToString) -> Self {
        RepositoryError::NotFound {
            entity: entity.to_string(),
            key: key.to_string(),
            id: id.to_string(),
        }
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE") || msg.contains("PRIMARY KEY") {
                    RepositoryError::UniqueConstraintViolation(msg)
                } else if msg.contains("FOREIGN KEY") {
                    RepositoryError::ForeignKeyViolation(msg)
                } else if msg.contains("CHECK") {
                    RepositoryError::CheckConstraintViolation(msg)
                } else {
                    RepositoryError::DatabaseQueryError(msg)
                }
            }
            rusqlite::Error::QueryReturnedNoRows => {
                RepositoryError::not_found("Unknown", "id", "Unknown")
            }
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    #[test]
    fn test_unique_violation_分类() {
        let conn = open_in_memory().unwrap();
        conn.execute(
            "INSERT INTO Consultant (ConsultantNo, ConsultantName, Title) VALUES (1, 'A', 'Dev')",
            [],
        )
        .unwrap();
        let err: RepositoryError = conn
            .execute(
                "INSERT INTO Consultant (ConsultantNo, ConsultantName, Title) VALUES (1, 'B', 'Dev')",
                [],
            )
            .unwrap_err()
            .into();
        assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
    }

    #[test]
    fn test_check_violation_分类() {
        let conn = open_in_memory().unwrap();
        let err: RepositoryError = conn
            .execute(
                "INSERT INTO Consultant (ConsultantNo, ConsultantName, Title) VALUES (0, 'A', 'Dev')",
                [],
            )
            .unwrap_err()
            .into();
        assert!(matches!(err, RepositoryError::CheckConstraintViolation(_)));
    }
}
