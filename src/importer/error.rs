// ==========================================
// 顾问项目管理 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::api::error::ApiError;
use crate::i18n::t_with_args;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("{message}")]
    FileNotFound { path: String, message: String },

    #[error("{message}")]
    UnsupportedFormat { ext: String, message: String },

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 数据映射错误 =====
    /// 缺失字段 / 数值格式 / 日期格式 / 业务校验（消息已翻译）
    #[error("{message}")]
    RowError { row: usize, message: String },

    // ===== 数据库错误 =====
    #[error("数据库写入失败: {0}")]
    DatabaseError(#[from] RepositoryError),

    #[error("导入任务执行失败: {0}")]
    TaskError(String),
}

impl ImportError {
    pub fn file_not_found(path: &str) -> Self {
        ImportError::FileNotFound {
            path: path.to_string(),
            message: t_with_args("import.file_not_found", &[("path", path)]),
        }
    }

    pub fn unsupported_format(ext: &str) -> Self {
        ImportError::UnsupportedFormat {
            ext: ext.to_string(),
            message: t_with_args("import.unsupported_format", &[("ext", ext)]),
        }
    }

    /// 行级错误（按消息键翻译，附带行号与字段名）
    pub fn field(row: usize, field: &str, message_key: &str) -> Self {
        ImportError::RowError {
            row,
            message: t_with_args(message_key, &[("row", &row.to_string()), ("field", field)]),
        }
    }

    /// 错误所在行（文件级错误为 None）
    pub fn row(&self) -> Option<usize> {
        match self {
            ImportError::RowError { row, .. } => Some(*row),
            _ => None,
        }
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::DatabaseError(e) => e.into(),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
