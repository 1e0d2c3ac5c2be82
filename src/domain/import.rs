// ==========================================
// 顾问项目管理 - 批量导入结果
// ==========================================

use serde::{Deserialize, Serialize};

/// 单行导入失败原因
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// 文件中的行号（表头为第 1 行）
    pub row: usize,
    pub message: String,
}

/// 单个文件的导入汇总
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub batch_id: String,
    pub total_rows: usize,
    pub imported: usize,
    /// 未导入行数（校验失败 + 编号已存在）
    pub skipped: usize,
    pub errors: Vec<RowError>,
}

impl ImportSummary {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}
