// ==========================================
// 顾问项目管理 - 数据库元数据视图
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 表名 + 行数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRowCount {
    pub table_name: String,
    pub row_count: i64,
}

impl fmt::Display for TableRowCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} rows)", self.table_name, self.row_count)
    }
}

/// 元数据快照（元数据页所需的全部信息）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseMetadata {
    pub all_columns: Vec<String>,
    pub primary_key_columns: Vec<String>,
    pub check_constraints: Vec<String>,
    pub non_integer_consultant_columns: Vec<String>,
    pub largest_table: Option<TableRowCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_row_count_display() {
        let t = TableRowCount {
            table_name: "Consultant".to_string(),
            row_count: 12,
        };
        assert_eq!(t.to_string(), "Consultant (12 rows)");
    }
}
