// ==========================================
// 顾问项目管理 - 名册导入 Trait
// ==========================================
// 职责: 定义导入接口（不包含实现）
// ==========================================

use crate::domain::import::ImportSummary;
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

// ==========================================
// RawRow - 解析后的原始行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 文件中的行号（表头为第 1 行）
    pub row: usize,
    /// 表头 → 去除首尾空白后的值
    pub fields: HashMap<String, String>,
}

impl RawRow {
    /// 取非空字段值
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

// ==========================================
// RosterImporter Trait
// ==========================================
// 用途: 顾问 / 项目名册导入主接口
// 实现者: RosterImporterImpl
#[async_trait]
pub trait RosterImporter: Send + Sync {
    /// 导入顾问名册（列: consultant_no,name,title）
    ///
    /// # 返回
    /// - Ok(ImportSummary): 导入汇总（行级错误记入 errors，不中断）
    /// - Err: 文件不存在、格式不支持、数据库错误
    async fn import_consultants<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportSummary>;

    /// 导入项目名册（列: project_no,name,start_date,end_date）
    async fn import_projects<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportSummary>;

    /// 批量导入多个顾问名册文件（并发执行）
    ///
    /// # 说明
    /// - 每个文件独立导入，某个文件失败不影响其他文件
    /// - 返回顺序与入参一致
    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
    ) -> Vec<Result<ImportSummary, String>>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口
// 实现者: CsvRosterParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始行（已跳过空白行）
    fn parse_to_raw_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRow>>;
}
