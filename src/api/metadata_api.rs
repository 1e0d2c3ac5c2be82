// ==========================================
// 顾问项目管理 - 数据库元数据 API
// ==========================================

use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::domain::metadata::{DatabaseMetadata, TableRowCount};
use crate::repository::MetadataRepository;

/// 非整数列查询的目标表
const CONSULTANT_TABLE: &str = "Consultant";

pub struct MetadataApi {
    metadata_repo: Arc<MetadataRepository>,
}

impl MetadataApi {
    pub fn new(metadata_repo: Arc<MetadataRepository>) -> Self {
        Self { metadata_repo }
    }

    /// 元数据快照（元数据页的全部信息）
    pub fn snapshot(&self) -> ApiResult<DatabaseMetadata> {
        Ok(DatabaseMetadata {
            all_columns: self.metadata_repo.all_columns()?,
            primary_key_columns: self.metadata_repo.primary_key_columns()?,
            check_constraints: self.metadata_repo.check_constraints()?,
            non_integer_consultant_columns: self
                .metadata_repo
                .non_integer_columns(CONSULTANT_TABLE)?,
            largest_table: self.metadata_repo.largest_table()?,
        })
    }

    pub fn largest_table(&self) -> ApiResult<Option<TableRowCount>> {
        Ok(self.metadata_repo.largest_table()?)
    }
}
