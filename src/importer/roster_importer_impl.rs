// ==========================================
// 顾问项目管理 - 名册导入器实现
// ==========================================
// 流程: 解析 → 映射/校验 → 落库（单事务，编号重复的行跳过）→ 汇总
// ==========================================

use crate::domain::import::{ImportSummary, RowError};
use crate::i18n::t_with_args;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::roster_importer_trait::{FileParser, RawRow, RosterImporter};
use crate::repository::{ConsultantRepository, ProjectRepository};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// RosterImporterImpl - 名册导入器实现
// ==========================================
pub struct RosterImporterImpl {
    consultant_repo: Arc<ConsultantRepository>,
    project_repo: Arc<ProjectRepository>,
    file_parser: Arc<dyn FileParser>,
}

impl RosterImporterImpl {
    /// 创建新的 RosterImporter 实例
    ///
    /// # 参数
    /// - file_parser: 文件解析器（通常为 CsvRosterParser）
    pub fn new(
        consultant_repo: Arc<ConsultantRepository>,
        project_repo: Arc<ProjectRepository>,
        file_parser: Arc<dyn FileParser>,
    ) -> Self {
        Self {
            consultant_repo,
            project_repo,
            file_parser,
        }
    }

    /// 阻塞执行: 解析 + 映射 + 落库
    ///
    /// # 参数
    /// - map: 行映射函数
    /// - insert: 批量写入函数，返回每行是否已插入
    /// - key_of: 重复行的编号（用于错误消息）
    fn run_import<T, M, I, K>(
        parser: &dyn FileParser,
        path: &Path,
        map: M,
        insert: I,
        key_of: K,
        duplicate_key: &str,
    ) -> ImportResult<ImportSummary>
    where
        M: Fn(&RawRow) -> ImportResult<T>,
        I: FnOnce(&[T]) -> ImportResult<Vec<bool>>,
        K: Fn(&T) -> i64,
    {
        let batch_id = Uuid::new_v4().to_string();
        info!(batch_id = %batch_id, file_path = %path.display(), "开始导入");

        // === 步骤 1: 解析文件 ===
        let raw_rows = parser.parse_to_raw_rows(path).map_err(|e| {
            error!(error = %e, "文件解析失败");
            e
        })?;
        let total_rows = raw_rows.len();

        // === 步骤 2: 映射与校验 ===
        let mut errors = Vec::new();
        let mut valid = Vec::new();
        let mut valid_rows = Vec::new();
        for raw in &raw_rows {
            match map(raw) {
                Ok(record) => {
                    valid.push(record);
                    valid_rows.push(raw.row);
                }
                Err(e) => {
                    warn!(row = raw.row, error = %e, "行校验失败");
                    errors.push(RowError {
                        row: raw.row,
                        message: e.to_string(),
                    });
                }
            }
        }

        // === 步骤 3: 落库（单事务） ===
        let inserted = insert(&valid)?;
        let mut imported = 0;
        for ((record, row), ok) in valid.iter().zip(valid_rows).zip(inserted) {
            if ok {
                imported += 1;
            } else {
                errors.push(RowError {
                    row,
                    message: t_with_args(duplicate_key, &[("no", &key_of(record).to_string())]),
                });
            }
        }
        errors.sort_by_key(|e| e.row);

        let summary = ImportSummary {
            batch_id,
            total_rows,
            imported,
            skipped: total_rows - imported,
            errors,
        };
        info!(
            batch_id = %summary.batch_id,
            total = summary.total_rows,
            imported = summary.imported,
            skipped = summary.skipped,
            "导入完成"
        );
        Ok(summary)
    }
}

#[async_trait]
impl RosterImporter for RosterImporterImpl {
    #[instrument(skip(self, file_path))]
    async fn import_consultants<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportSummary> {
        let path: PathBuf = file_path.as_ref().to_path_buf();
        let parser = self.file_parser.clone();
        let repo = self.consultant_repo.clone();

        tokio::task::spawn_blocking(move || {
            Self::run_import(
                parser.as_ref(),
                &path,
                |row| FieldMapper.map_consultant(row),
                |records| Ok(repo.insert_batch(records)?),
                |c| c.consultant_no,
                "consultant.duplicate",
            )
        })
        .await
        .map_err(|e| ImportError::TaskError(e.to_string()))?
    }

    #[instrument(skip(self, file_path))]
    async fn import_projects<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportSummary> {
        let path: PathBuf = file_path.as_ref().to_path_buf();
        let parser = self.file_parser.clone();
        let repo = self.project_repo.clone();

        tokio::task::spawn_blocking(move || {
            Self::run_import(
                parser.as_ref(),
                &path,
                |row| FieldMapper.map_project(row),
                |records| Ok(repo.insert_batch(records)?),
                |p| p.project_no,
                "project.duplicate",
            )
        })
        .await
        .map_err(|e| ImportError::TaskError(e.to_string()))?
    }

    /// 批量导入多个顾问名册（并发执行）
    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
    ) -> Vec<Result<ImportSummary, String>> {
        use futures::future::join_all;

        info!(count = file_paths.len(), "开始批量导入文件");

        let import_tasks = file_paths.into_iter().map(|path| {
            let path_str = path.as_ref().display().to_string();
            async move {
                match self.import_consultants(path).await {
                    Ok(summary) => {
                        info!(file = %path_str, imported = summary.imported, "文件导入成功");
                        Ok(summary)
                    }
                    Err(e) => {
                        error!(file = %path_str, error = %e, "文件导入失败");
                        Err(format!("{}: {}", path_str, e))
                    }
                }
            }
        });

        let results = join_all(import_tasks).await;

        info!(
            total = results.len(),
            success = results.iter().filter(|r| r.is_ok()).count(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "批量导入完成"
        );
        results
    }
}
