// ==========================================
// 顾问项目管理 - 文件解析器实现
// ==========================================
// 支持: CSV (.csv)，首行为表头
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::roster_importer_trait::{FileParser, RawRow};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvRosterParser;

impl FileParser for CsvRosterParser {
    fn parse_to_raw_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::file_not_found(&path.display().to_string()));
        }

        // 检查扩展名
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if ext != "csv" {
            return Err(ImportError::unsupported_format(&ext));
        }

        let file = File::open(path).map_err(|e| ImportError::FileReadError(e.to_string()))?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        // 表头统一小写
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            let row = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 2);

            let mut fields = HashMap::new();
            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    fields.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if fields.values().all(|v| v.is_empty()) {
                continue;
            }

            rows.push(RawRow { row, fields });
        }

        tracing::debug!(file = %path.display(), rows = rows.len(), "CSV 解析完成");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_去空白_跳过空行() {
        let file = write_csv("Consultant_No, Name ,title\n1, Ada ,Architect\n,,\n2,Bo,Dev\n");
        let rows = CsvRosterParser.parse_to_raw_rows(file.path()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row, 2);
        assert_eq!(rows[0].get("name"), Some("Ada"));
        assert_eq!(rows[0].get("consultant_no"), Some("1"));
        assert_eq!(rows[1].row, 4);
    }

    #[test]
    fn test_parse_短行() {
        let file = write_csv("consultant_no,name,title\n3,Cy\n");
        let rows = CsvRosterParser.parse_to_raw_rows(file.path()).unwrap();
        assert_eq!(rows[0].get("title"), None);
    }

    #[test]
    fn test_parse_文件不存在() {
        let result = CsvRosterParser.parse_to_raw_rows(Path::new("/nonexistent/roster.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound { .. })));
    }

    #[test]
    fn test_parse_格式不支持() {
        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        let result = CsvRosterParser.parse_to_raw_rows(file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat { .. })));
    }
}
