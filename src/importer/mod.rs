// ==========================================
// 顾问项目管理 - 导入层
// ==========================================
// 职责: 从 CSV 名册批量导入顾问与项目
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod roster_importer_impl;
pub mod roster_importer_trait;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::CsvRosterParser;
pub use roster_importer_impl::RosterImporterImpl;

// 重导出 Trait 接口
pub use roster_importer_trait::{FileParser, RawRow, RosterImporter};
