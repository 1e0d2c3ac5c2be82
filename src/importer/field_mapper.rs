// ==========================================
// 顾问项目管理 - 字段映射器
// ==========================================
// 职责: 原始行 → 新建输入 + 类型转换 + 业务校验
// 说明: 校验规则与 API 层共用（api::validator）
// ==========================================

use crate::api::validator::{
    require_text, validate_consultant_no, validate_project_dates, validate_project_no,
};
use crate::domain::consultant::NewConsultant;
use crate::domain::project::NewProject;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::roster_importer_trait::RawRow;
use chrono::NaiveDate;

pub struct FieldMapper;

impl FieldMapper {
    /// 顾问行: consultant_no,name,title
    pub fn map_consultant(&self, row: &RawRow) -> ImportResult<NewConsultant> {
        let consultant_no = self.parse_i64(row, "consultant_no")?;
        let name = self.get_required(row, "name")?;
        let title = self.get_required(row, "title")?;

        let on_row = |e: crate::api::ApiError| row_error(row.row, e);
        validate_consultant_no(consultant_no).map_err(on_row)?;
        let name = require_text(name, "consultant.name_empty").map_err(on_row)?;
        let title = require_text(title, "consultant.title_empty").map_err(on_row)?;

        Ok(NewConsultant::new(consultant_no, name, title))
    }

    /// 项目行: project_no,name,start_date,end_date（end_date 可空）
    pub fn map_project(&self, row: &RawRow) -> ImportResult<NewProject> {
        let project_no = self.parse_i64(row, "project_no")?;
        let name = self.get_required(row, "name")?;
        let start_date = self.parse_date(row, "start_date")?;
        let end_date = match row.get("end_date") {
            Some(_) => Some(self.parse_date(row, "end_date")?),
            None => None,
        };

        let on_row = |e: crate::api::ApiError| row_error(row.row, e);
        validate_project_no(project_no).map_err(on_row)?;
        let name = require_text(name, "project.name_empty").map_err(on_row)?;
        validate_project_dates(start_date, end_date).map_err(on_row)?;

        Ok(NewProject {
            project_no,
            name,
            start_date,
            end_date,
        })
    }

    fn get_required<'a>(&self, row: &'a RawRow, field: &str) -> ImportResult<&'a str> {
        row.get(field)
            .ok_or_else(|| ImportError::field(row.row, field, "import.missing_field"))
    }

    fn parse_i64(&self, row: &RawRow, field: &str) -> ImportResult<i64> {
        self.get_required(row, field)?
            .parse()
            .map_err(|_| ImportError::field(row.row, field, "import.invalid_number"))
    }

    fn parse_date(&self, row: &RawRow, field: &str) -> ImportResult<NaiveDate> {
        let value = self.get_required(row, field)?;
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map_err(|_| ImportError::field(row.row, field, "import.invalid_date"))
    }
}

fn row_error(row: usize, err: crate::api::ApiError) -> ImportError {
    ImportError::RowError {
        row,
        message: err.to_string(),
    }
}
