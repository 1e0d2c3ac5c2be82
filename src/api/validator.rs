// ==========================================
// 顾问项目管理 - 输入校验
// ==========================================
// 职责: 表单级校验（编号、名称、日期、工时）
// 说明: 返回的错误消息均经过 i18n 翻译；
//       API 层与导入层共用同一组规则
// ==========================================

use chrono::NaiveDate;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::project::Project;
use crate::i18n::{t, t_with_args};

/// 校验顾问编号（必须为正整数）
pub fn validate_consultant_no(consultant_no: i64) -> ApiResult<()> {
    if consultant_no <= 0 {
        return Err(ApiError::InvalidInput(t("consultant.no_positive")));
    }
    Ok(())
}

/// 校验项目编号（必须为正整数）
pub fn validate_project_no(project_no: i64) -> ApiResult<()> {
    if project_no <= 0 {
        return Err(ApiError::InvalidInput(t("project.no_positive")));
    }
    Ok(())
}

/// 校验必填文本，返回去除首尾空白后的值
///
/// # 参数
/// - value: 原始输入
/// - message_key: 为空时使用的消息键
pub fn require_text(value: &str, message_key: &str) -> ApiResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidInput(t(message_key)));
    }
    Ok(trimmed.to_string())
}

/// 校验项目起止日期（结束日期可为空）
pub fn validate_project_dates(start: NaiveDate, end: Option<NaiveDate>) -> ApiResult<()> {
    match end {
        Some(end) if end < start => Err(ApiError::InvalidInput(t_with_args(
            "project.end_before_start",
            &[("end", &end.to_string()), ("start", &start.to_string())],
        ))),
        _ => Ok(()),
    }
}

/// 校验里程碑日期
///
/// # 规则
/// 1. 不早于最早允许日期
/// 2. 不早于项目开始日期
/// 3. 项目有结束日期时，不晚于结束日期
pub fn validate_milestone_date(
    date: NaiveDate,
    min_date: NaiveDate,
    project: &Project,
) -> ApiResult<()> {
    if date < min_date {
        return Err(ApiError::InvalidInput(t_with_args(
            "milestone.before_minimum",
            &[("date", &min_date.to_string())],
        )));
    }
    if date < project.start_date {
        return Err(ApiError::InvalidInput(t_with_args(
            "milestone.before_project_start",
            &[("date", &project.start_date.to_string())],
        )));
    }
    if let Some(end) = project.end_date {
        if date > end {
            return Err(ApiError::InvalidInput(t_with_args(
                "milestone.after_project_end",
                &[("date", &end.to_string())],
            )));
        }
    }
    Ok(())
}

/// 校验工时（不可为负）
pub fn validate_hours(hours: i64) -> ApiResult<()> {
    if hours < 0 {
        return Err(ApiError::InvalidInput(t("assignment.negative_hours")));
    }
    Ok(())
}
