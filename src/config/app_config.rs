// ==========================================
// 顾问项目管理 - 应用配置
// ==========================================
// 存储: JSON 配置文件（可选）+ 环境变量覆写
// 默认位置: <config_dir>/project-staffing/config.json
// ==========================================

use crate::domain::assignment::DEFAULT_OVERSUBSCRIPTION_THRESHOLD;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 应用目录名
const APP_DIR_NAME: &str = "project-staffing";

// ==========================================
// 环境变量键
// ==========================================
pub mod config_keys {
    pub const DB_PATH: &str = "PROJECT_STAFFING_DB_PATH";
    pub const LOCALE: &str = "PROJECT_STAFFING_LOCALE";
    pub const OVERSUBSCRIPTION_THRESHOLD: &str = "PROJECT_STAFFING_OVERSUBSCRIPTION_THRESHOLD";
    pub const CONFIG_PATH: &str = "PROJECT_STAFFING_CONFIG";
}

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置文件解析失败 ({path}): {message}")]
    ParseError { path: String, message: String },

    #[error("配置值无效 (key={key}): {message}")]
    InvalidValue { key: String, message: String },
}

// ==========================================
// AppConfig - 应用配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 数据库文件路径
    pub db_path: String,
    /// 界面语言（en / sv）
    pub locale: String,
    /// 资源超配阈值 (0, 1]
    pub oversubscription_threshold: f64,
    /// 里程碑最早允许日期
    pub milestone_min_date: NaiveDate,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            locale: "en".to_string(),
            oversubscription_threshold: DEFAULT_OVERSUBSCRIPTION_THRESHOLD,
            milestone_min_date: NaiveDate::from_ymd_opt(2022, 1, 1)
                .unwrap_or(NaiveDate::MIN),
        }
    }
}

impl AppConfig {
    /// 加载配置
    ///
    /// # 流程
    /// 1. 读取配置文件（显式路径 > PROJECT_STAFFING_CONFIG > 默认位置；文件不存在时使用默认值）
    /// 2. 应用环境变量覆写
    /// 3. 校验
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = explicit_path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(config_keys::CONFIG_PATH).ok().map(PathBuf::from))
            .or_else(default_config_path);

        let mut config = match path {
            Some(p) if p.exists() => Self::from_file(&p)?,
            Some(p) if explicit_path.is_some() => {
                return Err(ConfigError::ReadError {
                    path: p.display().to_string(),
                    message: "file does not exist".to_string(),
                })
            }
            _ => Self::default(),
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件读取（缺失字段使用默认值）
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config: AppConfig = serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "已加载配置文件");
        Ok(config)
    }

    /// 应用环境变量覆写（空值忽略）
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(v) = env_non_empty(config_keys::DB_PATH) {
            self.db_path = v;
        }
        if let Some(v) = env_non_empty(config_keys::LOCALE) {
            self.locale = v;
        }
        if let Some(v) = env_non_empty(config_keys::OVERSUBSCRIPTION_THRESHOLD) {
            self.oversubscription_threshold =
                v.parse().map_err(|_| ConfigError::InvalidValue {
                    key: config_keys::OVERSUBSCRIPTION_THRESHOLD.to_string(),
                    message: format!("not a number: {}", v),
                })?;
        }
        Ok(())
    }

    /// 校验配置值
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.db_path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "db_path".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        let t = self.oversubscription_threshold;
        if !(t > 0.0 && t <= 1.0) {
            return Err(ConfigError::InvalidValue {
                key: "oversubscription_threshold".to_string(),
                message: format!("must be in (0, 1], got {}", t),
            });
        }
        Ok(())
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 默认配置文件位置
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join("config.json"))
}

/// 默认数据库路径（用户数据目录，取不到时回退到当前目录）
///
/// 只计算路径，不创建目录（见 AppState::new）
pub fn default_db_path() -> String {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join("project_staffing.db"))
        .unwrap_or_else(|| PathBuf::from("./project_staffing.db"))
        .to_string_lossy()
        .to_string()
}
