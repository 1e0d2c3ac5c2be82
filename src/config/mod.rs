// ==========================================
// 顾问项目管理 - 配置层
// ==========================================
// 职责: 应用配置加载,支持多级覆写
// 优先级: 命令行 > 环境变量 > 配置文件 > 默认值
// ==========================================

pub mod app_config;

// 重导出核心配置
pub use app_config::{config_keys, default_config_path, default_db_path, AppConfig, ConfigError};
