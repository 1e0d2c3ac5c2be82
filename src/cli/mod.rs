//! 命令行子命令
//!
//! 每个子命令模块提供 `XxxArgs` 与 `execute(args, ctx)`

pub mod assignment;
pub mod consultant;
pub mod import;
pub mod metadata;
pub mod milestone;
pub mod output;
pub mod project;
pub mod report;

use project_staffing::app::AppState;

use output::Output;

/// 子命令执行上下文
pub struct Context {
    pub state: AppState,
    pub out: Output,
}
