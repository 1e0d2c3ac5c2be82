//! 结果输出（文本 / JSON）

use serde::Serialize;

#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
}

impl Output {
    /// 输出结果
    ///
    /// JSON 模式下序列化 `value`；否则打印 `human()` 生成的文本
    pub fn emit<T, F>(&self, value: &T, human: F) -> anyhow::Result<()>
    where
        T: Serialize + ?Sized,
        F: FnOnce() -> String,
    {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            let text = human();
            if !text.is_empty() {
                println!("{}", text);
            }
        }
        Ok(())
    }

    /// 列表输出（空列表打印占位文本）
    pub fn emit_list<T, F>(&self, items: &[T], line: F) -> anyhow::Result<()>
    where
        T: Serialize,
        F: Fn(&T) -> String,
    {
        self.emit(items, || {
            if items.is_empty() {
                "(none)".to_string()
            } else {
                items.iter().map(&line).collect::<Vec<_>>().join("\n")
            }
        })
    }
}

/// 结束日期显示（进行中项目为 "-"）
pub fn date_or_dash(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}
