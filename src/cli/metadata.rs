//! metadata 子命令

use super::Context;

pub fn execute(ctx: &Context) -> anyhow::Result<()> {
    let m = ctx.state.metadata_api.snapshot()?;
    ctx.out.emit(&m, || {
        format!(
            "columns:\n  {}\nprimary keys:\n  {}\ncheck constraints:\n  {}\nnon-integer Consultant columns:\n  {}\nlargest table:\n  {}",
            m.all_columns.join("\n  "),
            m.primary_key_columns.join("\n  "),
            m.check_constraints.join("\n  "),
            m.non_integer_consultant_columns.join("\n  "),
            m.largest_table
                .as_ref()
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".to_string()),
        )
    })
}
