//! project 子命令

use chrono::NaiveDate;
use clap::{Args, Subcommand};

use super::output::date_or_dash;
use super::Context;

#[derive(Debug, Args)]
pub struct ProjectArgs {
    #[command(subcommand)]
    pub command: ProjectCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    /// List projects
    List,
    /// Show one project
    Show { no: i64 },
    /// Add a project (omit --end for an ongoing project)
    Add {
        no: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    /// Update name and dates of a project
    Update {
        no: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    /// Delete a project with its milestones and assignments
    Delete { no: i64 },
    /// Consultants assigned to a project
    Staff { no: i64 },
}

pub fn execute(args: ProjectArgs, ctx: &Context) -> anyhow::Result<()> {
    let api = &ctx.state.project_api;
    let out = ctx.out;

    match args.command {
        ProjectCommand::List => {
            let list = api.list()?;
            out.emit_list(&list, |p| {
                format!(
                    "{:>5}  {}  {} .. {}",
                    p.project_no,
                    p.name,
                    p.start_date,
                    date_or_dash(p.end_date)
                )
            })
        }
        ProjectCommand::Show { no } => {
            let p = api.get(no)?;
            out.emit(&p, || {
                format!(
                    "{:>5}  {}\nstart: {}\nend:   {}\nactive: {}",
                    p.project_no,
                    p.name,
                    p.start_date,
                    date_or_dash(p.end_date),
                    p.is_active()
                )
            })
        }
        ProjectCommand::Add {
            no,
            name,
            start,
            end,
        } => {
            let p = api.create(no, &name, start, end)?;
            out.emit(&p, || format!("Added project {} ({})", p.project_no, p.name))
        }
        ProjectCommand::Update {
            no,
            name,
            start,
            end,
        } => {
            let p = api.update(no, &name, start, end)?;
            out.emit(&p, || format!("Updated project {}", p.project_no))
        }
        ProjectCommand::Delete { no } => {
            let d = api.delete(no)?;
            out.emit(
                &serde_json::json!({
                    "project_no": no,
                    "removed_milestones": d.removed_milestones,
                    "removed_assignments": d.removed_assignments,
                }),
                || {
                    format!(
                        "Deleted project {} ({} milestones, {} assignments removed)",
                        no, d.removed_milestones, d.removed_assignments
                    )
                },
            )
        }
        ProjectCommand::Staff { no } => {
            let staff = api.staff(no)?;
            out.emit_list(&staff, |d| {
                format!(
                    "{:>5}  {} ({})  hours: {}",
                    d.consultant_no, d.consultant_name, d.title, d.hours_worked
                )
            })
        }
    }
}
