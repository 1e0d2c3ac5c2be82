//! assignment 子命令

use clap::{Args, Subcommand};
use project_staffing::i18n::t_with_args;

use super::output::date_or_dash;
use super::Context;

#[derive(Debug, Args)]
pub struct AssignmentArgs {
    #[command(subcommand)]
    pub command: AssignmentCommand,
}

#[derive(Debug, Subcommand)]
pub enum AssignmentCommand {
    /// Put a consultant on a project (warns when the project is oversubscribed)
    Assign {
        #[arg(long)]
        consultant: i64,
        #[arg(long)]
        project: i64,
    },
    /// Remove a consultant from a project
    Unassign {
        #[arg(long)]
        consultant: i64,
        #[arg(long)]
        project: i64,
    },
    /// Overwrite the hours worked
    SetHours {
        #[arg(long)]
        consultant: i64,
        #[arg(long)]
        project: i64,
        #[arg(long)]
        hours: i64,
    },
    /// Add to the hours worked (negative values correct earlier entries)
    LogHours {
        #[arg(long)]
        consultant: i64,
        #[arg(long)]
        project: i64,
        #[arg(long, allow_hyphen_values = true)]
        hours: i64,
    },
    /// Ongoing projects of a consultant
    Active {
        #[arg(long)]
        consultant: i64,
    },
}

pub fn execute(args: AssignmentArgs, ctx: &Context) -> anyhow::Result<()> {
    let api = &ctx.state.assignment_api;
    let out = ctx.out;

    match args.command {
        AssignmentCommand::Assign {
            consultant,
            project,
        } => {
            let outcome = api.assign(consultant, project)?;
            if outcome.oversubscribed && !out.json {
                eprintln!(
                    "{}",
                    t_with_args(
                        "assignment.oversubscribed",
                        &[("project", &project.to_string())]
                    )
                );
            }
            out.emit(&outcome, || {
                format!("Assigned consultant {} to project {}", consultant, project)
            })
        }
        AssignmentCommand::Unassign {
            consultant,
            project,
        } => {
            api.unassign(consultant, project)?;
            out.emit(
                &serde_json::json!({ "consultant_no": consultant, "project_no": project }),
                || format!("Removed consultant {} from project {}", consultant, project),
            )
        }
        AssignmentCommand::SetHours {
            consultant,
            project,
            hours,
        } => {
            let a = api.set_hours(consultant, project, hours)?;
            out.emit(&a, || format!("Hours worked: {}", a.hours_worked))
        }
        AssignmentCommand::LogHours {
            consultant,
            project,
            hours,
        } => {
            let a = api.log_hours(consultant, project, hours)?;
            out.emit(&a, || format!("Hours worked: {}", a.hours_worked))
        }
        AssignmentCommand::Active { consultant } => {
            let list = api.active_for_consultant(consultant)?;
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
    }
}
