//! milestone 子命令

use chrono::NaiveDate;
use clap::{Args, Subcommand};

use super::Context;

#[derive(Debug, Args)]
pub struct MilestoneArgs {
    #[command(subcommand)]
    pub command: MilestoneCommand,
}

#[derive(Debug, Subcommand)]
pub enum MilestoneCommand {
    /// Milestones of a project, ordered by date
    List {
        #[arg(long)]
        project: i64,
    },
    /// Add a milestone to a project
    Add {
        no: i64,
        #[arg(long)]
        project: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        date: NaiveDate,
    },
    /// Delete a milestone
    Delete { no: i64 },
}

pub fn execute(args: MilestoneArgs, ctx: &Context) -> anyhow::Result<()> {
    let api = &ctx.state.milestone_api;
    let out = ctx.out;

    match args.command {
        MilestoneCommand::List { project } => {
            let list = api.list_for_project(project)?;
            out.emit_list(&list, |m| format!("{:>5}  {}  {}", m.milestone_no, m.date, m.name))
        }
        MilestoneCommand::Add {
            no,
            project,
            name,
            date,
        } => {
            let m = api.create(no, &name, date, project)?;
            out.emit(&m, || {
                format!("Added milestone {} to project {}", m.milestone_no, m.project_no)
            })
        }
        MilestoneCommand::Delete { no } => {
            api.delete(no)?;
            out.emit(&serde_json::json!({ "milestone_no": no }), || {
                format!("Deleted milestone {}", no)
            })
        }
    }
}
