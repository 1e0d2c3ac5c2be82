//! consultant 子命令

use clap::{Args, Subcommand};

use super::Context;

#[derive(Debug, Args)]
pub struct ConsultantArgs {
    #[command(subcommand)]
    pub command: ConsultantCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConsultantCommand {
    /// List consultants with their project counts
    List,
    /// Show one consultant
    Show { no: i64 },
    /// Add a consultant
    Add {
        no: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        title: String,
    },
    /// Update a consultant (the number may change)
    Update {
        no: i64,
        #[arg(long)]
        new_no: Option<i64>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        title: String,
    },
    /// Delete a consultant and all of their assignments
    Delete { no: i64 },
    /// Consultants not yet on a project
    Available {
        #[arg(long)]
        project: i64,
    },
    /// Assignment count and total hours for a consultant
    Overview { no: i64 },
}

pub fn execute(args: ConsultantArgs, ctx: &Context) -> anyhow::Result<()> {
    let api = &ctx.state.consultant_api;
    let out = ctx.out;

    match args.command {
        ConsultantCommand::List => {
            let rows = api.list_with_project_count()?;
            out.emit_list(&rows, |c| {
                format!(
                    "{:>5}  {} ({})  projects: {}",
                    c.consultant_no, c.name, c.title, c.project_count
                )
            })
        }
        ConsultantCommand::Show { no } => {
            let c = api.get(no)?;
            out.emit(&c, || format!("{:>5}  {}", c.consultant_no, c))
        }
        ConsultantCommand::Add { no, name, title } => {
            let c = api.create(no, &name, &title)?;
            out.emit(&c, || format!("Added consultant {} ({})", c.consultant_no, c.name))
        }
        ConsultantCommand::Update {
            no,
            new_no,
            name,
            title,
        } => {
            let c = api.update(no, new_no.unwrap_or(no), &name, &title)?;
            out.emit(&c, || format!("Updated consultant {}", c.consultant_no))
        }
        ConsultantCommand::Delete { no } => {
            let removed = api.delete(no)?;
            out.emit(&serde_json::json!({ "consultant_no": no, "removed_assignments": removed }), || {
                format!("Deleted consultant {} ({} assignments removed)", no, removed)
            })
        }
        ConsultantCommand::Available { project } => {
            let list = api.list_available_for_project(project)?;
            out.emit_list(&list, |c| format!("{:>5}  {}", c.consultant_no, c))
        }
        ConsultantCommand::Overview { no } => {
            let o = api.overview(no)?;
            out.emit(&o, || {
                format!(
                    "{}\nassignments: {}\ntotal hours: {}",
                    o.consultant, o.assignment_count, o.total_hours
                )
            })
        }
    }
}
