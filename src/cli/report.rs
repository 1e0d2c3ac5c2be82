//! report 子命令

use clap::{Args, Subcommand};

use super::Context;

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(subcommand)]
    pub command: ReportCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReportCommand {
    /// Counts, total hours, hardest working consultants and all-hands projects
    Summary,
    /// Consultants with the most hours worked
    Hardest,
    /// Projects every consultant is assigned to
    AllHands,
    /// Consultants on at most N projects
    MaxProjects {
        #[arg(long, allow_hyphen_values = true)]
        max: i64,
    },
    /// Ongoing projects where one more consultant exceeds the threshold
    Oversubscribed,
    /// Total hours worked by all consultants
    TotalHours,
}

pub fn execute(args: ReportArgs, ctx: &Context) -> anyhow::Result<()> {
    let api = &ctx.state.report_api;
    let out = ctx.out;

    match args.command {
        ReportCommand::Summary => {
            let s = api.summary()?;
            out.emit(&s, || {
                let names = |list: Vec<String>| {
                    if list.is_empty() {
                        "-".to_string()
                    } else {
                        list.join(", ")
                    }
                };
                format!(
                    "consultants:      {}\nprojects:         {} ({} active)\ntotal hours:      {}\nhardest working:  {}\nall-hands:        {}",
                    s.consultant_count,
                    s.project_count,
                    s.active_project_count,
                    s.total_hours,
                    names(s.hardest_working.iter().map(|c| c.name.clone()).collect()),
                    names(s.all_hands_projects.iter().map(|p| p.name.clone()).collect()),
                )
            })
        }
        ReportCommand::Hardest => {
            let list = api.hardest_working_consultants()?;
            out.emit_list(&list, |c| format!("{:>5}  {}", c.consultant_no, c))
        }
        ReportCommand::AllHands => {
            let list = api.projects_involving_every_consultant()?;
            out.emit_list(&list, |p| format!("{:>5}  {}", p.project_no, p.name))
        }
        ReportCommand::MaxProjects { max } => {
            let names = api.consultants_in_max_projects(max)?;
            out.emit_list(&names, |n| n.clone())
        }
        ReportCommand::Oversubscribed => {
            let list = api.oversubscribed_projects()?;
            out.emit_list(&list, |p| format!("{:>5}  {}", p.project_no, p.name))
        }
        ReportCommand::TotalHours => {
            let total = api.total_hours_for_all()?;
            out.emit(&total, || total.to_string())
        }
    }
}
