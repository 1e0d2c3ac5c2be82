//! import 子命令

use std::path::PathBuf;

use clap::{Args, Subcommand};
use project_staffing::domain::ImportSummary;
use project_staffing::importer::RosterImporter;

use super::Context;

#[derive(Debug, Args)]
pub struct ImportArgs {
    #[command(subcommand)]
    pub command: ImportCommand,
}

#[derive(Debug, Subcommand)]
pub enum ImportCommand {
    /// Import consultants from CSV files (consultant_no,name,title)
    Consultants {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Import projects from a CSV file (project_no,name,start_date,end_date)
    Projects { file: PathBuf },
}

pub async fn execute(args: ImportArgs, ctx: &Context) -> anyhow::Result<()> {
    let importer = ctx.state.importer.clone();

    match args.command {
        ImportCommand::Consultants { files } => {
            if files.len() == 1 {
                let summary = importer.import_consultants(&files[0]).await?;
                return ctx.out.emit(&summary, || describe(&summary));
            }

            let results = importer.batch_import(files).await;
            let failed = results.iter().filter(|r| r.is_err()).count();
            ctx.out.emit(&results, || {
                results
                    .iter()
                    .map(|r| match r {
                        Ok(s) => describe(s),
                        Err(e) => format!("failed: {}", e),
                    })
                    .collect::<Vec<_>>()
                    .join("\n\n")
            })?;
            if failed > 0 {
                anyhow::bail!("{} of {} files failed to import", failed, results.len());
            }
            Ok(())
        }
        ImportCommand::Projects { file } => {
            let summary = importer.import_projects(&file).await?;
            ctx.out.emit(&summary, || describe(&summary))
        }
    }
}

fn describe(s: &ImportSummary) -> String {
    let mut lines = vec![format!(
        "batch {}: {} rows, {} imported, {} skipped",
        s.batch_id, s.total_rows, s.imported, s.skipped
    )];
    lines.extend(s.errors.iter().map(|e| format!("  row {}: {}", e.row, e.message)));
    lines.join("\n")
}
