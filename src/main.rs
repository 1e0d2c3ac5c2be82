// ==========================================
// 顾问项目管理 - 命令行入口
// ==========================================
// 配置优先级: 命令行 > 环境变量 > 配置文件 > 默认值
// ==========================================

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use project_staffing::app::AppState;
use project_staffing::config::AppConfig;
use project_staffing::{i18n, logging};

mod cli;

use cli::output::Output;
use cli::Context;

#[derive(Debug, Parser)]
#[command(name = "project-staffing")]
#[command(version, about = "Consultant and project staffing records", long_about = None)]
struct Cli {
    /// Database file (overrides config and PROJECT_STAFFING_DB_PATH)
    #[arg(long, global = true)]
    db: Option<String>,

    /// Config file (defaults to <config dir>/project-staffing/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Message language (en, sv)
    #[arg(long, global = true)]
    locale: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create the database schema
    Init,
    /// Consultant records
    Consultant(cli::consultant::ConsultantArgs),
    /// Project records
    Project(cli::project::ProjectArgs),
    /// Project milestones
    Milestone(cli::milestone::MilestoneArgs),
    /// Consultant to project assignments and hours
    Assignment(cli::assignment::AssignmentArgs),
    /// Staffing reports
    Report(cli::report::ReportArgs),
    /// Database metadata
    Metadata,
    /// Bulk import from CSV
    Import(cli::import::ImportArgs),
}

#[tokio::main]
async fn main() {
    logging::init_with_default("warn", false);

    let opts = Cli::parse();
    if let Err(e) = run(opts).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(opts: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::load(opts.config.as_deref()).context("loading configuration")?;
    if let Some(db) = opts.db {
        config.db_path = db;
    }
    if let Some(locale) = opts.locale {
        config.locale = locale;
    }
    i18n::set_locale(&config.locale);

    let state = AppState::new(&config)?;
    let ctx = Context {
        state,
        out: Output { json: opts.json },
    };

    match opts.command {
        Commands::Init => ctx.out.emit(
            &serde_json::json!({ "db_path": ctx.state.db_path }),
            || format!("Database ready: {}", ctx.state.db_path),
        ),
        Commands::Consultant(args) => cli::consultant::execute(args, &ctx),
        Commands::Project(args) => cli::project::execute(args, &ctx),
        Commands::Milestone(args) => cli::milestone::execute(args, &ctx),
        Commands::Assignment(args) => cli::assignment::execute(args, &ctx),
        Commands::Report(args) => cli::report::execute(args, &ctx),
        Commands::Metadata => cli::metadata::execute(&ctx),
        Commands::Import(args) => cli::import::execute(args, &ctx).await,
    }
}
