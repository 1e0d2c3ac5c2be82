// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库、AppState 初始化、样例数据
// ==========================================

#![allow(dead_code)]

use chrono::NaiveDate;
use project_staffing::app::AppState;
use project_staffing::config::AppConfig;
use project_staffing::db::open_sqlite_connection;
use rusqlite::Connection;
use std::error::Error;
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_string_lossy().to_string();

    let conn = open_sqlite_connection(&db_path)?;
    project_staffing::db::init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库连接（已开启外键）
pub fn open_test_conn(db_path: &str) -> Connection {
    open_sqlite_connection(db_path).expect("open test db")
}

/// 基于临时数据库创建 AppState
pub fn create_test_state() -> (NamedTempFile, AppState) {
    let (temp_file, db_path) = create_test_db().expect("create test db");
    let config = AppConfig {
        db_path,
        ..AppConfig::default()
    };
    let state = AppState::new(&config).expect("create AppState");
    (temp_file, state)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// 样例数据
///
/// 顾问: 1 Ada, 2 Bo, 3 Cy, 4 Di
/// 项目: 10 Apollo（进行中）, 20 Borealis（进行中）, 30 Cobalt（2024-06-30 结束）
/// 分配: Apollo ← 1,2,3,4；Borealis ← 1,2；Cobalt ← 3
/// 工时: Ada 30 + 10 = 40, Bo 25 + 15 = 40, Cy 20 + 5 = 25, Di 8
pub fn seed_sample(state: &AppState) {
    let consultants = [
        (1, "Ada", "Architect"),
        (2, "Bo", "Developer"),
        (3, "Cy", "Tester"),
        (4, "Di", "Analyst"),
    ];
    for (no, name, title) in consultants {
        state.consultant_api.create(no, name, title).expect("seed consultant");
    }

    state
        .project_api
        .create(10, "Apollo", date(2024, 1, 1), None)
        .expect("seed project");
    state
        .project_api
        .create(20, "Borealis", date(2024, 2, 1), None)
        .expect("seed project");
    state
        .project_api
        .create(30, "Cobalt", date(2024, 1, 15), Some(date(2024, 6, 30)))
        .expect("seed project");

    let assignments = [
        (1, 10, 30),
        (2, 10, 25),
        (3, 10, 20),
        (4, 10, 8),
        (1, 20, 10),
        (2, 20, 15),
        (3, 30, 5),
    ];
    for (consultant, project, hours) in assignments {
        state
            .assignment_api
            .assign(consultant, project)
            .expect("seed assignment");
        state
            .assignment_api
            .set_hours(consultant, project, hours)
            .expect("seed hours");
    }

    state
        .milestone_api
        .create(100, "Kickoff", date(2024, 1, 10), 10)
        .expect("seed milestone");
    state
        .milestone_api
        .create(101, "Beta", date(2024, 5, 1), 10)
        .expect("seed milestone");
    state
        .milestone_api
        .create(300, "Handover", date(2024, 6, 30), 30)
        .expect("seed milestone");
}

/// tests/fixtures 下的文件路径
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}
