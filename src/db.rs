// ==========================================
// 顾问项目管理 - SQLite 连接与 schema 初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为（外键、busy_timeout）
// - 集中维护建表语句，保证测试库与正式库结构一致
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 建表语句
///
/// 说明：
/// - CHECK 约束统一使用 `CONSTRAINT CK_*` 命名，元数据查询依赖该命名规则
/// - 日期列存储 ISO 文本（YYYY-MM-DD），字典序与时间序一致
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS Consultant (
    ConsultantID INTEGER PRIMARY KEY AUTOINCREMENT,
    ConsultantNo INTEGER NOT NULL UNIQUE,
    ConsultantName TEXT NOT NULL,
    Title TEXT NOT NULL,
    CONSTRAINT CK_Consultant_ConsultantNo CHECK (ConsultantNo > 0)
);

CREATE TABLE IF NOT EXISTS Project (
    ProjectID INTEGER PRIMARY KEY AUTOINCREMENT,
    ProjectNo INTEGER NOT NULL UNIQUE,
    ProjectName TEXT NOT NULL,
    StartDate TEXT NOT NULL,
    EndDate TEXT NULL,
    CONSTRAINT CK_Project_EndDate CHECK (EndDate IS NULL OR EndDate >= StartDate)
);

CREATE TABLE IF NOT EXISTS Milestone (
    MilestoneID INTEGER PRIMARY KEY AUTOINCREMENT,
    MilestoneNo INTEGER NOT NULL UNIQUE,
    MilestoneName TEXT NOT NULL,
    MilestoneDate TEXT NOT NULL,
    ProjectID INTEGER NOT NULL REFERENCES Project(ProjectID)
);

CREATE TABLE IF NOT EXISTS Project_Assignment (
    ConsultantID INTEGER NOT NULL REFERENCES Consultant(ConsultantID),
    ProjectID INTEGER NOT NULL REFERENCES Project(ProjectID),
    HoursWorked INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (ConsultantID, ProjectID),
    CONSTRAINT CK_Project_Assignment_HoursWorked CHECK (HoursWorked >= 0)
);

CREATE INDEX IF NOT EXISTS idx_milestone_project ON Milestone(ProjectID);
CREATE INDEX IF NOT EXISTS idx_assignment_project ON Project_Assignment(ProjectID);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 打开内存数据库（测试用），已完成建表
pub fn open_in_memory() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure_sqlite_connection(&conn)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// 初始化数据库 schema（幂等）
///
/// 建表完成后写入 `CURRENT_SCHEMA_VERSION`；
/// 若库中已有不同版本，仅告警，不做自动迁移。
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    match read_schema_version(conn)? {
        None => {
            conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                [CURRENT_SCHEMA_VERSION],
            )?;
            tracing::info!(version = CURRENT_SCHEMA_VERSION, "schema 初始化完成");
        }
        Some(v) if v != CURRENT_SCHEMA_VERSION => {
            tracing::warn!(
                found = v,
                expected = CURRENT_SCHEMA_VERSION,
                "schema_version 与代码期望不一致"
            );
        }
        Some(_) => {}
    }

    Ok(())
}

/// 读取 schema_version（若表不存在或为空则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
