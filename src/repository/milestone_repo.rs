// ==========================================
// 顾问项目管理 - 里程碑数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::milestone::{Milestone, NewMilestone};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const SELECT_MILESTONE: &str = r#"
    SELECT m.MilestoneID, m.MilestoneNo, m.MilestoneName, m.MilestoneDate,
           m.ProjectID, p.ProjectNo
    FROM Milestone m
    JOIN Project p ON p.ProjectID = m.ProjectID
"#;

fn map_milestone(row: &Row<'_>) -> SqliteResult<Milestone> {
    Ok(Milestone {
        milestone_id: row.get(0)?,
        milestone_no: row.get(1)?,
        name: row.get(2)?,
        date: row.get(3)?,
        project_id: row.get(4)?,
        project_no: row.get(5)?,
    })
}

// ==========================================
// MilestoneRepository - 里程碑仓储
// ==========================================
pub struct MilestoneRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MilestoneRepository {
    /// 创建新的 MilestoneRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增里程碑（按项目编号关联）
    ///
    /// # 返回
    /// - Ok(i64): 新记录的 MilestoneID
    /// - Err(NotFound): 项目编号不存在
    pub fn insert(&self, milestone: &NewMilestone) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;

        let project_id: i64 = conn
            .query_row(
                "SELECT ProjectID FROM Project WHERE ProjectNo = ?1",
                params![milestone.project_no],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| {
                RepositoryError::not_found("Project", "ProjectNo", milestone.project_no)
            })?;

        conn.execute(
            r#"
            INSERT INTO Milestone (MilestoneNo, MilestoneName, MilestoneDate, ProjectID)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                milestone.milestone_no,
                milestone.name,
                milestone.date,
                project_id
            ],
        )?;
        let id = conn.last_insert_rowid();
        tracing::info!(
            milestone_no = milestone.milestone_no,
            project_no = milestone.project_no,
            "新增里程碑"
        );
        Ok(id)
    }

    /// 查询项目的里程碑（按日期排序）
    pub fn find_by_project_id(&self, project_id: i64) -> RepositoryResult<Vec<Milestone>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE m.ProjectID = ?1 ORDER BY m.MilestoneDate, m.MilestoneNo",
            SELECT_MILESTONE
        ))?;
        let milestones = stmt
            .query_map(params![project_id], map_milestone)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(milestones)
    }

    /// 按项目编号查询里程碑（按日期排序）
    pub fn find_by_project_no(&self, project_no: i64) -> RepositoryResult<Vec<Milestone>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE p.ProjectNo = ?1 ORDER BY m.MilestoneDate, m.MilestoneNo",
            SELECT_MILESTONE
        ))?;
        let milestones = stmt
            .query_map(params![project_no], map_milestone)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(milestones)
    }

    pub fn count_for_project_id(&self, project_id: i64) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM Milestone WHERE ProjectID = ?1",
            params![project_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn count_for_project_no(&self, project_no: i64) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row(
            r#"
            SELECT COUNT(*) FROM Milestone
            WHERE ProjectID = (SELECT ProjectID FROM Project WHERE ProjectNo = ?1)
            "#,
            params![project_no],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// 按里程碑编号删除
    ///
    /// # 返回
    /// - Ok(usize): 删除行数（0 表示不存在）
    pub fn delete(&self, milestone_no: i64) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "DELETE FROM Milestone WHERE MilestoneNo = ?1",
            params![milestone_no],
        )?;
        tracing::info!(milestone_no, rows, "删除里程碑");
        Ok(rows)
    }

    pub fn delete_by_project_id(&self, project_id: i64) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "DELETE FROM Milestone WHERE ProjectID = ?1",
            params![project_id],
        )?;
        Ok(rows)
    }

    pub fn delete_by_project_no(&self, project_no: i64) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            DELETE FROM Milestone
            WHERE ProjectID = (SELECT ProjectID FROM Project WHERE ProjectNo = ?1)
            "#,
            params![project_no],
        )?;
        Ok(rows)
    }

    /// 里程碑编号是否已存在
    pub fn exists(&self, milestone_no: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let found = conn
            .query_row(
                "SELECT 1 FROM Milestone WHERE MilestoneNo = ?1 LIMIT 1",
                params![milestone_no],
                |_row| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        Ok(found)
    }
}
