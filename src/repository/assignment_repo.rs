// ==========================================
// 顾问项目管理 - 项目分配数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 说明: 聚合报表（最高工时、全员项目、超配检查）全部下推到 SQL
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::assignment::{AssignmentDetail, ProjectAssignment, ResourceLoad};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

fn map_assignment(row: &Row<'_>) -> SqliteResult<ProjectAssignment> {
    Ok(ProjectAssignment {
        consultant_id: row.get(0)?,
        project_id: row.get(1)?,
        hours_worked: row.get(2)?,
    })
}

// ==========================================
// AssignmentRepository - 项目分配仓储
// ==========================================
/// 项目分配仓储
/// 职责: 管理 Project_Assignment 表，以及基于该表的聚合查询
pub struct AssignmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AssignmentRepository {
    /// 创建新的 AssignmentRepository 实例
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

    /// 执行写操作并返回影响行数
    fn exec_update(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let rows = conn.execute(sql, params)?;
        Ok(rows)
    }

    /// 查询单条分配
    pub fn find(
        &self,
        consultant_id: i64,
        project_id: i64,
    ) -> RepositoryResult<Option<ProjectAssignment>> {
        let conn = self.get_conn()?;
        let assignment = conn
            .query_row(
                r#"
                SELECT ConsultantID, ProjectID, HoursWorked
                FROM Project_Assignment
                WHERE ConsultantID = ?1
                  AND ProjectID = ?2
                "#,
                params![consultant_id, project_id],
                map_assignment,
            )
            .optional()?;
        Ok(assignment)
    }

    /// 新增分配（初始工时为 0）
    ///
    /// # 返回
    /// - Ok(usize): 影响行数（成功时为 1）
    /// - Err(UniqueConstraintViolation): 顾问已在该项目
    /// - Err(ForeignKeyViolation): 顾问或项目不存在
    pub fn insert(&self, consultant_id: i64, project_id: i64) -> RepositoryResult<usize> {
        let rows = self.exec_update(
            r#"
            INSERT INTO Project_Assignment (ConsultantID, ProjectID, HoursWorked)
            VALUES (?1, ?2, 0)
            "#,
            params![consultant_id, project_id],
        )?;
        tracing::info!(consultant_id, project_id, "新增项目分配");
        Ok(rows)
    }

    /// 更新工时（覆盖为新的累计值）
    pub fn update_hours(
        &self,
        consultant_id: i64,
        project_id: i64,
        hours: i64,
    ) -> RepositoryResult<usize> {
        let mut assignment = self.find(consultant_id, project_id)?.ok_or_else(|| {
            RepositoryError::not_found(
                "ProjectAssignment",
                "ConsultantID/ProjectID",
                format!("{}/{}", consultant_id, project_id),
            )
        })?;
        assignment.hours_worked = hours;

        let rows = self.exec_update(
            r#"
            UPDATE Project_Assignment
            SET HoursWorked = ?1
            WHERE ConsultantID = ?2
              AND ProjectID = ?3
            "#,
            params![
                assignment.hours_worked,
                assignment.consultant_id,
                assignment.project_id
            ],
        )?;
        tracing::info!(consultant_id, project_id, hours, "更新工时");
        Ok(rows)
    }

    pub fn delete(&self, consultant_id: i64, project_id: i64) -> RepositoryResult<usize> {
        let rows = self.exec_update(
            r#"
            DELETE FROM Project_Assignment
            WHERE ConsultantID = ?1
              AND ProjectID = ?2
            "#,
            params![consultant_id, project_id],
        )?;
        tracing::info!(consultant_id, project_id, rows, "删除项目分配");
        Ok(rows)
    }

    pub fn delete_by_consultant_id(&self, consultant_id: i64) -> RepositoryResult<usize> {
        self.exec_update(
            "DELETE FROM Project_Assignment WHERE ConsultantID = ?1",
            params![consultant_id],
        )
    }

    pub fn delete_by_project_id(&self, project_id: i64) -> RepositoryResult<usize> {
        self.exec_update(
            "DELETE FROM Project_Assignment WHERE ProjectID = ?1",
            params![project_id],
        )
    }

    pub fn find_by_project_id(&self, project_id: i64) -> RepositoryResult<Vec<ProjectAssignment>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT ConsultantID, ProjectID, HoursWorked
            FROM Project_Assignment
            WHERE ProjectID = ?1
            ORDER BY ConsultantID
            "#,
        )?;
        let list = stmt
            .query_map(params![project_id], map_assignment)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(list)
    }

    pub fn find_by_consultant_id(
        &self,
        consultant_id: i64,
    ) -> RepositoryResult<Vec<ProjectAssignment>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT ConsultantID, ProjectID, HoursWorked
            FROM Project_Assignment
            WHERE ConsultantID = ?1
            ORDER BY ProjectID
            "#,
        )?;
        let list = stmt
            .query_map(params![consultant_id], map_assignment)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(list)
    }

    /// 顾问在全部项目上的累计工时（无分配时为 0）
    pub fn total_hours_for_consultant(&self, consultant_id: i64) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let hours = conn.query_row(
            r#"
            SELECT COALESCE(SUM(HoursWorked), 0) AS TotalHours
            FROM Project_Assignment
            WHERE ConsultantID = ?1
            "#,
            params![consultant_id],
            |row| row.get(0),
        )?;
        Ok(hours)
    }

    /// 全体顾问累计工时（无分配时为 0）
    pub fn total_hours_for_all(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let hours = conn.query_row(
            "SELECT COALESCE(SUM(HoursWorked), 0) AS TotalHours FROM Project_Assignment",
            [],
            |row| row.get(0),
        )?;
        Ok(hours)
    }

    /// 累计工时最高的顾问（并列时全部返回）
    ///
    /// # 返回
    /// - Ok(Vec<i64>): ConsultantID 列表（升序）
    /// - Err(NotFound): 尚无任何分配记录
    pub fn hardest_working_consultants(&self) -> RepositoryResult<Vec<i64>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT ConsultantID
            FROM Project_Assignment
            GROUP BY ConsultantID
            HAVING SUM(HoursWorked) = (
                SELECT MAX(TotalHours)
                FROM (
                    SELECT SUM(HoursWorked) AS TotalHours
                    FROM Project_Assignment
                    GROUP BY ConsultantID
                ) AS T
            )
            ORDER BY ConsultantID
            "#,
        )?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<SqliteResult<Vec<i64>>>()?;

        if ids.is_empty() {
            return Err(RepositoryError::not_found(
                "ProjectAssignment",
                "any",
                "*",
            ));
        }
        Ok(ids)
    }

    /// 参与项目数不超过 max 的顾问姓名（含未参与任何项目者）
    pub fn consultants_in_max_projects(&self, max: i64) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT c.ConsultantName
            FROM Consultant c
            LEFT JOIN Project_Assignment pa
                   ON c.ConsultantID = pa.ConsultantID
            GROUP BY c.ConsultantID, c.ConsultantName
            HAVING COUNT(pa.ProjectID) <= ?1
            ORDER BY c.ConsultantName
            "#,
        )?;
        let names = stmt
            .query_map(params![max], |row| row.get(0))?
            .collect::<SqliteResult<Vec<String>>>()?;
        Ok(names)
    }

    /// 全体顾问均参与的项目（ProjectID 升序）
    pub fn projects_involving_every_consultant(&self) -> RepositoryResult<Vec<i64>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT ProjectID
            FROM Project_Assignment
            GROUP BY ProjectID
            HAVING COUNT(DISTINCT ConsultantID) =
                   (SELECT COUNT(*) FROM Consultant)
            ORDER BY ProjectID
            "#,
        )?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<SqliteResult<Vec<i64>>>()?;
        Ok(ids)
    }

    /// 顾问在进行中项目（EndDate IS NULL）上的分配
    pub fn find_active_by_consultant_id(
        &self,
        consultant_id: i64,
    ) -> RepositoryResult<Vec<ProjectAssignment>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT pa.ConsultantID, pa.ProjectID, pa.HoursWorked
            FROM Project_Assignment pa
            JOIN Project p ON p.ProjectID = pa.ProjectID
            WHERE pa.ConsultantID = ?1
              AND p.EndDate IS NULL
            ORDER BY pa.ProjectID
            "#,
        )?;
        let list = stmt
            .query_map(params![consultant_id], map_assignment)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(list)
    }

    /// 项目分配明细（附带顾问编号/姓名/头衔）
    pub fn find_details_by_project_id(
        &self,
        project_id: i64,
    ) -> RepositoryResult<Vec<AssignmentDetail>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT pa.ConsultantID, pa.ProjectID, pa.HoursWorked,
                   c.ConsultantNo, c.ConsultantName, c.Title
            FROM Project_Assignment pa
            JOIN Consultant c ON pa.ConsultantID = c.ConsultantID
            WHERE pa.ProjectID = ?1
            ORDER BY c.ConsultantNo
            "#,
        )?;
        let list = stmt
            .query_map(params![project_id], |row| {
                Ok(AssignmentDetail {
                    consultant_id: row.get(0)?,
                    project_id: row.get(1)?,
                    hours_worked: row.get(2)?,
                    consultant_no: row.get(3)?,
                    consultant_name: row.get(4)?,
                    title: row.get(5)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(list)
    }

    /// 项目资源负载（单条查询）
    ///
    /// # 返回
    /// - Ok(None): 项目不存在
    pub fn resource_load(&self, project_id: i64) -> RepositoryResult<Option<ResourceLoad>> {
        let conn = self.get_conn()?;
        let (active_consultants, consultants_on_project, is_active): (i64, i64, Option<i64>) = conn
            .query_row(
                r#"
                SELECT
                    (SELECT COUNT(DISTINCT pa2.ConsultantID)
                     FROM Project_Assignment pa2
                     JOIN Project p2 ON p2.ProjectID = pa2.ProjectID
                     WHERE p2.EndDate IS NULL) AS ActiveConsultants,

                    (SELECT COUNT(DISTINCT pa3.ConsultantID)
                     FROM Project_Assignment pa3
                     WHERE pa3.ProjectID = ?1) AS ConsultantsOnProject,

                    (SELECT CASE WHEN p.EndDate IS NULL THEN 1 ELSE 0 END
                     FROM Project p
                     WHERE p.ProjectID = ?1) AS IsProjectActive
                "#,
                params![project_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )?;

        Ok(is_active.map(|flag| ResourceLoad {
            active_consultants,
            consultants_on_project,
            project_active: flag == 1,
        }))
    }
}
