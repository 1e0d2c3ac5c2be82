// ==========================================
// 顾问项目管理 - 项目数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 删除项目时级联清理里程碑与分配（单事务）
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::project::{NewProject, Project};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const SELECT_PROJECT: &str = r#"
    SELECT ProjectID, ProjectNo, ProjectName, StartDate, EndDate
    FROM Project
"#;

fn map_project(row: &Row<'_>) -> SqliteResult<Project> {
    Ok(Project {
        project_id: row.get(0)?,
        project_no: row.get(1)?,
        name: row.get(2)?,
        start_date: row.get(3)?,
        end_date: row.get(4)?,
    })
}

/// 项目删除的级联统计
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectDeletion {
    pub removed_milestones: usize,
    pub removed_assignments: usize,
}

// ==========================================
// ProjectRepository - 项目仓储
// ==========================================
pub struct ProjectRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProjectRepository {
    /// 创建新的 ProjectRepository 实例
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

    /// 查询全部项目（按编号排序）
    pub fn find_all(&self) -> RepositoryResult<Vec<Project>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY ProjectNo", SELECT_PROJECT))?;
        let projects = stmt
            .query_map([], map_project)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(projects)
    }

    /// 按业务编号查询
    pub fn find_by_no(&self, project_no: i64) -> RepositoryResult<Option<Project>> {
        let conn = self.get_conn()?;
        let project = conn
            .query_row(
                &format!("{} WHERE ProjectNo = ?1", SELECT_PROJECT),
                params![project_no],
                map_project,
            )
            .optional()?;
        Ok(project)
    }

    /// 按内部主键查询
    pub fn find_by_id(&self, project_id: i64) -> RepositoryResult<Option<Project>> {
        let conn = self.get_conn()?;
        let project = conn
            .query_row(
                &format!("{} WHERE ProjectID = ?1", SELECT_PROJECT),
                params![project_id],
                map_project,
            )
            .optional()?;
        Ok(project)
    }

    /// 按内部主键批量查询（保持入参顺序，忽略不存在的ID）
    pub fn find_by_ids(&self, ids: &[i64]) -> RepositoryResult<Vec<Project>> {
        let mut projects = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(p) = self.find_by_id(*id)? {
                projects.push(p);
            }
        }
        Ok(projects)
    }

    /// 新增项目
    ///
    /// # 返回
    /// - Ok(i64): 新记录的 ProjectID
    /// - Err(UniqueConstraintViolation): 编号已存在
    pub fn insert(&self, project: &NewProject) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO Project (ProjectNo, ProjectName, StartDate, EndDate)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                project.project_no,
                project.name,
                project.start_date,
                project.end_date
            ],
        )?;
        let id = conn.last_insert_rowid();
        tracing::info!(project_no = project.project_no, project_id = id, "新增项目");
        Ok(id)
    }

    /// 批量新增项目（单事务，编号已存在的行跳过）
    ///
    /// # 返回
    /// - Ok(Vec<bool>): 与入参一一对应，true 表示已插入
    pub fn insert_batch(&self, projects: &[NewProject]) -> RepositoryResult<Vec<bool>> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let mut inserted = Vec::with_capacity(projects.len());
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT OR IGNORE INTO Project (ProjectNo, ProjectName, StartDate, EndDate)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )?;
            for p in projects {
                let rows = stmt.execute(params![p.project_no, p.name, p.start_date, p.end_date])?;
                inserted.push(rows == 1);
            }
        }
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tracing::info!(
            total = projects.len(),
            inserted = inserted.iter().filter(|f| **f).count(),
            "批量新增项目"
        );
        Ok(inserted)
    }

    /// 业务编号 → 内部主键
    ///
    /// # 返回
    /// - Ok(None): 项目不存在
    pub fn find_id_by_no(&self, project_no: i64) -> RepositoryResult<Option<i64>> {
        let conn = self.get_conn()?;
        let id = conn
            .query_row(
                "SELECT ProjectID FROM Project WHERE ProjectNo = ?1",
                params![project_no],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    /// 删除项目，同时删除其里程碑与分配记录（单事务）
    pub fn delete(&self, project_no: i64) -> RepositoryResult<ProjectDeletion> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let project_id: Option<i64> = tx
            .query_row(
                "SELECT ProjectID FROM Project WHERE ProjectNo = ?1",
                params![project_no],
                |row| row.get(0),
            )
            .optional()?;
        let Some(project_id) = project_id else {
            return Err(RepositoryError::not_found("Project", "ProjectNo", project_no));
        };

        let removed_milestones = tx.execute(
            "DELETE FROM Milestone WHERE ProjectID = ?1",
            params![project_id],
        )?;
        let removed_assignments = tx.execute(
            "DELETE FROM Project_Assignment WHERE ProjectID = ?1",
            params![project_id],
        )?;
        tx.execute("DELETE FROM Project WHERE ProjectID = ?1", params![project_id])?;
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tracing::info!(project_no, removed_milestones, removed_assignments, "删除项目");
        Ok(ProjectDeletion {
            removed_milestones,
            removed_assignments,
        })
    }

    /// 更新项目名称与起止日期（按编号定位，编号不可修改）
    pub fn update(&self, project: &NewProject) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE Project
            SET ProjectName = ?1, StartDate = ?2, EndDate = ?3
            WHERE ProjectNo = ?4
            "#,
            params![
                project.name,
                project.start_date,
                project.end_date,
                project.project_no
            ],
        )?;
        if rows == 0 {
            return Err(RepositoryError::not_found(
                "Project",
                "ProjectNo",
                project.project_no,
            ));
        }
        tracing::info!(project_no = project.project_no, "更新项目");
        Ok(())
    }

    /// 项目总数 / 进行中项目数
    pub fn count(&self) -> RepositoryResult<(i64, i64)> {
        let conn = self.get_conn()?;
        let counts = conn.query_row(
            r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(CASE WHEN EndDate IS NULL THEN 1 ELSE 0 END), 0)
            FROM Project
            "#,
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use chrono::NaiveDate;

    fn repo() -> ProjectRepository {
        ProjectRepository::from_connection(Arc::new(Mutex::new(open_in_memory().unwrap())))
    }

    fn new_project(no: i64, end: Option<NaiveDate>) -> NewProject {
        NewProject {
            project_no: no,
            name: format!("Project {}", no),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            end_date: end,
        }
    }

    #[test]
    fn test_insert_and_find_日期往返() {
        let repo = repo();
        let end = NaiveDate::from_ymd_opt(2024, 12, 31);
        let id = repo.insert(&new_project(10, end)).unwrap();

        let p = repo.find_by_no(10).unwrap().unwrap();
        assert_eq!(p.project_id, id);
        assert_eq!(p.start_date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(p.end_date, end);
        assert!(!p.is_active());
        assert_eq!(repo.find_id_by_no(10).unwrap(), Some(id));
        assert_eq!(repo.find_id_by_no(11).unwrap(), None);
    }

    #[test]
    fn test_insert_结束早于开始() {
        let repo = repo();
        let err = repo
            .insert(&new_project(1, NaiveDate::from_ymd_opt(2023, 1, 1)))
            .unwrap_err();
        assert!(matches!(err, RepositoryError::CheckConstraintViolation(_)));
    }

    #[test]
    fn test_update_清空结束日期() {
        let repo = repo();
        repo.insert(&new_project(1, NaiveDate::from_ymd_opt(2024, 6, 1)))
            .unwrap();

        let mut updated = new_project(1, None);
        updated.name = "Renamed".to_string();
        repo.update(&updated).unwrap();

        let p = repo.find_by_no(1).unwrap().unwrap();
        assert_eq!(p.name, "Renamed");
        assert!(p.is_active());
    }

    #[test]
    fn test_update_不存在() {
        let repo = repo();
        let err = repo.update(&new_project(42, None)).unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }

    #[test]
    fn test_insert_batch_跳过重复() {
        let repo = repo();
        repo.insert(&new_project(1, None)).unwrap();
        let flags = repo
            .insert_batch(&[new_project(1, None), new_project(2, None)])
            .unwrap();
        assert_eq!(flags, vec![false, true]);
        assert_eq!(repo.count().unwrap(), (2, 2));
    }

    #[test]
    fn test_count() {
        let repo = repo();
        repo.insert(&new_project(1, None)).unwrap();
        repo.insert(&new_project(2, NaiveDate::from_ymd_opt(2024, 2, 1)))
            .unwrap();
        assert_eq!(repo.count().unwrap(), (2, 1));
    }
}
