// ==========================================
// 顾问项目管理 - 顾问数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::consultant::{Consultant, ConsultantWithProjectCount, NewConsultant};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const SELECT_CONSULTANT: &str = r#"
    SELECT ConsultantID, ConsultantNo, ConsultantName, Title
    FROM Consultant
"#;

fn map_consultant(row: &Row<'_>) -> SqliteResult<Consultant> {
    Ok(Consultant {
        consultant_id: row.get(0)?,
        consultant_no: row.get(1)?,
        name: row.get(2)?,
        title: row.get(3)?,
    })
}

// ==========================================
// ConsultantRepository - 顾问仓储
// ==========================================
/// 顾问仓储
/// 职责: 管理 Consultant 表的 CRUD 操作
pub struct ConsultantRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ConsultantRepository {
    /// 创建新的 ConsultantRepository 实例
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

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询全部顾问（按编号排序）
    pub fn find_all(&self) -> RepositoryResult<Vec<Consultant>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY ConsultantNo", SELECT_CONSULTANT))?;
        let consultants = stmt
            .query_map([], map_consultant)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(consultants)
    }

    /// 按业务编号查询
    ///
    /// # 返回
    /// - Ok(Some(Consultant)): 找到
    /// - Ok(None): 未找到
    pub fn find_by_no(&self, consultant_no: i64) -> RepositoryResult<Option<Consultant>> {
        let conn = self.get_conn()?;
        let consultant = conn
            .query_row(
                &format!("{} WHERE ConsultantNo = ?1", SELECT_CONSULTANT),
                params![consultant_no],
                map_consultant,
            )
            .optional()?;
        Ok(consultant)
    }

    /// 按内部主键查询
    pub fn find_by_id(&self, consultant_id: i64) -> RepositoryResult<Option<Consultant>> {
        let conn = self.get_conn()?;
        let consultant = conn
            .query_row(
                &format!("{} WHERE ConsultantID = ?1", SELECT_CONSULTANT),
                params![consultant_id],
                map_consultant,
            )
            .optional()?;
        Ok(consultant)
    }

    /// 按内部主键批量查询（保持入参顺序，忽略不存在的ID）
    pub fn find_by_ids(&self, ids: &[i64]) -> RepositoryResult<Vec<Consultant>> {
        let mut consultants = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(c) = self.find_by_id(*id)? {
                consultants.push(c);
            }
        }
        Ok(consultants)
    }

    /// 新增顾问
    ///
    /// # 返回
    /// - Ok(i64): 新记录的 ConsultantID
    /// - Err(UniqueConstraintViolation): 编号已存在
    pub fn insert(&self, consultant: &NewConsultant) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO Consultant (ConsultantNo, ConsultantName, Title)
            VALUES (?1, ?2, ?3)
            "#,
            params![consultant.consultant_no, consultant.name, consultant.title],
        )?;
        let id = conn.last_insert_rowid();
        tracing::info!(consultant_no = consultant.consultant_no, consultant_id = id, "新增顾问");
        Ok(id)
    }

    /// 批量新增顾问（单事务，编号已存在的行跳过）
    ///
    /// # 返回
    /// - Ok(Vec<bool>): 与入参一一对应，true 表示已插入
    pub fn insert_batch(&self, consultants: &[NewConsultant]) -> RepositoryResult<Vec<bool>> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let mut inserted = Vec::with_capacity(consultants.len());
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT OR IGNORE INTO Consultant (ConsultantNo, ConsultantName, Title)
                VALUES (?1, ?2, ?3)
                "#,
            )?;
            for c in consultants {
                let rows = stmt.execute(params![c.consultant_no, c.name, c.title])?;
                inserted.push(rows == 1);
            }
        }
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tracing::info!(
            total = consultants.len(),
            inserted = inserted.iter().filter(|f| **f).count(),
            "批量新增顾问"
        );
        Ok(inserted)
    }

    /// 更新顾问信息（可修改编号）
    ///
    /// # 参数
    /// - `old_consultant_no`: 当前编号
    /// - `consultant`: 新的编号/姓名/头衔
    pub fn update(&self, old_consultant_no: i64, consultant: &NewConsultant) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE Consultant
            SET ConsultantNo = ?1, ConsultantName = ?2, Title = ?3
            WHERE ConsultantNo = ?4
            "#,
            params![
                consultant.consultant_no,
                consultant.name,
                consultant.title,
                old_consultant_no
            ],
        )?;
        if rows == 0 {
            return Err(RepositoryError::not_found(
                "Consultant",
                "ConsultantNo",
                old_consultant_no,
            ));
        }
        tracing::info!(old_consultant_no, new_consultant_no = consultant.consultant_no, "更新顾问");
        Ok(())
    }

    /// 业务编号 → 内部主键
    pub fn find_id_by_no(&self, consultant_no: i64) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.query_row(
            "SELECT ConsultantID FROM Consultant WHERE ConsultantNo = ?1",
            params![consultant_no],
            |row| row.get(0),
        )
        .optional()?
        .ok_or_else(|| RepositoryError::not_found("Consultant", "ConsultantNo", consultant_no))
    }

    /// 删除顾问及其全部项目分配（单事务）
    ///
    /// # 返回
    /// - Ok(usize): 同时删除的分配记录数
    /// - Err(NotFound): 顾问不存在，事务回滚
    pub fn delete(&self, consultant_no: i64) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let consultant_id: Option<i64> = tx
            .query_row(
                "SELECT ConsultantID FROM Consultant WHERE ConsultantNo = ?1",
                params![consultant_no],
                |row| row.get(0),
            )
            .optional()?;
        let Some(consultant_id) = consultant_id else {
            return Err(RepositoryError::not_found(
                "Consultant",
                "ConsultantNo",
                consultant_no,
            ));
        };

        let removed_assignments = tx.execute(
            "DELETE FROM Project_Assignment WHERE ConsultantID = ?1",
            params![consultant_id],
        )?;
        tx.execute(
            "DELETE FROM Consultant WHERE ConsultantID = ?1",
            params![consultant_id],
        )?;
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tracing::info!(consultant_no, removed_assignments, "删除顾问");
        Ok(removed_assignments)
    }

    /// 查询未参与指定项目的顾问（按姓名排序）
    pub fn find_not_in_project(&self, project_id: i64) -> RepositoryResult<Vec<Consultant>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT c.ConsultantID, c.ConsultantNo, c.ConsultantName, c.Title
            FROM Consultant c
            WHERE c.ConsultantID NOT IN (
                SELECT pa.ConsultantID
                FROM Project_Assignment pa
                WHERE pa.ProjectID = ?1
            )
            ORDER BY c.ConsultantName
            "#,
        )?;
        let consultants = stmt
            .query_map(params![project_id], map_consultant)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(consultants)
    }

    /// 查询全部顾问及其参与项目数（按编号排序）
    pub fn find_all_with_project_count(&self) -> RepositoryResult<Vec<ConsultantWithProjectCount>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                c.ConsultantNo,
                c.ConsultantName,
                c.Title,
                COUNT(DISTINCT pa.ProjectID) AS ProjectCount
            FROM Consultant c
            LEFT JOIN Project_Assignment pa
                   ON pa.ConsultantID = c.ConsultantID
            GROUP BY c.ConsultantNo, c.ConsultantName, c.Title
            ORDER BY c.ConsultantNo
            "#,
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ConsultantWithProjectCount {
                    consultant_no: row.get(0)?,
                    name: row.get(1)?,
                    title: row.get(2)?,
                    project_count: row.get(3)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    /// 顾问总数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM Consultant", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn repo() -> ConsultantRepository {
        ConsultantRepository::from_connection(Arc::new(Mutex::new(open_in_memory().unwrap())))
    }

    #[test]
    fn test_insert_and_find() {
        let repo = repo();
        let id = repo.insert(&NewConsultant::new(7, "Ada", "Architect")).unwrap();

        let by_no = repo.find_by_no(7).unwrap().unwrap();
        assert_eq!(by_no.consultant_id, id);
        assert_eq!(by_no.name, "Ada");
        assert_eq!(repo.find_by_id(id).unwrap(), Some(by_no));
        assert!(repo.find_by_no(8).unwrap().is_none());
    }

    #[test]
    fn test_insert_重复编号() {
        let repo = repo();
        repo.insert(&NewConsultant::new(1, "A", "Dev")).unwrap();
        let err = repo.insert(&NewConsultant::new(1, "B", "Dev")).unwrap_err();
        assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
    }

    #[test]
    fn test_update_修改编号() {
        let repo = repo();
        repo.insert(&NewConsultant::new(1, "A", "Dev")).unwrap();
        repo.update(1, &NewConsultant::new(2, "A2", "Lead")).unwrap();

        assert!(repo.find_by_no(1).unwrap().is_none());
        let c = repo.find_by_no(2).unwrap().unwrap();
        assert_eq!(c.name, "A2");
        assert_eq!(c.title, "Lead");
    }

    #[test]
    fn test_update_不存在() {
        let repo = repo();
        let err = repo.update(99, &NewConsultant::new(2, "A", "Dev")).unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }

    #[test]
    fn test_find_id_by_no_不存在() {
        let repo = repo();
        assert!(matches!(
            repo.find_id_by_no(5),
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[test]
    fn test_delete_不存在() {
        let repo = repo();
        assert!(matches!(repo.delete(5), Err(RepositoryError::NotFound { .. })));
    }

    #[test]
    fn test_insert_batch_跳过重复() {
        let repo = repo();
        repo.insert(&NewConsultant::new(1, "A", "Dev")).unwrap();
        let flags = repo
            .insert_batch(&[
                NewConsultant::new(1, "A again", "Dev"),
                NewConsultant::new(2, "B", "Dev"),
                NewConsultant::new(2, "B twice", "Dev"),
            ])
            .unwrap();
        assert_eq!(flags, vec![false, true, false]);
        assert_eq!(repo.find_by_no(1).unwrap().unwrap().name, "A");
        assert_eq!(repo.count().unwrap(), 2);
    }

    #[test]
    fn test_count() {
        let repo = repo();
        assert_eq!(repo.count().unwrap(), 0);
        repo.insert(&NewConsultant::new(1, "A", "Dev")).unwrap();
        repo.insert(&NewConsultant::new(2, "B", "Dev")).unwrap();
        assert_eq!(repo.count().unwrap(), 2);
    }
}
