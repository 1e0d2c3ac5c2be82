// ==========================================
// 顾问项目管理 - 数据库元数据仓储
// ==========================================
// 数据来源: sqlite_master + pragma_table_info
// 说明: CHECK 约束在 SQLite 中没有目录视图，从建表语句中提取
//       `CONSTRAINT <name> CHECK` 形式的命名约束
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::metadata::TableRowCount;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex, MutexGuard};

/// 用户表过滤条件（排除 SQLite 内部表与 schema_version）
const USER_TABLE_FILTER: &str =
    "m.type = 'table' AND m.name NOT LIKE 'sqlite_%' AND m.name <> 'schema_version'";

pub struct MetadataRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MetadataRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 执行单列查询
    fn fetch_single_column(&self, sql: &str) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(sql)?;
        let values = stmt
            .query_map([], |row| row.get(0))?
            .collect::<SqliteResult<Vec<String>>>()?;
        Ok(values)
    }

    /// 全部用户表名（按名称排序）
    pub fn table_names(&self) -> RepositoryResult<Vec<String>> {
        self.fetch_single_column(&format!(
            "SELECT m.name FROM sqlite_master m WHERE {} ORDER BY m.name",
            USER_TABLE_FILTER
        ))
    }

    /// 全部用户表的全部列名（排序，可能重复）
    pub fn all_columns(&self) -> RepositoryResult<Vec<String>> {
        self.fetch_single_column(&format!(
            r#"
            SELECT p.name
            FROM sqlite_master m
            JOIN pragma_table_info(m.name) p
            WHERE {}
            ORDER BY p.name
            "#,
            USER_TABLE_FILTER
        ))
    }

    /// 全部主键列，格式 `Table.Column`
    pub fn primary_key_columns(&self) -> RepositoryResult<Vec<String>> {
        self.fetch_single_column(&format!(
            r#"
            SELECT m.name || '.' || p.name
            FROM sqlite_master m
            JOIN pragma_table_info(m.name) p
            WHERE {} AND p.pk > 0
            ORDER BY m.name, p.pk
            "#,
            USER_TABLE_FILTER
        ))
    }

    /// 全部命名 CHECK 约束（排序）
    pub fn check_constraints(&self) -> RepositoryResult<Vec<String>> {
        let definitions = self.fetch_single_column(&format!(
            "SELECT m.sql FROM sqlite_master m WHERE {} AND m.sql IS NOT NULL",
            USER_TABLE_FILTER
        ))?;

        let mut names: Vec<String> = definitions
            .iter()
            .flat_map(|sql| extract_check_constraint_names(sql))
            .collect();
        names.sort();
        Ok(names)
    }

    /// 指定表中声明类型不是整数的列（按列顺序）
    pub fn non_integer_columns(&self, table: &str) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT name
            FROM pragma_table_info(?1)
            WHERE upper(type) NOT IN ('INTEGER', 'INT')
            ORDER BY cid
            "#,
        )?;
        let columns = stmt
            .query_map(params![table], |row| row.get(0))?
            .collect::<SqliteResult<Vec<String>>>()?;
        Ok(columns)
    }

    /// 行数最多的用户表（并列时取表名靠前者）
    pub fn largest_table(&self) -> RepositoryResult<Option<TableRowCount>> {
        let tables = self.table_names()?;
        let conn = self.get_conn()?;

        let mut largest: Option<TableRowCount> = None;
        for table in tables {
            // 表名来自 sqlite_master，按标识符规则转义
            let sql = format!("SELECT COUNT(*) FROM \"{}\"", table.replace('"', "\"\""));
            let row_count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
            if largest.as_ref().map_or(true, |l| row_count > l.row_count) {
                largest = Some(TableRowCount {
                    table_name: table,
                    row_count,
                });
            }
        }
        Ok(largest)
    }
}

/// 从建表语句中提取 `CONSTRAINT <name> CHECK` 的约束名
fn extract_check_constraint_names(sql: &str) -> Vec<String> {
    let tokens: Vec<&str> = sql
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .collect();

    tokens
        .windows(3)
        .filter(|w| w[0].eq_ignore_ascii_case("CONSTRAINT") && w[2].eq_ignore_ascii_case("CHECK"))
        .map(|w| w[1].to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn repo() -> MetadataRepository {
        MetadataRepository::from_connection(Arc::new(Mutex::new(open_in_memory().unwrap())))
    }

    #[test]
    fn test_extract_check_constraint_names() {
        let sql = "CREATE TABLE t (a INT, CONSTRAINT CK_t_a CHECK (a > 0), \
                   CONSTRAINT uq_a UNIQUE (a), constraint ck_lower check(a < 9))";
        assert_eq!(
            extract_check_constraint_names(sql),
            vec!["CK_t_a".to_string(), "ck_lower".to_string()]
        );
    }

    #[test]
    fn test_table_names() {
        let repo = repo();
        assert_eq!(
            repo.table_names().unwrap(),
            vec!["Consultant", "Milestone", "Project", "Project_Assignment"]
        );
    }

    #[test]
    fn test_all_columns_已排序() {
        let repo = repo();
        let columns = repo.all_columns().unwrap();
        assert!(columns.contains(&"ConsultantName".to_string()));
        assert!(columns.contains(&"HoursWorked".to_string()));
        let mut sorted = columns.clone();
        sorted.sort();
        assert_eq!(columns, sorted);
    }

    #[test]
    fn test_primary_key_columns() {
        let repo = repo();
        let pks = repo.primary_key_columns().unwrap();
        assert!(pks.contains(&"Consultant.ConsultantID".to_string()));
        assert!(pks.contains(&"Project_Assignment.ConsultantID".to_string()));
        assert!(pks.contains(&"Project_Assignment.ProjectID".to_string()));
    }

    #[test]
    fn test_check_constraints() {
        let repo = repo();
        assert_eq!(
            repo.check_constraints().unwrap(),
            vec![
                "CK_Consultant_ConsultantNo",
                "CK_Project_Assignment_HoursWorked",
                "CK_Project_EndDate"
            ]
        );
    }

    #[test]
    fn test_non_integer_columns() {
        let repo = repo();
        assert_eq!(
            repo.non_integer_columns("Consultant").unwrap(),
            vec!["ConsultantName", "Title"]
        );
    }

    #[test]
    fn test_largest_table() {
        let repo = repo();
        // 空库: 全部为 0 行，取表名最靠前者
        let t = repo.largest_table().unwrap().unwrap();
        assert_eq!(t.table_name, "Consultant");
        assert_eq!(t.row_count, 0);

        {
            let conn = repo.get_conn().unwrap();
            conn.execute_batch(
                r#"
                INSERT INTO Project (ProjectNo, ProjectName, StartDate) VALUES (1, 'A', '2024-01-01');
                INSERT INTO Project (ProjectNo, ProjectName, StartDate) VALUES (2, 'B', '2024-01-01');
                "#,
            )
            .unwrap();
        }
        let t = repo.largest_table().unwrap().unwrap();
        assert_eq!(t.to_string(), "Project (2 rows)");
    }
}
