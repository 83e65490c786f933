// ==========================================
// 工资档案管理 - 公司仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 管理 companies 表的 CRUD 操作及汇总查询
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::company::{Company, CompanyId, CompanySummary};
use crate::repository::error::{RepositoryError, RepositoryResult, UniqueKey};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

/// 当前时间戳（与 employees 表一致的文本格式）
pub(crate) fn now_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn map_company(row: &Row<'_>) -> SqliteResult<Company> {
    Ok(Company {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
    })
}

fn map_summary(row: &Row<'_>) -> SqliteResult<CompanySummary> {
    Ok(CompanySummary {
        id: row.get(0)?,
        name: row.get(1)?,
        employee_count: row.get(2)?,
        average_salary: row.get(3)?,
    })
}

const SUMMARY_SELECT: &str = r#"
    SELECT c.id, c.name,
           COUNT(e.id) AS employee_count,
           COALESCE(AVG(e.salary), 0.0) AS average_salary
    FROM companies c
    LEFT JOIN employees e ON c.id = e.company_id
"#;

// ==========================================
// CompanyRepository - 公司仓储
// ==========================================
pub struct CompanyRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CompanyRepository {
    /// 创建新的 CompanyRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 创建公司
    ///
    /// # 返回
    /// - Ok(CompanyId): 新分配的公司ID
    /// - Err(DuplicateKey{CompanyName}): 同名公司已存在
    pub fn create(&self, name: &str) -> RepositoryResult<CompanyId> {
        let conn = self.get_conn()?;
        let now = now_timestamp();
        conn.execute(
            "INSERT INTO companies (name, created_at, updated_at) VALUES (?1, ?2, ?3)",
            params![name, now, now],
        )
        .map_err(|e| RepositoryError::from(e).with_unique_key(UniqueKey::CompanyName, name))?;
        Ok(conn.last_insert_rowid())
    }

    /// 按ID查询
    pub fn find_by_id(&self, id: CompanyId) -> RepositoryResult<Option<Company>> {
        let conn = self.get_conn()?;
        let company = conn
            .query_row(
                "SELECT id, name, created_at, updated_at FROM companies WHERE id = ?1",
                params![id],
                map_company,
            )
            .optional()?;
        Ok(company)
    }

    /// 按名称精确查询（大小写敏感）
    pub fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Company>> {
        let conn = self.get_conn()?;
        let company = conn
            .query_row(
                "SELECT id, name, created_at, updated_at FROM companies WHERE name = ?1",
                params![name],
                map_company,
            )
            .optional()?;
        Ok(company)
    }

    /// 查询全部公司（按ID升序）
    pub fn list(&self) -> RepositoryResult<Vec<Company>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT id, name, created_at, updated_at FROM companies ORDER BY id ASC")?;
        let companies = stmt
            .query_map([], map_company)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(companies)
    }

    /// 查询全部公司及员工数、平均薪资
    pub fn list_with_stats(&self) -> RepositoryResult<Vec<CompanySummary>> {
        let conn = self.get_conn()?;
        let sql = format!("{} GROUP BY c.id, c.name ORDER BY c.id ASC", SUMMARY_SELECT);
        let mut stmt = conn.prepare(&sql)?;
        let summaries = stmt
            .query_map([], map_summary)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(summaries)
    }

    /// 查询单个公司及员工数、平均薪资
    pub fn find_with_stats(&self, id: CompanyId) -> RepositoryResult<Option<CompanySummary>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE c.id = ?1 GROUP BY c.id, c.name", SUMMARY_SELECT);
        let summary = conn.query_row(&sql, params![id], map_summary).optional()?;
        Ok(summary)
    }

    /// 修改公司名称
    ///
    /// # 返回
    /// - Ok(true): 已更新
    /// - Ok(false): 公司不存在
    pub fn update_name(&self, id: CompanyId, name: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn
            .execute(
                "UPDATE companies SET name = ?1, updated_at = ?2 WHERE id = ?3",
                params![name, now_timestamp(), id],
            )
            .map_err(|e| RepositoryError::from(e).with_unique_key(UniqueKey::CompanyName, name))?;
        Ok(affected > 0)
    }

    /// 删除公司
    ///
    /// 仍有员工引用时返回 ForeignKeyViolation
    pub fn delete(&self, id: CompanyId) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM companies WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }
}
