// ==========================================
// 工资档案管理 - 员工仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 管理 employees 表的 CRUD 操作
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::company::CompanyId;
use crate::domain::employee::{Employee, EmployeeId, EmployeeUpdate, NewEmployee};
use crate::repository::company_repo::now_timestamp;
use crate::repository::error::{RepositoryError, RepositoryResult, UniqueKey};
use rusqlite::types::ToSql;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const EMPLOYEE_COLUMNS: &str =
    "id, company_id, full_name, email, salary, created_at, updated_at";

fn map_employee(row: &Row<'_>) -> SqliteResult<Employee> {
    Ok(Employee {
        id: row.get(0)?,
        company_id: row.get(1)?,
        full_name: row.get(2)?,
        email: row.get(3)?,
        salary: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

// ==========================================
// EmployeeRepository - 员工仓储
// ==========================================
pub struct EmployeeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EmployeeRepository {
    /// 创建新的 EmployeeRepository 实例
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

    /// 创建员工
    ///
    /// # 返回
    /// - Ok(EmployeeId): 新分配的员工ID
    /// - Err(DuplicateKey{EmployeeEmail}): 邮箱已存在
    /// - Err(ForeignKeyViolation): company_id 不存在
    pub fn create(&self, employee: &NewEmployee) -> RepositoryResult<EmployeeId> {
        let conn = self.get_conn()?;
        let now = now_timestamp();
        conn.execute(
            r#"
            INSERT INTO employees (company_id, full_name, email, salary, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                employee.company_id,
                employee.full_name,
                employee.email,
                employee.salary,
                now,
                now,
            ],
        )
        .map_err(|e| {
            RepositoryError::from(e).with_unique_key(UniqueKey::EmployeeEmail, &employee.email)
        })?;
        Ok(conn.last_insert_rowid())
    }

    /// 按ID查询
    pub fn find_by_id(&self, id: EmployeeId) -> RepositoryResult<Option<Employee>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM employees WHERE id = ?1", EMPLOYEE_COLUMNS);
        let employee = conn.query_row(&sql, params![id], map_employee).optional()?;
        Ok(employee)
    }

    /// 查询全部员工（按ID升序）
    pub fn list(&self) -> RepositoryResult<Vec<Employee>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM employees ORDER BY id ASC", EMPLOYEE_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let employees = stmt
            .query_map([], map_employee)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(employees)
    }

    /// 查询公司下的员工
    pub fn list_by_company(&self, company_id: CompanyId) -> RepositoryResult<Vec<Employee>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM employees WHERE company_id = ?1 ORDER BY id ASC",
            EMPLOYEE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let employees = stmt
            .query_map(params![company_id], map_employee)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(employees)
    }

    /// 部分更新员工（只更新提供的字段）
    ///
    /// # 返回
    /// - Ok(true): 已更新（或无字段可更新但记录存在）
    /// - Ok(false): 员工不存在
    pub fn update(&self, id: EmployeeId, update: &EmployeeUpdate) -> RepositoryResult<bool> {
        if update.is_empty() {
            return Ok(self.find_by_id(id)?.is_some());
        }

        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(company_id) = update.company_id {
            sets.push("company_id = ?");
            values.push(Box::new(company_id));
        }
        if let Some(ref full_name) = update.full_name {
            sets.push("full_name = ?");
            values.push(Box::new(full_name.clone()));
        }
        if let Some(ref email) = update.email {
            sets.push("email = ?");
            values.push(Box::new(email.clone()));
        }
        if let Some(salary) = update.salary {
            sets.push("salary = ?");
            values.push(Box::new(salary));
        }
        sets.push("updated_at = ?");
        values.push(Box::new(now_timestamp()));
        values.push(Box::new(id));

        let sql = format!("UPDATE employees SET {} WHERE id = ?", sets.join(", "));

        let conn = self.get_conn()?;
        let affected = conn
            .execute(&sql, params_from_iter(values.iter().map(|v| v.as_ref())))
            .map_err(|e| {
                let email = update.email.as_deref().unwrap_or_default();
                RepositoryError::from(e).with_unique_key(UniqueKey::EmployeeEmail, email)
            })?;
        Ok(affected > 0)
    }

    /// 删除员工
    pub fn delete(&self, id: EmployeeId) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM employees WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }
}
