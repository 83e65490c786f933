// ==========================================
// 工资档案管理 - CSV 导入 Repository 实现
// ==========================================
// 职责: 基于公司/员工仓储实现导入存储接口（使用 rusqlite）
// 说明: 每行写入是独立的工作单元，不跨行开启事务
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::company::CompanyId;
use crate::domain::employee::{EmployeeId, NewEmployee};
use crate::repository::company_repo::CompanyRepository;
use crate::repository::employee_repo::EmployeeRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::payroll_import_repo::PayrollImportRepository;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

// ==========================================
// PayrollImportRepositoryImpl
// ==========================================
pub struct PayrollImportRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
    companies: CompanyRepository,
    employees: EmployeeRepository,
}

impl PayrollImportRepositoryImpl {
    /// 创建新的 Repository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self::from_connection(Arc::new(Mutex::new(conn))))
    }

    /// 从已有连接创建（与 CRUD 仓储共享同一连接）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            companies: CompanyRepository::from_connection(conn.clone()),
            employees: EmployeeRepository::from_connection(conn.clone()),
            conn,
        }
    }
}

impl PayrollImportRepository for PayrollImportRepositoryImpl {
    fn ping(&self) -> RepositoryResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        conn.query_row("SELECT COUNT(*) FROM companies", [], |row| row.get::<_, i64>(0))
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(())
    }

    fn find_company_by_name(&self, name: &str) -> RepositoryResult<Option<CompanyId>> {
        Ok(self.companies.find_by_name(name)?.map(|company| company.id))
    }

    fn create_company(&self, name: &str) -> RepositoryResult<CompanyId> {
        self.companies.create(name)
    }

    fn create_employee(&self, employee: &NewEmployee) -> RepositoryResult<EmployeeId> {
        self.employees.create(employee)
    }
}
