// ==========================================
// 测试用内存存储
// ==========================================
// 模拟唯一约束（公司名、邮箱）与外键，记录调用次数
// ==========================================

use crate::domain::company::CompanyId;
use crate::domain::employee::{EmployeeId, NewEmployee};
use crate::repository::error::{RepositoryError, RepositoryResult, UniqueKey};
use crate::repository::payroll_import_repo::PayrollImportRepository;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct MockState {
    companies: HashMap<String, CompanyId>,
    employees: Vec<NewEmployee>,
    next_id: i64,
    lookups: usize,
    creates: usize,
}

#[derive(Default)]
pub struct MockPayrollRepo {
    state: Mutex<MockState>,
    /// ping 失败（模拟存储不可达）
    unavailable: bool,
    /// 员工写入以通用错误失败的邮箱
    failing_emails: Vec<String>,
    /// 查询后、写入前被“其他导入”抢先创建的公司名
    racing_companies: Vec<String>,
}

impl MockPayrollRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_company(self, name: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.next_id += 1;
            let id = state.next_id;
            state.companies.insert(name.to_string(), id);
        }
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    pub fn with_failing_email(mut self, email: &str) -> Self {
        self.failing_emails.push(email.to_string());
        self
    }

    pub fn with_racing_company(mut self, name: &str) -> Self {
        self.racing_companies.push(name.to_string());
        self
    }

    pub fn employees(&self) -> Vec<NewEmployee> {
        self.state.lock().unwrap().employees.clone()
    }

    pub fn company_id(&self, name: &str) -> Option<CompanyId> {
        self.state.lock().unwrap().companies.get(name).copied()
    }

    pub fn lookup_count(&self) -> usize {
        self.state.lock().unwrap().lookups
    }

    pub fn create_count(&self) -> usize {
        self.state.lock().unwrap().creates
    }
}

impl PayrollImportRepository for MockPayrollRepo {
    fn ping(&self) -> RepositoryResult<()> {
        if self.unavailable {
            return Err(RepositoryError::DatabaseConnectionError(
                "connection refused".to_string(),
            ));
        }
        Ok(())
    }

    fn find_company_by_name(&self, name: &str) -> RepositoryResult<Option<CompanyId>> {
        let mut state = self.state.lock().unwrap();
        state.lookups += 1;
        Ok(state.companies.get(name).copied())
    }

    fn create_company(&self, name: &str) -> RepositoryResult<CompanyId> {
        let mut state = self.state.lock().unwrap();
        state.creates += 1;
        if self.racing_companies.iter().any(|c| c == name) || state.companies.contains_key(name) {
            return Err(RepositoryError::DuplicateKey {
                key: UniqueKey::CompanyName,
                value: name.to_string(),
            });
        }
        state.next_id += 1;
        let id = state.next_id;
        state.companies.insert(name.to_string(), id);
        Ok(id)
    }

    fn create_employee(&self, employee: &NewEmployee) -> RepositoryResult<EmployeeId> {
        let mut state = self.state.lock().unwrap();
        if self.failing_emails.contains(&employee.email) {
            return Err(RepositoryError::DatabaseQueryError("disk I/O error".to_string()));
        }
        if !state.companies.values().any(|id| *id == employee.company_id) {
            return Err(RepositoryError::ForeignKeyViolation(
                "FOREIGN KEY constraint failed".to_string(),
            ));
        }
        if state.employees.iter().any(|e| e.email == employee.email) {
            return Err(RepositoryError::DuplicateKey {
                key: UniqueKey::EmployeeEmail,
                value: employee.email.clone(),
            });
        }
        state.employees.push(employee.clone());
        Ok(state.employees.len() as EmployeeId)
    }
}
