// ==========================================
// 工资档案管理 - 员工 API
// ==========================================
// 职责: 员工查询、创建、部分更新、删除
// 校验: 邮箱与薪资规则同 CSV 行校验
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::company::CompanyId;
use crate::domain::employee::{Employee, EmployeeId, EmployeeUpdate, NewEmployee};
use crate::importer::is_valid_email;
use crate::repository::{CompanyRepository, EmployeeRepository};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// 新建员工请求（四个字段均必填）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateEmployeeRequest {
    pub company_id: Option<CompanyId>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub salary: Option<f64>,
}

/// 修改员工请求（仅更新提供的字段）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEmployeeRequest {
    pub company_id: Option<CompanyId>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub salary: Option<f64>,
}

fn employee_not_found() -> ApiError {
    ApiError::NotFound("Employee not found".to_string())
}

fn check_full_name(full_name: &str) -> ApiResult<String> {
    let full_name = full_name.trim();
    if full_name.is_empty() {
        return Err(ApiError::InvalidInput("full_name must not be blank".to_string()));
    }
    Ok(full_name.to_string())
}

fn check_email(email: &str) -> ApiResult<String> {
    let email = email.trim();
    if !is_valid_email(email) {
        return Err(ApiError::InvalidInput(format!("Invalid email format: {}", email)));
    }
    Ok(email.to_string())
}

fn check_salary(salary: f64) -> ApiResult<f64> {
    if !salary.is_finite() || salary < 0.0 {
        return Err(ApiError::InvalidInput(format!("Invalid salary: {}", salary)));
    }
    Ok(if salary == 0.0 { 0.0 } else { salary })
}

// ==========================================
// EmployeeApi - 员工 API
// ==========================================
pub struct EmployeeApi {
    employee_repo: Arc<EmployeeRepository>,
    company_repo: Arc<CompanyRepository>,
}

impl EmployeeApi {
    pub fn new(employee_repo: Arc<EmployeeRepository>, company_repo: Arc<CompanyRepository>) -> Self {
        Self {
            employee_repo,
            company_repo,
        }
    }

    /// 员工列表（按 id 升序）
    pub fn list_employees(&self) -> ApiResult<Vec<Employee>> {
        Ok(self.employee_repo.list()?)
    }

    /// 某公司下的员工（公司不存在时 404）
    pub fn list_company_employees(&self, company_id: CompanyId) -> ApiResult<Vec<Employee>> {
        if self.company_repo.find_by_id(company_id)?.is_none() {
            return Err(ApiError::NotFound("Company not found".to_string()));
        }
        Ok(self.employee_repo.list_by_company(company_id)?)
    }

    pub fn get_employee(&self, id: EmployeeId) -> ApiResult<Employee> {
        self.employee_repo
            .find_by_id(id)?
            .ok_or_else(employee_not_found)
    }

    /// 新建员工
    pub fn create_employee(&self, request: CreateEmployeeRequest) -> ApiResult<Employee> {
        let (company_id, full_name, email, salary) = match request {
            CreateEmployeeRequest {
                company_id: Some(company_id),
                full_name: Some(full_name),
                email: Some(email),
                salary: Some(salary),
            } => (company_id, full_name, email, salary),
            _ => {
                return Err(ApiError::MissingFields(
                    "company_id, full_name, email, salary".to_string(),
                ))
            }
        };

        let employee = NewEmployee {
            company_id,
            full_name: check_full_name(&full_name)?,
            email: check_email(&email)?,
            salary: check_salary(salary)?,
        };
        self.ensure_company(employee.company_id)?;

        let id = self.employee_repo.create(&employee)?;
        info!(employee_id = id, company_id, "员工已创建");

        self.get_employee(id)
    }

    /// 部分更新员工
    pub fn update_employee(&self, id: EmployeeId, request: UpdateEmployeeRequest) -> ApiResult<Employee> {
        let update = EmployeeUpdate {
            company_id: request.company_id,
            full_name: request.full_name.as_deref().map(check_full_name).transpose()?,
            email: request.email.as_deref().map(check_email).transpose()?,
            salary: request.salary.map(check_salary).transpose()?,
        };
        if let Some(company_id) = update.company_id {
            self.ensure_company(company_id)?;
        }

        if !self.employee_repo.update(id, &update)? {
            return Err(employee_not_found());
        }
        if !update.is_empty() {
            info!(employee_id = id, "员工已更新");
        }

        self.get_employee(id)
    }

    pub fn delete_employee(&self, id: EmployeeId) -> ApiResult<()> {
        if !self.employee_repo.delete(id)? {
            return Err(employee_not_found());
        }
        info!(employee_id = id, "员工已删除");
        Ok(())
    }

    fn ensure_company(&self, company_id: CompanyId) -> ApiResult<()> {
        match self.company_repo.find_by_id(company_id)? {
            Some(_) => Ok(()),
            None => Err(ApiError::InvalidInput(format!(
                "Unknown company_id: {}",
                company_id
            ))),
        }
    }
}
