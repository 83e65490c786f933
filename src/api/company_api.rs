// ==========================================
// 工资档案管理 - 公司 API
// ==========================================
// 职责: 公司查询（含员工数与平均薪资）、创建、改名、删除
// 约束: 仍有员工的公司不可删除
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::company::{Company, CompanyId, CompanySummary};
use crate::repository::error::RepositoryError;
use crate::repository::CompanyRepository;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// 新建公司请求
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCompanyRequest {
    pub name: Option<String>,
}

/// 修改公司请求（name 缺省表示不修改）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCompanyRequest {
    pub name: Option<String>,
}

fn company_not_found() -> ApiError {
    ApiError::NotFound("Company not found".to_string())
}

/// 公司名: trim 后非空
fn normalize_name(name: &str) -> ApiResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::InvalidInput("name must not be blank".to_string()));
    }
    Ok(name.to_string())
}

// ==========================================
// CompanyApi - 公司 API
// ==========================================
pub struct CompanyApi {
    company_repo: Arc<CompanyRepository>,
}

impl CompanyApi {
    pub fn new(company_repo: Arc<CompanyRepository>) -> Self {
        Self { company_repo }
    }

    /// 公司列表（含员工数与平均薪资）
    pub fn list_companies(&self) -> ApiResult<Vec<CompanySummary>> {
        Ok(self.company_repo.list_with_stats()?)
    }

    /// 单个公司（含员工数与平均薪资）
    pub fn get_company(&self, id: CompanyId) -> ApiResult<CompanySummary> {
        self.company_repo
            .find_with_stats(id)?
            .ok_or_else(company_not_found)
    }

    /// 新建公司
    pub fn create_company(&self, request: CreateCompanyRequest) -> ApiResult<Company> {
        let name = request
            .name
            .ok_or_else(|| ApiError::MissingField("name".to_string()))?;
        let name = normalize_name(&name)?;

        let id = self.company_repo.create(&name)?;
        info!(company_id = id, company = %name, "公司已创建");

        self.company_repo.find_by_id(id)?.ok_or_else(company_not_found)
    }

    /// 修改公司名称
    pub fn update_company(&self, id: CompanyId, request: UpdateCompanyRequest) -> ApiResult<Company> {
        if let Some(name) = request.name {
            let name = normalize_name(&name)?;
            if !self.company_repo.update_name(id, &name)? {
                return Err(company_not_found());
            }
            info!(company_id = id, company = %name, "公司已改名");
        }

        self.company_repo.find_by_id(id)?.ok_or_else(company_not_found)
    }

    /// 删除公司
    ///
    /// 仍有员工时返回 Conflict
    pub fn delete_company(&self, id: CompanyId) -> ApiResult<()> {
        match self.company_repo.delete(id) {
            Ok(true) => {
                info!(company_id = id, "公司已删除");
                Ok(())
            }
            Ok(false) => Err(company_not_found()),
            Err(RepositoryError::ForeignKeyViolation(_)) => Err(ApiError::Conflict(
                "Company has employees and cannot be deleted".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, init_schema};
    use crate::domain::employee::NewEmployee;
    use crate::repository::EmployeeRepository;
    use rusqlite::Connection;
    use std::sync::Mutex;

    fn setup() -> (CompanyApi, EmployeeRepository) {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));
        let api = CompanyApi::new(Arc::new(CompanyRepository::from_connection(conn.clone())));
        (api, EmployeeRepository::from_connection(conn))
    }

    fn create(api: &CompanyApi, name: &str) -> Company {
        api.create_company(CreateCompanyRequest {
            name: Some(name.to_string()),
        })
        .unwrap()
    }

    #[test]
    fn test_create_and_get_with_stats() {
        let (api, employees) = setup();
        let company = create(&api, "  BingBong LLC ");
        assert_eq!(company.name, "BingBong LLC");

        for (email, salary) in [("a@bingbong.com", 40000.0), ("b@bingbong.com", 60000.0)] {
            employees
                .create(&NewEmployee {
                    company_id: company.id,
                    full_name: "Someone".to_string(),
                    email: email.to_string(),
                    salary,
                })
                .unwrap();
        }

        let summary = api.get_company(company.id).unwrap();
        assert_eq!(summary.employee_count, 2);
        assert_eq!(summary.average_salary, 50000.0);
    }

    #[test]
    fn test_create_validation() {
        let (api, _) = setup();

        let err = api.create_company(CreateCompanyRequest::default()).unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: name");

        let err = api
            .create_company(CreateCompanyRequest {
                name: Some("   ".to_string()),
            })
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_duplicate_name_is_conflict() {
        let (api, _) = setup();
        create(&api, "Acme");

        let err = api
            .create_company(CreateCompanyRequest {
                name: Some("Acme".to_string()),
            })
            .unwrap_err();

        assert_eq!(err.status_code(), 409);
    }

    #[test]
    fn test_update_company() {
        let (api, _) = setup();
        let company = create(&api, "Test Company Original");

        let updated = api
            .update_company(
                company.id,
                UpdateCompanyRequest {
                    name: Some("Test Company Updated".to_string()),
                },
            )
            .unwrap();
        assert_eq!(updated.id, company.id);
        assert_eq!(updated.name, "Test Company Updated");

        // 无字段更新时返回当前记录
        let same = api
            .update_company(company.id, UpdateCompanyRequest::default())
            .unwrap();
        assert_eq!(same.name, "Test Company Updated");

        let err = api
            .update_company(9999, UpdateCompanyRequest::default())
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_delete_company() {
        let (api, employees) = setup();
        let empty = create(&api, "Empty Co");
        let staffed = create(&api, "Staffed Co");
        employees
            .create(&NewEmployee {
                company_id: staffed.id,
                full_name: "Worker".to_string(),
                email: "worker@staffed.com".to_string(),
                salary: 1.0,
            })
            .unwrap();

        api.delete_company(empty.id).unwrap();
        assert_eq!(api.get_company(empty.id).unwrap_err().status_code(), 404);
        assert_eq!(api.delete_company(empty.id).unwrap_err().status_code(), 404);

        let err = api.delete_company(staffed.id).unwrap_err();
        assert_eq!(err.status_code(), 409);
        assert!(api.get_company(staffed.id).is_ok());
    }
}
