// ==========================================
// 工资档案管理 - API 层
// ==========================================
// 职责: 提供业务 API 接口，供路由与命令行调用
// ==========================================

pub mod company_api;
pub mod employee_api;
pub mod error;
pub mod import_api;

// 重导出核心类型
pub use company_api::{CompanyApi, CreateCompanyRequest, UpdateCompanyRequest};
pub use employee_api::{CreateEmployeeRequest, EmployeeApi, UpdateEmployeeRequest};
pub use error::{ApiError, ApiResult};
pub use import_api::{CsvUploadRequest, ImportApi};
