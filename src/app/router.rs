// ==========================================
// 工资档案管理 - 请求路由
// ==========================================
// 职责: (method, path, body) → API 调用 → JSON 信封
// 信封:
// - 成功: { success: true, data } / { success: true, message }
// - 失败: { success: false, code, message }
// 约束: API 调用均为同步 SQLite 访问，放入 spawn_blocking 执行
// ==========================================

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::{
    ApiError, ApiResult, CreateCompanyRequest, CreateEmployeeRequest, CsvUploadRequest,
    UpdateCompanyRequest, UpdateEmployeeRequest,
};
use crate::app::state::AppState;
use crate::perf::PerfGuard;

/// 路由请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiRequest {
    /// GET / POST / PUT / DELETE（大小写不敏感）
    pub method: String,
    /// 如 /employees/3，可带查询串
    pub path: String,
    /// JSON 请求体（可选）
    #[serde(default)]
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: &str, path: &str, body: Option<Value>) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
            body,
        }
    }
}

/// 路由响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// HTTP 状态码
    pub status: u16,
    /// JSON 信封
    pub body: Value,
}

impl ApiResponse {
    fn data(status: u16, data: Value) -> Self {
        Self {
            status,
            body: json!({ "success": true, "data": data }),
        }
    }

    fn message(message: &str) -> Self {
        Self {
            status: 200,
            body: json!({ "success": true, "message": message }),
        }
    }

    fn error(status: u16, code: &str, message: &str) -> Self {
        Self {
            status,
            body: json!({ "success": false, "code": code, "message": message }),
        }
    }

    fn no_content() -> Self {
        Self {
            status: 204,
            body: Value::Null,
        }
    }

    fn route_not_found() -> Self {
        Self::error(404, "ROUTE_NOT_FOUND", "Route not found")
    }
}

/// 将ApiError转换为失败信封
fn map_api_error(err: ApiError) -> ApiResponse {
    let status = err.status_code();
    if status >= 500 {
        tracing::error!(code = err.code(), "请求失败: {}", err);
    } else {
        tracing::debug!(code = err.code(), "请求被拒绝: {}", err);
    }
    ApiResponse::error(status, err.code(), &err.to_string())
}

// ==========================================
// Route - 路由表
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Preflight,
    ListEmployees,
    GetEmployee(i64),
    CreateEmployee,
    UpdateEmployee(i64),
    DeleteEmployee(i64),
    ListCompanies,
    GetCompany(i64),
    ListCompanyEmployees(i64),
    CreateCompany,
    UpdateCompany(i64),
    DeleteCompany(i64),
    UploadCsv,
}

impl Route {
    fn parse(method: &str, path: &str) -> Option<Self> {
        let method = method.trim().to_ascii_uppercase();
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();

        if method == "OPTIONS" {
            return Some(Route::Preflight);
        }

        let route = match (method.as_str(), parts.as_slice()) {
            ("GET", ["employees"]) => Route::ListEmployees,
            ("POST", ["employees"]) => Route::CreateEmployee,
            ("GET", ["employees", id]) => Route::GetEmployee(id.parse().ok()?),
            ("PUT", ["employees", id]) => Route::UpdateEmployee(id.parse().ok()?),
            ("DELETE", ["employees", id]) => Route::DeleteEmployee(id.parse().ok()?),
            ("GET", ["companies"]) => Route::ListCompanies,
            ("POST", ["companies"]) => Route::CreateCompany,
            ("GET", ["companies", id]) => Route::GetCompany(id.parse().ok()?),
            ("GET", ["companies", id, "employees"]) => {
                Route::ListCompanyEmployees(id.parse().ok()?)
            }
            ("PUT", ["companies", id]) => Route::UpdateCompany(id.parse().ok()?),
            ("DELETE", ["companies", id]) => Route::DeleteCompany(id.parse().ok()?),
            ("POST", ["csv", "upload"]) => Route::UploadCsv,
            _ => return None,
        };
        Some(route)
    }

    fn op_name(&self) -> &'static str {
        match self {
            Route::Preflight => "router.preflight",
            Route::ListEmployees => "api.list_employees",
            Route::GetEmployee(_) => "api.get_employee",
            Route::CreateEmployee => "api.create_employee",
            Route::UpdateEmployee(_) => "api.update_employee",
            Route::DeleteEmployee(_) => "api.delete_employee",
            Route::ListCompanies => "api.list_companies",
            Route::GetCompany(_) => "api.get_company",
            Route::ListCompanyEmployees(_) => "api.list_company_employees",
            Route::CreateCompany => "api.create_company",
            Route::UpdateCompany(_) => "api.update_company",
            Route::DeleteCompany(_) => "api.delete_company",
            Route::UploadCsv => "api.upload_csv",
        }
    }
}

/// 解析请求体；缺省或 null 视为空对象
fn parse_body<T: DeserializeOwned + Default>(body: Option<Value>) -> ApiResult<T> {
    match body {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => serde_json::from_value(value)
            .map_err(|e| ApiError::InvalidInput(format!("Invalid JSON body: {}", e))),
    }
}

fn to_data<T: Serialize>(status: u16, value: &T) -> ApiResult<ApiResponse> {
    let data = serde_json::to_value(value)
        .map_err(|e| ApiError::InternalError(format!("响应序列化失败: {}", e)))?;
    Ok(ApiResponse::data(status, data))
}

// ==========================================
// Router
// ==========================================
pub struct Router {
    state: Arc<AppState>,
}

impl Router {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// 异步分发（阻塞的数据库访问放入 spawn_blocking）
    pub async fn dispatch(&self, request: ApiRequest) -> ApiResponse {
        let state = Arc::clone(&self.state);
        match tokio::task::spawn_blocking(move || handle(&state, request)).await {
            Ok(response) => response,
            Err(e) => map_api_error(ApiError::InternalError(format!("请求处理任务失败: {}", e))),
        }
    }
}

fn handle(state: &AppState, request: ApiRequest) -> ApiResponse {
    let Some(route) = Route::parse(&request.method, &request.path) else {
        tracing::debug!(method = %request.method, path = %request.path, "未匹配路由");
        return ApiResponse::route_not_found();
    };

    let _perf = PerfGuard::new(route.op_name());
    match execute(state, route, request.body) {
        Ok(response) => response,
        Err(err) => map_api_error(err),
    }
}

fn execute(state: &AppState, route: Route, body: Option<Value>) -> ApiResult<ApiResponse> {
    match route {
        Route::Preflight => Ok(ApiResponse::no_content()),

        // ===== 员工 =====
        Route::ListEmployees => to_data(200, &state.employee_api.list_employees()?),
        Route::GetEmployee(id) => to_data(200, &state.employee_api.get_employee(id)?),
        Route::CreateEmployee => {
            let request: CreateEmployeeRequest = parse_body(body)?;
            to_data(201, &state.employee_api.create_employee(request)?)
        }
        Route::UpdateEmployee(id) => {
            let request: UpdateEmployeeRequest = parse_body(body)?;
            to_data(200, &state.employee_api.update_employee(id, request)?)
        }
        Route::DeleteEmployee(id) => {
            state.employee_api.delete_employee(id)?;
            Ok(ApiResponse::message("Employee deleted successfully"))
        }

        // ===== 公司 =====
        Route::ListCompanies => to_data(200, &state.company_api.list_companies()?),
        Route::GetCompany(id) => to_data(200, &state.company_api.get_company(id)?),
        Route::ListCompanyEmployees(id) => {
            to_data(200, &state.employee_api.list_company_employees(id)?)
        }
        Route::CreateCompany => {
            let request: CreateCompanyRequest = parse_body(body)?;
            to_data(201, &state.company_api.create_company(request)?)
        }
        Route::UpdateCompany(id) => {
            let request: UpdateCompanyRequest = parse_body(body)?;
            to_data(200, &state.company_api.update_company(id, request)?)
        }
        Route::DeleteCompany(id) => {
            state.company_api.delete_company(id)?;
            Ok(ApiResponse::message("Company deleted successfully"))
        }

        // ===== CSV 导入 =====
        Route::UploadCsv => {
            let request: CsvUploadRequest = parse_body(body)?;
            to_data(200, &state.import_api.upload_csv(request)?)
        }
    }
}
