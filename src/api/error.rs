// ==========================================
// 工资档案管理 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换仓储/导入错误为面向调用方的错误消息
// 分类: 请求拒绝(400) / 资源不存在(404) / 冲突(409) / 存储不可用(503) / 内部错误(500)
// ==========================================

use crate::importer::error::ImportError;
use crate::repository::error::{RepositoryError, UniqueKey};
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 请求拒绝（不处理任何数据行）
    // ==========================================
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Missing required fields: {0}")]
    MissingFields(String),

    #[error("Invalid CSV headers. Required headers: Company Name, Employee Name, Email Address, Salary")]
    InvalidCsvHeaders,

    #[error("Too many rows: {rows} data rows exceed the configured limit of {limit}")]
    TooManyRows { rows: usize, limit: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ==========================================
    // 资源与约束错误
    // ==========================================
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("Internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::MissingField(_)
            | ApiError::MissingFields(_)
            | ApiError::InvalidCsvHeaders
            | ApiError::TooManyRows { .. }
            | ApiError::InvalidInput(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::StoreUnavailable(_) => 503,
            ApiError::DatabaseError(_) | ApiError::InternalError(_) | ApiError::Other(_) => 500,
        }
    }

    /// 机器可读的错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MissingField(_) | ApiError::MissingFields(_) => "MISSING_FIELD",
            ApiError::InvalidCsvHeaders => "INVALID_CSV_HEADERS",
            ApiError::TooManyRows { .. } => "TOO_MANY_ROWS",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            ApiError::DatabaseError(_) => "DATABASE_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
            ApiError::Other(_) => "OTHER_ERROR",
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateKey {
                key: UniqueKey::CompanyName,
                value,
            } => ApiError::Conflict(format!("Company name already exists: {}", value)),
            RepositoryError::DuplicateKey {
                key: UniqueKey::EmployeeEmail,
                value,
            } => ApiError::Conflict(format!("Email already exists: {}", value)),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::Conflict(format!("Unique constraint violated: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::Conflict(format!("Foreign key constraint violated: {}", msg))
            }
            RepositoryError::CheckConstraintViolation(msg) => {
                ApiError::InvalidInput(format!("Check constraint violated: {}", msg))
            }
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} not found: {}", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::StoreUnavailable(msg),
            RepositoryError::LockError(msg) => {
                ApiError::StoreUnavailable(format!("connection lock poisoned: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::StoreUnavailable(msg) => ApiError::StoreUnavailable(msg),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
