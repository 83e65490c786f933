// ==========================================
// 工资档案管理 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约束: 唯一约束冲突按 SQLite 扩展错误码 + 执行语句归类，
//       上层按错误种类分支，不解析错误消息文本
// ==========================================

use rusqlite::ffi;
use rusqlite::ErrorCode;
use thiserror::Error;

/// 唯一约束标识
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueKey {
    /// companies.name
    CompanyName,
    /// employees.email
    EmployeeEmail,
}

impl UniqueKey {
    /// 对应的数据库约束名
    pub fn constraint_name(&self) -> &'static str {
        match self {
            UniqueKey::CompanyName => "uq_companies_name",
            UniqueKey::EmployeeEmail => "uq_employees_email",
        }
    }
}

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 约束错误 =====
    #[error("Duplicate key ({}): {value}", .key.constraint_name())]
    DuplicateKey { key: UniqueKey, value: String },

    /// 尚未归属到具体约束的唯一冲突（由调用方通过 with_unique_key 细化）
    #[error("Unique constraint violated: {0}")]
    UniqueConstraintViolation(String),

    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error("Check constraint violated: {0}")]
    CheckConstraintViolation(String),

    // ===== 数据库错误 =====
    #[error("{entity} not found: id={id}")]
    NotFound { entity: String, id: String },

    #[error("Database connection failed: {0}")]
    DatabaseConnectionError(String),

    #[error("Database lock failed: {0}")]
    LockError(String),

    #[error("{0}")]
    DatabaseQueryError(String),

    // ===== 通用错误 =====
    #[error("Internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RepositoryError {
    /// 将通用唯一冲突细化为具体约束
    ///
    /// 调用方知道自己执行的语句只可能触发哪一个唯一约束
    pub fn with_unique_key(self, key: UniqueKey, value: &str) -> Self {
        match self {
            RepositoryError::UniqueConstraintViolation(_) => RepositoryError::DuplicateKey {
                key,
                value: value.to_string(),
            },
            other => other,
        }
    }

    /// 是否为指定约束的重复键
    pub fn is_duplicate_key(&self, expected: UniqueKey) -> bool {
        matches!(self, RepositoryError::DuplicateKey { key, .. } if *key == expected)
    }

    /// 是否为存储不可用（连接/锁层面的失败）
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            RepositoryError::DatabaseConnectionError(_) | RepositoryError::LockError(_)
        )
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(failure, msg) => {
                let detail = msg.unwrap_or_else(|| failure.to_string());
                match failure.extended_code {
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                        RepositoryError::UniqueConstraintViolation(detail)
                    }
                    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => RepositoryError::ForeignKeyViolation(detail),
                    ffi::SQLITE_CONSTRAINT_CHECK => RepositoryError::CheckConstraintViolation(detail),
                    _ if matches!(
                        failure.code,
                        ErrorCode::CannotOpen | ErrorCode::NotADatabase | ErrorCode::SystemIoFailure
                    ) =>
                    {
                        RepositoryError::DatabaseConnectionError(detail)
                    }
                    _ => RepositoryError::DatabaseQueryError(detail),
                }
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
