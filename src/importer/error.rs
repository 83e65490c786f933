// ==========================================
// 工资档案管理 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类:
// - ImportError: 整批失败（存储完全不可用），不产生报告
// - RowError: 单行失败，写入报告后继续处理下一行
// ==========================================

use crate::repository::error::{RepositoryError, UniqueKey};
use thiserror::Error;

/// 导入模块错误类型（整批级别）
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

/// 单行失败原因
///
/// Display 输出即报告中的错误文本（不含行号前缀）
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    #[error("Missing required fields")]
    MissingRequiredFields,

    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    #[error("Invalid salary: {0}")]
    InvalidSalary(String),

    #[error("Duplicate email: {0}")]
    DuplicateEmail(String),

    #[error("Database error: {0}")]
    Store(String),
}

impl RowError {
    /// 将存储错误归类为行失败
    ///
    /// 只按错误种类分支：邮箱唯一约束 → DuplicateEmail，其余 → Store
    pub fn from_store(err: RepositoryError, email: &str) -> Self {
        if err.is_duplicate_key(UniqueKey::EmployeeEmail) {
            RowError::DuplicateEmail(email.to_string())
        } else {
            RowError::Store(err.to_string())
        }
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
