// ==========================================
// 工资档案管理 - 员工领域模型
// ==========================================
// 对齐: employees 表
// ==========================================

use crate::domain::company::CompanyId;
use serde::{Deserialize, Serialize};

/// 员工ID（由存储分配）
pub type EmployeeId = i64;

// ==========================================
// Employee - 员工
// ==========================================
// 约束:
// - company_id 必须指向已存在的公司
// - email 全局唯一
// - salary 非负
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub company_id: CompanyId,
    pub full_name: String,
    pub email: String,
    pub salary: f64,
    pub created_at: String,
    pub updated_at: String,
}

/// 新建员工参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub company_id: CompanyId,
    pub full_name: String,
    pub email: String,
    pub salary: f64,
}

/// 员工部分更新参数（None 表示不修改该字段）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    pub company_id: Option<CompanyId>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub salary: Option<f64>,
}

impl EmployeeUpdate {
    /// 是否没有任何待更新字段
    pub fn is_empty(&self) -> bool {
        self.company_id.is_none()
            && self.full_name.is_none()
            && self.email.is_none()
            && self.salary.is_none()
    }
}
