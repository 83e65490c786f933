// ==========================================
// 工资档案管理 - 公司领域模型
// ==========================================
// 对齐: companies 表
// ==========================================

use serde::{Deserialize, Serialize};

/// 公司ID（由存储分配，创建后不可变）
pub type CompanyId = i64;

// ==========================================
// Company - 公司
// ==========================================
// 约束: name 全局唯一，按大小写敏感的精确匹配解析
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

// ==========================================
// CompanySummary - 公司汇总（读模型）
// ==========================================
// 用途: 公司列表/详情，附带员工数与平均薪资
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySummary {
    pub id: CompanyId,
    pub name: String,
    pub employee_count: i64,
    pub average_salary: f64, // 无员工时为 0
}
