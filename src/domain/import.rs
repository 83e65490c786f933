// ==========================================
// 工资档案管理 - 导入领域模型
// ==========================================
// 用途: CSV 批量导入的校验结果与导入报告
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// ValidatedRow - 通过行校验的数据
// ==========================================
// 所有文本字段已 trim，salary 已解析
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRow {
    pub company_name: String,
    pub full_name: String,
    pub email: String,
    pub salary: f64,
}

// ==========================================
// ImportReport - 导入报告
// ==========================================
// 每次导入调用生成一次，不落库
// 不变量: employees_imported + employees_failed == total_rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    /// 恒为 true：报告用于逐行明细，不表达批次成败
    pub success: bool,
    /// 解析得到的数据行数（不含空行）
    pub total_rows: usize,
    pub companies_created: usize,
    pub employees_imported: usize,
    pub employees_failed: usize,
    /// 按文件顺序排列，形如 "Row 3: Invalid salary: -5"
    pub errors: Vec<String>,
}

impl ImportReport {
    pub fn new(total_rows: usize) -> Self {
        Self {
            success: true,
            total_rows,
            companies_created: 0,
            employees_imported: 0,
            employees_failed: 0,
            errors: Vec::new(),
        }
    }

    /// 记录一行失败
    pub fn record_failure(&mut self, row_number: usize, message: impl std::fmt::Display) {
        self.employees_failed += 1;
        self.errors.push(format!("Row {}: {}", row_number, message));
    }

    /// 记录一行成功
    pub fn record_imported(&mut self) {
        self.employees_imported += 1;
    }
}
