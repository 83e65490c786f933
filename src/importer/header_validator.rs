// ==========================================
// 工资档案管理 - CSV 表头校验
// ==========================================
// 规则: 必需列集合须为表头列的子集
// - 与顺序无关
// - 大小写敏感的精确匹配，不接受同义词
// ==========================================

use crate::importer::csv_parser::CsvParser;

pub const COMPANY_NAME: &str = "Company Name";
pub const EMPLOYEE_NAME: &str = "Employee Name";
pub const EMAIL_ADDRESS: &str = "Email Address";
pub const SALARY: &str = "Salary";

/// 必需表头（按约定顺序，用于提示信息）
pub const REQUIRED_HEADERS: [&str; 4] = [COMPANY_NAME, EMPLOYEE_NAME, EMAIL_ADDRESS, SALARY];

/// 列出缺失的必需表头
pub fn missing_headers(csv_content: &str) -> Vec<&'static str> {
    let headers = CsvParser.parse_headers(csv_content);
    REQUIRED_HEADERS
        .iter()
        .copied()
        .filter(|required| !headers.iter().any(|h| h == required))
        .collect()
}

/// 校验表头是否包含全部必需列
pub fn validate_csv_headers(csv_content: &str) -> bool {
    missing_headers(csv_content).is_empty()
}
