// ==========================================
// 工资档案管理 - 导入层
// ==========================================
// 职责: CSV 文本批量导入公司与员工
// 组成: 文本解析 → 表头校验 → 行校验 → 公司解析 → 导入编排
// ==========================================

// 模块声明
pub mod company_resolver;
pub mod csv_importer;
pub mod csv_parser;
pub mod error;
pub mod header_validator;
pub mod row_validator;

#[cfg(test)]
pub(crate) mod mock_repo;

// 重导出核心类型
pub use company_resolver::CompanyResolver;
pub use csv_importer::CsvImporter;
pub use csv_parser::{CsvParser, CsvRow};
pub use error::{ImportError, ImportResult, RowError};
pub use header_validator::{missing_headers, validate_csv_headers, REQUIRED_HEADERS};
pub use row_validator::{is_valid_email, parse_salary, validate_row};
