// ==========================================
// 工资档案管理 - 领域模型层
// ==========================================
// 职责: 定义公司、员工实体与导入报告
// 红线: 不含数据访问逻辑,不含导入流程逻辑
// ==========================================

pub mod company;
pub mod employee;
pub mod import;

// 重导出核心类型
pub use company::{Company, CompanyId, CompanySummary};
pub use employee::{Employee, EmployeeId, EmployeeUpdate, NewEmployee};
pub use import::{ImportReport, ValidatedRow};
