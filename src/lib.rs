// ==========================================
// 工资档案管理 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 核心能力: 公司/员工档案 CRUD + CSV 批量导入（逐行对账）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与导入报告
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - CSV 解析、校验与编排
pub mod importer;

// 配置层 - 运行时配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 日志系统
pub mod logging;

// 性能统计（耗时/SQL 计数）
pub mod perf;

// API 层 - 业务接口
pub mod api;

// 应用层 - 共享状态与路由
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{Company, CompanySummary, Employee, ImportReport, NewEmployee};

// 导入
pub use importer::{validate_csv_headers, CsvImporter, ImportError, RowError};

// API
pub use api::{ApiError, CompanyApi, EmployeeApi, ImportApi};

// 应用
pub use app::{ApiRequest, ApiResponse, AppState, Router};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "工资档案管理";
