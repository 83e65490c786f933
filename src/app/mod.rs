// ==========================================
// 工资档案管理 - 应用层
// ==========================================
// 职责: 组装共享状态，按路由分发请求
// ==========================================

pub mod router;
pub mod state;

// 重导出
pub use router::{ApiRequest, ApiResponse, Router};
pub use state::{get_default_db_path, AppState};
