// ==========================================
// 工资档案管理 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享连接与API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{CompanyApi, EmployeeApi, ImportApi};
use crate::config::config_manager::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection, read_schema_version};
use crate::repository::{CompanyRepository, EmployeeRepository, PayrollImportRepositoryImpl};

/// 应用状态
///
/// 所有仓储共享同一个数据库连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 公司API
    pub company_api: Arc<CompanyApi>,

    /// 员工API
    pub employee_api: Arc<EmployeeApi>,

    /// CSV 导入API
    pub import_api: Arc<ImportApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并安装 SQL 统计
    /// 2. 建表（幂等）
    /// 3. 创建所有API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let mut conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        crate::perf::install_sqlite_tracing(&mut conn);
        init_schema(&conn).map_err(|e| format!("数据库建表失败: {}", e))?;

        match read_schema_version(&conn) {
            Ok(version) => tracing::debug!(schema_version = ?version, "schema 已就绪"),
            Err(e) => tracing::warn!("读取 schema_version 失败: {}", e),
        }

        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let company_repo = Arc::new(CompanyRepository::from_connection(conn.clone()));
        let employee_repo = Arc::new(EmployeeRepository::from_connection(conn.clone()));
        let import_repo = Arc::new(PayrollImportRepositoryImpl::from_connection(conn.clone()));
        let config_manager = Arc::new(ConfigManager::from_connection(conn));

        // ==========================================
        // 初始化API层
        // ==========================================
        let company_api = Arc::new(CompanyApi::new(company_repo.clone()));
        let employee_api = Arc::new(EmployeeApi::new(employee_repo, company_repo));
        let import_api = Arc::new(ImportApi::new(import_repo, config_manager.clone()));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            company_api,
            employee_api,
            import_api,
            config_manager,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: PAYROLL_DB_PATH 环境变量 → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("PAYROLL_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./payroll.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("payroll-records");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("payroll.db");
        }
    }

    path.to_string_lossy().to_string()
}
