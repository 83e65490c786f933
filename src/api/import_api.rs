// ==========================================
// 工资档案管理 - CSV 导入 API
// ==========================================
// 职责: 请求级校验后调用导入编排器
// 顺序: csv_content 存在 → 表头校验 → 行数上限 → 导入
// 请求级拒绝不处理任何数据行，也不产生报告
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::import::ImportReport;
use crate::importer::{missing_headers, validate_csv_headers, CsvImporter, CsvParser};
use crate::repository::PayrollImportRepository;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// CSV 上传请求
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CsvUploadRequest {
    /// CSV 文本（首行为表头）
    pub csv_content: Option<String>,
}

/// 导入API
pub struct ImportApi {
    repo: Arc<dyn PayrollImportRepository>,
    config_manager: Arc<ConfigManager>,
}

impl ImportApi {
    /// 创建新的ImportApi实例
    pub fn new(repo: Arc<dyn PayrollImportRepository>, config_manager: Arc<ConfigManager>) -> Self {
        Self {
            repo,
            config_manager,
        }
    }

    /// 上传并导入 CSV
    ///
    /// # 返回
    /// - Ok(ImportReport): 导入报告（部分行失败仍为 Ok）
    /// - Err(MissingField / InvalidCsvHeaders / TooManyRows): 请求级拒绝
    /// - Err(StoreUnavailable): 存储不可达
    pub fn upload_csv(&self, request: CsvUploadRequest) -> ApiResult<ImportReport> {
        let csv_content = request
            .csv_content
            .ok_or_else(|| ApiError::MissingField("csv_content".to_string()))?;

        if !validate_csv_headers(&csv_content) {
            let missing = missing_headers(&csv_content);
            tracing::info!(missing = ?missing, "CSV 表头缺少必需列，拒绝导入");
            return Err(ApiError::InvalidCsvHeaders);
        }

        if let Some(limit) = self.config_manager.get_import_max_rows()? {
            let rows = CsvParser.parse_rows(&csv_content).len();
            if rows > limit {
                tracing::info!(rows, limit, "CSV 行数超过上限，拒绝导入");
                return Err(ApiError::TooManyRows { rows, limit });
            }
        }

        let importer = CsvImporter::new(Arc::clone(&self.repo));
        let report = importer.import_from_csv(&csv_content)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::config_keys;
    use crate::db::{configure_sqlite_connection, init_schema};
    use crate::importer::mock_repo::MockPayrollRepo;
    use rusqlite::Connection;
    use std::sync::Mutex;

    const HEADER: &str = "Company Name,Employee Name,Email Address,Salary";

    fn setup(repo: MockPayrollRepo) -> (Arc<MockPayrollRepo>, Arc<ConfigManager>, ImportApi) {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        let config = Arc::new(ConfigManager::from_connection(Arc::new(Mutex::new(conn))));
        let repo = Arc::new(repo);
        let api = ImportApi::new(repo.clone(), config.clone());
        (repo, config, api)
    }

    fn request(content: &str) -> CsvUploadRequest {
        CsvUploadRequest {
            csv_content: Some(content.to_string()),
        }
    }

    #[test]
    fn test_missing_csv_content() {
        let (_, _, api) = setup(MockPayrollRepo::new());
        let err = api.upload_csv(CsvUploadRequest::default()).unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: csv_content");
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_invalid_headers_never_import() {
        let (repo, _, api) = setup(MockPayrollRepo::new());
        let err = api
            .upload_csv(request("Name,Email\nJohn Doe,john@csvtest.com"))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidCsvHeaders));
        assert_eq!(repo.lookup_count(), 0);
        assert!(repo.employees().is_empty());
    }

    #[test]
    fn test_row_limit_rejects_whole_batch() {
        let (repo, config, api) = setup(MockPayrollRepo::new());
        config
            .set_global_config_value(config_keys::IMPORT_MAX_ROWS, "1")
            .unwrap();

        let content = format!("{}\nA,One,one@a.com,1\nA,Two,two@a.com,2", HEADER);
        let err = api.upload_csv(request(&content)).unwrap_err();

        assert!(matches!(err, ApiError::TooManyRows { rows: 2, limit: 1 }));
        assert!(repo.employees().is_empty());
    }

    #[test]
    fn test_report_returned_verbatim() {
        let (_, _, api) = setup(MockPayrollRepo::new());
        let content = format!(
            "{}\nAcme,John Doe,john@acme.com,50000\nAcme,Jane Doe,jane@acme.com,",
            HEADER
        );

        let report = api.upload_csv(request(&content)).unwrap();

        assert!(report.success);
        assert_eq!(report.employees_imported, 1);
        assert_eq!(report.employees_failed, 1);
        assert_eq!(report.errors, vec!["Row 3: Missing required fields"]);
    }

    #[test]
    fn test_store_unavailable_maps_to_503() {
        let (_, _, api) = setup(MockPayrollRepo::new().unavailable());
        let content = format!("{}\nAcme,John Doe,john@acme.com,50000", HEADER);

        let err = api.upload_csv(request(&content)).unwrap_err();

        assert_eq!(err.status_code(), 503);
    }
}
