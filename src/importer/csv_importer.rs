// ==========================================
// 工资档案管理 - CSV 导入编排器
// ==========================================
// 流程:
// 0. 探测存储（不可达 → 整批失败，不产生报告）
// 1. 解析数据行
// 2. 逐行（按文件顺序）: 行校验 → 公司解析 → 员工写入
// 3. 汇总报告（success 恒为 true）
// 红线:
// - 单行失败只影响该行，继续处理后续行
// - 行间无事务、无回滚
// - 公司解析缓存仅在本次调用内有效
// ==========================================

use crate::domain::employee::NewEmployee;
use crate::domain::import::ImportReport;
use crate::importer::company_resolver::CompanyResolver;
use crate::importer::csv_parser::{CsvParser, CsvRow};
use crate::importer::error::{ImportError, ImportResult, RowError};
use crate::importer::row_validator::validate_row;
use crate::repository::payroll_import_repo::PayrollImportRepository;
use crate::perf::PerfGuard;
use std::sync::Arc;
use uuid::Uuid;

// ==========================================
// CsvImporter
// ==========================================
pub struct CsvImporter<R: PayrollImportRepository + ?Sized> {
    repo: Arc<R>,
    parser: CsvParser,
}

impl<R: PayrollImportRepository + ?Sized> CsvImporter<R> {
    /// 创建导入器
    ///
    /// # 参数
    /// - repo: 存储协作者（连接已建立）
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            parser: CsvParser,
        }
    }

    /// 从 CSV 文本导入公司与员工
    ///
    /// 调用方须先通过表头校验（header_validator::validate_csv_headers）
    ///
    /// # 返回
    /// - Ok(ImportReport): 逐行明细（部分失败属于正常结果）
    /// - Err(StoreUnavailable): 存储不可达，任何行都无法处理
    pub fn import_from_csv(&self, csv_content: &str) -> ImportResult<ImportReport> {
        let import_id = Uuid::new_v4();
        let span = tracing::info_span!("csv_import", %import_id);
        let _enter = span.enter();
        let perf = PerfGuard::new("importer.csv_import");

        self.repo.ping().map_err(|e| {
            tracing::error!("存储不可用，终止导入: {}", e);
            ImportError::StoreUnavailable(e.to_string())
        })?;

        let rows = self.parser.parse_rows(csv_content);
        tracing::info!(total_rows = rows.len(), "开始导入");

        let mut report = ImportReport::new(rows.len());
        let mut resolver = CompanyResolver::new();

        for row in &rows {
            match self.import_row(&mut resolver, row) {
                Ok(()) => report.record_imported(),
                Err(err) => {
                    tracing::warn!(row = row.row_number, "行导入失败: {}", err);
                    report.record_failure(row.row_number, err);
                }
            }
        }

        report.companies_created = resolver.companies_created();

        tracing::info!(
            total_rows = report.total_rows,
            companies_created = report.companies_created,
            employees_imported = report.employees_imported,
            employees_failed = report.employees_failed,
            sql_count = perf.sql_count(),
            "导入完成"
        );

        Ok(report)
    }

    /// 处理单行：校验 → 解析公司 → 写入员工
    fn import_row(&self, resolver: &mut CompanyResolver, row: &CsvRow) -> Result<(), RowError> {
        let validated = validate_row(row)?;

        let company_id = resolver
            .resolve(&*self.repo, &validated.company_name)
            .map_err(|e| RowError::from_store(e, &validated.email))?;

        let employee = NewEmployee {
            company_id,
            full_name: validated.full_name,
            email: validated.email,
            salary: validated.salary,
        };

        self.repo
            .create_employee(&employee)
            .map_err(|e| RowError::from_store(e, &employee.email))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::mock_repo::MockPayrollRepo;

    const HEADER: &str = "Company Name,Employee Name,Email Address,Salary";

    fn import(repo: MockPayrollRepo, content: &str) -> (Arc<MockPayrollRepo>, ImportReport) {
        let repo = Arc::new(repo);
        let importer = CsvImporter::new(repo.clone());
        let report = importer.import_from_csv(content).unwrap();
        (repo, report)
    }

    #[test]
    fn test_same_company_created_once() {
        let content = format!(
            "{}\nAcme,John Doe,john@acme.com,50000\nAcme,Jane Doe,jane@acme.com,55000",
            HEADER
        );

        let (repo, report) = import(MockPayrollRepo::new(), &content);

        assert_eq!(report.total_rows, 2);
        assert_eq!(report.companies_created, 1);
        assert_eq!(report.employees_imported, 2);
        assert_eq!(report.employees_failed, 0);
        assert!(report.errors.is_empty());

        let employees = repo.employees();
        assert_eq!(employees[0].company_id, employees[1].company_id);
        assert_eq!(repo.create_count(), 1);
    }

    #[test]
    fn test_invalid_row_does_not_stop_batch() {
        let content = format!(
            "{}\nAcme,Valid User,valid@acme.com,45000\nAcme,Invalid Email,notanemail,-5000\nAcme,Third,third@acme.com,1",
            HEADER
        );

        let (repo, report) = import(MockPayrollRepo::new(), &content);

        assert_eq!(report.employees_imported, 2);
        assert_eq!(report.employees_failed, 1);
        assert_eq!(report.errors, vec!["Row 3: Invalid email format: notanemail"]);
        assert_eq!(repo.employees().len(), 2);
    }

    #[test]
    fn test_duplicate_email_in_batch() {
        let content = format!(
            "{}\nAcme,John Doe,john@acme.com,50000\nAcme,Jane Doe,john@acme.com,55000",
            HEADER
        );

        let (_, report) = import(MockPayrollRepo::new(), &content);

        assert_eq!(report.employees_imported, 1);
        assert_eq!(report.employees_failed, 1);
        assert_eq!(report.errors, vec!["Row 3: Duplicate email: john@acme.com"]);
    }

    #[test]
    fn test_generic_store_error_is_row_failure() {
        let content = format!(
            "{}\nAcme,John Doe,john@acme.com,50000\nAcme,Jane Doe,jane@acme.com,55000",
            HEADER
        );
        let repo = MockPayrollRepo::new().with_failing_email("john@acme.com");

        let (_, report) = import(repo, &content);

        assert_eq!(report.employees_imported, 1);
        assert_eq!(report.employees_failed, 1);
        assert!(report.errors[0].starts_with("Row 2: Database error: "));
    }

    #[test]
    fn test_lost_company_race_is_row_failure() {
        let content = format!(
            "{}\nNewCo,John Doe,john@newco.com,50000\nOther,Jane Doe,jane@other.com,55000",
            HEADER
        );
        let repo = MockPayrollRepo::new().with_racing_company("NewCo");

        let (_, report) = import(repo, &content);

        assert_eq!(report.companies_created, 1);
        assert_eq!(report.employees_imported, 1);
        assert_eq!(report.employees_failed, 1);
        assert!(report.errors[0].starts_with("Row 2: Database error: "));
    }

    #[test]
    fn test_all_rows_failing_still_reports_success() {
        // success 恒为 true，报告只承载逐行明细
        let content = format!("{}\nAcme,,x,1\n,,,\nAcme,John,bad,abc", HEADER);

        let (_, report) = import(MockPayrollRepo::new(), &content);

        assert!(report.success);
        assert_eq!(report.employees_imported, 0);
        assert_eq!(report.employees_failed, 3);
        assert_eq!(report.companies_created, 0);
    }

    #[test]
    fn test_rows_numbered_by_source_line() {
        let content = format!("{}\n\nAcme,John,john@acme.com,\n", HEADER);

        let (_, report) = import(MockPayrollRepo::new(), &content);

        assert_eq!(report.total_rows, 1);
        assert_eq!(report.errors, vec!["Row 3: Missing required fields"]);
    }

    #[test]
    fn test_store_unavailable_is_fatal() {
        let repo = Arc::new(MockPayrollRepo::new().unavailable());
        let importer = CsvImporter::new(repo.clone());

        let result = importer.import_from_csv(&format!("{}\nAcme,John,john@acme.com,1", HEADER));

        assert!(matches!(result, Err(ImportError::StoreUnavailable(_))));
        assert!(repo.employees().is_empty());
    }

    #[test]
    fn test_counts_always_balance() {
        let content = format!(
            "{}\nA,One,one@a.com,1\nA,Two,bad,2\nB,Three,three@b.com,-3\nB,Four,one@a.com,4\nC,Five,five@c.com,5",
            HEADER
        );

        let (_, report) = import(MockPayrollRepo::new(), &content);

        assert_eq!(report.total_rows, 5);
        assert_eq!(
            report.employees_imported + report.employees_failed,
            report.total_rows
        );
        assert_eq!(report.errors.len(), report.employees_failed);
    }
}
