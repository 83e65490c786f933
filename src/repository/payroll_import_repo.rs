// ==========================================
// 工资档案管理 - CSV 导入 Repository Trait
// ==========================================
// 职责: 定义导入核心所需的存储协作接口（不包含实现）
// 红线: Repository 不含业务规则，只做数据读写
// ==========================================

use crate::domain::company::CompanyId;
use crate::domain::employee::{EmployeeId, NewEmployee};
use crate::repository::error::RepositoryResult;

// ==========================================
// PayrollImportRepository Trait
// ==========================================
// 用途: 导入编排器访问存储的唯一入口
// 实现者: PayrollImportRepositoryImpl（使用 rusqlite）
pub trait PayrollImportRepository: Send + Sync {
    /// 探测存储是否可用
    ///
    /// 导入开始前调用一次；失败表示整批无法处理
    fn ping(&self) -> RepositoryResult<()>;

    /// 按名称精确查询公司ID
    ///
    /// # 返回
    /// - Ok(Some(id)): 已存在
    /// - Ok(None): 不存在
    fn find_company_by_name(&self, name: &str) -> RepositoryResult<Option<CompanyId>>;

    /// 创建公司
    ///
    /// # 返回
    /// - Err(DuplicateKey{CompanyName}): 同名公司已存在（并发导入竞争时的失败方）
    fn create_company(&self, name: &str) -> RepositoryResult<CompanyId>;

    /// 创建员工
    ///
    /// # 返回
    /// - Err(DuplicateKey{EmployeeEmail}): 邮箱重复
    /// - Err(ForeignKeyViolation): company_id 无效
    fn create_employee(&self, employee: &NewEmployee) -> RepositoryResult<EmployeeId>;
}
