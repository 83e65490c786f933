// ==========================================
// 工资档案管理 - 公司解析器
// ==========================================
// 语义: get-or-create + 批内缓存
// - 缓存命中: 直接返回，不访问存储
// - 存储命中: 写入缓存，不计入 companies_created
// - 未命中: 创建公司，写入缓存，companies_created + 1
// 约束:
// - 缓存只存在于单次导入调用内（由编排器持有）
// - 并发导入抢建同名公司时，失败方的唯一约束错误原样返回，由调用方记为行失败
// ==========================================

use crate::domain::company::CompanyId;
use crate::repository::error::RepositoryResult;
use crate::repository::payroll_import_repo::PayrollImportRepository;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct CompanyResolver {
    cache: HashMap<String, CompanyId>,
    companies_created: usize,
}

impl CompanyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// 解析公司名为公司ID
    ///
    /// # 参数
    /// - name: 已 trim 的公司名（大小写敏感）
    pub fn resolve<R>(&mut self, repo: &R, name: &str) -> RepositoryResult<CompanyId>
    where
        R: PayrollImportRepository + ?Sized,
    {
        if let Some(&id) = self.cache.get(name) {
            return Ok(id);
        }

        let id = match repo.find_company_by_name(name)? {
            Some(id) => id,
            None => {
                let id = repo.create_company(name)?;
                self.companies_created += 1;
                tracing::debug!(company = name, company_id = id, "新建公司");
                id
            }
        };

        self.cache.insert(name.to_string(), id);
        Ok(id)
    }

    /// 本次导入新建的公司数
    pub fn companies_created(&self) -> usize {
        self.companies_created
    }

    /// 查询缓存（不访问存储）
    #[cfg(test)]
    pub(crate) fn cached(&self, name: &str) -> Option<CompanyId> {
        self.cache.get(name).copied()
    }
}
