// ==========================================
// 工资档案管理 - 配置管理器
// ==========================================
// 职责: 运行时配置加载、查询、覆写
// 存储: config_kv 表 (key-value，scope_id='global')
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager（与仓储共享同一连接）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        tracing::info!(config_key = key, value, "配置已更新");
        Ok(())
    }

    /// 获取所有配置的快照（JSON格式，按 key 排序）
    pub fn get_config_snapshot(&self) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        serde_json::to_string(&config_map)
            .map_err(|e| RepositoryError::InternalError(format!("配置快照序列化失败: {}", e)))
    }

    // ===== 导入配置 =====

    /// 单次导入允许的最大数据行数
    ///
    /// # 返回
    /// - None: 不限制（未配置、配置为 0 或格式错误）
    /// - Some(n): 最多 n 行
    pub fn get_import_max_rows(&self) -> RepositoryResult<Option<usize>> {
        let value = match self.get_global_config_value(config_keys::IMPORT_MAX_ROWS)? {
            Some(v) => v,
            None => return Ok(None),
        };

        match value.trim().parse::<usize>() {
            Ok(0) => Ok(None),
            Ok(n) => Ok(Some(n)),
            Err(_) => {
                tracing::warn!(
                    config_key = config_keys::IMPORT_MAX_ROWS,
                    raw_value = %value,
                    "导入行数上限配置格式错误，按不限制处理"
                );
                Ok(None)
            }
        }
    }
}

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    /// 单次导入最大数据行数（0 表示不限制）
    pub const IMPORT_MAX_ROWS: &str = "import/max_rows";
}
