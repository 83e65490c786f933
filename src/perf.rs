// ==========================================
// 工资档案管理 - 性能统计
// ==========================================
// PerfGuard: 作用域耗时 + 作用域内执行的 SQL 语句数 / 慢 SQL 数
// SQL 计数来自 rusqlite trace/profile 回调，按线程累计
// 开关:
// - PAYROLL_PERF_SQL=1|0   强制开启/关闭（默认 Debug 开、Release 关）
// - PAYROLL_SLOW_SQL_MS=N  慢 SQL 阈值（默认 Debug 50ms、Release 200ms）
// ==========================================

use rusqlite::Connection;
use std::cell::Cell;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

const SLOW_SQL_PREVIEW_CHARS: usize = 420;

static SQL_TRACING: AtomicBool = AtomicBool::new(false);
static SLOW_SQL_MS: AtomicU64 = AtomicU64::new(0);

/// 当前线程的计数器
#[derive(Default)]
struct SqlCounters {
    /// 活跃 Guard 数（为 0 时不计数）
    active_guards: Cell<u32>,
    statements: Cell<u64>,
    slow_statements: Cell<u64>,
}

thread_local! {
    static COUNTERS: SqlCounters = SqlCounters::default();
}

fn bump(cell: &Cell<u64>) {
    cell.set(cell.get().saturating_add(1));
}

fn env_flag(name: &str) -> Option<bool> {
    let raw = std::env::var(name).ok()?;
    Some(matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    ))
}

/// 慢 SQL 日志用的单行预览（按字符截断）
fn sql_preview(sql: &str) -> String {
    let flat = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(SLOW_SQL_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}…", &flat[..cut]),
        None => flat,
    }
}

/// 在连接上安装 SQL 计数与慢查询日志
pub fn install_sqlite_tracing(conn: &mut Connection) {
    let enabled = env_flag("PAYROLL_PERF_SQL").unwrap_or(cfg!(debug_assertions));
    SQL_TRACING.store(enabled, Ordering::Relaxed);

    if !enabled {
        conn.trace(None);
        conn.profile(None);
        return;
    }

    let default_ms = if cfg!(debug_assertions) { 50 } else { 200 };
    let slow_ms = std::env::var("PAYROLL_SLOW_SQL_MS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default_ms);
    SLOW_SQL_MS.store(slow_ms, Ordering::Relaxed);

    conn.trace(Some(on_statement));
    conn.profile(Some(on_statement_done));
}

fn on_statement(_sql: &str) {
    if !SQL_TRACING.load(Ordering::Relaxed) {
        return;
    }
    COUNTERS.with(|c| {
        if c.active_guards.get() > 0 {
            bump(&c.statements);
        }
    });
}

fn on_statement_done(sql: &str, elapsed: Duration) {
    if !SQL_TRACING.load(Ordering::Relaxed) {
        return;
    }
    let threshold = SLOW_SQL_MS.load(Ordering::Relaxed);
    let ms = elapsed.as_millis() as u64;
    if threshold == 0 || ms < threshold {
        return;
    }

    tracing::warn!(target: "slow_sql", duration_ms = ms, sql = %sql_preview(sql), "slow sql");
    COUNTERS.with(|c| {
        if c.active_guards.get() > 0 {
            bump(&c.slow_statements);
        }
    });
}

/// 作用域性能统计，Drop 时输出一条 perf 日志
///
/// 必须在执行 SQL 的同一线程上创建（spawn_blocking 闭包内）
pub struct PerfGuard {
    op: &'static str,
    started: Instant,
    statements_at_start: u64,
    slow_at_start: u64,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        let (statements_at_start, slow_at_start) = COUNTERS.with(|c| {
            c.active_guards.set(c.active_guards.get().saturating_add(1));
            (c.statements.get(), c.slow_statements.get())
        });
        Self {
            op,
            started: Instant::now(),
            statements_at_start,
            slow_at_start,
        }
    }

    /// 自创建以来本线程执行的 SQL 语句数
    pub fn sql_count(&self) -> u64 {
        COUNTERS.with(|c| c.statements.get().saturating_sub(self.statements_at_start))
    }

    fn slow_sql_count(&self) -> u64 {
        COUNTERS.with(|c| c.slow_statements.get().saturating_sub(self.slow_at_start))
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            sql_count = self.sql_count(),
            slow_sql_count = self.slow_sql_count(),
            "done"
        );
        COUNTERS.with(|c| c.active_guards.set(c.active_guards.get().saturating_sub(1)));
    }
}
