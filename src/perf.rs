// ==========================================
// 学校考勤管理系统 - 性能统计
// ==========================================
// PerfGuard 覆盖一次 API 调用: 耗时 + SQL 语句数 + 慢 SQL 数
// SQL 计数依赖 rusqlite profile 回调 (每条语句执行完成触发一次),按线程统计
// 注意: sqlite3_profile 会覆盖 sqlite3_trace 安装的回调,只能二选一
// ==========================================

use rusqlite::Connection;
use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// 慢 SQL 日志中 SQL 文本的最大字符数
const SLOW_SQL_PREVIEW_CHARS: usize = 400;

static SLOW_SQL_MS: AtomicU64 = AtomicU64::new(0);

// ==========================================
// 线程内计数器
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SqlCounters {
    statements: u64,
    slow: u64,
}

thread_local! {
    static GUARD_DEPTH: Cell<u32> = const { Cell::new(0) };
    static COUNTERS: Cell<SqlCounters> = const {
        Cell::new(SqlCounters { statements: 0, slow: 0 })
    };
}

fn guard_active() -> bool {
    GUARD_DEPTH.with(|d| d.get() > 0)
}

fn snapshot() -> SqlCounters {
    COUNTERS.with(|c| c.get())
}

fn bump(f: impl FnOnce(&mut SqlCounters)) {
    COUNTERS.with(|c| {
        let mut v = c.get();
        f(&mut v);
        c.set(v);
    });
}

// ==========================================
// 环境变量配置
// ==========================================

/// SQL 统计开关
///
/// - `ABSENTA_PERF_SQL`: 未设置时 Debug 构建开启, Release 构建关闭
/// - `ABSENTA_SLOW_SQL_MS`: 慢 SQL 阈值（毫秒）,默认 Debug 50 / Release 200
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerfSettings {
    pub sql_tracing: bool,
    pub slow_sql_ms: u64,
}

impl PerfSettings {
    pub fn from_env() -> Self {
        let sql_tracing = std::env::var("ABSENTA_PERF_SQL")
            .map(|v| flag_enabled(&v))
            .unwrap_or(cfg!(debug_assertions));
        let slow_sql_ms = std::env::var("ABSENTA_SLOW_SQL_MS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(if cfg!(debug_assertions) { 50 } else { 200 });
        Self {
            sql_tracing,
            slow_sql_ms,
        }
    }
}

fn flag_enabled(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// 压成单行并按字符截断
fn sql_preview(sql: &str, max_chars: usize) -> String {
    let flat: String = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut short: String = flat.chars().take(max_chars).collect();
    short.push('…');
    short
}

// ==========================================
// 连接级回调
// ==========================================

/// 按环境变量为连接安装（或清除）SQL 回调
pub fn install_sqlite_tracing(conn: &mut Connection) {
    apply_settings(conn, PerfSettings::from_env());
}

/// 按给定配置为连接安装（或清除）SQL 回调
pub fn apply_settings(conn: &mut Connection, settings: PerfSettings) {
    SLOW_SQL_MS.store(settings.slow_sql_ms, Ordering::Relaxed);

    if settings.sql_tracing {
        conn.profile(Some(on_statement_done));
    } else {
        conn.profile(None);
    }
}

// 仅在开启统计的连接上安装
fn on_statement_done(sql: &str, duration: Duration) {
    if guard_active() {
        bump(|c| c.statements = c.statements.saturating_add(1));
    }

    let threshold = SLOW_SQL_MS.load(Ordering::Relaxed);
    let elapsed_ms = duration.as_millis() as u64;
    if threshold == 0 || elapsed_ms < threshold {
        return;
    }

    tracing::warn!(
        target: "slow_sql",
        elapsed_ms,
        threshold_ms = threshold,
        sql = %sql_preview(sql, SLOW_SQL_PREVIEW_CHARS),
        "慢 SQL"
    );
    if guard_active() {
        bump(|c| c.slow = c.slow.saturating_add(1));
    }
}

// ==========================================
// PerfGuard
// ==========================================

/// 操作级性能统计,drop 时输出一条 `perf` 日志
///
/// ```ignore
/// let _perf = absenta::perf::PerfGuard::new("list_pending_attendances");
/// ```
pub struct PerfGuard {
    op: &'static str,
    started: Instant,
    baseline: SqlCounters,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        GUARD_DEPTH.with(|d| d.set(d.get().saturating_add(1)));
        Self {
            op,
            started: Instant::now(),
            baseline: snapshot(),
        }
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let now = snapshot();
        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            sql_count = now.statements.saturating_sub(self.baseline.statements),
            slow_sql_count = now.slow.saturating_sub(self.baseline.slow),
            "done"
        );
        GUARD_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}
