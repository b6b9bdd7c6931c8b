// ==========================================
// 学校考勤管理系统 - 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 环境变量控制级别 (RUST_LOG) 与格式 (ABSENTA_LOG_FORMAT)
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 默认过滤器: 业务日志 info, 慢 SQL 始终输出
const DEFAULT_FILTER: &str = "info,slow_sql=warn";

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// 读取 `ABSENTA_LOG_FORMAT`,未设置或无法识别时为 Text
    pub fn from_env() -> Self {
        std::env::var("ABSENTA_LOG_FORMAT")
            .map(|v| Self::parse(&v))
            .unwrap_or(LogFormat::Text)
    }

    fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// 初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: info）
///   例如: RUST_LOG=debug 或 RUST_LOG=absenta=trace,perf=info
/// - ABSENTA_LOG_FORMAT=json: 输出 JSON 行日志
///
/// # 示例
/// ```no_run
/// use absenta::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true);

    // 已存在全局 subscriber 时不覆盖
    let result = match LogFormat::from_env() {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.with_thread_ids(false).try_init(),
    };

    if let Err(e) = result {
        eprintln!("日志系统已初始化，跳过: {}", e);
    }
}

/// 初始化测试环境的日志系统
///
/// 使用更详细的日志级别，便于调试
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Text);
        assert_eq!(LogFormat::parse(""), LogFormat::Text);
    }

    #[test]
    fn test_init_test_is_repeatable() {
        init_test();
        init_test();
        tracing::debug!("logging ready");
    }
}
