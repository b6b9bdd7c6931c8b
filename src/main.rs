// ==========================================
// 学校考勤管理系统 - 主入口
// ==========================================
// 启动: 初始化日志 → 组装 AppState → 输出健康状态与驾驶舱统计
// 传输层 (HTTP/RPC) 由宿主进程接入 app::commands
// ==========================================

use absenta::app::{commands, get_default_db_path, AppState};

fn main() {
    absenta::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", absenta::APP_NAME);
    tracing::info!("系统版本: {}", absenta::VERSION);
    tracing::info!("==================================================");

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let app_state = match AppState::new(db_path) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("AppState初始化失败: {}", e);
            std::process::exit(1);
        }
    };
    app_state.apply_locale();

    let health = commands::health_check();
    tracing::info!(status = %health.status, timestamp = %health.timestamp, "健康检查");

    let stats = commands::get_dashboard_stats(&app_state);
    tracing::info!(
        pending_validations = stats.pending_validations,
        hadir = stats.today_stats.hadir,
        izin = stats.today_stats.izin,
        sakit = stats.today_stats.sakit,
        alpha = stats.today_stats.alpha,
        total = stats.today_stats.total,
        "今日考勤统计"
    );
}
