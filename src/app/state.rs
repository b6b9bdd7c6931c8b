// ==========================================
// 学校考勤管理系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::api::{AttendanceApi, DashboardApi, ReportApi};
use crate::config::config_manager::ConfigManager;
use crate::engine::{AbsenceAggregator, DashboardStatsAggregator, ValidationEngine};
use crate::exporter::{AbsenceReportExporter, FsReportStore, ReportStore};
use crate::repository::{
    action_log_repo::ActionLogRepository, admin_repo::AdminRepository,
    attendance_repo::AttendanceRepository, student_repo::StudentRepository,
};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 考勤审核API
    pub attendance_api: Arc<AttendanceApi>,

    /// 缺勤报表API
    pub report_api: Arc<ReportApi>,

    /// 驾驶舱API
    pub dashboard_api: Arc<DashboardApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 数据录入仓储
    pub student_repo: Arc<StudentRepository>,
    pub admin_repo: Arc<AdminRepository>,
    pub attendance_repo: Arc<AttendanceRepository>,

    /// 操作日志仓储（用于审计追踪）
    pub action_log_repo: Arc<ActionLogRepository>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并建表（幂等）
    /// 2. 安装 SQL 性能追踪
    /// 3. 初始化 Repository / Engine / API
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let mut conn = crate::db::open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        crate::db::ensure_schema(&conn).map_err(|e| format!("数据库建表失败: {}", e))?;
        crate::db::warn_if_schema_outdated(&conn);
        crate::perf::install_sqlite_tracing(&mut conn);

        Self::from_connection(db_path, Arc::new(Mutex::new(conn)))
    }

    /// 创建内存库 AppState（演示/测试用）
    pub fn in_memory() -> Result<Self, String> {
        let conn = crate::db::open_in_memory().map_err(|e| format!("无法打开内存数据库: {}", e))?;
        Self::from_connection(":memory:".to_string(), Arc::new(Mutex::new(conn)))
    }

    /// 基于已建表的共享连接组装 AppState
    pub fn from_connection(db_path: String, conn: Arc<Mutex<Connection>>) -> Result<Self, String> {
        // ==========================================
        // 初始化Repository层
        // ==========================================
        let student_repo = Arc::new(StudentRepository::new(conn.clone()));
        let admin_repo = Arc::new(AdminRepository::new(conn.clone()));
        let attendance_repo = Arc::new(AttendanceRepository::new(conn.clone()));
        let action_log_repo = Arc::new(ActionLogRepository::new(conn.clone()));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let report_settings = config_manager
            .get_report_settings()
            .map_err(|e| format!("读取报表配置失败: {}", e))?;
        tracing::info!(
            reports_dir = %report_settings.reports_dir.display(),
            include_detail = report_settings.include_detail,
            "报表配置已加载"
        );
        match config_manager.get_config_snapshot() {
            Ok(snapshot) => tracing::debug!(config = %snapshot, "全局配置快照"),
            Err(e) => tracing::warn!("读取配置快照失败: {}", e),
        }

        // ==========================================
        // 初始化Engine层
        // ==========================================
        let validation_engine = Arc::new(ValidationEngine::new(
            admin_repo.clone(),
            attendance_repo.clone(),
            action_log_repo.clone(),
        ));
        let absence_aggregator = Arc::new(AbsenceAggregator::new(attendance_repo.clone()));
        let stats_aggregator = Arc::new(DashboardStatsAggregator::new(attendance_repo.clone()));

        let report_store: Arc<dyn ReportStore> = Arc::new(FsReportStore::new(
            report_settings.reports_dir.clone(),
            report_settings.download_prefix.clone(),
        ));
        let exporter = Arc::new(AbsenceReportExporter::new(
            absence_aggregator.clone(),
            report_store,
            action_log_repo.clone(),
            report_settings.include_detail,
        ));

        // ==========================================
        // 初始化API层
        // ==========================================
        let attendance_api = Arc::new(AttendanceApi::new(
            validation_engine,
            attendance_repo.clone(),
        ));
        let report_api = Arc::new(ReportApi::new(absence_aggregator, exporter));
        let dashboard_api = Arc::new(DashboardApi::new(stats_aggregator, action_log_repo.clone()));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            attendance_api,
            report_api,
            dashboard_api,
            config_manager,
            student_repo,
            admin_repo,
            attendance_repo,
            action_log_repo,
        })
    }

    /// 获取数据库路径
    pub fn get_db_path(&self) -> &str {
        &self.db_path
    }

    /// 按配置切换界面语言（进程级全局设置）
    pub fn apply_locale(&self) {
        match self.config_manager.get_locale() {
            Ok(locale) => crate::i18n::set_locale(&locale),
            Err(e) => tracing::warn!("读取语言配置失败，保持默认语言: {}", e),
        }
    }
}

// ==========================================
// 默认数据库路径辅助函数
// ==========================================

/// 获取默认数据库路径
///
/// # 返回
/// - 环境变量 ABSENTA_DB_PATH（非空时）
/// - 用户数据目录/absenta/absenta.db
/// - 回退: ./absenta.db
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("ABSENTA_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./absenta.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("absenta");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("absenta.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }

    #[test]
    fn test_in_memory_state() {
        let state = AppState::in_memory().unwrap();
        assert_eq!(state.get_db_path(), ":memory:");
        let stats = state
            .dashboard_api
            .get_dashboard_stats_as_of(chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
            .unwrap();
        assert_eq!(stats.pending_validations, 0);
    }
}
