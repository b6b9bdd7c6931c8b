// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 提供API层集成测试的通用辅助函数
// ==========================================

#![allow(dead_code)]

#[path = "../test_helpers.rs"]
mod test_helpers;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::{NamedTempFile, TempDir};

use absenta::app::AppState;
use absenta::config::{config_keys, ConfigManager};
use absenta::domain::student::NewAdmin;
use absenta::domain::types::ValidationAction;

use super::test_data_builder::{AttendanceBuilder, StudentBuilder};

// ==========================================
// API测试环境
// ==========================================

/// API测试环境
///
/// 包含完整 AppState、临时数据库与临时报表目录
pub struct ApiTestEnv {
    pub db_path: String,
    pub state: AppState,
    pub reports_dir: PathBuf,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
    _reports_tmp: TempDir,
}

impl ApiTestEnv {
    /// 创建新的API测试环境（默认导出明细报表）
    pub fn new() -> Result<Self, String> {
        Self::with_config(&[])
    }

    /// 创建API测试环境，并预先写入 global 配置
    pub fn with_config(entries: &[(&str, &str)]) -> Result<Self, String> {
        absenta::logging::init_test();

        let (temp_file, db_path) = test_helpers::create_test_db()
            .map_err(|e| format!("创建测试数据库失败: {}", e))?;
        let reports_tmp = tempfile::tempdir().map_err(|e| format!("创建报表目录失败: {}", e))?;
        let reports_dir = reports_tmp.path().join("reports");

        let conn = absenta::db::open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        let config = ConfigManager::from_connection(conn.clone())
            .map_err(|e| format!("无法创建ConfigManager: {}", e))?;
        config
            .set_global_config_value(config_keys::REPORTS_DIR, &reports_dir.to_string_lossy())
            .map_err(|e| format!("写入配置失败: {}", e))?;
        for (key, value) in entries {
            config
                .set_global_config_value(key, value)
                .map_err(|e| format!("写入配置失败: {}", e))?;
        }

        let state = AppState::from_connection(db_path.clone(), conn)?;

        Ok(Self {
            db_path,
            state,
            reports_dir,
            _temp_file: temp_file,
            _reports_tmp: reports_tmp,
        })
    }

    // ==========================================
    // 测试数据准备
    // ==========================================

    pub fn add_admin(&self, nis: &str) -> i64 {
        self.state
            .admin_repo
            .insert(&NewAdmin::new(nis, &format!("{}@school.id", nis.to_lowercase()), "Admin"))
            .expect("插入管理员失败")
    }

    pub fn add_student(&self, nis: &str, full_name: &str, class_name: &str) -> i64 {
        self.state
            .student_repo
            .insert(&StudentBuilder::new(nis).name(full_name).class(class_name).build())
            .expect("插入学生失败")
    }

    pub fn add_attendance(&self, builder: AttendanceBuilder) -> i64 {
        let record = builder.build();
        let result = match builder.created_at_value() {
            Some(ts) => self.state.attendance_repo.insert_at(&record, ts),
            None => self.state.attendance_repo.insert(&record),
        };
        result.expect("插入考勤记录失败")
    }

    pub fn validate(&self, attendance_id: i64, admin_id: i64) {
        self.state
            .attendance_api
            .validate_or_reject(attendance_id, ValidationAction::Validate, admin_id, None)
            .expect("审核失败");
    }

    pub fn reject(&self, attendance_id: i64, admin_id: i64) {
        self.state
            .attendance_api
            .validate_or_reject(attendance_id, ValidationAction::Reject, admin_id, None)
            .expect("驳回失败");
    }

    /// 报表目录下的文件名（排序后）
    pub fn report_files(&self) -> Vec<String> {
        let mut names: Vec<String> = match std::fs::read_dir(&self.reports_dir) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().to_string())
                .collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }
}
