// ==========================================
// 学校考勤管理系统 - 应用层
// ==========================================
// 职责: 组装共享状态,对外提供命令入口
// ==========================================

pub mod commands;
pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState};
