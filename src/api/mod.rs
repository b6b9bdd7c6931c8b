// ==========================================
// 学校考勤管理系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供应用层命令调用
// ==========================================

pub mod attendance_api;
pub mod dashboard_api;
pub mod error;
pub mod report_api;

// 重导出核心类型
pub use attendance_api::AttendanceApi;
pub use dashboard_api::DashboardApi;
pub use error::{ApiError, ApiResult};
pub use report_api::ReportApi;
