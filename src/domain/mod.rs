// ==========================================
// 学校考勤管理系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod action_log;
pub mod attendance;
pub mod report;
pub mod student;
pub mod types;

// 重导出核心类型
pub use action_log::{ActionLog, ActionType};
pub use attendance::{AbsenceRow, AttendanceRecord, AttendanceWithStudent, NewAttendance, StudentInfo};
pub use report::{AbsenceBreakdown, AbsenceFilter, DashboardStats, StudentAbsenceSummary, TodayStats};
pub use student::{Admin, NewAdmin, NewStudent};
pub use types::{AttendanceStatus, ValidationAction, ValidationStatus};
