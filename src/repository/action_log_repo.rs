// ==========================================
// 学校考勤管理系统 - 操作日志数据仓储
// ==========================================
// 对齐: action_log 表
// 红线: 审核与导出必须留痕
// ==========================================

mod core;
mod queries;


pub use core::ActionLogRepository;
