// ==========================================
// 学校考勤管理系统 - 考勤记录数据仓储
// ==========================================
// 对齐: attendance 表 (JOIN students)
// 红线: Repository 不含业务逻辑
// 并发: 状态转换使用带条件的 UPDATE,保证 pending → 终态只发生一次
// ==========================================

mod core;
mod queries;


pub use core::AttendanceRepository;
