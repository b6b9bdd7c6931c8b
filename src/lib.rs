// ==========================================
// 学校考勤管理系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 核心: 考勤审核状态机 + 缺勤汇总/报表导出
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 报表导出层 - CSV 与文件存储
pub mod exporter;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// 性能统计
pub mod perf;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态组装与命令入口
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AttendanceStatus, ValidationAction, ValidationStatus};

// 领域实体
pub use domain::{
    AbsenceBreakdown, AbsenceFilter, ActionLog, ActionType, AttendanceRecord,
    AttendanceWithStudent, DashboardStats, StudentAbsenceSummary, TodayStats,
};

// 引擎
pub use engine::{AbsenceAggregator, DashboardStatsAggregator, ValidationEngine};

// API
pub use api::{AttendanceApi, DashboardApi, ReportApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Absenta 学校考勤管理系统";
