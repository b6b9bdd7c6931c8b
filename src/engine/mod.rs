// ==========================================
// 学校考勤管理系统 - 引擎层
// ==========================================
// 职责: 实现业务规则引擎,不拼 SQL
// 红线: Engine 不拼 SQL
// ==========================================

pub mod absence_aggregator;
pub mod dashboard_stats;
pub mod validation;

// 重导出核心引擎
pub use absence_aggregator::{summarize, AbsenceAggregator};
pub use dashboard_stats::DashboardStatsAggregator;
pub use validation::{ValidationEngine, ValidationEngineError, ValidationOutcome};
