// ==========================================
// 学校考勤管理系统 - 驾驶舱 API
// ==========================================
// 职责: 驾驶舱统计、操作日志查询
// ==========================================

use chrono::NaiveDate;
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::action_log::ActionLog;
use crate::domain::report::DashboardStats;
use crate::engine::DashboardStatsAggregator;
use crate::perf::PerfGuard;
use crate::repository::action_log_repo::ActionLogRepository;

/// 操作日志单次查询上限
const MAX_ACTION_LOG_LIMIT: i32 = 1000;

pub struct DashboardApi {
    stats_aggregator: Arc<DashboardStatsAggregator>,
    action_log_repo: Arc<ActionLogRepository>,
}

impl DashboardApi {
    pub fn new(
        stats_aggregator: Arc<DashboardStatsAggregator>,
        action_log_repo: Arc<ActionLogRepository>,
    ) -> Self {
        Self {
            stats_aggregator,
            action_log_repo,
        }
    }

    /// 驾驶舱统计（今天 = 服务器本地日期）
    pub fn get_dashboard_stats(&self) -> ApiResult<DashboardStats> {
        self.get_dashboard_stats_as_of(chrono::Local::now().date_naive())
    }

    /// 驾驶舱统计（指定日期）
    pub fn get_dashboard_stats_as_of(&self, as_of: NaiveDate) -> ApiResult<DashboardStats> {
        let _perf = PerfGuard::new("get_dashboard_stats");
        Ok(self.stats_aggregator.compute(as_of)?)
    }

    // ==========================================
    // 操作日志查询
    // ==========================================

    /// 查询最近操作日志
    pub fn list_recent_actions(&self, limit: i32) -> ApiResult<Vec<ActionLog>> {
        check_limit(limit)?;
        Ok(self.action_log_repo.find_recent(limit)?)
    }

    /// 按 action_id 查询单条操作日志
    pub fn get_action(&self, action_id: &str) -> ApiResult<ActionLog> {
        self.action_log_repo
            .find_by_id(action_id)?
            .ok_or_else(|| ApiError::NotFound(format!("操作日志(id={})不存在", action_id)))
    }

    /// 查询某个操作人的最近操作日志
    ///
    /// # 参数
    /// - actor: `admin:{id}` 或 `system`
    pub fn list_actions_by_actor(&self, actor: &str, limit: i32) -> ApiResult<Vec<ActionLog>> {
        let actor = actor.trim();
        if actor.is_empty() {
            return Err(ApiError::InvalidInput("actor不能为空".to_string()));
        }
        check_limit(limit)?;
        Ok(self.action_log_repo.find_by_actor(actor, limit)?)
    }

    /// 查询某条考勤记录的操作日志
    pub fn list_actions_by_attendance(&self, attendance_id: i64) -> ApiResult<Vec<ActionLog>> {
        Ok(self.action_log_repo.find_by_attendance_id(attendance_id)?)
    }
}

fn check_limit(limit: i32) -> ApiResult<()> {
    if limit <= 0 || limit > MAX_ACTION_LOG_LIMIT {
        return Err(ApiError::InvalidInput(format!(
            "limit必须在1-{}之间",
            MAX_ACTION_LOG_LIMIT
        )));
    }
    Ok(())
}
