// ==========================================
// 学校考勤管理系统 - 考勤审核 API
// ==========================================
// 职责: 审核操作入口、待审核列表查询
// 架构: API 层 → Engine 层 (ValidationEngine) → Repository 层
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::attendance::{AttendanceRecord, AttendanceWithStudent};
use crate::domain::types::ValidationAction;
use crate::engine::{ValidationEngine, ValidationOutcome};
use crate::perf::PerfGuard;
use crate::repository::AttendanceRepository;

// ==========================================
// AttendanceApi - 考勤审核 API
// ==========================================
pub struct AttendanceApi {
    validation_engine: Arc<ValidationEngine>,
    attendance_repo: Arc<AttendanceRepository>,
}

impl AttendanceApi {
    pub fn new(
        validation_engine: Arc<ValidationEngine>,
        attendance_repo: Arc<AttendanceRepository>,
    ) -> Self {
        Self {
            validation_engine,
            attendance_repo,
        }
    }

    /// 审核通过或驳回
    ///
    /// # 参数
    /// - `notes`: None 保留原备注; Some 覆盖原备注
    ///
    /// # 返回
    /// - `Err(AdminNotFound)` / `Err(AttendanceNotFound)`: 前置检查失败
    /// - `Err(InvalidStateTransition)`: 记录已为终态 (from 为当前终态)
    pub fn validate_or_reject(
        &self,
        attendance_id: i64,
        action: ValidationAction,
        admin_id: i64,
        notes: Option<&str>,
    ) -> ApiResult<ValidationOutcome> {
        let _perf = PerfGuard::new("validate_or_reject");

        let outcome = self
            .validation_engine
            .validate_or_reject(attendance_id, action, admin_id, notes)?;
        Ok(outcome)
    }

    /// 待审核记录列表（按创建时间倒序）
    pub fn list_pending_attendances(&self) -> ApiResult<Vec<AttendanceWithStudent>> {
        let _perf = PerfGuard::new("list_pending_attendances");
        Ok(self.attendance_repo.list_pending_with_student()?)
    }

    /// 查询单条考勤记录
    pub fn get_attendance(&self, attendance_id: i64) -> ApiResult<AttendanceRecord> {
        self.attendance_repo
            .find_by_id(attendance_id)?
            .ok_or(ApiError::AttendanceNotFound(attendance_id))
    }
}
