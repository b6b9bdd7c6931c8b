// ==========================================
// 学校考勤管理系统 - 考勤审核引擎
// ==========================================
// 状态机: pending → validated | rejected (吸收态,仅一次)
// 前置检查顺序: 管理员存在 → 记录存在 → 记录为 pending
// 红线: Engine 不拼 SQL; 写入为带 pending 条件的单条 UPDATE
// ==========================================

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::types::{ValidationAction, ValidationStatus};
use crate::repository::{
    ActionLogRepository, AdminRepository, AttendanceRepository, RepositoryError,
};

// ==========================================
// 错误类型
// ==========================================
#[derive(Error, Debug)]
pub enum ValidationEngineError {
    #[error("管理员不存在: admin_id={0}")]
    AdminNotFound(i64),

    #[error("考勤记录不存在: attendance_id={0}")]
    RecordNotFound(i64),

    #[error("考勤记录已处理: attendance_id={attendance_id}, current={current}, attempted={attempted}")]
    AlreadyProcessed {
        attendance_id: i64,
        current: ValidationStatus,
        attempted: ValidationStatus,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 审核成功结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub attendance_id: i64,
    pub action: ValidationAction,
    pub status: ValidationStatus,
    pub validated_by: i64,
    pub validated_at: NaiveDateTime,
}

// ==========================================
// ValidationEngine - 考勤审核引擎
// ==========================================
pub struct ValidationEngine {
    admin_repo: Arc<AdminRepository>,
    attendance_repo: Arc<AttendanceRepository>,
    action_log_repo: Arc<ActionLogRepository>,
}

impl ValidationEngine {
    pub fn new(
        admin_repo: Arc<AdminRepository>,
        attendance_repo: Arc<AttendanceRepository>,
        action_log_repo: Arc<ActionLogRepository>,
    ) -> Self {
        Self {
            admin_repo,
            attendance_repo,
            action_log_repo,
        }
    }

    /// 审核通过或驳回一条考勤记录 (使用本地当前时间)
    pub fn validate_or_reject(
        &self,
        attendance_id: i64,
        action: ValidationAction,
        admin_id: i64,
        notes: Option<&str>,
    ) -> Result<ValidationOutcome, ValidationEngineError> {
        self.validate_or_reject_at(
            attendance_id,
            action,
            admin_id,
            notes,
            Local::now().naive_local(),
        )
    }

    /// 审核通过或驳回一条考勤记录
    ///
    /// # 参数
    /// - `notes`: None 时保留原备注; Some 时覆盖
    /// - `now`: 写入 validated_at / updated_at 的时间
    ///
    /// # 返回
    /// - `Ok(ValidationOutcome)`: 转换成功
    /// - `Err(AlreadyProcessed)`: 记录已为终态 (含并发下被其他请求抢先处理)
    pub fn validate_or_reject_at(
        &self,
        attendance_id: i64,
        action: ValidationAction,
        admin_id: i64,
        notes: Option<&str>,
        now: NaiveDateTime,
    ) -> Result<ValidationOutcome, ValidationEngineError> {
        // 1. 管理员必须存在
        let admin = self
            .admin_repo
            .find_by_id(admin_id)?
            .ok_or(ValidationEngineError::AdminNotFound(admin_id))?;

        // 2. 记录必须存在
        let record = self
            .attendance_repo
            .find_by_id(attendance_id)?
            .ok_or(ValidationEngineError::RecordNotFound(attendance_id))?;

        // 3. 记录必须为 pending
        let target = action.target_status();
        if record.validation_status.is_terminal() {
            return Err(ValidationEngineError::AlreadyProcessed {
                attendance_id,
                current: record.validation_status,
                attempted: target,
            });
        }

        // 4. 条件写入 (检查与写入合并为一步)
        let affected = self
            .attendance_repo
            .transition_from_pending(attendance_id, target, admin_id, notes, now)?;

        if affected == 0 {
            // 检查之后被其他请求抢先处理,重新读取当前状态
            return match self.attendance_repo.find_by_id(attendance_id)? {
                Some(current) => Err(ValidationEngineError::AlreadyProcessed {
                    attendance_id,
                    current: current.validation_status,
                    attempted: target,
                }),
                None => Err(ValidationEngineError::RecordNotFound(attendance_id)),
            };
        }

        info!(
            attendance_id,
            admin_id,
            admin = %admin.full_name,
            action = %action,
            status = %target,
            "考勤审核完成"
        );

        self.record_action(attendance_id, action, admin_id, notes);

        Ok(ValidationOutcome {
            attendance_id,
            action,
            status: target,
            validated_by: admin_id,
            validated_at: now,
        })
    }

    /// 写入审核日志 (失败仅告警,不影响审核结果)
    fn record_action(
        &self,
        attendance_id: i64,
        action: ValidationAction,
        admin_id: i64,
        notes: Option<&str>,
    ) {
        let action_type = match action {
            ValidationAction::Validate => ActionType::ValidateAttendance,
            ValidationAction::Reject => ActionType::RejectAttendance,
        };
        let log = ActionLog::new(action_type, format!("admin:{}", admin_id))
            .with_attendance(attendance_id)
            .with_payload(json!({
                "action": action.as_str(),
                "notes": notes,
            }));

        if let Err(e) = self.action_log_repo.insert(&log) {
            warn!(attendance_id, admin_id, error = %e, "审核日志写入失败");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::attendance::NewAttendance;
    use crate::domain::student::{NewAdmin, NewStudent};
    use crate::domain::types::AttendanceStatus;
    use crate::repository::StudentRepository;
    use chrono::NaiveDate;
    use rusqlite::Connection;
    use std::sync::Mutex;

    struct Fixture {
        engine: ValidationEngine,
        attendance_repo: Arc<AttendanceRepository>,
        action_log_repo: Arc<ActionLogRepository>,
        admin_id: i64,
        record_id: i64,
    }

    fn setup() -> Fixture {
        let conn: Arc<Mutex<Connection>> =
            Arc::new(Mutex::new(crate::db::open_in_memory().unwrap()));
        let admin_repo = Arc::new(AdminRepository::new(conn.clone()));
        let attendance_repo = Arc::new(AttendanceRepository::new(conn.clone()));
        let action_log_repo = Arc::new(ActionLogRepository::new(conn.clone()));

        let admin_id = admin_repo
            .insert(&NewAdmin::new("ADM001", "admin@school.id", "Admin Satu"))
            .unwrap();
        let student_id = StudentRepository::new(conn)
            .insert(&NewStudent::new("SIS001", "Ahmad Budi", "10A"))
            .unwrap();
        let record_id = attendance_repo
            .insert(
                &NewAttendance::new(
                    student_id,
                    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                    AttendanceStatus::Izin,
                )
                .with_notes("acara keluarga"),
            )
            .unwrap();

        Fixture {
            engine: ValidationEngine::new(
                admin_repo,
                attendance_repo.clone(),
                action_log_repo.clone(),
            ),
            attendance_repo,
            action_log_repo,
            admin_id,
            record_id,
        }
    }

    #[test]
    fn test_validate_sets_audit_fields() {
        let f = setup();
        let outcome = f
            .engine
            .validate_or_reject(f.record_id, ValidationAction::Validate, f.admin_id, None)
            .unwrap();
        assert_eq!(outcome.status, ValidationStatus::Validated);

        let record = f.attendance_repo.find_by_id(f.record_id).unwrap().unwrap();
        assert_eq!(record.validation_status, ValidationStatus::Validated);
        assert_eq!(record.validated_by, Some(f.admin_id));
        assert!(record.validated_at.is_some());
        assert!(record.validation_fields_consistent());
        assert_eq!(record.notes.as_deref(), Some("acara keluarga"));
        assert_eq!(record.status, AttendanceStatus::Izin);

        assert_eq!(
            f.action_log_repo
                .count_by_action_type(ActionType::ValidateAttendance.as_str())
                .unwrap(),
            1
        );
    }

    #[test]
    fn test_reject_overwrites_notes() {
        let f = setup();
        f.engine
            .validate_or_reject(
                f.record_id,
                ValidationAction::Reject,
                f.admin_id,
                Some("surat tidak valid"),
            )
            .unwrap();

        let record = f.attendance_repo.find_by_id(f.record_id).unwrap().unwrap();
        assert_eq!(record.validation_status, ValidationStatus::Rejected);
        assert_eq!(record.notes.as_deref(), Some("surat tidak valid"));
    }

    #[test]
    fn test_second_decision_reports_terminal_state() {
        let f = setup();
        f.engine
            .validate_or_reject(f.record_id, ValidationAction::Reject, f.admin_id, None)
            .unwrap();

        for action in [ValidationAction::Validate, ValidationAction::Reject] {
            let err = f
                .engine
                .validate_or_reject(f.record_id, action, f.admin_id, None)
                .unwrap_err();
            assert!(matches!(
                err,
                ValidationEngineError::AlreadyProcessed {
                    current: ValidationStatus::Rejected,
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_admin_checked_before_record() {
        let f = setup();
        let err = f
            .engine
            .validate_or_reject(9_999, ValidationAction::Validate, 777, None)
            .unwrap_err();
        assert!(matches!(err, ValidationEngineError::AdminNotFound(777)));

        let err = f
            .engine
            .validate_or_reject(9_999, ValidationAction::Validate, f.admin_id, None)
            .unwrap_err();
        assert!(matches!(err, ValidationEngineError::RecordNotFound(9_999)));
    }
}
