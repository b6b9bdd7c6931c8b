// ==========================================
// 考勤审核状态机集成测试
// ==========================================
// 测试范围:
// 1. pending → validated | rejected 仅一次
// 2. 备注保留与覆盖
// 3. 前置检查顺序: 管理员 → 记录 → 状态
// 4. 审计日志
// ==========================================

mod helpers;

use absenta::api::ApiError;
use absenta::domain::action_log::ActionType;
use absenta::domain::types::{AttendanceStatus, ValidationAction, ValidationStatus};
use helpers::api_test_helper::ApiTestEnv;
use helpers::test_data_builder::AttendanceBuilder;

fn setup() -> (ApiTestEnv, i64, i64) {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let admin_id = env.add_admin("ADM001");
    let student_id = env.add_student("SIS001", "Ahmad Budi", "10A");
    let record_id = env.add_attendance(
        AttendanceBuilder::new(student_id)
            .date("2024-01-15")
            .status(AttendanceStatus::Izin)
            .notes("acara keluarga"),
    );
    (env, admin_id, record_id)
}

#[test]
fn test_validate_sets_all_audit_fields() {
    let (env, admin_id, record_id) = setup();

    let outcome = env
        .state
        .attendance_api
        .validate_or_reject(record_id, ValidationAction::Validate, admin_id, None)
        .expect("审核失败");
    assert_eq!(outcome.status, ValidationStatus::Validated);
    assert_eq!(outcome.validated_by, admin_id);

    let record = env.state.attendance_api.get_attendance(record_id).unwrap();
    assert_eq!(record.validation_status, ValidationStatus::Validated);
    assert_eq!(record.validated_by, Some(admin_id));
    assert!(record.validated_at.is_some());
    assert!(record.updated_at >= record.created_at);
    assert_eq!(record.status, AttendanceStatus::Izin);
    assert!(record.validation_fields_consistent());
}

#[test]
fn test_at_most_one_transition_succeeds() {
    let (env, admin_id, record_id) = setup();
    let api = &env.state.attendance_api;

    let calls = [
        ValidationAction::Reject,
        ValidationAction::Validate,
        ValidationAction::Reject,
        ValidationAction::Validate,
    ];
    let results: Vec<_> = calls
        .iter()
        .map(|action| api.validate_or_reject(record_id, *action, admin_id, None))
        .collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results[0].is_ok());
    for result in &results[1..] {
        match result {
            Err(ApiError::InvalidStateTransition { from, .. }) => assert_eq!(from, "rejected"),
            other => panic!("期望 InvalidStateTransition, 实际 {:?}", other),
        }
    }

    let record = api.get_attendance(record_id).unwrap();
    assert_eq!(record.validation_status, ValidationStatus::Rejected);
}

#[test]
fn test_notes_preserved_when_omitted() {
    let (env, admin_id, record_id) = setup();
    env.validate(record_id, admin_id);

    let record = env.state.attendance_api.get_attendance(record_id).unwrap();
    assert_eq!(record.notes.as_deref(), Some("acara keluarga"));
}

#[test]
fn test_notes_overwritten_when_supplied() {
    let (env, admin_id, record_id) = setup();
    env.state
        .attendance_api
        .validate_or_reject(
            record_id,
            ValidationAction::Reject,
            admin_id,
            Some("surat izin tidak ditandatangani"),
        )
        .unwrap();

    let record = env.state.attendance_api.get_attendance(record_id).unwrap();
    assert_eq!(record.notes.as_deref(), Some("surat izin tidak ditandatangani"));
}

#[test]
fn test_failed_call_leaves_record_untouched() {
    let (env, admin_id, record_id) = setup();
    env.validate(record_id, admin_id);
    let before = env.state.attendance_api.get_attendance(record_id).unwrap();

    let result = env.state.attendance_api.validate_or_reject(
        record_id,
        ValidationAction::Reject,
        admin_id,
        Some("terlambat"),
    );
    assert!(result.is_err());

    let after = env.state.attendance_api.get_attendance(record_id).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_precondition_order_admin_first() {
    let (env, admin_id, record_id) = setup();
    let api = &env.state.attendance_api;

    // 管理员与记录都不存在 → AdminNotFound
    let err = api
        .validate_or_reject(99_999, ValidationAction::Validate, 4_242, None)
        .unwrap_err();
    assert!(matches!(err, ApiError::AdminNotFound(4_242)));

    // 管理员不存在、记录已处理 → 仍为 AdminNotFound
    env.validate(record_id, admin_id);
    let err = api
        .validate_or_reject(record_id, ValidationAction::Validate, 4_242, None)
        .unwrap_err();
    assert!(matches!(err, ApiError::AdminNotFound(_)));

    // 管理员存在、记录不存在 → AttendanceNotFound
    let err = api
        .validate_or_reject(99_999, ValidationAction::Validate, admin_id, None)
        .unwrap_err();
    assert!(matches!(err, ApiError::AttendanceNotFound(99_999)));
}

#[test]
fn test_decisions_are_audited() {
    let (env, admin_id, record_id) = setup();
    let student_id = env.add_student("SIS002", "Siti", "10A");
    let other = env.add_attendance(
        AttendanceBuilder::new(student_id).status(AttendanceStatus::Alpha),
    );

    env.validate(record_id, admin_id);
    env.reject(other, admin_id);
    // 失败的调用不留痕
    let _ = env.state.attendance_api.validate_or_reject(
        other,
        ValidationAction::Validate,
        admin_id,
        None,
    );

    let repo = &env.state.action_log_repo;
    assert_eq!(
        repo.count_by_action_type(ActionType::ValidateAttendance.as_str()).unwrap(),
        1
    );
    assert_eq!(
        repo.count_by_action_type(ActionType::RejectAttendance.as_str()).unwrap(),
        1
    );

    let logs = env.state.dashboard_api.list_actions_by_attendance(record_id).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].actor, format!("admin:{}", admin_id));
}
