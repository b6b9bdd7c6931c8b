// ==========================================
// 缺勤报表导出集成测试
// ==========================================
// 测试范围:
// 1. 仅已审核记录进入报表
// 2. 文件命名、下载地址与落盘
// 3. 重复导出不覆盖
// 4. 参数错误不产生文件
// 5. 明细开关与导出日志
// ==========================================

mod helpers;

use absenta::api::ApiError;
use absenta::config::config_keys;
use absenta::domain::action_log::ActionType;
use absenta::domain::types::AttendanceStatus;
use helpers::api_test_helper::ApiTestEnv;
use helpers::test_data_builder::AttendanceBuilder;

/// 场景: 一条已审核 izin + 另一学生一条已驳回记录
fn seed_basic_scenario(env: &ApiTestEnv) {
    let admin_id = env.add_admin("ADM001");
    let ahmad = env.add_student("SIS001", "Ahmad Budi", "10A");
    let citra = env.add_student("SIS002", "Citra Dewi", "10A");

    let izin = env.add_attendance(
        AttendanceBuilder::new(ahmad)
            .date("2024-01-15")
            .status(AttendanceStatus::Izin)
            .notes("acara keluarga"),
    );
    env.validate(izin, admin_id);

    let alpha = env.add_attendance(
        AttendanceBuilder::new(citra)
            .date("2024-01-16")
            .status(AttendanceStatus::Alpha),
    );
    env.reject(alpha, admin_id);
}

fn read_lines(env: &ApiTestEnv, file_name: &str) -> Vec<String> {
    let content = std::fs::read_to_string(env.reports_dir.join(file_name)).expect("读取报表失败");
    content.lines().map(str::to_string).collect()
}

#[tokio::test]
async fn test_export_contains_only_validated_absences() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    seed_basic_scenario(&env);

    let summary = env
        .state
        .report_api
        .export_absence_report(None, "2024-01-01", "2024-01-31")
        .await
        .unwrap();

    assert_eq!(summary.student_count, 1);
    assert_eq!(summary.absence_count, 1);
    assert!(summary
        .download_url
        .starts_with("/reports/laporan-ketidakhadiran-ringkasan_2024-01-01_2024-01-31_"));
    assert!(summary.download_url.ends_with(".csv"));
    assert!(summary.download_url.ends_with(&summary.file_name));

    let lines = read_lines(&env, &summary.file_name);
    assert_eq!(
        lines,
        vec![
            "NIS,Nama Siswa,Kelas,Total Tidak Hadir,Izin,Sakit,Alpha".to_string(),
            "SIS001,Ahmad Budi,10A,1,1,0,0".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_detail_report_lists_each_absence() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    seed_basic_scenario(&env);

    let summary = env
        .state
        .report_api
        .export_absence_report(Some("10A"), "2024-01-01", "2024-01-31")
        .await
        .unwrap();

    let detail_url = summary.detail_download_url.expect("应生成明细报表");
    assert!(detail_url.starts_with("/reports/laporan-ketidakhadiran-detail_2024-01-01_2024-01-31_"));

    let detail_name = detail_url.trim_start_matches("/reports/");
    let lines = read_lines(&env, detail_name);
    assert_eq!(
        lines,
        vec![
            "NIS,Nama Siswa,Kelas,Tanggal,Status,Catatan".to_string(),
            "SIS001,Ahmad Budi,10A,2024-01-15,izin,acara keluarga".to_string(),
        ]
    );
    assert_eq!(env.report_files().len(), 2);
}

#[tokio::test]
async fn test_pending_records_are_not_exported() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let student_id = env.add_student("SIS001", "Ahmad Budi", "10A");
    env.add_attendance(AttendanceBuilder::new(student_id).status(AttendanceStatus::Sakit));

    let summary = env
        .state
        .report_api
        .export_absence_report(None, "2024-01-01", "2024-01-31")
        .await
        .unwrap();

    assert_eq!(summary.student_count, 0);
    assert_eq!(summary.absence_count, 0);
    // 无数据时仍输出表头
    assert_eq!(read_lines(&env, &summary.file_name).len(), 1);

    // 汇总查询不受审核状态限制
    let all = env.state.report_api.get_absence_summary(None, None, None).unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_repeated_exports_produce_distinct_files() {
    let env = ApiTestEnv::with_config(&[(config_keys::REPORT_INCLUDE_DETAIL, "false")])
        .expect("无法创建测试环境");
    seed_basic_scenario(&env);

    let api = &env.state.report_api;
    let first = api.export_absence_report(None, "2024-01-01", "2024-01-31").await.unwrap();
    let second = api.export_absence_report(None, "2024-01-01", "2024-01-31").await.unwrap();

    assert_ne!(first.file_name, second.file_name);
    assert_eq!(env.report_files().len(), 2);
    assert_eq!(read_lines(&env, &first.file_name), read_lines(&env, &second.file_name));
}

#[tokio::test]
async fn test_invalid_requests_write_nothing() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    seed_basic_scenario(&env);
    let api = &env.state.report_api;

    for (start, end) in [
        ("", "2024-01-31"),
        ("2024-01-01", ""),
        ("2024/01/01", "2024-01-31"),
        ("2024-02-01", "2024-01-31"),
    ] {
        let err = api.export_absence_report(None, start, end).await.unwrap_err();
        assert!(
            matches!(err, ApiError::InvalidInput(_)),
            "({}, {}) 应为 InvalidInput, 实际 {:?}",
            start,
            end,
            err
        );
    }

    assert!(env.report_files().is_empty());
}

#[tokio::test]
async fn test_detail_can_be_disabled() {
    let env = ApiTestEnv::with_config(&[(config_keys::REPORT_INCLUDE_DETAIL, "false")])
        .expect("无法创建测试环境");
    seed_basic_scenario(&env);

    let summary = env
        .state
        .report_api
        .export_absence_report(None, "2024-01-01", "2024-01-31")
        .await
        .unwrap();

    assert!(summary.detail_download_url.is_none());
    assert_eq!(env.report_files(), vec![summary.file_name.clone()]);
}

#[tokio::test]
async fn test_custom_download_prefix() {
    let env = ApiTestEnv::with_config(&[(config_keys::REPORT_DOWNLOAD_PREFIX, "/files/")])
        .expect("无法创建测试环境");
    seed_basic_scenario(&env);

    let summary = env
        .state
        .report_api
        .export_absence_report(None, "2024-01-01", "2024-01-31")
        .await
        .unwrap();

    assert_eq!(summary.download_url, format!("/files/{}", summary.file_name));
}

#[tokio::test]
async fn test_export_is_audited() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    seed_basic_scenario(&env);

    let summary = env
        .state
        .report_api
        .export_absence_report(Some("10A"), "2024-01-01", "2024-01-31")
        .await
        .unwrap();

    let exports: Vec<_> = env
        .state
        .action_log_repo
        .find_recent(50)
        .unwrap()
        .into_iter()
        .filter(|log| log.get_action_type() == Some(ActionType::ExportAbsenceReport))
        .collect();

    assert_eq!(exports.len(), 1);
    let log = &exports[0];
    assert_eq!(log.actor, "system");
    assert_eq!(log.attendance_id, None);
    assert_eq!(log.detail.as_deref(), Some(summary.file_name.as_str()));

    let payload = log.payload_json.as_ref().expect("应记录导出参数");
    assert_eq!(payload["class_name"], "10A");
    assert_eq!(payload["start_date"], "2024-01-01");
    assert_eq!(payload["student_count"], 1);
}
