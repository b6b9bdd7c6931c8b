// ==========================================
// 学校考勤管理系统 - 应用层命令
// ==========================================
// 职责: 对外操作入口,错误一律转换为结构化结果
// - 审核/导出: { success, message, code }
// - 读取路径: 出错时记录日志并返回空结果
// ==========================================

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::app::state::AppState;
use crate::domain::attendance::AttendanceWithStudent;
use crate::domain::report::{DashboardStats, StudentAbsenceSummary};
use crate::domain::types::{ValidationAction, ValidationStatus};
use crate::i18n::{t, t_with_args};

// ==========================================
// 请求 / 响应结构
// ==========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateAttendanceRequest {
    pub attendance_id: i64,
    /// validate | reject
    pub action: String,
    pub admin_id: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AbsenceSummaryRequest {
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportReportRequest {
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    /// 兼容旧客户端的格式字段,输出固定为 CSV
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl CommandResponse {
    fn ok(message: String) -> Self {
        Self {
            success: true,
            message,
            code: None,
        }
    }

    fn fail(code: &str, message: String) -> Self {
        Self {
            success: false,
            message,
            code: Some(code.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportReportResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail_download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ExportReportResponse {
    fn fail(code: &str, message: String) -> Self {
        Self {
            success: false,
            download_url: None,
            detail_download_url: None,
            message: Some(message),
            code: Some(code.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

// ==========================================
// 命令
// ==========================================

pub fn health_check() -> HealthStatus {
    HealthStatus {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        timestamp: Local::now().to_rfc3339(),
    }
}

/// 审核通过或驳回
pub fn validate_or_reject(state: &AppState, request: ValidateAttendanceRequest) -> CommandResponse {
    let action = match ValidationAction::parse(&request.action) {
        Some(a) => a,
        None => {
            return CommandResponse::fail(
                "INVALID_INPUT",
                t_with_args("validation.invalid_action", &[("action", request.action.as_str())]),
            );
        }
    };

    let result = state.attendance_api.validate_or_reject(
        request.attendance_id,
        action,
        request.admin_id,
        request.notes.as_deref(),
    );

    match result {
        Ok(outcome) => CommandResponse::ok(t_with_args(
            "validation.success",
            &[("status", status_label(outcome.status).as_str())],
        )),
        Err(err) => {
            tracing::warn!(
                attendance_id = request.attendance_id,
                admin_id = request.admin_id,
                error = %err,
                "审核请求失败"
            );
            let message = match &err {
                ApiError::AdminNotFound(_) => t("validation.admin_not_found"),
                ApiError::AttendanceNotFound(_) => t("validation.record_not_found"),
                ApiError::InvalidStateTransition { from, .. } => {
                    let label = ValidationStatus::parse(from)
                        .map(status_label)
                        .unwrap_or_else(|| from.clone());
                    t_with_args("validation.already_processed", &[("status", label.as_str())])
                }
                _ => t("validation.failed"),
            };
            CommandResponse::fail(err.code(), message)
        }
    }
}

/// 待审核列表（出错时返回空列表）
pub fn get_pending_attendances(state: &AppState) -> Vec<AttendanceWithStudent> {
    state
        .attendance_api
        .list_pending_attendances()
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, code = e.code(), "查询待审核列表失败");
            Vec::new()
        })
}

/// 驾驶舱统计（出错时返回全零）
pub fn get_dashboard_stats(state: &AppState) -> DashboardStats {
    state.dashboard_api.get_dashboard_stats().unwrap_or_else(|e| {
        tracing::error!(error = %e, code = e.code(), "查询驾驶舱统计失败");
        DashboardStats::default()
    })
}

/// 缺勤汇总（出错时返回空列表）
pub fn get_absence_summary(
    state: &AppState,
    request: AbsenceSummaryRequest,
) -> Vec<StudentAbsenceSummary> {
    state
        .report_api
        .get_absence_summary(
            request.class_name.as_deref(),
            request.start_date.as_deref(),
            request.end_date.as_deref(),
        )
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, code = e.code(), "查询缺勤汇总失败");
            Vec::new()
        })
}

/// 导出缺勤报表
pub async fn export_absence_report(
    state: &AppState,
    request: ExportReportRequest,
) -> ExportReportResponse {
    let (start_date, end_date) = match (
        request.start_date.as_deref().map(str::trim).filter(|s| !s.is_empty()),
        request.end_date.as_deref().map(str::trim).filter(|s| !s.is_empty()),
    ) {
        (Some(s), Some(e)) => (s, e),
        _ => {
            return ExportReportResponse::fail("INVALID_INPUT", t("export.dates_required"));
        }
    };

    if let Some(format) = request.format.as_deref() {
        if !format.eq_ignore_ascii_case("csv") {
            tracing::debug!(format, "报表格式参数已忽略，输出 CSV");
        }
    }

    let result = state
        .report_api
        .export_absence_report(request.class_name.as_deref(), start_date, end_date)
        .await;

    match result {
        Ok(summary) => {
            let students = summary.student_count.to_string();
            let absences = summary.absence_count.to_string();
            ExportReportResponse {
                success: true,
                download_url: Some(summary.download_url),
                detail_download_url: summary.detail_download_url,
                message: Some(t_with_args(
                    "export.success",
                    &[("students", students.as_str()), ("absences", absences.as_str())],
                )),
                code: None,
            }
        }
        Err(err) => {
            tracing::error!(error = %err, code = err.code(), "导出缺勤报表失败");
            let message = match &err {
                ApiError::InvalidInput(_) => t("export.invalid_input"),
                _ => t("export.failed"),
            };
            ExportReportResponse::fail(err.code(), message)
        }
    }
}

fn status_label(status: ValidationStatus) -> String {
    t(&format!("status.{}", status.as_str()))
}
