// ==========================================
// 学校考勤管理系统 - 缺勤报表 API
// ==========================================
// 职责: 缺勤汇总查询、报表导出
// 架构: API 层 → Engine (AbsenceAggregator) / Exporter
// ==========================================

use chrono::NaiveDate;
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::db::DATE_FORMAT;
use crate::domain::report::{AbsenceFilter, StudentAbsenceSummary};
use crate::engine::AbsenceAggregator;
use crate::exporter::{AbsenceReportExporter, ExportRequest, ExportSummary};
use crate::perf::PerfGuard;

pub struct ReportApi {
    aggregator: Arc<AbsenceAggregator>,
    exporter: Arc<AbsenceReportExporter>,
}

impl ReportApi {
    pub fn new(aggregator: Arc<AbsenceAggregator>, exporter: Arc<AbsenceReportExporter>) -> Self {
        Self {
            aggregator,
            exporter,
        }
    }

    /// 缺勤汇总（所有审核状态）
    ///
    /// # 参数
    /// - 空字符串视为未提供
    /// - 日期必须为 YYYY-MM-DD
    pub fn get_absence_summary(
        &self,
        class_name: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> ApiResult<Vec<StudentAbsenceSummary>> {
        let _perf = PerfGuard::new("get_absence_summary");

        let filter = AbsenceFilter::new(
            non_empty(class_name).map(str::to_string),
            parse_optional_date("start_date", start_date)?,
            parse_optional_date("end_date", end_date)?,
        );
        Ok(self.aggregator.summarize_absences(&filter)?)
    }

    /// 导出缺勤报表（仅已审核记录）
    ///
    /// # 返回
    /// - `Err(InvalidInput)`: 日期缺失、格式错误或开始日期晚于结束日期
    pub async fn export_absence_report(
        &self,
        class_name: Option<&str>,
        start_date: &str,
        end_date: &str,
    ) -> ApiResult<ExportSummary> {
        let request = ExportRequest {
            class_name: non_empty(class_name).map(str::to_string),
            start_date: parse_required_date("start_date", start_date)?,
            end_date: parse_required_date("end_date", end_date)?,
        };
        if request.start_date > request.end_date {
            return Err(ApiError::InvalidInput(format!(
                "开始日期晚于结束日期: {} > {}",
                request.start_date, request.end_date
            )));
        }

        let _perf = PerfGuard::new("export_absence_report");
        Ok(self.exporter.export(&request).await?)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// 解析必填日期参数
pub(crate) fn parse_required_date(field: &str, value: &str) -> ApiResult<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidInput(format!("{}不能为空", field)));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|e| {
        ApiError::InvalidInput(format!("{}格式错误（应为YYYY-MM-DD）: {} ({})", field, trimmed, e))
    })
}

/// 解析可选日期参数
pub(crate) fn parse_optional_date(field: &str, value: Option<&str>) -> ApiResult<Option<NaiveDate>> {
    match non_empty(value) {
        Some(v) => parse_required_date(field, v).map(Some),
        None => Ok(None),
    }
}
