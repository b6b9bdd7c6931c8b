// ==========================================
// 学校考勤管理系统 - 缺勤报表导出
// ==========================================
// 流程: 参数校验 → 仅已审核缺勤汇总 → CSV → 持久化 → 审计
// 红线: pending / rejected 记录不得进入报表
// ==========================================

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::attendance::AbsenceRow;
use crate::domain::report::AbsenceFilter;
use crate::engine::AbsenceAggregator;
use crate::exporter::csv_writer::{write_detail_csv, write_summary_csv};
use crate::exporter::error::ExportResult;
use crate::exporter::report_store::{artifact_file_name, ReportKind, ReportStore};
use crate::repository::ActionLogRepository;

/// 导出请求 (日期区间必填,闭区间)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub class_name: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// 导出结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSummary {
    pub file_name: String,
    pub download_url: String,
    pub detail_download_url: Option<String>,
    pub student_count: usize,
    pub absence_count: i64,
}

// ==========================================
// AbsenceReportExporter - 缺勤报表导出器
// ==========================================
pub struct AbsenceReportExporter {
    aggregator: Arc<AbsenceAggregator>,
    store: Arc<dyn ReportStore>,
    action_log_repo: Arc<ActionLogRepository>,
    include_detail: bool,
}

impl AbsenceReportExporter {
    pub fn new(
        aggregator: Arc<AbsenceAggregator>,
        store: Arc<dyn ReportStore>,
        action_log_repo: Arc<ActionLogRepository>,
        include_detail: bool,
    ) -> Self {
        Self {
            aggregator,
            store,
            action_log_repo,
            include_detail,
        }
    }

    /// 导出缺勤报表 (使用本地当前时间生成文件名)
    pub async fn export(&self, request: &ExportRequest) -> ExportResult<ExportSummary> {
        self.export_at(request, Local::now().naive_local()).await
    }

    /// 导出缺勤报表
    ///
    /// 日期区间由 API 层校验 (start_date <= end_date)
    ///
    /// # 返回
    /// - `download_url`: 始终指向汇总报表
    /// - `detail_download_url`: 启用明细且写入成功时指向明细报表
    pub async fn export_at(
        &self,
        request: &ExportRequest,
        generated_at: NaiveDateTime,
    ) -> ExportResult<ExportSummary> {
        let filter = AbsenceFilter::new(
            request.class_name.clone(),
            Some(request.start_date),
            Some(request.end_date),
        )
        .validated_only();

        let (rows, summaries) = self.aggregator.absence_rows_with_summary(&filter)?;
        let student_count = summaries.len();
        let absence_count: i64 = summaries.iter().map(|s| s.total_absences).sum();

        // 1. 汇总报表
        let summary_bytes = write_summary_csv(&summaries)?;
        let summary_name = artifact_file_name(
            ReportKind::Summary,
            request.start_date,
            request.end_date,
            generated_at,
        );
        let summary = self.store.persist(&summary_name, &summary_bytes).await?;

        // 2. 明细报表 (可选,失败不影响汇总结果)
        let detail_download_url = if self.include_detail {
            match self.persist_detail(request, &rows, generated_at).await {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!(
                        summary_file = %summary.file_name,
                        error = %e,
                        "明细报表写入失败,仅返回汇总报表"
                    );
                    None
                }
            }
        } else {
            None
        };

        info!(
            file_name = %summary.file_name,
            student_count,
            absence_count,
            "缺勤报表导出完成"
        );

        let result = ExportSummary {
            file_name: summary.file_name,
            download_url: summary.download_url,
            detail_download_url,
            student_count,
            absence_count,
        };
        self.record_export(request, &result);
        Ok(result)
    }

    async fn persist_detail(
        &self,
        request: &ExportRequest,
        rows: &[AbsenceRow],
        generated_at: NaiveDateTime,
    ) -> ExportResult<String> {
        let detail_bytes = write_detail_csv(rows)?;
        let detail_name = artifact_file_name(
            ReportKind::Detail,
            request.start_date,
            request.end_date,
            generated_at,
        );
        Ok(self.store.persist(&detail_name, &detail_bytes).await?.download_url)
    }

    /// 写入导出日志 (失败仅告警)
    fn record_export(&self, request: &ExportRequest, result: &ExportSummary) {
        let log = ActionLog::new(ActionType::ExportAbsenceReport, "system".to_string())
            .with_payload(json!({
                "class_name": request.class_name,
                "start_date": request.start_date.to_string(),
                "end_date": request.end_date.to_string(),
                "student_count": result.student_count,
                "absence_count": result.absence_count,
            }))
            .with_detail(result.file_name.clone());

        if let Err(e) = self.action_log_repo.insert(&log) {
            warn!(file_name = %result.file_name, error = %e, "导出日志写入失败");
        }
    }
}
