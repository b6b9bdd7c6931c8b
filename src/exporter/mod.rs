// ==========================================
// 学校考勤管理系统 - 报表导出层
// ==========================================
// 职责: 缺勤报表序列化与文件持久化
// ==========================================

pub mod absence_report;
pub mod csv_writer;
pub mod error;
pub mod report_store;

pub use absence_report::{AbsenceReportExporter, ExportRequest, ExportSummary};
pub use error::{ExportError, ExportResult};
pub use report_store::{FsReportStore, ReportArtifact, ReportKind, ReportStore};
