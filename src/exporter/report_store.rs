// ==========================================
// 学校考勤管理系统 - 报表文件存储
// ==========================================
// 职责: 持久化报表字节,返回下载引用
// 约束: 文件以 create_new 打开,不覆盖已有报表
// ==========================================

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::exporter::error::{ExportError, ExportResult};

/// 已持久化的报表文件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportArtifact {
    pub file_name: String,
    /// 内部存储路径 (不对外暴露)
    #[serde(skip)]
    pub storage_path: PathBuf,
    pub download_url: String,
}

/// 报表类别 (文件名标记)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Summary,
    Detail,
}

impl ReportKind {
    pub fn marker(&self) -> &'static str {
        match self {
            ReportKind::Summary => "ringkasan",
            ReportKind::Detail => "detail",
        }
    }
}

/// 生成报表文件名: 类别标记 + 日期区间 + 时间戳 + 随机后缀
pub fn artifact_file_name(
    kind: ReportKind,
    start_date: NaiveDate,
    end_date: NaiveDate,
    generated_at: NaiveDateTime,
) -> String {
    let token = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "laporan-ketidakhadiran-{}_{}_{}_{}-{}.csv",
        kind.marker(),
        start_date.format("%Y-%m-%d"),
        end_date.format("%Y-%m-%d"),
        generated_at.format("%Y%m%d%H%M%S"),
        &token[..8],
    )
}

/// 拼接下载地址
pub fn download_url(prefix: &str, file_name: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), file_name)
}

// ==========================================
// ReportStore Trait
// ==========================================
// 实现者: FsReportStore (本地目录)
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// 持久化报表,文件名已存在时返回 ArtifactExists
    async fn persist(&self, file_name: &str, bytes: &[u8]) -> ExportResult<ReportArtifact>;
}

// ==========================================
// FsReportStore - 本地目录存储
// ==========================================
pub struct FsReportStore {
    reports_dir: PathBuf,
    download_prefix: String,
}

impl FsReportStore {
    pub fn new(reports_dir: impl Into<PathBuf>, download_prefix: impl Into<String>) -> Self {
        Self {
            reports_dir: reports_dir.into(),
            download_prefix: download_prefix.into(),
        }
    }

    pub fn reports_dir(&self) -> &PathBuf {
        &self.reports_dir
    }
}

#[async_trait]
impl ReportStore for FsReportStore {
    async fn persist(&self, file_name: &str, bytes: &[u8]) -> ExportResult<ReportArtifact> {
        if file_name.contains('/') || file_name.contains('\\') || file_name.contains("..") {
            return Err(ExportError::InvalidInput(format!("非法文件名: {}", file_name)));
        }

        fs::create_dir_all(&self.reports_dir).await?;
        let storage_path = self.reports_dir.join(file_name);

        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&storage_path)
            .await
        {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(ExportError::ArtifactExists(file_name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        file.write_all(bytes).await?;
        file.flush().await?;

        tracing::debug!(path = %storage_path.display(), size = bytes.len(), "报表文件已写入");

        Ok(ReportArtifact {
            file_name: file_name.to_string(),
            download_url: download_url(&self.download_prefix, file_name),
            storage_path,
        })
    }
}
