// ==========================================
// 学校考勤管理系统 - 报表导出错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

use crate::repository::RepositoryError;

/// 报表导出错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    // ===== 输入错误 =====
    #[error("导出参数无效: {0}")]
    InvalidInput(String),

    // ===== 文件错误 =====
    #[error("报表文件写入失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV 生成失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("报表文件已存在: {0}")]
    ArtifactExists(String),

    // ===== 数据库错误 =====
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl<W> From<csv::IntoInnerError<W>> for ExportError {
    fn from(err: csv::IntoInnerError<W>) -> Self {
        ExportError::Io(err.into_error())
    }
}

pub type ExportResult<T> = Result<T, ExportError>;
