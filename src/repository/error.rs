// ==========================================
// 学校考勤管理系统 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 数据库错误 =====
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    #[error("外键约束违反: {0}")]
    ForeignKeyViolation(String),

    // ===== 数据质量错误 =====
    #[error("字段值错误 (field={field}): {message}")]
    FieldValueError { field: String, message: String },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE") {
                    RepositoryError::UniqueConstraintViolation(msg)
                } else if msg.contains("FOREIGN KEY") {
                    RepositoryError::ForeignKeyViolation(msg)
                } else {
                    RepositoryError::DatabaseQueryError(msg)
                }
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Unknown".to_string(),
                id: "Unknown".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;

// ==========================================
// 行映射辅助: 文本列 → 领域类型
// ==========================================

/// 将解析失败包装为 rusqlite 转换错误（供 query_map 闭包使用）
pub(crate) fn conversion_error(
    column: usize,
    message: String,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        rusqlite::types::Type::Text,
        Box::new(RepositoryError::FieldValueError {
            field: format!("column#{}", column),
            message,
        }),
    )
}

pub(crate) fn parse_date_column(
    column: usize,
    raw: &str,
) -> Result<chrono::NaiveDate, rusqlite::Error> {
    chrono::NaiveDate::parse_from_str(raw, crate::db::DATE_FORMAT)
        .map_err(|e| conversion_error(column, format!("{} ({})", e, raw)))
}

pub(crate) fn parse_timestamp_column(
    column: usize,
    raw: &str,
) -> Result<chrono::NaiveDateTime, rusqlite::Error> {
    chrono::NaiveDateTime::parse_from_str(raw, crate::db::TIMESTAMP_FORMAT)
        .map_err(|e| conversion_error(column, format!("{} ({})", e, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_returned_no_rows_maps_to_not_found() {
        let err: RepositoryError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }

    #[test]
    fn test_parse_columns() {
        assert!(parse_date_column(0, "2024-01-15").is_ok());
        assert!(parse_date_column(0, "15/01/2024").is_err());
        assert!(parse_timestamp_column(1, "2024-01-15 07:30:00").is_ok());
    }
}
